use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::domain::career_page::CareerUrls;

pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(CheckpointStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn contains(&self, company_id: &str) -> bool {
        self.entry_path(company_id).is_file()
    }

    pub fn processed_ids(&self) -> std::io::Result<HashSet<String>> {
        let mut ids = HashSet::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.insert(stem.to_string());
            }
        }
        Ok(ids)
    }

    pub fn entry_paths(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();
        Ok(paths)
    }

    // Temp file + rename, a reader never observes a half-written entry
    pub async fn write(&self, company_id: &str, urls: &CareerUrls) -> anyhow::Result<()> {
        let serialized = serde_json::to_vec_pretty(urls)?;

        let final_path = self.entry_path(company_id);
        let temp_path = self.dir.join(format!("{}.json.tmp", company_id));

        tokio::fs::write(&temp_path, &serialized)
            .await
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        tokio::fs::rename(&temp_path, &final_path)
            .await
            .with_context(|| format!("Failed to move {} into place", temp_path.display()))?;

        Ok(())
    }

    fn entry_path(&self, company_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", company_id))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::CheckpointStore;
    use crate::domain::career_page::CareerUrls;

    fn temp_store() -> CheckpointStore {
        let dir = std::env::temp_dir().join(format!("compass-checkpoint-{}", Uuid::new_v4()));
        CheckpointStore::new(dir).unwrap()
    }

    #[tokio::test]
    async fn write_then_contains() {
        let store = temp_store();
        let id = Uuid::new_v4().to_string();

        assert!(!store.contains(&id));

        let urls = CareerUrls {
            main_career_url: Some("https://acme.com/jobs".to_string()),
            internship_url: None,
        };
        store.write(&id, &urls).await.unwrap();

        assert!(store.contains(&id));
    }

    #[tokio::test]
    async fn written_entry_round_trips() {
        let store = temp_store();
        let id = Uuid::new_v4().to_string();
        let urls = CareerUrls {
            main_career_url: Some("https://acme.com/jobs".to_string()),
            internship_url: Some("https://acme.com/jobs?level=intern".to_string()),
        };

        store.write(&id, &urls).await.unwrap();

        let paths = store.entry_paths().unwrap();
        assert_eq!(paths.len(), 1);
        let content = std::fs::read_to_string(&paths[0]).unwrap();
        let parsed: CareerUrls = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, urls);
    }

    #[tokio::test]
    async fn processed_ids_lists_only_finished_entries() {
        let store = temp_store();
        let done = Uuid::new_v4().to_string();
        store.write(&done, &CareerUrls::default()).await.unwrap();

        // A leftover temp file from an interrupted run must not count
        std::fs::write(store.dir().join("half-written.json.tmp"), b"{").unwrap();
        std::fs::write(store.dir().join("notes.txt"), b"scratch").unwrap();

        let ids = store.processed_ids().unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains(&done));
    }

    #[tokio::test]
    async fn no_temp_file_left_after_write() {
        let store = temp_store();
        let id = Uuid::new_v4().to_string();

        store.write(&id, &CareerUrls::default()).await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
