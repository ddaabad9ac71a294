use std::path::Path;

use sqlx::PgPool;
use url::Url;
use uuid::Uuid;

use crate::dal::company_db::{self, CareerUrlUpdate};
use crate::domain::career_page::CareerUrls;
use crate::services::checkpoint::CheckpointStore;

#[derive(Debug, Default, PartialEq)]
pub struct SyncSummary {
    pub processed: usize,
    pub updated: usize,
    pub up_to_date: usize,
    pub failed: usize,
}

enum EntryError {
    BadId,
    Unreadable(std::io::Error),
    BadJson(serde_json::Error),
}

fn load_entry(path: &Path) -> Result<(Uuid, CareerUrls), EntryError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or(EntryError::BadId)?;
    let company_id = Uuid::parse_str(stem).map_err(|_| EntryError::BadId)?;

    let content = std::fs::read_to_string(path).map_err(EntryError::Unreadable)?;
    let urls = serde_json::from_str::<CareerUrls>(&content).map_err(EntryError::BadJson)?;

    Ok((company_id, urls))
}

pub async fn sync_checkpoints(
    pool: &PgPool,
    store: &CheckpointStore,
) -> anyhow::Result<SyncSummary> {
    let paths = store.entry_paths()?;
    let total = paths.len();
    log::info!("Found {} checkpoint files to sync", total);

    let mut summary = SyncSummary::default();

    for path in paths {
        summary.processed += 1;
        let position = format!("({}/{})", summary.processed, total);

        let (company_id, urls) = match load_entry(&path) {
            Ok(entry) => entry,
            Err(EntryError::BadId) => {
                summary.failed += 1;
                log::error!("{} Invalid company id in filename: {}", position, path.display());
                continue;
            }
            Err(EntryError::Unreadable(e)) => {
                summary.failed += 1;
                log::error!("{} Could not read {}: {:?}", position, path.display(), e);
                continue;
            }
            Err(EntryError::BadJson(e)) => {
                summary.failed += 1;
                log::error!("{} Could not decode {}: {:?}", position, path.display(), e);
                continue;
            }
        };

        match urls.main_career_url.as_deref() {
            Some(main_url) => {
                if Url::parse(main_url).is_err() {
                    log::warn!("{} main_career_url for {} is not a valid url: {}", position, company_id, main_url);
                }
            }
            None => log::warn!("{} main_career_url is missing in {}", position, path.display()),
        }

        match company_db::set_career_urls(pool, company_id, &urls).await? {
            CareerUrlUpdate::Updated => {
                summary.updated += 1;
                log::info!("{} Updated company {}", position, company_id);
            }
            CareerUrlUpdate::AlreadyUpToDate => {
                summary.up_to_date += 1;
                log::info!("{} Company {} was already up to date", position, company_id);
            }
            CareerUrlUpdate::MissingCompany => {
                summary.failed += 1;
                log::error!("{} Company {} not found in database", position, company_id);
            }
        }
    }

    log::info!(
        "Sync finished: {} processed, {} updated, {} already up to date, {} failed",
        summary.processed,
        summary.updated,
        summary.up_to_date,
        summary.failed
    );

    Ok(summary)
}
