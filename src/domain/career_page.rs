use serde::{Deserialize, Serialize};

pub const NOT_FOUND_SENTINEL: &str = "not found";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CareerUrls {
    pub main_career_url: Option<String>,
    pub internship_url: Option<String>,
}

impl CareerUrls {
    pub fn is_empty(&self) -> bool {
        self.main_career_url.is_none() && self.internship_url.is_none()
    }
}

pub enum CareerSearchResult {
    Found(CareerUrls),
    NotFound,
    AgentFailure(anyhow::Error),
    Malformed(String),
}

/*
 The agent is asked for one of two encodings:
 1. A raw JSON object with exactly the keys main_career_url and internship_url
 2. The literal string "Not Found" when no careers page exists at all
 Anything else means the agent drifted from the output contract.
*/
pub fn interpret_agent_output(raw: &str) -> CareerSearchResult {
    let trimmed = raw.trim();

    if trimmed.to_lowercase() == NOT_FOUND_SENTINEL {
        return CareerSearchResult::NotFound;
    }

    match serde_json::from_str::<CareerUrls>(trimmed) {
        Ok(urls) => CareerSearchResult::Found(urls),
        Err(_) => CareerSearchResult::Malformed(raw.to_string()),
    }
}
