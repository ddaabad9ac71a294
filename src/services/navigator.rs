use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::configuration::AgentSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct AgentRun {
    pub completed: bool,
    pub result: Option<String>,
}

#[async_trait]
pub trait CareerAgent: Send + Sync {
    async fn run_task(&self, task: &str) -> anyhow::Result<AgentRun>;
}

// Client for the browser agent service. The service owns the browser and the
// model loop, one session maps to one browser instance on its side.
pub struct Navigator {
    client: Client,
    base_url: String,
    model: String,
    headless: bool,
}

#[derive(Serialize)]
struct CreateSessionRequest {
    headless: bool,
}

#[derive(Deserialize)]
struct CreateSessionResponse {
    session_id: String,
}

#[derive(Serialize)]
struct RunTaskRequest<'a> {
    task: &'a str,
    model: &'a str,
}

impl Navigator {
    pub fn new(settings: &AgentSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("Failed to build the agent http client.");

        Navigator {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            headless: settings.headless,
        }
    }

    async fn open_session(&self) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/sessions", self.base_url))
            .json(&CreateSessionRequest {
                headless: self.headless,
            })
            .send()
            .await
            .context("No response from the agent service")?
            .error_for_status()
            .context("Agent service refused to open a browser session")?;

        let session = response
            .json::<CreateSessionResponse>()
            .await
            .context("Malformed session response from the agent service")?;

        Ok(session.session_id)
    }

    async fn run_in_session(&self, session_id: &str, task: &str) -> anyhow::Result<AgentRun> {
        let response = self
            .client
            .post(format!("{}/sessions/{}/run", self.base_url, session_id))
            .json(&RunTaskRequest {
                task,
                model: &self.model,
            })
            .send()
            .await
            .context("Agent run request got no response")?
            .error_for_status()
            .context("Agent run failed")?;

        response
            .json::<AgentRun>()
            .await
            .context("Malformed run response from the agent service")
    }

    async fn close_session(&self, session_id: &str) {
        let result = self
            .client
            .delete(format!("{}/sessions/{}", self.base_url, session_id))
            .send()
            .await;

        if let Err(e) = result {
            log::error!("Failed to release browser session {}: {:?}", session_id, e);
        }
    }
}

#[async_trait]
impl CareerAgent for Navigator {
    async fn run_task(&self, task: &str) -> anyhow::Result<AgentRun> {
        let session_id = self.open_session().await?;

        // The session is released no matter how the run went
        let run_result = self.run_in_session(&session_id, task).await;
        self.close_session(&session_id).await;

        run_result
    }
}

#[cfg(test)]
mod tests {
    use super::AgentRun;

    #[test]
    fn agent_run_deserializes_service_payload() {
        let run: AgentRun =
            serde_json::from_str(r#"{"completed":true,"result":"{\"main_career_url\":null,\"internship_url\":null}"}"#)
                .unwrap();
        assert!(run.completed);
        assert!(run.result.is_some());

        let run: AgentRun = serde_json::from_str(r#"{"completed":false,"result":null}"#).unwrap();
        assert!(!run.completed);
        assert!(run.result.is_none());
    }
}
