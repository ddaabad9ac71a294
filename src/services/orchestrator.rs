use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};

use crate::domain::career_page::{CareerSearchResult, CareerUrls};
use crate::domain::company::Company;
use crate::services::checkpoint::CheckpointStore;
use crate::services::extractor::extract_career_page;
use crate::services::navigator::CareerAgent;

#[derive(Debug, Default, PartialEq)]
pub struct ExtractionSummary {
    pub processed: usize,
    pub saved: usize,
    pub not_found: usize,
    pub agent_failures: usize,
    pub parse_failures: usize,
    pub write_failures: usize,
}

pub fn without_processed(companies: Vec<Company>, processed: &HashSet<String>) -> Vec<Company> {
    companies
        .into_iter()
        .filter(|company| !processed.contains(&company.id.to_string()))
        .collect()
}

pub async fn run_extraction(
    agent: Arc<dyn CareerAgent>,
    store: &CheckpointStore,
    companies: Vec<Company>,
    concurrent_agents: usize,
) -> ExtractionSummary {
    log::info!(
        "Started career page extraction for {} companies with {} concurrent agents",
        companies.len(),
        concurrent_agents
    );

    let semaphore = Arc::new(Semaphore::new(concurrent_agents));
    let (outcome_sender, mut outcome_receiver) = mpsc::unbounded_channel();

    for company in companies {
        let agent = agent.clone();
        let semaphore = semaphore.clone();
        let outcome_sender = outcome_sender.clone();

        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                log::error!("Agent limiter closed before '{}' ran", company.company_name);
                return;
            };

            let result = extract_career_page(agent.as_ref(), &company).await;

            // Receiver hung up means the whole run is over, nothing left to do
            _ = outcome_sender.send((company, result));
        });
    }
    drop(outcome_sender);

    // Outcomes arrive in completion order, so checkpointing starts with the
    // first finished company instead of waiting for the slowest.
    let mut summary = ExtractionSummary::default();
    while let Some((company, result)) = outcome_receiver.recv().await {
        summary.processed += 1;

        match result {
            CareerSearchResult::Found(urls) => {
                match store.write(&company.id.to_string(), &urls).await {
                    Ok(()) => {
                        summary.saved += 1;
                        log::info!("Saved career urls for '{}'", company.company_name);
                    }
                    Err(e) => {
                        summary.write_failures += 1;
                        log::error!(
                            "Failed to checkpoint '{}': {:?}",
                            company.company_name,
                            e
                        );
                    }
                }
            }
            CareerSearchResult::NotFound => {
                // Checkpointed so a definitive miss is not retried on every run
                match store
                    .write(&company.id.to_string(), &CareerUrls::default())
                    .await
                {
                    Ok(()) => {
                        summary.not_found += 1;
                        log::info!("No careers website found for '{}'", company.company_name);
                    }
                    Err(e) => {
                        summary.write_failures += 1;
                        log::error!(
                            "Failed to checkpoint '{}': {:?}",
                            company.company_name,
                            e
                        );
                    }
                }
            }
            CareerSearchResult::AgentFailure(e) => {
                summary.agent_failures += 1;
                log::error!("Agent failed on '{}': {:?}", company.company_name, e);
            }
            CareerSearchResult::Malformed(raw) => {
                summary.parse_failures += 1;
                log::error!(
                    "Failed to decode agent output for '{}': {}",
                    company.company_name,
                    snippet(&raw)
                );
            }
        }
    }

    log::info!(
        "Extraction run finished: {} processed, {} saved, {} not found, {} agent failures, {} parse failures, {} write failures",
        summary.processed,
        summary.saved,
        summary.not_found,
        summary.agent_failures,
        summary.parse_failures,
        summary.write_failures
    );

    summary
}

fn snippet(raw: &str) -> String {
    const MAX_LOGGED: usize = 200;
    match raw.char_indices().nth(MAX_LOGGED) {
        Some((byte_offset, _)) => format!("{}...", &raw[..byte_offset]),
        None => raw.to_string(),
    }
}
