use anyhow::anyhow;

use crate::domain::career_page::{interpret_agent_output, CareerSearchResult};
use crate::domain::company::Company;
use crate::services::navigator::CareerAgent;

pub fn build_career_page_task(company_name: &str) -> String {
    format!(
        r#"You are a web research agent looking for the job search portal of **{company_name}**.

1. Find the main careers page for {company_name}.
2. Navigate past any introductory pages to the page with the actual job listings and search filters. Capture its URL as `main_career_url`.
3. On that page, apply a filter for 'Internship', 'Student' or 'Early Career' roles and capture the filtered URL as `internship_url`. Use null if no such filter exists.

Your final response must be a single raw JSON object with exactly the keys `main_career_url` and `internship_url`, and no text outside of it.
If no careers website can be found at all, respond with the exact string Not Found.
Search for the links, do not generate them from memory."#
    )
}

pub async fn extract_career_page(
    agent: &dyn CareerAgent,
    company: &Company,
) -> CareerSearchResult {
    let task = build_career_page_task(&company.company_name);

    let run = match agent.run_task(&task).await {
        Ok(run) => run,
        Err(e) => return CareerSearchResult::AgentFailure(e),
    };

    match run.result {
        Some(raw) if run.completed => interpret_agent_output(&raw),
        _ => CareerSearchResult::AgentFailure(anyhow!(
            "Agent run was not successful or did not return a result"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::build_career_page_task;

    #[test]
    fn task_names_the_company_and_the_output_keys() {
        let task = build_career_page_task("Acme GmbH");

        assert!(task.contains("Acme GmbH"));
        assert!(task.contains("main_career_url"));
        assert!(task.contains("internship_url"));
        assert!(task.contains("Not Found"));
    }
}
