use std::{sync::Arc, time::Duration};

use compass::{
    configuration::get_configuration,
    dal::company_db,
    services::{run_extraction, without_processed, CheckpointStore, Navigator},
};
use env_logger::Env;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let pool_options = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10));
    let connection_pool = pool_options.connect_lazy_with(configuration.database.with_db());

    let store = CheckpointStore::new(&configuration.extraction.results_dir)?;
    let processed = store.processed_ids()?;
    if !processed.is_empty() {
        log::info!("Found {} already processed companies", processed.len());
    }

    let companies =
        company_db::unprocessed_companies(&connection_pool, configuration.extraction.batch_limit)
            .await?;
    let companies = without_processed(companies, &processed);
    log::info!("{} companies to process", companies.len());

    if companies.is_empty() {
        log::info!("No new companies to process");
        return Ok(());
    }

    let navigator = Arc::new(Navigator::new(&configuration.agent));

    run_extraction(
        navigator,
        &store,
        companies,
        configuration.extraction.concurrent_agents,
    )
    .await;

    Ok(())
}
