use std::time::Duration;

use compass::{
    configuration::get_configuration,
    services::{sync_checkpoints, CheckpointStore},
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

    sync_checkpoints(&connection_pool, &store).await?;

    Ok(())
}
