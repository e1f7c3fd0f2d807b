use anyhow::Context;
use merch_hub_lib::api::config::Config;
use merch_hub_lib::api::server;
use merch_hub_lib::data::migrations::run_pending_migrations;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "merch_hub=info,merch_hub_lib=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    Config::from_env().context("invalid configuration")?;

    let applied = run_pending_migrations()
        .await
        .context("failed to apply database migrations")?;
    if applied.is_empty() {
        tracing::info!("database schema up to date");
    } else {
        tracing::info!(migrations = ?applied, "applied pending migrations");
    }

    server::start().await
}
