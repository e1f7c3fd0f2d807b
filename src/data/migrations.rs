use crate::api::config::Config;
use diesel_async::AsyncMysqlConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies every pending migration and returns the versions that ran.
///
/// diesel's migration harness is synchronous, so it runs on a blocking
/// thread through the async connection wrapper.
pub async fn run_pending_migrations() -> anyhow::Result<Vec<String>> {
    let database_url = Config::new().database_url;

    tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<String>> {
        use diesel::Connection;

        let mut conn = AsyncConnectionWrapper::<AsyncMysqlConnection>::establish(&database_url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))?;

        Ok(applied.into_iter().map(|v| v.to_string()).collect())
    })
    .await?
}
