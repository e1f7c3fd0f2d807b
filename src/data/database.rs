use crate::api::config::Config;
use diesel::result;
use diesel_async::AsyncMysqlConnection;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, deadpool};
use once_cell::sync::Lazy;

pub type DbConnection = Object<AsyncMysqlConnection>;

pub struct Database {
    pool: Pool<AsyncMysqlConnection>,
}

impl Database {
    pub async fn new() -> Self {
        Database {
            pool: DB_POOL.clone(),
        }
    }

    pub async fn get_connection(&self) -> Result<DbConnection, deadpool::PoolError> {
        self.pool.get().await
    }
}

/// Checks out a pooled connection, folding pool failures into a diesel error
/// so repositories only ever surface `diesel::result::Error`.
pub async fn connection() -> Result<DbConnection, result::Error> {
    let db = Database::new().await;

    db.get_connection().await.map_err(|e| {
        result::Error::DatabaseError(
            result::DatabaseErrorKind::UnableToSendCommand,
            Box::new(e.to_string()),
        )
    })
}

/// Lazily initialized global database connection pool
static DB_POOL: Lazy<Pool<AsyncMysqlConnection>> = Lazy::new(|| {
    let config = AsyncDieselConnectionManager::<AsyncMysqlConnection>::new(
        Config::new().database_url,
    );

    // Building only fails for a zero-sized pool, which the default builder never is.
    let pool = match Pool::builder(config).build() {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create database connection pool: {e}"),
    };

    tracing::info!("DB connection pool created");

    pool
});

diesel::define_sql_function! {
    /// MySQL's id for the row most recently inserted on this connection.
    fn last_insert_id() -> diesel::sql_types::Unsigned<diesel::sql_types::BigInt>;
}

/// Reads `LAST_INSERT_ID()`; call it on the connection that did the insert.
pub async fn last_inserted_id(conn: &mut AsyncMysqlConnection) -> Result<i32, result::Error> {
    use diesel_async::RunQueryDsl;

    let id: u64 = diesel::select(last_insert_id()).get_result(conn).await?;

    i32::try_from(id).map_err(|e| result::Error::DeserializationError(Box::new(e)))
}
