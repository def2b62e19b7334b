use std::{future::Future, time::Duration};

use chrono::{DateTime, Utc};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use thiserror::Error;

pub mod admins;
pub mod demo_numbers;
pub mod games;
pub mod players;
pub mod rates;

pub use admins::SqliteAdminRepository;
pub use demo_numbers::SqliteDemoNumberRepository;
pub use games::SqliteGameRepository;
pub use players::SqlitePlayerRepository;
pub use rates::SqliteRateRepository;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// SQLITE_BUSY, SQLITE_LOCKED and their extended codes
const BUSY_CODES: [&str; 5] = ["5", "6", "261", "262", "517"];

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("sqlite connect failed: {0}")]
    Connect(sqlx::Error),
    #[error("sqlite migrate failed: {0}")]
    Migrate(sqlx::migrate::MigrateError),
}

pub async fn connect_and_migrate(db_path: &str) -> Result<SqlitePool, PersistenceError> {
    let conn_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(conn_options)
        .await
        .map_err(PersistenceError::Connect)?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Single-connection pool so every handle sees the same database.
pub async fn connect_in_memory() -> Result<SqlitePool, PersistenceError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .map_err(PersistenceError::Connect)?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<(), PersistenceError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(PersistenceError::Migrate)
}

pub struct Repositories {
    pub players: SqlitePlayerRepository,
    pub admins: SqliteAdminRepository,
    pub rates: SqliteRateRepository,
    pub games: SqliteGameRepository,
    pub demo_numbers: SqliteDemoNumberRepository,
}

impl Repositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            players: SqlitePlayerRepository::new(pool.clone()),
            admins: SqliteAdminRepository::new(pool.clone()),
            rates: SqliteRateRepository::new(pool.clone()),
            games: SqliteGameRepository::new(pool.clone()),
            demo_numbers: SqliteDemoNumberRepository::new(pool),
        }
    }
}

fn is_busy(error: &sqlx::Error) -> bool {
    match error.as_database_error().and_then(|e| e.code()) {
        Some(code) => BUSY_CODES.contains(&code.as_ref()),
        None => false,
    }
}

/// Runs `op` again once if SQLite reports the database busy or locked.
pub(crate) async fn retry_on_busy<T, F, Fut>(mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    match op().await {
        Err(e) if is_busy(&e) => {
            log::warn!("Database busy, retrying once: {}", e);
            op().await
        }
        result => result,
    }
}

pub(crate) fn to_millis(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

pub(crate) fn from_millis(millis: i64) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| format!("invalid timestamp {}", millis))
}

pub(crate) fn parse_uuid(column: &str, value: &str) -> Result<uuid::Uuid, String> {
    uuid::Uuid::parse_str(value).map_err(|e| format!("invalid {} uuid: {}", column, e))
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}
