use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

pub mod store;

pub use store::{EntryStore, ListFilter, Stats};

/// Errors from the entry store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the connection pool once at startup. The pool handle is owned by
/// the application state and closed explicitly on shutdown.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!("created database pool for: {}", config.url);
    Ok(pool)
}

/// Create the entries table and its listing index if they do not exist.
///
/// The CHECK on score is redundant with payload validation and kept as a
/// storage-level backstop.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT,
            date    TEXT    NOT NULL,
            score   INTEGER NOT NULL CHECK (score BETWEEN 1 AND 100),
            text    TEXT    NOT NULL DEFAULT '',
            iv      TEXT,
            badge   TEXT,
            color   TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_entries_user_date
         ON entries (user_id, date DESC, id DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
