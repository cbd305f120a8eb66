//! SQLite database connection management.
//!
//! Provides a connection pool to the configured SQLite database with WAL
//! mode enabled, so concurrent requests can read while one writes. The
//! data directory and database file are created if they don't exist.
//!
//! # Connection Pool
//!
//! Uses `sqlx::SqlitePool` with up to 5 concurrent connections, shared by
//! every request for the lifetime of the process.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::Config;

/// Create a connection pool to `<db.uri>/<db.name>.sqlite`.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the database
/// cannot be opened.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = config.db.path();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create data directory: {}", parent.display())
        })?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    tracing::debug!(path = %db_path.display(), "database connected");
    Ok(pool)
}
