//! Collection creation.
//!
//! The contact collection is a single table named by `db.collection`.
//! Creation is idempotent and runs both from `contacts init` and at server
//! start.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the configured collection, opening and closing a dedicated pool.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let result = ensure_collection(&pool, &config.db.collection).await;
    pool.close().await;
    result
}

/// Create the contact table and its indexes if they don't exist.
///
/// `collection` must already be validated as a SQL identifier (see
/// [`crate::config`]).
pub async fn ensure_collection(pool: &SqlitePool, collection: &str) -> Result<()> {
    // `seq` preserves insertion order for listing and search.
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{collection}" (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            address TEXT NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"CREATE INDEX IF NOT EXISTS "idx_{collection}_email" ON "{collection}"(email)"#
    ))
    .execute(pool)
    .await?;

    tracing::debug!(collection, "collection ready");
    Ok(())
}
