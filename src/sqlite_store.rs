//! SQLite-backed [`ContactStore`] implementation.
//!
//! Each contact is one row of the collection table. Every write is a single
//! SQL statement. [`replace`](ContactStore::replace) returns the written row
//! from that statement and only falls back to a lookup when nothing was
//! written, to tell "unchanged" apart from "missing".
//!
//! Search scans the collection in storage order and filters with
//! [`ContactFields::matches`], so case folding follows Unicode rules exactly
//! like the in-memory store. SQLite's `LIKE` only folds ASCII.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use contact_manager_core::models::{Contact, ContactFields};
use contact_manager_core::store::{ContactStore, UpdateOutcome};

use crate::config::Config;
use crate::{db, migrate};

/// SQLite implementation of the [`ContactStore`] trait.
///
/// Wraps a [`SqlitePool`] and the (validated) collection table name.
pub struct SqliteStore {
    pool: SqlitePool,
    collection: String,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
        }
    }

    /// Connect to the configured database and make sure the collection exists.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        migrate::ensure_collection(&pool, &config.db.collection).await?;
        Ok(Self::new(pool, config.db.collection.clone()))
    }

    fn select(&self) -> String {
        format!(
            r#"SELECT id, name, email, phone, address FROM "{}""#,
            self.collection
        )
    }
}

fn row_to_contact(row: &SqliteRow) -> Result<Contact> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id).with_context(|| format!("corrupt contact id in store: {}", id))?;
    Ok(Contact::new(
        id,
        ContactFields {
            name: row.get("name"),
            email: row.get("email"),
            phone: row.get("phone"),
            address: row.get("address"),
        },
    ))
}

#[async_trait]
impl ContactStore for SqliteStore {
    async fn insert(&self, fields: &ContactFields) -> Result<Contact> {
        let id = Uuid::new_v4();
        sqlx::query(&format!(
            r#"INSERT INTO "{}" (id, name, email, phone, address) VALUES (?, ?, ?, ?, ?)"#,
            self.collection
        ))
        .bind(id.to_string())
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.address)
        .execute(&self.pool)
        .await?;

        Ok(Contact::new(id, fields.clone()))
    }

    async fn find_all(&self) -> Result<Vec<Contact>> {
        let rows = sqlx::query(&format!("{} ORDER BY seq ASC", self.select()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_contact).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", self.select()))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_contact).transpose()
    }

    async fn replace(&self, id: Uuid, fields: &ContactFields) -> Result<UpdateOutcome> {
        let written = sqlx::query(&format!(
            r#"
            UPDATE "{}" SET name = ?1, email = ?2, phone = ?3, address = ?4
            WHERE id = ?5
              AND (name <> ?1 OR email <> ?2 OR phone <> ?3 OR address <> ?4)
            RETURNING id, name, email, phone, address
            "#,
            self.collection
        ))
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.address)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = written {
            return Ok(UpdateOutcome::Updated(row_to_contact(&row)?));
        }

        Ok(match self.find_by_id(id).await? {
            Some(contact) => UpdateOutcome::Unchanged(contact),
            None => UpdateOutcome::NotFound,
        })
    }

    async fn remove(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(&format!(r#"DELETE FROM "{}" WHERE id = ?"#, self.collection))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, query: &str) -> Result<Vec<Contact>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|c| c.fields.matches(query))
            .collect())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
