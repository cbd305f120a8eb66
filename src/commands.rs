//! CLI command implementations.
//!
//! Each `run_*` function opens the configured SQLite store, performs one
//! contact operation through [`ContactBook`], prints the result as JSON to
//! stdout, and closes the store.

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;

use contact_manager_core::book::ContactBook;
use contact_manager_core::models::ContactFields;
use contact_manager_core::store::UpdateOutcome;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

async fn open_book(config: &Config) -> Result<ContactBook> {
    let store = SqliteStore::open(config).await?;
    Ok(ContactBook::new(Arc::new(store)))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run `op` against a freshly opened contact book, closing it afterwards
/// whether or not `op` succeeded.
async fn with_book<T, F, Fut>(config: &Config, op: F) -> Result<T>
where
    F: FnOnce(ContactBook) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let book = open_book(config).await?;
    let result = op(book.clone()).await;
    book.close().await;
    result
}

pub async fn run_list(config: &Config) -> Result<()> {
    with_book(config, |book| async move {
        print_json(&book.list_all().await?)
    })
    .await
}

pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    with_book(config, |book| async move {
        match book.get_by_id(id).await? {
            Some(contact) => print_json(&contact),
            None => bail!("Contact not found: {}", id),
        }
    })
    .await
}

pub async fn run_add(config: &Config, fields: ContactFields) -> Result<()> {
    with_book(config, |book| async move {
        print_json(&book.create(fields).await?)
    })
    .await
}

pub async fn run_update(config: &Config, id: &str, fields: ContactFields) -> Result<()> {
    with_book(config, |book| async move {
        match book.update(id, fields).await? {
            UpdateOutcome::Updated(contact) => print_json(&contact),
            UpdateOutcome::Unchanged(contact) => {
                eprintln!("No changes made.");
                print_json(&contact)
            }
            UpdateOutcome::NotFound => bail!("Contact not found: {}", id),
        }
    })
    .await
}

pub async fn run_delete(config: &Config, id: &str) -> Result<()> {
    with_book(config, |book| async move {
        if book.delete(id).await? {
            println!("Contact deleted successfully");
            Ok(())
        } else {
            bail!("Contact not found: {}", id)
        }
    })
    .await
}

pub async fn run_search(config: &Config, query: &str) -> Result<()> {
    with_book(config, |book| async move {
        print_json(&book.search(query).await?)
    })
    .await
}
