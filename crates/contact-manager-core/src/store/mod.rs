//! Storage abstraction for Contact Manager.
//!
//! The [`ContactStore`] trait defines the persistence operations behind the
//! contact book, enabling pluggable backends (SQLite, in-memory).
//!
//! Implementations must be `Send + Sync`: a single store handle is shared by
//! every concurrent request.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Contact, ContactFields};

/// Result of replacing a contact's fields.
///
/// Stores always distinguish the three cases. Whether callers see the
/// difference between [`Unchanged`](UpdateOutcome::Unchanged) and
/// [`NotFound`](UpdateOutcome::NotFound) is a presentation decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one field changed; carries the record after the update.
    Updated(Contact),
    /// The record exists but already held exactly these values.
    Unchanged(Contact),
    /// No record has this id.
    NotFound,
}

/// Abstract storage backend for contacts.
///
/// Ids are [`Uuid`]s; parsing untrusted strings into ids is the caller's job.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert`](ContactStore::insert) | Store a new contact under a fresh id |
/// | [`find_all`](ContactStore::find_all) | All contacts in storage order |
/// | [`find_by_id`](ContactStore::find_by_id) | One contact by id |
/// | [`replace`](ContactStore::replace) | Overwrite all four fields |
/// | [`remove`](ContactStore::remove) | Delete by id |
/// | [`search`](ContactStore::search) | Case-insensitive substring match |
/// | [`close`](ContactStore::close) | Release connections on shutdown |
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert a new contact, assigning it a fresh unique id.
    async fn insert(&self, fields: &ContactFields) -> Result<Contact>;

    /// Every stored contact, in natural storage order.
    async fn find_all(&self) -> Result<Vec<Contact>>;

    /// The contact with this id, if any.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>>;

    /// Replace all four fields of the contact with this id.
    async fn replace(&self, id: Uuid, fields: &ContactFields) -> Result<UpdateOutcome>;

    /// Delete the contact with this id. Returns `true` if one was removed.
    async fn remove(&self, id: Uuid) -> Result<bool>;

    /// Contacts where `query` occurs, ignoring case, in any of the four fields.
    async fn search(&self, query: &str) -> Result<Vec<Contact>>;

    /// Release any held resources. The default does nothing.
    async fn close(&self) {}
}
