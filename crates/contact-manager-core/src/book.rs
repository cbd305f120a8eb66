//! The contact book: validated contact operations over a [`ContactStore`].
//!
//! [`ContactBook`] is the single entry point used by the HTTP server and the
//! CLI. It validates input before any store call and turns untrusted id
//! strings into [`Uuid`]s, mapping malformed ids to the same not-found
//! outcome as ids that match nothing.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::{Contact, ContactFields};
use crate::store::{ContactStore, UpdateOutcome};

/// Failure of a contact operation.
///
/// Not-found is not an error: lookups return `Option`, updates return
/// [`UpdateOutcome::NotFound`], and deletes return `false`.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("invalid contact: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type ContactResult<T> = Result<T, ContactError>;

/// Parse an id string, returning `None` for anything that is not a UUID.
///
/// The string is taken as-is: surrounding whitespace makes it malformed.
pub fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

/// Contact operations over a shared store handle.
///
/// Cloning is cheap; all clones share one store.
#[derive(Clone)]
pub struct ContactBook {
    store: Arc<dyn ContactStore>,
}

impl ContactBook {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    /// Validate and insert a new contact.
    pub async fn create(&self, fields: ContactFields) -> ContactResult<Contact> {
        fields.validate()?;
        let contact = self.store.insert(&fields).await?;
        tracing::debug!(id = %contact.id, "contact created");
        Ok(contact)
    }

    /// Every contact, in storage order.
    pub async fn list_all(&self) -> ContactResult<Vec<Contact>> {
        Ok(self.store.find_all().await?)
    }

    /// Look up a contact. Malformed ids yield `None`.
    pub async fn get_by_id(&self, id: &str) -> ContactResult<Option<Contact>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        Ok(self.store.find_by_id(id).await?)
    }

    /// Validate and replace all four fields of a contact.
    ///
    /// Validation runs first, so invalid input is reported even for ids that
    /// do not exist. Malformed ids yield [`UpdateOutcome::NotFound`].
    pub async fn update(&self, id: &str, fields: ContactFields) -> ContactResult<UpdateOutcome> {
        fields.validate()?;
        let Some(id) = parse_id(id) else {
            return Ok(UpdateOutcome::NotFound);
        };
        let outcome = self.store.replace(id, &fields).await?;
        if let UpdateOutcome::Updated(_) = outcome {
            tracing::debug!(%id, "contact updated");
        }
        Ok(outcome)
    }

    /// Delete a contact. Returns `true` if one was removed.
    pub async fn delete(&self, id: &str) -> ContactResult<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let removed = self.store.remove(id).await?;
        if removed {
            tracing::debug!(%id, "contact deleted");
        }
        Ok(removed)
    }

    /// Contacts containing `query` (case-insensitive) in any field.
    pub async fn search(&self, query: &str) -> ContactResult<Vec<Contact>> {
        Ok(self.store.search(query).await?)
    }

    /// Close the underlying store.
    pub async fn close(&self) {
        self.store.close().await;
    }
}
