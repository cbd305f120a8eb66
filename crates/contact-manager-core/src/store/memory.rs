//! In-memory [`ContactStore`] implementation for tests and embedding.
//!
//! Keeps contacts in a `Vec` behind `std::sync::RwLock`, so iteration order
//! is insertion order. Search is a linear scan using
//! [`ContactFields::matches`].

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Contact, ContactFields};

use super::{ContactStore, UpdateOutcome};

/// In-memory contact store.
#[derive(Default)]
pub struct InMemoryStore {
    contacts: RwLock<Vec<Contact>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Contact>>> {
        self.contacts
            .read()
            .map_err(|_| anyhow!("in-memory contact store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Contact>>> {
        self.contacts
            .write()
            .map_err(|_| anyhow!("in-memory contact store lock poisoned"))
    }
}

#[async_trait]
impl ContactStore for InMemoryStore {
    async fn insert(&self, fields: &ContactFields) -> Result<Contact> {
        let contact = Contact::new(Uuid::new_v4(), fields.clone());
        self.write()?.push(contact.clone());
        Ok(contact)
    }

    async fn find_all(&self) -> Result<Vec<Contact>> {
        Ok(self.read()?.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>> {
        Ok(self.read()?.iter().find(|c| c.id == id).cloned())
    }

    async fn replace(&self, id: Uuid, fields: &ContactFields) -> Result<UpdateOutcome> {
        let mut contacts = self.write()?;
        let Some(stored) = contacts.iter_mut().find(|c| c.id == id) else {
            return Ok(UpdateOutcome::NotFound);
        };
        if stored.fields == *fields {
            return Ok(UpdateOutcome::Unchanged(stored.clone()));
        }
        stored.fields = fields.clone();
        Ok(UpdateOutcome::Updated(stored.clone()))
    }

    async fn remove(&self, id: Uuid) -> Result<bool> {
        let mut contacts = self.write()?;
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        Ok(contacts.len() < before)
    }

    async fn search(&self, query: &str) -> Result<Vec<Contact>> {
        Ok(self
            .read()?
            .iter()
            .filter(|c| c.fields.matches(query))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, email: &str) -> ContactFields {
        ContactFields {
            name: name.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = InMemoryStore::new();
        let a = store.insert(&fields("A", "a@example.com")).await.unwrap();
        let b = store.insert(&fields("B", "b@example.com")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.find_all().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_replace_reports_all_outcomes() {
        let store = InMemoryStore::new();
        let a = store.insert(&fields("A", "a@example.com")).await.unwrap();

        let same = store.replace(a.id, &a.fields).await.unwrap();
        assert_eq!(same, UpdateOutcome::Unchanged(a.clone()));

        let new_fields = fields("A2", "a2@example.com");
        match store.replace(a.id, &new_fields).await.unwrap() {
            UpdateOutcome::Updated(c) => {
                assert_eq!(c.id, a.id);
                assert_eq!(c.fields, new_fields);
            }
            other => panic!("expected Updated, got {:?}", other),
        }

        let missing = store.replace(Uuid::new_v4(), &new_fields).await.unwrap();
        assert_eq!(missing, UpdateOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_remove_only_once() {
        let store = InMemoryStore::new();
        let a = store.insert(&fields("A", "a@example.com")).await.unwrap();
        assert!(store.remove(a.id).await.unwrap());
        assert!(!store.remove(a.id).await.unwrap());
        assert!(store.find_by_id(a.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_scans_all_fields() {
        let store = InMemoryStore::new();
        store.insert(&fields("John Doe", "jd@example.com")).await.unwrap();
        store.insert(&fields("Jane", "jane@other.org")).await.unwrap();

        assert_eq!(store.search("OTHER.ORG").await.unwrap().len(), 1);
        assert_eq!(store.search("main st").await.unwrap().len(), 2);
        assert!(store.search("nobody").await.unwrap().is_empty());
    }
}
