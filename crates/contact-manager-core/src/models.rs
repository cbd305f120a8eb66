//! Contact data types.
//!
//! A [`Contact`] is the stored record; [`ContactFields`] is the user-editable
//! part of it (everything except the id) and doubles as the request body for
//! create and update.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// The four user-editable fields of a contact.
///
/// `name` must contain a non-whitespace character and `email` must be a syntactically valid email
/// address. `phone` and `address` are free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactFields {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub phone: String,
    pub address: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

impl ContactFields {
    /// Returns `true` if `query` occurs, ignoring case, anywhere in
    /// `name`, `email`, `phone`, or `address`.
    ///
    /// An empty query matches every contact.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [&self.name, &self.email, &self.phone, &self.address]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A stored contact.
///
/// Serializes flat: `{"id": "...", "name": "...", "email": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: ContactFields,
}

impl Contact {
    pub fn new(id: Uuid, fields: ContactFields) -> Self {
        Self { id, fields }
    }
}
