//! # Contact Manager Core
//!
//! Runtime-agnostic logic for Contact Manager: contact models and their
//! validation rules, the [`store::ContactStore`] abstraction, an in-memory
//! store, and the [`book::ContactBook`] service implementing the contact
//! operations.
//!
//! This crate contains no tokio, sqlx, or HTTP dependencies. Storage backends
//! and transports live in the `contact-manager` crate.

pub mod book;
pub mod models;
pub mod store;
