//! # Contact Manager
//!
//! A small contact manager: create, read, update, delete, and search contacts
//! stored in a single SQLite collection, served as a JSON HTTP API and
//! scriptable from the `contacts` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐
//! │   HTTP   │   │   CLI    │
//! │  (axum)  │   │(contacts)│
//! └────┬─────┘   └────┬─────┘
//!      └──────┬───────┘
//!             ▼
//!      ┌─────────────┐     ┌──────────────┐
//!      │ ContactBook │────▶│ ContactStore │
//!      │ (validate)  │     │ SQLite / mem │
//!      └─────────────┘     └──────────────┘
//! ```
//!
//! Models, validation, the store trait, and the in-memory store live in the
//! `contact-manager-core` crate; this crate adds the SQLite store, config,
//! and the transports.
//!
//! ## Quick Start
//!
//! ```bash
//! export DB_URI=./data DB_NAME=contacts COLLECTION_NAME=contacts
//! contacts init
//! contacts serve
//! curl -X POST localhost:8000/contacts -H 'content-type: application/json' \
//!   -d '{"name":"John Doe","email":"john@example.com","phone":"555-0100","address":"1 Main St"}'
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`commands`] | CLI command implementations |
//! | [`config`] | Environment and TOML configuration |
//! | [`db`] | SQLite connection pool |
//! | [`migrate`] | Collection table creation |
//! | [`sqlite_store`] | SQLite implementation of `ContactStore` |
//! | [`server`] | HTTP API |

pub mod commands;
pub mod config;
pub mod db;
pub mod migrate;
pub mod server;
pub mod sqlite_store;
