//! Contact HTTP server.
//!
//! Exposes the contact book as a JSON HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `/` | Welcome message |
//! | `GET`    | `/health` | Health check (returns version) |
//! | `POST`   | `/contacts` | Create a contact |
//! | `GET`    | `/contacts` | List all contacts |
//! | `GET`    | `/contacts/{id}` | Fetch one contact |
//! | `PUT`    | `/contacts/{id}` | Replace a contact's fields |
//! | `DELETE` | `/contacts/{id}` | Delete a contact |
//! | `GET`    | `/contacts/search/{query}` | Case-insensitive substring search |
//!
//! # Missing contacts
//!
//! A missing contact is an ordinary result, not an HTTP error: the response
//! is `200` with `{"error": "Contact not found"}`. An update that changes no
//! field is reported exactly like an update of a missing contact
//! (`{"error": "Contact not found or no changes made"}`), so callers cannot
//! tell the two apart.
//!
//! With `server.strict_status` enabled, missing contacts answer `404` and a
//! no-op update answers `200` with the unchanged record.
//!
//! # Error Contract
//!
//! Validation and server errors use a structured body:
//!
//! ```json
//! { "error": { "code": "validation_error", "message": "...", "fields": { "email": ["must be a valid email address"] } } }
//! ```
//!
//! Error codes: `validation_error` (422), `bad_request` (400/415),
//! `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use std::collections::BTreeMap;
use std::future::Future;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use contact_manager_core::book::{ContactBook, ContactError};
use contact_manager_core::models::{Contact, ContactFields};
use contact_manager_core::store::UpdateOutcome;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

const WELCOME: &str = "Hello, Welcome to Contact Manager";
const CONTACT_NOT_FOUND: &str = "Contact not found";
const NOT_FOUND_OR_UNCHANGED: &str = "Contact not found or no changes made";
const CONTACT_DELETED: &str = "Contact deleted successfully";

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Contact operations over the single shared store handle.
    contacts: ContactBook,
    /// See [`crate::config::ServerConfig::strict_status`].
    strict_status: bool,
}

impl AppState {
    pub fn new(contacts: ContactBook, strict_status: bool) -> Self {
        Self {
            contacts,
            strict_status,
        }
    }

    /// A "no such contact" reply: `200` by default, `404` in strict mode.
    fn miss(&self, error: &'static str) -> Response {
        let status = if self.strict_status {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        };
        (status, Json(MissBody { error })).into_response()
    }
}

/// Build the router with all contact routes, CORS, and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/contacts", get(handle_list).post(handle_create))
        .route(
            "/contacts/{id}",
            get(handle_get).put(handle_update).delete(handle_delete),
        )
        .route("/contacts/search/{query}", get(handle_search))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Starts the contact HTTP server.
///
/// Opens the SQLite store (creating the collection if needed), binds to
/// `[server].bind`, and serves until Ctrl-C or SIGTERM. The store is closed
/// before returning.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = SqliteStore::open(config).await?;
    let contacts = ContactBook::new(Arc::new(store));
    let state = AppState::new(contacts.clone(), config.server.strict_status);

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    tracing::info!(
        bind = %config.server.bind,
        db = %config.db.path().display(),
        collection = %config.db.collection,
        strict_status = config.server.strict_status,
        "contact server listening"
    );

    let result = serve(listener, state, shutdown_signal()).await;
    contacts.close().await;
    tracing::info!("contact server stopped");
    result
}

/// Serve the contact API on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

// ============ Response bodies ============

/// `{"message": "..."}`
#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
}

/// `{"error": "..."}` for missing or unchanged contacts.
#[derive(Serialize)]
struct MissBody {
    error: &'static str,
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"validation_error"`, `"internal"`).
    code: &'static str,
    /// Human-readable error message.
    message: String,
    /// Per-field validation messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    fields: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                fields: self.fields,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Validation(errors) => {
                let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| error.code.to_string());
                        fields.entry(field.to_string()).or_default().push(message);
                    }
                }
                AppError {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    code: "validation_error",
                    message: "invalid contact fields".to_string(),
                    fields: Some(fields),
                }
            }
            ContactError::Storage(e) => {
                tracing::error!(error = %format!("{:#}", e), "storage failure");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "internal",
                    message: format!("{:#}", e),
                    fields: None,
                }
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let code = if status == StatusCode::UNPROCESSABLE_ENTITY {
            "validation_error"
        } else {
            "bad_request"
        };
        AppError {
            status,
            code,
            message: rejection.body_text(),
            fields: None,
        }
    }
}

// ============ GET / ============

async fn handle_root() -> Json<MessageBody> {
    Json(MessageBody { message: WELCOME })
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: &'static str,
    /// The crate version from `Cargo.toml`.
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ /contacts ============

async fn handle_create(
    State(state): State<AppState>,
    payload: Result<Json<ContactFields>, JsonRejection>,
) -> Result<Json<Contact>, AppError> {
    let Json(fields) = payload?;
    let contact = state.contacts.create(fields).await?;
    Ok(Json(contact))
}

async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, AppError> {
    Ok(Json(state.contacts.list_all().await?))
}

// ============ /contacts/{id} ============

async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    Ok(match state.contacts.get_by_id(&id).await? {
        Some(contact) => Json(contact).into_response(),
        None => state.miss(CONTACT_NOT_FOUND),
    })
}

/// Handler for `PUT /contacts/{id}`.
///
/// By default a missing id and a no-op update produce the same reply. The
/// store distinguishes them, and strict mode exposes the difference.
async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactFields>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(fields) = payload?;
    let outcome = state.contacts.update(&id, fields).await?;
    Ok(match (outcome, state.strict_status) {
        (UpdateOutcome::Updated(contact), _) => Json(contact).into_response(),
        (UpdateOutcome::Unchanged(contact), true) => Json(contact).into_response(),
        (UpdateOutcome::NotFound, true) => state.miss(CONTACT_NOT_FOUND),
        (UpdateOutcome::Unchanged(_) | UpdateOutcome::NotFound, false) => {
            state.miss(NOT_FOUND_OR_UNCHANGED)
        }
    })
}

async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    Ok(if state.contacts.delete(&id).await? {
        Json(MessageBody {
            message: CONTACT_DELETED,
        })
        .into_response()
    } else {
        state.miss(CONTACT_NOT_FOUND)
    })
}

// ============ GET /contacts/search/{query} ============

async fn handle_search(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<Contact>>, AppError> {
    Ok(Json(state.contacts.search(&query).await?))
}
