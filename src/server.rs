//! HTTP API server for the contact book.
//!
//! Translates requests into [`ContactStore`] calls and maps the outcome onto
//! status codes. The store is handed in at construction time, so the same
//! router serves the SQLite backend in production and the in-memory backend
//! in tests.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `/api/contacts` | List contacts (`group`, `searchTerm`, `sortBy`, `sortDirection`) |
//! | `GET`    | `/api/contacts/{id}` | Fetch one contact |
//! | `POST`   | `/api/contacts` | Create a contact → `201` |
//! | `PATCH`  | `/api/contacts/{id}` | Partially update a contact |
//! | `DELETE` | `/api/contacts/{id}` | Delete a contact → `204` |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "validation_failed", "message": "...",
//!              "fields": [ { "field": "group", "message": "invalid group: ..." } ] } }
//! ```
//!
//! Error codes: `bad_request` (400), `validation_failed` (400),
//! `not_found` (404), `internal` (500). Storage failures are logged and
//! reported with a generic message only.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{FieldViolation, StorageError, ValidationError};
use crate::models::Contact;
use crate::store::{open_store, ContactStore};
use crate::validation::{parse_contact_edit, parse_filters, parse_new_contact, ListParams};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ContactStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }
}

/// Starts the HTTP server on `[server].bind` with the configured backend.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let app = build_router(store);

    let bind_addr = &config.server.bind;
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("contact book listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

/// The complete application: contact routes under `/api`, health check,
/// request tracing and permissive CORS.
pub fn build_router(store: Arc<dyn ContactStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .nest("/api", contact_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState::new(store))
}

/// Contact CRUD routes, relative to the mount point.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(handle_list).post(handle_create))
        .route(
            "/contacts/{id}",
            get(handle_get).patch(handle_update).delete(handle_delete),
        )
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldViolation>,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    fields: Vec<FieldViolation>,
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: message.into(),
            fields: Vec::new(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "not_found",
            message: message.into(),
            fields: Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
                fields: self.fields,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "validation_failed",
            message: err.to_string(),
            fields: err.violations,
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "storage failure");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal",
            message: "internal server error".to_string(),
            fields: Vec::new(),
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::bad_request(format!("invalid contact id: {}", raw)))
}

fn contact_not_found(id: i64) -> AppError {
    AppError::not_found(format!("contact not found: {}", id))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ /contacts ============

async fn handle_list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let Query(params) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
    let filters = parse_filters(&params)?;
    let contacts = state.store.list(&filters).await?;
    Ok(Json(contacts))
}

async fn handle_get(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Contact>, AppError> {
    let id = parse_id(&raw_id)?;
    let contact = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| contact_not_found(id))?;
    Ok(Json(contact))
}

async fn handle_create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let Json(body) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let new_contact = parse_new_contact(&body)?;
    let contact = state.store.create(new_contact).await?;
    tracing::info!(id = contact.id, "created contact");
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn handle_update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Contact>, AppError> {
    let id = parse_id(&raw_id)?;
    let Json(mut body) = body.map_err(|e| AppError::bad_request(e.body_text()))?;

    // the path id wins over any id in the body
    if let Some(obj) = body.as_object_mut() {
        obj.insert("id".to_string(), Value::from(id));
    }
    let (id, patch) = parse_contact_edit(&body)?;

    let contact = state
        .store
        .update(id, &patch)
        .await?
        .ok_or_else(|| contact_not_found(id))?;
    tracing::info!(id, "updated contact");
    Ok(Json(contact))
}

async fn handle_delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id)?;
    if state.store.delete(id).await? {
        tracing::info!(id, "deleted contact");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(contact_not_found(id))
    }
}
