//! HTTP server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Single-page UI |
//! | `GET`  | `/notes` | JSON array of every note |
//! | `POST` | `/notes` | Create a note from `{title, content}` |
//! | `GET`  | `/notes/{id}` | HTML view of one note |
//! | `GET`  | `/notes/raw/{id}` | Note content as plain text |
//!
//! Anything else, including a known path with the wrong method, is a
//! plain-text `404 Not Found`.
//!
//! # Error Contract
//!
//! Missing fields on creation are a `400` with a JSON body:
//!
//! ```json
//! { "message": "Title and Content are required." }
//! ```
//!
//! Upstream, configuration, and parse failures are logged and surfaced as a
//! plain-text `500`; no internal detail reaches the client.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::NoteError;
use crate::models::CreateNote;
use crate::notes::NoteService;
use crate::pages::{render_note_page, INDEX_HTML};

pub const MISSING_FIELDS: &str = "Title and Content are required.";
pub const INVALID_JSON: &str = "Request body must be a JSON object.";
pub const NOTE_NOT_FOUND: &str = "Note not found";
pub const RAW_NOTE_NOT_FOUND: &str = "Raw note not found. Make sure the note ID is correct.";

/// Starts the server on `[server].bind` and runs until Ctrl+C.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    if config.repository.backend == "github" && config.repository.token.is_none() {
        tracing::warn!(
            env = %config.repository.token_env,
            "no GitHub token configured; note creation will fail"
        );
    }
    if config.filter.is_enabled() && config.filter.api_key.is_none() {
        tracing::warn!(
            env = %config.filter.key_env,
            "no Gemini API key configured; note creation will fail"
        );
    }

    let service = NoteService::from_config(config)?;
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        addr = %config.server.bind,
        repo = %format!("{}/{}", config.repository.owner, config.repository.name),
        "notes server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

/// Builds the router over a [`NoteService`].
pub fn router(service: NoteService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/notes", get(handle_list).post(handle_create))
        .route("/notes/{id}", get(handle_note_page))
        .route("/notes/raw/{id}", get(handle_raw_note))
        .fallback(handle_not_found)
        .method_not_allowed_fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

// ============ Error response ============

#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
}

/// Everything a handler can fail with.
enum AppError {
    /// Client input error, answered with a JSON message.
    BadRequest(&'static str),
    /// Any upstream, configuration, or parse failure.
    Internal(NoteError),
}

impl From<NoteError> for AppError {
    fn from(err: NoteError) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(MessageBody { message })).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

// ============ Handlers ============

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Handler for `GET /notes`.
async fn handle_list(State(service): State<NoteService>) -> Result<Response, AppError> {
    let notes = service.list().await?;
    Ok(Json(notes).into_response())
}

/// Handler for `POST /notes`.
///
/// The body is read as raw bytes so that malformed JSON is a `400` in the
/// same shape as missing fields, rather than axum's default rejection.
/// Fields that are not strings count as missing.
async fn handle_create(
    State(service): State<NoteService>,
    body: Bytes,
) -> Result<Response, AppError> {
    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| AppError::BadRequest(INVALID_JSON))?;
    if !value.is_object() {
        return Err(AppError::BadRequest(INVALID_JSON));
    }
    let request: CreateNote = serde_json::from_value(value).unwrap_or_default();

    let (title, content) = request
        .required_fields()
        .ok_or(AppError::BadRequest(MISSING_FIELDS))?;

    let note = service.create(title, content).await?;
    Ok((StatusCode::CREATED, Json(note)).into_response())
}

/// Handler for `GET /notes/{id}`.
async fn handle_note_page(
    State(service): State<NoteService>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    // `/notes/raw` without an id is not a note.
    if id == "raw" {
        return Ok(handle_not_found().await.into_response());
    }

    match service.get(&id).await? {
        Some(note) => Ok(Html(render_note_page(&note)).into_response()),
        None => Ok((StatusCode::NOT_FOUND, NOTE_NOT_FOUND).into_response()),
    }
}

/// Handler for `GET /notes/raw/{id}`.
async fn handle_raw_note(
    State(service): State<NoteService>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    tracing::debug!(note_id = %id, "raw note requested");

    match service.get(&id).await? {
        Some(note) => Ok(note.content.into_response()),
        None => Ok((StatusCode::NOT_FOUND, RAW_NOTE_NOT_FOUND).into_response()),
    }
}
