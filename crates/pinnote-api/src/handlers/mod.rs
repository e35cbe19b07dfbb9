//! HTTP handlers.

pub mod notes;

use axum::response::IntoResponse;
use axum::Json;
use utoipa::OpenApi;

use pinnote_core::{Category, DeleteNoteResponse, Note, NoteDraft};

use crate::error::ErrorBody;

/// OpenAPI document for the note routes. The same operations are also
/// served under `/api/notes`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pinnote API",
        description = "Personal notes with pinning, categories, tags, search and sorting"
    ),
    paths(
        notes::list_notes,
        notes::get_note,
        notes::create_note,
        notes::replace_note,
        notes::delete_note,
    ),
    components(schemas(Note, NoteDraft, Category, DeleteNoteResponse, ErrorBody)),
    tags(
        (name = "Notes", description = "Note CRUD and listing"),
        (name = "System", description = "Health checks and API description")
    )
)]
pub struct ApiDoc;

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
