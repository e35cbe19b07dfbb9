//! Note CRUD handlers.

use std::time::Instant;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use utoipa::IntoParams;
use uuid::Uuid;

use pinnote_core::{
    apply, validate, DeleteNoteResponse, Note, NoteCriteria, NoteDraft, NOTE_DELETED_MESSAGE,
};

use crate::error::{ApiError, ErrorBody, NOTE_NOT_FOUND};
use crate::AppState;

/// Listing filters. Empty values are ignored; an unknown `sort` means
/// `newest`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesQuery {
    /// Case-insensitive substring of title or content.
    pub search: Option<String>,
    /// Exact category name.
    pub category: Option<String>,
    /// Exact tag.
    pub tag: Option<String>,
    /// One of `newest`, `oldest`, `updated`, `title`.
    pub sort: Option<String>,
}

impl From<ListNotesQuery> for NoteCriteria {
    fn from(q: ListNotesQuery) -> Self {
        NoteCriteria::from_params(q.search, q.category, q.tag, q.sort.as_deref())
    }
}

/// A path id that is not a UUID cannot name a stored note.
fn note_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound(NOTE_NOT_FOUND.to_string()))
}

/// Decode a request body into a draft, reporting malformed JSON and
/// wrongly-typed fields as bad requests.
fn parse_draft(body: Result<Json<Value>, JsonRejection>) -> Result<NoteDraft, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// List notes matching the filters, pinned first.
#[utoipa::path(
    get,
    path = "/notes",
    tag = "Notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "Matching notes in display order", body = [Note]),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<ListNotesQuery>, QueryRejection>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let start = Instant::now();
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let criteria = NoteCriteria::from(query);

    let notes = state
        .store
        .list_all()
        .await
        .map_err(ApiError::op("Failed to fetch notes"))?;
    let input_count = notes.len();
    let notes = apply(notes, &criteria);

    debug!(
        subsystem = "api",
        component = "notes",
        op = "list",
        sort = criteria.sort.as_str(),
        input_count,
        result_count = notes.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Listed notes"
    );
    Ok(Json(notes))
}

/// Fetch one note.
#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, body = Note),
        (status = 404, description = "No such note", body = ErrorBody)
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = note_id(path)?;
    let note = state
        .store
        .fetch(id)
        .await
        .map_err(ApiError::op("Failed to fetch note"))?;
    Ok(Json(note))
}

/// Create a note.
#[utoipa::path(
    post,
    path = "/notes",
    tag = "Notes",
    request_body = NoteDraft,
    responses(
        (status = 201, description = "Created note", body = Note),
        (status = 400, description = "Validation failure", body = ErrorBody)
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let draft = parse_draft(body)?;
    let fields = validate(&draft)?;
    let note = state
        .store
        .create(fields)
        .await
        .map_err(ApiError::op("Failed to create note"))?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "create",
        note_id = %note.id,
        "Note created"
    );
    Ok((StatusCode::CREATED, Json(note)))
}

/// Replace every mutable field of a note.
#[utoipa::path(
    put,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = NoteDraft,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 400, description = "Validation failure", body = ErrorBody),
        (status = 404, description = "No such note", body = ErrorBody)
    )
)]
pub async fn replace_note(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let draft = parse_draft(body)?;
    let fields = validate(&draft)?;
    let id = note_id(path)?;
    let note = state
        .store
        .replace(id, fields)
        .await
        .map_err(ApiError::op("Failed to update note"))?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "replace",
        note_id = %id,
        "Note updated"
    );
    Ok(Json(note))
}

/// Permanently delete a note.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "Deleted note", body = DeleteNoteResponse),
        (status = 404, description = "No such note", body = ErrorBody)
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeleteNoteResponse>, ApiError> {
    let id = note_id(path)?;
    let note = state
        .store
        .delete(id)
        .await
        .map_err(ApiError::op("Failed to delete note"))?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "delete",
        note_id = %id,
        "Note deleted"
    );
    Ok(Json(DeleteNoteResponse {
        message: NOTE_DELETED_MESSAGE.to_string(),
        note,
    }))
}
