//! Core traits for pinnote abstractions.
//!
//! The repository trait is the seam between the API surface and whichever
//! store backs it (PostgreSQL in production, in-memory for tests and
//! ephemeral runs).

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Note;
use crate::validation::NoteFields;

/// Repository for note CRUD operations.
///
/// Implementations own id assignment and timestamp maintenance. Inputs are
/// already validated [`NoteFields`]; a missing id is reported as
/// [`Error::NoteNotFound`](crate::Error::NoteNotFound).
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note, assigning its id and both timestamps.
    async fn create(&self, fields: NoteFields) -> Result<Note>;

    /// Fetch a note by id.
    async fn fetch(&self, id: Uuid) -> Result<Note>;

    /// List every note in storage (insertion) order.
    async fn list_all(&self) -> Result<Vec<Note>>;

    /// Overwrite every mutable field of a note and refresh `updated_at`.
    async fn replace(&self, id: Uuid, fields: NoteFields) -> Result<Note>;

    /// Permanently delete a note, returning it as it was.
    async fn delete(&self, id: Uuid) -> Result<Note>;
}
