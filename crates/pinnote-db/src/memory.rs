//! In-memory note repository for tests and ephemeral runs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use pinnote_core::{new_v7, Error, Note, NoteFields, NoteRepository, Result};

/// NoteRepository backed by a vector kept in insertion order.
///
/// Clones share the same underlying storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryNoteRepository {
    notes: Arc<RwLock<Vec<Note>>>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing notes, kept in the given order.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: Arc::new(RwLock::new(notes)),
        }
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn create(&self, fields: NoteFields) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: new_v7(),
            title: fields.title,
            content: fields.content,
            is_pinned: fields.is_pinned,
            category: fields.category,
            tags: fields.tags,
            created_at: now,
            updated_at: now,
        };

        self.notes.write().await.push(note.clone());
        debug!(
            subsystem = "db",
            component = "memory_notes",
            op = "create",
            note_id = %note.id,
            "Note created"
        );
        Ok(note)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        self.notes
            .read()
            .await
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        Ok(self.notes.read().await.clone())
    }

    async fn replace(&self, id: Uuid, fields: NoteFields) -> Result<Note> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;

        note.title = fields.title;
        note.content = fields.content;
        note.is_pinned = fields.is_pinned;
        note.category = fields.category;
        note.tags = fields.tags;
        note.updated_at = Utc::now().max(note.created_at);

        debug!(
            subsystem = "db",
            component = "memory_notes",
            op = "replace",
            note_id = %id,
            "Note replaced"
        );
        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Note> {
        let mut notes = self.notes.write().await;
        let index = notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;
        let removed = notes.remove(index);

        debug!(
            subsystem = "db",
            component = "memory_notes",
            op = "delete",
            note_id = %id,
            "Note deleted"
        );
        Ok(removed)
    }
}
