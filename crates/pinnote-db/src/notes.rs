//! PostgreSQL note repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};
use uuid::Uuid;

use pinnote_core::{
    category_str, new_v7, Category, Error, Note, NoteFields, NoteRepository, Result,
};

/// Columns selected for every note read, in `map_row_to_note` order.
const NOTE_COLUMNS: &str =
    "id, title, content, is_pinned, category, tags, created_at_utc, updated_at_utc";

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a database row to a Note.
fn map_row_to_note(row: &PgRow) -> Result<Note> {
    let category: String = row.try_get("category")?;
    let category = if category.is_empty() {
        None
    } else {
        Some(category.parse::<Category>().map_err(|_| {
            Error::Internal(format!("stored note has unknown category {:?}", category))
        })?)
    };

    Ok(Note {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        is_pinned: row.try_get("is_pinned")?,
        category,
        tags: row.try_get("tags")?,
        created_at: row.try_get("created_at_utc")?,
        updated_at: row.try_get("updated_at_utc")?,
    })
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn create(&self, fields: NoteFields) -> Result<Note> {
        let id = new_v7();
        let now = Utc::now();

        let sql = format!(
            "INSERT INTO note (id, title, content, is_pinned, category, tags, created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.content)
            .bind(fields.is_pinned)
            .bind(category_str(fields.category))
            .bind(&fields.tags)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "pg_notes",
            op = "create",
            note_id = %id,
            "Note created"
        );
        map_row_to_note(&row)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        let sql = format!("SELECT {} FROM note WHERE id = $1", NOTE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;
        map_row_to_note(&row)
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {} FROM note ORDER BY created_at_utc ASC, id ASC",
            NOTE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "pg_notes",
            op = "list_all",
            result_count = rows.len(),
            "Listed notes"
        );
        rows.iter().map(map_row_to_note).collect()
    }

    async fn replace(&self, id: Uuid, fields: NoteFields) -> Result<Note> {
        // GREATEST keeps updated_at >= created_at even if the clock steps back.
        let sql = format!(
            "UPDATE note
             SET title = $2, content = $3, is_pinned = $4, category = $5, tags = $6,
                 updated_at_utc = GREATEST($7, created_at_utc)
             WHERE id = $1
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.content)
            .bind(fields.is_pinned)
            .bind(category_str(fields.category))
            .bind(&fields.tags)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;

        info!(
            subsystem = "db",
            component = "pg_notes",
            op = "replace",
            note_id = %id,
            "Note replaced"
        );
        map_row_to_note(&row)
    }

    async fn delete(&self, id: Uuid) -> Result<Note> {
        let sql = format!("DELETE FROM note WHERE id = $1 RETURNING {}", NOTE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;

        info!(
            subsystem = "db",
            component = "pg_notes",
            op = "delete",
            note_id = %id,
            "Note deleted"
        );
        map_row_to_note(&row)
    }
}
