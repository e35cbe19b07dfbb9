//! HTTP client for the pinnote notes API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use pinnote_core::defaults::{CLIENT_API_URL, CLIENT_TIMEOUT_SECS};
use pinnote_core::{DeleteNoteResponse, Error, Note, NoteCriteria, NoteDraft, Result};

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Notes collection URL, e.g. `http://localhost:5000/api/notes`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: CLIENT_API_URL.to_string(),
            timeout: Duration::from_secs(CLIENT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Read `PINNOTE_API_URL` and `PINNOTE_TIMEOUT_SECS`, defaulting each.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            base_url: std::env::var("PINNOTE_API_URL").unwrap_or(base.base_url),
            timeout: std::env::var("PINNOTE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(base.timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Remote note operations the board needs.
///
/// [`NotesClient`] is the production implementation; tests substitute an
/// in-process one.
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Notes matching `criteria`, already filtered and ordered by the server.
    async fn fetch_notes(&self, criteria: &NoteCriteria) -> Result<Vec<Note>>;

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note>;

    /// Full replacement: every field of `draft` is applied.
    async fn replace_note(&self, id: Uuid, draft: &NoteDraft) -> Result<Note>;

    async fn delete_note(&self, id: Uuid) -> Result<Note>;
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default)]
    message: Option<String>,
}

/// Typed client for the notes REST endpoints.
#[derive(Debug, Clone)]
pub struct NotesClient {
    client: Client,
    base_url: String,
}

impl NotesClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn note_url(&self, id: Uuid) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// List notes; the server applies filtering and ordering.
    pub async fn list(&self, criteria: &NoteCriteria) -> Result<Vec<Note>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(criteria)
            .send()
            .await?;
        let notes: Vec<Note> = decode(response, None).await?;
        debug!(
            subsystem = "client",
            op = "list",
            sort = criteria.sort.as_str(),
            result_count = notes.len(),
            "Fetched notes"
        );
        Ok(notes)
    }

    pub async fn get(&self, id: Uuid) -> Result<Note> {
        let response = self.client.get(self.note_url(id)).send().await?;
        decode(response, Some(id)).await
    }

    pub async fn create(&self, draft: &NoteDraft) -> Result<Note> {
        let response = self.client.post(&self.base_url).json(draft).send().await?;
        decode(response, None).await
    }

    pub async fn update(&self, id: Uuid, draft: &NoteDraft) -> Result<Note> {
        let response = self
            .client
            .put(self.note_url(id))
            .json(draft)
            .send()
            .await?;
        decode(response, Some(id)).await
    }

    /// Delete a note, returning it as it was.
    pub async fn delete(&self, id: Uuid) -> Result<Note> {
        let response = self.client.delete(self.note_url(id)).send().await?;
        let deleted: DeleteNoteResponse = decode(response, Some(id)).await?;
        Ok(deleted.note)
    }
}

/// Decode a success body, or map the status and error body to an [`Error`].
async fn decode<T: DeserializeOwned>(response: Response, id: Option<Uuid>) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        let bytes = response.bytes().await?;
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();

    Err(match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Error::NoteNotFound(id),
        (StatusCode::NOT_FOUND, None) => Error::NotFound(
            parsed.map(|e| e.error).unwrap_or_else(|| "Not found".to_string()),
        ),
        (StatusCode::BAD_REQUEST, _) => {
            Error::Validation(parsed.map(|e| e.error).unwrap_or(body))
        }
        _ => {
            let detail = match parsed {
                Some(ErrorResponse {
                    error,
                    message: Some(message),
                }) => format!("{}: {}", error, message),
                Some(ErrorResponse { error, .. }) => error,
                None => body,
            };
            Error::Request(format!("server returned {}: {}", status, detail))
        }
    })
}

#[async_trait]
impl NoteSource for NotesClient {
    async fn fetch_notes(&self, criteria: &NoteCriteria) -> Result<Vec<Note>> {
        self.list(criteria).await
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note> {
        self.create(draft).await
    }

    async fn replace_note(&self, id: Uuid, draft: &NoteDraft) -> Result<Note> {
        self.update(id, draft).await
    }

    async fn delete_note(&self, id: Uuid) -> Result<Note> {
        self.delete(id).await
    }
}
