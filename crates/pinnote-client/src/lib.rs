//! # pinnote-client
//!
//! Client side of pinnote: [`NotesClient`] talks to the REST API and
//! [`NoteBoard`] holds what a notes screen shows (listing, filters, editor).
//!
//! ```rust,ignore
//! use pinnote_client::{ClientConfig, NoteBoard, NotesClient};
//!
//! let client = NotesClient::new(ClientConfig::from_env())?;
//! let mut board = NoteBoard::new(client);
//! board.refresh().await;
//! board.set_search_term("milk").await;
//! ```

pub mod api;
pub mod board;

pub use api::{ClientConfig, NoteSource, NotesClient};
pub use board::{
    category_options, parse_tags, sort_options, EditorDraft, EditorMode, FetchTicket, NoteBoard,
};
