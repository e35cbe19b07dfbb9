//! # pinnote-core
//!
//! Core types, traits, and the query engine for pinnote.
//!
//! This crate provides the note entity, the validation rules shared by the
//! create and replace paths, the pure query engine that filters and orders a
//! note listing, and the repository trait that storage backends implement.

pub mod defaults;
pub mod error;
pub mod models;
pub mod query;
pub mod traits;
pub mod uuid_utils;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use query::{apply, compare_titles, NoteCriteria, SortKey, SORT_OPTIONS};
pub use traits::*;
pub use uuid_utils::new_v7;
pub use validation::{validate, NoteFields};
