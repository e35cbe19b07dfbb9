//! Core data models for pinnote.
//!
//! These types are shared by the server, the storage backends, and the
//! client, and they define the JSON shape of a note on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// CATEGORY
// =============================================================================

/// Closed set of note categories. A note may also have no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Category {
    Personal,
    Work,
    Ideas,
    Important,
    Other,
}

/// Every category, in display order.
///
/// Validation, the database check constraint, and the client's pickers all
/// derive from this list.
pub const CATEGORIES: [Category; 5] = [
    Category::Personal,
    Category::Work,
    Category::Ideas,
    Category::Important,
    Category::Other,
];

impl Category {
    /// Wire and storage name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Ideas => "Ideas",
            Category::Important => "Important",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Case-sensitive: `"work"` is not a category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORIES
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::validation("invalid category"))
    }
}

/// Render an optional category the way the wire and the store do: the
/// category name, or the empty string for "no category".
pub fn category_str(category: Option<Category>) -> &'static str {
    category.map(|c| c.as_str()).unwrap_or("")
}

/// Serde adapter mapping `Option<Category>` to `""` / `"Work"` etc.
pub mod category_field {
    use super::Category;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Category>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(super::category_str(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Category>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(de::Error::custom)
    }
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A stored note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    /// Category name, or `""` when the note has none.
    #[serde(with = "category_field")]
    #[schema(value_type = String, example = "Work")]
    pub category: Option<Category>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Category as it appears on the wire (`""` for none).
    pub fn category_name(&self) -> &'static str {
        category_str(self.category)
    }
}

/// Unvalidated note input for create and full-replacement update.
///
/// Every field is optional at this layer so that missing values reach
/// validation and produce its messages rather than a deserializer error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Strings; scalar numbers and booleans are accepted and stringified.
    #[serde(
        default,
        deserialize_with = "tags_field::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
}

impl From<&Note> for NoteDraft {
    /// Draft that resupplies every field of an existing note.
    fn from(note: &Note) -> Self {
        Self {
            title: Some(note.title.clone()),
            content: Some(note.content.clone()),
            is_pinned: Some(note.is_pinned),
            category: Some(note.category_name().to_string()),
            tags: Some(note.tags.clone()),
        }
    }
}

/// Lenient tag coercion: `["a", 1, true]` → `["a", "1", "true"]`, and a
/// lone scalar becomes a one-element list. Nested structures are rejected.
pub mod tags_field {
    use serde::{de, Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| {
                    scalar_to_string(item).ok_or_else(|| de::Error::custom("invalid tags"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => scalar_to_string(other)
                .map(|s| Some(vec![s]))
                .ok_or_else(|| de::Error::custom("invalid tags")),
        }
    }
}

/// Response body for a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteNoteResponse {
    pub message: String,
    pub note: Note,
}

/// Message returned alongside a deleted note.
pub const NOTE_DELETED_MESSAGE: &str = "Note deleted successfully";
