//! Note query engine.
//!
//! Given the full note collection and a [`NoteCriteria`], [`apply`] returns
//! the matching notes in display order. This is the only place filtering and
//! ordering rules live; the server runs it over the store's listing and the
//! client sends its criteria to the server instead of re-deriving results.
//!
//! ## Rules
//!
//! Filters are AND-combined and each is skipped when absent:
//! - `search_term`: case-insensitive substring of the title or the content
//! - `category`: exact, case-sensitive match on the category name
//! - `tag`: exact membership in the tag list
//!
//! Ordering always puts pinned notes first. Inside the pinned and unpinned
//! partitions the [`SortKey`] applies. The sort is stable, so notes equal
//! under the key keep their storage order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::trace;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::Note;

// =============================================================================
// SORT KEY
// =============================================================================

/// Ordering applied within the pinned and unpinned partitions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// `createdAt` descending.
    #[default]
    Newest,
    /// `createdAt` ascending.
    Oldest,
    /// `updatedAt` descending.
    Updated,
    /// Title ascending, locale-aware.
    Title,
}

/// Sort keys in the order a picker shows them.
pub const SORT_OPTIONS: [SortKey; 4] = [
    SortKey::Newest,
    SortKey::Oldest,
    SortKey::Title,
    SortKey::Updated,
];

impl SortKey {
    /// Wire name, as accepted in the `sort` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Updated => "updated",
            SortKey::Title => "title",
        }
    }

    /// Human-readable label for a sort picker.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest First",
            SortKey::Oldest => "Oldest First",
            SortKey::Updated => "Recently Updated",
            SortKey::Title => "Title (A-Z)",
        }
    }

    fn compare(&self, a: &Note, b: &Note) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Oldest => a.created_at.cmp(&b.created_at),
            SortKey::Updated => b.updated_at.cmp(&a.updated_at),
            SortKey::Title => compare_titles(&a.title, &b.title),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    /// Never fails: unknown names fall back to [`SortKey::Newest`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "oldest" => SortKey::Oldest,
            "updated" => SortKey::Updated,
            "title" => SortKey::Title,
            _ => SortKey::Newest,
        })
    }
}

// =============================================================================
// CRITERIA
// =============================================================================

/// Filter and sort selection for a note listing.
///
/// Serializes to the listing endpoint's query parameters
/// (`search`, `category`, `tag`, `sort`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteCriteria {
    #[serde(rename = "search", skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub sort: SortKey,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl NoteCriteria {
    /// Build criteria from raw request parameters.
    ///
    /// Empty strings mean "unset" for every filter, and an unknown or
    /// missing sort name means [`SortKey::Newest`].
    pub fn from_params(
        search: Option<String>,
        category: Option<String>,
        tag: Option<String>,
        sort: Option<&str>,
    ) -> Self {
        Self {
            search_term: non_empty(search),
            category: non_empty(category),
            tag: non_empty(tag),
            sort: sort
                .map(|s| s.parse().unwrap_or_default())
                .unwrap_or_default(),
        }
    }

    /// True when no filter is active (sorting still applies).
    pub fn is_unfiltered(&self) -> bool {
        self.search_term.is_none() && self.category.is_none() && self.tag.is_none()
    }
}

/// Criteria with the search needle lowercased once up front.
struct Matcher<'a> {
    needle: Option<String>,
    category: Option<&'a str>,
    tag: Option<&'a str>,
}

impl<'a> Matcher<'a> {
    fn new(criteria: &'a NoteCriteria) -> Self {
        Self {
            needle: criteria.search_term.as_deref().map(str::to_lowercase),
            category: criteria.category.as_deref(),
            tag: criteria.tag.as_deref(),
        }
    }

    fn matches(&self, note: &Note) -> bool {
        if let Some(needle) = &self.needle {
            let hit = note.title.to_lowercase().contains(needle.as_str())
                || note.content.to_lowercase().contains(needle.as_str());
            if !hit {
                return false;
            }
        }
        if let Some(category) = self.category {
            if note.category_name() != category {
                return false;
            }
        }
        if let Some(tag) = self.tag {
            if !note.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Filter and order `notes` according to `criteria`.
///
/// `notes` must be in storage order; that order breaks ties.
pub fn apply(notes: Vec<Note>, criteria: &NoteCriteria) -> Vec<Note> {
    let input_count = notes.len();
    let matcher = Matcher::new(criteria);

    let mut selected: Vec<Note> = notes.into_iter().filter(|n| matcher.matches(n)).collect();
    // slice::sort_by is stable
    selected.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| criteria.sort.compare(a, b))
    });

    trace!(
        subsystem = "query",
        input_count,
        result_count = selected.len(),
        filtered = !criteria.is_unfiltered(),
        sort = criteria.sort.as_str(),
        "Applied note criteria"
    );
    selected
}

// =============================================================================
// TITLE COLLATION
// =============================================================================

/// Primary weight group: spaces, punctuation and symbols, then digits, then
/// letters.
fn char_class(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

fn base_letters(s: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| (char_class(c), c))
}

fn accented_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// Lowercase before uppercase at the first position differing only by case.
fn case_order(a: &str, b: &str) -> Ordering {
    for (ca, cb) in a.nfd().zip(b.nfd()) {
        if ca == cb {
            continue;
        }
        return match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => ca.cmp(&cb),
        };
    }
    a.nfd().count().cmp(&b.nfd().count())
}

/// Locale-aware title comparison.
///
/// Three levels, each consulted only when the previous one ties: base
/// characters ignoring accents and case, then accents, then case with
/// lowercase first. At the base level punctuation and symbols sort before
/// digits and digits before letters. So `"~x" < "2x" < "apple" < "Banana"`,
/// `"resume" < "résumé" < "rope"`, and `"alpha" < "Alpha"`.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| case_order(a, b))
}
