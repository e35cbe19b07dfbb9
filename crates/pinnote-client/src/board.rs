//! View state for the notes board: the current listing, filter and sort
//! selection, and the single note editor.
//!
//! The board never filters or sorts locally. Every criteria change re-asks
//! the server, and each fetch is tagged with a generation so a slow
//! response cannot overwrite a newer one.

use tracing::{debug, warn};
use uuid::Uuid;

use pinnote_core::{
    Category, Note, NoteCriteria, NoteDraft, Result, SortKey, CATEGORIES, SORT_OPTIONS,
};

use crate::api::NoteSource;

pub const LOAD_FAILED: &str = "Failed to load notes. Please make sure the backend server is running.";
pub const CREATE_FAILED: &str = "Failed to create note. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update note. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete note. Please try again.";
pub const PIN_FAILED: &str = "Failed to pin/unpin note. Please try again.";

/// Category picker entries.
pub fn category_options() -> &'static [Category] {
    &CATEGORIES
}

/// Sort picker entries with their display labels.
pub fn sort_options() -> Vec<(SortKey, &'static str)> {
    SORT_OPTIONS.iter().map(|k| (*k, k.label())).collect()
}

/// Split comma-separated tag text, trimming each tag and dropping empties.
pub fn parse_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Whether the editor is composing a new note or editing a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Existing(Uuid),
}

/// Form state of the note editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDraft {
    pub mode: EditorMode,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    /// Category name, `""` for none.
    pub category: String,
    /// Comma-separated tag text as typed.
    pub tags: String,
}

impl EditorDraft {
    pub fn blank() -> Self {
        Self {
            mode: EditorMode::New,
            title: String::new(),
            content: String::new(),
            is_pinned: false,
            category: String::new(),
            tags: String::new(),
        }
    }

    /// Prefill from a stored note.
    pub fn from_note(note: &Note) -> Self {
        Self {
            mode: EditorMode::Existing(note.id),
            title: note.title.clone(),
            content: note.content.clone(),
            is_pinned: note.is_pinned,
            category: note.category_name().to_string(),
            tags: note.tags.join(", "),
        }
    }

    /// The form submits only with a non-blank title and content.
    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            is_pinned: Some(self.is_pinned),
            category: Some(self.category.clone()),
            tags: Some(parse_tags(&self.tags)),
        }
    }
}

/// A listing request issued by [`NoteBoard::begin_fetch`].
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub generation: u64,
    pub criteria: NoteCriteria,
}

/// Notes board state over a [`NoteSource`].
pub struct NoteBoard<S> {
    source: S,
    criteria: NoteCriteria,
    notes: Vec<Note>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    editor: Option<EditorDraft>,
    generation: u64,
}

impl<S: NoteSource> NoteBoard<S> {
    /// A board with default criteria and nothing loaded yet. Call
    /// [`refresh`](Self::refresh) to load.
    pub fn new(source: S) -> Self {
        Self {
            source,
            criteria: NoteCriteria::default(),
            notes: Vec::new(),
            loading: false,
            error: None,
            notice: None,
            editor: None,
            generation: 0,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn criteria(&self) -> &NoteCriteria {
        &self.criteria
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Listing failure message, shown in place of the notes.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last mutation failure message; the listing is kept.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn editor(&self) -> Option<&EditorDraft> {
        self.editor.as_ref()
    }

    /// Mutable access for binding form inputs.
    pub fn editor_mut(&mut self) -> Option<&mut EditorDraft> {
        self.editor.as_mut()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // -------------------------------------------------------------------------
    // Listing
    // -------------------------------------------------------------------------

    /// Start a listing fetch with the current criteria.
    ///
    /// Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            generation: self.generation,
            criteria: self.criteria.clone(),
        }
    }

    /// Apply a fetch result. Returns false, changing nothing, when the
    /// ticket is older than the latest one issued.
    pub fn finish_fetch(&mut self, generation: u64, result: Result<Vec<Note>>) -> bool {
        if generation != self.generation {
            debug!(
                subsystem = "client",
                component = "board",
                generation,
                latest = self.generation,
                "Discarding stale listing response"
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(notes) => {
                self.notes = notes;
                self.error = None;
            }
            Err(e) => {
                warn!(subsystem = "client", op = "list", error = %e, "Note listing failed");
                self.error = Some(LOAD_FAILED.to_string());
            }
        }
        true
    }

    /// Fetch the listing for the current criteria.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.source.fetch_notes(&ticket.criteria).await;
        self.finish_fetch(ticket.generation, result);
    }

    /// Manual retry after a failed load. Nothing retries automatically.
    pub async fn retry(&mut self) {
        self.refresh().await;
    }

    pub async fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.criteria.search_term = (!term.is_empty()).then_some(term);
        self.refresh().await;
    }

    /// Select a category filter; `""` clears it.
    pub async fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        self.criteria.category = (!category.is_empty()).then_some(category);
        self.refresh().await;
    }

    pub async fn set_sort(&mut self, sort: SortKey) {
        self.criteria.sort = sort;
        self.refresh().await;
    }

    // -------------------------------------------------------------------------
    // Editor
    // -------------------------------------------------------------------------

    pub fn open_new(&mut self) {
        self.editor = Some(EditorDraft::blank());
    }

    pub fn open_edit(&mut self, note: &Note) {
        self.editor = Some(EditorDraft::from_note(note));
    }

    pub fn cancel(&mut self) {
        self.editor = None;
    }

    /// Submit the editor. Creates or replaces depending on its mode, then
    /// closes it and refetches.
    ///
    /// Returns false without a request when the form is incomplete, and false
    /// with the editor still open when the request fails.
    pub async fn submit(&mut self) -> bool {
        let Some(editor) = self.editor.as_ref().filter(|e| e.can_submit()) else {
            return false;
        };
        let draft = editor.to_draft();

        let (result, failure) = match editor.mode {
            EditorMode::New => (self.source.create_note(&draft).await, CREATE_FAILED),
            EditorMode::Existing(id) => (self.source.replace_note(id, &draft).await, UPDATE_FAILED),
        };

        match result {
            Ok(_) => {
                self.editor = None;
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(subsystem = "client", op = "submit", error = %e, "Saving note failed");
                self.notice = Some(failure.to_string());
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Row actions
    // -------------------------------------------------------------------------

    /// Flip a listed note's pin by resupplying all of its fields.
    pub async fn toggle_pin(&mut self, id: Uuid) -> bool {
        let Some(note) = self.notes.iter().find(|n| n.id == id) else {
            return false;
        };
        let mut draft = NoteDraft::from(note);
        draft.is_pinned = Some(!note.is_pinned);

        match self.source.replace_note(id, &draft).await {
            Ok(_) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(
                    subsystem = "client",
                    op = "toggle_pin",
                    note_id = %id,
                    error = %e,
                    "Pin toggle failed"
                );
                self.notice = Some(PIN_FAILED.to_string());
                false
            }
        }
    }

    /// Delete a note. Asking the user to confirm is the caller's job.
    pub async fn delete(&mut self, id: Uuid) -> bool {
        match self.source.delete_note(id).await {
            Ok(_) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(
                    subsystem = "client",
                    op = "delete",
                    note_id = %id,
                    error = %e,
                    "Delete failed"
                );
                self.notice = Some(DELETE_FAILED.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use pinnote_core::{apply, validate, Error};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-process source that runs the real validation and query engine.
    #[derive(Default)]
    struct FakeSource {
        notes: Mutex<Vec<Note>>,
        fail: AtomicBool,
        fetches: AtomicUsize,
        ticks: AtomicUsize,
    }

    impl FakeSource {
        fn failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn check(&self) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                Err(Error::Request("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl NoteSource for FakeSource {
        async fn fetch_notes(&self, criteria: &NoteCriteria) -> Result<Vec<Note>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            let notes = self.notes.lock().unwrap().clone();
            Ok(apply(notes, criteria))
        }

        async fn create_note(&self, draft: &NoteDraft) -> Result<Note> {
            self.check()?;
            let fields = validate(draft)?;
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst) as i64;
            let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(tick);
            let note = Note {
                id: Uuid::new_v4(),
                title: fields.title,
                content: fields.content,
                is_pinned: fields.is_pinned,
                category: fields.category,
                tags: fields.tags,
                created_at: at,
                updated_at: at,
            };
            self.notes.lock().unwrap().push(note.clone());
            Ok(note)
        }

        async fn replace_note(&self, id: Uuid, draft: &NoteDraft) -> Result<Note> {
            self.check()?;
            let fields = validate(draft)?;
            let mut notes = self.notes.lock().unwrap();
            let note = notes
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or(Error::NoteNotFound(id))?;
            note.title = fields.title;
            note.content = fields.content;
            note.is_pinned = fields.is_pinned;
            note.category = fields.category;
            note.tags = fields.tags;
            Ok(note.clone())
        }

        async fn delete_note(&self, id: Uuid) -> Result<Note> {
            self.check()?;
            let mut notes = self.notes.lock().unwrap();
            let index = notes
                .iter()
                .position(|n| n.id == id)
                .ok_or(Error::NoteNotFound(id))?;
            Ok(notes.remove(index))
        }
    }

    async fn board_with(titles: &[&str]) -> NoteBoard<FakeSource> {
        let mut board = NoteBoard::new(FakeSource::default());
        for title in titles {
            board.open_new();
            let editor = board.editor_mut().unwrap();
            editor.title = title.to_string();
            editor.content = format!("{} body", title);
            assert!(board.submit().await);
        }
        board
    }

    fn titles<S: NoteSource>(board: &NoteBoard<S>) -> Vec<&str> {
        board.notes().iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn test_parse_tags_trims_and_drops_empty() {
        assert_eq!(parse_tags(" a, b ,, c ,"), vec!["a", "b", "c"]);
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn test_sort_options_have_labels() {
        let labels: Vec<&str> = sort_options().into_iter().map(|(_, l)| l).collect();
        assert_eq!(
            labels,
            ["Newest First", "Oldest First", "Title (A-Z)", "Recently Updated"]
        );
        assert_eq!(category_options().len(), 5);
    }

    #[test]
    fn test_editor_prefills_from_note() {
        let at = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap();
        let note = Note {
            id: Uuid::new_v4(),
            title: "Trip".into(),
            content: "Pack".into(),
            is_pinned: true,
            category: Some(Category::Personal),
            tags: vec!["travel".into(), "summer".into()],
            created_at: at,
            updated_at: at,
        };
        let draft = EditorDraft::from_note(&note);
        assert_eq!(draft.mode, EditorMode::Existing(note.id));
        assert_eq!(draft.tags, "travel, summer");
        assert_eq!(draft.category, "Personal");
        assert_eq!(draft.to_draft().tags, Some(note.tags.clone()));
    }

    #[tokio::test]
    async fn test_submit_creates_and_refetches() {
        let board = board_with(&["first", "second"]).await;
        assert!(board.editor().is_none());
        assert!(!board.is_loading());
        assert_eq!(titles(&board), ["second", "first"]);
    }

    #[tokio::test]
    async fn test_incomplete_form_is_not_submitted() {
        let mut board = NoteBoard::new(FakeSource::default());
        board.open_new();
        board.editor_mut().unwrap().title = "only title".into();

        assert!(!board.submit().await);
        assert!(board.editor().is_some());
        assert_eq!(board.source().fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_edit_replaces_existing_note() {
        let mut board = board_with(&["draft"]).await;
        let note = board.notes()[0].clone();

        board.open_edit(&note);
        board.editor_mut().unwrap().title = "final".into();
        assert!(board.submit().await);

        assert_eq!(titles(&board), ["final"]);
        assert_eq!(board.notes()[0].id, note.id);
    }

    #[tokio::test]
    async fn test_criteria_changes_refetch_from_source() {
        let mut board = board_with(&["Milk run", "Standup", "Almond milk"]).await;

        board.set_search_term("MILK").await;
        assert_eq!(titles(&board), ["Almond milk", "Milk run"]);

        board.set_sort(SortKey::Title).await;
        assert_eq!(titles(&board), ["Almond milk", "Milk run"]);
        assert_eq!(board.criteria().sort, SortKey::Title);

        board.set_search_term("").await;
        assert_eq!(board.criteria().search_term, None);
        assert_eq!(titles(&board), ["Almond milk", "Milk run", "Standup"]);

        board.set_category("Work").await;
        assert!(board.notes().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_pin_moves_note_first() {
        let mut board = board_with(&["older", "newer"]).await;
        let older = board.notes()[1].id;

        assert!(board.toggle_pin(older).await);
        assert_eq!(titles(&board), ["older", "newer"]);
        assert!(board.notes()[0].is_pinned);
        assert_eq!(board.notes()[0].content, "older body");
    }

    #[tokio::test]
    async fn test_load_failure_sets_error_and_retry_recovers() {
        let mut board = board_with(&["kept"]).await;
        board.source().failing(true);

        board.refresh().await;
        assert_eq!(board.error(), Some(LOAD_FAILED));
        assert!(!board.is_loading());

        board.source().failing(false);
        board.retry().await;
        assert_eq!(board.error(), None);
        assert_eq!(titles(&board), ["kept"]);
    }

    #[tokio::test]
    async fn test_mutation_failure_keeps_listing_and_editor() {
        let mut board = board_with(&["kept"]).await;
        let id = board.notes()[0].id;
        board.source().failing(true);

        board.open_new();
        let editor = board.editor_mut().unwrap();
        editor.title = "new".into();
        editor.content = "body".into();
        assert!(!board.submit().await);
        assert_eq!(board.notice(), Some(CREATE_FAILED));
        assert!(board.editor().is_some());

        assert!(!board.delete(id).await);
        assert_eq!(board.notice(), Some(DELETE_FAILED));

        assert!(!board.toggle_pin(id).await);
        assert_eq!(board.notice(), Some(PIN_FAILED));

        assert_eq!(titles(&board), ["kept"]);
        board.dismiss_notice();
        assert_eq!(board.notice(), None);
    }

    #[tokio::test]
    async fn test_delete_removes_note_after_refetch() {
        let mut board = board_with(&["a", "b"]).await;
        let id = board.notes()[0].id;

        assert!(board.delete(id).await);
        assert_eq!(titles(&board), ["a"]);
    }

    #[test]
    fn test_stale_fetch_result_is_ignored() {
        let mut board = NoteBoard::new(FakeSource::default());
        let first = board.begin_fetch();
        let second = board.begin_fetch();

        assert!(board.finish_fetch(second.generation, Ok(vec![])));
        assert!(!board.is_loading());

        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let late = vec![Note {
            id: Uuid::new_v4(),
            title: "stale".into(),
            content: "x".into(),
            is_pinned: false,
            category: None,
            tags: vec![],
            created_at: at,
            updated_at: at,
        }];
        assert!(!board.finish_fetch(first.generation, Ok(late)));
        assert!(board.notes().is_empty());
    }
}
