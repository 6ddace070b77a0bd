//! Application state aggregate and its pure transition function.
//!
//! # Responsibility
//! - Hold the single source of truth read by every view.
//! - Apply intents deterministically; no intent can fail.
//!
//! # Invariants
//! - `notes` holds at most one entry per id.
//! - `selected_id` is only cleared by `RemoveNote` of that id.
//! - `SetLoading(true)` always clears `error`.

use crate::model::note::{dedupe_tags, Note, NoteId};
use std::collections::HashSet;

/// Message stored when a failure carries no text of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Snapshot of client state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Current result set for the active filter.
    pub notes: Vec<Note>,
    /// Global tag catalogue, not scoped to the current filter.
    pub tags: Vec<String>,
    /// Free-text search filter.
    pub query: String,
    /// Tag filter; empty means none.
    pub active_tag: String,
    /// Note shown in the editor. May point at a note outside `notes`.
    pub selected_id: Option<NoteId>,
    /// True while a list-affecting fetch is in flight.
    pub loading: bool,
    /// Last error message.
    pub error: Option<String>,
}

impl AppState {
    /// Resolves the selection against the current result set.
    ///
    /// A selected id that is not part of `notes` renders as no selection.
    pub fn selected_note(&self) -> Option<&Note> {
        let selected = self.selected_id.as_ref()?;
        self.find_note(selected)
    }

    pub fn find_note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn is_selected(&self, id: &NoteId) -> bool {
        self.selected_id.as_ref() == Some(id)
    }
}

/// State change request, applied synchronously by `reduce`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetLoading(bool),
    SetError(String),
    SetNotes(Vec<Note>),
    SetTags(Vec<String>),
    SetQuery(String),
    SetActiveTag(String),
    Select(Option<NoteId>),
    UpsertNote(Note),
    RemoveNote(NoteId),
}

impl Intent {
    /// Short stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetLoading(_) => "set_loading",
            Self::SetError(_) => "set_error",
            Self::SetNotes(_) => "set_notes",
            Self::SetTags(_) => "set_tags",
            Self::SetQuery(_) => "set_query",
            Self::SetActiveTag(_) => "set_active_tag",
            Self::Select(_) => "select",
            Self::UpsertNote(_) => "upsert_note",
            Self::RemoveNote(_) => "remove_note",
        }
    }
}

/// Applies one intent to a state, producing the next state.
pub fn reduce(mut state: AppState, intent: Intent) -> AppState {
    match intent {
        Intent::SetLoading(loading) => {
            state.loading = loading;
            if loading {
                state.error = None;
            }
        }
        Intent::SetError(message) => {
            state.loading = false;
            state.error = Some(if message.is_empty() {
                UNKNOWN_ERROR_MESSAGE.to_string()
            } else {
                message
            });
        }
        Intent::SetNotes(notes) => {
            state.notes = dedupe_notes(notes);
            state.loading = false;
        }
        Intent::SetTags(tags) => {
            state.tags = dedupe_tags(tags);
        }
        Intent::SetQuery(query) => {
            state.query = query;
        }
        Intent::SetActiveTag(tag) => {
            state.active_tag = tag;
        }
        Intent::Select(id) => {
            state.selected_id = id;
        }
        Intent::UpsertNote(note) => {
            match state.notes.iter().position(|existing| existing.id == note.id) {
                Some(index) => state.notes[index] = note,
                None => state.notes.insert(0, note),
            }
        }
        Intent::RemoveNote(id) => {
            state.notes.retain(|note| note.id != id);
            if state.selected_id.as_ref() == Some(&id) {
                state.selected_id = None;
            }
        }
    }
    state
}

fn dedupe_notes(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    notes
        .into_iter()
        .filter(|note| seen.insert(note.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{reduce, AppState, Intent};
    use crate::model::note::{Note, NoteId};

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: NoteId::new(id),
            title: title.to_string(),
            content: String::new(),
            tags: Vec::new(),
        }
    }

    fn ids(state: &AppState) -> Vec<&str> {
        state.notes.iter().map(|note| note.id.as_str()).collect()
    }

    #[test]
    fn upsert_inserts_new_ids_at_front() {
        let state = reduce(AppState::default(), Intent::UpsertNote(note("a", "A")));
        let state = reduce(state, Intent::UpsertNote(note("b", "B")));
        assert_eq!(ids(&state), vec!["b", "a"]);
    }

    #[test]
    fn upsert_existing_id_replaces_in_place() {
        let state = reduce(
            AppState::default(),
            Intent::SetNotes(vec![note("a", "A"), note("b", "B"), note("c", "C")]),
        );
        let state = reduce(state, Intent::UpsertNote(note("b", "B2")));
        assert_eq!(ids(&state), vec!["a", "b", "c"]);
        assert_eq!(state.notes[1].title, "B2");
    }

    #[test]
    fn upsert_sequences_keep_one_entry_per_id() {
        let mut state = AppState::default();
        let sequence = [
            ("a", "1"),
            ("b", "2"),
            ("a", "3"),
            ("c", "4"),
            ("b", "5"),
            ("a", "6"),
        ];
        for (id, title) in sequence {
            state = reduce(state, Intent::UpsertNote(note(id, title)));
        }
        assert_eq!(ids(&state), vec!["c", "b", "a"]);
        assert_eq!(state.find_note(&NoteId::new("a")).expect("note should be present").title, "6");
    }

    #[test]
    fn remove_selected_note_clears_selection() {
        let state = reduce(
            AppState::default(),
            Intent::SetNotes(vec![note("a", "A"), note("b", "B")]),
        );
        let state = reduce(state, Intent::Select(Some(NoteId::new("a"))));
        let state = reduce(state, Intent::RemoveNote(NoteId::new("a")));
        assert_eq!(ids(&state), vec!["b"]);
        assert_eq!(state.selected_id, None);
    }

    #[test]
    fn remove_other_note_keeps_selection() {
        let state = reduce(
            AppState::default(),
            Intent::SetNotes(vec![note("a", "A"), note("b", "B")]),
        );
        let state = reduce(state, Intent::Select(Some(NoteId::new("a"))));
        let state = reduce(state, Intent::RemoveNote(NoteId::new("b")));
        assert_eq!(state.selected_id, Some(NoteId::new("a")));
    }

    #[test]
    fn set_loading_true_always_clears_error() {
        let state = reduce(AppState::default(), Intent::SetError("boom".to_string()));
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.loading);

        let state = reduce(state, Intent::SetLoading(true));
        assert!(state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn set_loading_false_keeps_error() {
        let state = reduce(AppState::default(), Intent::SetError("boom".to_string()));
        let state = reduce(state, Intent::SetLoading(false));
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn set_error_forces_loading_off_and_defaults_message() {
        let state = reduce(AppState::default(), Intent::SetLoading(true));
        let state = reduce(state, Intent::SetError(String::new()));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Unknown error"));
    }

    #[test]
    fn set_notes_clears_loading_and_drops_duplicate_ids() {
        let state = reduce(AppState::default(), Intent::SetLoading(true));
        let state = reduce(
            state,
            Intent::SetNotes(vec![note("a", "first"), note("b", "B"), note("a", "second")]),
        );
        assert!(!state.loading);
        assert_eq!(ids(&state), vec!["a", "b"]);
        assert_eq!(state.notes[0].title, "first");
    }

    #[test]
    fn select_does_not_require_note_in_list() {
        let state = reduce(AppState::default(), Intent::Select(Some(NoteId::new("ghost"))));
        assert_eq!(state.selected_id, Some(NoteId::new("ghost")));
        assert!(state.selected_note().is_none());
    }

    #[test]
    fn filter_intents_replace_values() {
        let state = reduce(AppState::default(), Intent::SetQuery("milk".to_string()));
        let state = reduce(state, Intent::SetActiveTag("home".to_string()));
        let tags: Vec<String> = vec!["home".into(), "work".into(), "home".into()];
        let state = reduce(state, Intent::SetTags(tags));
        assert_eq!(state.query, "milk");
        assert_eq!(state.active_tag, "home");
        assert_eq!(state.tags, vec!["home".to_string(), "work".to_string()]);
    }
}
