//! Per-note edit session owned by the view.
//!
//! # Responsibility
//! - Copy the selected note into a private buffer on selection change.
//! - Stage title/content/tag edits until an explicit save.
//!
//! # Invariants
//! - The buffer is an owned copy; edits are never visible through `AppState`
//!   before `save` commits them.
//! - Edits are only accepted while in edit mode.
//! - `save` leaves edit mode whether or not the update succeeded.

use crate::client::NotesApi;
use crate::model::note::{normalize_tag, Note, NoteUpdate, UNTITLED_NOTE_TITLE};
use crate::store::{AppState, Store};
use log::debug;

/// Staged copy of one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub note: Note,
    pub editing: bool,
}

impl From<&Note> for EditBuffer {
    fn from(note: &Note) -> Self {
        Self {
            note: note.clone(),
            editing: false,
        }
    }
}

impl EditBuffer {
    /// Builds the full-replacement update sent on save.
    pub fn to_update(&self) -> NoteUpdate {
        let title = if self.note.title.is_empty() {
            UNTITLED_NOTE_TITLE.to_string()
        } else {
            self.note.title.clone()
        };
        NoteUpdate::full(title, self.note.content.clone(), self.note.tags.clone())
    }
}

#[derive(Debug, Default)]
pub struct EditorSession {
    buffer: Option<EditBuffer>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        self.buffer.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.buffer.as_ref().is_some_and(|buffer| buffer.editing)
    }

    /// Follows the store selection.
    ///
    /// Reseeds the buffer (and exits edit mode) only when the selected
    /// note's id changes. Returns `true` when the buffer was replaced.
    pub fn sync(&mut self, state: &AppState) -> bool {
        let selected = state.selected_note();
        let current = self.buffer.as_ref().map(|buffer| &buffer.note.id);
        if selected.map(|note| &note.id) == current {
            return false;
        }
        self.buffer = selected.map(EditBuffer::from);
        true
    }

    /// Enters edit mode. Returns `false` when nothing is selected.
    pub fn begin_edit(&mut self) -> bool {
        match self.buffer.as_mut() {
            Some(buffer) => {
                buffer.editing = true;
                true
            }
            None => false,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        self.edit(|note| note.title = title.into())
    }

    /// Stores content emitted by the rich text bridge.
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        self.edit(|note| note.content = content.into())
    }

    /// Adds a trimmed tag. Blank and duplicate tags are ignored.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let Some(tag) = normalize_tag(raw) else {
            return false;
        };
        if self.buffer.as_ref().is_some_and(|buffer| buffer.note.has_tag(&tag)) {
            return false;
        }
        self.edit(|note| note.tags.push(tag))
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        if !self.buffer.as_ref().is_some_and(|buffer| buffer.note.has_tag(tag)) {
            return false;
        }
        self.edit(|note| note.tags.retain(|existing| existing != tag))
    }

    /// Removes the last tag, as backspace on an empty tag input does.
    pub fn pop_tag(&mut self) -> Option<String> {
        let mut popped = None;
        self.edit(|note| popped = note.tags.pop());
        popped
    }

    /// Value the rich text bridge should display.
    pub fn editor_value<'a>(&'a self, state: &'a AppState) -> &'a str {
        match self.buffer.as_ref() {
            Some(buffer) if buffer.editing => buffer.note.content.as_str(),
            _ => state
                .selected_note()
                .map(|note| note.content.as_str())
                .unwrap_or(""),
        }
    }

    /// Commits the buffer through `update_note` and leaves edit mode.
    ///
    /// Outside edit mode nothing is sent and `None` is returned. Failures
    /// surface through the store's `error`; the buffer is reseeded from the
    /// store either way.
    pub async fn save<C: NotesApi>(&mut self, store: &Store<C>) -> Option<Note> {
        let buffer = self.buffer.as_ref().filter(|buffer| buffer.editing)?;
        let id = buffer.note.id.clone();
        let update = buffer.to_update();

        let saved = store.update_note(&id, update).await;
        debug!(
            "event=session_save module=editor note_id={id} status={}",
            if saved.is_some() { "ok" } else { "error" }
        );
        self.buffer = None;
        self.sync(&store.state());
        saved
    }

    /// Deletes the selected note once `confirm` approves it.
    pub async fn delete<C: NotesApi>(
        &mut self,
        store: &Store<C>,
        confirm: impl FnOnce(&Note) -> bool,
    ) -> bool {
        let Some(note) = store.state().selected_note().cloned() else {
            return false;
        };
        if !confirm(&note) {
            return false;
        }
        let deleted = store.delete_note(&note.id).await;
        self.sync(&store.state());
        deleted
    }

    fn edit(&mut self, apply: impl FnOnce(&mut Note)) -> bool {
        match self.buffer.as_mut() {
            Some(buffer) if buffer.editing => {
                apply(&mut buffer.note);
                true
            }
            _ => false,
        }
    }
}
