//! In-memory notes service used by store and session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::time::Duration;
use tagnote_core::{ApiError, ApiResult, NewNote, Note, NoteFilter, NoteId, NoteUpdate, NotesApi};
use uuid::Uuid;

#[derive(Default)]
struct FakeState {
    notes: Vec<Note>,
    failures: HashMap<&'static str, ApiError>,
    list_delays: HashMap<String, Duration>,
    list_failures: HashMap<String, ApiError>,
    tags_delay: Option<Duration>,
    calls: Vec<String>,
}

/// Scriptable service: seeded notes, per-operation failures and latency.
#[derive(Default)]
pub struct FakeNotesApi {
    state: Mutex<FakeState>,
}

impl FakeNotesApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<Note>) -> Self {
        let fake = Self::new();
        fake.state.lock().expect("fake state lock").notes = notes;
        fake
    }

    /// Makes every call of `operation` fail until `recover` is called.
    pub fn fail(&self, operation: &'static str, error: ApiError) {
        self.state.lock().expect("fake state lock").failures.insert(operation, error);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state.lock().expect("fake state lock").failures.remove(operation);
    }

    /// Delays list responses for one query value.
    pub fn delay_list(&self, query: &str, delay: Duration) {
        self.state
            .lock()
            .expect("fake state lock")
            .list_delays
            .insert(query.to_string(), delay);
    }

    /// Fails list responses for one query value, after any delay for it.
    pub fn fail_list_for(&self, query: &str, error: ApiError) {
        self.state
            .lock()
            .expect("fake state lock")
            .list_failures
            .insert(query.to_string(), error);
    }

    pub fn delay_tags(&self, delay: Duration) {
        self.state.lock().expect("fake state lock").tags_delay = Some(delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().expect("fake state lock").calls.clone()
    }

    pub fn stored(&self, id: &str) -> Option<Note> {
        self.state
            .lock()
            .expect("fake state lock")
            .notes
            .iter()
            .find(|note| note.id.as_str() == id)
            .cloned()
    }

    fn begin(&self, operation: &'static str) -> ApiResult<()> {
        let mut state = self.state.lock().expect("fake state lock");
        state.calls.push(operation.to_string());
        match state.failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NotesApi for FakeNotesApi {
    async fn list_notes(&self, filter: &NoteFilter) -> ApiResult<Vec<Note>> {
        let delay = self
            .state
            .lock()
            .expect("fake state lock")
            .list_delays
            .get(&filter.query)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.begin("list_notes")?;
        let failure = self
            .state
            .lock()
            .expect("fake state lock")
            .list_failures
            .get(&filter.query)
            .cloned();
        if let Some(err) = failure {
            return Err(err);
        }

        let query = filter.query.to_lowercase();
        let state = self.state.lock().expect("fake state lock");
        Ok(state
            .notes
            .iter()
            .filter(|note| {
                query.is_empty()
                    || note.title.to_lowercase().contains(&query)
                    || note.content.to_lowercase().contains(&query)
            })
            .filter(|note| filter.tag.is_empty() || note.has_tag(&filter.tag))
            .cloned()
            .collect())
    }

    async fn get_note(&self, id: &NoteId) -> ApiResult<Note> {
        self.begin("get_note")?;
        self.stored(id.as_str())
            .ok_or_else(|| ApiError::NotFound(id.clone()))
    }

    async fn create_note(&self, note: &NewNote) -> ApiResult<Note> {
        self.begin("create_note")?;
        let created = Note {
            id: NoteId::new(Uuid::new_v4().to_string()),
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.clone(),
        };
        self.state.lock().expect("fake state lock").notes.insert(0, created.clone());
        Ok(created)
    }

    async fn update_note(&self, id: &NoteId, update: &NoteUpdate) -> ApiResult<Note> {
        self.begin("update_note")?;
        let mut state = self.state.lock().expect("fake state lock");
        let note = state
            .notes
            .iter_mut()
            .find(|note| &note.id == id)
            .ok_or_else(|| ApiError::NotFound(id.clone()))?;
        if let Some(title) = &update.title {
            note.title = title.clone();
        }
        if let Some(content) = &update.content {
            note.content = content.clone();
        }
        if let Some(tags) = &update.tags {
            note.tags = tags.clone();
        }
        Ok(note.clone())
    }

    async fn delete_note(&self, id: &NoteId) -> ApiResult<()> {
        self.begin("delete_note")?;
        let mut state = self.state.lock().expect("fake state lock");
        let before = state.notes.len();
        state.notes.retain(|note| &note.id != id);
        if state.notes.len() == before {
            return Err(ApiError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn list_tags(&self) -> ApiResult<Vec<String>> {
        let delay = self.state.lock().expect("fake state lock").tags_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.begin("list_tags")?;
        let state = self.state.lock().expect("fake state lock");
        let tags: BTreeSet<String> = state
            .notes
            .iter()
            .flat_map(|note| note.tags.iter().cloned())
            .collect();
        Ok(tags.into_iter().collect())
    }
}

pub fn note(id: &str, title: &str, tags: &[&str]) -> Note {
    Note {
        id: NoteId::new(id),
        title: title.to_string(),
        content: format!("<p>{title}</p>"),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status { status: 500 }
}
