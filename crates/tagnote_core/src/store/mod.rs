//! Client state store and its network-backed actions.
//!
//! # Responsibility
//! - Own `AppState` and mutate it only through `reduce`.
//! - Orchestrate remote calls and translate their outcomes into intents.
//! - Publish every new state to subscribed views.
//!
//! # Invariants
//! - No raw `ApiError` leaves an action; failures become `SetError` or are
//!   swallowed (tag catalogue refreshes).
//! - A list fetch only applies its result if no newer list fetch was issued
//!   after it (staleness discard by generation ticket).
//! - The state lock is never held across an await point.

pub mod state;

use crate::client::{ApiError, ApiResult, NotesApi};
use crate::model::note::{NewNote, Note, NoteFilter, NoteId, NoteUpdate};
use log::{debug, info, trace, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

pub use state::{reduce, AppState, Intent};

/// Single state container shared by reference with every view.
pub struct Store<C: NotesApi> {
    client: C,
    state: watch::Sender<AppState>,
    list_generation: AtomicU64,
}

impl<C: NotesApi> Store<C> {
    /// Creates a store in the initial state.
    pub fn new(client: C) -> Self {
        let (state, _) = watch::channel(AppState::default());
        Self {
            client,
            state,
            list_generation: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified after every dispatched intent.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Applies one intent synchronously.
    pub fn dispatch(&self, intent: Intent) {
        trace!("event=dispatch module=store intent={}", intent.name());
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = reduce(current, intent);
        });
    }

    /// Replaces the editor selection.
    pub fn select(&self, id: Option<NoteId>) {
        self.dispatch(Intent::Select(id));
    }

    /// Fetches the tag catalogue and the note list concurrently.
    ///
    /// Each half applies its own result as soon as it resolves. A failure on
    /// either side sets `error` and leaves the other side's result in place.
    pub async fn load_initial(&self) {
        self.dispatch(Intent::SetLoading(true));
        let ticket = self.issue_list_ticket();
        let filter = self.current_filter();

        let tags = async {
            match self.client.list_tags().await {
                Ok(tags) => self.dispatch(Intent::SetTags(tags)),
                Err(err) => self.fail("load_initial", &err),
            }
        };
        let notes = async {
            let result = self.client.list_notes(&filter).await;
            self.apply_list_result(ticket, "load_initial", result);
        };
        tokio::join!(tags, notes);
    }

    /// Updates the free-text filter, then refreshes the list.
    pub async fn set_query(&self, query: impl Into<String>) {
        self.dispatch(Intent::SetQuery(query.into()));
        self.refresh().await;
    }

    /// Updates the tag filter, then refreshes the list.
    pub async fn set_active_tag(&self, tag: impl Into<String>) {
        self.dispatch(Intent::SetActiveTag(tag.into()));
        self.refresh().await;
    }

    /// Refetches the note list for the filter current at call time.
    pub async fn refresh(&self) {
        let ticket = self.issue_list_ticket();
        let filter = self.current_filter();
        self.dispatch(Intent::SetLoading(true));
        let result = self.client.list_notes(&filter).await;
        self.apply_list_result(ticket, "refresh", result);
    }

    /// Creates a default note, selects it and refreshes the tag catalogue.
    ///
    /// Returns `None` when the service rejects the create.
    pub async fn create_note(&self) -> Option<Note> {
        let payload = NewNote::untitled(&self.state.borrow().active_tag);
        match self.client.create_note(&payload).await {
            Ok(note) => {
                info!(
                    "event=note_create module=store status=ok note_id={}",
                    note.id
                );
                self.dispatch(Intent::UpsertNote(note.clone()));
                self.dispatch(Intent::Select(Some(note.id.clone())));
                self.refresh_tags().await;
                Some(note)
            }
            Err(err) => {
                self.fail("create_note", &err);
                None
            }
        }
    }

    /// Sends a partial update and stores the server representation.
    pub async fn update_note(&self, id: &NoteId, update: NoteUpdate) -> Option<Note> {
        match self.client.update_note(id, &update).await {
            Ok(note) => {
                info!("event=note_update module=store status=ok note_id={id}");
                self.dispatch(Intent::UpsertNote(note.clone()));
                self.refresh_tags().await;
                Some(note)
            }
            Err(err) => {
                self.fail("update_note", &err);
                None
            }
        }
    }

    /// Deletes a note, then refreshes tags and the filtered list.
    ///
    /// On failure the note stays in the list and `false` is returned.
    pub async fn delete_note(&self, id: &NoteId) -> bool {
        match self.client.delete_note(id).await {
            Ok(()) => {
                info!("event=note_delete module=store status=ok note_id={id}");
                self.dispatch(Intent::RemoveNote(id.clone()));
                tokio::join!(self.refresh_tags(), self.refresh());
                true
            }
            Err(err) => {
                self.fail("delete_note", &err);
                false
            }
        }
    }

    /// Fetches one note by id, merges it into the list and selects it.
    pub async fn open_note(&self, id: &NoteId) -> Option<Note> {
        match self.client.get_note(id).await {
            Ok(note) => {
                self.dispatch(Intent::UpsertNote(note.clone()));
                self.dispatch(Intent::Select(Some(note.id.clone())));
                Some(note)
            }
            Err(err) => {
                self.fail("open_note", &err);
                None
            }
        }
    }

    /// Best-effort tag catalogue refresh. Failures are dropped.
    pub async fn refresh_tags(&self) {
        match self.client.list_tags().await {
            Ok(tags) => self.dispatch(Intent::SetTags(tags)),
            Err(err) => {
                debug!("event=tags_refresh module=store status=ignored error={err}");
            }
        }
    }

    fn current_filter(&self) -> NoteFilter {
        let state = self.state.borrow();
        NoteFilter::new(state.query.clone(), state.active_tag.clone())
    }

    fn issue_list_ticket(&self) -> u64 {
        self.list_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply_list_result(&self, ticket: u64, action: &'static str, result: ApiResult<Vec<Note>>) {
        let latest = self.list_generation.load(Ordering::SeqCst);
        if ticket != latest {
            debug!(
                "event=list_discard module=store action={action} ticket={ticket} latest={latest}"
            );
            return;
        }
        match result {
            Ok(notes) => {
                debug!(
                    "event=list_apply module=store action={action} status=ok count={}",
                    notes.len()
                );
                self.dispatch(Intent::SetNotes(notes));
            }
            Err(err) => self.fail(action, &err),
        }
    }

    fn fail(&self, action: &'static str, err: &ApiError) {
        warn!("event=action_failed module=store action={action} status=error error={err}");
        self.dispatch(Intent::SetError(err.to_string()));
    }
}
