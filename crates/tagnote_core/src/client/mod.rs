//! Remote notes/tags service contracts.
//!
//! # Responsibility
//! - Define the request/response surface the store depends on.
//! - Collapse transport failures and non-success statuses into one error
//!   type carrying a human-readable message.
//!
//! # Invariants
//! - Implementations never panic on malformed server responses; they return
//!   `ApiError::Decode` instead.
//! - A 404 on a single-note operation is reported as `ApiError::NotFound`.

pub mod http;

use crate::model::note::{NewNote, Note, NoteFilter, NoteId, NoteUpdate};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of one remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection, DNS, timeout or other transport-level failure.
    #[error("network error: {0}")]
    Transport(String),
    /// Server answered with a non-success status.
    #[error("request failed with status code {status}")]
    Status { status: u16 },
    /// Target note does not exist.
    #[error("note not found: {0}")]
    NotFound(NoteId),
    /// Response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Request URL could not be built from the configured base.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote notes/tags service consumed by the store.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Lists notes matching the filter, in server order.
    async fn list_notes(&self, filter: &NoteFilter) -> ApiResult<Vec<Note>>;
    /// Fetches one note by id.
    async fn get_note(&self, id: &NoteId) -> ApiResult<Note>;
    /// Creates a note; the server assigns its id.
    async fn create_note(&self, note: &NewNote) -> ApiResult<Note>;
    /// Applies a partial update and returns the server representation.
    async fn update_note(&self, id: &NoteId, update: &NoteUpdate) -> ApiResult<Note>;
    /// Deletes a note. Success carries no body.
    async fn delete_note(&self, id: &NoteId) -> ApiResult<()>;
    /// Lists the global tag catalogue.
    async fn list_tags(&self) -> ApiResult<Vec<String>>;
}
