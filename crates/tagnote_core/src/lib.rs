//! Client core for the tagnote notes application.
//! Owns the state store, the remote service client and the editor bridge;
//! views only read snapshots and invoke actions.

pub mod client;
pub mod config;
pub mod editor;
pub mod logging;
pub mod model;
pub mod store;

pub use client::http::HttpNotesClient;
pub use client::{ApiError, ApiResult, NotesApi};
pub use config::{ClientConfig, ConfigError};
pub use editor::bridge::{ClipboardData, EditableSurface, FormatCommand, RichTextBridge};
pub use editor::session::{EditBuffer, EditorSession};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::note::{NewNote, Note, NoteFilter, NoteId, NoteUpdate, UNTITLED_NOTE_TITLE};
pub use store::{reduce, AppState, Intent, Store};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
