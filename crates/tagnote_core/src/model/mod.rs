//! Client-side data model for notes and tags.
//!
//! # Responsibility
//! - Define the wire shapes exchanged with the remote notes service.
//! - Provide small projections used by list and editor views.
//!
//! # Invariants
//! - A `NoteId` is assigned by the server and never rewritten by the client.
//! - Tag sequences on a `Note` carry no duplicates.

pub mod note;
