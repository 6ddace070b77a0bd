//! Editor-side components: the rich text bridge and the edit session.
//!
//! # Responsibility
//! - Reconcile an externally owned document surface with string state.
//! - Stage unsaved edits away from `AppState` until an explicit save.

pub mod bridge;
pub mod session;
