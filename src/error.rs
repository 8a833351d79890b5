//! Crate-level error taxonomy
//!
//! Flat, by source. History operations never appear here: out-of-range
//! undo/redo are defined as no-ops, not errors, so the undo UI stays safe
//! against spamming. Stale save responses are an event
//! ([`crate::editor::EditorEvent::StaleResponseDiscarded`]), not an error.

use thiserror::Error;

use crate::model::DocumentId;
use crate::store::StoreError;

/// Error type for editor-core operations
#[derive(Debug, Error)]
pub enum EditorError {
    /// Mounting requires an authenticated session
    #[error("no authenticated session")]
    AuthRequired,

    /// The document belongs to a different user
    #[error("document {document_id} is not owned by the current user")]
    Forbidden { document_id: DocumentId },

    /// The persistence collaborator call failed
    #[error(transparent)]
    Persistence(#[from] StoreError),
}
