//! Events surfaced to the embedding UI layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::DocumentId;

/// Unified event type emitted by the editor core
///
/// Delivered over an unbounded channel handed out at mount; UI layers render
/// these as notifications. Save failures arrive exactly once per attempt and
/// are never retried automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EditorEvent {
    /// Document loaded into a fresh session
    DocumentLoaded { document_id: DocumentId },

    /// A persistence request went out
    SaveStarted { document_id: DocumentId },

    /// Persistence acknowledged the save
    SaveSucceeded {
        document_id: DocumentId,
        saved_at: DateTime<Utc>,
    },

    /// Persistence failed; in-memory state is untouched and still dirty
    SaveFailed {
        document_id: DocumentId,
        error: String,
    },

    /// A save response arrived for a document the editor has navigated away
    /// from; it was discarded. Bookkeeping, not an error.
    StaleResponseDiscarded { document_id: DocumentId },
}

impl EditorEvent {
    /// Human-readable event type name for display
    pub fn event_type_name(&self) -> &'static str {
        match self {
            EditorEvent::DocumentLoaded { .. } => "DocumentLoaded",
            EditorEvent::SaveStarted { .. } => "SaveStarted",
            EditorEvent::SaveSucceeded { .. } => "SaveSucceeded",
            EditorEvent::SaveFailed { .. } => "SaveFailed",
            EditorEvent::StaleResponseDiscarded { .. } => "StaleResponseDiscarded",
        }
    }
}
