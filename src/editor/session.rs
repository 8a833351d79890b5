//! Editor session state and the `Editor` context object
//!
//! `EditorSession` wraps the document under edit, its undo/redo history, and
//! the dirty/last-saved bookkeeping. It is owned by exactly one `Editor`
//! bound to one document id: an explicit context object handed to the UI
//! tree, never a process-wide singleton, so parallel editors (and tests)
//! don't share state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::EditorSettings;
use crate::error::EditorError;
use crate::model::{DocumentId, DocumentPatch, FieldEdit, PortfolioDocument};
use crate::store::PortfolioStore;

use super::autosave::AutosaveHandle;
use super::events::EditorEvent;
use super::history::EditHistory;

/// Authenticated user context consumed at mount time
///
/// Supplied by the auth collaborator; the editor only checks its presence.
/// "No session" is a mount precondition failure, not an in-editor error.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub access_token: String,
}

impl AuthSession {
    pub fn new(user_id: Uuid, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            access_token: access_token.into(),
        }
    }
}

/// In-memory editor state for one document
#[derive(Debug)]
pub struct EditorSession {
    document: PortfolioDocument,
    history: EditHistory,
    dirty: bool,
    last_saved: Option<DateTime<Utc>>,
    /// Bumped on every mutation of the document. The auto-save coordinator
    /// captures it when a save goes out; a save completion may only clear
    /// the dirty flag if no edit landed in between.
    edit_generation: u64,
}

impl EditorSession {
    pub fn new(document: PortfolioDocument) -> Self {
        Self {
            document,
            history: EditHistory::new(),
            dirty: false,
            last_saved: None,
            edit_generation: 0,
        }
    }

    pub fn document(&self) -> &PortfolioDocument {
        &self.document
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// In-memory state differs from the last successfully persisted state
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    /// Monotonic counter of document mutations
    pub fn edit_generation(&self) -> u64 {
        self.edit_generation
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Record a full snapshot of the current document in the history log.
    ///
    /// Does not touch the dirty flag; dirtiness belongs to the edit path.
    pub fn record_history(&mut self, action: impl Into<String>) {
        self.history.push(action, DocumentPatch::full(&self.document));
    }

    /// Record a snapshot of selected fields only
    pub fn record_partial_history(&mut self, action: impl Into<String>, snapshot: DocumentPatch) {
        self.history.push(action, snapshot);
    }

    /// Apply one field edit to the in-memory document and mark it dirty.
    /// Returns the one-field patch for the auto-save buffer.
    pub fn apply_edit(&mut self, edit: FieldEdit) -> DocumentPatch {
        let patch = edit.into_patch();
        patch.merge_into(&mut self.document);
        self.dirty = true;
        self.edit_generation += 1;
        patch
    }

    /// Step back in history, shallow-merging the older snapshot over the
    /// document. Fields the snapshot did not capture keep their current
    /// values. Returns the applied patch, or `None` at the floor.
    ///
    /// An undo is itself an edit: it sets the dirty flag.
    pub fn undo(&mut self) -> Option<DocumentPatch> {
        let patch = self.history.undo()?.clone();
        patch.merge_into(&mut self.document);
        self.dirty = true;
        self.edit_generation += 1;
        Some(patch)
    }

    /// Symmetric to [`Self::undo`]
    pub fn redo(&mut self) -> Option<DocumentPatch> {
        let patch = self.history.redo()?.clone();
        patch.merge_into(&mut self.document);
        self.dirty = true;
        self.edit_generation += 1;
        Some(patch)
    }

    /// Called by the auto-save coordinator on a clean save completion
    pub fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.dirty = false;
        self.last_saved = Some(at);
    }

    /// Replace the session contents when a different document is loaded
    pub fn reset(&mut self, document: PortfolioDocument) {
        self.document = document;
        self.history.clear();
        self.dirty = false;
        self.last_saved = None;
        // A reload counts as a mutation; stale completions must not clear
        // the fresh session's flag.
        self.edit_generation += 1;
    }
}

/// The editor context object handed to the UI layer
///
/// Owns the session state and the auto-save coordinator task for one mounted
/// document. Dropping the editor shuts the coordinator down; an in-flight
/// save, if any, completes against the store but its response is discarded.
pub struct Editor {
    session: Arc<Mutex<EditorSession>>,
    store: Arc<dyn PortfolioStore>,
    autosave: AutosaveHandle,
    events: mpsc::UnboundedSender<EditorEvent>,
}

impl Editor {
    /// Mount an editor for the given document.
    ///
    /// Fails before any state exists when the auth session is absent/empty,
    /// the document cannot be loaded, or it belongs to another user. On
    /// success the initial document state is recorded as the history floor.
    pub async fn mount(
        store: Arc<dyn PortfolioStore>,
        auth: &AuthSession,
        document_id: DocumentId,
        settings: EditorSettings,
    ) -> Result<(Self, mpsc::UnboundedReceiver<EditorEvent>), EditorError> {
        if auth.access_token.trim().is_empty() {
            return Err(EditorError::AuthRequired);
        }

        let document = store.load(document_id).await?;
        if document.owner_id != auth.user_id {
            return Err(EditorError::Forbidden { document_id });
        }

        let mut session = EditorSession::new(document);
        session.record_history("load");

        let session = Arc::new(Mutex::new(session));
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let autosave = AutosaveHandle::spawn(
            Arc::clone(&store),
            Arc::clone(&session),
            events_tx.clone(),
            document_id,
            settings.debounce_window(),
        );

        let _ = events_tx.send(EditorEvent::DocumentLoaded { document_id });
        tracing::debug!(%document_id, "editor mounted");

        Ok((
            Self {
                session,
                store,
                autosave,
                events: events_tx,
            },
            events_rx,
        ))
    }

    /// Apply a field edit: the in-memory document reflects it immediately,
    /// and the auto-save debounce window restarts.
    pub fn update_field(&self, edit: FieldEdit) {
        let (patch, generation) = {
            let mut session = self.session.lock();
            let patch = session.apply_edit(edit);
            (patch, session.edit_generation())
        };
        self.autosave.edit(patch, generation);
    }

    /// Snapshot the current document into the undo/redo log
    pub fn record_history(&self, action: impl Into<String>) {
        self.session.lock().record_history(action);
    }

    /// Undo one step. Returns false (and changes nothing) at the floor.
    /// The applied snapshot is routed into auto-save like any other edit.
    pub fn undo(&self) -> bool {
        let applied = {
            let mut session = self.session.lock();
            session.undo().map(|patch| (patch, session.edit_generation()))
        };
        match applied {
            Some((patch, generation)) => {
                self.autosave.edit(patch, generation);
                true
            }
            None => false,
        }
    }

    /// Redo one step. Returns false (and changes nothing) at the tip.
    pub fn redo(&self) -> bool {
        let applied = {
            let mut session = self.session.lock();
            session.redo().map(|patch| (patch, session.edit_generation()))
        };
        match applied {
            Some((patch, generation)) => {
                self.autosave.edit(patch, generation);
                true
            }
            None => false,
        }
    }

    /// Save now: collapse any pending debounce into an immediate persistence
    /// call. Also the explicit "try again" action after a failed save.
    pub fn flush(&self) {
        self.autosave.flush();
    }

    /// Load a different document into this editor.
    ///
    /// Cancels the pending debounce for the old document so no stale write
    /// lands on the wrong id; an already-in-flight request is not cancelled,
    /// but its response will be discarded.
    pub async fn load_document(&self, document_id: DocumentId) -> Result<(), EditorError> {
        self.autosave.switch(document_id);
        let document = self.store.load(document_id).await?;
        {
            let mut session = self.session.lock();
            session.reset(document);
            session.record_history("load");
        }
        let _ = self.events.send(EditorEvent::DocumentLoaded { document_id });
        tracing::debug!(%document_id, "document switched");
        Ok(())
    }

    /// Clone of the current in-memory document
    pub fn document(&self) -> PortfolioDocument {
        self.session.lock().document().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.session.lock().is_dirty()
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.session.lock().last_saved()
    }

    pub fn can_undo(&self) -> bool {
        self.session.lock().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.lock().can_redo()
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.autosave.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldEdit;

    fn session_with(title: &str, bio: &str) -> EditorSession {
        let mut doc = PortfolioDocument::new(Uuid::new_v4());
        doc.title = title.to_string();
        doc.bio = bio.to_string();
        EditorSession::new(doc)
    }

    #[test]
    fn test_apply_edit_marks_dirty() {
        let mut session = session_with("Dev", "");
        assert!(!session.is_dirty());

        let patch = session.apply_edit(FieldEdit::Title("Developer".into()));
        assert!(session.is_dirty());
        assert_eq!(session.document().title, "Developer");
        assert_eq!(patch.title.as_deref(), Some("Developer"));
    }

    #[test]
    fn test_edit_generation_tracks_mutations_only() {
        let mut session = session_with("Dev", "");
        assert_eq!(session.edit_generation(), 0);

        session.record_history("load");
        assert_eq!(session.edit_generation(), 0);

        session.apply_edit(FieldEdit::Title("Developer".into()));
        session.record_history("set title");
        assert_eq!(session.edit_generation(), 1);

        assert!(session.undo().is_some());
        assert_eq!(session.edit_generation(), 2);
        assert!(session.redo().is_some());
        assert_eq!(session.edit_generation(), 3);

        session.mark_saved(Utc::now());
        assert_eq!(session.edit_generation(), 3);

        session.reset(PortfolioDocument::new(Uuid::new_v4()));
        assert_eq!(session.edit_generation(), 4);
    }

    #[test]
    fn test_record_history_leaves_dirty_flag_alone() {
        let mut session = session_with("Dev", "");
        session.record_history("initial");
        assert!(!session.is_dirty());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_undo_merges_and_marks_dirty() {
        let mut session = session_with("Dev", "");
        session.record_history("load");

        session.apply_edit(FieldEdit::Title("Developer".into()));
        session.record_history("set title");
        session.mark_saved(Utc::now());
        assert!(!session.is_dirty());

        assert!(session.undo().is_some());
        assert_eq!(session.document().title, "Dev");
        assert!(session.is_dirty());
    }

    #[test]
    fn test_undo_preserves_fields_absent_from_snapshot() {
        let mut session = session_with("Dev", "");
        // Floor snapshot captures the title only.
        session.record_partial_history("load", FieldEdit::Title("Dev".into()).into_patch());

        session.apply_edit(FieldEdit::Title("Developer".into()));
        session.apply_edit(FieldEdit::Bio("Hi".into()));
        session.record_history("edits");

        assert!(session.undo().is_some());
        // Title restored from the floor snapshot; bio untouched by it.
        assert_eq!(session.document().title, "Dev");
        assert_eq!(session.document().bio, "Hi");
    }

    #[test]
    fn test_undo_at_floor_is_identity() {
        let mut session = session_with("Dev", "");
        session.record_history("load");
        let before = session.document().clone();

        assert!(session.undo().is_none());
        assert_eq!(session.document(), &before);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_reset_clears_history_and_dirty() {
        let mut session = session_with("Dev", "");
        session.record_history("load");
        session.apply_edit(FieldEdit::Bio("Hi".into()));

        let other = PortfolioDocument::new(Uuid::new_v4());
        let other_id = other.id;
        session.reset(other);

        assert!(!session.is_dirty());
        assert!(session.history().is_empty());
        assert_eq!(session.document().id, other_id);
        assert_eq!(session.last_saved(), None);
    }
}
