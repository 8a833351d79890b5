//! Debounced, single-flight auto-save coordinator
//!
//! A tokio task owning an explicit state machine: a pending-edits patch
//! buffer, an optional debounce deadline, and at most one in-flight save per
//! document. Bursts of edits collapse into one persistence call per debounce
//! window; a debounce that fires mid-save queues the next save instead of
//! overlapping it, so writes to the same document are serialized.
//!
//! Switching documents cancels the pending debounce and clears the buffer.
//! An already-in-flight request is left to finish; its response is discarded
//! when the id captured at request time no longer matches the active id.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};

use crate::model::{DocumentId, DocumentPatch, PortfolioDocument};
use crate::store::{PortfolioStore, StoreError};

use super::events::EditorEvent;
use super::session::EditorSession;

enum Command {
    /// A field edit landed in the session; restart the debounce window.
    /// Carries the session edit generation the edit produced.
    Edit(DocumentPatch, u64),
    /// The editor switched to a different document
    Switch(DocumentId),
    /// Save immediately (explicit save, or retry after failure)
    Flush,
    Shutdown,
}

/// Handle to the coordinator task
pub(crate) struct AutosaveHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl AutosaveHandle {
    pub(crate) fn spawn(
        store: Arc<dyn PortfolioStore>,
        session: Arc<Mutex<EditorSession>>,
        events: mpsc::UnboundedSender<EditorEvent>,
        document_id: DocumentId,
        debounce: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = AutosaveTask {
            rx,
            store,
            session,
            events,
            active_id: document_id,
            debounce,
            buffer: DocumentPatch::default(),
            buffer_generation: 0,
            deadline: None,
            in_flight: None,
            queued: false,
        };
        tokio::spawn(task.run());
        Self { tx }
    }

    pub(crate) fn edit(&self, patch: DocumentPatch, generation: u64) {
        let _ = self.tx.send(Command::Edit(patch, generation));
    }

    pub(crate) fn switch(&self, document_id: DocumentId) {
        let _ = self.tx.send(Command::Switch(document_id));
    }

    pub(crate) fn flush(&self) {
        let _ = self.tx.send(Command::Flush);
    }

    pub(crate) fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

struct InFlight {
    /// Id captured when the request went out; compared against the active id
    /// on completion to detect stale responses
    document_id: DocumentId,
    /// The patch being saved, kept for re-buffering on failure
    patch: DocumentPatch,
    /// Generation of the newest edit included in the patch. An edit applied
    /// on the caller's thread can still be queued as a command when the
    /// completion is polled, so an empty buffer alone does not prove the
    /// save covered everything.
    edit_generation: u64,
    task: JoinHandle<Result<PortfolioDocument, StoreError>>,
}

struct AutosaveTask {
    rx: mpsc::UnboundedReceiver<Command>,
    store: Arc<dyn PortfolioStore>,
    session: Arc<Mutex<EditorSession>>,
    events: mpsc::UnboundedSender<EditorEvent>,
    active_id: DocumentId,
    debounce: Duration,
    /// Changed fields accumulated since the last save went out
    buffer: DocumentPatch,
    /// Generation of the newest edit folded into the buffer
    buffer_generation: u64,
    /// Debounce deadline; `None` when idle
    deadline: Option<Instant>,
    in_flight: Option<InFlight>,
    /// A debounce fired while a save was in flight; run the next save as
    /// soon as the current one completes
    queued: bool,
}

impl AutosaveTask {
    async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.rx.recv() => match cmd {
                    Some(Command::Edit(patch, generation)) => self.on_edit(patch, generation),
                    Some(Command::Switch(id)) => self.on_switch(id),
                    Some(Command::Flush) => self.on_flush(),
                    Some(Command::Shutdown) | None => break,
                },
                // Disabled branches are constructed but never polled, so the
                // pending() arms are unreachable.
                _ = async {
                    match self.deadline {
                        Some(deadline) => sleep_until(deadline).await,
                        None => std::future::pending().await,
                    }
                }, if self.deadline.is_some() => {
                    self.on_deadline();
                }
                result = async {
                    match self.in_flight.as_mut() {
                        Some(in_flight) => (&mut in_flight.task).await,
                        None => std::future::pending().await,
                    }
                }, if self.in_flight.is_some() => {
                    let result = match result {
                        Ok(inner) => inner,
                        Err(join_err) => Err(StoreError::Server(format!(
                            "save task failed: {join_err}"
                        ))),
                    };
                    self.on_save_complete(result);
                }
            }
        }
    }

    fn on_edit(&mut self, patch: DocumentPatch, generation: u64) {
        self.buffer.overlay(patch);
        self.buffer_generation = self.buffer_generation.max(generation);
        self.deadline = Some(Instant::now() + self.debounce);
    }

    fn on_switch(&mut self, document_id: DocumentId) {
        if self.deadline.take().is_some() || !self.buffer.is_empty() {
            tracing::debug!(
                old = %self.active_id,
                new = %document_id,
                "debounce cancelled on document switch"
            );
        }
        self.buffer = DocumentPatch::default();
        self.queued = false;
        self.active_id = document_id;
    }

    fn on_flush(&mut self) {
        self.deadline = None;
        if self.buffer.is_empty() {
            return;
        }
        if self.in_flight.is_some() {
            self.queued = true;
        } else {
            self.start_save();
        }
    }

    fn on_deadline(&mut self) {
        self.deadline = None;
        if self.buffer.is_empty() {
            return;
        }
        if self.in_flight.is_some() {
            self.queued = true;
        } else {
            self.start_save();
        }
    }

    fn start_save(&mut self) {
        let patch = std::mem::take(&mut self.buffer);
        let document_id = self.active_id;
        let edit_generation = self.buffer_generation;
        let store = Arc::clone(&self.store);
        let save_patch = patch.clone();
        let task = tokio::spawn(async move { store.save(document_id, save_patch).await });

        self.in_flight = Some(InFlight {
            document_id,
            patch,
            edit_generation,
            task,
        });
        let _ = self.events.send(EditorEvent::SaveStarted { document_id });
        tracing::debug!(%document_id, "auto-save request sent");
    }

    fn on_save_complete(&mut self, result: Result<PortfolioDocument, StoreError>) {
        let InFlight {
            document_id,
            patch,
            edit_generation,
            ..
        } = match self.in_flight.take() {
            Some(in_flight) => in_flight,
            None => return,
        };

        if document_id != self.active_id {
            // Response for a document we navigated away from.
            tracing::debug!(%document_id, active = %self.active_id, "stale save response discarded");
            let _ = self
                .events
                .send(EditorEvent::StaleResponseDiscarded { document_id });
            self.run_queued();
            return;
        }

        match result {
            Ok(_) => {
                let saved_at = Utc::now();
                // Edits that arrived mid-flight own the dirty flag; the
                // follow-up save will clear it. The generation check also
                // covers edits still queued as commands.
                if self.buffer.is_empty() {
                    let mut session = self.session.lock();
                    if session.edit_generation() == edit_generation {
                        session.mark_saved(saved_at);
                    }
                }
                let _ = self.events.send(EditorEvent::SaveSucceeded {
                    document_id,
                    saved_at,
                });
            }
            Err(err) => {
                tracing::warn!(%document_id, error = %err, "auto-save failed");
                // Put the failed fields back under anything typed since, so
                // an explicit retry carries them.
                let newer = std::mem::replace(&mut self.buffer, patch);
                self.buffer.overlay(newer);
                self.queued = false;
                let _ = self.events.send(EditorEvent::SaveFailed {
                    document_id,
                    error: err.to_string(),
                });
            }
        }

        self.run_queued();
    }

    fn run_queued(&mut self) {
        if self.queued {
            self.queued = false;
            if !self.buffer.is_empty() && self.in_flight.is_none() {
                self.start_save();
            }
        }
    }
}
