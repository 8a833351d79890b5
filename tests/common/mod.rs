//! Shared test utilities
//!
//! Document fixtures and an instrumented store wrapper used by the history
//! and auto-save integration suites.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Duration;
use uuid::Uuid;

use prisma_editor::model::{DocumentId, DocumentPatch, PortfolioDocument};
use prisma_editor::store::{MemoryStore, PortfolioStore, StoreError};

/// A document with a few display fields filled in
pub fn sample_document(owner_id: Uuid) -> PortfolioDocument {
    let mut doc = PortfolioDocument::new(owner_id);
    doc.name = "Ada Lovelace".to_string();
    doc.title = "Dev".to_string();
    doc.bio = "I write programs.".to_string();
    doc.skills = vec!["Rust".to_string(), "Mathematics".to_string()];
    doc
}

/// Store wrapper that records saves and can inject latency and failures
pub struct RecordingStore {
    inner: MemoryStore,
    /// Every (id, patch) passed to save, in order
    save_log: Mutex<Vec<(DocumentId, DocumentPatch)>>,
    /// Artificial latency applied to each save
    save_delay: Mutex<Option<Duration>>,
    /// Errors to return from upcoming saves, consumed front-first
    fail_queue: Mutex<Vec<StoreError>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            save_log: Mutex::new(Vec::new()),
            save_delay: Mutex::new(None),
            fail_queue: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn insert(&self, doc: PortfolioDocument) {
        self.inner.insert(doc);
    }

    pub fn stored(&self, id: DocumentId) -> Option<PortfolioDocument> {
        self.inner.get(id)
    }

    pub fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.lock() = Some(delay);
    }

    pub fn fail_next_save(&self, err: StoreError) {
        self.fail_queue.lock().push(err);
    }

    pub fn saves(&self) -> Vec<(DocumentId, DocumentPatch)> {
        self.save_log.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.save_log.lock().len()
    }

    /// Highest number of saves ever running concurrently
    pub fn max_concurrent_saves(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortfolioStore for RecordingStore {
    async fn load(&self, id: DocumentId) -> Result<PortfolioDocument, StoreError> {
        self.inner.load(id).await
    }

    async fn save(
        &self,
        id: DocumentId,
        patch: DocumentPatch,
    ) -> Result<PortfolioDocument, StoreError> {
        self.save_log.lock().push((id, patch.clone()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.save_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let injected = {
            let mut queue = self.fail_queue.lock();
            if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            }
        };

        let result = match injected {
            Some(err) => Err(err),
            None => self.inner.save(id, patch).await,
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn delete(&self, id: DocumentId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}

/// Let spawned tasks process queued commands without advancing the clock
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
