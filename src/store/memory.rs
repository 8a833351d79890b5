//! In-process portfolio store
//!
//! Backs tests and single-process embeddings. Same contract as any remote
//! store: partial saves merge over the persisted document, missing ids are
//! `NotFound`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::model::{DocumentId, DocumentPatch, PortfolioDocument};

use super::{PortfolioStore, StoreError};

/// In-memory document-by-id store
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<DocumentId, PortfolioDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, replacing any existing one with the same id
    pub fn insert(&self, doc: PortfolioDocument) {
        self.docs.lock().insert(doc.id, doc);
    }

    /// Snapshot of a stored document, if present
    pub fn get(&self, id: DocumentId) -> Option<PortfolioDocument> {
        self.docs.lock().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.lock().is_empty()
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn load(&self, id: DocumentId) -> Result<PortfolioDocument, StoreError> {
        self.docs
            .lock()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn save(
        &self,
        id: DocumentId,
        patch: DocumentPatch,
    ) -> Result<PortfolioDocument, StoreError> {
        let mut docs = self.docs.lock();
        let doc = docs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.merge_into(doc);
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn delete(&self, id: DocumentId) -> Result<(), StoreError> {
        self.docs
            .lock()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldEdit;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_save_merges_partial_fields() {
        let store = MemoryStore::new();
        let mut doc = PortfolioDocument::new(Uuid::new_v4());
        doc.title = "Dev".to_string();
        doc.bio = "Hi".to_string();
        let id = doc.id;
        store.insert(doc);

        let saved = store
            .save(id, FieldEdit::Title("Developer".into()).into_patch())
            .await
            .unwrap();
        assert_eq!(saved.title, "Developer");
        assert_eq!(saved.bio, "Hi");
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let store = MemoryStore::new();
        let id = DocumentId::new();
        assert!(matches!(
            store.load(id).await,
            Err(StoreError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let store = MemoryStore::new();
        let doc = PortfolioDocument::new(Uuid::new_v4());
        let id = doc.id;
        store.insert(doc);

        store.delete(id).await.unwrap();
        assert!(store.get(id).is_none());
        assert!(store.delete(id).await.is_err());
    }
}
