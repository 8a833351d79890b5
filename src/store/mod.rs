//! Persistence collaborator boundary
//!
//! The editor core treats persistence as an opaque document-by-id store
//! behind the [`PortfolioStore`] trait. Errors are a flat taxonomy with no
//! partial-failure semantics: the whole save failed or it didn't.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{DocumentId, DocumentPatch, PortfolioDocument};

/// Error type for persistence operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),
    #[error("network error: {0}")]
    Network(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

/// Opaque document-by-id persistence collaborator
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Fetch the full document
    async fn load(&self, id: DocumentId) -> Result<PortfolioDocument, StoreError>;

    /// Persist the given fields and return the stored document.
    ///
    /// Absent patch fields are left as persisted; there is no way to save a
    /// partial failure: the call either lands entirely or not at all.
    async fn save(
        &self,
        id: DocumentId,
        patch: DocumentPatch,
    ) -> Result<PortfolioDocument, StoreError>;

    /// Remove the document
    async fn delete(&self, id: DocumentId) -> Result<(), StoreError>;
}

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
