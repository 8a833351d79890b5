//! Durable local portfolio store (sqlite)
//!
//! Documents are stored as one JSON column per row; a partial save is a
//! read-merge-write inside a transaction so concurrent writers on other
//! connections can't interleave half a patch.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::model::{DocumentId, DocumentPatch, PortfolioDocument};

use super::{PortfolioStore, StoreError};

/// Sqlite-backed document store
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS portfolios (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                status TEXT NOT NULL,
                document TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_portfolios_owner
                ON portfolios(owner_id, updated_at DESC);",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a new document row
    pub fn create(&self, doc: &PortfolioDocument) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO portfolios (id, owner_id, status, document, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                doc.id.to_string(),
                doc.owner_id.to_string(),
                doc.status.as_str(),
                serde_json::to_string(doc)?,
                doc.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All documents owned by a user, most recently updated first
    pub fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<PortfolioDocument>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT document FROM portfolios WHERE owner_id = ?1 ORDER BY updated_at DESC",
        )?;
        let rows = stmt.query_map(params![owner_id.to_string()], |row| {
            row.get::<_, String>(0)
        })?;

        let mut docs = Vec::new();
        for row in rows {
            docs.push(serde_json::from_str(&row?)?);
        }
        Ok(docs)
    }

    fn load_sync(&self, id: DocumentId) -> Result<PortfolioDocument, StoreError> {
        let conn = self.conn.lock();
        let json: Option<String> = conn
            .query_row(
                "SELECT document FROM portfolios WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let json = json.ok_or(StoreError::NotFound(id))?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[async_trait]
impl PortfolioStore for SqliteStore {
    async fn load(&self, id: DocumentId) -> Result<PortfolioDocument, StoreError> {
        self.load_sync(id)
    }

    async fn save(
        &self,
        id: DocumentId,
        patch: DocumentPatch,
    ) -> Result<PortfolioDocument, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let json: Option<String> = tx
            .query_row(
                "SELECT document FROM portfolios WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let json = json.ok_or(StoreError::NotFound(id))?;

        let mut doc: PortfolioDocument = serde_json::from_str(&json)?;
        patch.merge_into(&mut doc);
        doc.updated_at = Utc::now();

        tx.execute(
            "UPDATE portfolios
             SET status = ?2, document = ?3, updated_at = ?4
             WHERE id = ?1",
            params![
                id.to_string(),
                doc.status.as_str(),
                serde_json::to_string(&doc)?,
                doc.updated_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(doc)
    }

    async fn delete(&self, id: DocumentId) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "DELETE FROM portfolios WHERE id = ?1",
            params![id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldEdit;
    use tempfile::tempdir;

    fn seeded_store() -> (SqliteStore, PortfolioDocument) {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut doc = PortfolioDocument::new(Uuid::new_v4());
        doc.name = "Ada".to_string();
        doc.title = "Dev".to_string();
        store.create(&doc).unwrap();
        (store, doc)
    }

    #[tokio::test]
    async fn test_create_and_load() {
        let (store, doc) = seeded_store();
        let loaded = store.load(doc.id).await.unwrap();
        assert_eq!(loaded.name, "Ada");
        assert_eq!(loaded.id, doc.id);
    }

    #[tokio::test]
    async fn test_partial_save_merges_over_row() {
        let (store, doc) = seeded_store();
        let saved = store
            .save(doc.id, FieldEdit::Title("Developer".into()).into_patch())
            .await
            .unwrap();
        assert_eq!(saved.title, "Developer");
        assert_eq!(saved.name, "Ada");
        assert!(saved.updated_at >= doc.updated_at);

        let reloaded = store.load(doc.id).await.unwrap();
        assert_eq!(reloaded.title, "Developer");
    }

    #[tokio::test]
    async fn test_save_missing_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .save(DocumentId::new(), DocumentPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, doc) = seeded_store();
        store.delete(doc.id).await.unwrap();
        assert!(matches!(
            store.load(doc.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_for_owner_orders_by_update() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("portfolios.db")).unwrap();
        let owner = Uuid::new_v4();

        let first = PortfolioDocument::new(owner);
        let second = PortfolioDocument::new(owner);
        store.create(&first).unwrap();
        store.create(&second).unwrap();
        store.create(&PortfolioDocument::new(Uuid::new_v4())).unwrap();

        store
            .save(first.id, FieldEdit::Name("Updated".into()).into_patch())
            .await
            .unwrap();

        let docs = store.list_for_owner(owner).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, first.id);
    }
}
