//! Editor core for the PRISMA portfolio builder.
//!
//! An in-memory, library-level component consumed by UI code: the editor
//! session (single source of truth for the document under edit), a bounded
//! linear undo/redo history, and a debounced single-flight auto-save
//! coordinator. Persistence, auth, and AI enhancement are collaborators
//! behind traits; this crate owns no wire protocol or CLI surface.

pub mod ai;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod store;
pub mod util;

pub use ai::{AiError, EnhanceKind, Enhancement, HfTextEnhancer, TextEnhancer};
pub use config::{AiSettings, EditorSettings};
pub use editor::{AuthSession, EditHistory, Editor, EditorEvent, EditorSession, HISTORY_CAP};
pub use error::EditorError;
pub use model::{DocumentId, DocumentPatch, FieldEdit, PortfolioDocument, PortfolioStatus};
pub use store::{MemoryStore, PortfolioStore, SqliteStore, StoreError};
