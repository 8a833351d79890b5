//! Editor core: session state, undo/redo history, auto-save
//!
//! The control flow is: UI edit → session document mutated → history
//! snapshot recorded → auto-save coordinator schedules a persistence call →
//! store acknowledges or fails → dirty flag updated. All session operations
//! are synchronous; the only suspension point is the store boundary.

mod autosave;
pub mod events;
pub mod history;
pub mod session;

pub use events::EditorEvent;
pub use history::{EditHistory, HistoryEntry, HISTORY_CAP};
pub use session::{AuthSession, Editor, EditorSession};
