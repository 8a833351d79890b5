//! Bounded linear undo/redo history
//!
//! A cursor-indexed log of document snapshots with standard linear-undo
//! semantics: pushing after an undo discards the redo branch, and the log is
//! capped with FIFO eviction. Snapshots are owned `DocumentPatch` values
//! (deep copies, never references into the live document), so later edits
//! cannot rewrite historical entries.
//!
//! Out-of-range undo/redo calls are identity no-ops (they return `None` and
//! leave the log untouched) rather than errors, so UI code can spam them
//! safely. This type never touches the session's dirty flag; that belongs to
//! the auto-save path.

use chrono::{DateTime, Utc};

use crate::model::DocumentPatch;

/// Maximum number of retained history entries; oldest evicted first.
pub const HISTORY_CAP: usize = 50;

/// One immutable snapshot in the undo/redo log
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// When the snapshot was recorded
    pub timestamp: DateTime<Utc>,
    /// Human-readable action label, for diagnostics and UI only
    pub action: String,
    /// Deep copy of the document fields captured at this point
    pub snapshot: DocumentPatch,
}

/// Bounded undo/redo log over document snapshots
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    /// Index of the active entry; `None` until the first push
    cursor: Option<usize>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the active entry, if any
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Retained entries, oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The entry at index 0 is the floor and is never itself undoable past
    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// Record a snapshot: discard the redo branch, append, advance the
    /// cursor, and evict from the front when over [`HISTORY_CAP`].
    pub fn push(&mut self, action: impl Into<String>, snapshot: DocumentPatch) {
        match self.cursor {
            Some(c) => self.entries.truncate(c + 1),
            None => self.entries.clear(),
        }
        self.entries.push(HistoryEntry {
            timestamp: Utc::now(),
            action: action.into(),
            snapshot,
        });
        if self.entries.len() > HISTORY_CAP {
            let excess = self.entries.len() - HISTORY_CAP;
            self.entries.drain(0..excess);
        }
        // Cursor lands on the entry just pushed, even after eviction.
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step the cursor back one entry and return the snapshot to apply.
    ///
    /// Returns `None` (and changes nothing) when already at the floor or the
    /// log is empty.
    pub fn undo(&mut self) -> Option<&DocumentPatch> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                Some(&self.entries[c - 1].snapshot)
            }
            _ => None,
        }
    }

    /// Step the cursor forward one entry and return the snapshot to apply.
    ///
    /// Returns `None` (and changes nothing) when already at the newest entry.
    pub fn redo(&mut self) -> Option<&DocumentPatch> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                Some(&self.entries[c + 1].snapshot)
            }
            _ => None,
        }
    }

    /// Drop all entries, e.g. when a different document is loaded
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
