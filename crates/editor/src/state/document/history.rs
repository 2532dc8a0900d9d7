//! Undo/redo functionality

use shared::{Layer, LayerId};

/// Maximum number of retained snapshots per document
pub const MAX_HISTORY: usize = 50;

/// Immutable capture of a document's layers and selection
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub layers: Vec<Layer>,
    pub selection: Vec<LayerId>,
}

/// Bounded snapshot log with a cursor.
///
/// `index` points at the snapshot matching the document's current state,
/// or -1 while nothing has been recorded. Undo/redo arm a one-shot flag
/// that swallows the record produced by replaying the returned snapshot,
/// so a replay never re-enters the log.
#[derive(Debug)]
pub struct HistoryStack {
    snapshots: Vec<Snapshot>,
    index: i64,
    suppress_next: bool,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            index: -1,
            suppress_next: false,
        }
    }
}

impl HistoryStack {
    /// Append a snapshot of the given state, truncating any redoable entries.
    ///
    /// Past `MAX_HISTORY` entries the oldest snapshot is evicted. A single
    /// call is ignored after `undo`/`redo` armed the suppression flag.
    pub fn record(&mut self, layers: &[Layer], selection: &[LayerId]) {
        if self.suppress_next {
            self.suppress_next = false;
            return;
        }
        self.snapshots.truncate((self.index + 1) as usize);
        self.snapshots.push(Snapshot {
            layers: layers.to_vec(),
            selection: selection.to_vec(),
        });
        self.index += 1;
        if self.snapshots.len() > MAX_HISTORY {
            self.snapshots.remove(0);
            self.index -= 1;
        }
    }

    /// Step back one snapshot; `None` when already at the oldest
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.index <= 0 {
            return None;
        }
        self.index -= 1;
        self.suppress_next = true;
        Some(self.snapshots[self.index as usize].clone())
    }

    /// Step forward one snapshot; `None` when already at the newest
    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.index >= self.snapshots.len() as i64 - 1 {
            return None;
        }
        self.index += 1;
        self.suppress_next = true;
        Some(self.snapshots[self.index as usize].clone())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.index < self.snapshots.len() as i64 - 1
    }

    /// Number of retained snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Cursor position, -1 while empty
    pub fn index(&self) -> i64 {
        self.index
    }
}
