//! Linear undo/redo history of stroke-list snapshots.
//!
//! Snapshots live in an arena of immutable, shared stroke lists. The
//! history itself is a list of arena slots plus a cursor. Pushing while
//! the cursor is not at the end drops every entry after it.

use crate::stroke::Stroke;
use std::sync::Arc;

/// An immutable copy of the stroke list.
pub type Snapshot = Arc<[Stroke]>;

/// Minimum arena size before unreferenced snapshots are reclaimed.
const COMPACT_THRESHOLD: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct History {
    arena: Vec<Snapshot>,
    /// Arena slot of each entry, oldest first.
    entries: Vec<usize>,
    /// Current entry; `None` before anything was recorded.
    index: Option<usize>,
    /// Oldest entries are dropped beyond this many.
    max_entries: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `max_entries` entries.
    pub fn with_limit(max_entries: Option<usize>) -> Self {
        Self {
            max_entries: max_entries.map(|m| m.max(1)),
            ..Self::default()
        }
    }

    /// Record a new entry after the current one, dropping any redo entries.
    pub fn push(&mut self, strokes: &[Stroke]) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);

        self.arena.push(Arc::from(strokes));
        self.entries.push(self.arena.len() - 1);

        if let Some(max) = self.max_entries {
            let excess = self.entries.len().saturating_sub(max);
            self.entries.drain(..excess);
        }
        self.index = Some(self.entries.len() - 1);

        if self.arena.len() > COMPACT_THRESHOLD.max(self.entries.len() * 2) {
            self.compact();
        }
    }

    /// Replace the current entry's snapshot without moving the cursor.
    ///
    /// Returns false when there is no current entry.
    pub fn amend(&mut self, strokes: &[Stroke]) -> bool {
        let Some(index) = self.index else {
            return false;
        };
        let slot = self.entries[index];
        self.arena[slot] = Arc::from(strokes);
        true
    }

    /// Step back one entry and return its snapshot.
    ///
    /// Does nothing at the first entry.
    pub fn undo(&mut self) -> Option<Snapshot> {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                self.current()
            }
            _ => None,
        }
    }

    /// Step forward one entry and return its snapshot.
    ///
    /// Does nothing at the last entry.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index = Some(self.index.map_or(0, |i| i + 1));
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        let next = self.index.map_or(0, |i| i + 1);
        next < self.entries.len()
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<Snapshot> {
        self.index
            .map(|i| Arc::clone(&self.arena[self.entries[i]]))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position; `None` is the initial empty state.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Number of snapshots held, including ones no entry refers to.
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }

    /// Drop snapshots that no entry refers to.
    pub fn compact(&mut self) {
        let arena = std::mem::take(&mut self.arena);
        let mut slots = Vec::with_capacity(self.entries.len());
        for slot in &mut self.entries {
            slots.push(Arc::clone(&arena[*slot]));
            *slot = slots.len() - 1;
        }
        self.arena = slots;
    }
}
