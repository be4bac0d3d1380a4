//! Bounded linear undo/redo history of element snapshots.
//!
//! The store holds at most [`HISTORY_LIMIT`] snapshots and a cursor pointing at
//! the snapshot that matches what the editor currently shows. Saving truncates
//! any redo tail, so history never branches.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::consts::HISTORY_LIMIT;

/// One saved snapshot and the time it was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub state: T,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
}

/// Undo/redo store owned by a single editor instance.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<Snapshot<T>>,
    cursor: usize,
    limit: usize,
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

impl<T: Clone> History<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// A store holding at most `limit` snapshots (at least one).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { entries: VecDeque::new(), cursor: 0, limit: limit.max(1) }
    }

    /// Record `state` as the newest snapshot, discarding any redo tail.
    pub fn save_state(&mut self, state: &T) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(Snapshot { state: state.clone(), ts: now_ms() });
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one snapshot and return it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(|s| s.state.clone())
    }

    /// Step forward one snapshot and return it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).map(|s| s.state.clone())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot<T>> {
        self.entries.get(self.cursor)
    }

    /// Index of the current snapshot.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every snapshot. Called when the editing session ends.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
