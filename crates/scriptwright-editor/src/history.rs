//! Bounded undo buffer of whole-script snapshots.

use scriptwright_core::Script;
use std::collections::VecDeque;

use crate::error::HistoryError;

/// Snapshots kept when no capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Most-recent-first stack of script snapshots.
#[derive(Debug, Clone)]
pub struct EditHistory {
    snapshots: VecDeque<Script>,
    capacity: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A capacity of zero is raised to one. Storage grows as snapshots arrive.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a copy of `script`. At capacity the oldest snapshot is dropped first.
    pub fn snapshot(&mut self, script: &Script) {
        if self.snapshots.len() >= self.capacity {
            self.snapshots.pop_back();
        }
        self.snapshots.push_front(script.clone());
    }

    /// Pop the most recent snapshot.
    pub fn undo(&mut self) -> Result<Script, HistoryError> {
        self.snapshots.pop_front().ok_or(HistoryError::Empty)
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
