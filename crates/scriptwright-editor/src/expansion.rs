//! Which tree nodes are expanded, keyed by structural path.
//!
//! Paths are not remapped when the tree changes shape; callers collapse or
//! re-expand the affected level after a structural edit.

use scriptwright_core::ActionPath;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<ActionPath>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_expanded(&mut self, path: ActionPath, expanded: bool) {
        if expanded {
            self.expanded.insert(path);
        } else {
            self.expanded.remove(&path);
        }
    }

    pub fn is_expanded(&self, path: &ActionPath) -> bool {
        self.expanded.contains(path)
    }

    /// Expand or collapse the first `sibling_count` children of `level`. Descendants are untouched.
    pub fn set_all_expanded(&mut self, level: &ActionPath, sibling_count: usize, expanded: bool) {
        for index in 0..sibling_count {
            self.set_expanded(level.child(index), expanded);
        }
    }

    /// Make `path` the only expanded node among its siblings.
    pub fn expand_only(&mut self, path: ActionPath) {
        if let Some(level) = path.parent() {
            self.collapse_level(&level);
        }
        self.expanded.insert(path);
    }

    /// Collapse every node directly under `level`.
    pub fn collapse_level(&mut self, level: &ActionPath) {
        self.expanded.retain(|path| !path.is_child_of(level));
    }

    /// Whether any of the first `sibling_count` children of `level` is collapsed.
    pub fn is_any_collapsed(&self, level: &ActionPath, sibling_count: usize) -> bool {
        (0..sibling_count).any(|index| !self.is_expanded(&level.child(index)))
    }

    pub fn is_any_expanded(&self) -> bool {
        !self.expanded.is_empty()
    }

    pub fn expanded_paths(&self) -> impl Iterator<Item = &ActionPath> {
        self.expanded.iter()
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}
