//! Structural paths into an action tree.
//!
//! A path is the sequence of sibling indices leading from the script's root
//! `actions` list to a node. `[2]` is the third top-level action, `[2, 0]` is
//! its first sub-action. The empty path denotes the root list itself.
//!
//! The textual form joins indices with dots (`2.0`); the empty string is the root.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sequence of child indices from the script root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionPath(Vec<usize>);

impl ActionPath {
    /// The root list.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of indices; top-level actions have depth 1.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Index of the addressed node within its sibling list.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent node (`Some(root)` for top-level actions, `None` for the root).
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// True when `self` sits directly under `level`.
    pub fn is_child_of(&self, level: &ActionPath) -> bool {
        self.0.len() == level.0.len() + 1 && self.0.starts_with(&level.0)
    }

    /// True when `self` equals `other` or lies anywhere beneath it.
    pub fn starts_with(&self, other: &ActionPath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl From<Vec<usize>> for ActionPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for ActionPath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for ActionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Error returned when a textual path cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid action path '{input}': segment '{segment}' is not an index")]
pub struct PathParseError {
    pub input: String,
    pub segment: String,
}

impl FromStr for ActionPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        trimmed
            .split('.')
            .map(|segment| {
                segment.trim().parse::<usize>().map_err(|_| PathParseError {
                    input: s.to_string(),
                    segment: segment.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}
