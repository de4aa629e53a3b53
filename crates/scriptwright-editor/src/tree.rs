//! Structural operations on a script's action tree.
//!
//! Every operation takes the current [`Script`] by reference and returns a new
//! one; the caller's value is never touched. A `parent` of `None` (or the root
//! path) addresses the script's top-level `actions` list.

use scriptwright_core::{ActionNode, ActionPath, Script};
use scriptwright_schema::{declares_sub_actions, default_properties, SchemaResolver};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::TreeError;

/// Node at `path`, or `None` when the path leads nowhere. The root path has no node.
pub fn node_at<'a>(actions: &'a [ActionNode], path: &ActionPath) -> Option<&'a ActionNode> {
    let (first, rest) = path.indices().split_first()?;
    let mut node = actions.get(*first)?;
    for index in rest {
        node = node.subactions()?.get(*index)?;
    }
    Some(node)
}

fn node_at_mut<'a>(
    actions: &'a mut [ActionNode],
    path: &ActionPath,
) -> Option<&'a mut ActionNode> {
    let (first, rest) = path.indices().split_first()?;
    let mut node = actions.get_mut(*first)?;
    for index in rest {
        node = node.subactions_mut()?.get_mut(*index)?;
    }
    Some(node)
}

/// The list a node under `parent` lives in. A parent without a sub-action list has no children.
pub fn siblings<'a>(
    actions: &'a [ActionNode],
    parent: Option<&ActionPath>,
) -> Option<&'a [ActionNode]> {
    match parent.filter(|p| !p.is_root()) {
        None => Some(actions),
        Some(path) => node_at(actions, path).map(|node| node.subactions().unwrap_or(&[])),
    }
}

fn siblings_mut<'a>(
    actions: &'a mut Vec<ActionNode>,
    parent: Option<&ActionPath>,
) -> Option<&'a mut Vec<ActionNode>> {
    match parent.filter(|p| !p.is_root()) {
        None => Some(actions),
        Some(path) => node_at_mut(actions, path).map(ActionNode::subactions_or_default),
    }
}

/// Schema-aware editor for action trees.
#[derive(Clone)]
pub struct ActionTree {
    resolver: Arc<SchemaResolver>,
}

impl ActionTree {
    pub fn new(resolver: Arc<SchemaResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<SchemaResolver> {
        &self.resolver
    }

    /// Append a new `verb` node under `parent`, properties set to their defaults.
    pub fn add_action(
        &self,
        script: &Script,
        parent: Option<&ActionPath>,
        verb: &str,
    ) -> Result<Script, TreeError> {
        let parent = parent.filter(|p| !p.is_root());

        let (allowed, fragment, parent_verb) = match parent {
            None => (
                self.resolver.available_verbs()?,
                self.resolver.action_schema(verb)?,
                None,
            ),
            Some(path) => {
                let parent_node = node_at(&script.body.actions, path)
                    .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
                let parent_verb = parent_node.verb();
                (
                    self.resolver.available_sub_verbs(parent_verb)?,
                    self.resolver.sub_action_schema(parent_verb, verb)?,
                    Some(parent_verb.to_string()),
                )
            }
        };

        let fragment = match fragment {
            Some(fragment) if allowed.iter().any(|v| v == verb) => fragment,
            _ => {
                return Err(TreeError::UnknownVerb {
                    verb: verb.to_string(),
                    parent: parent_verb,
                });
            }
        };

        let mut node = ActionNode::with_properties(verb, default_properties(&fragment));
        if declares_sub_actions(&fragment) {
            node = node.with_subactions(Vec::new());
        }

        let mut updated = script.clone();
        let list = siblings_mut(&mut updated.body.actions, parent)
            .ok_or_else(|| TreeError::InvalidPath(parent.cloned().unwrap_or_default()))?;
        list.push(node);

        tracing::debug!(
            verb = %verb,
            parent = %parent.map(ToString::to_string).unwrap_or_default(),
            index = list.len() - 1,
            "Action added"
        );
        Ok(updated)
    }

    /// Delete the node at `path`; later siblings shift down.
    pub fn remove_action(&self, script: &Script, path: &ActionPath) -> Result<Script, TreeError> {
        let invalid = || TreeError::InvalidPath(path.clone());
        let index = path.last().ok_or_else(invalid)?;
        let parent = path.parent().ok_or_else(invalid)?;

        let mut updated = script.clone();
        let list = siblings_mut(&mut updated.body.actions, Some(&parent)).ok_or_else(invalid)?;
        if index >= list.len() {
            return Err(invalid());
        }

        let removed = list.remove(index);
        tracing::debug!(path = %path, verb = %removed.verb(), "Action removed");
        Ok(updated)
    }

    /// Move a node within its sibling list.
    ///
    /// A `new_index` outside the list leaves the script unchanged.
    pub fn move_action(
        &self,
        script: &Script,
        parent: Option<&ActionPath>,
        old_index: usize,
        new_index: isize,
    ) -> Result<Script, TreeError> {
        let parent_path = parent.cloned().unwrap_or_default();
        let len = siblings(&script.body.actions, parent)
            .ok_or_else(|| TreeError::InvalidPath(parent_path.clone()))?
            .len();

        let Some(new_index) = usize::try_from(new_index).ok().filter(|i| *i < len) else {
            tracing::debug!(new_index, len, "Move target out of range; ignored");
            return Ok(script.clone());
        };

        if old_index >= len {
            return Err(TreeError::InvalidPath(parent_path.child(old_index)));
        }

        let mut updated = script.clone();
        let list = siblings_mut(&mut updated.body.actions, parent)
            .ok_or_else(|| TreeError::InvalidPath(parent_path.clone()))?;
        let node = list.remove(old_index);
        list.insert(new_index, node);

        tracing::debug!(parent = %parent_path, old_index, new_index, "Action moved");
        Ok(updated)
    }

    /// Shallow-merge `properties` into the node at `path`. `verb` and `subactions` are ignored.
    pub fn update_action(
        &self,
        script: &Script,
        path: &ActionPath,
        properties: Map<String, Value>,
    ) -> Result<Script, TreeError> {
        let mut updated = script.clone();
        let node = node_at_mut(&mut updated.body.actions, path)
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;

        let ignored = node.merge_properties(properties);
        if !ignored.is_empty() {
            tracing::debug!(path = %path, ignored = ?ignored, "Reserved keys ignored in update");
        }
        tracing::debug!(path = %path, verb = %node.verb(), "Action updated");
        Ok(updated)
    }

    pub fn can_move_up(&self, script: &Script, parent: Option<&ActionPath>, index: usize) -> bool {
        let len = siblings(&script.body.actions, parent).map_or(0, <[ActionNode]>::len);
        index > 0 && index < len
    }

    pub fn can_move_down(
        &self,
        script: &Script,
        parent: Option<&ActionPath>,
        index: usize,
    ) -> bool {
        let len = siblings(&script.body.actions, parent).map_or(0, <[ActionNode]>::len);
        index + 1 < len
    }

    pub fn move_up(
        &self,
        script: &Script,
        parent: Option<&ActionPath>,
        index: usize,
    ) -> Result<Script, TreeError> {
        self.move_action(script, parent, index, index as isize - 1)
    }

    pub fn move_down(
        &self,
        script: &Script,
        parent: Option<&ActionPath>,
        index: usize,
    ) -> Result<Script, TreeError> {
        self.move_action(script, parent, index, index as isize + 1)
    }

    /// Fragment describing the node at `path`.
    ///
    /// Top-level nodes are looked up by verb; nested nodes by their parent's verb and their own.
    pub fn schema_for(
        &self,
        script: &Script,
        path: &ActionPath,
    ) -> Result<Option<Value>, TreeError> {
        let node = node_at(&script.body.actions, path)
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;

        if path.depth() == 1 {
            return Ok(self.resolver.action_schema(node.verb())?);
        }

        let parent_path = path
            .parent()
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
        let parent = node_at(&script.body.actions, &parent_path)
            .ok_or_else(|| TreeError::InvalidPath(parent_path.clone()))?;
        Ok(self.resolver.sub_action_schema(parent.verb(), node.verb())?)
    }
}
