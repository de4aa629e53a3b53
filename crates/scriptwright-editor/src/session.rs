//! One editing session over a single script.
//!
//! The session owns the live [`Script`] and its side tables. Every structural
//! edit snapshots the script into the [`EditHistory`] before the change is
//! applied; edits that fail or change nothing leave the history alone.

use scriptwright_core::{ActionPath, EditorConfig, Script};
use scriptwright_schema::{coerce_value, form_fields, FieldKind, FormField, SchemaResolver};
use scriptwright_store::ScriptStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{SessionError, TreeError};
use crate::expansion::ExpansionState;
use crate::history::EditHistory;
use crate::ops::EditOp;
use crate::tree::{siblings, ActionTree};

pub const SAVED_MESSAGE: &str = "The site script has been properly saved";
pub const SAVE_FAILED_MESSAGE: &str = "The site script cannot be properly saved";
pub const NO_TITLE_MESSAGE: &str = "The site script has no title";
pub const DELETED_MESSAGE: &str = "The site script has been properly deleted";
pub const DELETE_FAILED_MESSAGE: &str = "The site script cannot be deleted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// Feedback shown to the operator after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl UserMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

pub struct EditingSession {
    tree: ActionTree,
    store: Arc<dyn ScriptStore>,
    script: Script,
    history: EditHistory,
    expansion: ExpansionState,
    message: Option<UserMessage>,
    dirty: bool,
}

impl EditingSession {
    /// Start a session on an in-memory script.
    pub fn from_script(
        resolver: Arc<SchemaResolver>,
        store: Arc<dyn ScriptStore>,
        script: Script,
        config: &EditorConfig,
    ) -> Self {
        Self {
            tree: ActionTree::new(resolver),
            store,
            script,
            history: EditHistory::with_capacity(config.history_capacity),
            expansion: ExpansionState::new(),
            message: None,
            dirty: false,
        }
    }

    /// Load a persisted script and start editing it.
    pub async fn open(
        resolver: Arc<SchemaResolver>,
        store: Arc<dyn ScriptStore>,
        id: &str,
        config: &EditorConfig,
    ) -> Result<Self, SessionError> {
        let script = store.load_script(id).await.inspect_err(|e| {
            tracing::warn!(id = %id, error = %e, "Failed to open script");
        })?;

        tracing::info!(id = %id, title = %script.title, "Editing session opened");
        Ok(Self::from_script(resolver, store, script, config))
    }

    /// Start a session on a brand new, unsaved script.
    pub fn create(
        resolver: Arc<SchemaResolver>,
        store: Arc<dyn ScriptStore>,
        title: impl Into<String>,
        description: impl Into<String>,
        config: &EditorConfig,
    ) -> Result<Self, SessionError> {
        let mut script = Script::new(title, resolver.new_script_body()?);
        script.description = description.into();

        let mut session = Self::from_script(resolver, store, script, config);
        session.dirty = true;
        Ok(session)
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn into_script(self) -> Script {
        self.script
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn expansion_mut(&mut self) -> &mut ExpansionState {
        &mut self.expansion
    }

    pub fn message(&self) -> Option<&UserMessage> {
        self.message.as_ref()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True when the script has changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_new(&self) -> bool {
        self.script.is_new()
    }

    /// Replace the live script with `updated`, snapshotting the current one first.
    /// Returns false, and records nothing, when nothing changed.
    fn commit(&mut self, updated: Script) -> bool {
        if updated == self.script {
            return false;
        }
        self.history.snapshot(&self.script);
        self.script = updated;
        self.dirty = true;
        true
    }

    fn fail<T>(&mut self, err: impl Into<SessionError>) -> Result<T, SessionError> {
        let err = err.into();
        tracing::debug!(error = %err, "Edit rejected");
        self.message = Some(UserMessage::error(err.to_string()));
        Err(err)
    }

    /// Append a `verb` node under `parent` and return its path.
    ///
    /// The new node becomes the only expanded one at its level.
    pub fn add_action(
        &mut self,
        parent: Option<&ActionPath>,
        verb: &str,
    ) -> Result<ActionPath, SessionError> {
        let updated = match self.tree.add_action(&self.script, parent, verb) {
            Ok(updated) => updated,
            Err(e) => return self.fail(e),
        };

        let level = parent.cloned().unwrap_or_default();
        let index = siblings(&updated.body.actions, Some(&level))
            .map_or(0, |list| list.len().saturating_sub(1));
        self.commit(updated);

        let path = level.child(index);
        self.expansion.expand_only(path.clone());
        Ok(path)
    }

    /// Delete the node at `path`. Its level is collapsed afterwards.
    pub fn remove_action(&mut self, path: &ActionPath) -> Result<(), SessionError> {
        let updated = match self.tree.remove_action(&self.script, path) {
            Ok(updated) => updated,
            Err(e) => return self.fail(e),
        };

        self.commit(updated);
        if let Some(level) = path.parent() {
            self.expansion.collapse_level(&level);
        }
        Ok(())
    }

    /// Reorder within one sibling list. Returns false when the target is out of range.
    pub fn move_action(
        &mut self,
        parent: Option<&ActionPath>,
        old_index: usize,
        new_index: isize,
    ) -> Result<bool, SessionError> {
        match self.tree.move_action(&self.script, parent, old_index, new_index) {
            Ok(updated) => Ok(self.commit(updated)),
            Err(e) => self.fail(e),
        }
    }

    pub fn move_up(
        &mut self,
        parent: Option<&ActionPath>,
        index: usize,
    ) -> Result<bool, SessionError> {
        self.move_action(parent, index, index as isize - 1)
    }

    pub fn move_down(
        &mut self,
        parent: Option<&ActionPath>,
        index: usize,
    ) -> Result<bool, SessionError> {
        self.move_action(parent, index, index as isize + 1)
    }

    /// Shallow-merge `properties` into the node at `path`.
    pub fn update_action(
        &mut self,
        path: &ActionPath,
        properties: Map<String, Value>,
    ) -> Result<(), SessionError> {
        match self.tree.update_action(&self.script, path, properties) {
            Ok(updated) => {
                self.commit(updated);
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Set one property from raw input, converting it for the field's kind.
    pub fn set_field(
        &mut self,
        path: &ActionPath,
        name: &str,
        raw: Value,
    ) -> Result<(), SessionError> {
        let kind = match self.form_for(path) {
            Ok(fields) => fields
                .into_iter()
                .find(|field| field.name == name)
                .map_or(FieldKind::Text, |field| field.kind),
            Err(e) => return self.fail(e),
        };

        let value = match coerce_value(kind, raw) {
            Ok(value) => value,
            Err(e) => return self.fail(e),
        };

        let mut properties = Map::new();
        properties.insert(name.to_string(), value);
        self.update_action(path, properties)
    }

    /// Restore the most recent snapshot.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        match self.history.undo() {
            Ok(previous) => {
                self.script = previous;
                self.dirty = true;
                tracing::debug!(remaining = self.history.len(), "Undo applied");
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Apply one serialized edit.
    pub fn apply(&mut self, op: &EditOp) -> Result<(), SessionError> {
        tracing::debug!(op = op.name(), "Applying edit");
        match op {
            EditOp::Add { parent, verb } => self.add_action(parent.as_ref(), verb).map(|_| ()),
            EditOp::Remove { path } => self.remove_action(path),
            EditOp::Move {
                parent,
                old_index,
                new_index,
            } => self
                .move_action(parent.as_ref(), *old_index, *new_index)
                .map(|_| ()),
            EditOp::Update { path, properties } => self.update_action(path, properties.clone()),
            EditOp::Undo => self.undo(),
        }
    }

    /// Edit the script's metadata. Not recorded in the undo history.
    pub fn set_properties(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        version: Option<u32>,
    ) {
        if let Some(title) = title {
            self.script.title = title;
        }
        if let Some(description) = description {
            self.script.description = description;
        }
        if let Some(version) = version {
            self.script.version = version;
        }
        self.dirty = true;
    }

    /// Persist the script.
    ///
    /// On success the history is cleared and the stored copy (with its id)
    /// becomes the live script. On failure the script stays as it was and
    /// remains editable.
    pub async fn save(&mut self) -> Result<(), SessionError> {
        if self.script.title.trim().is_empty() {
            self.message = Some(UserMessage::error(NO_TITLE_MESSAGE));
            return Err(SessionError::Validation(NO_TITLE_MESSAGE.to_string()));
        }

        match self.store.save_script(&self.script).await {
            Ok(saved) => {
                tracing::info!(
                    id = %saved.id.as_deref().unwrap_or_default(),
                    title = %saved.title,
                    "Script saved"
                );
                self.script = saved;
                self.history.clear();
                self.dirty = false;
                self.message = Some(UserMessage::success(SAVED_MESSAGE));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Script save failed");
                self.message = Some(UserMessage::error(SAVE_FAILED_MESSAGE));
                Err(e.into())
            }
        }
    }

    /// Remove the persisted script. New scripts cannot be deleted.
    pub async fn delete(&mut self) -> Result<(), SessionError> {
        if self.script.is_new() {
            self.message = Some(UserMessage::error(DELETE_FAILED_MESSAGE));
            return Err(SessionError::Validation(
                "a script that was never saved cannot be deleted".to_string(),
            ));
        }

        match self.store.delete_script(&self.script).await {
            Ok(()) => {
                let id = self.script.id.as_deref().unwrap_or_default();
                tracing::info!(id = %id, "Script deleted");
                self.history.clear();
                self.message = Some(UserMessage::success(DELETED_MESSAGE));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Script delete failed");
                self.message = Some(UserMessage::error(DELETE_FAILED_MESSAGE));
                Err(e.into())
            }
        }
    }

    /// Fragment for the node at `path`.
    pub fn schema_for(&self, path: &ActionPath) -> Result<Option<Value>, SessionError> {
        Ok(self.tree.schema_for(&self.script, path)?)
    }

    /// Editable fields for the node at `path`; empty when its verb has no fragment.
    pub fn form_for(&self, path: &ActionPath) -> Result<Vec<FormField>, SessionError> {
        Ok(self
            .schema_for(path)?
            .map(|fragment| form_fields(&fragment))
            .unwrap_or_default())
    }

    /// Verbs that can be added under `parent` (root when `None`).
    pub fn available_verbs(
        &self,
        parent: Option<&ActionPath>,
    ) -> Result<Vec<String>, SessionError> {
        let resolver = self.tree.resolver();
        match parent.filter(|p| !p.is_root()) {
            None => Ok(resolver.available_verbs()?),
            Some(path) => {
                let node = crate::tree::node_at(&self.script.body.actions, path)
                    .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
                Ok(resolver.available_sub_verbs(node.verb())?)
            }
        }
    }
}
