//! The persistence gateway and its in-memory backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scriptwright_core::{Script, ScriptSummary, StorageBackend, StorageConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::error::PersistError;
use crate::file::FileScriptStore;

/// Trait for script persistence backends.
#[async_trait]
pub trait ScriptStore: Send + Sync {
    /// Load a script by id.
    async fn load_script(&self, id: &str) -> Result<Script, PersistError>;

    /// Persist a script. New scripts are assigned an id; the stored script is returned.
    async fn save_script(&self, script: &Script) -> Result<Script, PersistError>;

    /// Remove a persisted script.
    async fn delete_script(&self, script: &Script) -> Result<(), PersistError>;

    /// Summaries of every stored script, ordered by title.
    async fn list_scripts(&self) -> Result<Vec<ScriptSummary>, PersistError>;
}

/// Create a store based on configuration.
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn ScriptStore>, PersistError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryScriptStore::new())),
        StorageBackend::File => Ok(Arc::new(FileScriptStore::new(&config.directory))),
    }
}

/// A script as written by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredScript {
    pub saved_at: DateTime<Utc>,
    pub script: Script,
}

impl StoredScript {
    /// Stamp `script`, assigning a fresh id when it has none.
    pub fn stamp(script: &Script) -> Self {
        let mut script = script.clone();
        if script.is_new() {
            script.id = Some(Uuid::new_v4().to_string());
        }
        Self {
            saved_at: Utc::now(),
            script,
        }
    }

    pub fn id(&self) -> &str {
        self.script.id.as_deref().unwrap_or_default()
    }

    pub fn summary(&self) -> ScriptSummary {
        ScriptSummary {
            saved_at: Some(self.saved_at),
            ..self.script.summary()
        }
    }
}

/// Ids end up in file names and URLs; keep them to a safe alphabet.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub(crate) fn sort_summaries(summaries: &mut [ScriptSummary]) {
    summaries.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
}

/// Store keeping scripts in process memory.
#[derive(Default)]
pub struct MemoryScriptStore {
    scripts: RwLock<HashMap<String, StoredScript>>,
}

impl MemoryScriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored scripts.
    pub fn len(&self) -> usize {
        self.scripts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ScriptStore for MemoryScriptStore {
    async fn load_script(&self, id: &str) -> Result<Script, PersistError> {
        let scripts = self.scripts.read().unwrap_or_else(PoisonError::into_inner);
        scripts
            .get(id)
            .map(|stored| stored.script.clone())
            .ok_or_else(|| PersistError::load(id, "no such script"))
    }

    async fn save_script(&self, script: &Script) -> Result<Script, PersistError> {
        if let Some(id) = script.id.as_deref().filter(|id| !id.is_empty()) {
            if !is_valid_id(id) {
                return Err(PersistError::SaveFailed(format!("invalid script id '{}'", id)));
            }
        }

        let stored = StoredScript::stamp(script);
        let saved = stored.script.clone();
        tracing::debug!(id = %stored.id(), title = %saved.title, "Script saved in memory");

        let mut scripts = self.scripts.write().unwrap_or_else(PoisonError::into_inner);
        scripts.insert(stored.id().to_string(), stored);
        Ok(saved)
    }

    async fn delete_script(&self, script: &Script) -> Result<(), PersistError> {
        let id = script
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PersistError::DeleteFailed("script has never been saved".to_string()))?;

        let mut scripts = self.scripts.write().unwrap_or_else(PoisonError::into_inner);
        match scripts.remove(id) {
            Some(_) => {
                tracing::debug!(id = %id, "Script deleted from memory");
                Ok(())
            }
            None => Err(PersistError::DeleteFailed(format!("no script with id '{}'", id))),
        }
    }

    async fn list_scripts(&self) -> Result<Vec<ScriptSummary>, PersistError> {
        let scripts = self.scripts.read().unwrap_or_else(PoisonError::into_inner);
        let mut summaries: Vec<ScriptSummary> =
            scripts.values().map(StoredScript::summary).collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}
