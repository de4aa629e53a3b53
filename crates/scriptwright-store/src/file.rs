//! File-backed script store: one pretty-printed JSON document per script.

use async_trait::async_trait;
use scriptwright_core::{Script, ScriptSummary};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PersistError;
use crate::store::{is_valid_id, sort_summaries, ScriptStore, StoredScript};

/// Store writing `<directory>/<id>.json`.
pub struct FileScriptStore {
    directory: PathBuf,
}

impl FileScriptStore {
    /// The directory is created on first save.
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.directory.join(format!("{}.json", id))
    }

    async fn read_stored(&self, path: &Path) -> Result<StoredScript, String> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ScriptStore for FileScriptStore {
    async fn load_script(&self, id: &str) -> Result<Script, PersistError> {
        if !is_valid_id(id) {
            return Err(PersistError::load(id, "invalid script id"));
        }

        let stored = self
            .read_stored(&self.path_for(id))
            .await
            .map_err(|reason| PersistError::load(id, reason))?;

        tracing::info!(id = %id, title = %stored.script.title, "Script loaded");
        Ok(stored.script)
    }

    async fn save_script(&self, script: &Script) -> Result<Script, PersistError> {
        if let Some(id) = script.id.as_deref().filter(|id| !id.is_empty()) {
            if !is_valid_id(id) {
                return Err(PersistError::SaveFailed(format!("invalid script id '{}'", id)));
            }
        }

        let stored = StoredScript::stamp(script);
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| PersistError::SaveFailed(e.to_string()))?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| PersistError::SaveFailed(e.to_string()))?;

        let path = self.path_for(stored.id());
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| PersistError::SaveFailed(e.to_string()))?;

        tracing::info!(id = %stored.id(), path = %path.display(), "Script saved");
        Ok(stored.script)
    }

    async fn delete_script(&self, script: &Script) -> Result<(), PersistError> {
        let id = script
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PersistError::DeleteFailed("script has never been saved".to_string()))?;

        if !is_valid_id(id) {
            return Err(PersistError::DeleteFailed(format!("invalid script id '{}'", id)));
        }

        tokio::fs::remove_file(self.path_for(id))
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    PersistError::DeleteFailed(format!("no script with id '{}'", id))
                }
                _ => PersistError::DeleteFailed(e.to_string()),
            })?;

        tracing::info!(id = %id, "Script deleted");
        Ok(())
    }

    async fn list_scripts(&self) -> Result<Vec<ScriptSummary>, PersistError> {
        let mut entries = match tokio::fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistError::load("*", e)),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PersistError::load("*", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match self.read_stored(&path).await {
                Ok(stored) => summaries.push(stored.summary()),
                Err(reason) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %reason,
                        "Skipping unreadable script file"
                    );
                }
            }
        }

        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}
