//! Site design persistence.
//!
//! Designs reference scripts by id only; the stores here never load the
//! referenced scripts.

use async_trait::async_trait;
use chrono::Utc;
use scriptwright_core::{SiteDesign, StorageBackend, StorageConfig};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::error::PersistError;
use crate::store::is_valid_id;

/// Trait for site design persistence backends.
#[async_trait]
pub trait DesignStore: Send + Sync {
    async fn load_design(&self, id: &str) -> Result<SiteDesign, PersistError>;

    /// Persist a design. New designs are assigned an id; the stored design is returned.
    async fn save_design(&self, design: &SiteDesign) -> Result<SiteDesign, PersistError>;

    async fn delete_design(&self, design: &SiteDesign) -> Result<(), PersistError>;

    /// Every stored design, ordered by title.
    async fn list_designs(&self) -> Result<Vec<SiteDesign>, PersistError>;
}

/// Create a design store based on configuration.
pub fn create_design_store(config: &StorageConfig) -> Result<Arc<dyn DesignStore>, PersistError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryDesignStore::new())),
        StorageBackend::File => Ok(Arc::new(FileDesignStore::new(&config.designs_directory))),
    }
}

/// Copy of `design` as it will be written: id assigned, save time set.
fn stamp(design: &SiteDesign) -> Result<SiteDesign, PersistError> {
    let mut design = design.clone();
    match design.id.clone().filter(|id| !id.is_empty()) {
        Some(id) if !is_valid_id(&id) => {
            return Err(PersistError::SaveFailed(format!("invalid design id '{}'", id)));
        }
        Some(_) => {}
        None => design.id = Some(Uuid::new_v4().to_string()),
    }
    design.saved_at = Some(Utc::now());
    Ok(design)
}

fn saved_id(design: &SiteDesign) -> Result<&str, PersistError> {
    let id = design
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| PersistError::DeleteFailed("design has never been saved".to_string()))?;

    if !is_valid_id(id) {
        return Err(PersistError::DeleteFailed(format!("invalid design id '{}'", id)));
    }
    Ok(id)
}

fn sort_designs(designs: &mut [SiteDesign]) {
    designs.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
}

/// Store keeping designs in process memory.
#[derive(Default)]
pub struct MemoryDesignStore {
    designs: RwLock<HashMap<String, SiteDesign>>,
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DesignStore for MemoryDesignStore {
    async fn load_design(&self, id: &str) -> Result<SiteDesign, PersistError> {
        let designs = self.designs.read().unwrap_or_else(PoisonError::into_inner);
        designs
            .get(id)
            .cloned()
            .ok_or_else(|| PersistError::load(id, "no such design"))
    }

    async fn save_design(&self, design: &SiteDesign) -> Result<SiteDesign, PersistError> {
        let stored = stamp(design)?;
        let id = stored.id.clone().unwrap_or_default();
        tracing::debug!(id = %id, title = %stored.title, "Design saved in memory");

        let mut designs = self.designs.write().unwrap_or_else(PoisonError::into_inner);
        designs.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_design(&self, design: &SiteDesign) -> Result<(), PersistError> {
        let id = saved_id(design)?;
        let mut designs = self.designs.write().unwrap_or_else(PoisonError::into_inner);
        match designs.remove(id) {
            Some(_) => Ok(()),
            None => Err(PersistError::DeleteFailed(format!("no design with id '{}'", id))),
        }
    }

    async fn list_designs(&self) -> Result<Vec<SiteDesign>, PersistError> {
        let designs = self.designs.read().unwrap_or_else(PoisonError::into_inner);
        let mut listed: Vec<SiteDesign> = designs.values().cloned().collect();
        sort_designs(&mut listed);
        Ok(listed)
    }
}

/// Store writing `<directory>/<id>.json`.
pub struct FileDesignStore {
    directory: PathBuf,
}

impl FileDesignStore {
    /// The directory is created on first save.
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.directory.join(format!("{}.json", id))
    }

    async fn read_design(&self, path: &Path) -> Result<SiteDesign, String> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl DesignStore for FileDesignStore {
    async fn load_design(&self, id: &str) -> Result<SiteDesign, PersistError> {
        if !is_valid_id(id) {
            return Err(PersistError::load(id, "invalid design id"));
        }

        self.read_design(&self.path_for(id))
            .await
            .map_err(|reason| PersistError::load(id, reason))
    }

    async fn save_design(&self, design: &SiteDesign) -> Result<SiteDesign, PersistError> {
        let stored = stamp(design)?;
        let id = stored.id.clone().unwrap_or_default();
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| PersistError::SaveFailed(e.to_string()))?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| PersistError::SaveFailed(e.to_string()))?;

        let path = self.path_for(&id);
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| PersistError::SaveFailed(e.to_string()))?;

        tracing::info!(id = %id, path = %path.display(), "Design saved");
        Ok(stored)
    }

    async fn delete_design(&self, design: &SiteDesign) -> Result<(), PersistError> {
        let id = saved_id(design)?;
        tokio::fs::remove_file(self.path_for(id))
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    PersistError::DeleteFailed(format!("no design with id '{}'", id))
                }
                _ => PersistError::DeleteFailed(e.to_string()),
            })?;

        tracing::info!(id = %id, "Design deleted");
        Ok(())
    }

    async fn list_designs(&self) -> Result<Vec<SiteDesign>, PersistError> {
        let mut entries = match tokio::fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistError::load("*", e)),
        };

        let mut designs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PersistError::load("*", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match self.read_design(&path).await {
                Ok(design) => designs.push(design),
                Err(reason) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %reason,
                        "Skipping unreadable design file"
                    );
                }
            }
        }

        sort_designs(&mut designs);
        Ok(designs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptwright_core::WebTemplate;

    #[tokio::test]
    async fn test_memory_design_round_trip() {
        let store = MemoryDesignStore::new();
        let mut design = SiteDesign::new("Project", WebTemplate::TeamSite);
        design.site_script_ids = vec!["s1".to_string()];

        let saved = store.save_design(&design).await.unwrap();
        assert!(!saved.is_new());
        assert!(saved.saved_at.is_some());

        let id = saved.id.clone().unwrap();
        assert_eq!(store.load_design(&id).await.unwrap(), saved);

        let mut edited = saved.clone();
        edited.is_default = true;
        let resaved = store.save_design(&edited).await.unwrap();
        assert_eq!(resaved.id, saved.id);
        assert_eq!(store.list_designs().await.unwrap().len(), 1);

        store.delete_design(&resaved).await.unwrap();
        assert!(matches!(
            store.load_design(&id).await,
            Err(PersistError::LoadFailed { .. })
        ));
        assert!(matches!(
            store.delete_design(&resaved).await,
            Err(PersistError::DeleteFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_file_designs_sorted_and_bad_files_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDesignStore::new(dir.path());
        assert!(store.list_designs().await.unwrap().is_empty());

        for title in ["Hub", "Archive"] {
            store
                .save_design(&SiteDesign::new(title, WebTemplate::CommunicationSite))
                .await
                .unwrap();
        }
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();

        let titles: Vec<String> = store
            .list_designs()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["Archive", "Hub"]);
    }

    #[tokio::test]
    async fn test_rejects_path_like_design_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDesignStore::new(dir.path());

        let mut design = SiteDesign::new("Escape", WebTemplate::TeamSite);
        design.id = Some("../x".to_string());
        assert!(matches!(
            store.save_design(&design).await,
            Err(PersistError::SaveFailed(_))
        ));
        assert!(matches!(
            store.delete_design(&design).await,
            Err(PersistError::DeleteFailed(_))
        ));
        assert!(store.load_design("../x").await.is_err());
    }
}
