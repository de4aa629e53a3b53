//! CLI command implementations for Scriptwright.

pub mod designs;
pub mod edit;
pub mod schema;
pub mod scripts;

use anyhow::{Context, Result};
use scriptwright_core::{ScriptwrightConfig, StorageBackend};
use scriptwright_schema::SchemaResolver;
use scriptwright_store::{create_design_store, create_store, DesignStore, ScriptStore};
use std::sync::Arc;

/// Build the resolver from the `schema` section and load the configured document.
pub async fn load_resolver(config: &ScriptwrightConfig) -> Result<Arc<SchemaResolver>> {
    let resolver = SchemaResolver::from_config(&config.schema)?;
    resolver
        .configure(config.schema.source.as_deref(), false)
        .await
        .context("Failed to load the action schema")?;
    Ok(Arc::new(resolver))
}

/// Open the configured script store. Defaults to the file backend.
pub fn open_store(config: &ScriptwrightConfig) -> Result<Arc<dyn ScriptStore>> {
    if config.storage.backend == StorageBackend::Memory {
        tracing::warn!("Using the memory backend; scripts are discarded on exit");
    }
    Ok(create_store(&config.storage)?)
}

/// Open the configured site design store.
pub fn open_design_store(config: &ScriptwrightConfig) -> Result<Arc<dyn DesignStore>> {
    Ok(create_design_store(&config.storage)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptwright_core::EditorConfig;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_default_store_keeps_scripts_between_runs() {
        let dir = tempdir().unwrap();
        let mut config = ScriptwrightConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::File);
        config.storage.directory = dir.path().join("scripts");

        let resolver = load_resolver(&config).await.unwrap();
        let created = scripts::create(
            resolver,
            open_store(&config).unwrap(),
            "Kept",
            "",
            &EditorConfig::default(),
        )
        .await
        .unwrap();

        let reopened = open_store(&config).unwrap();
        let summaries = scripts::list(reopened.as_ref()).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(Some(summaries[0].id.clone()), created.id);
        assert_eq!(summaries[0].title, "Kept");
    }

    #[tokio::test]
    async fn test_default_design_store_keeps_designs_between_runs() {
        let dir = tempdir().unwrap();
        let mut config = ScriptwrightConfig::default();
        config.storage.directory = dir.path().join("scripts");
        config.storage.designs_directory = dir.path().join("designs");

        let store = open_store(&config).unwrap();
        let script = store
            .save_script(&scriptwright_core::Script::new("Lists", Default::default()))
            .await
            .unwrap();

        let new = designs::NewDesign {
            title: "Sales hub".to_string(),
            script_ids: vec![script.id.clone().unwrap()],
            ..designs::NewDesign::default()
        };
        let designs_store = open_design_store(&config).unwrap();
        let created = designs::create(designs_store.as_ref(), store.as_ref(), new)
            .await
            .unwrap();

        let reopened = open_design_store(&config).unwrap();
        let listed = designs::list(reopened.as_ref()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }
}
