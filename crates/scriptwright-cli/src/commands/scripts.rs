//! Stored script commands.
//!
//! `scriptwright scripts list|show|new|delete`

use anyhow::{Context, Result};
use scriptwright_core::{EditorConfig, Script, ScriptSummary};
use scriptwright_editor::EditingSession;
use scriptwright_schema::SchemaResolver;
use scriptwright_store::ScriptStore;
use std::sync::Arc;

pub async fn list(store: &dyn ScriptStore) -> Result<Vec<ScriptSummary>> {
    Ok(store.list_scripts().await?)
}

pub async fn show(store: &dyn ScriptStore, id: &str) -> Result<Script> {
    store
        .load_script(id)
        .await
        .with_context(|| format!("Failed to load script {}", id))
}

/// Create an empty script and save it, returning the stored copy.
pub async fn create(
    resolver: Arc<SchemaResolver>,
    store: Arc<dyn ScriptStore>,
    title: &str,
    description: &str,
    config: &EditorConfig,
) -> Result<Script> {
    let mut session = EditingSession::create(resolver, store, title, description, config)?;
    session.save().await?;
    Ok(session.into_script())
}

pub async fn delete(store: &dyn ScriptStore, id: &str) -> Result<()> {
    let script = show(store, id).await?;
    store.delete_script(&script).await?;
    Ok(())
}

pub fn print_summaries(summaries: &[ScriptSummary]) {
    println!("\nScripts ({}):", summaries.len());
    for summary in summaries {
        let saved = summary
            .saved_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "   {:<36}  {:<32} v{:<3} {:>3} actions  {}",
            summary.id, summary.title, summary.version, summary.action_count, saved
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptwright_store::FileScriptStore;
    use tempfile::tempdir;

    async fn resolver() -> Arc<SchemaResolver> {
        let resolver = SchemaResolver::with_default_source().unwrap();
        resolver.configure(None, false).await.unwrap();
        Arc::new(resolver)
    }

    #[tokio::test]
    async fn test_create_list_show_delete() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn ScriptStore> = Arc::new(FileScriptStore::new(dir.path()));

        let created = create(
            resolver().await,
            store.clone(),
            "Team site",
            "Default team layout",
            &EditorConfig::default(),
        )
        .await
        .unwrap();
        let id = created.id.clone().unwrap();

        let summaries = list(store.as_ref()).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title, "Team site");

        let shown = show(store.as_ref(), &id).await.unwrap();
        assert_eq!(shown.description, "Default team layout");

        delete(store.as_ref(), &id).await.unwrap();
        assert!(list(store.as_ref()).await.unwrap().is_empty());
        assert!(show(store.as_ref(), &id).await.is_err());
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn ScriptStore> = Arc::new(FileScriptStore::new(dir.path()));

        let config = EditorConfig::default();
        let result = create(resolver().await, store.clone(), "", "", &config).await;
        assert!(result.is_err());
        assert!(list(store.as_ref()).await.unwrap().is_empty());
    }
}
