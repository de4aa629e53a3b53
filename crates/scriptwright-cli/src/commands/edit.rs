//! `scriptwright edit` command implementation.
//!
//! Replays a file of edit operations through an editing session and saves
//! the result. Files ending in `.json` are read as JSON, anything else as YAML.

use anyhow::{Context, Result};
use scriptwright_core::{EditorConfig, Script};
use scriptwright_editor::{EditOp, EditingSession};
use scriptwright_schema::SchemaResolver;
use scriptwright_store::ScriptStore;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Result of an edit run.
#[derive(Debug)]
pub struct EditOutcome {
    pub script: Script,
    pub applied: usize,
    pub saved: bool,
}

/// Read a list of operations from a YAML or JSON file.
pub fn read_ops(path: &Path) -> Result<Vec<EditOp>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let ops = if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))?
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("Invalid YAML in {:?}", path))?
    };
    Ok(ops)
}

/// Apply the operations in `ops_path` to script `id`. Stops at the first failing operation.
pub async fn run(
    resolver: Arc<SchemaResolver>,
    store: Arc<dyn ScriptStore>,
    id: &str,
    ops_path: &Path,
    config: &EditorConfig,
    dry_run: bool,
) -> Result<EditOutcome> {
    let ops = read_ops(ops_path)?;
    let mut session = EditingSession::open(resolver, store, id, config).await?;

    for (index, op) in ops.iter().enumerate() {
        session
            .apply(op)
            .with_context(|| format!("Operation #{} ({}) failed", index + 1, op.name()))?;
    }
    tracing::info!(id = %id, applied = ops.len(), dry_run, "Edit operations applied");

    if !dry_run {
        session.save().await?;
    }

    Ok(EditOutcome {
        script: session.into_script(),
        applied: ops.len(),
        saved: !dry_run,
    })
}

pub fn print_outcome(outcome: &EditOutcome, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("{}", serde_json::to_string_pretty(&outcome.script)?);
        println!("\n{} operation(s) applied (dry run, not saved)", outcome.applied);
    } else {
        println!(
            "✔ Applied {} operation(s) to '{}' and saved",
            outcome.applied, outcome.script.title
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptwright_store::FileScriptStore;
    use tempfile::tempdir;

    async fn setup() -> (tempfile::TempDir, Arc<SchemaResolver>, Arc<dyn ScriptStore>, String) {
        let dir = tempdir().unwrap();
        let resolver = SchemaResolver::with_default_source().unwrap();
        resolver.configure(None, false).await.unwrap();
        let resolver = Arc::new(resolver);

        let store: Arc<dyn ScriptStore> =
            Arc::new(FileScriptStore::new(dir.path().join("scripts")));
        let created = crate::commands::scripts::create(
            resolver.clone(),
            store.clone(),
            "Customer site",
            "",
            &EditorConfig::default(),
        )
        .await
        .unwrap();

        (dir, resolver, store, created.id.unwrap())
    }

    #[tokio::test]
    async fn test_edit_applies_and_saves() {
        let (dir, resolver, store, id) = setup().await;
        let ops_path = dir.path().join("ops.yaml");
        let ops = r#"
- op: add
  verb: createSPList
- op: update
  path: [0]
  properties:
    listName: Customers
- op: add
  parent: [0]
  verb: setDescription
"#;
        fs::write(&ops_path, ops).unwrap();

        let outcome = run(resolver, store.clone(), &id, &ops_path, &EditorConfig::default(), false)
            .await
            .unwrap();
        assert_eq!(outcome.applied, 3);
        assert!(outcome.saved);

        let stored = store.load_script(&id).await.unwrap();
        assert_eq!(stored.body.actions.len(), 1);
        assert_eq!(
            stored.body.actions[0].property("listName"),
            Some(&serde_json::json!("Customers"))
        );
        assert_eq!(stored.body.actions[0].child_count(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_and_json_ops() {
        let (dir, resolver, store, id) = setup().await;
        let ops_path = dir.path().join("ops.json");
        fs::write(&ops_path, r#"[{"op": "add", "verb": "applyTheme"}]"#).unwrap();

        let outcome = run(resolver, store.clone(), &id, &ops_path, &EditorConfig::default(), true)
            .await
            .unwrap();
        assert_eq!(outcome.script.body.actions.len(), 1);
        assert!(!outcome.saved);

        let stored = store.load_script(&id).await.unwrap();
        assert!(stored.body.actions.is_empty());
    }

    #[tokio::test]
    async fn test_failing_operation_stops_run() {
        let (dir, resolver, store, id) = setup().await;
        let ops_path = dir.path().join("ops.yaml");
        fs::write(&ops_path, "- op: add\n  verb: applyTheme\n- op: remove\n  path: [4]\n").unwrap();

        let err = run(resolver, store.clone(), &id, &ops_path, &EditorConfig::default(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Operation #2"));

        let stored = store.load_script(&id).await.unwrap();
        assert!(stored.body.actions.is_empty());
    }
}
