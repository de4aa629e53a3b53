//! Site design commands.
//!
//! `scriptwright designs list|show|new|delete`

use anyhow::{Context, Result};
use scriptwright_core::{SiteDesign, WebTemplate};
use scriptwright_store::{DesignStore, ScriptStore};

pub async fn list(designs: &dyn DesignStore) -> Result<Vec<SiteDesign>> {
    Ok(designs.list_designs().await?)
}

pub async fn show(designs: &dyn DesignStore, id: &str) -> Result<SiteDesign> {
    designs
        .load_design(id)
        .await
        .with_context(|| format!("Failed to load design {}", id))
}

/// Fields of a design to create.
#[derive(Debug, Default)]
pub struct NewDesign {
    pub title: String,
    pub description: String,
    pub web_template: WebTemplate,
    pub script_ids: Vec<String>,
    pub is_default: bool,
}

/// Save a new design. Every referenced script must exist in `scripts`.
pub async fn create(
    designs: &dyn DesignStore,
    scripts: &dyn ScriptStore,
    new: NewDesign,
) -> Result<SiteDesign> {
    if new.title.trim().is_empty() {
        anyhow::bail!("A site design needs a title");
    }

    for id in &new.script_ids {
        scripts
            .load_script(id)
            .await
            .with_context(|| format!("Design references unknown script {}", id))?;
    }

    let mut design = SiteDesign::new(new.title, new.web_template);
    design.description = new.description;
    design.site_script_ids = new.script_ids;
    design.is_default = new.is_default;

    let saved = designs
        .save_design(&design)
        .await
        .context("The site design cannot be saved")?;
    tracing::info!(
        id = %saved.id.as_deref().unwrap_or_default(),
        scripts = saved.site_script_ids.len(),
        "Site design saved"
    );
    Ok(saved)
}

pub async fn delete(designs: &dyn DesignStore, id: &str) -> Result<()> {
    let design = show(designs, id).await?;
    designs
        .delete_design(&design)
        .await
        .context("The site design cannot be deleted")?;
    Ok(())
}

pub fn print_designs(designs: &[SiteDesign]) {
    println!("\nSite designs ({}):", designs.len());
    for design in designs {
        let marker = if design.is_default { " (default)" } else { "" };
        println!(
            "   {:<36}  {:<32} {:<18} {:>2} scripts{}",
            design.id.as_deref().unwrap_or_default(),
            design.title,
            design.web_template.label(),
            design.site_script_ids.len(),
            marker
        );
    }
}
