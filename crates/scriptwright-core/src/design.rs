//! Site designs: named bundles of site scripts applied to new sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site template a design applies to. Serialized as the platform's template code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebTemplate {
    #[default]
    #[serde(rename = "64")]
    TeamSite,
    #[serde(rename = "68")]
    CommunicationSite,
}

impl WebTemplate {
    pub fn code(self) -> &'static str {
        match self {
            WebTemplate::TeamSite => "64",
            WebTemplate::CommunicationSite => "68",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WebTemplate::TeamSite => "team site",
            WebTemplate::CommunicationSite => "communication site",
        }
    }
}

/// A site design and the scripts it runs, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDesign {
    /// Identifier assigned by the store. `None` until the design is first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub web_template: WebTemplate,

    /// Ids of the site scripts to run, in execution order.
    #[serde(default)]
    pub site_script_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image_alt_text: Option<String>,

    /// Offered by default when a site of `web_template` is created.
    #[serde(default)]
    pub is_default: bool,

    #[serde(default = "default_design_version")]
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SiteDesign {
    /// Create a new, unsaved design with no scripts.
    pub fn new(title: impl Into<String>, web_template: WebTemplate) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            web_template,
            site_script_ids: Vec::new(),
            preview_image_url: None,
            preview_image_alt_text: None,
            is_default: false,
            version: default_design_version(),
            saved_at: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.as_deref().map_or(true, str::is_empty)
    }
}

fn default_design_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_design_wire_form() {
        let mut design = SiteDesign::new("Project site", WebTemplate::CommunicationSite);
        design.site_script_ids = vec!["a1".to_string(), "b2".to_string()];

        let value = serde_json::to_value(&design).unwrap();
        assert_eq!(value["webTemplate"], json!("68"));
        assert_eq!(value["siteScriptIds"], json!(["a1", "b2"]));
        assert!(value.get("id").is_none());

        let back: SiteDesign = serde_json::from_value(value).unwrap();
        assert_eq!(back, design);
        assert!(back.is_new());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let design: SiteDesign = serde_json::from_value(json!({"title": "Bare"})).unwrap();
        assert_eq!(design.web_template, WebTemplate::TeamSite);
        assert!(design.site_script_ids.is_empty());
        assert_eq!(design.version, 1);
        assert!(!design.is_default);
    }
}
