use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Configuration types shared across all Scriptwright crates
pub mod config;
pub mod design;
pub mod path;

pub use config::{
    ConfigError, EditorConfig, ObservabilityConfig, SchemaConfig, ScriptwrightConfig,
    StorageBackend, StorageConfig, MAX_HISTORY_CAPACITY,
};
pub use design::{SiteDesign, WebTemplate};
pub use path::{ActionPath, PathParseError};

/// Property key holding the action verb in the wire format.
pub const VERB_KEY: &str = "verb";

/// Property key holding nested actions in the wire format.
pub const SUBACTIONS_KEY: &str = "subactions";

/// Marker written into the `$schema` key of new script bodies.
pub const DEFAULT_SCHEMA_MARKER: &str = "schema.json";

/// Returns true for keys that are structural and never stored as properties.
pub fn is_reserved_key(key: &str) -> bool {
    key == VERB_KEY || key == SUBACTIONS_KEY
}

/// One action of a site script: a verb, its bound properties and optional
/// child actions.
///
/// Serializes flat, the way site scripts are written:
/// `{"verb": "createSPList", "listName": "Docs", "subactions": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionNode {
    verb: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    subactions: Option<Vec<ActionNode>>,

    #[serde(flatten)]
    properties: Map<String, Value>,
}

impl ActionNode {
    /// Create a node with no properties and no sub-action list.
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            subactions: None,
            properties: Map::new(),
        }
    }

    /// Create a node with the given properties. Reserved keys are dropped.
    pub fn with_properties(verb: impl Into<String>, properties: Map<String, Value>) -> Self {
        let mut node = Self::new(verb);
        node.merge_properties(properties);
        node
    }

    /// Attach a sub-action list.
    pub fn with_subactions(mut self, subactions: Vec<ActionNode>) -> Self {
        self.subactions = Some(subactions);
        self
    }

    /// The verb. Fixed for the lifetime of the node.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Set a single property. Returns false (and stores nothing) for reserved keys.
    pub fn set_property(&mut self, name: impl Into<String>, value: Value) -> bool {
        let name = name.into();
        if is_reserved_key(&name) {
            return false;
        }
        self.properties.insert(name, value);
        true
    }

    /// Shallow merge: keys in `update` replace existing keys, other keys are kept.
    /// Returns the reserved keys that were ignored.
    pub fn merge_properties(&mut self, update: Map<String, Value>) -> Vec<String> {
        let mut ignored = Vec::new();
        for (key, value) in update {
            if is_reserved_key(&key) {
                ignored.push(key);
            } else {
                self.properties.insert(key, value);
            }
        }
        ignored
    }

    /// Child actions, if this node carries a sub-action list.
    pub fn subactions(&self) -> Option<&[ActionNode]> {
        self.subactions.as_deref()
    }

    pub fn subactions_mut(&mut self) -> Option<&mut Vec<ActionNode>> {
        self.subactions.as_mut()
    }

    /// The sub-action list, created empty when absent.
    pub fn subactions_or_default(&mut self) -> &mut Vec<ActionNode> {
        self.subactions.get_or_insert_with(Vec::new)
    }

    /// Number of children. Absent and empty lists both count as zero.
    pub fn child_count(&self) -> usize {
        self.subactions.as_ref().map_or(0, Vec::len)
    }
}

/// Content of a site script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptBody {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub actions: Vec<ActionNode>,

    #[serde(default = "default_body_version")]
    pub version: i64,

    /// Opaque data carried alongside the actions.
    #[serde(rename = "bindata", alias = "extraData", default)]
    pub extra_data: Map<String, Value>,
}

impl Default for ScriptBody {
    fn default() -> Self {
        Self {
            schema: Some(DEFAULT_SCHEMA_MARKER.to_string()),
            actions: Vec::new(),
            version: default_body_version(),
            extra_data: Map::new(),
        }
    }
}

/// A site script and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Identifier assigned by the store. `None` until the script is first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_script_version")]
    pub version: u32,

    #[serde(alias = "content")]
    pub body: ScriptBody,
}

impl Script {
    /// Create a new, unsaved script.
    pub fn new(title: impl Into<String>, body: ScriptBody) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            version: default_script_version(),
            body,
        }
    }

    /// A script without an id has never been persisted.
    pub fn is_new(&self) -> bool {
        self.id.as_deref().map_or(true, str::is_empty)
    }

    /// Summary row for listings.
    pub fn summary(&self) -> ScriptSummary {
        ScriptSummary {
            id: self.id.clone().unwrap_or_default(),
            title: self.title.clone(),
            description: self.description.clone(),
            version: self.version,
            action_count: self.body.actions.len(),
            saved_at: None,
        }
    }
}

/// Listing entry returned by a script store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub version: u32,
    #[serde(default)]
    pub action_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

fn default_body_version() -> i64 {
    1
}

fn default_script_version() -> u32 {
    1
}
