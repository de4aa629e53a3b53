//! Verb resolution.
//!
//! A schema document declares the script vocabulary as a list of alternatives
//! under `properties.actions.items.anyOf`. Each alternative is either an inline
//! fragment or a `{"$ref": "#/definitions/<name>"}` pointer into the document's
//! `definitions` map. Every resolved fragment names its verb through a
//! single-valued `enum` on its `verb` property, and may declare a nested
//! vocabulary with the same shape under `properties.subactions`.
//!
//! [`ResolvedSchema::resolve`] turns such a document into verb-keyed tables.
//! [`SchemaResolver`] owns the tables for a running application: it loads the
//! document through a [`SchemaSource`], resolves it all-or-nothing and serves
//! lookups.

use scriptwright_core::{SchemaConfig, ScriptBody, SUBACTIONS_KEY, VERB_KEY};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::SchemaError;
use crate::source::{HttpSchemaSource, SchemaSource};

/// Lookup tables built from one schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    document: Value,
    verbs: Vec<String>,
    actions: BTreeMap<String, Value>,
    sub_verbs: BTreeMap<String, Vec<String>>,
    sub_actions: BTreeMap<String, BTreeMap<String, Value>>,
}

impl ResolvedSchema {
    /// Resolve a schema document into lookup tables.
    pub fn resolve(document: Value) -> Result<Self, SchemaError> {
        let actions_property = document
            .get("properties")
            .and_then(|p| p.get("actions"))
            .ok_or_else(|| {
                SchemaError::InvalidShape("schema has no 'properties.actions' entry".to_string())
            })?;

        let alternatives = alternative_list(actions_property).ok_or_else(|| {
            SchemaError::InvalidShape(
                "'properties.actions' must be an array with an 'items.anyOf' list".to_string(),
            )
        })?;

        let mut verbs = Vec::new();
        let mut actions = BTreeMap::new();
        let mut sub_verbs = BTreeMap::new();
        let mut sub_actions = BTreeMap::new();

        for alternative in alternatives {
            let fragment = resolve_alternative(&document, alternative)?;
            let verb = verb_of(&fragment)?;

            if actions.contains_key(&verb) {
                tracing::warn!(
                    verb = %verb,
                    "Duplicate action verb in schema; keeping the first declaration"
                );
                continue;
            }

            if let Some(children) = sub_action_alternatives(&verb, &fragment)? {
                let mut child_verbs = Vec::new();
                let mut child_fragments = BTreeMap::new();

                for child in children {
                    let child_fragment = resolve_alternative(&document, child)?;
                    let child_verb = verb_of(&child_fragment)?;

                    if child_fragments.contains_key(&child_verb) {
                        tracing::warn!(
                            parent = %verb,
                            verb = %child_verb,
                            "Duplicate sub-action verb in schema; keeping the first declaration"
                        );
                        continue;
                    }

                    child_verbs.push(child_verb.clone());
                    child_fragments.insert(child_verb, child_fragment);
                }

                sub_verbs.insert(verb.clone(), child_verbs);
                sub_actions.insert(verb.clone(), child_fragments);
            }

            verbs.push(verb.clone());
            actions.insert(verb, fragment);
        }

        Ok(Self {
            document,
            verbs,
            actions,
            sub_verbs,
            sub_actions,
        })
    }

    /// The raw document these tables were built from.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Root verbs in declaration order.
    pub fn verbs(&self) -> &[String] {
        &self.verbs
    }

    /// Sub-verbs allowed under `parent_verb`, in declaration order.
    pub fn sub_verbs(&self, parent_verb: &str) -> &[String] {
        self.sub_verbs
            .get(parent_verb)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the root verb declares a sub-action vocabulary.
    pub fn has_sub_actions(&self, verb: &str) -> bool {
        self.sub_verbs.contains_key(verb)
    }

    /// Fragment for a root verb.
    pub fn action_schema(&self, verb: &str) -> Option<&Value> {
        lookup_verb(&self.actions, verb)
    }

    /// Fragment for a sub-verb under `parent_verb`.
    pub fn sub_action_schema(&self, parent_verb: &str, verb: &str) -> Option<&Value> {
        self.sub_actions
            .get(parent_verb)
            .and_then(|children| lookup_verb(children, verb))
    }
}

/// Extract the verb a fragment is keyed by.
pub fn verb_of(fragment: &Value) -> Result<String, SchemaError> {
    let values = fragment
        .get("properties")
        .and_then(|p| p.get(VERB_KEY))
        .and_then(|v| v.get("enum"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SchemaError::InvalidAction("action has no enumerated 'verb' property".to_string())
        })?;

    match values.first() {
        Some(Value::String(verb)) => Ok(verb.clone()),
        Some(other) => Err(SchemaError::InvalidAction(format!(
            "verb enum value {} is not a string",
            other
        ))),
        None => Err(SchemaError::InvalidAction(
            "action 'verb' enum has no entries".to_string(),
        )),
    }
}

/// `items.anyOf` of an array-typed property, if it has that shape.
fn alternative_list(property: &Value) -> Option<&Vec<Value>> {
    if property.get("type").and_then(Value::as_str) != Some("array") {
        return None;
    }
    property
        .get("items")
        .and_then(|items| items.get("anyOf"))
        .and_then(Value::as_array)
}

/// Sub-action alternatives declared by a fragment.
fn sub_action_alternatives<'a>(
    verb: &str,
    fragment: &'a Value,
) -> Result<Option<&'a Vec<Value>>, SchemaError> {
    let Some(property) = fragment.get("properties").and_then(|p| p.get(SUBACTIONS_KEY)) else {
        return Ok(None);
    };

    alternative_list(property).map(Some).ok_or_else(|| {
        SchemaError::InvalidAction(format!(
            "'{}' declares subactions that are not an array with an 'items.anyOf' list",
            verb
        ))
    })
}

/// Follow a `$ref` into the document's definitions, or take the alternative inline.
fn resolve_alternative(document: &Value, alternative: &Value) -> Result<Value, SchemaError> {
    let Some(reference) = alternative.get("$ref") else {
        return Ok(alternative.clone());
    };

    let reference = reference.as_str().ok_or_else(|| {
        SchemaError::InvalidAction(format!("'$ref' must be a string, got {}", reference))
    })?;

    let name = reference.rsplit('/').next().unwrap_or(reference);

    document
        .get("definitions")
        .and_then(|definitions| definitions.get(name))
        .cloned()
        .ok_or_else(|| {
            SchemaError::InvalidAction(format!(
                "reference '{}' does not resolve to a definition",
                reference
            ))
        })
}

/// Exact match first; otherwise a case-insensitive match when exactly one key qualifies.
fn lookup_verb<'a>(table: &'a BTreeMap<String, Value>, verb: &str) -> Option<&'a Value> {
    if let Some(fragment) = table.get(verb) {
        return Some(fragment);
    }

    let wanted = verb.to_uppercase();
    let mut candidates = table.iter().filter(|(key, _)| key.to_uppercase() == wanted);

    match (candidates.next(), candidates.next()) {
        (Some((_, fragment)), None) => Some(fragment),
        (Some(_), Some(_)) => {
            tracing::debug!(verb = %verb, "Ambiguous case-insensitive verb lookup");
            None
        }
        _ => None,
    }
}

/// Loads a schema document and serves verb lookups.
///
/// The resolved tables sit behind an `Arc` so a forced reconfigure replaces them
/// in one step; callers holding [`ResolvedSchema`] from [`Self::resolved`] keep a
/// consistent view.
pub struct SchemaResolver {
    source: Arc<dyn SchemaSource>,
    tables: RwLock<Option<Arc<ResolvedSchema>>>,
}

impl SchemaResolver {
    /// Create an unconfigured resolver reading documents from `source`.
    pub fn new(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            source,
            tables: RwLock::new(None),
        }
    }

    /// Create a resolver backed by an [`HttpSchemaSource`] without a base URL.
    pub fn with_default_source() -> Result<Self, SchemaError> {
        Ok(Self::new(Arc::new(HttpSchemaSource::new(None, None)?)))
    }

    /// Create a resolver whose HTTP source follows the `schema` config section.
    pub fn from_config(config: &SchemaConfig) -> Result<Self, SchemaError> {
        Ok(Self::new(Arc::new(HttpSchemaSource::from_config(config)?)))
    }

    /// Load and resolve the schema.
    ///
    /// A no-op when already configured unless `force_reconfigure` is set.
    pub async fn configure(
        &self,
        source: Option<&str>,
        force_reconfigure: bool,
    ) -> Result<(), SchemaError> {
        if self.is_configured() && !force_reconfigure {
            tracing::debug!("Schema resolver already configured");
            return Ok(());
        }

        let document = self.source.fetch(source).await?;
        self.configure_with_document(document, true)
    }

    /// Resolve an already-loaded document.
    pub fn configure_with_document(
        &self,
        document: Value,
        force_reconfigure: bool,
    ) -> Result<(), SchemaError> {
        if self.is_configured() && !force_reconfigure {
            tracing::debug!("Schema resolver already configured");
            return Ok(());
        }

        let resolved = ResolvedSchema::resolve(document).inspect_err(|e| {
            tracing::warn!(error = %e, "Schema resolution failed");
        })?;

        tracing::info!(
            verbs = resolved.verbs().len(),
            nested = resolved.sub_verbs.len(),
            "Schema resolved"
        );

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        *tables = Some(Arc::new(resolved));
        Ok(())
    }

    /// Whether a schema has been resolved.
    pub fn is_configured(&self) -> bool {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The current tables.
    pub fn resolved(&self) -> Result<Arc<ResolvedSchema>, SchemaError> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(SchemaError::NotConfigured)
    }

    /// Root verbs in declaration order.
    pub fn available_verbs(&self) -> Result<Vec<String>, SchemaError> {
        Ok(self.resolved()?.verbs().to_vec())
    }

    /// Sub-verbs allowed under `parent_verb`; empty when it declares none.
    pub fn available_sub_verbs(&self, parent_verb: &str) -> Result<Vec<String>, SchemaError> {
        Ok(self.resolved()?.sub_verbs(parent_verb).to_vec())
    }

    /// Whether the root verb declares sub-actions.
    pub fn has_sub_actions(&self, verb: &str) -> Result<bool, SchemaError> {
        Ok(self.resolved()?.has_sub_actions(verb))
    }

    /// Fragment for a root verb, `None` when not found or ambiguous.
    pub fn action_schema(&self, verb: &str) -> Result<Option<Value>, SchemaError> {
        Ok(self.resolved()?.action_schema(verb).cloned())
    }

    /// Fragment for a sub-verb, `None` when not found or ambiguous.
    pub fn sub_action_schema(
        &self,
        parent_verb: &str,
        verb: &str,
    ) -> Result<Option<Value>, SchemaError> {
        Ok(self.resolved()?.sub_action_schema(parent_verb, verb).cloned())
    }

    /// The raw document last configured.
    pub fn schema_document(&self) -> Result<Value, SchemaError> {
        Ok(self.resolved()?.document().clone())
    }

    /// Body for a brand new script.
    pub fn new_script_body(&self) -> Result<ScriptBody, SchemaError> {
        self.resolved()?;
        Ok(ScriptBody::default())
    }
}
