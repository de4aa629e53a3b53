//! Resolver behavior against the embedded site-script schema and small
//! hand-written documents.

use async_trait::async_trait;
use scriptwright_core::{ActionNode, ScriptBody};
use scriptwright_schema::{
    default_properties, verb_of, SchemaError, SchemaResolver, SchemaSource, DEFAULT_SCHEMA,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Source that serves one fixed document and counts fetches.
struct FixedSource {
    document: Value,
    fetches: AtomicUsize,
}

impl FixedSource {
    fn new(document: Value) -> Arc<Self> {
        Arc::new(Self {
            document,
            fetches: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SchemaSource for FixedSource {
    async fn fetch(&self, _source: Option<&str>) -> Result<Value, SchemaError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.document.clone())
    }
}

fn embedded() -> Value {
    serde_json::from_str(DEFAULT_SCHEMA).unwrap()
}

fn validate(instance: &Value) {
    let validator = jsonschema::draft7::options()
        .build(&embedded())
        .expect("schema must compile");

    if !validator.is_valid(instance) {
        let msgs: Vec<String> = validator
            .iter_errors(instance)
            .take(20)
            .map(|e| e.to_string())
            .collect();
        panic!("script body did not validate: {}", msgs.join("; "));
    }
}

/// Configuring twice without force fetches once and yields the same tables.
#[tokio::test]
async fn test_configure_is_idempotent() {
    let source = FixedSource::new(embedded());
    let resolver = SchemaResolver::new(source.clone());

    resolver.configure(None, false).await.unwrap();
    let first = resolver.resolved().unwrap();
    resolver.configure(None, false).await.unwrap();
    let second = resolver.resolved().unwrap();

    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(*first, *second);

    resolver.configure(None, true).await.unwrap();
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(*resolver.resolved().unwrap(), *first);
}

/// Every listed verb resolves to a fragment naming that same verb.
#[tokio::test]
async fn test_every_verb_round_trips() {
    let resolver = SchemaResolver::with_default_source().unwrap();
    resolver.configure(None, false).await.unwrap();

    let verbs = resolver.available_verbs().unwrap();
    assert_eq!(
        verbs,
        vec![
            "createSPList",
            "applyTheme",
            "setSiteLogo",
            "joinHubSite",
            "triggerFlow",
            "addNavLink"
        ]
    );

    for verb in &verbs {
        let fragment = resolver.action_schema(verb).unwrap().unwrap();
        assert_eq!(&verb_of(&fragment).unwrap(), verb);

        for sub_verb in resolver.available_sub_verbs(verb).unwrap() {
            let fragment = resolver.sub_action_schema(verb, &sub_verb).unwrap().unwrap();
            assert_eq!(verb_of(&fragment).unwrap(), sub_verb);
        }
    }

    assert!(resolver.has_sub_actions("createSPList").unwrap());
    assert!(!resolver.has_sub_actions("applyTheme").unwrap());
    assert!(resolver.available_sub_verbs("applyTheme").unwrap().is_empty());
    assert_eq!(
        resolver.available_sub_verbs("createSPList").unwrap()[..2],
        ["setTitle".to_string(), "setDescription".to_string()]
    );
}

/// Inline JSON sources are parsed; malformed ones fail without installing tables.
#[tokio::test]
async fn test_inline_source_and_parse_failure() {
    let resolver = SchemaResolver::with_default_source().unwrap();

    let err = resolver.configure(Some("{\"properties\": "), false).await;
    assert!(matches!(err, Err(SchemaError::ParseFailure(_))));
    assert!(!resolver.is_configured());

    let inline = json!({
        "properties": {
            "actions": {
                "type": "array",
                "items": {"anyOf": [{"properties": {"verb": {"enum": ["setTitle"]}}}]}
            }
        }
    })
    .to_string();

    resolver.configure(Some(&inline), false).await.unwrap();
    assert_eq!(resolver.available_verbs().unwrap(), vec!["setTitle"]);
    assert_eq!(
        resolver.schema_document().unwrap()["properties"]["actions"]["type"],
        "array"
    );
}

/// A new body, and a body filled from fragment defaults, validate against the schema.
#[tokio::test]
async fn test_generated_bodies_validate() {
    let resolver = SchemaResolver::with_default_source().unwrap();
    resolver.configure(None, false).await.unwrap();

    let body = resolver.new_script_body().unwrap();
    assert_eq!(body, ScriptBody::default());
    validate(&serde_json::to_value(&body).unwrap());

    let mut body = resolver.new_script_body().unwrap();
    for verb in ["applyTheme", "addNavLink"] {
        let fragment = resolver.action_schema(verb).unwrap().unwrap();
        body.actions
            .push(ActionNode::with_properties(verb, default_properties(&fragment)));
    }

    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(
        value["actions"][1],
        json!({"verb": "addNavLink", "url": "", "displayName": "", "isWebRelative": false})
    );
    validate(&value);
}
