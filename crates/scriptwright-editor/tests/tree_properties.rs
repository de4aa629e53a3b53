//! Structural properties of the action tree, history and expansion state.

use scriptwright_core::{ActionNode, ActionPath, Script, ScriptBody};
use scriptwright_editor::{ActionTree, EditHistory, ExpansionState, HistoryError, TreeError};
use scriptwright_schema::SchemaResolver;
use serde_json::{json, Value};
use std::sync::Arc;

/// Root verbs `setTitle`, `addNavLink` and `joinHubSite`; only `joinHubSite` nests (`setTitle`).
fn hub_schema() -> Value {
    json!({
        "properties": {
            "actions": {
                "type": "array",
                "items": {"anyOf": [
                    {"$ref": "#/definitions/setTitle"},
                    {"$ref": "#/definitions/addNavLink"},
                    {"$ref": "#/definitions/joinHubSite"}
                ]}
            }
        },
        "definitions": {
            "setTitle": {
                "properties": {
                    "verb": {"enum": ["setTitle"]},
                    "title": {"type": "string"}
                }
            },
            "addNavLink": {
                "properties": {
                    "verb": {"enum": ["addNavLink"]},
                    "url": {"type": "string"},
                    "isWebRelative": {"type": "boolean"}
                }
            },
            "joinHubSite": {
                "properties": {
                    "verb": {"enum": ["joinHubSite"]},
                    "hubSiteId": {"type": "string"},
                    "subactions": {
                        "type": "array",
                        "items": {"anyOf": [{"$ref": "#/definitions/setTitle"}]}
                    }
                }
            }
        }
    })
}

fn tree() -> ActionTree {
    let resolver = SchemaResolver::with_default_source().unwrap();
    resolver.configure_with_document(hub_schema(), false).unwrap();
    ActionTree::new(Arc::new(resolver))
}

fn script_with(verbs: &[&str]) -> Script {
    let mut body = ScriptBody::default();
    body.actions = verbs.iter().map(|v| ActionNode::new(*v)).collect();
    Script::new("Hub member", body)
}

/// Adding `setTitle` to an empty script yields one node with a defaulted title.
#[test]
fn test_add_set_title_to_empty_script() {
    let tree = tree();
    let script = tree
        .add_action(&Script::new("Empty", ScriptBody::default()), None, "setTitle")
        .unwrap();

    assert_eq!(
        serde_json::to_value(&script.body.actions).unwrap(),
        json!([{"verb": "setTitle", "title": ""}])
    );
}

/// Nested adds are validated against the parent's declared sub-verbs.
#[test]
fn test_nested_add_follows_parent_vocabulary() {
    let tree = tree();
    let first = ActionPath::new(vec![0]);

    let hub = script_with(&["joinHubSite"]);
    let added = tree.add_action(&hub, Some(&first), "setTitle").unwrap();
    let children = added.body.actions[0].subactions().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].verb(), "setTitle");
    assert_eq!(children[0].property("title"), Some(&json!("")));

    let nav = script_with(&["addNavLink"]);
    assert_eq!(
        tree.add_action(&nav, Some(&first), "setTitle"),
        Err(TreeError::UnknownVerb {
            verb: "setTitle".to_string(),
            parent: Some("addNavLink".to_string()),
        })
    );
}

/// Adding at the end and removing that index restores the original script.
#[test]
fn test_add_then_remove_is_identity() {
    let tree = tree();
    let mut script = script_with(&["joinHubSite", "addNavLink"]);
    script.body.actions[0]
        .subactions_or_default()
        .push(ActionNode::new("setTitle"));

    let added = tree.add_action(&script, None, "addNavLink").unwrap();
    let removed = tree.remove_action(&added, &ActionPath::new(vec![2])).unwrap();
    assert_eq!(removed, script);

    let first = ActionPath::new(vec![0]);
    let added = tree.add_action(&script, Some(&first), "setTitle").unwrap();
    let removed = tree
        .remove_action(&added, &ActionPath::new(vec![0, 1]))
        .unwrap();
    assert_eq!(removed, script);
}

/// Targets outside `[0, len - 1]` leave the script unchanged; boundaries move.
#[test]
fn test_move_boundaries() {
    let tree = tree();
    let script = script_with(&["setTitle", "addNavLink", "joinHubSite"]);

    assert_eq!(tree.move_action(&script, None, 1, -1).unwrap(), script);
    assert_eq!(tree.move_action(&script, None, 1, 3).unwrap(), script);
    assert_eq!(tree.move_action(&script, None, 1, isize::MAX).unwrap(), script);

    let to_front = tree.move_action(&script, None, 2, 0).unwrap();
    let verbs: Vec<&str> = to_front.body.actions.iter().map(ActionNode::verb).collect();
    assert_eq!(verbs, vec!["joinHubSite", "setTitle", "addNavLink"]);

    let to_back = tree.move_action(&script, None, 0, 2).unwrap();
    let verbs: Vec<&str> = to_back.body.actions.iter().map(ActionNode::verb).collect();
    assert_eq!(verbs, vec!["addNavLink", "joinHubSite", "setTitle"]);
}

/// Moves in a nested list only touch that list.
#[test]
fn test_nested_move() {
    let tree = tree();
    let mut script = script_with(&["joinHubSite"]);
    let children = script.body.actions[0].subactions_or_default();
    children.push(ActionNode::new("setTitle"));
    children.push(ActionNode::new("setTitle"));
    children[0].set_property("title", json!("first"));

    let parent = ActionPath::new(vec![0]);
    let moved = tree.move_action(&script, Some(&parent), 0, 1).unwrap();
    let titles: Vec<Option<&Value>> = moved.body.actions[0]
        .subactions()
        .unwrap()
        .iter()
        .map(|n| n.property("title"))
        .collect();
    assert_eq!(titles, vec![None, Some(&json!("first"))]);
}

/// Fifteen snapshots keep the ten most recent; the eleventh undo fails.
#[test]
fn test_history_keeps_last_ten() {
    let mut history = EditHistory::new();
    for i in 0..15 {
        history.snapshot(&Script::new(format!("v{}", i), ScriptBody::default()));
    }
    assert_eq!(history.len(), 10);

    for i in (5..15).rev() {
        assert_eq!(history.undo().unwrap().title, format!("v{}", i));
    }
    assert_eq!(history.undo(), Err(HistoryError::Empty));
}

/// Expansion is keyed by path: after removing a node, its old path now names
/// the node that shifted into place. The state is not remapped.
#[test]
fn test_expansion_paths_are_not_remapped() {
    let tree = tree();
    let script = script_with(&["setTitle", "addNavLink", "joinHubSite"]);

    let mut state = ExpansionState::new();
    state.set_expanded(ActionPath::new(vec![1]), true);

    let script = tree.remove_action(&script, &ActionPath::new(vec![0])).unwrap();
    assert_eq!(script.body.actions[1].verb(), "joinHubSite");
    assert!(state.is_expanded(&ActionPath::new(vec![1])));
}
