//! Serializable edit operations.
//!
//! A batch of edits can be written as YAML or JSON and replayed through an
//! [`EditingSession`](crate::EditingSession):
//!
//! ```yaml
//! - op: add
//!   verb: createSPList
//! - op: update
//!   path: [0]
//!   properties:
//!     listName: Customers
//! - op: add
//!   parent: [0]
//!   verb: setDescription
//! - op: move
//!   old_index: 0
//!   new_index: 1
//! - op: undo
//! ```

use scriptwright_core::ActionPath;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One mutation of the live script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Append a `verb` node under `parent` (root when absent).
    Add {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<ActionPath>,
        verb: String,
    },

    Remove { path: ActionPath },

    /// Reorder within one sibling list. Out-of-range targets are ignored.
    Move {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<ActionPath>,
        old_index: usize,
        new_index: isize,
    },

    Update {
        path: ActionPath,
        properties: Map<String, Value>,
    },

    Undo,
}

impl EditOp {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::Add { .. } => "add",
            EditOp::Remove { .. } => "remove",
            EditOp::Move { .. } => "move",
            EditOp::Update { .. } => "update",
            EditOp::Undo => "undo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_yaml_batch() {
        let yaml = r#"
- op: add
  verb: createSPList
- op: add
  parent: [0]
  verb: setDescription
- op: update
  path: [0, 0]
  properties:
    description: Customers
- op: move
  old_index: 0
  new_index: -1
- op: remove
  path: [1]
- op: undo
"#;
        let ops: Vec<EditOp> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ops.len(), 6);
        assert_eq!(
            ops[0],
            EditOp::Add {
                parent: None,
                verb: "createSPList".to_string()
            }
        );
        assert_eq!(
            ops[2],
            EditOp::Update {
                path: ActionPath::new(vec![0, 0]),
                properties: json!({"description": "Customers"}).as_object().cloned().unwrap(),
            }
        );
        assert_eq!(
            ops[3],
            EditOp::Move {
                parent: None,
                old_index: 0,
                new_index: -1
            }
        );
        assert_eq!(ops[5], EditOp::Undo);
        assert_eq!(ops[4].name(), "remove");
    }

    #[test]
    fn test_json_shape() {
        let op = EditOp::Add {
            parent: Some(ActionPath::new(vec![2])),
            verb: "setTitle".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "add", "parent": [2], "verb": "setTitle"})
        );
        assert_eq!(serde_json::to_value(EditOp::Undo).unwrap(), json!({"op": "undo"}));
    }
}
