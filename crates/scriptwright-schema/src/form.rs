//! Form binding for action fragments.
//!
//! Each property a fragment declares becomes one editable [`FormField`]. The
//! `verb` property is the node's identity and never becomes a field.

use scriptwright_core::{SUBACTIONS_KEY, VERB_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// One of a fixed set of values (`enum`).
    Choice,
    /// `boolean`.
    Toggle,
    /// `number` or `integer`; textual input is converted.
    Number,
    /// `string` and anything not covered above.
    Text,
    /// The nested `subactions` array.
    Collection,
}

/// One editable property of an action node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Value>,
}

/// Input rejected by [`coerce_value`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldValueError {
    #[error("'{raw}' is not a valid number")]
    InvalidNumber { raw: String },
}

/// Fields for every property of `fragment`, in declaration order.
pub fn form_fields(fragment: &Value) -> Vec<FormField> {
    let Some(properties) = fragment.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    let required: Vec<&str> = fragment
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    properties
        .iter()
        .filter(|(name, _)| name.as_str() != VERB_KEY)
        .map(|(name, property)| {
            let read_only = property
                .get("readOnly")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let choices = property
                .get("enum")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            FormField {
                name: name.clone(),
                kind: field_kind(name, property, read_only, &choices),
                required: required.contains(&name.as_str()),
                read_only,
                choices,
            }
        })
        .collect()
}

fn field_kind(name: &str, property: &Value, read_only: bool, choices: &[Value]) -> FieldKind {
    if name == SUBACTIONS_KEY {
        return FieldKind::Collection;
    }
    if !choices.is_empty() {
        return if read_only && choices.len() == 1 {
            FieldKind::Text
        } else {
            FieldKind::Choice
        };
    }
    match property.get("type").and_then(Value::as_str) {
        Some("boolean") => FieldKind::Toggle,
        Some("number") | Some("integer") => FieldKind::Number,
        _ => FieldKind::Text,
    }
}

/// Initial value for a property: `""`, `false`, `0` or `null` by declared type.
pub fn default_value_for(property: &Value) -> Value {
    match property.get("type").and_then(Value::as_str) {
        Some("string") => Value::String(String::new()),
        Some("boolean") => Value::Bool(false),
        Some("number") => Value::Number(Number::from(0)),
        _ => Value::Null,
    }
}

/// Defaults for every non-reserved property of `fragment`.
pub fn default_properties(fragment: &Value) -> Map<String, Value> {
    fragment
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .filter(|(name, _)| !scriptwright_core::is_reserved_key(name))
                .map(|(name, property)| (name.clone(), default_value_for(property)))
                .collect()
        })
        .unwrap_or_default()
}

/// Whether nodes of this fragment carry a `subactions` list.
pub fn declares_sub_actions(fragment: &Value) -> bool {
    fragment
        .get("properties")
        .and_then(|p| p.get(SUBACTIONS_KEY))
        .is_some()
}

/// Convert raw input for a field of `kind`.
///
/// Only [`FieldKind::Number`] converts: numeric text becomes a JSON number.
pub fn coerce_value(kind: FieldKind, raw: Value) -> Result<Value, FieldValueError> {
    if kind != FieldKind::Number {
        return Ok(raw);
    }

    match raw {
        Value::Number(_) | Value::Null => Ok(raw),
        Value::String(text) => parse_number(&text)
            .map(Value::Number)
            .ok_or(FieldValueError::InvalidNumber { raw: text }),
        other => Err(FieldValueError::InvalidNumber {
            raw: other.to_string(),
        }),
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
