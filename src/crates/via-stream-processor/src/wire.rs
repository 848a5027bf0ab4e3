//! JSON flattening for wire payloads (spec.md §4.11): "any object reaching
//! the serializer is recursively flattened (dict→dict, list→list, anything
//! with a `to_dict`/`as_dict` method used, else `str()`)". Rust's
//! [`serde::Serialize`] already plays the role of `to_dict`/`as_dict` for
//! every type in this workspace (they all derive it), so [`to_wire_value`]
//! is just `serde_json::to_value` with the dict/list recursion folded in by
//! `serde_json` itself; [`to_wire_value_display`] is the explicit `str()`
//! fallback for the rare type that only implements [`std::fmt::Display`]
//! (e.g. [`via_orchestrator::OrchestratorError`]).

use serde::Serialize;
use serde_json::Value;

/// Structured preference: serialize `value` and flatten nested
/// maps/sequences. Returns `Value::Null` only if serialization itself fails
/// (a programmer error — every payload type here is a plain data struct).
pub fn to_wire_value<T: Serialize>(value: &T) -> Value {
    flatten(serde_json::to_value(value).unwrap_or(Value::Null))
}

/// `Display` fallback for types with no structured representation.
pub fn to_wire_value_display<T: std::fmt::Display>(value: &T) -> Value {
    Value::String(value.to_string())
}

fn flatten(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, flatten(v))).collect()),
        Value::Array(items) => Value::Array(items.into_iter().map(flatten).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_nested_structures_unchanged() {
        let value = json!({ "a": [1, 2, { "b": "c" }] });
        assert_eq!(to_wire_value(&value), value);
    }

    #[test]
    fn display_fallback_stringifies() {
        struct NoSerialize;
        impl std::fmt::Display for NoSerialize {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "no-serialize")
            }
        }
        assert_eq!(to_wire_value_display(&NoSerialize), json!("no-serialize"));
    }
}
