//! Output contracts handed to the oracle.
//!
//! Every record the oracle is asked to produce implements [`OutputSchema`], which
//! pairs the serde shape used for validation with the declarative schema sent in
//! `generationConfig.responseSchema`. Gemini accepts an OpenAPI subset: upper-case
//! type names, `nullable`, `required`, and `propertyOrdering`.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};

pub trait OutputSchema: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Stable name used in logs, cache keys, and oracle request routing.
    const NAME: &'static str;

    fn response_schema() -> Value;
}

pub(crate) fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

pub(crate) fn nullable_string(description: &str) -> Value {
    json!({ "type": "STRING", "nullable": true, "description": description })
}

pub(crate) fn integer(description: &str) -> Value {
    json!({ "type": "INTEGER", "description": description })
}

pub(crate) fn array_of(items: Value, description: &str) -> Value {
    json!({ "type": "ARRAY", "items": items, "description": description })
}

/// Object schema. Property order is preserved in `propertyOrdering` so the
/// oracle emits fields in declaration order.
pub(crate) fn object(properties: &[(&str, Value)], required: &[&str]) -> Value {
    let mut props = Map::new();
    for (name, schema) in properties {
        props.insert((*name).to_string(), schema.clone());
    }
    let ordering: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    json!({
        "type": "OBJECT",
        "properties": Value::Object(props),
        "required": required,
        "propertyOrdering": ordering,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_keeps_declaration_order() {
        let schema = object(
            &[("b", string("second")), ("a", integer("first"))],
            &["b"],
        );
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["propertyOrdering"], json!(["b", "a"]));
        assert_eq!(schema["required"], json!(["b"]));
        assert_eq!(schema["properties"]["a"]["type"], "INTEGER");
    }

    #[test]
    fn test_nullable_string_is_flagged() {
        assert_eq!(nullable_string("x")["nullable"], true);
        assert!(string("x").get("nullable").is_none());
    }
}
