//! # Schema Fragment Configuration
//!
//! Typed views over the JSON schema fragments the registry dispatches on.
//! Each kind decodes its fragment into its own `#[derive(Deserialize)]`
//! struct, flattening the attributes common to every kind ([`ValueAttrs`]).
//! Unknown keys are ignored so that presentation extras survive a round
//! trip through the overlay merges.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use formtree_core::{Bound, ConfigurationError, Kind, SelectOption};

/// The `meta` block of a fragment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaConfig {
    /// Initial value of the node.
    pub value: Option<Value>,
    /// Declared default (also accepted at the fragment's top level).
    pub default: Option<Value>,
    pub name: Option<String>,
    pub mandatory: Option<bool>,
    pub disabled: Option<bool>,
    pub visible: Option<bool>,
    /// Ordering hint.
    pub sequence: Option<f64>,
    /// Presentation component hint.
    pub component: Option<String>,
    /// Help text.
    pub help: Option<String>,
    pub options: Option<Vec<SelectOption>>,
    /// Layout hint for objects.
    pub layout: Option<Value>,
}

/// Attributes shared by every kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueAttrs {
    pub title: Option<String>,
    #[serde(rename = "const")]
    pub constant: Option<Value>,
    #[serde(rename = "enum")]
    pub allowed: Option<Vec<Value>>,
    pub default: Option<Value>,
    pub meta: Option<MetaConfig>,
    /// Never legal in a schema; present only so it can be rejected.
    pub errors: Option<Vec<String>>,
}

/// Decode a fragment into the configuration struct of `kind`.
pub(crate) fn decode<T: DeserializeOwned>(
    kind: Kind,
    fragment: &Value,
) -> Result<T, ConfigurationError> {
    serde_json::from_value(fragment.clone()).map_err(|e| ConfigurationError::Malformed {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

/// Check a count bound, returning it as a `usize`. Counts must be whole
/// non-negative numbers.
pub(crate) fn non_negative(
    value: Option<f64>,
    bound: Bound,
) -> Result<Option<usize>, ConfigurationError> {
    match value {
        Some(n) if n < 0.0 => Err(ConfigurationError::NegativeBound(bound)),
        Some(n) if n.fract() != 0.0 => {
            Err(ConfigurationError::FractionalBound(bound))
        }
        Some(n) => Ok(Some(n as usize)),
        None => Ok(None),
    }
}

/// The `type` tag of a fragment. Fragments without a tag are null nodes.
pub(crate) fn kind_of(fragment: &Value) -> Result<Kind, ConfigurationError> {
    let Value::Object(map) = fragment else {
        return Err(ConfigurationError::Malformed {
            kind: "unknown".to_string(),
            reason: format!("schema fragment must be an object, found {fragment}"),
        });
    };
    match map.get("type") {
        None | Some(Value::Null) => Ok(Kind::Null),
        Some(Value::String(tag)) => tag.parse(),
        Some(other) => Err(ConfigurationError::Malformed {
            kind: "unknown".to_string(),
            reason: format!("type tag must be a string, found {other}"),
        }),
    }
}

/// A copy of `fragment` whose `meta.value` is `value`, other meta keys kept.
pub fn with_initial(fragment: &Value, value: Value) -> Value {
    let mut out = match fragment {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    let mut meta = match out.remove("meta") {
        Some(Value::Object(meta)) => meta,
        _ => Map::new(),
    };
    meta.insert("value".to_string(), value);
    out.insert("meta".to_string(), Value::Object(meta));
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_attrs_rename_keywords() {
        let attrs: ValueAttrs = serde_json::from_value(json!({
            "type": "number",
            "title": "age",
            "const": 5,
            "enum": [5, 10],
            "meta": { "value": 5, "sequence": 2 }
        }))
        .unwrap();
        assert_eq!(attrs.title.as_deref(), Some("age"));
        assert_eq!(attrs.constant, Some(json!(5)));
        assert_eq!(attrs.allowed, Some(vec![json!(5), json!(10)]));
        let meta = attrs.meta.unwrap();
        assert_eq!(meta.value, Some(json!(5)));
        assert_eq!(meta.sequence, Some(2.0));
    }

    #[test]
    fn test_kind_of_defaults_to_null() {
        assert_eq!(kind_of(&json!({})).unwrap(), Kind::Null);
        assert_eq!(kind_of(&json!({"type": "array"})).unwrap(), Kind::Array);
    }

    #[test]
    fn test_kind_of_rejects_unknown_and_non_objects() {
        assert_eq!(
            kind_of(&json!({"type": "integer"})),
            Err(ConfigurationError::UnknownKind {
                kind: "integer".to_string()
            })
        );
        assert!(matches!(
            kind_of(&json!("string")),
            Err(ConfigurationError::Malformed { .. })
        ));
        assert!(matches!(
            kind_of(&json!({"type": 3})),
            Err(ConfigurationError::Malformed { .. })
        ));
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(Some(2.0), Bound::MinItems), Ok(Some(2)));
        assert_eq!(non_negative(None, Bound::MinItems), Ok(None));
        assert_eq!(
            non_negative(Some(1.5), Bound::MinItems),
            Err(ConfigurationError::FractionalBound(Bound::MinItems))
        );
        assert_eq!(
            non_negative(Some(-1.0), Bound::MaxItems),
            Err(ConfigurationError::NegativeBound(Bound::MaxItems))
        );
    }

    #[test]
    fn test_with_initial_keeps_other_meta_keys() {
        let fragment = json!({"type": "string", "meta": {"component": "password"}});
        let seeded = with_initial(&fragment, json!("secret"));
        assert_eq!(seeded["meta"]["value"], json!("secret"));
        assert_eq!(seeded["meta"]["component"], json!("password"));
        assert_eq!(seeded["type"], json!("string"));
    }

    #[test]
    fn test_decode_reports_kind() {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Probe {
            #[allow(dead_code)]
            min_length: Option<f64>,
        }
        let err = decode::<Probe>(Kind::String, &json!({"minLength": "four"})).unwrap_err();
        assert!(err.to_string().starts_with("malformed string schema:"));
    }
}
