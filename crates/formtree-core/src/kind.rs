//! # Node Kind — The `type` Discriminator
//!
//! Defines the `Kind` enum: the six node kinds a schema fragment can
//! declare through its `type` tag. This is the one definition used by the
//! registry, the node tree and the overlay merges; every `match` on `Kind`
//! is exhaustive, so adding a kind forces every consumer to handle it.
//!
//! Each kind also owns its structural conformance check and its "empty"
//! value (the value a node starts from when nothing else is configured,
//! and the value a mandatory node may not hold).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::ConfigurationError;

/// All node kinds.
///
/// | Kind | Value shape | Composite |
/// |------|-------------|-----------|
/// | String | JSON string | no |
/// | Number | JSON number | no |
/// | Boolean | JSON boolean | no |
/// | Null | JSON null | no |
/// | Object | JSON object | yes |
/// | Array | JSON array | yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

/// Total number of node kinds.
pub const KIND_COUNT: usize = 6;

impl Kind {
    /// Returns all kinds in registry order.
    pub fn all_kinds() -> &'static [Kind] {
        &[
            Self::String,
            Self::Number,
            Self::Boolean,
            Self::Null,
            Self::Object,
            Self::Array,
        ]
    }

    /// Returns the `type` tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Whether nodes of this kind own child nodes.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    /// The value a node of this kind holds when nothing is configured.
    pub fn empty_value(&self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Number => Value::from(0),
            Self::Boolean => Value::Bool(false),
            Self::Null => Value::Null,
            Self::Object => Value::Object(Map::new()),
            Self::Array => Value::Array(Vec::new()),
        }
    }

    /// The default presentation component for this kind.
    pub fn default_component(&self) -> &'static str {
        match self {
            Self::String | Self::Number => "text",
            Self::Boolean => "switch",
            Self::Null => "para",
            Self::Object => "layout",
            Self::Array => "list",
        }
    }

    /// Whether `value` has the primitive shape of this kind.
    pub fn conforms(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Null => value.is_null(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }

    /// The structural finding for a value that does not conform, if any.
    pub fn mismatch(&self, value: &Value) -> Option<String> {
        if self.conforms(value) {
            return None;
        }
        let message = match self {
            Self::String => "Value is not a string",
            Self::Number => "Value is not a number",
            Self::Boolean => "Value is not a boolean",
            Self::Null => "Value is not null",
            Self::Object => "Value is not an object",
            Self::Array => "Value is not an array",
        };
        Some(message.to_string())
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = ConfigurationError;

    /// Parse a kind from its `type` tag. Tags are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "null" => Ok(Self::Null),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            other => Err(ConfigurationError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_kinds_count() {
        assert_eq!(Kind::all_kinds().len(), KIND_COUNT);
    }

    #[test]
    fn test_as_str_roundtrip() {
        for kind in Kind::all_kinds() {
            let parsed: Kind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("integer".parse::<Kind>().is_err());
        assert!("String".parse::<Kind>().is_err());
        assert!("".parse::<Kind>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for kind in Kind::all_kinds() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_empty_values_conform() {
        for kind in Kind::all_kinds() {
            assert!(kind.conforms(&kind.empty_value()), "{kind}");
        }
    }

    #[test]
    fn test_mismatch_messages() {
        assert_eq!(
            Kind::Number.mismatch(&json!("chennai")).as_deref(),
            Some("Value is not a number")
        );
        assert_eq!(Kind::Null.mismatch(&json!(null)), None);
        assert_eq!(
            Kind::Array.mismatch(&json!({})).as_deref(),
            Some("Value is not an array")
        );
    }

    #[test]
    fn test_only_object_and_array_are_composite() {
        let composites: Vec<_> = Kind::all_kinds()
            .iter()
            .filter(|k| k.is_composite())
            .collect();
        assert_eq!(composites, vec![&Kind::Object, &Kind::Array]);
    }
}
