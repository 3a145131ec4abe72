//! # Schema Overlays
//!
//! Two merges that decorate a bare schema before it is built:
//!
//! - [`merge_metadata`] folds a separately maintained presentation tree
//!   (components, ordering, options, layout) into each fragment's `meta`
//!   block. Structural keywords are never touched.
//! - [`merge_values`] writes a plain value tree into the fragments'
//!   initial values.
//!
//! Both walk the schema node-for-node: objects by property name, tuple
//! arrays by position, dynamic arrays through their single item schema.

use serde_json::{Map, Value};

use formtree_core::OverlayError;

use crate::config::with_initial;

/// Overlay keys that address structure rather than presentation.
const STRUCTURAL_KEYS: &[&str] = &["type", "properties", "items"];

/// Merge a metadata tree into `schema`.
///
/// # Errors
///
/// Returns `OverlayError::KindMismatch` when an overlay node declares a
/// `type` different from the schema fragment it lands on.
pub fn merge_metadata(schema: &Value, metadata: &Value) -> Result<Value, OverlayError> {
    merge_metadata_at(schema, metadata, "")
}

fn merge_metadata_at(schema: &Value, metadata: &Value, path: &str) -> Result<Value, OverlayError> {
    let (Value::Object(fragment), Value::Object(overlay)) = (schema, metadata) else {
        return Ok(schema.clone());
    };
    let kind = fragment.get("type").and_then(Value::as_str).unwrap_or("null");
    if let Some(declared) = overlay.get("type") {
        if declared.as_str() != Some(kind) {
            return Err(OverlayError::KindMismatch {
                title: fragment
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                path: path.to_string(),
            });
        }
    }
    tracing::trace!(path, kind, "merging metadata");

    let mut out = fragment.clone();
    let presentation: Vec<(&String, &Value)> = overlay
        .iter()
        .filter(|(key, _)| !STRUCTURAL_KEYS.contains(&key.as_str()))
        .collect();
    if !presentation.is_empty() {
        let mut meta = match out.remove("meta") {
            Some(Value::Object(meta)) => meta,
            _ => Map::new(),
        };
        for (key, value) in presentation {
            meta.insert(key.clone(), value.clone());
        }
        out.insert("meta".to_string(), Value::Object(meta));
    }

    match kind {
        "object" => {
            if let (Some(Value::Object(properties)), Some(Value::Object(overlays))) =
                (fragment.get("properties"), overlay.get("properties"))
            {
                let mut merged = Map::with_capacity(properties.len());
                for (key, child) in properties {
                    let child = match overlays.get(key) {
                        Some(child_overlay) => merge_metadata_at(
                            child,
                            child_overlay,
                            &format!("{path}/properties/{}", escape(key)),
                        )?,
                        None => child.clone(),
                    };
                    merged.insert(key.clone(), child);
                }
                out.insert("properties".to_string(), Value::Object(merged));
            }
        }
        "array" => match (fragment.get("items"), overlay.get("items")) {
            (Some(Value::Array(tuple)), Some(Value::Array(overlays))) => {
                let merged = tuple
                    .iter()
                    .enumerate()
                    .map(|(i, item)| match overlays.get(i) {
                        Some(item_overlay) => {
                            merge_metadata_at(item, item_overlay, &format!("{path}/items/{i}"))
                        }
                        None => Ok(item.clone()),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                out.insert("items".to_string(), Value::Array(merged));
            }
            (Some(item @ Value::Object(_)), Some(item_overlay @ Value::Object(_))) => {
                let merged = merge_metadata_at(item, item_overlay, &format!("{path}/items"))?;
                out.insert("items".to_string(), merged);
            }
            _ => {}
        },
        _ => {}
    }
    Ok(Value::Object(out))
}

/// Write `value` into the initial values of `schema`.
///
/// Objects recurse per declared property and keep their own initial value;
/// tuple arrays recurse per position; dynamic arrays and leaves take the
/// value as `meta.value`. Properties or positions missing from `value`
/// leave their fragment untouched.
pub fn merge_values(schema: &Value, value: &Value) -> Value {
    merge_value_at(schema, Some(value))
}

fn merge_value_at(schema: &Value, value: Option<&Value>) -> Value {
    let (Value::Object(fragment), Some(value)) = (schema, value) else {
        return schema.clone();
    };
    match fragment.get("type").and_then(Value::as_str) {
        Some("object") => {
            let mut out = fragment.clone();
            if let Some(Value::Object(properties)) = fragment.get("properties") {
                let merged: Map<String, Value> = properties
                    .iter()
                    .map(|(key, child)| (key.clone(), merge_value_at(child, value.get(key))))
                    .collect();
                out.insert("properties".to_string(), Value::Object(merged));
            }
            Value::Object(out)
        }
        Some("array") if fragment.get("items").is_some_and(Value::is_array) => {
            let mut out = fragment.clone();
            if let Some(Value::Array(tuple)) = fragment.get("items") {
                let merged: Vec<Value> = tuple
                    .iter()
                    .enumerate()
                    .map(|(i, item)| merge_value_at(item, value.get(i)))
                    .collect();
                out.insert("items".to_string(), Value::Array(merged));
            }
            Value::Object(out)
        }
        kind => {
            tracing::trace!(kind = kind.unwrap_or("null"), "seeding initial value");
            with_initial(schema, value.clone())
        }
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "title": "Person",
            "properties": {
                "name": {"type": "string", "minLength": 2},
                "tags": {"type": "array", "items": {"type": "string"}},
                "point": {"type": "array", "items": [{"type": "number"}, {"type": "number"}]}
            }
        })
    }

    #[test]
    fn test_metadata_lands_in_meta_blocks() {
        let merged = merge_metadata(
            &schema(),
            &json!({
                "type": "object",
                "layout": [["name"], ["tags"]],
                "properties": {
                    "name": {"type": "string", "component": "password", "sequence": 1},
                    "tags": {"items": {"component": "textarea"}},
                    "point": {"items": [{"help": "x"}]}
                }
            }),
        )
        .unwrap();
        assert_eq!(merged["meta"]["layout"], json!([["name"], ["tags"]]));
        let name = &merged["properties"]["name"];
        assert_eq!(name["meta"], json!({"component": "password", "sequence": 1}));
        assert_eq!(name["minLength"], json!(2));
        assert_eq!(
            merged["properties"]["tags"]["items"]["meta"]["component"],
            json!("textarea")
        );
        assert_eq!(merged["properties"]["point"]["items"][0]["meta"]["help"], json!("x"));
        assert!(merged["properties"]["point"]["items"][1].get("meta").is_none());
    }

    #[test]
    fn test_metadata_type_mismatch() {
        let err = merge_metadata(
            &schema(),
            &json!({"properties": {"name": {"type": "number"}}}),
        )
        .unwrap_err();
        assert_eq!(
            err,
            OverlayError::KindMismatch {
                title: String::new(),
                path: "/properties/name".to_string()
            }
        );
    }

    #[test]
    fn test_missing_metadata_leaves_schema_unchanged() {
        assert_eq!(merge_metadata(&schema(), &Value::Null).unwrap(), schema());
        assert_eq!(merge_metadata(&schema(), &json!({})).unwrap(), schema());
    }

    #[test]
    fn test_values_seed_leaves_and_dynamic_arrays() {
        let merged = merge_values(
            &schema(),
            &json!({"name": "sk", "tags": ["a", "b"], "point": [1]}),
        );
        assert!(merged.get("meta").is_none());
        assert_eq!(merged["properties"]["name"]["meta"]["value"], json!("sk"));
        assert_eq!(merged["properties"]["tags"]["meta"]["value"], json!(["a", "b"]));
        assert_eq!(merged["properties"]["point"]["items"][0]["meta"]["value"], json!(1));
        assert!(merged["properties"]["point"]["items"][1].get("meta").is_none());
    }

    #[test]
    fn test_absent_values_leave_fragments_untouched() {
        let merged = merge_values(&schema(), &json!({}));
        assert_eq!(merged, schema());
    }
}
