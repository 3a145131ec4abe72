//! # Aggregated Error Tree
//!
//! [`FieldErrors`] mirrors the shape of the node tree: a leaf contributes
//! its own list, an object contributes its own list plus one entry per
//! declared property, an array its own list plus one entry per element.
//!
//! The serialized form is untagged:
//!
//! ```json
//! { "errors": [], "properties": { "age": ["Field is required"] } }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Recursive aggregate of a node's findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldErrors {
    Leaf(Vec<String>),
    Object {
        errors: Vec<String>,
        properties: IndexMap<String, FieldErrors>,
    },
    Array {
        errors: Vec<String>,
        items: Vec<FieldErrors>,
    },
}

impl FieldErrors {
    /// The node's own findings.
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Leaf(errors) => errors,
            Self::Object { errors, .. } | Self::Array { errors, .. } => errors,
        }
    }

    /// Whether no node in the subtree has a finding.
    pub fn is_clean(&self) -> bool {
        match self {
            Self::Leaf(errors) => errors.is_empty(),
            Self::Object { errors, properties } => {
                errors.is_empty() && properties.values().all(FieldErrors::is_clean)
            }
            Self::Array { errors, items } => {
                errors.is_empty() && items.iter().all(FieldErrors::is_clean)
            }
        }
    }

    pub fn property(&self, name: &str) -> Option<&FieldErrors> {
        match self {
            Self::Object { properties, .. } => properties.get(name),
            _ => None,
        }
    }

    pub fn item(&self, index: usize) -> Option<&FieldErrors> {
        match self {
            Self::Array { items, .. } => items.get(index),
            _ => None,
        }
    }

    /// Every finding in the subtree as `(json pointer, message)`, parents
    /// before children.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.collect("", &mut out);
        out
    }

    fn collect(&self, path: &str, out: &mut Vec<(String, String)>) {
        out.extend(
            self.errors()
                .iter()
                .map(|message| (path.to_string(), message.clone())),
        );
        match self {
            Self::Leaf(_) => {}
            Self::Object { properties, .. } => {
                for (name, child) in properties {
                    child.collect(&format!("{path}/{}", escape(name)), out);
                }
            }
            Self::Array { items, .. } => {
                for (index, child) in items.iter().enumerate() {
                    child.collect(&format!("{path}/{index}"), out);
                }
            }
        }
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
