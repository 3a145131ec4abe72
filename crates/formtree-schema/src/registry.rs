//! # Kind Registry
//!
//! Maps each [`Kind`] to the constructor that builds its nodes. Composite
//! constructors recurse through the registry they were called with, which
//! is how objects and arrays build children of any kind without the kind
//! modules depending on each other.
//!
//! A registry is an ordinary value: build one, optionally swap a
//! constructor or extend its [`FormatTable`], then pass it to every build.

use std::collections::HashMap;

use serde_json::Value;

use formtree_core::{ConfigurationError, FormtreeError, Kind};

use crate::config::kind_of;
use crate::format::FormatTable;
use crate::node::Node;
use crate::overlay::merge_metadata;
use crate::{array, boolean, null, number, object, string};

/// Builds one node from its schema fragment.
pub type Constructor = fn(&Registry, &Value) -> Result<Node, ConfigurationError>;

/// Kind-to-constructor map plus the string format table.
#[derive(Clone)]
pub struct Registry {
    constructors: HashMap<Kind, Constructor>,
    formats: FormatTable,
}

impl Registry {
    /// Every built-in kind and format.
    pub fn new() -> Self {
        Self::with_formats(FormatTable::new())
    }

    /// Every built-in kind, with the given format table.
    pub fn with_formats(formats: FormatTable) -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
            formats,
        };
        for kind in Kind::all_kinds() {
            let constructor: Constructor = match kind {
                Kind::String => string::build,
                Kind::Number => number::build,
                Kind::Boolean => boolean::build,
                Kind::Null => null::build,
                Kind::Object => object::build,
                Kind::Array => array::build,
            };
            registry.register(*kind, constructor);
        }
        registry
    }

    /// Replace the constructor for `kind`.
    pub fn register(&mut self, kind: Kind, constructor: Constructor) {
        self.constructors.insert(kind, constructor);
    }

    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    pub fn formats_mut(&mut self) -> &mut FormatTable {
        &mut self.formats
    }

    /// Build the node tree for `fragment`.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` met anywhere in the tree.
    pub fn build(&self, fragment: &Value) -> Result<Node, ConfigurationError> {
        let kind = kind_of(fragment)?;
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| ConfigurationError::UnknownKind {
                kind: kind.to_string(),
            })?;
        tracing::debug!(%kind, title = fragment.get("title").and_then(serde_json::Value::as_str), "building node");
        constructor(self, fragment)
    }

    /// Fold a metadata overlay into `schema`, then build the tree.
    ///
    /// # Errors
    ///
    /// Returns `FormtreeError::Overlay` when the overlay disagrees with the
    /// schema and `FormtreeError::Configuration` when the merged schema
    /// does not build.
    pub fn build_with_metadata(
        &self,
        schema: &Value,
        metadata: &Value,
    ) -> Result<Node, FormtreeError> {
        let merged = merge_metadata(schema, metadata)?;
        Ok(self.build(&merged)?)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.constructors.keys().map(Kind::as_str).collect();
        kinds.sort();
        f.debug_struct("Registry")
            .field("kinds", &kinds)
            .field("formats", &self.formats)
            .finish()
    }
}
