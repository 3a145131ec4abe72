//! # formtree-schema — Schema-Driven Node Trees
//!
//! Builds a live tree of typed value nodes from a JSON-Schema-like
//! configuration, validates values against it, and aggregates the
//! findings bottom-up into a tree mirroring the schema.
//!
//! ## Building (`registry`)
//!
//! A [`Registry`] maps each `type` tag to a constructor. Composite kinds
//! recurse through the registry to build their children. Contradictory
//! declarations abort the build with a
//! [`ConfigurationError`](formtree_core::ConfigurationError).
//!
//! ```
//! use formtree_schema::Registry;
//! use serde_json::json;
//!
//! let mut tree = Registry::new()
//!     .build(&json!({
//!         "type": "object",
//!         "required": ["age"],
//!         "properties": {
//!             "name": {"type": "string"},
//!             "age": {"type": "number", "minimum": 18}
//!         }
//!     }))
//!     .unwrap();
//! tree.sync(json!({"name": "sk"}));
//! assert!(!tree.valid());
//! ```
//!
//! ## Validating (`node`)
//!
//! [`Node::validate`] runs structural, base and kind checks on each node,
//! then recurses into every child. [`Node::validate_async`] additionally
//! awaits the [`AsyncCheck`]s attached to each node. Findings are strings
//! on the node; [`Node::field_errors`] collects them into [`FieldErrors`].
//!
//! ## Overlays (`overlay`)
//!
//! [`merge_metadata`] and [`merge_values`] decorate a bare schema with a
//! presentation tree and an external value tree before it is built.
//!
//! ## Crate Policy
//!
//! - Depends only on `formtree-core` internally.
//! - A parent owns its children exclusively; children hold no reference
//!   back to their parent.
//! - Validation findings never surface as `Err`.

pub mod array;
pub mod boolean;
pub mod check;
pub mod config;
pub mod field_errors;
pub mod format;
pub mod leaf;
pub mod node;
pub mod null;
pub mod number;
pub mod object;
pub mod overlay;
pub mod registry;
pub mod string;
pub mod value;

pub use array::{ArrayNode, ArrayRules, Items};
pub use boolean::{BooleanNode, BooleanRules};
pub use check::{AsyncCheck, FnCheck};
pub use config::{with_initial, MetaConfig, ValueAttrs};
pub use field_errors::FieldErrors;
pub use format::{FormatTable, Matcher};
pub use leaf::{Leaf, Rules};
pub use node::Node;
pub use null::{NullNode, NullRules};
pub use number::{NumberNode, NumberRules};
pub use object::{AdditionalProperties, ObjectNode, ObjectRules};
pub use overlay::{merge_metadata, merge_values};
pub use registry::{Constructor, Registry};
pub use string::{compile_pattern, StringNode, StringRules};
pub use value::{ChangeHook, ValueCore};

pub use formtree_core::{ConfigurationError, FormtreeError, Kind, MutationError, OverlayError};
