//! # Null Kind
//!
//! Structural conformance only. Fragments with no `type` tag build null
//! nodes, which the default component renders as a paragraph.

use serde_json::Value;

use formtree_core::{ConfigurationError, Kind};

use crate::config::{decode, ValueAttrs};
use crate::leaf::{Leaf, Rules};
use crate::node::Node;
use crate::registry::Registry;
use crate::value::ValueCore;

/// A null leaf.
pub type NullNode = Leaf<NullRules>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullRules;

impl Rules for NullRules {
    fn findings(&self, _value: &Value) -> Vec<String> {
        Vec::new()
    }
}

pub(crate) fn build(_registry: &Registry, fragment: &Value) -> Result<Node, ConfigurationError> {
    let attrs: ValueAttrs = decode(Kind::Null, fragment)?;
    let core = ValueCore::from_attrs(Kind::Null, attrs)?;
    Ok(Node::Null(Leaf::new(core, NullRules)))
}
