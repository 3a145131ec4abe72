//! # Boolean Kind
//!
//! A configured `enum` must be exactly `true` and `false`, in either
//! order. Choice-style components (`radio`, `select`) get that enum
//! automatically when none is configured, which in turn derives the two
//! selectable options.

use serde_json::Value;

use formtree_core::{ConfigurationError, Kind};

use crate::config::{decode, ValueAttrs};
use crate::leaf::{Leaf, Rules};
use crate::node::Node;
use crate::registry::Registry;
use crate::value::ValueCore;

/// A boolean leaf.
pub type BooleanNode = Leaf<BooleanRules>;

const CHOICE_COMPONENTS: &[&str] = &["radio", "select"];

/// Booleans carry no constraints beyond the base checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanRules;

impl Rules for BooleanRules {
    fn findings(&self, _value: &Value) -> Vec<String> {
        Vec::new()
    }
}

fn check_enum(allowed: &[Value]) -> Result<(), ConfigurationError> {
    match allowed {
        [Value::Bool(a), Value::Bool(b)] if a != b => Ok(()),
        _ => Err(ConfigurationError::MalformedBooleanEnum),
    }
}

pub(crate) fn build(_registry: &Registry, fragment: &Value) -> Result<Node, ConfigurationError> {
    let mut attrs: ValueAttrs = decode(Kind::Boolean, fragment)?;
    match &attrs.allowed {
        Some(allowed) => check_enum(allowed)?,
        None => {
            let choice = attrs
                .meta
                .as_ref()
                .and_then(|meta| meta.component.as_deref())
                .is_some_and(|component| CHOICE_COMPONENTS.contains(&component));
            if choice {
                attrs.allowed = Some(vec![Value::Bool(true), Value::Bool(false)]);
            }
        }
    }
    let core = ValueCore::from_attrs(Kind::Boolean, attrs)?;
    Ok(Node::Boolean(Leaf::new(core, BooleanRules)))
}
