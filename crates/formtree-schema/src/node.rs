//! # Node Tree
//!
//! [`Node`] is the tagged union over the six kinds. Every variant shares a
//! [`ValueCore`]; composites additionally own their children exclusively.
//! Children never point back at their parent: a parent pulls its
//! children's values into its own raw value before it validates, and the
//! caller observes changes through [`Node::on_change`].
//!
//! ## Validation Order
//!
//! Within one node: structural check, base checks, kind constraints.
//! Across the tree: a parent's own-level findings are complete before any
//! child is validated, and every child is validated regardless of earlier
//! findings.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use formtree_core::{Kind, Metadata};

use crate::array::ArrayNode;
use crate::boolean::BooleanNode;
use crate::check::AsyncCheck;
use crate::field_errors::FieldErrors;
use crate::null::NullNode;
use crate::number::NumberNode;
use crate::object::ObjectNode;
use crate::string::StringNode;
use crate::value::ValueCore;

/// One typed unit of the schema tree.
#[derive(Debug, Clone)]
pub enum Node {
    String(StringNode),
    Number(NumberNode),
    Boolean(BooleanNode),
    Null(NullNode),
    Object(ObjectNode),
    Array(ArrayNode),
}

macro_rules! dispatch {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            Node::String($inner) => $body,
            Node::Number($inner) => $body,
            Node::Boolean($inner) => $body,
            Node::Null($inner) => $body,
            Node::Object($inner) => $body,
            Node::Array($inner) => $body,
        }
    };
}

impl Node {
    pub fn kind(&self) -> Kind {
        self.core().kind()
    }

    pub fn core(&self) -> &ValueCore {
        dispatch!(self, n => n.core())
    }

    pub fn core_mut(&mut self) -> &mut ValueCore {
        dispatch!(self, n => n.core_mut())
    }

    pub fn meta(&self) -> &Metadata {
        self.core().meta()
    }

    pub fn meta_mut(&mut self) -> &mut Metadata {
        self.core_mut().meta_mut()
    }

    pub fn title(&self) -> Option<&str> {
        self.core().title()
    }

    pub fn name(&self) -> &str {
        self.meta().name()
    }

    /// The node's own findings.
    pub fn errors(&self) -> &[String] {
        self.meta().errors()
    }

    /// Own findings are empty and, for composites, every child is valid.
    pub fn valid(&self) -> bool {
        dispatch!(self, n => n.valid())
    }

    pub fn modified(&self) -> bool {
        dispatch!(self, n => n.modified())
    }

    pub fn validating(&self) -> bool {
        dispatch!(self, n => n.validating())
    }

    pub fn syncing(&self) -> bool {
        self.core().syncing()
    }

    /// Fully materialized plain value. Composites overlay each child's
    /// data on their raw value.
    pub fn data(&self) -> Value {
        dispatch!(self, n => n.data())
    }

    /// The data the node yields right after [`reset`](Self::reset).
    pub fn initial_data(&self) -> Value {
        dispatch!(self, n => n.initial_data())
    }

    /// Unconditional state update; composites forward to their children.
    /// Never validates.
    pub fn set_value(&mut self, value: Value) {
        dispatch!(self, n => n.set_value(value))
    }

    /// Set the value, then validate once. Ignored if this node is already
    /// inside a sync.
    pub fn sync(&mut self, value: Value) {
        if !self.core_mut().begin_sync() {
            return;
        }
        self.set_value(value);
        self.core_mut().end_sync();
        self.validate();
    }

    /// Recompute findings for this node and, for composites, every
    /// descendant. No-op while syncing.
    pub fn validate(&mut self) {
        dispatch!(self, n => n.validate())
    }

    /// Own-level validation only. Returns `false` if suppressed.
    pub(crate) fn validate_own(&mut self) -> bool {
        dispatch!(self, n => n.validate_own())
    }

    /// [`validate`](Self::validate) including asynchronous checks.
    ///
    /// Own synchronous checks run first, then this node's async checks in
    /// insertion order, then every child in order.
    pub fn validate_async(&mut self) -> BoxFuture<'_, ()> {
        async move {
            if !self.validate_own() {
                return;
            }
            self.core_mut().set_validating(true);
            let checks = self.core().async_checks().to_vec();
            if !checks.is_empty() {
                let value = self.data();
                for check in &checks {
                    let findings = check.check(&value).await;
                    self.meta_mut().add_errors(findings);
                }
            }
            match &mut *self {
                Node::Object(object) => {
                    for child in object.children_mut() {
                        child.validate_async().await;
                    }
                }
                Node::Array(array) => {
                    for child in array.children_mut() {
                        child.validate_async().await;
                    }
                }
                _ => {}
            }
            self.core_mut().set_validating(false);
        }
        .boxed()
    }

    /// `value := initial` and errors cleared, recursively.
    pub fn reset(&mut self) {
        dispatch!(self, n => n.reset())
    }

    pub fn field_errors(&self) -> FieldErrors {
        match self {
            Node::Object(object) => object.field_errors(),
            Node::Array(array) => array.field_errors(),
            leaf => FieldErrors::Leaf(leaf.errors().to_vec()),
        }
    }

    /// Register a hook fired with the raw value after every
    /// `set_value`/`sync` on this node.
    pub fn on_change<F>(&mut self, hook: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.core_mut().add_hook(Arc::new(hook));
    }

    /// Attach a check run by [`validate_async`](Self::validate_async).
    pub fn add_async_check<C>(&mut self, check: C)
    where
        C: AsyncCheck + 'static,
    {
        self.core_mut().add_async_check(Arc::new(check));
    }

    /// Findings `value` would produce at this node's own level, without
    /// touching any state.
    pub fn probe(&self, value: &Value) -> Vec<String> {
        match self {
            Node::String(n) => n.try_validate(value),
            Node::Number(n) => n.try_validate(value),
            Node::Boolean(n) => n.try_validate(value),
            Node::Null(n) => n.try_validate(value),
            Node::Object(n) => n.try_validate(value),
            Node::Array(n) => n.try_validate(value),
        }
    }

    /// Replace both the initial baseline and the live value, recursively
    /// for composites. Does not fire hooks.
    pub(crate) fn seed(&mut self, value: Value) {
        dispatch!(self, n => n.seed(value))
    }

    /// A fresh copy of this node seeded with `value`.
    pub(crate) fn instantiate(&self, value: Value) -> Node {
        let mut node = self.clone();
        node.seed(value);
        node
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectNode> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayNode> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }
}
