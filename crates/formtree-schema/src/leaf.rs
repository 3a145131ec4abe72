//! # Leaf Nodes
//!
//! A leaf holds a primitive value and no children. Every leaf kind is the
//! same [`Leaf`] record parameterised by its kind-specific [`Rules`]: the
//! value engine runs the structural and base checks, then hands the value
//! to the rules for the declarative constraints of that kind.

use std::fmt::Debug;

use serde_json::Value;

use crate::value::ValueCore;

/// Kind-specific declarative constraints of a leaf.
pub trait Rules: Clone + Debug + Send + Sync {
    /// Findings for a value that already passed the structural check.
    fn findings(&self, value: &Value) -> Vec<String>;
}

/// A node holding a primitive value.
#[derive(Debug, Clone)]
pub struct Leaf<R: Rules> {
    core: ValueCore,
    rules: R,
}

impl<R: Rules> Leaf<R> {
    pub(crate) fn new(core: ValueCore, rules: R) -> Self {
        Self { core, rules }
    }

    pub fn core(&self) -> &ValueCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut ValueCore {
        &mut self.core
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// The current value.
    pub fn data(&self) -> Value {
        self.core.meta().value().clone()
    }

    /// The value the node returns to on reset.
    pub fn initial_data(&self) -> Value {
        self.core.meta().initial().clone()
    }

    pub fn valid(&self) -> bool {
        self.core.meta().valid()
    }

    pub fn modified(&self) -> bool {
        self.core.meta().modified()
    }

    pub fn validating(&self) -> bool {
        self.core.validating()
    }

    pub fn set_value(&mut self, value: Value) {
        self.core.set_value(value);
    }

    pub fn validate(&mut self) {
        self.validate_own();
    }

    pub(crate) fn validate_own(&mut self) -> bool {
        let rules = &self.rules;
        self.core.run_validation(|value| rules.findings(value))
    }

    /// Findings `value` would produce, without touching the node.
    pub fn try_validate(&self, value: &Value) -> Vec<String> {
        self.core.try_validate(value, |v| self.rules.findings(v))
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }

    pub(crate) fn seed(&mut self, value: Value) {
        self.core.seed(value);
    }
}
