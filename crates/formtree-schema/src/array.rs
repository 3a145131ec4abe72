//! # Array Kind
//!
//! `items` is either one schema (a dynamic array: homogeneous and
//! resizable) or a tuple of schemas (a fixed array: positional and never
//! resized). Item schemas are built once; elements are fresh copies of
//! them seeded with the corresponding entry of the value.
//!
//! `set_value` discards and rebuilds every element. For a fixed array the
//! tuple decides the element count: value entries past the tuple are kept
//! in the raw value only, tuple positions past the value are seeded with
//! `null`.

use serde::Deserialize;
use serde_json::Value;

use formtree_core::json::has_duplicates;
use formtree_core::{Bound, ConfigurationError, Kind, MutationError};

use crate::config::{decode, non_negative, ValueAttrs};
use crate::field_errors::FieldErrors;
use crate::node::Node;
use crate::registry::Registry;
use crate::value::ValueCore;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ArrayConfig {
    #[serde(flatten)]
    attrs: ValueAttrs,
    items: Option<Value>,
    min_items: Option<f64>,
    max_items: Option<f64>,
    unique_items: Option<bool>,
    additional_items: Option<bool>,
}

/// The `items` keyword.
#[derive(Debug, Clone)]
pub enum Items {
    /// One schema for every element.
    Dynamic(Box<Node>),
    /// One schema per position.
    Fixed(Vec<Node>),
}

/// Own-level constraints of an array node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayRules {
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
    pub additional_items: Option<bool>,
}

impl ArrayRules {
    fn findings(&self, value: &Value, items: &Items) -> Vec<String> {
        let Some(list) = value.as_array() else {
            return Vec::new();
        };
        let mut findings = Vec::new();
        if let Some(min) = self.min_items {
            if list.len() < min {
                findings.push(format!("should NOT have less than {min} items"));
            }
        }
        if let Some(max) = self.max_items {
            if list.len() > max {
                findings.push(format!("should NOT have more than {max} items"));
            }
        }
        if self.unique_items && has_duplicates(list) {
            findings.push("should NOT have duplicate items".to_string());
        }
        if let Items::Fixed(tuple) = items {
            if self.additional_items == Some(false) && list.len() > tuple.len() {
                findings.push("should NOT have additional items".to_string());
            }
        }
        findings
    }
}

/// A node owning one child per element.
#[derive(Debug, Clone)]
pub struct ArrayNode {
    core: ValueCore,
    items: Items,
    elements: Vec<Node>,
    rules: ArrayRules,
}

impl ArrayNode {
    pub fn core(&self) -> &ValueCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut ValueCore {
        &mut self.core
    }

    pub fn rules(&self) -> &ArrayRules {
        &self.rules
    }

    pub fn items(&self) -> &Items {
        &self.items
    }

    /// Whether `items` is a single schema.
    pub fn is_dynamic(&self) -> bool {
        matches!(self.items, Items::Dynamic(_))
    }

    pub fn elements(&self) -> &[Node] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&Node> {
        self.elements.get(index)
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.elements.get_mut(index)
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.elements.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn valid(&self) -> bool {
        self.core.meta().valid() && self.elements.iter().all(Node::valid)
    }

    pub fn modified(&self) -> bool {
        self.core.meta().modified() || self.elements.iter().any(Node::modified)
    }

    pub fn validating(&self) -> bool {
        self.core.validating() || self.elements.iter().any(Node::validating)
    }

    /// The raw list with each element's data written at its index.
    pub fn data(&self) -> Value {
        overlay(self.core.meta().value(), self.elements.iter().map(Node::data))
    }

    pub fn initial_data(&self) -> Value {
        overlay(
            self.core.meta().initial(),
            self.elements.iter().map(Node::initial_data),
        )
    }

    pub fn set_value(&mut self, value: Value) {
        self.rebuild(&value);
        self.core.set_value(value);
    }

    /// Append an element seeded with the item schema's default, then
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::FixedArray` for tuple arrays.
    pub fn push(&mut self) -> Result<(), MutationError> {
        let Items::Dynamic(template) = &self.items else {
            return Err(MutationError::FixedArray);
        };
        let default = template.meta().default_value().clone();
        let element = template.instantiate(default.clone());
        self.with_raw_list(|list| list.push(default));
        self.elements.push(element);
        tracing::trace!(len = self.elements.len(), "pushed array element");
        self.core.notify();
        self.validate();
        Ok(())
    }

    /// Remove the element at `index` and return it detached, then
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::FixedArray` for tuple arrays and
    /// `MutationError::IndexOutOfRange` past the last element.
    pub fn remove(&mut self, index: usize) -> Result<Node, MutationError> {
        if !self.is_dynamic() {
            return Err(MutationError::FixedArray);
        }
        let len = self.elements.len();
        if index >= len {
            return Err(MutationError::IndexOutOfRange { index, len });
        }
        self.with_raw_list(|list| {
            if index < list.len() {
                list.remove(index);
            }
        });
        let removed = self.elements.remove(index);
        tracing::trace!(index, len = self.elements.len(), "removed array element");
        self.core.notify();
        self.validate();
        Ok(removed)
    }

    /// Write `value` into both the raw list entry and the element at
    /// `index`. Does not validate.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::IndexOutOfRange` past the last element.
    pub fn set_element_value(&mut self, index: usize, value: Value) -> Result<(), MutationError> {
        let len = self.elements.len();
        if index >= len {
            return Err(MutationError::IndexOutOfRange { index, len });
        }
        self.with_raw_list(|list| {
            if index >= list.len() {
                list.resize(index + 1, Value::Null);
            }
            list[index] = value.clone();
        });
        self.elements[index].set_value(value);
        self.core.notify();
        Ok(())
    }

    pub fn validate(&mut self) {
        if !self.validate_own() {
            return;
        }
        for element in &mut self.elements {
            element.validate();
        }
    }

    pub(crate) fn validate_own(&mut self) -> bool {
        if self.core.syncing() {
            return false;
        }
        self.reconcile();
        let rules = &self.rules;
        let items = &self.items;
        self.core.run_validation(|value| rules.findings(value, items))
    }

    /// Own-level findings `value` would produce.
    pub fn try_validate(&self, value: &Value) -> Vec<String> {
        self.core
            .try_validate(value, |v| self.rules.findings(v, &self.items))
    }

    /// Restore the initial list and rebuild every element from it.
    pub fn reset(&mut self) {
        self.core.reset();
        let initial = self.core.meta().initial().clone();
        self.rebuild(&initial);
    }

    pub fn field_errors(&self) -> FieldErrors {
        FieldErrors::Array {
            errors: self.core.meta().errors().to_vec(),
            items: self.elements.iter().map(Node::field_errors).collect(),
        }
    }

    pub(crate) fn seed(&mut self, value: Value) {
        self.rebuild(&value);
        self.core.seed(value);
    }

    fn rebuild(&mut self, value: &Value) {
        let values = value.as_array().map(Vec::as_slice).unwrap_or_default();
        self.elements = match &self.items {
            Items::Dynamic(template) => values
                .iter()
                .map(|v| template.instantiate(v.clone()))
                .collect(),
            Items::Fixed(tuple) => tuple
                .iter()
                .enumerate()
                .map(|(i, template)| template.instantiate(values.get(i).cloned().unwrap_or(Value::Null)))
                .collect(),
        };
        tracing::trace!(elements = self.elements.len(), "rebuilt array elements");
    }

    /// Write each element's data back into the raw list.
    fn reconcile(&mut self) {
        let elements = &self.elements;
        if let Value::Array(list) = self.core.meta_mut().value_mut() {
            for (slot, element) in list.iter_mut().zip(elements) {
                *slot = element.data();
            }
        }
    }

    /// Edit the raw list in place. A raw value that is not a list is
    /// replaced by an empty one first.
    fn with_raw_list<R>(&mut self, edit: impl FnOnce(&mut Vec<Value>) -> R) -> R {
        let value = self.core.meta_mut().value_mut();
        let mut list = match std::mem::take(value) {
            Value::Array(list) => list,
            _ => Vec::new(),
        };
        let out = edit(&mut list);
        *value = Value::Array(list);
        out
    }
}

fn overlay(base: &Value, entries: impl Iterator<Item = Value>) -> Value {
    let mut out = base.as_array().cloned().unwrap_or_default();
    for (index, value) in entries.enumerate() {
        match out.get_mut(index) {
            Some(slot) => *slot = value,
            None => out.push(value),
        }
    }
    Value::Array(out)
}

pub(crate) fn build(registry: &Registry, fragment: &Value) -> Result<Node, ConfigurationError> {
    let config: ArrayConfig = decode(Kind::Array, fragment)?;
    let min_items = non_negative(config.min_items, Bound::MinItems)?;
    let max_items = non_negative(config.max_items, Bound::MaxItems)?;
    let items = match config.items {
        None | Some(Value::Null) => return Err(ConfigurationError::MissingItems),
        Some(Value::Array(tuple)) => Items::Fixed(
            tuple
                .iter()
                .map(|item| registry.build(item))
                .collect::<Result<_, _>>()?,
        ),
        Some(item) => Items::Dynamic(Box::new(registry.build(&item)?)),
    };
    let core = ValueCore::from_attrs(Kind::Array, config.attrs)?;
    let mut node = ArrayNode {
        core,
        items,
        elements: Vec::new(),
        rules: ArrayRules {
            min_items,
            max_items,
            unique_items: config.unique_items.unwrap_or(false),
            additional_items: config.additional_items,
        },
    };
    let initial = node.core.meta().initial().clone();
    node.rebuild(&initial);
    Ok(Node::Array(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(fragment: Value) -> Node {
        Registry::new().build(&fragment).unwrap()
    }

    fn array(node: &mut Node) -> &mut ArrayNode {
        node.as_array_mut().unwrap()
    }

    #[test]
    fn test_elements_follow_value() {
        let mut node = build(json!({
            "type": "array",
            "items": {"type": "number"},
            "meta": {"value": [1, 2, 3]}
        }));
        assert_eq!(array(&mut node).len(), 3);
        assert_eq!(node.data(), json!([1, 2, 3]));
        node.set_value(json!([4]));
        assert_eq!(array(&mut node).len(), 1);
        assert_eq!(array(&mut node).element(0).unwrap().data(), json!(4));
    }

    #[test]
    fn test_min_items() {
        let mut node = build(json!({
            "type": "array",
            "items": {"type": "string"},
            "minItems": 2,
            "meta": {"value": ["one"]}
        }));
        node.validate();
        assert_eq!(node.errors(), ["should NOT have less than 2 items"]);
    }

    #[test]
    fn test_max_items() {
        let mut node = build(json!({"type": "array", "items": {"type": "number"}, "maxItems": 1}));
        node.sync(json!([1, 2]));
        assert_eq!(node.errors(), ["should NOT have more than 1 items"]);
    }

    #[test]
    fn test_push_grows_elements_and_value() {
        let mut node = build(json!({"type": "array", "items": {"type": "string", "default": "x"}}));
        let list = array(&mut node);
        list.push().unwrap();
        list.push().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.core().meta().value(), &json!(["x", "x"]));
        assert_eq!(node.data(), json!(["x", "x"]));
        assert!(node.modified());
    }

    #[test]
    fn test_push_revalidates() {
        let mut node = build(json!({"type": "array", "items": {"type": "number"}, "maxItems": 1}));
        let list = array(&mut node);
        list.push().unwrap();
        assert!(list.valid());
        list.push().unwrap();
        assert_eq!(list.core().meta().errors(), ["should NOT have more than 1 items"]);
    }

    #[test]
    fn test_remove_detaches_element() {
        let mut node = build(json!({
            "type": "array",
            "items": {"type": "number"},
            "meta": {"value": [1, 2, 3]}
        }));
        let list = array(&mut node);
        let removed = list.remove(1).unwrap();
        assert_eq!(removed.data(), json!(2));
        assert_eq!(list.len(), 2);
        assert_eq!(node.data(), json!([1, 3]));
        assert_eq!(
            array(&mut node).remove(5).unwrap_err(),
            MutationError::IndexOutOfRange { index: 5, len: 2 }
        );
    }

    #[test]
    fn test_fixed_arrays_are_not_resizable() {
        let mut node = build(json!({
            "type": "array",
            "items": [{"type": "string"}, {"type": "number"}],
            "meta": {"value": ["a", 1]}
        }));
        let list = array(&mut node);
        assert!(!list.is_dynamic());
        assert_eq!(list.push(), Err(MutationError::FixedArray));
        assert_eq!(list.remove(0).unwrap_err(), MutationError::FixedArray);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_fixed_array_pairs_values_with_tuple() {
        let mut node = build(json!({
            "type": "array",
            "items": [{"type": "string"}, {"type": "number"}]
        }));
        node.set_value(json!(["a"]));
        let list = array(&mut node);
        assert_eq!(list.len(), 2);
        assert_eq!(list.element(1).unwrap().data(), Value::Null);
        node.validate();
        let list = array(&mut node);
        assert_eq!(list.element(1).unwrap().errors(), ["Value is not a number"]);
    }

    #[test]
    fn test_additional_items_forbidden() {
        let mut node = build(json!({
            "type": "array",
            "items": [{"type": "string"}, {"type": "number"}],
            "additionalItems": false
        }));
        node.sync(json!(["a", 1, true]));
        assert_eq!(node.errors(), ["should NOT have additional items"]);
        assert_eq!(array(&mut node).len(), 2);
        assert_eq!(node.data(), json!(["a", 1, true]));
    }

    #[test]
    fn test_unique_items() {
        let mut node = build(json!({"type": "array", "items": {"type": "number"}, "uniqueItems": true}));
        node.sync(json!([1, 1, 2]));
        assert_eq!(node.errors(), ["should NOT have duplicate items"]);
        node.sync(json!([1, 2, 3]));
        assert!(node.errors().is_empty());
    }

    #[test]
    fn test_set_element_value_updates_both_sides() {
        let mut node = build(json!({
            "type": "array",
            "items": {"type": "number"},
            "meta": {"value": [1, 2]}
        }));
        let list = array(&mut node);
        list.set_element_value(1, json!(7)).unwrap();
        assert_eq!(list.core().meta().value(), &json!([1, 7]));
        assert_eq!(list.element(1).unwrap().data(), json!(7));
        assert_eq!(
            list.set_element_value(2, json!(0)),
            Err(MutationError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_element_errors_aggregate() {
        let mut node = build(json!({
            "type": "array",
            "items": {"type": "number", "minimum": 2}
        }));
        node.sync(json!([1, 3]));
        assert!(node.errors().is_empty());
        assert!(!node.valid());
        assert_eq!(
            node.field_errors(),
            FieldErrors::Array {
                errors: Vec::new(),
                items: vec![
                    FieldErrors::Leaf(vec!["should NOT be lesser than 2".to_string()]),
                    FieldErrors::Leaf(Vec::new()),
                ],
            }
        );
    }

    #[test]
    fn test_reset_rebuilds_elements() {
        let mut node = build(json!({
            "type": "array",
            "items": {"type": "number"},
            "meta": {"value": [1]}
        }));
        array(&mut node).push().unwrap();
        node.reset();
        assert_eq!(array(&mut node).len(), 1);
        assert_eq!(node.data(), json!([1]));
        assert!(!node.modified());
    }

    #[test]
    fn test_missing_items_rejected() {
        assert_eq!(
            Registry::new().build(&json!({"type": "array"})).unwrap_err(),
            ConfigurationError::MissingItems
        );
    }

    #[test]
    fn test_negative_item_bounds_rejected() {
        let err = Registry::new()
            .build(&json!({"type": "array", "items": {"type": "number"}, "minItems": -1}))
            .unwrap_err();
        assert_eq!(err.to_string(), "minItems can not be negative");
    }

    #[test]
    fn test_fractional_item_bounds_rejected() {
        let err = Registry::new()
            .build(&json!({"type": "array", "items": {"type": "number"}, "minItems": 1.5}))
            .unwrap_err();
        assert_eq!(err, ConfigurationError::FractionalBound(Bound::MinItems));
        assert_eq!(err.to_string(), "minItems must be an integer");
    }
}
