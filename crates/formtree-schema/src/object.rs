//! # Object Kind
//!
//! An object owns one child per declared property, in declaration order.
//! At build time each child is named after its key, untitled children take
//! the key as title, children listed in `required` become mandatory, and
//! children present in the object's initial value are seeded from it.
//!
//! `set_value` keeps the whole incoming map as the object's raw value and
//! forwards each declared key to its child. Undeclared keys stay in the raw
//! value only; they are checked against `additionalProperties`.
//!
//! Required properties are reported by the child (`Field is required`),
//! never duplicated at the object's own level.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use formtree_core::{Bound, ConfigurationError, Kind};

use crate::config::{decode, non_negative, ValueAttrs};
use crate::field_errors::FieldErrors;
use crate::node::Node;
use crate::registry::Registry;
use crate::value::ValueCore;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ObjectConfig {
    #[serde(flatten)]
    attrs: ValueAttrs,
    properties: IndexMap<String, Value>,
    required: Option<Vec<String>>,
    additional_properties: Option<Value>,
    min_properties: Option<f64>,
    max_properties: Option<f64>,
}

/// The `additionalProperties` keyword.
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    /// `true` permits undeclared keys, `false` forbids them.
    Allowed(bool),
    /// Undeclared values must satisfy this node's own-level checks.
    Schema(Box<Node>),
}

/// Own-level constraints of an object node.
#[derive(Debug, Clone, Default)]
pub struct ObjectRules {
    pub required: Vec<String>,
    pub additional: Option<AdditionalProperties>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
}

impl ObjectRules {
    fn findings(&self, value: &Value, properties: &IndexMap<String, Node>) -> Vec<String> {
        let Some(map) = value.as_object() else {
            return Vec::new();
        };
        let mut findings = Vec::new();
        if let Some(min) = self.min_properties {
            if map.len() < min {
                findings.push(format!("should NOT have less than {min} properties"));
            }
        }
        if let Some(max) = self.max_properties {
            if map.len() > max {
                findings.push(format!("should NOT have more than {max} properties"));
            }
        }
        let additionals: Vec<&String> = map.keys().filter(|key| !properties.contains_key(*key)).collect();
        match &self.additional {
            Some(AdditionalProperties::Allowed(false)) if !additionals.is_empty() => {
                let keys: Vec<&str> = additionals.iter().map(|key| key.as_str()).collect();
                findings.push(format!(
                    "should NOT have additional properties [{}]",
                    keys.join(", ")
                ));
            }
            Some(AdditionalProperties::Schema(schema)) => {
                for key in additionals {
                    for finding in schema.probe(&map[key.as_str()]) {
                        findings.push(format!(
                            "additional property '{key}' {}",
                            finding.replacen("Value ", "", 1)
                        ));
                    }
                }
            }
            _ => {}
        }
        findings
    }
}

/// A node owning one child per declared property.
#[derive(Debug, Clone)]
pub struct ObjectNode {
    core: ValueCore,
    properties: IndexMap<String, Node>,
    rules: ObjectRules,
}

impl ObjectNode {
    pub fn core(&self) -> &ValueCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut ValueCore {
        &mut self.core
    }

    pub fn rules(&self) -> &ObjectRules {
        &self.rules
    }

    pub fn get_property(&self, name: &str) -> Option<&Node> {
        self.properties.get(name)
    }

    pub fn get_property_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.properties.get_mut(name)
    }

    /// Declared property names in declaration order.
    pub fn get_properties(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    /// Declared children in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Node> + '_ {
        self.properties.values()
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.properties.values_mut()
    }

    pub fn valid(&self) -> bool {
        self.core.meta().valid() && self.properties.values().all(Node::valid)
    }

    pub fn modified(&self) -> bool {
        self.core.meta().modified() || self.properties.values().any(Node::modified)
    }

    pub fn validating(&self) -> bool {
        self.core.validating() || self.properties.values().any(Node::validating)
    }

    /// The raw value with every declared property's data written over it.
    pub fn data(&self) -> Value {
        overlay(self.core.meta().value(), self.properties.iter().map(|(k, n)| (k, n.data())))
    }

    pub fn initial_data(&self) -> Value {
        overlay(
            self.core.meta().initial(),
            self.properties.iter().map(|(k, n)| (k, n.initial_data())),
        )
    }

    pub fn set_value(&mut self, value: Value) {
        if let Value::Object(map) = &value {
            for (key, child) in self.properties.iter_mut() {
                if let Some(v) = map.get(key) {
                    child.set_value(v.clone());
                }
            }
        }
        self.core.set_value(value);
    }

    pub fn validate(&mut self) {
        if !self.validate_own() {
            return;
        }
        for child in self.properties.values_mut() {
            child.validate();
        }
    }

    pub(crate) fn validate_own(&mut self) -> bool {
        if self.core.syncing() {
            return false;
        }
        self.reconcile();
        let rules = &self.rules;
        let properties = &self.properties;
        self.core
            .run_validation(|value| rules.findings(value, properties))
    }

    /// Own-level findings `value` would produce.
    pub fn try_validate(&self, value: &Value) -> Vec<String> {
        self.core
            .try_validate(value, |v| self.rules.findings(v, &self.properties))
    }

    pub fn reset(&mut self) {
        self.core.reset();
        for child in self.properties.values_mut() {
            child.reset();
        }
    }

    pub fn field_errors(&self) -> FieldErrors {
        FieldErrors::Object {
            errors: self.core.meta().errors().to_vec(),
            properties: self
                .properties
                .iter()
                .map(|(key, child)| (key.clone(), child.field_errors()))
                .collect(),
        }
    }

    pub(crate) fn seed(&mut self, value: Value) {
        self.seed_children(&value);
        self.core.seed(value);
    }

    fn seed_children(&mut self, value: &Value) {
        if let Value::Object(map) = value {
            for (key, child) in self.properties.iter_mut() {
                if let Some(v) = map.get(key) {
                    child.seed(v.clone());
                }
            }
        }
    }

    /// Write each child's data into the raw value, for keys it already has
    /// and for children edited since their last seed.
    fn reconcile(&mut self) {
        let properties = &self.properties;
        if let Value::Object(map) = self.core.meta_mut().value_mut() {
            for (key, child) in properties {
                if map.contains_key(key) || child.modified() {
                    map.insert(key.clone(), child.data());
                }
            }
        }
    }
}

fn overlay<'a>(base: &Value, entries: impl Iterator<Item = (&'a String, Value)>) -> Value {
    let mut out = match base {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    for (key, value) in entries {
        out.insert(key.clone(), value);
    }
    Value::Object(out)
}

pub(crate) fn build(registry: &Registry, fragment: &Value) -> Result<Node, ConfigurationError> {
    let config: ObjectConfig = decode(Kind::Object, fragment)?;
    let min_properties = non_negative(config.min_properties, Bound::MinProperties)?;
    let max_properties = non_negative(config.max_properties, Bound::MaxProperties)?;
    let required = config.required.unwrap_or_default();
    for (i, name) in required.iter().enumerate() {
        if required[..i].contains(name) {
            return Err(ConfigurationError::DuplicateRequired);
        }
    }

    let core = ValueCore::from_attrs(Kind::Object, config.attrs)?;

    let mut properties = IndexMap::with_capacity(config.properties.len());
    for (key, child_fragment) in config.properties {
        let mut child = registry.build(&child_fragment)?;
        child.meta_mut().set_name(key.clone());
        if child.title().is_none() {
            child.core_mut().set_title(key.clone());
        }
        properties.insert(key, child);
    }
    for name in &required {
        if let Some(child) = properties.get_mut(name) {
            child.meta_mut().set_mandatory(true);
        }
    }

    let additional = match config.additional_properties {
        None | Some(Value::Null) => None,
        Some(Value::Bool(allowed)) => Some(AdditionalProperties::Allowed(allowed)),
        Some(schema) => Some(AdditionalProperties::Schema(Box::new(registry.build(&schema)?))),
    };

    let mut node = ObjectNode {
        core,
        properties,
        rules: ObjectRules {
            required,
            additional,
            min_properties,
            max_properties,
        },
    };
    let initial = node.core.meta().initial().clone();
    node.seed_children(&initial);
    Ok(Node::Object(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person() -> Value {
        json!({
            "type": "object",
            "title": "Person",
            "properties": {
                "name": {"type": "string", "title": "Full Name", "minLength": 2},
                "age": {"type": "number", "minimum": 18}
            }
        })
    }

    fn build(fragment: Value) -> Node {
        Registry::new().build(&fragment).unwrap()
    }

    fn object(fragment: Value) -> ObjectNode {
        match build(fragment) {
            Node::Object(node) => node,
            other => panic!("expected an object node, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_children_named_and_titled_from_keys() {
        let node = object(person());
        assert_eq!(node.get_properties(), ["name", "age"]);
        let name = node.get_property("name").unwrap();
        assert_eq!(name.name(), "name");
        assert_eq!(name.title(), Some("Full Name"));
        let age = node.get_property("age").unwrap();
        assert_eq!(age.title(), Some("age"));
        assert!(node.get_property("city").is_none());
    }

    #[test]
    fn test_data_includes_every_declared_property() {
        let node = object(person());
        assert_eq!(node.data(), json!({"name": "", "age": 0}));
    }

    #[test]
    fn test_initial_value_seeds_children() {
        let mut fragment = person();
        fragment["meta"] = json!({"value": {"name": "sk", "age": 30}});
        let node = object(fragment);
        assert_eq!(node.get_property("name").unwrap().data(), json!("sk"));
        assert!(!node.modified());
        assert_eq!(node.data(), json!({"name": "sk", "age": 30}));
    }

    #[test]
    fn test_set_value_forwards_declared_keys() {
        let mut node = object(person());
        node.set_value(json!({"name": "naguvan", "city": "chennai"}));
        assert_eq!(node.get_property("name").unwrap().data(), json!("naguvan"));
        assert_eq!(
            node.data(),
            json!({"name": "naguvan", "city": "chennai", "age": 0})
        );
        assert!(node.modified());
    }

    #[test]
    fn test_required_reported_on_child_only() {
        let mut node = build(json!({
            "type": "object",
            "required": ["age"],
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "number"}
            }
        }));
        node.set_value(json!({"name": "sk"}));
        node.validate();
        let object = node.as_object().unwrap();
        assert_eq!(object.get_property("age").unwrap().errors(), ["Field is required"]);
        assert!(node.errors().is_empty());
        assert!(!node.valid());
    }

    #[test]
    fn test_duplicate_required_rejected() {
        let mut fragment = person();
        fragment["required"] = json!(["age", "age"]);
        assert_eq!(
            Registry::new().build(&fragment).unwrap_err(),
            ConfigurationError::DuplicateRequired
        );
    }

    #[test]
    fn test_negative_property_bounds_rejected() {
        for keyword in ["minProperties", "maxProperties"] {
            let mut fragment = person();
            fragment[keyword] = json!(-1);
            let err = Registry::new().build(&fragment).unwrap_err();
            assert_eq!(err.to_string(), format!("{keyword} can not be negative"));
        }
    }

    #[test]
    fn test_property_count_bounds() {
        let mut fragment = person();
        fragment["minProperties"] = json!(2);
        fragment["maxProperties"] = json!(3);
        let mut node = build(fragment);
        node.sync(json!({"name": "sk"}));
        assert_eq!(node.errors(), ["should NOT have less than 2 properties"]);
        node.sync(json!({"name": "sk", "age": 20, "a": 1, "b": 2}));
        assert_eq!(node.errors(), ["should NOT have more than 3 properties"]);
    }

    #[test]
    fn test_additional_properties_forbidden() {
        let mut fragment = person();
        fragment["additionalProperties"] = json!(false);
        let mut node = build(fragment);
        node.sync(json!({"name": "sk", "age": 20, "city": "chennai", "country": "india"}));
        assert_eq!(
            node.errors(),
            ["should NOT have additional properties [city, country]"]
        );
    }

    #[test]
    fn test_additional_properties_schema() {
        let mut fragment = person();
        fragment["additionalProperties"] = json!({"type": "number", "maximum": 5});
        let mut node = build(fragment);
        node.sync(json!({"name": "sk", "age": 20, "city": "chennai", "rank": 9, "ok": 1}));
        assert_eq!(
            node.errors(),
            [
                "additional property 'city' is not a number",
                "additional property 'rank' should NOT be greater than 5"
            ]
        );
    }

    #[test]
    fn test_every_child_validated() {
        let mut node = build(person());
        node.sync(json!({"name": "s", "age": 3}));
        let object = node.as_object().unwrap();
        assert_eq!(
            object.get_property("name").unwrap().errors(),
            ["should NOT be shorter than 2 characters"]
        );
        assert_eq!(
            object.get_property("age").unwrap().errors(),
            ["should NOT be lesser than 18"]
        );
        assert_eq!(
            node.field_errors(),
            FieldErrors::Object {
                errors: Vec::new(),
                properties: IndexMap::from([
                    (
                        "name".to_string(),
                        FieldErrors::Leaf(vec!["should NOT be shorter than 2 characters".to_string()])
                    ),
                    (
                        "age".to_string(),
                        FieldErrors::Leaf(vec!["should NOT be lesser than 18".to_string()])
                    ),
                ]),
            }
        );
    }

    #[test]
    fn test_child_edits_reconciled_before_validation() {
        let mut fragment = person();
        fragment["additionalProperties"] = json!(false);
        let mut node = build(fragment);
        node.set_value(json!({"name": "sk", "age": 20}));
        node.as_object_mut()
            .unwrap()
            .get_property_mut("age")
            .unwrap()
            .set_value(json!(40));
        node.validate();
        assert!(node.valid());
        assert_eq!(node.core().meta().value(), &json!({"name": "sk", "age": 40}));
    }

    #[test]
    fn test_child_edit_on_absent_key_counts_toward_bounds() {
        let mut node = build(json!({
            "type": "object",
            "minProperties": 1,
            "properties": {"name": {"type": "string"}}
        }));
        node.as_object_mut()
            .unwrap()
            .get_property_mut("name")
            .unwrap()
            .set_value(json!("sk"));
        node.validate();
        assert!(node.errors().is_empty(), "{:?}", node.errors());
        assert_eq!(node.core().meta().value(), &json!({"name": "sk"}));
        assert_eq!(node.data(), json!({"name": "sk"}));
    }

    #[test]
    fn test_nested_child_edit_satisfies_required_parent_key() {
        let fragment = json!({
            "type": "object",
            "required": ["address"],
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {"city": {"type": "string"}}
                }
            }
        });
        let mut edited = build(fragment.clone());
        edited
            .as_object_mut()
            .unwrap()
            .get_property_mut("address")
            .unwrap()
            .as_object_mut()
            .unwrap()
            .get_property_mut("city")
            .unwrap()
            .set_value(json!("chennai"));
        edited.validate();

        let mut synced = build(fragment);
        synced.sync(json!({"address": {"city": "chennai"}}));

        assert_eq!(edited.data(), json!({"address": {"city": "chennai"}}));
        assert!(edited.valid(), "{:?}", edited.field_errors());
        assert_eq!(edited.field_errors(), synced.field_errors());
        assert!(synced.valid());
    }

    #[test]
    fn test_reset_restores_children() {
        let mut node = build(person());
        node.sync(json!({"name": "x", "age": 1}));
        assert!(!node.valid());
        node.reset();
        assert_eq!(node.data(), node.initial_data());
        assert!(node.valid());
        assert!(!node.modified());
    }

    #[test]
    fn test_not_an_object() {
        let mut node = build(person());
        node.sync(json!([1, 2]));
        assert_eq!(node.errors(), ["Value is not an object"]);
    }
}
