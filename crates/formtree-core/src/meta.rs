//! # Metadata Container
//!
//! Per-node mutable state: the live value, the initial baseline, the
//! declared default, the node's own findings and its presentation flags.
//!
//! No validation logic lives here. `Metadata` is pure state plus flag
//! mutation; the value engine decides what gets written into it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json::{display_value, values_equal};

/// A selectable choice offered for a node's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Human-readable label.
    pub label: String,
    /// Value chosen when this option is selected.
    pub value: Value,
}

impl SelectOption {
    /// An option labelled with the rendering of its own value.
    pub fn from_value(value: Value) -> Self {
        Self {
            label: display_value(&value),
            value,
        }
    }
}

/// Per-node state.
///
/// Invariants:
/// - `valid()` ⇔ `errors().is_empty()`
/// - `modified()` ⇔ `value() != initial()`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    value: Value,
    initial: Value,
    default: Value,
    errors: Vec<String>,
    name: String,
    mandatory: bool,
    disabled: bool,
    visible: bool,
    sequence: Option<f64>,
    component: Option<String>,
    help: Option<String>,
    options: Vec<SelectOption>,
    layout: Option<Value>,
}

impl Metadata {
    /// Fresh metadata whose value and initial baseline are `initial`.
    pub fn new(initial: Value, default: Value) -> Self {
        Self {
            value: initial.clone(),
            initial,
            default,
            errors: Vec::new(),
            name: String::new(),
            mandatory: false,
            disabled: false,
            visible: true,
            sequence: None,
            component: None,
            help: None,
            options: Vec::new(),
            layout: None,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn initial(&self) -> &Value {
        &self.initial
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn sequence(&self) -> Option<f64> {
        self.sequence
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn layout(&self) -> Option<&Value> {
        self.layout.as_ref()
    }

    /// Derived: no findings recorded.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Derived: the live value differs from the initial baseline.
    pub fn modified(&self) -> bool {
        !values_equal(&self.value, &self.initial)
    }

    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Mutable access to the live value, for in-place list edits.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn set_initial(&mut self, initial: Value) {
        self.initial = initial;
    }

    pub fn set_default(&mut self, default: Value) {
        self.default = default;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_mandatory(&mut self, mandatory: bool) {
        self.mandatory = mandatory;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_sequence(&mut self, sequence: Option<f64>) {
        self.sequence = sequence;
    }

    pub fn set_component(&mut self, component: Option<String>) {
        self.component = component;
    }

    pub fn set_help(&mut self, help: Option<String>) {
        self.help = help;
    }

    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
    }

    pub fn set_layout(&mut self, layout: Option<Value>) {
        self.layout = layout;
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn add_errors(&mut self, errors: impl IntoIterator<Item = String>) {
        self.errors.extend(errors);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }
}
