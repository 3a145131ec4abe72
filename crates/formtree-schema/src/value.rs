//! # Value Engine
//!
//! Constraint logic shared by every node kind. A [`ValueCore`] wraps the
//! node's [`Metadata`] together with the declarative attributes every kind
//! understands (`title`, `const`, `enum`) and drives validation:
//!
//! 1. structural conformance of the value to the node's [`Kind`],
//! 2. the base checks (`mandatory`, `const`, `enum`),
//! 3. a kind-specific extension supplied by the caller.
//!
//! Declarative checks only run on values that passed the structural check.
//! Findings are collected into the node's error list; nothing here returns
//! an `Err` for data-level problems.
//!
//! ## Syncing Guard
//!
//! `sync` sets a `syncing` flag around its `set_value` step. While the flag
//! is set, validation of that node is suppressed, so a bulk assignment
//! validates exactly once, after the value is fully in place.

use std::sync::Arc;

use serde_json::Value;

use formtree_core::json::{display_value, join_values, values_equal};
use formtree_core::{ConfigurationError, Kind, Metadata, SelectOption};

use crate::check::AsyncCheck;
use crate::config::ValueAttrs;

/// Caller-owned notification fired with a node's new raw value.
pub type ChangeHook = Arc<dyn Fn(&Value) + Send + Sync>;

/// Shared base record of every node.
#[derive(Clone)]
pub struct ValueCore {
    kind: Kind,
    title: Option<String>,
    constant: Option<Value>,
    allowed: Option<Vec<Value>>,
    meta: Metadata,
    syncing: bool,
    validating: bool,
    hooks: Vec<ChangeHook>,
    async_checks: Vec<Arc<dyn AsyncCheck>>,
}

impl ValueCore {
    /// Build the base record from the attributes common to all kinds.
    ///
    /// The initial value is `meta.value`, else the declared default
    /// (`meta.default` or top-level `default`), else the kind's empty value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ErrorsConfigured` when the fragment
    /// declares a non-empty `errors` list.
    pub(crate) fn from_attrs(kind: Kind, attrs: ValueAttrs) -> Result<Self, ConfigurationError> {
        if attrs.errors.as_ref().is_some_and(|errors| !errors.is_empty()) {
            return Err(ConfigurationError::ErrorsConfigured {
                field: attrs.title.unwrap_or_default(),
            });
        }

        let meta_config = attrs.meta.unwrap_or_default();
        let default = meta_config
            .default
            .or(attrs.default)
            .unwrap_or_else(|| kind.empty_value());
        let initial = meta_config.value.unwrap_or_else(|| default.clone());

        let mut meta = Metadata::new(initial, default);
        meta.set_mandatory(meta_config.mandatory.unwrap_or(false));
        meta.set_disabled(meta_config.disabled.unwrap_or(false));
        meta.set_visible(meta_config.visible.unwrap_or(true));
        meta.set_sequence(meta_config.sequence);
        meta.set_component(
            meta_config
                .component
                .or_else(|| Some(kind.default_component().to_string())),
        );
        meta.set_help(meta_config.help);
        meta.set_layout(meta_config.layout);

        match (meta_config.name, attrs.title.as_deref()) {
            (Some(name), _) if !name.is_empty() => meta.set_name(name),
            (_, Some(title)) => meta.set_name(title.to_lowercase().replacen(' ', "-", 1)),
            _ => {}
        }

        let options = meta_config.options.unwrap_or_default();
        match &attrs.allowed {
            Some(allowed) if options.is_empty() && !allowed.is_empty() => {
                meta.set_options(allowed.iter().cloned().map(SelectOption::from_value).collect());
            }
            _ => meta.set_options(options),
        }

        Ok(Self {
            kind,
            title: attrs.title,
            constant: attrs.constant,
            allowed: attrs.allowed,
            meta,
            syncing: false,
            validating: false,
            hooks: Vec::new(),
            async_checks: Vec::new(),
        })
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// The configured `const`, if any.
    pub fn constant(&self) -> Option<&Value> {
        self.constant.as_ref()
    }

    /// The configured `enum`, if any.
    pub fn allowed(&self) -> Option<&[Value]> {
        self.allowed.as_deref()
    }

    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    pub fn syncing(&self) -> bool {
        self.syncing
    }

    pub fn validating(&self) -> bool {
        self.validating
    }

    pub(crate) fn set_validating(&mut self, validating: bool) {
        self.validating = validating;
    }

    /// Unconditional state update. Fires change hooks; never validates.
    pub fn set_value(&mut self, value: Value) {
        self.meta.set_value(value);
        self.notify();
    }

    /// Fire every change hook with the current raw value.
    pub(crate) fn notify(&self) {
        let value = self.meta.value();
        for hook in &self.hooks {
            hook(value);
        }
    }

    /// Replace both the initial baseline and the live value. Silent.
    pub(crate) fn seed(&mut self, value: Value) {
        self.meta.set_initial(value.clone());
        self.meta.set_value(value);
    }

    pub(crate) fn add_hook(&mut self, hook: ChangeHook) {
        self.hooks.push(hook);
    }

    pub(crate) fn add_async_check(&mut self, check: Arc<dyn AsyncCheck>) {
        self.async_checks.push(check);
    }

    pub(crate) fn async_checks(&self) -> &[Arc<dyn AsyncCheck>] {
        &self.async_checks
    }

    /// Enter the syncing window. Returns `false` if already inside one.
    pub(crate) fn begin_sync(&mut self) -> bool {
        if self.syncing {
            return false;
        }
        self.syncing = true;
        true
    }

    pub(crate) fn end_sync(&mut self) {
        self.syncing = false;
    }

    /// `value := initial`, errors cleared.
    pub fn reset(&mut self) {
        let initial = self.meta.initial().clone();
        self.meta.set_value(initial);
        self.meta.clear_errors();
    }

    /// `mandatory`, `const` and `enum` findings for `value`.
    pub fn base_findings(&self, value: &Value) -> Vec<String> {
        let mut findings = Vec::new();
        if self.meta.mandatory()
            && (value.is_null() || values_equal(value, &self.kind.empty_value()))
        {
            findings.push("Field is required".to_string());
        }
        if let Some(constant) = &self.constant {
            if !values_equal(value, constant) {
                findings.push(format!("should be equal to {}", display_value(constant)));
            }
        }
        if let Some(allowed) = &self.allowed {
            if !allowed.is_empty() && !allowed.iter().any(|a| values_equal(a, value)) {
                findings.push(format!(
                    "should be equal to one of the allowed values [{}]",
                    join_values(allowed)
                ));
            }
        }
        findings
    }

    /// All findings for `value` without touching the node's state.
    pub fn try_validate(
        &self,
        value: &Value,
        extension: impl FnOnce(&Value) -> Vec<String>,
    ) -> Vec<String> {
        if let Some(mismatch) = self.kind.mismatch(value) {
            return vec![mismatch];
        }
        let mut findings = self.base_findings(value);
        findings.extend(extension(value));
        findings
    }

    /// Clear the node's own errors and record the findings for its value.
    ///
    /// No-op while the syncing guard is set; returns whether it ran.
    pub(crate) fn run_validation(
        &mut self,
        extension: impl FnOnce(&Value) -> Vec<String>,
    ) -> bool {
        if self.syncing {
            return false;
        }
        self.meta.clear_errors();
        self.validating = true;
        let findings = self.try_validate(self.meta.value(), extension);
        self.meta.add_errors(findings);
        self.validating = false;
        true
    }
}

impl std::fmt::Debug for ValueCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCore")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("const", &self.constant)
            .field("enum", &self.allowed)
            .field("meta", &self.meta)
            .field("syncing", &self.syncing)
            .field("hooks", &self.hooks.len())
            .field("async_checks", &self.async_checks.len())
            .finish()
    }
}
