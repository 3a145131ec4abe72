//! # Number Kind
//!
//! Inclusive `minimum`/`maximum` bounds and `multipleOf`. Multiples are
//! tested on decimally scaled integers (see
//! [`is_multiple_of`](formtree_core::json::is_multiple_of)) so `0.3` is a
//! multiple of `0.1`.

use serde::Deserialize;
use serde_json::Value;

use formtree_core::json::{display_number, is_multiple_of};
use formtree_core::{ConfigurationError, Kind};

use crate::config::{decode, ValueAttrs};
use crate::leaf::{Leaf, Rules};
use crate::node::Node;
use crate::registry::Registry;
use crate::value::ValueCore;

/// A number leaf.
pub type NumberNode = Leaf<NumberRules>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NumberConfig {
    #[serde(flatten)]
    attrs: ValueAttrs,
    minimum: Option<f64>,
    maximum: Option<f64>,
    multiple_of: Option<f64>,
}

/// Declarative constraints of a number node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberRules {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Always strictly positive.
    pub multiple_of: Option<f64>,
}

impl Rules for NumberRules {
    fn findings(&self, value: &Value) -> Vec<String> {
        let Some(n) = value.as_f64() else {
            return Vec::new();
        };
        let mut findings = Vec::new();
        if let Some(minimum) = self.minimum {
            if n < minimum {
                findings.push(format!("should NOT be lesser than {}", display_number(minimum)));
            }
        }
        if let Some(maximum) = self.maximum {
            if n > maximum {
                findings.push(format!("should NOT be greater than {}", display_number(maximum)));
            }
        }
        if let Some(divisor) = self.multiple_of {
            if !is_multiple_of(n, divisor) {
                findings.push(format!("should be multiple of {}", display_number(divisor)));
            }
        }
        findings
    }
}

pub(crate) fn build(_registry: &Registry, fragment: &Value) -> Result<Node, ConfigurationError> {
    let config: NumberConfig = decode(Kind::Number, fragment)?;
    match config.multiple_of {
        Some(m) if m == 0.0 => return Err(ConfigurationError::MultipleOfZero),
        Some(m) if m < 0.0 => return Err(ConfigurationError::MultipleOfNegative),
        _ => {}
    }
    let rules = NumberRules {
        minimum: config.minimum,
        maximum: config.maximum,
        multiple_of: config.multiple_of,
    };
    let core = ValueCore::from_attrs(Kind::Number, config.attrs)?;
    Ok(Node::Number(Leaf::new(core, rules)))
}
