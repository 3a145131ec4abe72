//! # String Kind
//!
//! `minLength`/`maxLength` count characters, not bytes. `pattern` is an
//! unanchored search and accepts either a plain regex or the slash form
//! `/body/flags`. `format` resolves against the registry's
//! [`FormatTable`](crate::FormatTable) at build time.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use formtree_core::{Bound, ConfigurationError, Kind};

use crate::config::{decode, non_negative, ValueAttrs};
use crate::format::Matcher;
use crate::leaf::{Leaf, Rules};
use crate::node::Node;
use crate::registry::Registry;
use crate::value::ValueCore;

/// A string leaf.
pub type StringNode = Leaf<StringRules>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StringConfig {
    #[serde(flatten)]
    attrs: ValueAttrs,
    min_length: Option<f64>,
    max_length: Option<f64>,
    pattern: Option<String>,
    format: Option<String>,
}

/// A compiled `pattern`, kept with its source text for messages.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A resolved `format`.
#[derive(Clone)]
pub struct Format {
    name: String,
    matcher: Matcher,
}

impl Format {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Format").field(&self.name).finish()
    }
}

/// Declarative constraints of a string node.
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    pub format: Option<Format>,
}

impl Rules for StringRules {
    fn findings(&self, value: &Value) -> Vec<String> {
        let Some(s) = value.as_str() else {
            return Vec::new();
        };
        let mut findings = Vec::new();
        let length = s.chars().count();
        if let Some(min) = self.min_length {
            if length < min {
                findings.push(format!("should NOT be shorter than {min} characters"));
            }
        }
        if let Some(max) = self.max_length {
            if length > max {
                findings.push(format!("should NOT be longer than {max} characters"));
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.regex.is_match(s) {
                findings.push(format!("should match pattern {}", pattern.source));
            }
        }
        if let Some(format) = &self.format {
            if !(format.matcher)(s) {
                findings.push(format!("should match format {}", format.name));
            }
        }
        findings
    }
}

/// Compile a `pattern` keyword.
///
/// `/body/flags` is split into body and flags; `i`, `m` and `s` become
/// inline flags, `g`, `u` and `y` are accepted and ignored. Anything else is
/// compiled as written.
pub fn compile_pattern(source: &str) -> Result<Regex, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidPattern {
        pattern: source.to_string(),
    };
    let expression = match split_delimited(source) {
        Some((body, flags)) => {
            let inline: String = flags.chars().filter(|c| matches!(c, 'i' | 'm' | 's')).collect();
            if inline.is_empty() {
                body.to_string()
            } else {
                format!("(?{inline}){body}")
            }
        }
        None => source.to_string(),
    };
    Regex::new(&expression).map_err(|_| invalid())
}

fn split_delimited(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    flags
        .chars()
        .all(|c| matches!(c, 'i' | 'm' | 's' | 'u' | 'g' | 'y'))
        .then_some((body, flags))
}

pub(crate) fn build(registry: &Registry, fragment: &Value) -> Result<Node, ConfigurationError> {
    let config: StringConfig = decode(Kind::String, fragment)?;
    let min_length = non_negative(config.min_length, Bound::MinLength)?;
    let max_length = non_negative(config.max_length, Bound::MaxLength)?;
    let pattern = match config.pattern {
        Some(source) => Some(Pattern {
            regex: compile_pattern(&source)?,
            source,
        }),
        None => None,
    };
    let format = match config.format {
        Some(name) => {
            let matcher = registry
                .formats()
                .get(&name)
                .ok_or_else(|| ConfigurationError::UnknownFormat {
                    format: name.clone(),
                })?;
            Some(Format { name, matcher })
        }
        None => None,
    };
    let core = ValueCore::from_attrs(Kind::String, config.attrs)?;
    let rules = StringRules {
        min_length,
        max_length,
        pattern,
        format,
    };
    Ok(Node::String(Leaf::new(core, rules)))
}
