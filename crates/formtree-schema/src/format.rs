//! # String Formats
//!
//! The table of named matchers a string node's `format` keyword resolves
//! against. The table is owned by the [`Registry`](crate::Registry) and is
//! consulted once, when the node is built; unknown names are configuration
//! errors.
//!
//! Callers can extend the table with [`FormatTable::register`] before
//! building a tree.

use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use url::Url;
use uuid::Uuid;

/// A named string matcher.
pub type Matcher = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Named string matchers.
#[derive(Clone)]
pub struct FormatTable {
    matchers: HashMap<String, Matcher>,
}

impl FormatTable {
    /// A table with no matchers.
    pub fn empty() -> Self {
        Self {
            matchers: HashMap::new(),
        }
    }

    /// A table with every built-in matcher.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register("date", |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok());
        table.register("date-time", |s| DateTime::parse_from_rfc3339(s).is_ok());
        table.register("time", |s| {
            NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok()
                || NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok()
        });
        table.register("email", is_email);
        table.register("hostname", is_hostname);
        table.register("host-name", is_hostname);
        table.register("ipv4", |s| s.parse::<Ipv4Addr>().is_ok());
        table.register("ip-address", |s| s.parse::<Ipv4Addr>().is_ok());
        table.register("ipv6", |s| s.parse::<Ipv6Addr>().is_ok());
        table.register("uri", |s| Url::parse(s).is_ok());
        table.register("url", is_url);
        table.register("uuid", |s| Uuid::parse_str(s).is_ok());
        table.register("regex", |s| Regex::new(s).is_ok());
        table.register("json-pointer", is_json_pointer);
        table.register("alpha", |s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()));
        table.register("alphanumeric", |s| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
        });
        table.register("identifier", is_identifier);
        table.register("hexadecimal", |s| !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit()));
        table.register("numeric", |s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()));
        table.register("color", is_color);
        table.register("uppercase", |s| s == s.to_uppercase());
        table.register("lowercase", |s| s == s.to_lowercase());
        table.register("phone", is_phone);
        table
    }

    /// Add or replace the matcher for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, matcher: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.matchers.insert(name.into(), Arc::new(matcher));
    }

    /// The matcher registered for `name`.
    pub fn get(&self, name: &str) -> Option<Matcher> {
        self.matchers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.matchers.contains_key(name)
    }

    /// Registered names, sorted alphabetically.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.matchers.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormatTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatTable")
            .field("formats", &self.names())
            .finish()
    }
}

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str, s: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

fn is_email(s: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&EMAIL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$", s)
}

fn is_phone(s: &str) -> bool {
    static PHONE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&PHONE, r"^\+?[0-9][0-9 ()\-]{5,18}[0-9]$", s)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    !s.is_empty()
        && s.len() <= 253
        && s.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

fn is_url(s: &str) -> bool {
    Url::parse(s).is_ok_and(|u| matches!(u.scheme(), "http" | "https" | "ftp") && u.has_host())
}

fn is_json_pointer(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if !s.starts_with('/') {
        return false;
    }
    let bytes = s.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'~')
        .all(|(i, _)| matches!(bytes.get(i + 1), Some(b'0') | Some(b'1')))
}

fn is_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
