//! Reading schema, metadata and data documents from disk.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Encoding of a document on disk, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` and `.yml` (any case) are YAML; anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Load a document as a JSON value.
///
/// # Errors
///
/// Fails when the file cannot be read or does not parse in the format its
/// extension names.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let format = DocumentFormat::from_path(path);
    tracing::debug!(path = %path.display(), ?format, "loading document");
    parse_document(&content, format).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse document text in the given format.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value> {
    let value = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(value)
}

/// Load an optional document, yielding `Value::Null` when no path is given.
pub fn load_optional(path: Option<&Path>) -> Result<Value> {
    path.map_or(Ok(Value::Null), load_document)
}
