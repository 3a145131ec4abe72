//! # Validate Subcommand
//!
//! Builds a node tree from a schema (optionally decorated with a metadata
//! overlay), feeds it a data document and reports the aggregated findings.
//! Without `--data` the tree is validated against its initial values.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use formtree_schema::{FieldErrors, Registry};

use crate::document::{load_document, load_optional};

/// Arguments for the `formtree validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Metadata overlay merged into the schema before building.
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Data document to validate. Defaults to the schema's initial values.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// How findings are printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The aggregated error tree as pretty JSON.
    Json,
    /// One `pointer: finding` line per finding.
    Text,
}

/// Execute the validate subcommand.
///
/// Returns exit code 0 when the document is valid, 1 when it has findings.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let errors = collect_findings(args)?;
    println!("{}", render(&errors, args.format)?);
    Ok(if errors.is_clean() { 0 } else { 1 })
}

/// Build the tree described by `args`, validate it and return its findings.
pub fn collect_findings(args: &ValidateArgs) -> Result<FieldErrors> {
    let schema = load_document(&args.schema)?;
    let metadata = load_optional(args.metadata.as_deref())?;

    let mut tree = Registry::new()
        .build_with_metadata(&schema, &metadata)
        .with_context(|| format!("invalid schema {}", args.schema.display()))?;

    match &args.data {
        Some(path) => tree.sync(load_document(path)?),
        None => tree.validate(),
    }
    let errors = tree.field_errors();
    tracing::info!(
        schema = %args.schema.display(),
        findings = errors.flatten().len(),
        "validation finished"
    );
    Ok(errors)
}

/// Render findings in the requested format.
pub fn render(errors: &FieldErrors, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(errors).context("failed to serialize findings")
        }
        OutputFormat::Text => {
            let findings = errors.flatten();
            if findings.is_empty() {
                return Ok("OK: no findings".to_string());
            }
            let mut lines: Vec<String> = findings
                .iter()
                .map(|(pointer, message)| {
                    let pointer = if pointer.is_empty() { "/" } else { pointer };
                    format!("{pointer}: {message}")
                })
                .collect();
            lines.push(format!("{} finding(s).", findings.len()));
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn person_schema(dir: &Path) -> PathBuf {
        write(
            dir,
            "person.yaml",
            "type: object\n\
             required: [name]\n\
             properties:\n  \
               name:\n    type: string\n    minLength: 2\n  \
               age:\n    type: number\n    minimum: 18\n",
        )
    }

    fn args(schema: PathBuf, data: Option<PathBuf>, format: OutputFormat) -> ValidateArgs {
        ValidateArgs {
            schema,
            metadata: None,
            data,
            format,
        }
    }

    #[test]
    fn test_valid_data_has_no_findings() {
        let dir = tempfile::tempdir().unwrap();
        let schema = person_schema(dir.path());
        let data = write(dir.path(), "alice.json", r#"{"name": "alice", "age": 30}"#);
        let args = args(schema, Some(data), OutputFormat::Text);
        let errors = collect_findings(&args).unwrap();
        assert!(errors.is_clean());
        assert_eq!(render(&errors, OutputFormat::Text).unwrap(), "OK: no findings");
        assert_eq!(run_validate(&args).unwrap(), 0);
    }

    #[test]
    fn test_invalid_data_reports_findings() {
        let dir = tempfile::tempdir().unwrap();
        let schema = person_schema(dir.path());
        let data = write(dir.path(), "bob.yml", "name: b\nage: 12\n");
        let args = args(schema, Some(data), OutputFormat::Text);
        let errors = collect_findings(&args).unwrap();
        assert_eq!(
            render(&errors, OutputFormat::Text).unwrap(),
            "/name: should NOT be shorter than 2 characters\n\
             /age: should NOT be lesser than 18\n\
             2 finding(s)."
        );
        assert_eq!(run_validate(&args).unwrap(), 1);
    }

    #[test]
    fn test_json_report_mirrors_tree() {
        let dir = tempfile::tempdir().unwrap();
        let schema = person_schema(dir.path());
        let data = write(dir.path(), "carol.json", r#"{"name": "carol", "age": "x"}"#);
        let errors = collect_findings(&args(schema, Some(data), OutputFormat::Json)).unwrap();
        let rendered: serde_json::Value =
            serde_json::from_str(&render(&errors, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(
            rendered,
            json!({
                "errors": [],
                "properties": {"name": [], "age": ["Value is not a number"]}
            })
        );
    }

    #[test]
    fn test_without_data_validates_initial_values() {
        let dir = tempfile::tempdir().unwrap();
        let schema = person_schema(dir.path());
        let errors = collect_findings(&args(schema, None, OutputFormat::Json)).unwrap();
        assert_eq!(
            errors.property("name").unwrap().errors(),
            ["Field is required", "should NOT be shorter than 2 characters"]
        );
    }

    #[test]
    fn test_metadata_type_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let schema = person_schema(dir.path());
        let metadata = write(
            dir.path(),
            "ui.json",
            r#"{"properties": {"age": {"type": "string"}}}"#,
        );
        let args = ValidateArgs {
            schema,
            metadata: Some(metadata),
            data: None,
            format: OutputFormat::Json,
        };
        let err = collect_findings(&args).unwrap_err();
        assert!(format!("{err:#}").contains("types not matching for type"));
    }

    #[test]
    fn test_contradictory_schema_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "bad.json", r#"{"type": "number", "multipleOf": 0}"#);
        let err = collect_findings(&args(schema, None, OutputFormat::Json)).unwrap_err();
        assert!(format!("{err:#}").contains("multipleOf can not be zero"));
    }
}
