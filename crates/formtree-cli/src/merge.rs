//! # Merge Subcommand
//!
//! Folds a metadata overlay and a value overlay into a schema and prints
//! the merged schema as pretty JSON. The merged schema is built once before
//! printing so that a contradictory result is reported instead of emitted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use formtree_schema::{merge_metadata, merge_values, Registry};
use serde_json::Value;

use crate::document::{load_document, load_optional};

/// Arguments for the `formtree merge` subcommand.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Schema document (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Metadata overlay folded into each fragment's `meta` block.
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Value tree written into the fragments' initial values.
    #[arg(long)]
    pub values: Option<PathBuf>,
}

/// Execute the merge subcommand.
pub fn run_merge(args: &MergeArgs) -> Result<u8> {
    let merged = merged_schema(args)?;
    let rendered = serde_json::to_string_pretty(&merged).context("failed to serialize schema")?;
    println!("{rendered}");
    Ok(0)
}

/// Load and merge the documents named by `args`.
pub fn merged_schema(args: &MergeArgs) -> Result<Value> {
    let schema = load_document(&args.schema)?;
    let metadata = load_optional(args.metadata.as_deref())?;
    let mut merged =
        merge_metadata(&schema, &metadata).context("failed to merge metadata overlay")?;
    if let Some(path) = &args.values {
        merged = merge_values(&merged, &load_document(path)?);
    }
    Registry::new()
        .build(&merged)
        .context("merged schema does not build")?;
    tracing::info!(schema = %args.schema.display(), "schema merged");
    Ok(merged)
}
