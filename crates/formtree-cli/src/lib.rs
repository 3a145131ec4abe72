//! # formtree-cli — CLI Tool for formtree
//!
//! Provides the `formtree` command-line interface over the node tree in
//! `formtree-schema`.
//!
//! ## Subcommands
//!
//! - `formtree validate`: Build a tree from a schema, feed it a data
//!   document and print the aggregated findings.
//! - `formtree merge`: Fold metadata and value overlays into a schema and
//!   print the result.
//!
//! Documents ending in `.yaml` or `.yml` are read as YAML, everything else
//! as JSON:
//!
//! ```bash
//! formtree validate --schema person.json --data alice.yaml
//! formtree validate --schema person.json --metadata ui.json --format text
//! formtree merge --schema person.json --values defaults.json
//! ```
//!
//! Handlers return `anyhow::Result<u8>`; the `u8` becomes the process exit
//! code.

pub mod document;
pub mod merge;
pub mod validate;
