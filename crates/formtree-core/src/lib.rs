//! # formtree-core — Foundational Types for formtree
//!
//! This crate is the leaf of the formtree crate graph. It defines the
//! primitives every node in a schema tree is built from. Every other crate
//! in the workspace depends on `formtree-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Single `Kind` enum.** One definition of the six node kinds, with
//!    exhaustive `match` everywhere. The `type` tag of a schema fragment
//!    parses into it and nothing else.
//!
//! 2. **Two error classes.** `ConfigurationError` aborts tree construction;
//!    validation findings are plain strings collected on nodes and never
//!    surface as `Err`.
//!
//! 3. **`Metadata` is state only.** The container holds the live value,
//!    initial baseline, default, findings and presentation flags. Which
//!    findings are recorded is decided by the value engine in
//!    `formtree-schema`.
//!
//! 4. **Numbers compare by value.** [`json::values_equal`] is the one
//!    equality used for `const`, `enum`, uniqueness and modification checks.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `formtree-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod json;
pub mod kind;
pub mod meta;

// Re-export primary types for ergonomic imports.
pub use error::{Bound, ConfigurationError, FormtreeError, MutationError, OverlayError};
pub use kind::{Kind, KIND_COUNT};
pub use meta::{Metadata, SelectOption};
