//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout formtree. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Configuration errors are raised while a node tree is being built and
//!   abort construction. They are never stored in a node's error list.
//! - Validation findings are not errors: they are plain messages collected
//!   on the node that produced them.
//! - Mutation errors reject structural operations a node cannot perform
//!   (resizing a fixed-length array, removing a missing element).
//! - Overlay errors include the JSON pointer of the disagreeing fragment.

use thiserror::Error;

/// Top-level error type for formtree.
#[derive(Error, Debug)]
pub enum FormtreeError {
    /// A schema fragment contradicts itself.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A structural mutation was rejected.
    #[error("mutation error: {0}")]
    Mutation(#[from] MutationError),

    /// A metadata overlay does not match its schema.
    #[error("overlay error: {0}")]
    Overlay(#[from] OverlayError),
}

/// A bound keyword that must not be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    MinLength,
    MaxLength,
    MinItems,
    MaxItems,
    MinProperties,
    MaxProperties,
}

impl Bound {
    /// The schema keyword this bound is declared under.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::MinItems => "minItems",
            Self::MaxItems => "maxItems",
            Self::MinProperties => "minProperties",
            Self::MaxProperties => "maxProperties",
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Raised synchronously during node construction for self-contradictory
/// schema declarations. Fatal: the tree is not built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A length, item, or property count bound is negative.
    #[error("{0} can not be negative")]
    NegativeBound(Bound),

    /// A length, item, or property count bound is not a whole number.
    #[error("{0} must be an integer")]
    FractionalBound(Bound),

    /// `multipleOf` is zero.
    #[error("multipleOf can not be zero")]
    MultipleOfZero,

    /// `multipleOf` is negative.
    #[error("multipleOf can not be negative")]
    MultipleOfNegative,

    /// `required` lists the same property twice.
    #[error("required should not have duplicate properties")]
    DuplicateRequired,

    /// `pattern` does not compile.
    #[error("pattern '{pattern}' is invalid.")]
    InvalidPattern {
        /// The pattern as configured.
        pattern: String,
    },

    /// A boolean `enum` is not exactly `[true, false]` in some order.
    #[error("boolean enum should be exactly [true, false]")]
    MalformedBooleanEnum,

    /// `format` names a matcher that is not registered.
    #[error("unknown format '{format}'")]
    UnknownFormat {
        /// The configured format name.
        format: String,
    },

    /// `type` names a kind that is not registered.
    #[error("unknown type '{kind}'")]
    UnknownKind {
        /// The configured type tag.
        kind: String,
    },

    /// An array fragment has no `items`.
    #[error("array items must be configured")]
    MissingItems,

    /// The fragment declares an `errors` list.
    #[error("errors property can not be configured for field {field}")]
    ErrorsConfigured {
        /// Title of the offending fragment (empty when untitled).
        field: String,
    },

    /// The fragment could not be decoded into the kind's configuration.
    #[error("malformed {kind} schema: {reason}")]
    Malformed {
        /// Type tag of the fragment.
        kind: String,
        /// Decoder message.
        reason: String,
    },
}

/// A structural mutation that the target node cannot perform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// `push`/`remove` on an array whose items are a fixed tuple.
    #[error("fixed arrays can not be resized")]
    FixedArray,

    /// `remove`/`set_element_value` outside the element range.
    #[error("index {index} is out of range for {len} elements")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current element count.
        len: usize,
    },
}

/// A metadata overlay disagrees with the schema it decorates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// The overlay's `type` tag differs from the schema fragment's.
    #[error("types not matching for type : {title} (at '{path}')")]
    KindMismatch {
        /// Title of the schema fragment (empty when untitled).
        title: String,
        /// JSON pointer of the fragment within the schema.
        path: String,
    },
}
