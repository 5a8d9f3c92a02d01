//! Error types for the Sprout compiler.
//!
//! Nothing in the pipeline fails on well-typed input; these errors are
//! reserved for structurally invalid input and unusable configuration.

use thiserror::Error;

/// Result type alias for Sprout operations.
pub type Result<T> = std::result::Result<T, SproutError>;

/// Top-level error type for the Sprout compiler.
#[derive(Debug, Error)]
pub enum SproutError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Conventions(#[from] ConventionsError),

    #[error(transparent)]
    TokenValue(#[from] TokenValueError),
}

/// Errors caused by structurally invalid design input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Node '{name}' has no id")]
    MissingId { name: String },

    #[error("Duplicate node id: {id}")]
    DuplicateId { id: String },

    #[error("Root node '{id}' does not exist")]
    UnknownRoot { id: String },
}

/// Errors in caller-supplied conventions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConventionsError {
    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Errors parsing a single token value.
///
/// These never abort a run: the offending entry is skipped or passed
/// through unmatched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValueError {
    #[error("Malformed color value: {value}")]
    MalformedColor { value: String },

    #[error("Malformed number value: {value}")]
    MalformedNumber { value: String },

    #[error("Malformed shadow value: {value}")]
    MalformedShadow { value: String },

    #[error("Malformed font value: {value}")]
    MalformedFont { value: String },

    #[error("Cannot infer token category for '{path}'")]
    UnknownCategory { path: String },
}
