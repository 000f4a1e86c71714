//! Error types for the comparison engine.

use vdiff_types::{TypeError, ValueKind};

/// Errors that can occur while comparing values or parsing differences.
///
/// Mismatches between operands are never errors; they are reported as
/// [`Difference`](crate::Difference) entries.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// An operand (at any depth) has a kind the comparator cannot compare.
    #[error("comparator does not support {0} values")]
    UnsupportedType(ValueKind),

    /// A record operand is not a plain field bag.
    #[error("only plain records can be compared, {type_name} given")]
    UnsupportedRecord { type_name: String },

    /// An operand nests deeper than the configured bound.
    #[error("nesting depth limit of {limit} exceeded at {path}")]
    DepthLimitExceeded { limit: usize, path: String },

    /// Text handed to the difference parser is not a rendered difference.
    #[error("malformed difference rendering: {0}")]
    MalformedInput(String),

    /// Value model error.
    #[error("type error: {0}")]
    Type(#[from] TypeError),
}

/// Convenience alias for engine results.
pub type DiffResult<T> = Result<T, DiffError>;
