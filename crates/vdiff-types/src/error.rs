use thiserror::Error;

/// Errors produced by value model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The serialized form of a value was not a field bag.
    #[error("value does not serialize as a record: {0}")]
    NotARecord(String),
}
