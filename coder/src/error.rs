//! Error types for coder operations

use thiserror::Error;

/// Error type for coder operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("cursor out of range: index {index} exceeds buffer of {len} bytes")]
    OutOfRange { index: usize, len: usize },
    #[error("length mismatch: expected {expected}, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("invalid bool: {0}")]
    InvalidBool(u8),
    #[error("embedded nul byte at offset {0}")]
    EmbeddedNul(usize),
    #[error("length exceeded: {0} > {1}")]
    LengthExceeded(usize, usize), // found, max
    #[error("invalid length: {0}")]
    InvalidLength(usize),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid data in {0}: {1}")]
    InvalidData(String, String), // context, message
}
