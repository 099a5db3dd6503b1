use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid path component {name:?}: {reason}")]
    InvalidPathComponent { name: String, reason: &'static str },

    #[error("unknown entry mode {0:o}")]
    UnknownMode(u32),

    /// Canonical tree bytes could not be decoded.
    #[error("malformed tree at byte {offset}: {reason}")]
    MalformedTree { offset: usize, reason: String },
}
