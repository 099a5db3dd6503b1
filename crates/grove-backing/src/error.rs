use std::path::PathBuf;

use grove_store::{ObjectKind, StoreError};
use grove_types::Hash;
use thiserror::Error;

/// Errors from backing store operations.
#[derive(Debug, Error)]
pub enum BackingError {
    /// The id is not an object of the requested kind in this backend.
    #[error("{kind} {id} not found")]
    NotFound { kind: ObjectKind, id: Hash },

    /// The backend could not be initialized.
    #[error("cannot open backing store at {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    /// Bytes exist but do not decode as the expected kind.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: Hash, reason: String },

    /// I/O failure in the underlying store.
    #[error("backend error: {0}")]
    Backend(String),

    /// A fetch was issued after the store was closed.
    #[error("backing store is closed")]
    Closed,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`BackingError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    Open,
    CorruptObject,
    Backend,
}

impl BackingError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Open { .. } | Self::Config(_) => ErrorClass::Open,
            Self::CorruptObject { .. } => ErrorClass::CorruptObject,
            Self::Backend(_) | Self::Closed => ErrorClass::Backend,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::NotFound
    }
}

impl From<StoreError> for BackingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::KindMismatch { id, expected, .. } => Self::NotFound { kind: expected, id },
            StoreError::CorruptObject { id, reason } => Self::CorruptObject { id, reason },
            other => Self::Backend(other.to_string()),
        }
    }
}

/// Result alias for backing store operations.
pub type BackingResult<T> = Result<T, BackingError>;
