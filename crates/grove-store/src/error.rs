use grove_types::{Hash, TypeError};

use crate::object::ObjectKind;

/// Errors from LocalStore operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The object exists but holds a different kind than requested.
    #[error("object {id} is a {actual}, expected a {expected}")]
    KindMismatch {
        id: Hash,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    /// The object data is malformed or cannot be decoded.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: Hash, reason: String },

    /// A tree was rejected before storing because it cannot round-trip.
    #[error("invalid tree: {0}")]
    InvalidTree(#[from] TypeError),

    /// Attempted to write under the null hash.
    #[error("cannot store object under the null hash")]
    NullHash,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
