use serde::{Deserialize, Serialize};

use crate::hash::Hash;
use crate::hasher::ContentHasher;

/// Raw file content. Bytes are kept verbatim; no encoding or newline
/// conversion is ever applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Git object id of this blob.
    pub fn compute_hash(&self) -> Hash {
        ContentHasher::BLOB.hash(&self.data)
    }
}
