use sha1::{Digest, Sha1};

use crate::hash::{Hash, HASH_LEN};

/// Git-compatible object hasher.
///
/// Each hasher carries the git object type name (`"blob"`, `"tree"`,
/// `"commit"`). The digest is SHA-1 over `"<type> <len>\0"` followed by the
/// payload, which is exactly how git names loose objects. A blob and a tree
/// with identical bytes therefore hash differently.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for blob objects.
    pub const BLOB: Self = Self { domain: "blob" };
    /// Hasher for tree objects.
    pub const TREE: Self = Self { domain: "tree" };
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self { domain: "commit" };

    /// Hash a payload with this hasher's object header.
    pub fn hash(&self, data: &[u8]) -> Hash {
        let mut hasher = Sha1::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b" ");
        hasher.update(data.len().to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(data);
        let digest = hasher.finalize();
        let mut out = [0u8; HASH_LEN];
        out.copy_from_slice(&digest);
        Hash::from_hash(out)
    }

    /// The git object type name used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
