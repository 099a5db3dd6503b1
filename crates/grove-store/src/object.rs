use grove_types::{Blob, ContentHasher, Hash, Tree};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Raw content (file contents).
    Blob,
    /// Directory listing in git's canonical tree encoding.
    Tree,
    /// Commit body in git's text format.
    Commit,
}

impl ObjectKind {
    /// The hasher that names objects of this kind.
    pub fn hasher(&self) -> &'static ContentHasher {
        match self {
            Self::Blob => &ContentHasher::BLOB,
            Self::Tree => &ContentHasher::TREE,
            Self::Commit => &ContentHasher::COMMIT,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hasher().domain())
    }
}

/// A stored object: kind tag + encoded data.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// data; decoding happens in the typed accessors below.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The encoded bytes of the object.
    pub data: Vec<u8>,
}

impl StoredObject {
    /// Create a new stored object from kind and data.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    pub fn from_blob(blob: &Blob) -> Self {
        Self::new(ObjectKind::Blob, blob.data.clone())
    }

    /// Encode a tree for storage.
    ///
    /// Fails if any entry name would not survive a decode, so every stored
    /// tree reads back exactly as written.
    pub fn from_tree(tree: &Tree) -> StoreResult<Self> {
        tree.validate()?;
        Ok(Self::new(ObjectKind::Tree, tree.encode_git()))
    }

    /// A minimal commit pointing at `tree`, as git would write it.
    pub fn commit_for_tree(tree: &Hash, message: &str) -> Self {
        let body = format!(
            "tree {tree}\n\
             author grove <grove@localhost> 0 +0000\n\
             committer grove <grove@localhost> 0 +0000\n\
             \n\
             {message}\n"
        );
        Self::new(ObjectKind::Commit, body.into_bytes())
    }

    /// Compute the git object id of this object.
    pub fn compute_hash(&self) -> Hash {
        self.kind.hasher().hash(&self.data)
    }

    /// Decode as a blob.
    pub fn to_blob(&self, id: &Hash) -> StoreResult<Blob> {
        self.expect_kind(id, ObjectKind::Blob)?;
        Ok(Blob::new(self.data.clone()))
    }

    /// Decode as a tree. Never returns a partially decoded tree.
    pub fn to_tree(&self, id: &Hash) -> StoreResult<Tree> {
        self.expect_kind(id, ObjectKind::Tree)?;
        Tree::decode_git(&self.data).map_err(|e| StoreError::CorruptObject {
            id: *id,
            reason: e.to_string(),
        })
    }

    /// Extract the root tree id from a commit body.
    ///
    /// The `tree` header must be the first line, as git requires.
    pub fn commit_tree(&self, id: &Hash) -> StoreResult<Hash> {
        self.expect_kind(id, ObjectKind::Commit)?;
        let corrupt = |reason: String| StoreError::CorruptObject { id: *id, reason };
        let first_line = self
            .data
            .split(|&b| b == b'\n')
            .next()
            .unwrap_or_default();
        let hex = first_line
            .strip_prefix(b"tree ")
            .ok_or_else(|| corrupt("commit has no tree header".into()))?;
        let hex = std::str::from_utf8(hex).map_err(|_| corrupt("tree id is not ASCII".into()))?;
        Hash::from_hex(hex).map_err(|e| corrupt(format!("bad tree id: {e}")))
    }

    fn expect_kind(&self, id: &Hash, expected: ObjectKind) -> StoreResult<()> {
        if self.kind != expected {
            return Err(StoreError::KindMismatch {
                id: *id,
                expected,
                actual: self.kind,
            });
        }
        Ok(())
    }
}
