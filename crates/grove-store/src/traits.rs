use grove_types::{Blob, Hash, Tree};

use crate::error::StoreResult;
use crate::object::StoredObject;

/// Durable object cache shared by every backing store that uses it.
///
/// Implementations must satisfy these invariants:
/// - Objects are immutable once written: `put` is idempotent and the first
///   write for a hash wins.
/// - Concurrent `get` calls are always safe.
/// - The store never interprets object contents on its own; it is a pure
///   key-value store keyed by [`Hash`].
/// - Every stored tree decodes back to exactly the entries written.
pub trait LocalStore: Send + Sync {
    /// Read an object by hash.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    fn get(&self, id: &Hash) -> StoreResult<Option<StoredObject>>;

    /// Store an object under `id`. A no-op if `id` is already present.
    fn put(&self, id: &Hash, object: &StoredObject) -> StoreResult<()>;

    /// Check whether an object exists in the store.
    fn contains(&self, id: &Hash) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Store a blob under its git object id and return that id.
    fn put_blob(&self, blob: &Blob) -> StoreResult<Hash> {
        let object = StoredObject::from_blob(blob);
        let id = object.compute_hash();
        self.put(&id, &object)?;
        Ok(id)
    }

    /// Store a tree under its git object id and return that id.
    ///
    /// Trees with entry names that cannot round-trip are rejected with
    /// `StoreError::InvalidTree` and nothing is written.
    fn put_tree(&self, tree: &Tree) -> StoreResult<Hash> {
        let object = StoredObject::from_tree(tree)?;
        let id = object.compute_hash();
        self.put(&id, &object)?;
        Ok(id)
    }

    /// Store a minimal commit whose root is `tree` and return its id.
    fn put_commit_for_tree(&self, tree: &Hash, message: &str) -> StoreResult<Hash> {
        let object = StoredObject::commit_for_tree(tree, message);
        let id = object.compute_hash();
        self.put(&id, &object)?;
        Ok(id)
    }
}
