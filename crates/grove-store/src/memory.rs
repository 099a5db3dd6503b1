use std::collections::HashMap;
use std::sync::RwLock;

use grove_types::Hash;
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::LocalStore;

/// In-memory, HashMap-based LocalStore.
///
/// Intended for tests and fixtures. All objects are held in memory behind a
/// `RwLock`, so concurrent reads proceed in parallel. Objects are cloned on
/// read/write.
pub struct InMemoryLocalStore {
    objects: RwLock<HashMap<Hash, StoredObject>>,
}

impl InMemoryLocalStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryLocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStore for InMemoryLocalStore {
    fn get(&self, id: &Hash) -> StoreResult<Option<StoredObject>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn put(&self, id: &Hash, object: &StoredObject) -> StoreResult<()> {
        if id.is_null() {
            return Err(StoreError::NullHash);
        }
        let mut map = self.objects.write().expect("lock poisoned");
        // First write wins; a hash always names the same content.
        map.entry(*id).or_insert_with(|| {
            trace!(id = %id, kind = %object.kind, size = object.data.len(), "stored object");
            object.clone()
        });
        Ok(())
    }

    fn contains(&self, id: &Hash) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryLocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryLocalStore")
            .field("object_count", &count)
            .finish()
    }
}
