//! A [`BackingStore`] for test code, served straight from a LocalStore.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use grove_store::{LocalStore, ObjectKind, StoredObject};
use grove_types::{Blob, Hash, Tree};
use tracing::debug;

use crate::error::{BackingError, BackingResult};
use crate::traits::{BackingStore, StoreState};

/// Backing store with no storage of its own.
///
/// Every fetch is a direct lookup in the shared LocalStore under the same
/// hash: no id translation, no native decoding. Seed the LocalStore with
/// `put_tree` / `put_blob` / `put_commit_for_tree` to build fixtures.
pub struct TestBackingStore {
    local_store: Arc<dyn LocalStore>,
    closed: AtomicBool,
}

impl TestBackingStore {
    pub fn new(local_store: Arc<dyn LocalStore>) -> Self {
        Self {
            local_store,
            closed: AtomicBool::new(false),
        }
    }

    pub fn local_store(&self) -> &Arc<dyn LocalStore> {
        &self.local_store
    }

    fn lookup(&self, id: &Hash, kind: ObjectKind) -> BackingResult<StoredObject> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BackingError::Closed);
        }
        self.local_store
            .get(id)?
            .ok_or(BackingError::NotFound { kind, id: *id })
    }

    fn tree(&self, id: &Hash) -> BackingResult<Tree> {
        Ok(self.lookup(id, ObjectKind::Tree)?.to_tree(id)?)
    }
}

#[async_trait]
impl BackingStore for TestBackingStore {
    fn name(&self) -> &'static str {
        "test"
    }

    async fn get_tree(&self, id: &Hash) -> BackingResult<Tree> {
        debug!(id = %id, "test get_tree");
        self.tree(id)
    }

    async fn get_blob(&self, id: &Hash) -> BackingResult<Blob> {
        debug!(id = %id, "test get_blob");
        Ok(self.lookup(id, ObjectKind::Blob)?.to_blob(id)?)
    }

    async fn get_tree_for_commit(&self, commit_id: &Hash) -> BackingResult<Tree> {
        debug!(commit = %commit_id, "test get_tree_for_commit");
        let tree_id = self
            .lookup(commit_id, ObjectKind::Commit)?
            .commit_tree(commit_id)?;
        self.tree(&tree_id)
    }

    fn state(&self) -> StoreState {
        if self.closed.load(Ordering::Acquire) {
            StoreState::Closed
        } else {
            StoreState::Ready
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

impl std::fmt::Debug for TestBackingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestBackingStore")
            .field("state", &self.state())
            .finish()
    }
}
