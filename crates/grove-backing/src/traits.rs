//! The [`BackingStore`] trait defining the fetch interface.
//!
//! Any source of version-controlled objects (a git repository, a LocalStore
//! fixture, a future remote) implements this trait. Callers hold backends as
//! `Arc<dyn BackingStore>` and never inspect the concrete type.

use async_trait::async_trait;
use grove_types::{Blob, Hash, Tree};

use crate::error::BackingResult;

/// Lifecycle state of a backing store instance.
///
/// Construction either yields a `Ready` store or fails; there is no
/// observable half-open state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreState {
    Ready,
    Closed,
}

/// Asynchronous, read-only access to immutable trees and blobs.
///
/// Every fetch returns a future; backend I/O never blocks the polling thread.
/// The same id always yields identical contents for the lifetime of the
/// store. Failures are reported once and never retried internally; dropping
/// a future discards its result.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Short backend name for logs (e.g. `"git"`).
    fn name(&self) -> &'static str;

    /// Fetch the tree named by `id`.
    ///
    /// Fails `NotFound` if `id` is not a tree in this backend,
    /// `CorruptObject` if it cannot be decoded as one.
    async fn get_tree(&self, id: &Hash) -> BackingResult<Tree>;

    /// Fetch the blob named by `id`, bytes verbatim.
    async fn get_blob(&self, id: &Hash) -> BackingResult<Blob>;

    /// Resolve a commit to its root tree and fetch that tree.
    ///
    /// Fails `NotFound` if the commit is absent and `CorruptObject` if it has
    /// no parseable tree reference; otherwise behaves as [`get_tree`] on the
    /// root tree id.
    ///
    /// [`get_tree`]: BackingStore::get_tree
    async fn get_tree_for_commit(&self, commit_id: &Hash) -> BackingResult<Tree>;

    fn state(&self) -> StoreState;

    /// Release backend resources. Idempotent.
    ///
    /// Fetches issued afterwards fail with `BackingError::Closed`.
    fn close(&self);
}
