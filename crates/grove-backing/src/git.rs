//! Backing store that reads objects out of a git repository.
//!
//! The repository handle is a `git2::Repository`, which must not be used
//! from several threads at once. It lives behind a `std::sync::Mutex` and
//! every native call runs inside `spawn_blocking` while holding that mutex:
//! concurrent fetches are serialized on the handle but never block the async
//! executor.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use git2::{ErrorClass, ErrorCode, Oid, Repository};
use grove_store::{LocalStore, ObjectKind};
use grove_types::{validate_path_component, Blob, EntryMode, Hash, Tree, TreeEntry, HASH_LEN};
use tracing::{debug, info, warn};

use crate::error::{BackingError, BackingResult};
use crate::traits::{BackingStore, StoreState};

/// A [`BackingStore`] that loads data out of a git repository.
pub struct GitBackingStore {
    /// The `.git` directory of the opened repository.
    path: PathBuf,
    /// `None` once the store is closed.
    repo: Arc<Mutex<Option<Repository>>>,
    closed: AtomicBool,
    /// Retained for the composition layer; reads never consult it.
    local_store: Arc<dyn LocalStore>,
}

impl GitBackingStore {
    /// Open the repository at `repository`.
    ///
    /// `repository` may be a working tree or a `.git` directory. Fails with
    /// `BackingError::Open` if it does not contain a valid repository.
    pub fn open(
        repository: impl AsRef<Path>,
        local_store: Arc<dyn LocalStore>,
    ) -> BackingResult<Self> {
        let requested = repository.as_ref();
        let open_error = |reason: String| BackingError::Open {
            path: requested.to_path_buf(),
            reason,
        };

        let oid_len = Oid::zero().as_bytes().len();
        if oid_len != HASH_LEN {
            return Err(open_error(format!(
                "git object ids are {oid_len} bytes, hashes are {HASH_LEN}"
            )));
        }

        let repo = Repository::open(requested).map_err(|e| open_error(e.message().to_string()))?;
        let path = repo.path().to_path_buf();
        info!(path = %path.display(), "opened git backing store");

        Ok(Self {
            path,
            repo: Arc::new(Mutex::new(Some(repo))),
            closed: AtomicBool::new(false),
            local_store,
        })
    }

    /// Path to the `.git` directory itself.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The LocalStore this backend was constructed with.
    pub fn local_store(&self) -> &Arc<dyn LocalStore> {
        &self.local_store
    }

    /// Run `op` against the repository on the blocking pool, holding the
    /// handle's mutex for the whole call.
    async fn with_repo<T, F>(&self, op: F) -> BackingResult<T>
    where
        F: FnOnce(&Repository) -> BackingResult<T> + Send + 'static,
        T: Send + 'static,
    {
        if self.closed.load(Ordering::Acquire) {
            return Err(BackingError::Closed);
        }
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || {
            let guard = repo
                .lock()
                .map_err(|e| BackingError::Backend(format!("repository mutex poisoned: {e}")))?;
            let repo = guard.as_ref().ok_or(BackingError::Closed)?;
            op(repo)
        })
        .await
        .map_err(|e| BackingError::Backend(format!("git task failed: {e}")))?
    }

    fn get_tree_impl(repo: &Repository, id: &Hash) -> BackingResult<Tree> {
        let tree = repo
            .find_tree(hash_to_oid(id)?)
            .map_err(|e| classify(e, ObjectKind::Tree, id))?;

        let mut entries = Vec::with_capacity(tree.len());
        for entry in tree.iter() {
            let raw_name = || String::from_utf8_lossy(entry.name_bytes()).into_owned();
            let raw_mode = entry.filemode_raw();
            let mode = u32::try_from(raw_mode)
                .ok()
                .and_then(EntryMode::from_mode_bits)
                .ok_or_else(|| {
                    corrupt(id, format!("entry {:?} has unknown mode {raw_mode:o}", raw_name()))
                })?;
            let name = entry
                .name()
                .ok_or_else(|| corrupt(id, format!("entry name {:?} is not UTF-8", raw_name())))?;
            validate_path_component(name).map_err(|e| corrupt(id, e.to_string()))?;
            entries.push(TreeEntry::new(mode, name, oid_to_hash(entry.id())?));
        }
        Ok(Tree::new(entries))
    }

    fn get_blob_impl(repo: &Repository, id: &Hash) -> BackingResult<Blob> {
        let blob = repo
            .find_blob(hash_to_oid(id)?)
            .map_err(|e| classify(e, ObjectKind::Blob, id))?;
        Ok(Blob::new(blob.content()))
    }

    fn get_tree_for_commit_impl(repo: &Repository, commit_id: &Hash) -> BackingResult<Tree> {
        let commit = repo
            .find_commit(hash_to_oid(commit_id)?)
            .map_err(|e| classify(e, ObjectKind::Commit, commit_id))?;
        let tree_id = oid_to_hash(commit.tree_id())?;
        debug!(commit = %commit_id, tree = %tree_id, "resolved commit to root tree");
        Self::get_tree_impl(repo, &tree_id)
    }
}

#[async_trait]
impl BackingStore for GitBackingStore {
    fn name(&self) -> &'static str {
        "git"
    }

    async fn get_tree(&self, id: &Hash) -> BackingResult<Tree> {
        debug!(id = %id, "git get_tree");
        let id = *id;
        self.with_repo(move |repo| Self::get_tree_impl(repo, &id)).await
    }

    async fn get_blob(&self, id: &Hash) -> BackingResult<Blob> {
        debug!(id = %id, "git get_blob");
        let id = *id;
        self.with_repo(move |repo| Self::get_blob_impl(repo, &id)).await
    }

    async fn get_tree_for_commit(&self, commit_id: &Hash) -> BackingResult<Tree> {
        debug!(commit = %commit_id, "git get_tree_for_commit");
        let commit_id = *commit_id;
        self.with_repo(move |repo| Self::get_tree_for_commit_impl(repo, &commit_id))
            .await
    }

    fn state(&self) -> StoreState {
        if self.closed.load(Ordering::Acquire) {
            StoreState::Closed
        } else {
            StoreState::Ready
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        // Waits for an in-flight fetch to release the handle, then drops it.
        let repo = self
            .repo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(repo);
        info!(path = %self.path.display(), "closed git backing store");
    }
}

impl std::fmt::Debug for GitBackingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitBackingStore")
            .field("path", &self.path)
            .field("state", &self.state())
            .finish()
    }
}

/// Reinterpret a hash as a git object id. Both are 20 raw bytes.
fn hash_to_oid(hash: &Hash) -> BackingResult<Oid> {
    Oid::from_bytes(hash.as_bytes())
        .map_err(|e| BackingError::Backend(format!("cannot translate {hash}: {}", e.message())))
}

fn oid_to_hash(oid: Oid) -> BackingResult<Hash> {
    Hash::from_slice(oid.as_bytes())
        .map_err(|e| BackingError::Backend(format!("cannot translate oid {oid}: {e}")))
}

fn corrupt(id: &Hash, reason: String) -> BackingError {
    warn!(id = %id, %reason, "corrupt git object");
    BackingError::CorruptObject { id: *id, reason }
}

/// Map a libgit2 lookup failure onto the backing error taxonomy.
fn classify(err: git2::Error, kind: ObjectKind, id: &Hash) -> BackingError {
    match (err.code(), err.class()) {
        // libgit2 also reports a type mismatch (e.g. a blob looked up as a
        // tree) as NotFound.
        (ErrorCode::NotFound, _) => BackingError::NotFound { kind, id: *id },
        (ErrorCode::Invalid | ErrorCode::HashsumMismatch, _)
        | (_, ErrorClass::Object | ErrorClass::Tree | ErrorClass::Invalid | ErrorClass::Zlib) => {
            corrupt(id, format!("cannot parse {kind}: {}", err.message()))
        }
        _ => BackingError::Backend(format!("reading {kind} {id}: {}", err.message())),
    }
}
