//! Backing stores for grove.
//!
//! A backing store fetches immutable trees and blobs by [`Hash`] and
//! resolves commits to their root tree. Every fetch is asynchronous; the
//! layer above decides which backend to ask and what to cache.
//!
//! # Backends
//!
//! All backends implement the [`BackingStore`] trait:
//!
//! - [`GitBackingStore`] -- reads a git repository through libgit2
//! - [`TestBackingStore`] -- serves objects seeded into a [`LocalStore`]
//!
//! Use [`open_backing_store`] to pick one from a [`BackingConfig`].
//!
//! [`Hash`]: grove_types::Hash
//! [`LocalStore`]: grove_store::LocalStore

pub mod config;
pub mod error;
pub mod git;
pub mod testing;
pub mod traits;

pub use config::{open_backing_store, BackendConfig, BackingConfig};
pub use error::{BackingError, BackingResult, ErrorClass};
pub use git::GitBackingStore;
pub use testing::TestBackingStore;
pub use traits::{BackingStore, StoreState};
