//! The LocalStore contract for grove.
//!
//! A LocalStore is the durable, hash-keyed cache that sits beside the
//! backing stores. Backends hold it through `Arc<dyn LocalStore>`; its
//! lifetime is managed by whoever composes the backends.
//!
//! # Storage Backends
//!
//! All stores implement the [`LocalStore`] trait:
//!
//! - [`InMemoryLocalStore`] -- `HashMap`-based store for tests and fixtures
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written.
//! 2. Concurrent reads are always safe.
//! 3. Trees are kept in git's canonical encoding so their hash can be
//!    recomputed from the stored bytes.

pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryLocalStore;
pub use object::{ObjectKind, StoredObject};
pub use traits::LocalStore;
