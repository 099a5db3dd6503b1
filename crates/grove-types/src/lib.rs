//! Foundation types for grove.
//!
//! Every object a backing store hands out is one of the immutable values
//! defined here. Every other grove crate depends on `grove-types`.
//!
//! # Key Types
//!
//! - [`Hash`] -- 20-byte content digest, the key into every backend
//! - [`ContentHasher`] -- git-compatible object hashing
//! - [`Tree`] / [`TreeEntry`] / [`EntryMode`] -- ordered directory listings
//! - [`Blob`] -- raw file contents

pub mod blob;
pub mod error;
pub mod hash;
pub mod hasher;
pub mod tree;

pub use blob::Blob;
pub use error::TypeError;
pub use hash::{Hash, HASH_LEN};
pub use hasher::ContentHasher;
pub use tree::{validate_path_component, EntryMode, Tree, TreeEntry};
