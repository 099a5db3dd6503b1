#![allow(dead_code)]

use std::path::Path;

use git2::{ObjectType, Oid, Repository, Signature, Time};
use grove_types::Hash;
use tempfile::TempDir;

pub const REGULAR: i32 = 0o100644;
pub const EXECUTABLE: i32 = 0o100755;
pub const SYMLINK: i32 = 0o120000;
pub const DIRECTORY: i32 = 0o040000;
pub const SUBMODULE: i32 = 0o160000;

/// A scratch git repository that test code writes objects into directly.
pub struct GitFixture {
    dir: TempDir,
    repo: Repository,
}

impl GitFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let repo = Repository::init(dir.path()).expect("init repository");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn blob(&self, data: &[u8]) -> Hash {
        to_hash(self.repo.blob(data).expect("write blob"))
    }

    /// Write a tree; git stores the entries in its canonical order.
    pub fn tree(&self, entries: &[(&str, i32, Hash)]) -> Hash {
        let mut builder = self.repo.treebuilder(None).expect("treebuilder");
        for (name, mode, hash) in entries {
            builder
                .insert(*name, to_oid(hash), *mode)
                .expect("insert tree entry");
        }
        to_hash(builder.write().expect("write tree"))
    }

    pub fn commit(&self, tree: Hash, parents: &[Hash]) -> Hash {
        let sig = Signature::new("grove", "grove@localhost", &Time::new(0, 0)).expect("signature");
        let tree = self.repo.find_tree(to_oid(&tree)).expect("find tree");
        let parents: Vec<_> = parents
            .iter()
            .map(|p| self.repo.find_commit(to_oid(p)).expect("find parent"))
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        let oid = self
            .repo
            .commit(None, &sig, &sig, "fixture commit", &tree, &parent_refs)
            .expect("write commit");
        to_hash(oid)
    }

    /// Write raw object bytes without any validation.
    pub fn raw(&self, kind: ObjectType, data: &[u8]) -> Hash {
        let odb = self.repo.odb().expect("odb");
        to_hash(odb.write(kind, data).expect("write raw object"))
    }
}

pub fn to_hash(oid: Oid) -> Hash {
    Hash::from_slice(oid.as_bytes()).expect("oid width")
}

pub fn to_oid(hash: &Hash) -> Oid {
    Oid::from_bytes(hash.as_bytes()).expect("hash width")
}
