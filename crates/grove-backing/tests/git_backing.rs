mod common;

use std::sync::Arc;

use git2::ObjectType;
use grove_backing::{BackingError, BackingStore, ErrorClass, GitBackingStore, StoreState};
use grove_store::{InMemoryLocalStore, ObjectKind};
use grove_types::{Blob, EntryMode, Hash, TreeEntry, HASH_LEN};

use common::*;

fn open(fixture: &GitFixture) -> GitBackingStore {
    GitBackingStore::open(fixture.path(), Arc::new(InMemoryLocalStore::new()))
        .expect("open fixture repository")
}

#[tokio::test]
async fn tree_entries_roundtrip() {
    let fixture = GitFixture::new();
    let readme = fixture.blob(b"# readme\n");
    let script = fixture.blob(b"#!/bin/sh\necho hi\n");
    let link = fixture.blob(b"README.md");
    let sub = fixture.tree(&[("inner.txt", REGULAR, readme)]);
    let root = fixture.tree(&[
        ("README.md", REGULAR, readme),
        ("run.sh", EXECUTABLE, script),
        ("docs", SYMLINK, link),
        ("src", DIRECTORY, sub),
    ]);

    let store = open(&fixture);
    let tree = store.get_tree(&root).await.unwrap();

    // git's canonical order, not insertion order
    assert_eq!(
        tree.entries,
        vec![
            TreeEntry::new(EntryMode::Regular, "README.md", readme),
            TreeEntry::new(EntryMode::Symlink, "docs", link),
            TreeEntry::new(EntryMode::Executable, "run.sh", script),
            TreeEntry::new(EntryMode::Directory, "src", sub),
        ]
    );
    // Re-encoding the decoded tree reproduces git's id.
    assert_eq!(tree.compute_hash(), root);
}

#[tokio::test]
async fn blob_bytes_are_verbatim() {
    let fixture = GitFixture::new();
    let content = b"crlf\r\nnul\x00high\xff\n";
    let id = fixture.blob(content);

    let store = open(&fixture);
    let blob = store.get_blob(&id).await.unwrap();
    assert_eq!(blob.as_bytes(), content);
    assert_eq!(blob.compute_hash(), id);
}

#[tokio::test]
async fn commit_resolves_to_root_tree() {
    let fixture = GitFixture::new();
    let file = fixture.blob(b"v1");
    let root = fixture.tree(&[("file", REGULAR, file)]);
    let first = fixture.commit(root, &[]);
    let file2 = fixture.blob(b"v2");
    let root2 = fixture.tree(&[("file", REGULAR, file2)]);
    let second = fixture.commit(root2, &[first]);

    let store = open(&fixture);
    assert_eq!(
        store.get_tree_for_commit(&first).await.unwrap(),
        store.get_tree(&root).await.unwrap()
    );
    assert_eq!(
        store.get_tree_for_commit(&second).await.unwrap(),
        store.get_tree(&root2).await.unwrap()
    );
}

#[tokio::test]
async fn absent_ids_are_not_found() {
    let fixture = GitFixture::new();
    let store = open(&fixture);
    let missing = Hash::from_hash([0x42; HASH_LEN]);

    assert!(matches!(
        store.get_tree(&missing).await,
        Err(BackingError::NotFound { kind: ObjectKind::Tree, .. })
    ));
    assert!(matches!(
        store.get_blob(&missing).await,
        Err(BackingError::NotFound { kind: ObjectKind::Blob, .. })
    ));
    assert!(matches!(
        store.get_tree_for_commit(&missing).await,
        Err(BackingError::NotFound { kind: ObjectKind::Commit, .. })
    ));
}

#[tokio::test]
async fn wrong_object_type_is_not_found() {
    let fixture = GitFixture::new();
    let blob = fixture.blob(b"plain file");
    let tree = fixture.tree(&[("f", REGULAR, blob)]);

    let store = open(&fixture);
    assert!(store.get_tree(&blob).await.unwrap_err().is_not_found());
    assert!(store.get_blob(&tree).await.unwrap_err().is_not_found());
    assert!(store
        .get_tree_for_commit(&tree)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn submodule_entries_are_reported_not_followed() {
    let fixture = GitFixture::new();
    let foreign_commit = Hash::from_hash([0x99; HASH_LEN]);
    let readme = fixture.blob(b"with submodule");
    let root = fixture.tree(&[
        ("README", REGULAR, readme),
        ("vendor", SUBMODULE, foreign_commit),
    ]);

    let store = open(&fixture);
    let tree = store.get_tree(&root).await.unwrap();
    let vendor = tree.get("vendor").expect("submodule entry");
    assert_eq!(vendor.mode, EntryMode::Submodule);
    assert!(vendor.mode.is_submodule());
    assert_eq!(vendor.hash, foreign_commit);
}

#[tokio::test]
async fn unknown_mode_bits_are_corrupt() {
    let fixture = GitFixture::new();
    let blob = fixture.blob(b"x");
    let mut raw = b"100600 odd\0".to_vec();
    raw.extend_from_slice(blob.as_bytes());
    let tree = fixture.raw(ObjectType::Tree, &raw);

    let store = open(&fixture);
    let err = store.get_tree(&tree).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::CorruptObject);
}

#[tokio::test]
async fn non_utf8_names_are_corrupt() {
    let fixture = GitFixture::new();
    let blob = fixture.blob(b"x");
    let mut raw = b"100644 caf\xe9\0".to_vec();
    raw.extend_from_slice(blob.as_bytes());
    let tree = fixture.raw(ObjectType::Tree, &raw);

    let store = open(&fixture);
    let err = store.get_tree(&tree).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::CorruptObject);
}

#[tokio::test]
async fn commit_without_tree_is_corrupt() {
    let fixture = GitFixture::new();
    let commit = fixture.raw(
        ObjectType::Commit,
        b"author grove <grove@localhost> 0 +0000\n\
          committer grove <grove@localhost> 0 +0000\n\
          \n\
          no tree here\n",
    );

    let store = open(&fixture);
    let err = store.get_tree_for_commit(&commit).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::CorruptObject);
}

#[tokio::test]
async fn commit_with_missing_root_tree_is_tree_not_found() {
    let fixture = GitFixture::new();
    let absent_tree = Hash::from_hash([0x7e; HASH_LEN]);
    let body = format!(
        "tree {absent_tree}\n\
         author grove <grove@localhost> 0 +0000\n\
         committer grove <grove@localhost> 0 +0000\n\
         \n\
         dangling root\n"
    );
    let commit = fixture.raw(ObjectType::Commit, body.as_bytes());

    let store = open(&fixture);
    let err = store.get_tree_for_commit(&commit).await.unwrap_err();
    assert!(matches!(
        err,
        BackingError::NotFound { kind: ObjectKind::Tree, id } if id == absent_tree
    ));
}

#[tokio::test]
async fn legacy_mode_tree_does_not_rehash_to_its_id() {
    let fixture = GitFixture::new();
    let blob = fixture.blob(b"old file");
    let mut raw = b"100664 old.txt\0".to_vec();
    raw.extend_from_slice(blob.as_bytes());
    let tree_id = fixture.raw(ObjectType::Tree, &raw);

    let store = open(&fixture);
    let tree = store.get_tree(&tree_id).await.unwrap();
    assert_eq!(
        tree.entries,
        vec![TreeEntry::new(EntryMode::Regular, "old.txt", blob)]
    );
    assert_ne!(tree.compute_hash(), tree_id);
}

#[test]
fn open_non_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = GitBackingStore::open(dir.path().join("nope"), Arc::new(InMemoryLocalStore::new()))
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Open);
}

#[test]
fn path_is_the_git_directory() {
    let fixture = GitFixture::new();
    let store = open(&fixture);
    assert!(store.path().ends_with(".git"));
    assert_eq!(store.name(), "git");
}

#[test]
fn local_store_is_retained_not_written() {
    let fixture = GitFixture::new();
    let local = Arc::new(InMemoryLocalStore::new());
    let store = GitBackingStore::open(fixture.path(), local.clone()).unwrap();
    assert_eq!(Arc::strong_count(&local), 2);

    let id = fixture.blob(b"never cached");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(store.get_blob(&id)).unwrap();
    assert!(local.is_empty());

    drop(store);
    assert_eq!(Arc::strong_count(&local), 1);
}

#[tokio::test]
async fn fetch_after_close_fails() {
    let fixture = GitFixture::new();
    let id = fixture.blob(b"bye");
    let store = open(&fixture);
    assert_eq!(store.state(), StoreState::Ready);
    store.get_blob(&id).await.unwrap();

    store.close();
    store.close();
    assert_eq!(store.state(), StoreState::Closed);
    assert!(matches!(store.get_blob(&id).await, Err(BackingError::Closed)));
    assert!(matches!(store.get_tree(&id).await, Err(BackingError::Closed)));
    assert_eq!(BackingError::Closed.class(), ErrorClass::Backend);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_blob_reads_are_not_interleaved() {
    let fixture = GitFixture::new();
    let contents: Vec<Vec<u8>> = (0..32)
        .map(|i| format!("blob number {i}\n").repeat(i + 1).into_bytes())
        .collect();
    let ids: Vec<Hash> = contents.iter().map(|c| fixture.blob(c)).collect();

    let store = Arc::new(open(&fixture));
    let mut handles = Vec::new();
    for round in 0..8 {
        for (i, id) in ids.iter().enumerate() {
            let store = Arc::clone(&store);
            let id = *id;
            let expected = contents[i].clone();
            handles.push(tokio::spawn(async move {
                let blob = store.get_blob(&id).await.unwrap();
                assert_eq!(blob.as_bytes(), expected.as_slice(), "round {round} blob {i}");
                assert_eq!(blob.compute_hash(), id);
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mixed_fetches() {
    let fixture = GitFixture::new();
    let a = fixture.blob(b"a");
    let b = fixture.blob(b"b");
    let root = fixture.tree(&[("a", REGULAR, a), ("b", REGULAR, b)]);
    let commit = fixture.commit(root, &[]);

    let store = Arc::new(open(&fixture));
    let expected = store.get_tree(&root).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let s = Arc::clone(&store);
        handles.push(tokio::spawn(async move { s.get_tree_for_commit(&commit).await }));
        let s = Arc::clone(&store);
        handles.push(tokio::spawn(async move { s.get_tree(&root).await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), expected);
    }
    assert_eq!(store.get_blob(&a).await.unwrap(), Blob::new("a"));
}
