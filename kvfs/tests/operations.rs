//! End-to-end behaviour of the scoped filesystem API over an in-memory store.
//!
//! Covers:
//! 1.  **Round trips:** write, read, overwrite and stat of whole files.
//! 2.  **Directories:** implicit parents, `mkdir`, `ensure_dir` idempotency,
//!     listing order, de-duplication and marker-less directories.
//! 3.  **Subtrees:** recursive delete, recursive copy, move.
//! 4.  **Errors:** usage errors and not-found stay distinguishable.
//! 5.  **Isolation:** two identity scopes on one store never see each other.

use std::sync::Arc;
use std::time::Duration;

use kvfs::{Entry, EntryKind, FsConfig, FsError, KvFs, ScopedFs};
use kvfs_store_memory::MemoryStore;

fn scoped(scope: &str) -> ScopedFs {
    KvFs::new(Arc::new(MemoryStore::new()), FsConfig::default()).scope(scope)
}

#[tokio::test]
async fn write_then_read_round_trips() -> anyhow::Result<()> {
    let fs = scoped("alice");

    let written = fs.write("/a/b.txt", b"hello bytes".to_vec()).await?;
    assert_eq!(written.path, "/a/b.txt");
    assert_eq!(written.size, 11);

    let read = fs.read("/a/b.txt").await?;
    assert_eq!(read.content.as_ref(), b"hello bytes");
    assert_eq!(read.size, 11);
    assert!(read.created_at <= read.modified_at);

    // The immediate parent was materialized by the write.
    assert!(matches!(fs.stat("/a/").await?, Some(Entry::Dir(_))));
    Ok(())
}

#[tokio::test]
async fn overwrite_replaces_content_and_keeps_created_at() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/doc.txt", "first version").await?;
    let first = fs.read("/doc.txt").await?;
    tokio::time::sleep(Duration::from_millis(5)).await;
    fs.write("/doc.txt", "v2").await?;
    let second = fs.read("/doc.txt").await?;

    assert_eq!(second.content.as_ref(), b"v2");
    assert_eq!(second.size, 2);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.modified_at > first.modified_at);
    Ok(())
}

#[tokio::test]
async fn paths_are_normalized_before_use() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("//docs///readme.md", "x").await?;
    assert_eq!(fs.read("/docs/readme.md").await?.content.as_ref(), b"x");
    assert_eq!(fs.read("docs/readme.md").await?.content.as_ref(), b"x");
    Ok(())
}

#[tokio::test]
async fn ensure_dir_is_idempotent() -> anyhow::Result<()> {
    let fs = scoped("alice");

    let first = fs.ensure_dir("/projects/").await?;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = fs.ensure_dir("/projects").await?;
    assert_eq!(first, second);

    match fs.stat("/projects/").await? {
        Some(Entry::Dir(dir)) => assert_eq!(dir.created_at, first.created_at),
        other => panic!("expected a directory, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn listing_an_unknown_directory_creates_it() -> anyhow::Result<()> {
    let fs = scoped("alice");

    assert!(fs.stat("/empty/").await?.is_none());
    let children = fs.list("/empty/").await?;
    assert!(children.is_empty());
    assert!(fs.is_dir("/empty").await?);
    Ok(())
}

#[tokio::test]
async fn notes_scenario() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/notes/todo.txt", "buy milk").await?;

    let listing = fs.list("/notes/").await?;
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "todo.txt");
    assert_eq!(listing[0].path, "/notes/todo.txt");
    assert_eq!(listing[0].kind, EntryKind::File);
    assert_eq!(listing[0].size, Some(8));

    assert_eq!(fs.read("/notes/todo.txt").await?.content.as_ref(), b"buy milk");

    fs.delete("/notes/todo.txt").await?;
    assert!(fs.list("/notes/").await?.is_empty());
    assert!(fs.is_dir("/notes/").await?);
    Ok(())
}

#[tokio::test]
async fn listing_merges_markers_with_descendants() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.mkdir("/root/sub/").await?;
    fs.write("/root/sub/inner.txt", "i").await?;
    fs.write("/root/sub/deeper/x.txt", "x").await?;
    fs.write("/root/Beta.txt", "bb").await?;
    fs.write("/root/alpha.txt", "a").await?;

    let listing = fs.list("/root").await?;
    let names: Vec<&str> = listing.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["alpha.txt", "Beta.txt", "sub"]);

    let sub = &listing[2];
    assert_eq!(sub.kind, EntryKind::Dir);
    assert_eq!(sub.path, "/root/sub/");
    assert!(sub.created_at.is_some(), "sub has a marker");
    assert_eq!(sub.size, None);
    Ok(())
}

#[tokio::test]
async fn marker_less_directories_are_inferred() -> anyhow::Result<()> {
    let fs = scoped("alice");

    // Only the immediate parent /a/b/ is materialized, /a/ stays implicit.
    fs.write("/a/b/c.txt", "c").await?;
    assert!(fs.stat("/a/").await?.is_none());

    let listing = fs.list("/").await?;
    assert_eq!(listing.len(), 1);
    let a = &listing[0];
    assert_eq!(a.name, "a");
    assert_eq!(a.path, "/a/");
    assert_eq!(a.kind, EntryKind::Dir);
    assert!(a.is_implicit());
    assert_eq!((a.size, a.created_at, a.modified_at), (None, None, None));
    Ok(())
}

#[tokio::test]
async fn mkdir_all_materializes_every_level() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.mkdir("/x/y/z/").await?;
    assert!(fs.is_dir("/x/y/z/").await?);
    assert!(fs.is_dir("/x/y/").await?);
    assert!(!fs.is_dir("/x/").await?);

    let out = fs.mkdir_all("/p/q/r").await?;
    assert_eq!(out.path, "/p/q/r/");
    for dir in ["/", "/p/", "/p/q/", "/p/q/r/"] {
        assert!(fs.is_dir(dir).await?, "{dir} should exist");
    }
    Ok(())
}

#[tokio::test]
async fn recursive_delete_removes_every_descendant() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/d/x.txt", "x").await?;
    fs.write("/d/e/y.txt", "y").await?;
    fs.write("/dd/keep.txt", "k").await?;
    fs.mkdir("/d/").await?;

    let outcome = fs.delete("/d/").await?;
    assert_eq!(outcome.path, "/d/");
    assert_eq!(outcome.removed, 3, "x.txt, e/ and e/y.txt");

    for path in ["/d/x.txt", "/d/e/y.txt", "/d/e/", "/d/"] {
        assert!(fs.stat(path).await?.is_none(), "{path} should be gone");
    }
    assert!(fs.stat("/dd/keep.txt").await?.is_some(), "sibling prefix survives");
    Ok(())
}

#[tokio::test]
async fn delete_without_slash_falls_back_to_directory() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/dir/file.txt", "f").await?;
    let outcome = fs.delete("/dir").await?;
    assert_eq!(outcome.path, "/dir/");
    assert_eq!(outcome.removed, 1);
    assert!(!fs.exists("/dir/file.txt").await?);

    // Deleting something absent is a no-op.
    let outcome = fs.delete("/never/there.txt").await?;
    assert_eq!(outcome.removed, 0);
    Ok(())
}

#[tokio::test]
async fn recursive_copy_preserves_structure_and_content() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/src/f.txt", "hi").await?;
    fs.write("/src/nested/g.txt", "there").await?;
    fs.mkdir("/src/empty/").await?;

    let outcome = fs.copy("/src/", "/dst/").await?;
    assert_eq!(outcome.from, "/src/");
    assert_eq!(outcome.to, "/dst/");

    assert_eq!(fs.read("/dst/f.txt").await?.content.as_ref(), b"hi");
    assert_eq!(fs.read("/dst/nested/g.txt").await?.content.as_ref(), b"there");
    assert!(fs.is_dir("/dst/empty/").await?);
    assert!(fs.is_dir("/dst/nested/").await?);

    assert_eq!(fs.read("/src/f.txt").await?.content.as_ref(), b"hi");
    Ok(())
}

#[tokio::test]
async fn copy_file_into_directory_keeps_base_name() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/a.txt", "payload").await?;
    let outcome = fs.copy("/a.txt", "/dir/").await?;
    assert_eq!(outcome.to, "/dir/a.txt");
    assert_eq!(fs.read("/dir/a.txt").await?.content.as_ref(), b"payload");
    assert!(fs.is_dir("/dir/").await?);

    let outcome = fs.copy("/a.txt", "/renamed.txt").await?;
    assert_eq!(outcome.to, "/renamed.txt");
    Ok(())
}

#[tokio::test]
async fn copy_resolves_slashless_directory_source() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/photos/cat.jpg", vec![1u8, 2, 3]).await?;
    let outcome = fs.copy("/photos", "/backup").await?;
    assert_eq!(outcome.from, "/photos/");
    assert_eq!(outcome.to, "/backup/");
    assert_eq!(fs.read("/backup/cat.jpg").await?.content.as_ref(), &[1u8, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn move_is_copy_then_delete() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/a.txt", "original").await?;
    let outcome = fs.r#move("/a.txt", "/b.txt").await?;
    assert_eq!((outcome.from.as_str(), outcome.to.as_str()), ("/a.txt", "/b.txt"));

    assert!(fs.stat("/a.txt").await?.is_none());
    assert_eq!(fs.read("/b.txt").await?.content.as_ref(), b"original");

    fs.write("/tree/leaf.txt", "leaf").await?;
    fs.r#move("/tree/", "/moved/").await?;
    assert!(fs.stat("/tree/").await?.is_none());
    assert!(fs.stat("/tree/leaf.txt").await?.is_none());
    assert_eq!(fs.read("/moved/leaf.txt").await?.content.as_ref(), b"leaf");
    Ok(())
}

#[tokio::test]
async fn move_onto_itself_keeps_the_file() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/same.txt", "stay").await?;
    fs.r#move("/same.txt", "/same.txt").await?;
    assert_eq!(fs.read("/same.txt").await?.content.as_ref(), b"stay");
    Ok(())
}

#[tokio::test]
async fn usage_errors_and_not_found_are_distinct() -> anyhow::Result<()> {
    let fs = scoped("alice");
    fs.write("/keep/a.txt", "a").await?;
    fs.write("/b.txt", "b").await?;

    let err = fs.write("/", "x").await.unwrap_err();
    assert!(err.is_usage(), "{err}");
    let err = fs.write("", "x").await.unwrap_err();
    assert!(err.is_usage(), "{err}");

    let err = fs.read("/missing.txt").await.unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(!err.is_usage());

    let err = fs.copy("/missing.txt", "/x.txt").await.unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
    let err = fs.r#move("/missing/", "/x/").await.unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));

    // Blank paths never stand in for the root.
    for blank in ["", "//"] {
        assert!(fs.delete(blank).await.unwrap_err().is_usage(), "delete {blank:?}");
        assert!(fs.read(blank).await.unwrap_err().is_usage(), "read {blank:?}");
        assert!(fs.copy(blank, "/x/").await.unwrap_err().is_usage(), "copy {blank:?}");
        assert!(fs.r#move(blank, "/x/").await.unwrap_err().is_usage(), "move {blank:?}");
    }
    assert!(fs.exists("/keep/a.txt").await?);
    assert!(fs.exists("/b.txt").await?);
    assert!(!fs.exists("/x/").await?);

    // Only an explicit root clears the scope.
    fs.delete("/").await?;
    assert!(!fs.exists("/b.txt").await?);
    Ok(())
}

#[tokio::test]
async fn reading_a_directory_is_not_found() -> anyhow::Result<()> {
    let fs = scoped("alice");
    fs.mkdir("/only-a-dir/").await?;
    assert!(fs.read("/only-a-dir").await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn copy_into_own_subtree_is_rejected() -> anyhow::Result<()> {
    let fs = scoped("alice");

    fs.write("/loop/a.txt", "a").await?;
    let err = fs.copy("/loop/", "/loop/inner/").await.unwrap_err();
    assert!(err.is_usage());
    let err = fs.r#move("/loop", "/loop/").await.unwrap_err();
    assert!(err.is_usage());
    assert!(fs.exists("/loop/a.txt").await?);
    Ok(())
}

#[tokio::test]
async fn directory_form_copy_into_itself_fails_before_lookup() {
    let fs = scoped("alice");

    // The source does not exist, so a lookup would have reported NotFound.
    let err = fs.copy("/ghost/", "/ghost/inner/").await.unwrap_err();
    assert!(err.is_usage(), "{err}");
    let err = fs.r#move("/", "/anywhere/").await.unwrap_err();
    assert!(err.is_usage(), "{err}");
}

#[tokio::test]
async fn max_file_size_is_enforced_before_writing() {
    let store = MemoryStore::new();
    let config = FsConfig {
        max_file_size: Some(4),
        ..FsConfig::default()
    };
    let kvfs = KvFs::new(Arc::new(store.clone()), config);
    assert_eq!(kvfs.config().max_file_size, Some(4));
    let fs = kvfs.scope("alice");

    assert!(fs.write("/small.txt", "1234").await.is_ok());
    let before = store.len();
    let err = fs.write("/big/file.txt", "12345").await.unwrap_err();
    assert!(err.is_usage());
    assert_eq!(store.len(), before, "rejected write touched the store");
}

#[tokio::test]
async fn scopes_do_not_observe_each_other() -> anyhow::Result<()> {
    let fs = KvFs::new(Arc::new(MemoryStore::new()), FsConfig::default());
    let alice = fs.scope("alice");
    let bob = fs.scope("bob");

    alice.write("/secret.txt", "alice only").await?;
    assert!(bob.stat("/secret.txt").await?.is_none());
    assert!(bob.list("/").await?.is_empty());

    bob.delete("/").await?;
    assert_eq!(alice.read("/secret.txt").await?.content.as_ref(), b"alice only");
    Ok(())
}

#[tokio::test]
async fn namespaces_partition_one_store() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let docs = KvFs::new(
        store.clone(),
        FsConfig {
            namespace: "docs".into(),
            ..FsConfig::default()
        },
    )
    .scope("alice");
    let media = KvFs::new(store, FsConfig::default()).scope("alice");

    docs.write("/x.txt", "doc").await?;
    assert!(!media.exists("/x.txt").await?);
    Ok(())
}
