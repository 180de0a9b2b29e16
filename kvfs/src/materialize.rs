//! Directory materialization.
//!
//! Directories are implicit: a write beneath a directory creates its marker
//! on demand. Only the immediate parent is materialized per call; deeper
//! ancestors stay implicit until something materializes them.

use tracing::debug;

use crate::{
    FsResult,
    adapter::EntryStore,
    entry::{DirEntry, Entry, now_millis},
    error::FsError,
    path::{as_dir_path, dir_chain, parent_dir_of},
};

/// Guarantees a directory marker exists at `dir`.
///
/// An existing marker is returned untouched, so repeated calls keep the
/// first call's timestamps. The check and the create are two store calls;
/// concurrent first calls may both create, and the later write wins.
pub(crate) async fn ensure_dir(entries: &EntryStore, dir: &str) -> FsResult<DirEntry> {
    let dir = as_dir_path(dir);
    match entries.get(&dir).await? {
        Some(Entry::Dir(existing)) => Ok(existing),
        Some(Entry::File(_)) => Err(FsError::KindMismatch { path: dir }),
        None => {
            let created = DirEntry::new(now_millis());
            entries.put(&dir, &Entry::Dir(created)).await?;
            debug!(scope = entries.scope(), path = %dir, "materialized directory");
            Ok(created)
        }
    }
}

/// Materializes the directory that will contain `path` and returns it.
///
/// `path` must not be the root; the root has no parent to hold it.
pub(crate) async fn ensure_parent(entries: &EntryStore, path: &str) -> FsResult<String> {
    let parent = parent_dir_of(path)
        .ok_or_else(|| FsError::usage("the root directory cannot be written to"))?;
    ensure_dir(entries, &parent).await?;
    Ok(parent)
}

/// Materializes `dir` and its immediate parent, as `mkdir` does.
pub(crate) async fn make_dir(entries: &EntryStore, dir: &str) -> FsResult<DirEntry> {
    let dir = as_dir_path(dir);
    if let Some(parent) = parent_dir_of(&dir) {
        ensure_dir(entries, &parent).await?;
    }
    ensure_dir(entries, &dir).await
}

/// Materializes every level from the root down to `dir`.
pub(crate) async fn make_dir_all(entries: &EntryStore, dir: &str) -> FsResult<DirEntry> {
    let chain = dir_chain(dir);
    let mut last = None;
    for level in &chain {
        last = Some(ensure_dir(entries, level).await?);
    }
    // dir_chain always yields at least the root.
    last.ok_or_else(|| FsError::usage("empty directory chain"))
}
