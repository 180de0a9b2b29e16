//! Recursive operations built from prefix scans.
//!
//! A directory's subtree is every key whose path starts with the
//! directory's canonical path. Each operation here is a sequence of
//! single-key store calls over a point-in-time scan of that range: it is
//! not atomic, it does not retry, and a failure part-way through leaves the
//! work done so far in place. Concurrent writers may add or remove keys in
//! the range while an operation runs; those changes are neither seen nor
//! reported.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::{
    FsResult,
    adapter::{EntryStore, Scanned},
    config::FsConfig,
    entry::{Entry, EntryKind},
    error::FsError,
    materialize::{ensure_dir, make_dir},
    path::{as_dir_path, as_file_path, base_name, is_root},
    stat::resolve,
    types::{ChildSummary, DeleteOutcome, TransferOutcome},
    write::write_file,
};

struct Child<'a> {
    name: &'a str,
    kind: EntryKind,
    marker: Option<&'a Scanned>,
}

/// Lists the immediate children of `dir`, materializing `dir` first.
///
/// A child directory is reported once whether it is known from its own
/// marker, from descendants' keys, or both. Results are ordered by name,
/// case-insensitively, with byte order breaking ties.
pub(crate) async fn list_children(
    entries: &EntryStore,
    dir: &str,
) -> FsResult<Vec<ChildSummary>> {
    let dir = as_dir_path(dir);
    ensure_dir(entries, &dir).await?;
    let scanned = entries.scan(&dir).await?;

    let mut children: BTreeMap<String, Child<'_>> = BTreeMap::new();
    for item in &scanned {
        let Some(rest) = item.path.strip_prefix(dir.as_str()) else {
            continue;
        };
        let (name, child_path, kind) = match rest.split_once('/') {
            Some((name, _)) => (name, format!("{dir}{name}/"), EntryKind::Dir),
            None => (rest, format!("{dir}{rest}"), EntryKind::File),
        };
        if name.is_empty() {
            continue;
        }

        let is_marker = item.path == child_path;
        let child = children.entry(child_path).or_insert(Child {
            name,
            kind,
            marker: None,
        });
        if is_marker {
            child.marker = Some(item);
        }
    }

    let mut summaries = Vec::with_capacity(children.len());
    for (path, child) in children {
        let name = child.name.to_owned();
        let summary = match child.marker {
            Some(marker) => ChildSummary::from_entry(name, path, &marker.decode()?),
            None => {
                warn!(
                    scope = entries.scope(),
                    path = %path,
                    "directory has descendants but no marker"
                );
                ChildSummary::inferred(name, path, child.kind)
            }
        };
        summaries.push(summary);
    }

    summaries.sort_by(|a, b| compare_names(&a.name, &b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(summaries)
}

/// Approximates root-locale collation without a collator. Names compare
/// case-insensitively with punctuation before digits before letters; case
/// (lowercase first) and then raw bytes only break ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

fn primary_key(name: &str) -> Vec<(u8, char)> {
    let mut key = Vec::with_capacity(name.len());
    for c in name.chars() {
        let class = if c.is_alphabetic() {
            2
        } else if c.is_numeric() {
            1
        } else {
            0
        };
        key.extend(c.to_lowercase().map(|lower| (class, lower)));
    }
    key
}

fn case_key(name: &str) -> Vec<bool> {
    name.chars().map(char::is_uppercase).collect()
}

/// Deletes a file, or a directory together with everything below it.
///
/// A slash-less `input` naming an existing file removes just that key.
/// Anything else is treated as a directory: every key under it is deleted
/// one by one, then its marker. Deleting something absent succeeds.
pub(crate) async fn delete_recursive(
    entries: &EntryStore,
    input: &str,
) -> FsResult<DeleteOutcome> {
    if !input.ends_with('/') {
        let file = as_file_path(input);
        if !is_root(&file)
            && let Some(Entry::File(_)) = entries.get(&file).await?
        {
            entries.delete(&file).await?;
            info!(scope = entries.scope(), path = %file, "deleted file");
            return Ok(DeleteOutcome {
                path: file,
                removed: 0,
            });
        }
    }

    let dir = as_dir_path(input);
    let scanned = entries.scan(&dir).await?;
    let mut removed = 0;
    for item in &scanned {
        if item.path == dir {
            continue;
        }
        entries.delete(&item.path).await?;
        removed += 1;
    }
    entries.delete(&dir).await?;

    info!(scope = entries.scope(), path = %dir, removed, "deleted directory");
    Ok(DeleteOutcome { path: dir, removed })
}

/// Copies a file or a directory subtree.
///
/// Files are rewritten through the normal write path, so the copy gets
/// fresh timestamps and its destination parent is materialized. A file
/// copied to a directory-form `dest` keeps its base name.
///
/// A directory-form `src` is checked against `dest` before any store call;
/// a slash-less `src` is only known to be a directory after the lookup.
pub(crate) async fn copy(
    entries: &EntryStore,
    config: &FsConfig,
    src: &str,
    dest: &str,
) -> FsResult<TransferOutcome> {
    if src.ends_with('/') {
        check_not_own_subtree(&as_dir_path(src), &as_dir_path(dest))?;
    }

    let (src_path, src_entry) = resolve(entries, src)
        .await?
        .ok_or_else(|| FsError::NotFound(as_file_path(src)))?;

    match src_entry {
        Entry::Dir(_) => copy_dir(entries, config, src_path, as_dir_path(dest)).await,
        Entry::File(file) => {
            let target = if dest.ends_with('/') || is_root(&as_file_path(dest)) {
                format!("{}{}", as_dir_path(dest), base_name(&src_path))
            } else {
                as_file_path(dest)
            };
            let written = write_file(entries, config, &target, file.content).await?;
            info!(scope = entries.scope(), from = %src_path, to = %written.path, "copied file");
            Ok(TransferOutcome {
                from: src_path,
                to: written.path,
            })
        }
    }
}

async fn copy_dir(
    entries: &EntryStore,
    config: &FsConfig,
    src_dir: String,
    dest_dir: String,
) -> FsResult<TransferOutcome> {
    check_not_own_subtree(&src_dir, &dest_dir)?;

    make_dir(entries, &dest_dir).await?;
    let scanned = entries.scan(&src_dir).await?;

    let mut copied = 0usize;
    for item in &scanned {
        let Some(rel) = item.path.strip_prefix(src_dir.as_str()) else {
            continue;
        };
        if rel.is_empty() {
            continue;
        }
        let target = format!("{dest_dir}{rel}");
        match item.decode()? {
            Entry::Dir(_) => {
                make_dir(entries, &target).await?;
            }
            Entry::File(file) => {
                write_file(entries, config, &target, file.content).await?;
            }
        }
        copied += 1;
    }

    info!(
        scope = entries.scope(),
        from = %src_dir,
        to = %dest_dir,
        copied,
        "copied directory"
    );
    Ok(TransferOutcome {
        from: src_dir,
        to: dest_dir,
    })
}

fn check_not_own_subtree(src_dir: &str, dest_dir: &str) -> FsResult<()> {
    if dest_dir.starts_with(src_dir) {
        return Err(FsError::usage(format!(
            "cannot copy {src_dir} into its own subtree {dest_dir}"
        )));
    }
    Ok(())
}

/// Copy followed by delete of the source. Not atomic.
///
/// If the copy fails nothing is deleted. If the delete fails after a
/// successful copy, both source and destination remain and the error is
/// returned.
pub(crate) async fn move_entry(
    entries: &EntryStore,
    config: &FsConfig,
    src: &str,
    dest: &str,
) -> FsResult<TransferOutcome> {
    let outcome = copy(entries, config, src, dest).await?;
    if outcome.from == outcome.to {
        return Ok(outcome);
    }

    // `from` is canonical, so its trailing slash selects file or subtree delete.
    if let Err(err) = delete_recursive(entries, &outcome.from).await {
        warn!(
            scope = entries.scope(),
            from = %outcome.from,
            to = %outcome.to,
            "move copied but could not delete the source: {err}"
        );
        return Err(err);
    }

    info!(scope = entries.scope(), from = %outcome.from, to = %outcome.to, "moved");
    Ok(outcome)
}
