use tracing::debug;

use crate::{
    FsResult,
    adapter::EntryStore,
    config::FsConfig,
    entry::{Entry, FileEntry, now_millis},
    error::FsError,
    materialize::ensure_parent,
    path::{as_file_path, is_root},
    types::WriteOutcome,
};

/// Writes a whole file, creating or replacing it.
///
/// This is the single path by which file entries are created; copies go
/// through it too, so size and timestamps are always recomputed here.
pub(crate) async fn write_file(
    entries: &EntryStore,
    config: &FsConfig,
    path: &str,
    content: Vec<u8>,
) -> FsResult<WriteOutcome> {
    let path = as_file_path(path);
    if is_root(&path) {
        return Err(FsError::usage("cannot write a file at the root path"));
    }
    if let Some(limit) = config.max_file_size
        && content.len() as u64 > limit
    {
        return Err(FsError::usage(format!(
            "file of {} bytes exceeds the {limit} byte limit",
            content.len()
        )));
    }

    ensure_parent(entries, &path).await?;

    let now = now_millis();
    let file = match entries.get(&path).await? {
        Some(Entry::File(previous)) => previous.overwrite(content, now),
        _ => FileEntry::new(content, now),
    };
    let size = file.size;
    entries.put(&path, &Entry::File(file)).await?;
    debug!(scope = entries.scope(), path = %path, size, "wrote file");
    Ok(WriteOutcome { path, size })
}
