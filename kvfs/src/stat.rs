use crate::{
    FsResult,
    adapter::EntryStore,
    entry::Entry,
    path::{as_dir_path, canonical, is_dir_path},
};

/// Looks `input` up in the form its trailing slash implies.
pub(crate) async fn stat(entries: &EntryStore, input: &str) -> FsResult<Option<Entry>> {
    entries.get(&canonical(input)).await
}

/// Looks `input` up as a file or a directory.
///
/// Inputs without a trailing slash are tried as a file first and then as a
/// directory; inputs with one are only tried as a directory. Returns the
/// canonical path that matched.
pub(crate) async fn resolve(
    entries: &EntryStore,
    input: &str,
) -> FsResult<Option<(String, Entry)>> {
    let path = canonical(input);
    if let Some(entry) = entries.get(&path).await? {
        return Ok(Some((path, entry)));
    }
    if is_dir_path(&path) {
        return Ok(None);
    }

    let dir = as_dir_path(&path);
    Ok(entries.get(&dir).await?.map(|entry| (dir, entry)))
}
