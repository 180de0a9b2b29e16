//! Canonical path forms.
//!
//! Every path handled by kvfs is absolute and uses `/` as separator.
//! Directory paths end with `/` (the root is exactly `/`), file paths never
//! do. All functions here are total: any input string coerces to *some*
//! canonical path, because callers normalize before they know whether
//! anything exists at that path.
//!
//! Empty segments are dropped everywhere, so `//a///b/` and `/a/b/` are the
//! same directory. `.` and `..` have no special meaning.

/// The root directory.
pub const ROOT: &str = "/";

fn segments(input: &str) -> impl Iterator<Item = &str> {
    input.split('/').filter(|segment| !segment.is_empty())
}

/// Normalizes an optional input into file form. A missing input is the root.
pub fn normalize(input: Option<&str>) -> String {
    let Some(input) = input else {
        return ROOT.to_owned();
    };

    let mut out = String::with_capacity(input.len() + 1);
    for segment in segments(input) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Coerces `input` to file form: single leading slash, no trailing slash.
///
/// The root has no file form and stays `/`.
pub fn as_file_path(input: &str) -> String {
    normalize(Some(input))
}

/// Coerces `input` to directory form: single leading slash, one trailing slash.
pub fn as_dir_path(input: &str) -> String {
    let mut path = normalize(Some(input));
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}

/// Canonical form implied by how `input` was written: directory form if it
/// ends with `/` (or names the root), file form otherwise.
pub fn canonical(input: &str) -> String {
    if input.ends_with('/') {
        as_dir_path(input)
    } else {
        as_file_path(input)
    }
}

pub fn is_root(path: &str) -> bool {
    path == ROOT
}

pub fn is_dir_path(path: &str) -> bool {
    path.ends_with('/')
}

/// True for input that names nothing: empty, or only slashes without being
/// the root itself. Such input still normalizes to `/`, so operations that
/// must not silently target the root check this first.
pub fn is_blank(input: &str) -> bool {
    input != ROOT && segments(input).next().is_none()
}

/// Directory one level above `path`, or `None` for the root.
///
/// ```
/// use kvfs::path::parent_dir_of;
///
/// assert_eq!(parent_dir_of("/a/b.txt").as_deref(), Some("/a/"));
/// assert_eq!(parent_dir_of("/a/b/").as_deref(), Some("/a/"));
/// assert_eq!(parent_dir_of("/a").as_deref(), Some("/"));
/// assert_eq!(parent_dir_of("/"), None);
/// ```
pub fn parent_dir_of(path: &str) -> Option<String> {
    let parts: Vec<&str> = segments(path).collect();
    let (_, ancestors) = parts.split_last()?;

    let mut out = String::from("/");
    for segment in ancestors {
        out.push_str(segment);
        out.push('/');
    }
    Some(out)
}

/// Every directory from the root down to and including `dir`, in order.
pub fn dir_chain(dir: &str) -> Vec<String> {
    let mut chain = vec![ROOT.to_owned()];
    let mut current = String::from("/");
    for segment in segments(dir) {
        current.push_str(segment);
        current.push('/');
        chain.push(current.clone());
    }
    chain
}

/// Last segment of `path`, or an empty string for the root.
pub fn base_name(path: &str) -> &str {
    segments(path).last().unwrap_or("")
}
