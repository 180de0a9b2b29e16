use anyhow::Result;
use kvfs::{
    ChildSummary, Entry, EntryKind, FsError, ScopedFs,
    entry::{Millis, to_datetime},
};

pub async fn run_ls(fs: &ScopedFs, path: &str, long: bool) -> Result<()> {
    for child in fs.list(path).await? {
        if long {
            println!("{}", long_line(&child));
        } else {
            println!("{}", display_name(&child));
        }
    }
    Ok(())
}

pub async fn run_stat(fs: &ScopedFs, path: &str) -> Result<()> {
    let (path, entry) = fs
        .lookup(path)
        .await?
        .ok_or_else(|| FsError::NotFound(kvfs::path::as_file_path(path)))?;

    println!("path:     {path}");
    match &entry {
        Entry::File(file) => {
            println!("kind:     file");
            println!("size:     {}", file.size);
        }
        Entry::Dir(_) => println!("kind:     directory"),
    }
    println!("created:  {}", format_millis(Some(entry.created_at())));
    println!("modified: {}", format_millis(Some(entry.modified_at())));
    Ok(())
}

fn display_name(child: &ChildSummary) -> String {
    match child.kind {
        EntryKind::Dir => format!("{}/", child.name),
        EntryKind::File => child.name.clone(),
    }
}

fn long_line(child: &ChildSummary) -> String {
    let kind = match child.kind {
        EntryKind::Dir => 'd',
        EntryKind::File => '-',
    };
    let size = child
        .size
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_owned());
    format!(
        "{kind} {size:>10} {:<19} {}",
        format_millis(child.modified_at),
        display_name(child)
    )
}

fn format_millis(millis: Option<Millis>) -> String {
    millis
        .and_then(to_datetime)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_owned())
}
