//! Provides the high-level API for interacting with a kvfs filesystem.

use std::sync::Arc;

use bytes::Bytes;
use kvfs_core::KvStore;
use tracing::info;

use crate::{
    FsResult,
    adapter::EntryStore,
    config::FsConfig,
    entry::{DirEntry, Entry},
    error::FsError,
    materialize::{ensure_dir, make_dir, make_dir_all},
    path::{as_dir_path, as_file_path, is_blank},
    stat, subtree,
    types::{
        ChildSummary, DeleteOutcome, MkdirOutcome, ReadOutcome, TransferOutcome, WriteOutcome,
    },
    write::write_file,
};

/// A hierarchical filesystem laid over one ordered key-value store.
///
/// `KvFs` itself holds no state besides the store handle and settings; all
/// operations go through a [`ScopedFs`] obtained from [`KvFs::scope`], and
/// every scope sees only its own entries.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use kvfs::{FsConfig, KvFs};
/// use kvfs_store_memory::MemoryStore;
/// # #[tokio::main]
/// # async fn main() -> kvfs::FsResult<()> {
/// let fs = KvFs::new(Arc::new(MemoryStore::new()), FsConfig::default());
/// let alice = fs.scope("alice");
/// alice.write("/notes/todo.txt", b"buy milk".to_vec()).await?;
/// let listing = alice.list("/notes/").await?;
/// assert_eq!(listing[0].name, "todo.txt");
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct KvFs {
    store: Arc<dyn KvStore>,
    config: Arc<FsConfig>,
    namespace: Arc<str>,
}

impl std::fmt::Debug for KvFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvFs")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish()
    }
}

impl KvFs {
    pub fn new(store: Arc<dyn KvStore>, config: FsConfig) -> Self {
        let namespace = Arc::from(config.namespace.as_str());
        Self {
            store,
            config: Arc::new(config),
            namespace,
        }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Returns a handle bound to one identity scope.
    pub fn scope(&self, scope: impl Into<String>) -> ScopedFs {
        let scope: String = scope.into();
        ScopedFs {
            entries: EntryStore::new(self.store.clone(), self.namespace.clone(), scope.into()),
            config: self.config.clone(),
        }
    }
}

/// Filesystem operations for a single identity scope.
///
/// # Consistency
///
/// Each method is a series of single-key store calls. Structural operations
/// (`delete`, `copy`, `move`, `list`) are not atomic: they can observe or
/// leave a subtree half-changed when they race with other writers or when
/// the store fails part-way. Callers must not rely on atomic subtree moves.
#[derive(Clone, Debug)]
pub struct ScopedFs {
    entries: EntryStore,
    config: Arc<FsConfig>,
}

impl ScopedFs {
    pub fn scope(&self) -> &str {
        self.entries.scope()
    }

    /// Writes `content` as the whole file at `path`, materializing its
    /// immediate parent directory.
    ///
    /// Writing at the root path is a usage error.
    pub async fn write(&self, path: &str, content: impl Into<Vec<u8>>) -> FsResult<WriteOutcome> {
        write_file(&self.entries, &self.config, path, content.into()).await
    }

    /// Reads the whole file at `path`.
    pub async fn read(&self, path: &str) -> FsResult<ReadOutcome> {
        require_path(path)?;
        let file_path = as_file_path(path);
        match self.entries.get(&file_path).await? {
            Some(Entry::File(file)) => Ok(ReadOutcome {
                size: file.size,
                created_at: file.created_at,
                modified_at: file.modified_at,
                content: Bytes::from(file.content),
            }),
            _ => Err(FsError::NotFound(file_path)),
        }
    }

    /// Makes sure a directory marker exists at `path` without touching its
    /// parent. An existing marker is returned unchanged.
    pub async fn ensure_dir(&self, path: &str) -> FsResult<DirEntry> {
        ensure_dir(&self.entries, path).await
    }

    /// Creates the directory at `path` and its immediate parent.
    pub async fn mkdir(&self, path: &str) -> FsResult<MkdirOutcome> {
        let dir = as_dir_path(path);
        make_dir(&self.entries, &dir).await?;
        info!(scope = self.scope(), path = %dir, "mkdir");
        Ok(MkdirOutcome { path: dir })
    }

    /// Creates the directory at `path` and every missing ancestor.
    pub async fn mkdir_all(&self, path: &str) -> FsResult<MkdirOutcome> {
        let dir = as_dir_path(path);
        make_dir_all(&self.entries, &dir).await?;
        info!(scope = self.scope(), path = %dir, "mkdir -p");
        Ok(MkdirOutcome { path: dir })
    }

    /// Deletes a file, or a directory and everything below it.
    ///
    /// Not atomic: a store failure part-way leaves the subtree partially
    /// deleted, and the error is returned. An empty `path` is a usage error;
    /// the whole tree is only deleted when `/` is passed explicitly.
    pub async fn delete(&self, path: &str) -> FsResult<DeleteOutcome> {
        require_path(path)?;
        subtree::delete_recursive(&self.entries, path).await
    }

    /// Copies a file or directory subtree from `src` to `dest`.
    ///
    /// A file copied to a `dest` ending in `/` lands under that directory
    /// with its original name.
    pub async fn copy(&self, src: &str, dest: &str) -> FsResult<TransferOutcome> {
        require_path(src)?;
        subtree::copy(&self.entries, &self.config, src, dest).await
    }

    /// Copies `src` to `dest`, then deletes `src`.
    ///
    /// If the delete fails, both copies remain and the error is returned.
    pub async fn r#move(&self, src: &str, dest: &str) -> FsResult<TransferOutcome> {
        require_path(src)?;
        subtree::move_entry(&self.entries, &self.config, src, dest).await
    }

    /// Lists the immediate children of `dir`, creating `dir` if needed.
    pub async fn list(&self, dir: &str) -> FsResult<Vec<ChildSummary>> {
        subtree::list_children(&self.entries, dir).await
    }

    /// Returns the entry `path` names in its written form, if any.
    pub async fn stat(&self, path: &str) -> FsResult<Option<Entry>> {
        stat::stat(&self.entries, path).await
    }

    /// Returns the entry at `path` as a file or, failing that, a directory.
    pub async fn lookup(&self, path: &str) -> FsResult<Option<(String, Entry)>> {
        stat::resolve(&self.entries, path).await
    }

    /// True if a file or directory marker exists at `path`.
    pub async fn exists(&self, path: &str) -> FsResult<bool> {
        Ok(self.lookup(path).await?.is_some())
    }

    /// True if `path` has a directory marker.
    pub async fn is_dir(&self, path: &str) -> FsResult<bool> {
        let dir = as_dir_path(path);
        Ok(matches!(self.entries.get(&dir).await?, Some(Entry::Dir(_))))
    }
}

fn require_path(input: &str) -> FsResult<()> {
    if is_blank(input) {
        return Err(FsError::usage("missing path"));
    }
    Ok(())
}
