//! Maps canonical paths of one scope onto substrate keys and values.

use std::sync::Arc;

use bytes::Bytes;
use kvfs_core::{KvStore, StoreKey};
use tracing::debug;

use crate::{
    FsResult,
    entry::Entry,
    error::FsError,
    path::is_dir_path,
};

/// A path found by a prefix scan, with its raw stored value.
#[derive(Debug, Clone)]
pub(crate) struct Scanned {
    pub path: String,
    pub value: Bytes,
}

impl Scanned {
    pub fn decode(&self) -> FsResult<Entry> {
        decode_at(&self.path, &self.value)
    }
}

/// Entry store for a single `(namespace, scope)` pair.
///
/// Each method is one substrate call. Nothing here spans keys atomically.
#[derive(Clone)]
pub(crate) struct EntryStore {
    store: Arc<dyn KvStore>,
    namespace: Arc<str>,
    scope: Arc<str>,
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("namespace", &self.namespace)
            .field("scope", &self.scope)
            .finish()
    }
}

impl EntryStore {
    pub fn new(store: Arc<dyn KvStore>, namespace: Arc<str>, scope: Arc<str>) -> Self {
        Self {
            store,
            namespace,
            scope,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    fn key(&self, path: &str) -> FsResult<Vec<u8>> {
        StoreKey::new(&self.namespace, &self.scope, path)
            .to_bytes()
            .map_err(|e| FsError::usage(e.to_string()))
    }

    pub async fn get(&self, path: &str) -> FsResult<Option<Entry>> {
        let key = self.key(path)?;
        debug!(scope = %self.scope, path, "get entry");
        let raw = self
            .store
            .get(&key)
            .await
            .map_err(|e| FsError::store("get", path, e))?;

        raw.map(|value| decode_at(path, &value)).transpose()
    }

    /// Overwrites the entry at `path`. The entry kind must match the path form.
    pub async fn put(&self, path: &str, entry: &Entry) -> FsResult<()> {
        if entry.is_dir() != is_dir_path(path) {
            return Err(FsError::KindMismatch {
                path: path.to_owned(),
            });
        }
        let key = self.key(path)?;
        let value = entry.to_bytes()?;
        debug!(scope = %self.scope, path, kind = ?entry.kind(), "put entry");
        self.store
            .put(&key, value)
            .await
            .map_err(|e| FsError::store("put", path, e))
    }

    /// Removes the entry at `path`; absent entries are not an error.
    pub async fn delete(&self, path: &str) -> FsResult<()> {
        let key = self.key(path)?;
        debug!(scope = %self.scope, path, "delete entry");
        self.store
            .delete(&key)
            .await
            .map_err(|e| FsError::store("delete", path, e))
    }

    /// Every stored path starting with `prefix`, in byte order.
    ///
    /// For a directory prefix this includes the directory's own marker.
    pub async fn scan(&self, prefix: &str) -> FsResult<Vec<Scanned>> {
        let raw_prefix = StoreKey::prefix(&self.namespace, &self.scope, prefix)
            .map_err(|e| FsError::usage(e.to_string()))?;
        let listed = self
            .store
            .list_prefix(&raw_prefix)
            .await
            .map_err(|e| FsError::store("list", prefix, e))?;
        debug!(scope = %self.scope, prefix, count = listed.len(), "scanned prefix");

        listed
            .into_iter()
            .map(|(key, value)| {
                let path = StoreKey::path_of(&key).map_err(|e| {
                    FsError::store("list", prefix, anyhow::anyhow!("malformed key: {e}"))
                })?;
                Ok(Scanned {
                    path: path.to_owned(),
                    value,
                })
            })
            .collect()
    }
}

fn decode_at(path: &str, value: &[u8]) -> FsResult<Entry> {
    let entry = Entry::from_bytes(value).map_err(|source| FsError::Corrupt {
        path: path.to_owned(),
        source,
    })?;
    if entry.is_dir() != is_dir_path(path) {
        return Err(FsError::KindMismatch {
            path: path.to_owned(),
        });
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{DirEntry, FileEntry};
    use kvfs_store_memory::MemoryStore;

    fn entries(store: &MemoryStore, scope: &str) -> EntryStore {
        EntryStore::new(Arc::new(store.clone()), "fs".into(), scope.into())
    }

    #[tokio::test]
    async fn put_rejects_kind_mismatch() {
        let store = MemoryStore::new();
        let es = entries(&store, "alice");

        let err = es
            .put("/a/", &Entry::File(FileEntry::new(vec![], 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, FsError::KindMismatch { .. }));

        let err = es
            .put("/a", &Entry::Dir(DirEntry::new(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, FsError::KindMismatch { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn scopes_are_isolated() -> FsResult<()> {
        let store = MemoryStore::new();
        let alice = entries(&store, "alice");
        let bob = entries(&store, "bob");

        alice
            .put("/x.txt", &Entry::File(FileEntry::new(b"a".to_vec(), 1)))
            .await?;

        assert!(bob.get("/x.txt").await?.is_none());
        assert!(bob.scan("/").await?.is_empty());
        assert_eq!(alice.scan("/").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_value_is_reported_without_key_bytes() {
        let store = MemoryStore::new();
        let es = entries(&store, "carol");
        let key = StoreKey::new("fs", "carol", "/broken").to_bytes().unwrap();
        store
            .put(&key, Bytes::from_static(&[0xff, 0x00]))
            .await
            .unwrap();

        let err = es.get("/broken").await.unwrap_err();
        assert!(matches!(err, FsError::Corrupt { ref path, .. } if path == "/broken"));
        assert_eq!(err.to_string(), "entry at /broken could not be decoded");
    }

    #[tokio::test]
    async fn delete_missing_is_ok() -> FsResult<()> {
        let store = MemoryStore::new();
        entries(&store, "dave").delete("/nothing").await
    }
}
