use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use kvfs_core::store::{KvStore, StoreResult};

/// Substrate that keeps every key in process memory.
///
/// Clones share the same map, so one instance can be handed to several
/// filesystems at once. Separate `MemoryStore::new()` calls are fully
/// isolated from each other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<Bytes, Bytes>>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &[u8]) -> StoreResult<Option<Bytes>> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    async fn put(&self, key: &[u8], value: Bytes) -> StoreResult<()> {
        self.entries.insert(Bytes::copy_from_slice(key), value);
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    /// DashMap has no key order; matching entries are collected and sorted.
    async fn list_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<(Bytes, Bytes)>> {
        let mut matches: Vec<(Bytes, Bytes)> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        matches.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(matches)
    }
}
