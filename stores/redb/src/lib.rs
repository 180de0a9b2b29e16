//! RedbStore - a persistent ordered substrate backed by redb.

use bytes::Bytes;
use kvfs_core::store::{KvStore, StoreResult};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::{path::Path, sync::Arc};

const TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("kvfs");

/// File name of the database inside the configured directory.
pub const DB_FILE_NAME: &str = "kvfs.redb";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct RedbStoreConfig {
    /// Directory holding `kvfs.redb`.
    pub path: String,
}

/// `KvStore` implementation backed by a single redb table.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        let db = Database::create(path.join(DB_FILE_NAME))?;

        // Create the table up front so that a first read on a fresh
        // database does not fail with TableDoesNotExist.
        {
            let write_txn = db.begin_write()?;
            {
                let _ = write_txn.open_table(TABLE)?;
            }
            write_txn.commit()?;
        }

        tracing::debug!(path = %path.display(), "opened redb store");
        Ok(Self { db: Arc::new(db) })
    }

    pub fn create(config: &RedbStoreConfig) -> anyhow::Result<Self> {
        Self::open(&config.path)
    }
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish()
    }
}

#[async_trait::async_trait]
impl KvStore for RedbStore {
    async fn get(&self, key: &[u8]) -> StoreResult<Option<Bytes>> {
        let db = self.db.clone();
        let key = key.to_vec();

        tokio::task::spawn_blocking(move || -> anyhow::Result<Option<Bytes>> {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(TABLE)?;
            let value = table
                .get(key.as_slice())?
                .map(|guard| Bytes::copy_from_slice(guard.value()));
            Ok(value)
        })
        .await
        .map_err(|e| anyhow::anyhow!("redb read task failed: {}", e))?
    }

    async fn put(&self, key: &[u8], value: Bytes) -> StoreResult<()> {
        let db = self.db.clone();
        let key = key.to_vec();

        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(TABLE)?;
                table.insert(key.as_slice(), value.as_ref())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| anyhow::anyhow!("redb write task failed: {}", e))?
    }

    async fn delete(&self, key: &[u8]) -> StoreResult<()> {
        let db = self.db.clone();
        let key = key.to_vec();

        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(TABLE)?;
                table.remove(key.as_slice())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| anyhow::anyhow!("redb delete task failed: {}", e))?
    }

    async fn list_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<(Bytes, Bytes)>> {
        let db = self.db.clone();
        let prefix = prefix.to_vec();

        tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<(Bytes, Bytes)>> {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(TABLE)?;

            let mut out = Vec::new();
            for item in table.range(prefix.as_slice()..)? {
                let (key, value) = item?;
                if !key.value().starts_with(&prefix) {
                    break;
                }
                out.push((
                    Bytes::copy_from_slice(key.value()),
                    Bytes::copy_from_slice(value.value()),
                ));
            }
            Ok(out)
        })
        .await
        .map_err(|e| anyhow::anyhow!("redb list task failed: {}", e))?
    }
}
