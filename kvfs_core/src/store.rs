use async_trait::async_trait;
use bytes::Bytes;

pub type StoreResult<T, E = anyhow::Error> = std::result::Result<T, E>;

/// A flat, byte-ordered key-value substrate.
///
/// Every method touches at most one key, except [`KvStore::list_prefix`]
/// which reads a snapshot of a key range. Implementations guarantee
/// single-key atomicity only: two concurrent `put`s to one key resolve as
/// last-writer-wins and there is no multi-key transaction.
#[async_trait]
pub trait KvStore: std::fmt::Debug + Send + Sync + 'static {
    /// Returns the value stored at `key`, or `None` if absent.
    async fn get(&self, key: &[u8]) -> StoreResult<Option<Bytes>>;

    /// Stores `value` at `key`, replacing any previous value.
    async fn put(&self, key: &[u8], value: Bytes) -> StoreResult<()>;

    /// Removes `key`. Succeeds when the key does not exist.
    async fn delete(&self, key: &[u8]) -> StoreResult<()>;

    /// Returns every `(key, value)` whose key starts with `prefix`,
    /// in ascending byte order of the key.
    ///
    /// The result is a point-in-time read; deleting listed keys afterwards
    /// does not affect it.
    async fn list_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<(Bytes, Bytes)>>;
}

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for std::sync::Arc<T> {
    async fn get(&self, key: &[u8]) -> StoreResult<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &[u8], value: Bytes) -> StoreResult<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &[u8]) -> StoreResult<()> {
        (**self).delete(key).await
    }

    async fn list_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<(Bytes, Bytes)>> {
        (**self).list_prefix(prefix).await
    }
}

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for Box<T> {
    async fn get(&self, key: &[u8]) -> StoreResult<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &[u8], value: Bytes) -> StoreResult<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &[u8]) -> StoreResult<()> {
        (**self).delete(key).await
    }

    async fn list_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<(Bytes, Bytes)>> {
        (**self).list_prefix(prefix).await
    }
}
