//! Test utilities for `KvStore` implementations.
//!
//! This module provides a contract suite that can be run against any
//! `KvStore` implementation, and a fault-injecting wrapper used to exercise
//! the non-atomic behaviour of multi-key operations built on top of a store.
//!
//! # Usage
//!
//! In your store crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! kvfs_core = { workspace = true, features = ["testutil"] }
//! ```
//!
//! In your test file:
//!
//! ```ignore
//! use kvfs_core::testutil::StoreTests;
//!
//! #[tokio::test]
//! async fn test_my_store() {
//!     let store = MyStore::new(...);
//!     StoreTests::new(&store).run_all().await.unwrap();
//! }
//! ```

use crate::store::{KvStore, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Contract suite for `KvStore` implementations.
pub struct StoreTests<'a, S> {
    store: &'a S,
    /// Prefix for test keys to avoid conflicts
    prefix: String,
}

impl<'a, S: KvStore> StoreTests<'a, S> {
    /// Create a new test suite for the given store.
    pub fn new(store: &'a S) -> Self {
        let prefix = format!("_test_{}/", rand::rng().random::<u32>());
        Self { store, prefix }
    }

    /// Create a new test suite with a custom prefix.
    pub fn with_prefix(store: &'a S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn key(&self, name: &str) -> Vec<u8> {
        format!("{}{}", self.prefix, name).into_bytes()
    }

    /// Run all tests.
    pub async fn run_all(&self) -> StoreResult<()> {
        self.test_put_get().await?;
        self.test_get_missing().await?;
        self.test_overwrite().await?;
        self.test_delete().await?;
        self.test_delete_missing().await?;
        self.test_list_prefix_order().await?;
        self.test_list_prefix_isolation().await?;
        self.test_list_is_snapshot().await?;

        // Cleanup
        self.cleanup().await?;

        Ok(())
    }

    /// Test basic put and get.
    pub async fn test_put_get(&self) -> StoreResult<()> {
        let key = self.key("put_get");
        let data = Bytes::from_static(b"hello, world!");

        self.store.put(&key, data.clone()).await?;

        let retrieved = self.store.get(&key).await?;
        assert_eq!(retrieved, Some(data), "retrieved value should match original");

        Ok(())
    }

    /// Test reading a key that was never written.
    pub async fn test_get_missing(&self) -> StoreResult<()> {
        let key = self.key("never_written");
        assert_eq!(self.store.get(&key).await?, None, "missing key should be None");
        Ok(())
    }

    /// Test overwriting an existing key.
    pub async fn test_overwrite(&self) -> StoreResult<()> {
        let key = self.key("overwrite");

        self.store
            .put(&key, Bytes::from_static(b"original content"))
            .await?;
        self.store
            .put(&key, Bytes::from_static(b"new content"))
            .await?;

        let retrieved = self.store.get(&key).await?;
        assert_eq!(
            retrieved.as_deref(),
            Some(&b"new content"[..]),
            "overwritten value should be new"
        );

        Ok(())
    }

    /// Test key deletion.
    pub async fn test_delete(&self) -> StoreResult<()> {
        let key = self.key("delete");

        self.store
            .put(&key, Bytes::from_static(b"to be deleted"))
            .await?;
        assert!(self.store.get(&key).await?.is_some(), "key should exist before delete");

        self.store.delete(&key).await?;
        assert!(self.store.get(&key).await?.is_none(), "key should be gone after delete");

        Ok(())
    }

    /// Deleting an absent key is not an error.
    pub async fn test_delete_missing(&self) -> StoreResult<()> {
        self.store.delete(&self.key("delete_missing")).await?;
        Ok(())
    }

    /// Prefix listings come back in ascending byte order.
    pub async fn test_list_prefix_order(&self) -> StoreResult<()> {
        let names = ["order/b", "order/a/x", "order/a", "order/a/", "order/c"];
        for name in &names {
            self.store
                .put(&self.key(name), Bytes::copy_from_slice(name.as_bytes()))
                .await?;
        }

        let listed = self.store.list_prefix(&self.key("order/")).await?;
        let keys: Vec<Vec<u8>> = listed.iter().map(|(k, _)| k.to_vec()).collect();

        let mut expected: Vec<Vec<u8>> = names.iter().map(|n| self.key(n)).collect();
        expected.sort();
        assert_eq!(keys, expected, "listing should be sorted by key bytes");

        for (key, value) in &listed {
            let suffix = &key[self.prefix.len()..];
            assert_eq!(suffix, value.as_ref(), "listed value should belong to its key");
        }

        Ok(())
    }

    /// Keys that merely share leading characters are excluded.
    pub async fn test_list_prefix_isolation(&self) -> StoreResult<()> {
        self.store
            .put(&self.key("iso/inside"), Bytes::from_static(b"1"))
            .await?;
        self.store
            .put(&self.key("isolated"), Bytes::from_static(b"2"))
            .await?;

        let listed = self.store.list_prefix(&self.key("iso/")).await?;
        assert_eq!(listed.len(), 1, "only keys under the prefix should be listed");
        assert_eq!(listed[0].0.as_ref(), self.key("iso/inside").as_slice());

        Ok(())
    }

    /// Mutating the store after listing does not change the listing.
    pub async fn test_list_is_snapshot(&self) -> StoreResult<()> {
        for name in ["snap/1", "snap/2", "snap/3"] {
            self.store
                .put(&self.key(name), Bytes::from_static(b"s"))
                .await?;
        }

        let listed = self.store.list_prefix(&self.key("snap/")).await?;
        for (key, _) in &listed {
            self.store.delete(key).await?;
        }

        assert_eq!(listed.len(), 3);
        assert!(self.store.list_prefix(&self.key("snap/")).await?.is_empty());

        Ok(())
    }

    /// Clean up test keys.
    pub async fn cleanup(&self) -> StoreResult<()> {
        for (key, _) in self.store.list_prefix(self.prefix.as_bytes()).await? {
            let _ = self.store.delete(&key).await;
        }
        Ok(())
    }
}

/// Wraps a store and starts failing `put` or `delete` after a set number
/// of successful calls.
///
/// Reads are always passed through.
#[derive(Debug)]
pub struct FaultyStore<S> {
    inner: S,
    puts_left: AtomicUsize,
    deletes_left: AtomicUsize,
}

impl<S: KvStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            puts_left: AtomicUsize::new(usize::MAX),
            deletes_left: AtomicUsize::new(usize::MAX),
        }
    }

    /// Allow `n` more puts, then fail every following one.
    pub fn fail_puts_after(&self, n: usize) {
        self.puts_left.store(n, Ordering::SeqCst);
    }

    /// Allow `n` more deletes, then fail every following one.
    pub fn fail_deletes_after(&self, n: usize) {
        self.deletes_left.store(n, Ordering::SeqCst);
    }

    /// Stop injecting failures.
    pub fn heal(&self) {
        self.puts_left.store(usize::MAX, Ordering::SeqCst);
        self.deletes_left.store(usize::MAX, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn take(budget: &AtomicUsize) -> bool {
        budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            })
            .is_ok()
    }
}

#[async_trait]
impl<S: KvStore> KvStore for FaultyStore<S> {
    async fn get(&self, key: &[u8]) -> StoreResult<Option<Bytes>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &[u8], value: Bytes) -> StoreResult<()> {
        if !Self::take(&self.puts_left) {
            anyhow::bail!("injected put failure");
        }
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &[u8]) -> StoreResult<()> {
        if !Self::take(&self.deletes_left) {
            anyhow::bail!("injected delete failure");
        }
        self.inner.delete(key).await
    }

    async fn list_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<(Bytes, Bytes)>> {
        self.inner.list_prefix(prefix).await
    }
}

/// Generate random bytes for testing.
pub fn random_bytes(len: usize) -> Bytes {
    let mut data = vec![0u8; len];
    rand::rng().fill(&mut data[..]);
    Bytes::from(data)
}

/// Assert that two byte slices are equal with a descriptive message.
#[macro_export]
macro_rules! assert_bytes_eq {
    ($left:expr, $right:expr) => {
        assert_eq!(
            $left.as_ref() as &[u8],
            $right.as_ref() as &[u8],
            "byte content mismatch"
        );
    };
    ($left:expr, $right:expr, $($arg:tt)+) => {
        assert_eq!(
            $left.as_ref() as &[u8],
            $right.as_ref() as &[u8],
            $($arg)+
        );
    };
}
