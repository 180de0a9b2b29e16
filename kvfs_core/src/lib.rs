//! Core kvfs types and traits.
//!
//! This crate defines the pieces shared by every kvfs crate: the ordered
//! key-value substrate interface the filesystem is emulated on, and the
//! encoding of substrate keys.
//!
//! ## Substrate contract
//!
//! A substrate only has to offer four single-key or prefix operations
//! (`get`, `put`, `delete`, `list_prefix`). Nothing in this contract spans
//! more than one key atomically; higher layers must not assume it does.
//!
//! ## Key encoding (persistent)
//!
//! [`StoreKey`] fixes how `(namespace, scope, path)` triples map to raw
//! substrate keys. Changing it orphans every entry already persisted.

pub mod key;
pub mod store;

// Test utilities (behind feature flag)
#[cfg(feature = "testutil")]
pub mod testutil;

pub use key::{KeyError, StoreKey};
pub use store::{KvStore, StoreResult};
