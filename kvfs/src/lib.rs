//! # kvfs
//!
//! A hierarchical filesystem emulated on a flat, ordered key-value store.
//!
//! The store knows nothing about directories. Every file and every
//! directory marker is one key, named by its canonical path (see
//! [`path`]); a directory's contents are the keys its path prefixes, found
//! with a lexicographic prefix scan.
//!
//! ## Layers
//! 1. `path`        – canonical file/directory path forms.
//! 2. `entry`       – stored records (CBOR encoded).
//! 3. `adapter`     – path ↔ substrate key mapping, one store call per op.
//! 4. `materialize` – on-demand directory markers.
//! 5. `subtree`     – list, recursive delete, recursive copy, move.
//! 6. `api`         – the [`KvFs`] / [`ScopedFs`] façade applications use.
//!
//! ## Consistency
//!
//! The store only guarantees single-key atomicity, and kvfs adds no locking
//! on top. Multi-key operations are explicit sequences of single-key steps;
//! see [`ScopedFs`] for what callers can and cannot assume.

mod adapter;
mod api;
mod config;
pub mod entry;
mod error;
mod materialize;
pub mod path;
mod stat;
mod subtree;
mod types;
mod write;

pub use api::{KvFs, ScopedFs};
pub use config::{DEFAULT_NAMESPACE, FsConfig};
pub use entry::{DirEntry, Entry, EntryKind, FileEntry};
pub use error::FsError;
pub use types::{
    ChildSummary, DeleteOutcome, MkdirOutcome, ReadOutcome, TransferOutcome, WriteOutcome,
};

/// Crate-wide result alias.
pub type FsResult<T> = Result<T, FsError>;
