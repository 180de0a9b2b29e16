use bytes::Bytes;
use chrono::{DateTime, Utc};
use minicbor::{Decode, Encode};
use std::convert::Infallible;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

pub(crate) fn now_millis() -> Millis {
    Utc::now().timestamp_millis()
}

/// Converts a stored timestamp for display.
pub fn to_datetime(millis: Millis) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Dir,
}

/// The stored record for one path.
///
/// A directory holds no child list; its children are whatever keys share
/// its path as a prefix.
#[derive(Encode, Decode, Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    #[n(0)]
    File(#[n(0)] FileEntry),
    #[n(1)]
    Dir(#[n(0)] DirEntry),
}

#[derive(Encode, Decode, Clone, Debug, PartialEq, Eq)]
#[cbor(array)]
pub struct FileEntry {
    #[n(0)]
    pub created_at: Millis,
    #[n(1)]
    pub modified_at: Millis,
    #[n(2)]
    pub size: u64,
    #[n(3)]
    #[cbor(with = "minicbor::bytes")]
    pub content: Vec<u8>,
}

#[derive(Encode, Decode, Clone, Copy, Debug, PartialEq, Eq)]
#[cbor(array)]
pub struct DirEntry {
    #[n(0)]
    pub created_at: Millis,
    #[n(1)]
    pub modified_at: Millis,
}

impl FileEntry {
    /// A fresh file created at `now`.
    pub fn new(content: Vec<u8>, now: Millis) -> Self {
        Self {
            created_at: now,
            modified_at: now,
            size: content.len() as u64,
            content,
        }
    }

    /// Replaces content, keeping the original creation time.
    pub fn overwrite(self, content: Vec<u8>, now: Millis) -> Self {
        Self {
            created_at: self.created_at,
            modified_at: now,
            size: content.len() as u64,
            content,
        }
    }
}

impl DirEntry {
    pub fn new(now: Millis) -> Self {
        Self {
            created_at: now,
            modified_at: now,
        }
    }
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::File(_) => EntryKind::File,
            Entry::Dir(_) => EntryKind::Dir,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Dir(_))
    }

    pub fn created_at(&self) -> Millis {
        match self {
            Entry::File(f) => f.created_at,
            Entry::Dir(d) => d.created_at,
        }
    }

    pub fn modified_at(&self) -> Millis {
        match self {
            Entry::File(f) => f.modified_at,
            Entry::Dir(d) => d.modified_at,
        }
    }

    /// Content length for files; directories have no size.
    pub fn size(&self) -> Option<u64> {
        match self {
            Entry::File(f) => Some(f.size),
            Entry::Dir(_) => None,
        }
    }

    /// Decodes an entry from its stored CBOR form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Entry, minicbor::decode::Error> {
        minicbor::decode(bytes)
    }

    /// Encodes this entry to CBOR as a `Bytes` buffer.
    pub fn to_bytes(&self) -> Result<Bytes, minicbor::encode::Error<Infallible>> {
        Ok(minicbor::to_vec(self)?.into())
    }
}
