use bytes::Bytes;
use serde::Serialize;

use crate::entry::{Entry, EntryKind, Millis};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub path: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub content: Bytes,
    pub size: u64,
    pub created_at: Millis,
    pub modified_at: Millis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MkdirOutcome {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub path: String,
    /// Keys removed below `path`, not counting `path` itself.
    pub removed: usize,
}

/// Result of a copy or a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    pub from: String,
    pub to: String,
}

/// One immediate child in a directory listing.
///
/// Timestamps and size are `None` for a directory that only exists
/// implicitly through its descendants (no marker stored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildSummary {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub size: Option<u64>,
    pub modified_at: Option<Millis>,
    pub created_at: Option<Millis>,
}

impl ChildSummary {
    pub(crate) fn from_entry(name: String, path: String, entry: &Entry) -> Self {
        Self {
            name,
            path,
            kind: entry.kind(),
            size: entry.size(),
            modified_at: Some(entry.modified_at()),
            created_at: Some(entry.created_at()),
        }
    }

    pub(crate) fn inferred(name: String, path: String, kind: EntryKind) -> Self {
        Self {
            name,
            path,
            kind,
            size: None,
            modified_at: None,
            created_at: None,
        }
    }

    pub fn is_implicit(&self) -> bool {
        self.created_at.is_none()
    }
}
