use serde::{Deserialize, Serialize};

pub const DEFAULT_NAMESPACE: &str = "fs";

/// Filesystem settings shared by every scope of one [`crate::KvFs`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FsConfig {
    /// Fixed tag written in front of every substrate key. Two filesystems
    /// with different namespaces can share one store without overlap.
    pub namespace: String,

    /// Largest file accepted by `write`, in bytes. `None` means unlimited.
    pub max_file_size: Option<u64>,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            max_file_size: None,
        }
    }
}
