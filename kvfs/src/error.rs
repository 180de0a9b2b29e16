use std::convert::Infallible;

/// Errors surfaced by filesystem operations.
///
/// [`FsError::Usage`] and [`FsError::NotFound`] are decided before or
/// instead of touching the store and must stay distinguishable for callers.
/// Everything else reports a failing or inconsistent store; no variant
/// carries raw substrate key bytes.
#[derive(thiserror::Error, Debug)]
pub enum FsError {
    #[error("invalid usage: {0}")]
    Usage(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store {op} failed for {path}: {source}")]
    Store {
        op: &'static str,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("entry at {path} could not be decoded")]
    Corrupt {
        path: String,
        #[source]
        source: minicbor::decode::Error,
    },

    #[error("entry at {path} disagrees with its path form")]
    KindMismatch { path: String },

    #[error("entry encoding failed: {0}")]
    Encode(#[from] minicbor::encode::Error<Infallible>),
}

impl FsError {
    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        FsError::Usage(msg.into())
    }

    pub(crate) fn store(op: &'static str, path: &str, source: anyhow::Error) -> Self {
        FsError::Store {
            op,
            path: path.to_owned(),
            source,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, FsError::Usage(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}
