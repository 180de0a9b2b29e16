//! Substrate key layout.
//!
//! A key is the triple `(namespace, scope, path)` laid out as
//!
//! ```text
//! u16 BE namespace length | namespace | u32 BE scope length | scope | path
//! ```
//!
//! The length-prefixed header keeps every scope string unambiguous, and the
//! path is written last and unescaped, so byte order over keys that share a
//! header is byte order over paths. A prefix scan over
//! `header ‖ "/docs/"` therefore yields exactly the `/docs/` subtree.

use std::fmt;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("namespace too long: {0} bytes")]
    NamespaceTooLong(usize),
    #[error("scope too long: {0} bytes")]
    ScopeTooLong(usize),
    #[error("key truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("key component is not valid UTF-8")]
    InvalidUtf8,
}

/// A decoded or to-be-encoded substrate key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreKey<'a> {
    pub namespace: &'a str,
    pub scope: &'a str,
    pub path: &'a str,
}

impl fmt::Debug for StoreKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreKey")
            .field("namespace", &self.namespace)
            .field("scope", &self.scope)
            .field("path", &self.path)
            .finish()
    }
}

impl<'a> StoreKey<'a> {
    pub fn new(namespace: &'a str, scope: &'a str, path: &'a str) -> Self {
        Self {
            namespace,
            scope,
            path,
        }
    }

    /// Encodes the `(namespace, scope)` header shared by every key of a scope.
    pub fn header(namespace: &str, scope: &str) -> Result<Vec<u8>, KeyError> {
        let ns_len =
            u16::try_from(namespace.len()).map_err(|_| KeyError::NamespaceTooLong(namespace.len()))?;
        let scope_len =
            u32::try_from(scope.len()).map_err(|_| KeyError::ScopeTooLong(scope.len()))?;

        let mut out = Vec::with_capacity(2 + namespace.len() + 4 + scope.len());
        out.extend_from_slice(&ns_len.to_be_bytes());
        out.extend_from_slice(namespace.as_bytes());
        out.extend_from_slice(&scope_len.to_be_bytes());
        out.extend_from_slice(scope.as_bytes());
        Ok(out)
    }

    /// Raw prefix matching every key in `(namespace, scope)` whose path
    /// starts with `path_prefix`.
    pub fn prefix(namespace: &str, scope: &str, path_prefix: &str) -> Result<Vec<u8>, KeyError> {
        let mut out = Self::header(namespace, scope)?;
        out.extend_from_slice(path_prefix.as_bytes());
        Ok(out)
    }

    /// Encodes this key to raw substrate bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyError> {
        Self::prefix(self.namespace, self.scope, self.path)
    }

    /// Decodes a raw substrate key.
    pub fn decode(raw: &'a [u8]) -> Result<Self, KeyError> {
        let (ns_len_bytes, rest) = split(raw, 2)?;
        let ns_len = u16::from_be_bytes([ns_len_bytes[0], ns_len_bytes[1]]) as usize;
        let (namespace, rest) = split(rest, ns_len)?;

        let (scope_len_bytes, rest) = split(rest, 4)?;
        let scope_len = u32::from_be_bytes([
            scope_len_bytes[0],
            scope_len_bytes[1],
            scope_len_bytes[2],
            scope_len_bytes[3],
        ]) as usize;
        let (scope, path) = split(rest, scope_len)?;

        Ok(Self {
            namespace: utf8(namespace)?,
            scope: utf8(scope)?,
            path: utf8(path)?,
        })
    }

    /// Returns only the path component of a raw substrate key.
    pub fn path_of(raw: &'a [u8]) -> Result<&'a str, KeyError> {
        Ok(Self::decode(raw)?.path)
    }
}

fn split(bytes: &[u8], at: usize) -> Result<(&[u8], &[u8]), KeyError> {
    if bytes.len() < at {
        return Err(KeyError::Truncated {
            expected: at,
            actual: bytes.len(),
        });
    }
    Ok(bytes.split_at(at))
}

fn utf8(bytes: &[u8]) -> Result<&str, KeyError> {
    std::str::from_utf8(bytes).map_err(|_| KeyError::InvalidUtf8)
}
