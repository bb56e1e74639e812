//! Error types for the entity store.

use shelfdb_kv::KvError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in entity store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists at the encoded key.
    #[error("{resource} not found for key {key}")]
    NotFound {
        /// The resource name the store was configured with.
        resource: String,
        /// The attempted key, hex-encoded for reporting.
        key: String,
    },

    /// A key or body encode function failed.
    #[error("encoding failed: {message}")]
    Encoding {
        /// Description of the failure.
        message: String,
    },

    /// A stored value failed to decode, or a decoded value had an
    /// unexpected shape.
    #[error("decoding failed: {message}")]
    Decoding {
        /// Description of the failure.
        message: String,
    },

    /// The underlying key-value engine failed; passed through unchanged.
    #[error(transparent)]
    Kv(#[from] KvError),
}

impl StoreError {
    /// Creates a not-found error for a resource and its attempted key.
    pub fn not_found(resource: impl Into<String>, key: &[u8]) -> Self {
        Self::NotFound {
            resource: resource.into(),
            key: hex(key),
        }
    }

    /// Creates an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Creates a decoding error.
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding {
            message: message.into(),
        }
    }

    /// Returns true if this error is a not-found condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}
