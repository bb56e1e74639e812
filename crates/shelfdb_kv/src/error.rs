//! Error types for key-value operations.

use thiserror::Error;

/// Result type for key-value operations.
pub type KvResult<T> = Result<T, KvError>;

/// Errors that can occur in key-value operations.
#[derive(Debug, Error)]
pub enum KvError {
    /// The named bucket does not exist in this transaction.
    #[error("bucket not found: {name}")]
    BucketNotFound {
        /// Name of the bucket, rendered lossily from its byte name.
        name: String,
    },

    /// A mutating operation was attempted inside a read transaction.
    #[error("transaction is read-only")]
    TxReadOnly,

    /// The engine failed internally.
    #[error("engine error: {0}")]
    Engine(String),
}

impl KvError {
    /// Creates a bucket-not-found error from a raw bucket name.
    pub fn bucket_not_found(name: &[u8]) -> Self {
        Self::BucketNotFound {
            name: String::from_utf8_lossy(name).into_owned(),
        }
    }
}
