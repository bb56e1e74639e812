//! The transactional key-value contract.

use crate::error::{KvError, KvResult};

/// Traversal direction for a bucket cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorDirection {
    /// Visit records in ascending lexicographic key order.
    Ascending,
    /// Visit records in descending lexicographic key order.
    Descending,
}

/// A handle to a transactional key-value engine.
///
/// A write transaction commits all staged changes atomically when the
/// closure returns `Ok`, and discards them entirely otherwise. A read
/// transaction observes a consistent snapshot for its duration.
pub trait Store {
    /// The transaction handle type this engine hands to closures.
    type Tx: Tx;

    /// Executes `f` within a read-only transaction.
    fn view<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&Self::Tx) -> Result<R, E>,
        E: From<KvError>;

    /// Executes `f` within a write transaction.
    ///
    /// Changes are committed if and only if `f` returns `Ok`.
    fn update<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&Self::Tx) -> Result<R, E>,
        E: From<KvError>;
}

/// A transaction handle.
///
/// Transactions never outlive the closure they were handed to, and the
/// engine owns commit/rollback; a `Tx` only opens buckets.
pub trait Tx {
    /// The bucket handle type, borrowing from this transaction.
    type Bucket<'a>: Bucket
    where
        Self: 'a;

    /// Opens an existing bucket by name.
    ///
    /// Returns [`KvError::BucketNotFound`] if the bucket does not exist.
    fn bucket(&self, name: &[u8]) -> KvResult<Self::Bucket<'_>>;

    /// Creates a bucket if it does not already exist.
    ///
    /// Idempotent; creating an existing bucket is a no-op. Fails with
    /// [`KvError::TxReadOnly`] inside a read transaction.
    fn create_bucket_if_not_exists(&self, name: &[u8]) -> KvResult<()>;
}

/// A named, ordered byte-key namespace within a transaction.
pub trait Bucket {
    /// Cursor type yielding raw `(key, value)` records in key order.
    type Cursor: Iterator<Item = (Vec<u8>, Vec<u8>)>;

    /// Returns the value stored at `key`, or `None` if absent.
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>>;

    /// Stores `value` at `key`, overwriting any existing record.
    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()>;

    /// Deletes the record at `key`. Deleting an absent key is a no-op.
    fn delete(&self, key: &[u8]) -> KvResult<()>;

    /// Opens a cursor over the full key range of this bucket.
    fn cursor(&self, direction: CursorDirection) -> KvResult<Self::Cursor>;
}
