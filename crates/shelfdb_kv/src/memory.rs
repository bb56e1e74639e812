//! In-memory key-value engine for testing and ephemeral storage.

use crate::error::{KvError, KvResult};
use crate::traits::{Bucket, CursorDirection, Store, Tx};
use parking_lot::RwLock;
use std::cell::RefCell;
use std::collections::BTreeMap;

type BucketMap = BTreeMap<Vec<u8>, Vec<u8>>;
type Buckets = BTreeMap<Vec<u8>, BucketMap>;

/// An in-memory transactional key-value engine.
///
/// Data lives in ordered maps guarded by a [`parking_lot::RwLock`].
/// Write transactions stage every change against a private copy and
/// swap it in on commit, so a closure returning `Err` rolls back
/// completely. Read transactions operate on a snapshot taken when the
/// transaction begins.
///
/// Suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// # Example
///
/// ```rust
/// use shelfdb_kv::{Bucket, KvError, MemStore, Store, Tx};
///
/// let store = MemStore::new();
/// store
///     .update(|tx| {
///         tx.create_bucket_if_not_exists(b"b")?;
///         tx.bucket(b"b")?.put(b"k", b"v")?;
///         Ok::<_, KvError>(())
///     })
///     .unwrap();
///
/// let found = store
///     .view(|tx| tx.bucket(b"b")?.get(b"k"))
///     .unwrap();
/// assert_eq!(found, Some(b"v".to_vec()));
/// ```
#[derive(Debug, Default)]
pub struct MemStore {
    inner: RwLock<Buckets>,
}

impl MemStore {
    /// Creates a new empty in-memory engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemStore {
    type Tx = MemTx;

    fn view<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&Self::Tx) -> Result<R, E>,
        E: From<KvError>,
    {
        let snapshot = self.inner.read().clone();
        let tx = MemTx::new(snapshot, false);
        f(&tx)
    }

    fn update<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&Self::Tx) -> Result<R, E>,
        E: From<KvError>,
    {
        // The write guard is held across the closure, so writers are
        // serialized and readers never observe a partial commit.
        let mut guard = self.inner.write();
        let tx = MemTx::new(guard.clone(), true);
        match f(&tx) {
            Ok(result) => {
                *guard = tx.state.into_inner();
                Ok(result)
            }
            Err(e) => Err(e),
        }
    }
}

/// A transaction over a [`MemStore`].
#[derive(Debug)]
pub struct MemTx {
    state: RefCell<Buckets>,
    writable: bool,
}

impl MemTx {
    fn new(state: Buckets, writable: bool) -> Self {
        Self {
            state: RefCell::new(state),
            writable,
        }
    }

    fn ensure_writable(&self) -> KvResult<()> {
        if self.writable {
            Ok(())
        } else {
            Err(KvError::TxReadOnly)
        }
    }
}

impl Tx for MemTx {
    type Bucket<'a>
        = MemBucket<'a>
    where
        Self: 'a;

    fn bucket(&self, name: &[u8]) -> KvResult<Self::Bucket<'_>> {
        if !self.state.borrow().contains_key(name) {
            return Err(KvError::bucket_not_found(name));
        }
        Ok(MemBucket {
            tx: self,
            name: name.to_vec(),
        })
    }

    fn create_bucket_if_not_exists(&self, name: &[u8]) -> KvResult<()> {
        self.ensure_writable()?;
        self.state.borrow_mut().entry(name.to_vec()).or_default();
        Ok(())
    }
}

/// A bucket handle within a [`MemTx`].
#[derive(Debug)]
pub struct MemBucket<'a> {
    tx: &'a MemTx,
    name: Vec<u8>,
}

impl Bucket for MemBucket<'_> {
    type Cursor = MemCursor;

    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        let state = self.tx.state.borrow();
        let bucket = state
            .get(&self.name)
            .ok_or_else(|| KvError::bucket_not_found(&self.name))?;
        Ok(bucket.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.tx.ensure_writable()?;
        let mut state = self.tx.state.borrow_mut();
        let bucket = state
            .get_mut(&self.name)
            .ok_or_else(|| KvError::bucket_not_found(&self.name))?;
        bucket.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        self.tx.ensure_writable()?;
        let mut state = self.tx.state.borrow_mut();
        let bucket = state
            .get_mut(&self.name)
            .ok_or_else(|| KvError::bucket_not_found(&self.name))?;
        bucket.remove(key);
        Ok(())
    }

    fn cursor(&self, direction: CursorDirection) -> KvResult<Self::Cursor> {
        let state = self.tx.state.borrow();
        let bucket = state
            .get(&self.name)
            .ok_or_else(|| KvError::bucket_not_found(&self.name))?;
        let mut records: Vec<(Vec<u8>, Vec<u8>)> = bucket
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if direction == CursorDirection::Descending {
            records.reverse();
        }
        Ok(MemCursor {
            records: records.into_iter(),
        })
    }
}

/// A cursor over a [`MemBucket`].
///
/// The cursor materializes the bucket's records when opened, so its
/// iteration order is fixed even if the bucket is mutated mid-scan.
#[derive(Debug)]
pub struct MemCursor {
    records: std::vec::IntoIter<(Vec<u8>, Vec<u8>)>,
}

impl Iterator for MemCursor {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemStore {
        let store = MemStore::new();
        store
            .update(|tx| {
                tx.create_bucket_if_not_exists(b"b")?;
                let bkt = tx.bucket(b"b")?;
                bkt.put(b"k1", b"v1")?;
                bkt.put(b"k2", b"v2")?;
                bkt.put(b"k3", b"v3")?;
                Ok::<_, KvError>(())
            })
            .unwrap();
        store
    }

    #[test]
    fn create_bucket_is_idempotent() {
        let store = seeded();
        store
            .update(|tx| tx.create_bucket_if_not_exists(b"b"))
            .unwrap();

        let found = store.view(|tx| tx.bucket(b"b")?.get(b"k1")).unwrap();
        assert_eq!(found, Some(b"v1".to_vec()));
    }

    #[test]
    fn missing_bucket_errors() {
        let store = MemStore::new();
        let result = store.view(|tx| tx.bucket(b"nope").map(|_| ()));
        assert!(matches!(result, Err(KvError::BucketNotFound { .. })));
    }

    #[test]
    fn read_tx_rejects_writes() {
        let store = seeded();
        let result = store.view(|tx| tx.bucket(b"b")?.put(b"k9", b"v9"));
        assert!(matches!(result, Err(KvError::TxReadOnly)));

        let result = store.view(|tx| tx.create_bucket_if_not_exists(b"other"));
        assert!(matches!(result, Err(KvError::TxReadOnly)));
    }

    #[test]
    fn failed_update_rolls_back() {
        let store = seeded();
        let result: Result<(), KvError> = store.update(|tx| {
            tx.bucket(b"b")?.put(b"k9", b"v9")?;
            Err(KvError::Engine("boom".into()))
        });
        assert!(result.is_err());

        let found = store.view(|tx| tx.bucket(b"b")?.get(b"k9")).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn cursor_orders_both_directions() {
        let store = seeded();

        let keys: Vec<Vec<u8>> = store
            .view(|tx| {
                let cursor = tx.bucket(b"b")?.cursor(CursorDirection::Ascending)?;
                Ok::<_, KvError>(cursor.map(|(k, _)| k).collect())
            })
            .unwrap();
        assert_eq!(keys, vec![b"k1".to_vec(), b"k2".to_vec(), b"k3".to_vec()]);

        let keys: Vec<Vec<u8>> = store
            .view(|tx| {
                let cursor = tx.bucket(b"b")?.cursor(CursorDirection::Descending)?;
                Ok::<_, KvError>(cursor.map(|(k, _)| k).collect())
            })
            .unwrap();
        assert_eq!(keys, vec![b"k3".to_vec(), b"k2".to_vec(), b"k1".to_vec()]);
    }

    #[test]
    fn delete_absent_key_is_noop() {
        let store = seeded();
        store
            .update(|tx| tx.bucket(b"b")?.delete(b"missing"))
            .unwrap();

        let found = store.view(|tx| tx.bucket(b"b")?.get(b"k1")).unwrap();
        assert_eq!(found, Some(b"v1".to_vec()));
    }

    #[test]
    fn put_overwrites_existing() {
        let store = seeded();
        store
            .update(|tx| tx.bucket(b"b")?.put(b"k1", b"updated"))
            .unwrap();

        let found = store.view(|tx| tx.bucket(b"b")?.get(b"k1")).unwrap();
        assert_eq!(found, Some(b"updated".to_vec()));
    }
}
