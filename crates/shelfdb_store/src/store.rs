//! Generic entity store over a transactional key-value engine.

use crate::codec::{ConvertValFn, DecodeValFn, EncodeEntFn};
use crate::entity::Entity;
use crate::error::{StoreError, StoreResult};
use shelfdb_kv::{Bucket, CursorDirection, Tx};
use tracing::{debug, trace};

/// A filter predicate evaluated on every decoded record during a scan.
///
/// Records failing the predicate are excluded before offset and limit
/// counting.
pub type FilterFn<'a, T> = Box<dyn Fn(&[u8], &T) -> bool + 'a>;

/// Options controlling a [`StoreBase::find`] scan.
pub struct FindOpts<'a, T> {
    /// Traverse the bucket in reverse key order.
    pub descending: bool,
    /// Stop after this many records have been captured (post-filter).
    /// `None` is unbounded.
    pub limit: Option<usize>,
    /// Skip this many filter-passing records before capturing begins.
    pub offset: usize,
    /// Predicate applied to every decoded record. When unset, every
    /// record passes.
    pub filter: Option<FilterFn<'a, T>>,
}

impl<T> Default for FindOpts<'_, T> {
    fn default() -> Self {
        Self {
            descending: false,
            limit: None,
            offset: 0,
            filter: None,
        }
    }
}

/// A generic store for one record type over one bucket.
///
/// `StoreBase` lets distinct record types share a single implementation
/// of CRUD, filtered bulk deletion, and paginated ordered scanning. It
/// wraps a bucket name plus four caller-supplied codec functions and is
/// immutable configuration: it holds no per-call state, opens no
/// transactions of its own, and is safe for concurrent use across
/// transactions.
///
/// Ordering during scans is pure byte order over encoded keys, so its
/// meaning depends on the key encoder; the provided
/// [`encode_id_key`](crate::codec::encode_id_key) produces fixed-width
/// big-endian keys that sort numerically.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use shelfdb_kv::{MemStore, Store};
/// use shelfdb_store::{
///     decode_json_val, encode_id_key, encode_json_body, Entity, EntityId, StoreBase,
/// };
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct User {
///     id: EntityId,
///     name: String,
/// }
///
/// let base: StoreBase<User> = StoreBase::new(
///     "user",
///     b"users".to_vec(),
///     encode_id_key(),
///     encode_json_body(),
///     decode_json_val(),
///     Box::new(|_key, user: User| {
///         Ok(Entity {
///             id: user.id,
///             name: user.name.clone(),
///             body: Some(user),
///             ..Entity::default()
///         })
///     }),
/// );
///
/// let kv = MemStore::new();
/// kv.update(|tx| base.init(tx)).unwrap();
/// ```
pub struct StoreBase<T> {
    resource: String,
    bucket: Vec<u8>,
    encode_ent_key: EncodeEntFn<T>,
    encode_ent_body: EncodeEntFn<T>,
    decode: DecodeValFn<T>,
    convert: ConvertValFn<T>,
}

impl<T> StoreBase<T> {
    /// Creates a new store base.
    ///
    /// `resource` names the record type for error reporting; `bucket` is
    /// the bucket this store owns within the engine.
    pub fn new(
        resource: impl Into<String>,
        bucket: Vec<u8>,
        encode_ent_key: EncodeEntFn<T>,
        encode_ent_body: EncodeEntFn<T>,
        decode: DecodeValFn<T>,
        convert: ConvertValFn<T>,
    ) -> Self {
        Self {
            resource: resource.into(),
            bucket,
            encode_ent_key,
            encode_ent_body,
            decode,
            convert,
        }
    }

    /// Returns the resource name used in error context.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the bucket name this store operates on.
    #[must_use]
    pub fn bucket_name(&self) -> &[u8] {
        &self.bucket
    }

    /// Ensures the store's bucket exists within the given transaction.
    ///
    /// Idempotent. Must run inside a write transaction before a fresh
    /// store is used; a failure here is a setup error and is not retried.
    pub fn init(&self, tx: &impl Tx) -> StoreResult<()> {
        trace!(bucket = %String::from_utf8_lossy(&self.bucket), "init bucket");
        tx.create_bucket_if_not_exists(&self.bucket)
            .map_err(StoreError::from)
    }

    /// Writes the entity into the bucket, overwriting any existing
    /// record at its encoded key. Put is an unconditional upsert; no
    /// existence check is performed.
    pub fn put(&self, tx: &impl Tx, ent: &Entity<T>) -> StoreResult<()> {
        let key = (self.encode_ent_key)(ent)?;
        let value = (self.encode_ent_body)(ent)?;
        self.bucket(tx)?.put(&key, &value)?;
        Ok(())
    }

    /// Returns the decoded value stored at the entity's encoded key.
    ///
    /// Fails with [`StoreError::NotFound`] when no record exists at the
    /// key; decode failures surface as [`StoreError::Decoding`]. The
    /// returned value is the decoded body, not a full [`Entity`];
    /// callers needing identity fields use [`StoreBase::to_entity`].
    pub fn find_ent(&self, tx: &impl Tx, ent: &Entity<T>) -> StoreResult<T> {
        let key = (self.encode_ent_key)(ent)?;
        let bucket = self.bucket(tx)?;
        match bucket.get(&key)? {
            Some(value) => (self.decode)(&key, &value),
            None => Err(StoreError::not_found(&self.resource, &key)),
        }
    }

    /// Deletes the record at the entity's encoded key.
    ///
    /// Deleting a key with no record is a no-op success; existence is
    /// never checked first, so an entity carrying only identity fields
    /// suffices.
    pub fn delete_ent(&self, tx: &impl Tx, ent: &Entity<T>) -> StoreResult<()> {
        let key = (self.encode_ent_key)(ent)?;
        self.bucket(tx)?.delete(&key)?;
        Ok(())
    }

    /// Scans the bucket in key order, invoking `capture` for each record
    /// that passes the filter and survives the offset.
    ///
    /// Per raw record, in traversal order: decode the value (a failure
    /// aborts the scan); apply the filter, skipping failures without
    /// consuming offset or limit budget; consume the offset budget;
    /// otherwise capture. An error from `capture` aborts the scan
    /// immediately and is returned verbatim. Traversal stops once the
    /// limit budget is exhausted.
    pub fn find<X, F>(&self, tx: &X, opts: FindOpts<'_, T>, mut capture: F) -> StoreResult<()>
    where
        X: Tx,
        F: FnMut(&[u8], T) -> StoreResult<()>,
    {
        if opts.limit == Some(0) {
            return Ok(());
        }

        let direction = if opts.descending {
            CursorDirection::Descending
        } else {
            CursorDirection::Ascending
        };

        let bucket = self.bucket(tx)?;
        let mut to_skip = opts.offset;
        let mut remaining = opts.limit;

        for (key, raw) in bucket.cursor(direction)? {
            let value = (self.decode)(&key, &raw)?;

            if let Some(filter) = &opts.filter {
                if !filter(&key, &value) {
                    continue;
                }
            }

            if to_skip > 0 {
                to_skip -= 1;
                continue;
            }

            capture(&key, value)?;

            if let Some(left) = remaining.as_mut() {
                *left -= 1;
                if *left == 0 {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Deletes every record whose decoded value passes `filter`.
    ///
    /// The bucket is traversed in forward key order and each value is
    /// decoded before the predicate runs; a decode failure aborts the
    /// scan with nothing further visited. There is no offset or limit.
    /// The predicate is required: delete-everything must be spelled out
    /// as `|_, _| true`.
    pub fn delete<X, F>(&self, tx: &X, mut filter: F) -> StoreResult<()>
    where
        X: Tx,
        F: FnMut(&[u8], &T) -> bool,
    {
        let bucket = self.bucket(tx)?;

        let mut doomed = Vec::new();
        for (key, raw) in bucket.cursor(CursorDirection::Ascending)? {
            let value = (self.decode)(&key, &raw)?;
            if filter(&key, &value) {
                doomed.push(key);
            }
        }

        debug!(
            bucket = %String::from_utf8_lossy(&self.bucket),
            count = doomed.len(),
            "bulk delete"
        );
        for key in &doomed {
            bucket.delete(key)?;
        }

        Ok(())
    }

    /// Converts a decoded value back into a full entity via the
    /// configured convert function.
    pub fn to_entity(&self, key: &[u8], value: T) -> StoreResult<Entity<T>> {
        (self.convert)(key, value)
    }

    fn bucket<'a, X: Tx>(&self, tx: &'a X) -> StoreResult<X::Bucket<'a>> {
        tx.bucket(&self.bucket).map_err(StoreError::from)
    }
}

impl<T> std::fmt::Debug for StoreBase<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreBase")
            .field("resource", &self.resource)
            .field("bucket", &String::from_utf8_lossy(&self.bucket))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_json_val, encode_id_key, encode_json_body};
    use crate::entity::EntityId;
    use serde::{Deserialize, Serialize};
    use shelfdb_kv::{MemStore, Store};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: EntityId,
        text: String,
    }

    fn note_base() -> StoreBase<Note> {
        StoreBase::new(
            "note",
            b"notes".to_vec(),
            encode_id_key(),
            encode_json_body(),
            decode_json_val(),
            Box::new(|_key, note: Note| {
                Ok(Entity {
                    id: note.id,
                    name: note.text.clone(),
                    body: Some(note),
                    ..Entity::default()
                })
            }),
        )
    }

    fn note_ent(id: u64, text: &str) -> Entity<Note> {
        let note = Note {
            id: EntityId::new(id),
            text: text.to_string(),
        };
        Entity {
            id: note.id,
            name: note.text.clone(),
            body: Some(note),
            ..Entity::default()
        }
    }

    #[test]
    fn put_overwrites_at_same_key() {
        let kv = MemStore::new();
        let base = note_base();
        kv.update(|tx| base.init(tx)).unwrap();

        kv.update(|tx| base.put(tx, &note_ent(1, "first"))).unwrap();
        kv.update(|tx| base.put(tx, &note_ent(1, "second"))).unwrap();

        let found = kv.view(|tx| base.find_ent(tx, &note_ent(1, ""))).unwrap();
        assert_eq!(found.text, "second");
    }

    #[test]
    fn put_with_zero_id_is_an_encoding_error() {
        let kv = MemStore::new();
        let base = note_base();
        kv.update(|tx| base.init(tx)).unwrap();

        let err = kv
            .update(|tx| base.put(tx, &note_ent(0, "bad")))
            .unwrap_err();
        assert!(matches!(err, StoreError::Encoding { .. }));
    }

    #[test]
    fn to_entity_restores_identity_fields() {
        let base = note_base();
        let note = Note {
            id: EntityId::new(7),
            text: "hello".to_string(),
        };

        let ent = base.to_entity(b"ignored", note.clone()).unwrap();
        assert_eq!(ent.id, note.id);
        assert_eq!(ent.name, note.text);
        assert_eq!(ent.body, Some(note));
    }

    #[test]
    fn find_against_uninitialized_bucket_errors() {
        let kv = MemStore::new();
        let base = note_base();

        let err = kv
            .view(|tx| base.find(tx, FindOpts::default(), |_, _| Ok(())))
            .unwrap_err();
        assert!(matches!(err, StoreError::Kv(_)));
    }
}
