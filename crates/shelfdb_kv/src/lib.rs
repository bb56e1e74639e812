//! # shelfdb KV
//!
//! Transactional ordered key-value contract for shelfdb.
//!
//! This crate defines the narrow contract the entity layer consumes:
//!
//! - [`Store`] - runs read and write transactions
//! - [`Tx`] - opens buckets within a transaction
//! - [`Bucket`] - get/put/delete plus ordered cursors over raw records
//!
//! Buckets are named, ordered byte-key namespaces. Keys within a bucket
//! sort lexicographically, and that byte order is the only ordering
//! primitive exposed; a cursor walks it forward or backward.
//!
//! ## Available engines
//!
//! - [`MemStore`] - in-memory engine for tests and ephemeral data
//!
//! ## Example
//!
//! ```rust
//! use shelfdb_kv::{Bucket, KvError, MemStore, Store, Tx};
//!
//! let store = MemStore::new();
//! store
//!     .update(|tx| {
//!         tx.create_bucket_if_not_exists(b"widgets")?;
//!         tx.bucket(b"widgets")?.put(b"k1", b"v1")?;
//!         Ok::<_, KvError>(())
//!     })
//!     .unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod traits;

pub use error::{KvError, KvResult};
pub use memory::{MemBucket, MemCursor, MemStore, MemTx};
pub use traits::{Bucket, CursorDirection, Store, Tx};
