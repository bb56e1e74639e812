//! # shelfdb Store
//!
//! Generic entity storage over an ordered, transactional key-value
//! engine.
//!
//! Many record types (users, organizations, buckets of configuration)
//! need the same storage plumbing: key encoding, CRUD, filtered bulk
//! deletion, and paginated ordered scans. [`StoreBase`] implements that
//! once, parameterized by a bucket name and four caller-supplied codec
//! functions, on top of the narrow transactional contract from
//! [`shelfdb_kv`].
//!
//! The store never opens transactions of its own: callers run a
//! transaction on the engine and pass its handle into every operation.
//! Data flows `Entity -> (encode) -> raw record -> bucket` on the way
//! in, and `bucket -> raw record -> (decode) -> value -> (convert) ->
//! Entity` on the way out.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod entity;
mod error;
mod store;

pub use codec::{
    decode_json_val, encode_id_key, encode_json_body, ConvertValFn, DecodeValFn, EncodeEntFn,
};
pub use entity::{Entity, EntityId, ID_LENGTH};
pub use error::{StoreError, StoreResult};
pub use store::{FilterFn, FindOpts, StoreBase};
