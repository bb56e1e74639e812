//! Codec configuration for the entity store.
//!
//! A [`StoreBase`](crate::StoreBase) is configured with four functions:
//! a key encoder, a body encoder, a value decoder, and an entity
//! converter. The store's contract is defined entirely in terms of
//! calling them in a fixed order; it never inspects keys or bodies
//! itself. This module defines the function slots and provides the
//! common implementations: big-endian ID keys and JSON bodies.

use crate::entity::Entity;
use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes an entity into bucket key or value bytes.
pub type EncodeEntFn<T> = Box<dyn Fn(&Entity<T>) -> StoreResult<Vec<u8>> + Send + Sync>;

/// Decodes a raw `(key, value)` record into a typed value.
pub type DecodeValFn<T> = Box<dyn Fn(&[u8], &[u8]) -> StoreResult<T> + Send + Sync>;

/// Converts a decoded value back into a full entity.
pub type ConvertValFn<T> = Box<dyn Fn(&[u8], T) -> StoreResult<Entity<T>> + Send + Sync>;

/// Key encoder using the entity's ID as fixed-width big-endian bytes.
///
/// With this scheme, ascending key order is ascending numeric ID order.
#[must_use]
pub fn encode_id_key<T>() -> EncodeEntFn<T> {
    Box::new(|ent| Ok(ent.id.encode()?.to_vec()))
}

/// Body encoder serializing the entity body as JSON.
///
/// An entity without a body fails with an encoding error.
#[must_use]
pub fn encode_json_body<T: Serialize>() -> EncodeEntFn<T> {
    Box::new(|ent| {
        let body = ent
            .body
            .as_ref()
            .ok_or_else(|| StoreError::encoding("entity has no body to encode"))?;
        serde_json::to_vec(body).map_err(|e| StoreError::encoding(e.to_string()))
    })
}

/// Value decoder deserializing a stored JSON value.
#[must_use]
pub fn decode_json_val<T: DeserializeOwned>() -> DecodeValFn<T> {
    Box::new(|_key, val| {
        serde_json::from_slice(val).map_err(|e| StoreError::decoding(e.to_string()))
    })
}
