//! Entity descriptor and identifier.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of an encoded entity ID in bytes.
pub const ID_LENGTH: usize = 8;

/// Unique identifier for an entity.
///
/// Entity IDs are non-zero 64-bit values. They encode as fixed-width
/// big-endian bytes, so lexicographic key order equals numeric order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Creates an entity ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns true for the zero (invalid) ID.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Encodes the ID as fixed-width big-endian bytes.
    ///
    /// The zero ID is not a valid identifier and fails to encode.
    pub fn encode(self) -> StoreResult<[u8; ID_LENGTH]> {
        if self.is_zero() {
            return Err(StoreError::encoding("entity id must be non-zero"));
        }
        Ok(self.0.to_be_bytes())
    }

    /// Decodes an ID from its big-endian byte representation.
    pub fn decode(bytes: &[u8]) -> StoreResult<Self> {
        let raw: [u8; ID_LENGTH] = bytes.try_into().map_err(|_| {
            StoreError::decoding(format!("id must be {ID_LENGTH} bytes, got {}", bytes.len()))
        })?;
        let id = Self(u64::from_be_bytes(raw));
        if id.is_zero() {
            return Err(StoreError::decoding("entity id must be non-zero"));
        }
        Ok(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// The caller-facing record descriptor passed into every store operation.
///
/// An entity carries identity fields plus an opaque body of type `T`.
/// Entities are transient; the store never retains them. The body may be
/// absent for operations that only need identity, such as delete-by-ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<T> {
    /// Primary identifier; the default key scheme encodes only this.
    pub id: EntityId,
    /// Owning-organization identifier, carried for caller use.
    pub org_id: EntityId,
    /// Human-readable label; not required to be unique.
    pub name: String,
    /// Opaque payload, stored as the encoded record value.
    pub body: Option<T>,
}

impl<T> Default for Entity<T> {
    fn default() -> Self {
        Self {
            id: EntityId::default(),
            org_id: EntityId::default(),
            name: String::new(),
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_through_bytes() {
        let id = EntityId::new(9000);
        let encoded = id.encode().unwrap();
        assert_eq!(encoded, [0, 0, 0, 0, 0, 0, 0x23, 0x28]);
        assert_eq!(EntityId::decode(&encoded).unwrap(), id);
    }

    #[test]
    fn encoded_ids_sort_numerically() {
        let low = EntityId::new(2).encode().unwrap();
        let high = EntityId::new(257).encode().unwrap();
        assert!(low < high);
    }

    #[test]
    fn zero_id_fails_to_encode() {
        let err = EntityId::new(0).encode().unwrap_err();
        assert!(matches!(err, StoreError::Encoding { .. }));
    }

    #[test]
    fn short_bytes_fail_to_decode() {
        let err = EntityId::decode(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, StoreError::Decoding { .. }));
    }
}
