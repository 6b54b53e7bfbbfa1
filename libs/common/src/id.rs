//! Opaque entity identifiers
//!
//! Every persisted row is addressed by a 24-character lowercase hex token
//! (12 raw bytes). Externally supplied identifier strings must pass through
//! [`ObjectId::parse`] before they reach any store call, so malformed ids
//! fail fast without touching the database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Raw byte length of an identifier.
pub const ID_BYTES: usize = 12;

/// Length of the hex form accepted from callers.
pub const ID_HEX_LEN: usize = 2 * ID_BYTES;

/// Error returned when an externally supplied identifier string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidId {
    /// The identifier string was empty.
    #[error("identifier is empty")]
    Empty,

    /// The identifier string had the wrong length.
    #[error("identifier must be {ID_HEX_LEN} hex characters, got {0}")]
    WrongLength(usize),

    /// The identifier string contained non-hex characters.
    #[error("identifier contains non-hex characters")]
    NotHex,
}

/// A validated opaque entity identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ID_BYTES]);

impl ObjectId {
    /// Validate and normalize an externally supplied identifier string.
    ///
    /// Accepts exactly `ID_HEX_LEN` hex characters, either case; anything
    /// else is rejected before any store access happens.
    pub fn parse(input: &str) -> Result<Self, InvalidId> {
        if input.is_empty() {
            return Err(InvalidId::Empty);
        }
        if input.len() != ID_HEX_LEN {
            return Err(InvalidId::WrongLength(input.len()));
        }

        let mut bytes = [0u8; ID_BYTES];
        hex::decode_to_slice(input, &mut bytes).map_err(|_| InvalidId::NotHex)?;
        Ok(Self(bytes))
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(rand::random())
    }

    /// Lowercase hex form of the identifier.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
