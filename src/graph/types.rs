//! Core type definitions for the matching engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique handle of a stored vertex, edge or logical graph.
///
/// Identifiers are 128 bits wide and travel as 16 big-endian bytes on the
/// wire. Fresh identifiers come from [`Identifier::get`]; tests and bootstrap
/// code can derive deterministic ones with [`Identifier::from_long`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Identifier(u128);

impl Identifier {
    /// Size of the binary representation in bytes
    pub const BYTES: usize = 16;

    /// Generate a new random identifier
    pub fn get() -> Self {
        Identifier(uuid::Uuid::new_v4().as_u128())
    }

    /// Build an identifier from a raw numeric id
    pub fn from_long(id: u64) -> Self {
        Identifier(u128::from(id))
    }

    pub fn from_u128(id: u128) -> Self {
        Identifier(id)
    }

    pub fn as_u128(&self) -> u128 {
        self.0
    }

    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_be_bytes()
    }

    pub fn from_bytes(bytes: [u8; Self::BYTES]) -> Self {
        Identifier(u128::from_be_bytes(bytes))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Identifier::from_long(id)
    }
}

/// Kind of graph element bound to an entry column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Vertex,
    Edge,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Vertex => write!(f, "VERTEX"),
            EntryType::Edge => write!(f, "EDGE"),
        }
    }
}
