//! Identifier sets
//!
//! Duplicate-free, unordered collections of [`Identifier`]s used for graph
//! membership and distinctness bookkeeping. Membership is hash based; callers
//! must not rely on iteration order.
//!
//! An `IdentifierSet` assumes a single writer. Concurrent mutation has to be
//! serialized by the owner.

use super::types::Identifier;
use crate::codec::{self, CodecResult};
use bytes::{Buf, BufMut};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierSet {
    identifiers: FxHashSet<Identifier>,
}

impl IdentifierSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut identifiers = FxHashSet::default();
        identifiers.reserve(capacity);
        Self { identifiers }
    }

    /// Build a set from explicit identifiers
    pub fn from_existing(ids: &[Identifier]) -> Self {
        ids.iter().copied().collect()
    }

    /// Build a set from raw numeric ids (test and bootstrap convenience)
    pub fn from_longs(ids: &[u64]) -> Self {
        ids.iter().map(|&id| Identifier::from_long(id)).collect()
    }

    /// Add an identifier, returns false if it was already present
    pub fn add(&mut self, identifier: Identifier) -> bool {
        self.identifiers.insert(identifier)
    }

    /// Set union with another identifier set
    pub fn add_all(&mut self, other: &IdentifierSet) {
        self.identifiers.extend(other.identifiers.iter().copied());
    }

    /// Set union with an arbitrary collection of identifiers
    pub fn add_all_from<I>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = Identifier>,
    {
        self.identifiers.extend(identifiers);
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.identifiers.contains(identifier)
    }

    /// Subset test: true iff every identifier of `other` is contained
    pub fn contains_all(&self, other: &IdentifierSet) -> bool {
        other.identifiers.is_subset(&self.identifiers)
    }

    /// Subset test against an arbitrary collection of identifiers
    pub fn contains_all_from<'a, I>(&self, identifiers: I) -> bool
    where
        I: IntoIterator<Item = &'a Identifier>,
    {
        identifiers.into_iter().all(|id| self.identifiers.contains(id))
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Drop all contained identifiers
    pub fn clear(&mut self) {
        self.identifiers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.identifiers.iter()
    }

    /// Export the identifiers as an unordered collection
    pub fn to_vec(&self) -> Vec<Identifier> {
        self.identifiers.iter().copied().collect()
    }

    /// Write `[int32 count] count × [16-byte identifier]`
    pub fn write_to(&self, buf: &mut impl BufMut) {
        codec::put_len(buf, self.identifiers.len());
        for id in &self.identifiers {
            codec::put_identifier(buf, *id);
        }
    }

    pub fn read_from(buf: &mut impl Buf) -> CodecResult<Self> {
        let count = codec::get_len(buf)?;
        codec::ensure(buf, count.saturating_mul(Identifier::BYTES))?;
        let mut set = Self::with_capacity(count);
        for _ in 0..count {
            set.add(codec::get_identifier(buf)?);
        }
        Ok(set)
    }
}

impl FromIterator<Identifier> for IdentifierSet {
    fn from_iter<T: IntoIterator<Item = Identifier>>(iter: T) -> Self {
        Self {
            identifiers: iter.into_iter().collect(),
        }
    }
}

impl Extend<Identifier> for IdentifierSet {
    fn extend<T: IntoIterator<Item = Identifier>>(&mut self, iter: T) {
        self.identifiers.extend(iter);
    }
}

impl IntoIterator for IdentifierSet {
    type Item = Identifier;
    type IntoIter = std::collections::hash_set::IntoIter<Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.identifiers.into_iter()
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = &'a Identifier;
    type IntoIter = std::collections::hash_set::Iter<'a, Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.identifiers.iter()
    }
}
