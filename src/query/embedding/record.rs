//! Embedding records flowing through the plan tree
//!
//! An embedding is one (partial) occurrence of the pattern: a positional row
//! of entry columns (graph element identifiers) followed by a positional row
//! of property columns. Names and entry types live in the
//! [`EmbeddingMetaData`](super::EmbeddingMetaData) of the producing node.
//!
//! Wire layout:
//!
//! ```text
//! [int32 entryCount]    entryCount × [16-byte identifier]
//! [int32 propertyCount] propertyCount × [1-byte tag][payload]
//! ```

use crate::codec::{self, CodecResult};
use crate::graph::{Identifier, PropertyValue};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Embedding {
    ids: Vec<Identifier>,
    properties: Vec<PropertyValue>,
}

impl Embedding {
    /// Create an empty embedding
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(ids: Vec<Identifier>, properties: Vec<PropertyValue>) -> Self {
        Self { ids, properties }
    }

    /// Append an entry column
    pub fn add(&mut self, id: Identifier) {
        self.ids.push(id);
    }

    /// Append property columns
    pub fn add_properties<I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = PropertyValue>,
    {
        self.properties.extend(properties);
    }

    /// Identifier stored in an entry column
    pub fn id(&self, column: usize) -> Option<Identifier> {
        self.ids.get(column).copied()
    }

    /// All entry column identifiers in column order
    pub fn all_ids(&self) -> &[Identifier] {
        &self.ids
    }

    pub fn property(&self, column: usize) -> Option<&PropertyValue> {
        self.properties.get(column)
    }

    pub fn properties(&self) -> &[PropertyValue] {
        &self.properties
    }

    pub fn entry_count(&self) -> usize {
        self.ids.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Left entries then right entries; left properties then right properties.
    pub fn concat(&self, right: &Embedding) -> Embedding {
        let mut ids = Vec::with_capacity(self.ids.len() + right.ids.len());
        ids.extend_from_slice(&self.ids);
        ids.extend_from_slice(&right.ids);

        let mut properties = Vec::with_capacity(self.properties.len() + right.properties.len());
        properties.extend_from_slice(&self.properties);
        properties.extend_from_slice(&right.properties);

        Embedding { ids, properties }
    }

    /// Copy of this embedding without the given entry columns and property
    /// columns. Remaining columns keep their relative order.
    pub fn without_columns(&self, entry_columns: &[usize], property_columns: &[usize]) -> Embedding {
        let ids = self
            .ids
            .iter()
            .enumerate()
            .filter(|(i, _)| !entry_columns.contains(i))
            .map(|(_, id)| *id)
            .collect();
        let properties = self
            .properties
            .iter()
            .enumerate()
            .filter(|(i, _)| !property_columns.contains(i))
            .map(|(_, p)| p.clone())
            .collect();
        Embedding { ids, properties }
    }

    /// Copy of this embedding keeping only the listed property columns, in
    /// the listed order. Out-of-range columns yield `Null`.
    pub fn project_properties(&self, columns: &[usize]) -> Embedding {
        let properties = columns
            .iter()
            .map(|&c| self.properties.get(c).cloned().unwrap_or(PropertyValue::Null))
            .collect();
        Embedding {
            ids: self.ids.clone(),
            properties,
        }
    }

    pub fn write_to(&self, buf: &mut impl BufMut) {
        codec::put_len(buf, self.ids.len());
        for id in &self.ids {
            codec::put_identifier(buf, *id);
        }
        codec::put_len(buf, self.properties.len());
        for property in &self.properties {
            property.write_to(buf);
        }
    }

    pub fn read_from(buf: &mut impl Buf) -> CodecResult<Self> {
        let entry_count = codec::get_len(buf)?;
        codec::ensure(buf, entry_count.saturating_mul(Identifier::BYTES))?;
        let mut ids = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            ids.push(codec::get_identifier(buf)?);
        }

        let property_count = codec::get_len(buf)?;
        let mut properties = Vec::with_capacity(property_count.min(buf.remaining()));
        for _ in 0..property_count {
            properties.push(PropertyValue::read_from(buf)?);
        }
        Ok(Embedding { ids, properties })
    }

    /// Serialize into a fresh buffer
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.write_to(&mut buf);
        buf.freeze()
    }

    pub fn decode(mut bytes: &[u8]) -> CodecResult<Self> {
        Self::read_from(&mut bytes)
    }
}

impl fmt::Display for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Embedding{{ids=[")?;
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "], properties=[")?;
        for (i, p) in self.properties.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "]}}")
    }
}
