//! Property value types for vertices, edges and embeddings
//!
//! Equality is type-and-value: two values of different kinds are never equal
//! and have no ordering, so an `Integer(42)` never joins with a `Float(42.0)`.
//! Floats compare by bit pattern, which keeps equality reflexive and lets
//! values serve as hash-join keys.

use crate::codec::{self, CodecError, CodecResult};
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Property value type supporting multiple data types
///
/// Supports:
/// - String
/// - Integer (i64)
/// - Float (f64)
/// - Boolean
/// - DateTime (as i64 timestamp)
/// - Array (Vec<PropertyValue>)
/// - Map (sorted by key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(i64), // Unix timestamp in milliseconds
    Array(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
    Null,
}

const TAG_NULL: u8 = 0;
const TAG_BOOLEAN: u8 = 1;
const TAG_INTEGER: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_STRING: u8 = 4;
const TAG_DATETIME: u8 = 5;
const TAG_ARRAY: u8 = 6;
const TAG_MAP: u8 = 7;

impl PropertyValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            PropertyValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<PropertyValue>> {
        match self {
            PropertyValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, PropertyValue>> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Boolean(_) => "Boolean",
            PropertyValue::DateTime(_) => "DateTime",
            PropertyValue::Array(_) => "Array",
            PropertyValue::Map(_) => "Map",
            PropertyValue::Null => "Null",
        }
    }

    fn tag(&self) -> u8 {
        match self {
            PropertyValue::Null => TAG_NULL,
            PropertyValue::Boolean(_) => TAG_BOOLEAN,
            PropertyValue::Integer(_) => TAG_INTEGER,
            PropertyValue::Float(_) => TAG_FLOAT,
            PropertyValue::String(_) => TAG_STRING,
            PropertyValue::DateTime(_) => TAG_DATETIME,
            PropertyValue::Array(_) => TAG_ARRAY,
            PropertyValue::Map(_) => TAG_MAP,
        }
    }

    /// Write `[1-byte type tag][type-specific payload]`
    pub fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.tag());
        match self {
            PropertyValue::Null => {}
            PropertyValue::Boolean(b) => buf.put_u8(u8::from(*b)),
            PropertyValue::Integer(i) => buf.put_i64(*i),
            PropertyValue::Float(f) => buf.put_u64(f.to_bits()),
            PropertyValue::String(s) => codec::put_string(buf, s),
            PropertyValue::DateTime(dt) => buf.put_i64(*dt),
            PropertyValue::Array(arr) => {
                codec::put_len(buf, arr.len());
                for value in arr {
                    value.write_to(buf);
                }
            }
            PropertyValue::Map(map) => {
                codec::put_len(buf, map.len());
                for (key, value) in map {
                    codec::put_string(buf, key);
                    value.write_to(buf);
                }
            }
        }
    }

    /// Read one value, rejecting arrays and maps nested deeper than
    /// [`MAX_NESTING`](codec::MAX_NESTING)
    pub fn read_from(buf: &mut impl Buf) -> CodecResult<Self> {
        Self::read_nested(buf, 0)
    }

    fn read_nested(buf: &mut impl Buf, depth: usize) -> CodecResult<Self> {
        codec::ensure(buf, 1)?;
        let tag = buf.get_u8();
        let value = match tag {
            TAG_NULL => PropertyValue::Null,
            TAG_BOOLEAN => {
                codec::ensure(buf, 1)?;
                PropertyValue::Boolean(buf.get_u8() != 0)
            }
            TAG_INTEGER => {
                codec::ensure(buf, 8)?;
                PropertyValue::Integer(buf.get_i64())
            }
            TAG_FLOAT => {
                codec::ensure(buf, 8)?;
                PropertyValue::Float(f64::from_bits(buf.get_u64()))
            }
            TAG_STRING => PropertyValue::String(codec::get_string(buf)?),
            TAG_DATETIME => {
                codec::ensure(buf, 8)?;
                PropertyValue::DateTime(buf.get_i64())
            }
            TAG_ARRAY | TAG_MAP if depth >= codec::MAX_NESTING => {
                return Err(CodecError::NestingTooDeep(codec::MAX_NESTING));
            }
            TAG_ARRAY => {
                let count = codec::get_len(buf)?;
                let mut arr = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    arr.push(PropertyValue::read_nested(buf, depth + 1)?);
                }
                PropertyValue::Array(arr)
            }
            TAG_MAP => {
                let count = codec::get_len(buf)?;
                let mut map = BTreeMap::new();
                for _ in 0..count {
                    let key = codec::get_string(buf)?;
                    map.insert(key, PropertyValue::read_nested(buf, depth + 1)?);
                }
                PropertyValue::Map(map)
            }
            other => return Err(CodecError::InvalidTag(other)),
        };
        Ok(value)
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyValue::String(l), PropertyValue::String(r)) => l == r,
            (PropertyValue::Integer(l), PropertyValue::Integer(r)) => l == r,
            (PropertyValue::Float(l), PropertyValue::Float(r)) => l.to_bits() == r.to_bits(),
            (PropertyValue::Boolean(l), PropertyValue::Boolean(r)) => l == r,
            (PropertyValue::DateTime(l), PropertyValue::DateTime(r)) => l == r,
            (PropertyValue::Array(l), PropertyValue::Array(r)) => l == r,
            (PropertyValue::Map(l), PropertyValue::Map(r)) => l == r,
            (PropertyValue::Null, PropertyValue::Null) => true,
            _ => false,
        }
    }
}

impl Eq for PropertyValue {}

impl Hash for PropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        match self {
            PropertyValue::String(s) => s.hash(state),
            PropertyValue::Integer(i) | PropertyValue::DateTime(i) => i.hash(state),
            PropertyValue::Float(f) => f.to_bits().hash(state),
            PropertyValue::Boolean(b) => b.hash(state),
            PropertyValue::Array(arr) => arr.hash(state),
            PropertyValue::Map(map) => map.hash(state),
            PropertyValue::Null => {}
        }
    }
}

/// Ordering is only defined between values of the same kind
impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (PropertyValue::String(l), PropertyValue::String(r)) => Some(l.cmp(r)),
            (PropertyValue::Integer(l), PropertyValue::Integer(r)) => Some(l.cmp(r)),
            (PropertyValue::Float(l), PropertyValue::Float(r)) => Some(l.total_cmp(r)),
            (PropertyValue::Boolean(l), PropertyValue::Boolean(r)) => Some(l.cmp(r)),
            (PropertyValue::DateTime(l), PropertyValue::DateTime(r)) => Some(l.cmp(r)),
            (PropertyValue::Array(l), PropertyValue::Array(r)) => l.partial_cmp(r),
            (PropertyValue::Map(l), PropertyValue::Map(r)) => l.partial_cmp(r),
            (PropertyValue::Null, PropertyValue::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::DateTime(dt) => write!(f, "DateTime({})", dt),
            PropertyValue::Array(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            PropertyValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, val)?;
                }
                write!(f, "}}")
            }
            PropertyValue::Null => write!(f, "null"),
        }
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(arr: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(arr)
    }
}

impl From<BTreeMap<String, PropertyValue>> for PropertyValue {
    fn from(map: BTreeMap<String, PropertyValue>) -> Self {
        PropertyValue::Map(map)
    }
}

/// Property map for storing vertex and edge properties
pub type PropertyMap = HashMap<String, PropertyValue>;
