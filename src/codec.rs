//! Binary wire format shared by embeddings, property values and identifier sets
//!
//! All integers are big-endian. Lengths and counts are encoded as `int32`,
//! identifiers as 16 raw bytes.

use crate::graph::Identifier;
use bytes::{Buf, BufMut};
use thiserror::Error;

/// Wire format errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended before the record was complete
    #[error("Incomplete data")]
    Incomplete,

    /// Unknown property value type tag
    #[error("Invalid property type tag: {0}")]
    InvalidTag(u8),

    /// String payload is not valid UTF-8
    #[error("Invalid UTF-8 in string payload")]
    InvalidUtf8,

    /// A length or count field was negative
    #[error("Negative length: {0}")]
    NegativeLength(i32),

    /// Arrays and maps nested deeper than the decoder accepts
    #[error("Nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Deepest array/map nesting accepted when decoding a property value
pub const MAX_NESTING: usize = 64;

pub(crate) fn ensure(buf: &impl Buf, needed: usize) -> CodecResult<()> {
    if buf.remaining() < needed {
        return Err(CodecError::Incomplete);
    }
    Ok(())
}

pub(crate) fn put_len(buf: &mut impl BufMut, len: usize) {
    buf.put_i32(len as i32);
}

pub(crate) fn get_len(buf: &mut impl Buf) -> CodecResult<usize> {
    ensure(buf, 4)?;
    let len = buf.get_i32();
    if len < 0 {
        return Err(CodecError::NegativeLength(len));
    }
    Ok(len as usize)
}

pub(crate) fn put_identifier(buf: &mut impl BufMut, id: Identifier) {
    buf.put_slice(&id.to_bytes());
}

pub(crate) fn get_identifier(buf: &mut impl Buf) -> CodecResult<Identifier> {
    ensure(buf, Identifier::BYTES)?;
    let mut raw = [0u8; Identifier::BYTES];
    buf.copy_to_slice(&mut raw);
    Ok(Identifier::from_bytes(raw))
}

pub(crate) fn put_string(buf: &mut impl BufMut, s: &str) {
    put_len(buf, s.len());
    buf.put_slice(s.as_bytes());
}

pub(crate) fn get_string(buf: &mut impl Buf) -> CodecResult<String> {
    let len = get_len(buf)?;
    ensure(buf, len)?;
    let mut raw = vec![0u8; len];
    buf.copy_to_slice(&mut raw);
    String::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8)
}
