//! # Wire Reader
//!
//! Fixed-offset, little-endian field access over a borrowed payload.
//!
//! Layouts in this protocol are struct-shaped: every field sits at a documented
//! offset. Rather than overlaying a struct on the buffer, decoders construct a
//! [`WireReader`] that checks the payload against the full layout size once and
//! then reads individual fields by offset.

use crate::error::{NetworkError, Result};
use bytes::Buf;

/// Bounds-validated view over a message payload
#[derive(Debug, Clone, Copy)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    /// Wrap `buf`, requiring at least `required` bytes for layout `kind`
    pub fn new(buf: &'a [u8], kind: &'static str, required: usize) -> Result<Self> {
        if buf.len() < required {
            return Err(NetworkError::Truncated {
                kind,
                needed: required,
                actual: buf.len(),
            });
        }
        Ok(Self { buf })
    }

    #[inline]
    fn tail(&self, offset: usize) -> &'a [u8] {
        &self.buf[offset..]
    }

    #[inline]
    pub fn u8_at(&self, offset: usize) -> u8 {
        self.buf[offset]
    }

    #[inline]
    pub fn u16_at(&self, offset: usize) -> u16 {
        self.tail(offset).get_u16_le()
    }

    #[inline]
    pub fn u32_at(&self, offset: usize) -> u32 {
        self.tail(offset).get_u32_le()
    }

    #[inline]
    pub fn i32_at(&self, offset: usize) -> i32 {
        self.tail(offset).get_i32_le()
    }

    #[inline]
    pub fn u64_at(&self, offset: usize) -> u64 {
        self.tail(offset).get_u64_le()
    }

    #[inline]
    pub fn f32_at(&self, offset: usize) -> f32 {
        self.tail(offset).get_f32_le()
    }

    /// Element `index` of a packed `u32`/`i32` array starting at `offset`
    #[inline]
    pub fn i32_elem(&self, offset: usize, index: usize) -> i32 {
        self.i32_at(offset + index * 4)
    }

    /// Element `index` of a packed `u64` array starting at `offset`
    #[inline]
    pub fn u64_elem(&self, offset: usize, index: usize) -> u64 {
        self.u64_at(offset + index * 8)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// First eight payload bytes as a little-endian word, if present
pub fn peek_u64(buf: &[u8]) -> Option<u64> {
    let mut head = buf.get(..8)?;
    Some(head.get_u64_le())
}
