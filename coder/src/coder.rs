//! Core coder trait

use crate::{Cursor, Error};
use bytes::Bytes;
use std::sync::Arc;

/// A paired decoder and encoder for values of type [Coder::Value].
///
/// Coders hold no per-call state: all transient decode state lives in the [Cursor] passed to
/// [Coder::read]. The same coder may therefore be reused (and shared between threads) for any
/// number of calls.
///
/// For any value `v` in the coder's domain, decoding the output of `encode(v)` from the position
/// where that output begins yields `v` again.
pub trait Coder {
    /// The type of value this coder produces and consumes.
    type Value;

    /// Reads a value from `buf` starting at `cursor`, advancing the cursor past every byte
    /// consumed.
    ///
    /// Returns an error if the value cannot be decoded (e.g. not enough bytes, invalid data). On
    /// error, the cursor position is unspecified.
    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<Self::Value, Error>;

    /// Encodes `value` into a new buffer.
    ///
    /// Returns an error if `value` does not satisfy the coder's constraints (e.g. a fixed length).
    fn encode(&self, value: &Self::Value) -> Result<Bytes, Error>;

    /// Reads a value from the start of `buf`.
    ///
    /// Bytes following the value are ignored.
    ///
    /// (Provided method).
    fn decode(&self, buf: &[u8]) -> Result<Self::Value, Error> {
        let mut cursor = Cursor::default();
        self.read(buf, &mut cursor)
    }
}

impl<C: Coder + ?Sized> Coder for &C {
    type Value = C::Value;

    #[inline]
    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<Self::Value, Error> {
        (**self).read(buf, cursor)
    }

    #[inline]
    fn encode(&self, value: &Self::Value) -> Result<Bytes, Error> {
        (**self).encode(value)
    }
}

impl<C: Coder + ?Sized> Coder for Arc<C> {
    type Value = C::Value;

    #[inline]
    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<Self::Value, Error> {
        (**self).read(buf, cursor)
    }

    #[inline]
    fn encode(&self, value: &Self::Value) -> Result<Bytes, Error> {
        (**self).encode(value)
    }
}

/// Trait for coders whose encoding always occupies the same number of bytes.
pub trait FixedSize {
    /// The length of the encoded value.
    const SIZE: usize;
}
