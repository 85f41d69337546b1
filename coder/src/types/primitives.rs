//! Coders for padding, raw bytes, numbers and booleans.
//!
//! # Fixed-size numbers
//!
//! Every numeric coder reads and writes a fixed number of bytes (the width of the Rust type) in
//! the byte order chosen when the coder is constructed. Signed integers use two's complement and
//! floats use IEEE-754, exactly as the native `to_be_bytes`/`to_le_bytes` representations.

use crate::{Coder, Cursor, Endian, Error, FixedSize};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::marker::PhantomData;

/// Skips `len` bytes when decoding and writes `len` zero bytes when encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pad {
    len: usize,
}

impl Pad {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Coder for Pad {
    type Value = ();

    #[inline]
    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<(), Error> {
        cursor.advance(buf, self.len)
    }

    #[inline]
    fn encode(&self, _: &()) -> Result<Bytes, Error> {
        Ok(Bytes::from(vec![0u8; self.len]))
    }
}

/// Reads and writes exactly `len` uninterpreted bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Raw {
    len: usize,
}

impl Raw {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Coder for Raw {
    type Value = Bytes;

    #[inline]
    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<Bytes, Error> {
        Ok(Bytes::copy_from_slice(cursor.take(buf, self.len)?))
    }

    #[inline]
    fn encode(&self, value: &Bytes) -> Result<Bytes, Error> {
        if value.len() != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: value.len(),
            });
        }
        Ok(value.clone())
    }
}

/// A fixed-width number that can be read and written in either byte order.
pub trait Number: Copy {
    /// The width of the number in bytes.
    const SIZE: usize;

    /// Interprets the first [Number::SIZE] bytes of `buf`.
    ///
    /// Panics if `buf` is shorter than [Number::SIZE].
    fn get(buf: &[u8], endian: Endian) -> Self;

    /// Appends the number to `buf`.
    fn put(self, buf: &mut impl BufMut, endian: Endian);
}

// Numeric types implementation
macro_rules! impl_number {
    ($type:ty, $get:ident, $get_le:ident, $put:ident, $put_le:ident) => {
        impl Number for $type {
            const SIZE: usize = std::mem::size_of::<$type>();

            #[inline]
            fn get(mut buf: &[u8], endian: Endian) -> Self {
                match endian {
                    Endian::Big => buf.$get(),
                    Endian::Little => buf.$get_le(),
                }
            }

            #[inline]
            fn put(self, buf: &mut impl BufMut, endian: Endian) {
                match endian {
                    Endian::Big => buf.$put(self),
                    Endian::Little => buf.$put_le(self),
                }
            }
        }
    };
}

impl_number!(u8, get_u8, get_u8, put_u8, put_u8);
impl_number!(u16, get_u16, get_u16_le, put_u16, put_u16_le);
impl_number!(u32, get_u32, get_u32_le, put_u32, put_u32_le);
impl_number!(u64, get_u64, get_u64_le, put_u64, put_u64_le);
impl_number!(i8, get_i8, get_i8, put_i8, put_i8);
impl_number!(i16, get_i16, get_i16_le, put_i16, put_i16_le);
impl_number!(i32, get_i32, get_i32_le, put_i32, put_i32_le);
impl_number!(i64, get_i64, get_i64_le, put_i64, put_i64_le);
impl_number!(f32, get_f32, get_f32_le, put_f32, put_f32_le);
impl_number!(f64, get_f64, get_f64_le, put_f64, put_f64_le);

/// An unsigned number used as a length prefix.
pub trait Prefix: Number {
    /// Converts the decoded prefix into a length.
    fn to_len(self) -> usize;

    /// Converts a length into a prefix, failing if it does not fit.
    fn from_len(len: usize) -> Result<Self, Error>;
}

macro_rules! impl_prefix {
    ($type:ty) => {
        impl Prefix for $type {
            #[inline]
            fn to_len(self) -> usize {
                // Lossless on every target with at least 32-bit pointers.
                self as usize
            }

            #[inline]
            fn from_len(len: usize) -> Result<Self, Error> {
                <$type>::try_from(len).map_err(|_| Error::LengthExceeded(len, <$type>::MAX as usize))
            }
        }
    };
}

impl_prefix!(u8);
impl_prefix!(u16);
impl_prefix!(u32);

/// Coder for a fixed-width number of type `T` in a configured byte order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Num<T> {
    endian: Endian,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Number> Num<T> {
    pub fn new(endian: Endian) -> Self {
        Self {
            endian,
            _phantom: PhantomData,
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }
}

impl<T: Number> FixedSize for Num<T> {
    const SIZE: usize = T::SIZE;
}

impl<T: Number> Coder for Num<T> {
    type Value = T;

    #[inline]
    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<T, Error> {
        Ok(T::get(cursor.take(buf, T::SIZE)?, self.endian))
    }

    #[inline]
    fn encode(&self, value: &T) -> Result<Bytes, Error> {
        let mut buf = BytesMut::with_capacity(T::SIZE);
        value.put(&mut buf, self.endian);
        Ok(buf.freeze())
    }
}

pub type U8 = Num<u8>;
pub type U16 = Num<u16>;
pub type U32 = Num<u32>;
pub type U64 = Num<u64>;
pub type I8 = Num<i8>;
pub type I16 = Num<i16>;
pub type I32 = Num<i32>;
pub type I64 = Num<i64>;
pub type F32 = Num<f32>;
pub type F64 = Num<f64>;

/// Coder for a boolean stored as a single byte: `0x00` is false and `0x01` is true.
///
/// Any other byte fails to decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bool;

impl FixedSize for Bool {
    const SIZE: usize = 1;
}

impl Coder for Bool {
    type Value = bool;

    #[inline]
    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<bool, Error> {
        match U8::default().read(buf, cursor)? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(Error::InvalidBool(byte)),
        }
    }

    #[inline]
    fn encode(&self, value: &bool) -> Result<Bytes, Error> {
        U8::default().encode(&u8::from(*value))
    }
}
