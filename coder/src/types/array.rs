//! Coders for sequences of values.

use crate::{
    types::primitives::{Num, Prefix},
    util::merge,
    Coder, Cursor, Endian, Error, RangeCfg,
};
use bytes::Bytes;

fn read_elements<C: Coder>(
    coder: &C,
    len: usize,
    buf: &[u8],
    cursor: &mut Cursor,
) -> Result<Vec<C::Value>, Error> {
    // Never trust `len` for allocation beyond what the buffer could hold.
    let mut values = Vec::with_capacity(len.min(cursor.remaining(buf)));
    for _ in 0..len {
        values.push(coder.read(buf, cursor)?);
    }
    Ok(values)
}

fn encode_elements<C: Coder>(
    coder: &C,
    values: &[C::Value],
    prefix: Option<Bytes>,
) -> Result<Bytes, Error> {
    let mut chunks = Vec::with_capacity(values.len() + 1);
    chunks.extend(prefix);
    for value in values {
        chunks.push(coder.encode(value)?);
    }
    Ok(merge(chunks))
}

/// Exactly `len` values, each encoded with the element coder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Array<C> {
    len: usize,
    coder: C,
}

impl<C: Coder> Array<C> {
    pub fn new(len: usize, coder: C) -> Self {
        Self { len, coder }
    }
}

impl<C: Coder> Coder for Array<C> {
    type Value = Vec<C::Value>;

    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<Self::Value, Error> {
        read_elements(&self.coder, self.len, buf, cursor)
    }

    fn encode(&self, value: &Self::Value) -> Result<Bytes, Error> {
        if value.len() != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: value.len(),
            });
        }
        encode_elements(&self.coder, value, None)
    }
}

/// Values preceded by their count, stored as a `P`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LenArray<P, C> {
    prefix: Num<P>,
    coder: C,
    range: RangeCfg,
}

impl<P: Prefix, C: Coder> LenArray<P, C> {
    /// Creates a coder whose count is written in `endian` byte order.
    pub fn new(coder: C, endian: Endian) -> Self {
        Self {
            prefix: Num::new(endian),
            coder,
            range: RangeCfg::default(),
        }
    }

    /// Rejects (when decoding) counts outside `range`.
    pub fn with_range(mut self, range: impl Into<RangeCfg>) -> Self {
        self.range = range.into();
        self
    }
}

impl<P: Prefix, C: Coder> Coder for LenArray<P, C> {
    type Value = Vec<C::Value>;

    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<Self::Value, Error> {
        let len = self.prefix.read(buf, cursor)?.to_len();
        if !self.range.contains(len) {
            return Err(Error::InvalidLength(len));
        }
        read_elements(&self.coder, len, buf, cursor)
    }

    fn encode(&self, value: &Self::Value) -> Result<Bytes, Error> {
        let prefix = self.prefix.encode(&P::from_len(value.len())?)?;
        encode_elements(&self.coder, value, Some(prefix))
    }
}

pub type U8LenArray<C> = LenArray<u8, C>;
pub type U16LenArray<C> = LenArray<u16, C>;
pub type U32LenArray<C> = LenArray<u32, C>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        primitives::{Bool, U16, U32, U8},
        string::NulStr,
    };

    #[test]
    fn test_array_of_u8() {
        for values in [vec![], vec![0u8], vec![0, 6, 255, 54]] {
            let len = values.len();
            assert_eq!(
                Array::new(len + 1, U8::default()).encode(&values),
                Err(Error::LengthMismatch {
                    expected: len + 1,
                    actual: len
                })
            );

            let encoded = Array::new(len, U8::default()).encode(&values).unwrap();
            assert_eq!(encoded.len(), len);
            assert!(matches!(
                Array::new(len + 1, U8::default()).decode(&encoded),
                Err(Error::OutOfRange { .. })
            ));

            let mut cursor = Cursor::default();
            let decoded = Array::new(len, U8::default())
                .read(&encoded, &mut cursor)
                .unwrap();
            assert_eq!(decoded, values);
            assert_eq!(cursor.index(), encoded.len());
        }
    }

    #[test]
    fn test_array_of_u16() {
        let values = vec![543u16, 234, 65535, 44362, 0];
        let coder = Array::new(values.len(), U16::new(Endian::Little));
        let encoded = coder.encode(&values).unwrap();
        assert_eq!(encoded.len(), 2 * values.len());
        assert_eq!(&encoded[..2], &543u16.to_le_bytes());
        assert_eq!(coder.decode(&encoded).unwrap(), values);
    }

    #[test]
    fn test_array_wrong_length() {
        assert_eq!(
            Array::new(3, U32::default()).encode(&vec![1, 2]),
            Err(Error::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_array_element_failure() {
        // The second element is not a valid bool, so the whole array fails
        let buf = [1u8, 7, 0];
        assert_eq!(
            Array::new(3, Bool).decode(&buf),
            Err(Error::InvalidBool(7))
        );
    }

    #[test]
    fn test_nested_array() {
        let values = vec![vec![1u8, 2], vec![3, 4], vec![5, 6]];
        let coder = Array::new(3, Array::new(2, U8::default()));
        let encoded = coder.encode(&values).unwrap();
        assert_eq!(encoded, &[1, 2, 3, 4, 5, 6][..]);
        assert_eq!(coder.decode(&encoded).unwrap(), values);
    }

    #[test]
    fn test_len_array() {
        let values = vec![543u16, 234, 65535];

        let coder = U8LenArray::new(U16::default(), Endian::Big);
        let encoded = coder.encode(&values).unwrap();
        assert_eq!(encoded.len(), 1 + 2 * values.len());
        assert_eq!(encoded[0], 3);
        let mut cursor = Cursor::default();
        assert_eq!(coder.read(&encoded, &mut cursor).unwrap(), values);
        assert_eq!(cursor.index(), encoded.len());

        let coder = U16LenArray::new(U16::default(), Endian::Big);
        let encoded = coder.encode(&values).unwrap();
        assert_eq!(&encoded[..2], &[0, 3]);
        assert_eq!(coder.decode(&encoded).unwrap(), values);

        let coder = U32LenArray::new(U16::default(), Endian::Little);
        let encoded = coder.encode(&values).unwrap();
        assert_eq!(&encoded[..4], &[3, 0, 0, 0]);
        let mut cursor = Cursor::default();
        assert_eq!(coder.read(&encoded, &mut cursor).unwrap(), values);
        assert_eq!(cursor.index(), 4 + 2 * values.len());
    }

    #[test]
    fn test_len_array_empty() {
        let coder = U16LenArray::new(NulStr, Endian::Big);
        let encoded = coder.encode(&vec![]).unwrap();
        assert_eq!(encoded, &[0, 0][..]);
        assert!(coder.decode(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_len_array_of_strings() {
        let values = vec!["a".to_string(), String::new(), "xyz".to_string()];
        let coder = U8LenArray::new(NulStr, Endian::Big);
        let encoded = coder.encode(&values).unwrap();
        assert_eq!(encoded, &[3, b'a', 0, 0, b'x', b'y', b'z', 0][..]);
        assert_eq!(coder.decode(&encoded).unwrap(), values);
    }

    #[test]
    fn test_len_array_too_long() {
        let values = vec![0u8; 256];
        assert_eq!(
            U8LenArray::new(U8::default(), Endian::Big).encode(&values),
            Err(Error::LengthExceeded(256, 255))
        );
    }

    #[test]
    fn test_len_array_range() {
        // Count claims far more elements than the buffer holds
        let buf = [0xFFu8, 0xFF, 0xFF, 0xFF, 1];
        let coder = U32LenArray::new(U8::default(), Endian::Big);
        assert!(matches!(coder.decode(&buf), Err(Error::OutOfRange { .. })));

        let coder = coder.with_range(..=16);
        assert_eq!(
            coder.decode(&buf),
            Err(Error::InvalidLength(u32::MAX as usize))
        );
    }
}
