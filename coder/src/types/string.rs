//! Coders for UTF-8 text.
//!
//! Decoding never fails on malformed UTF-8: invalid sequences are replaced with
//! `U+FFFD REPLACEMENT CHARACTER`. All lengths are byte lengths of the UTF-8 encoding, not
//! character counts.

use crate::{
    types::primitives::{Num, Prefix},
    util::merge,
    Coder, Cursor, Endian, Error, RangeCfg,
};
use bytes::Bytes;

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Text occupying exactly `len` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Str {
    len: usize,
}

impl Str {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Coder for Str {
    type Value = String;

    #[inline]
    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<String, Error> {
        Ok(lossy(cursor.take(buf, self.len)?))
    }

    #[inline]
    fn encode(&self, value: &String) -> Result<Bytes, Error> {
        if value.len() != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: value.len(),
            });
        }
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }
}

/// Text followed by a single `0x00` terminator.
///
/// When decoding, text that runs to the end of the buffer without a terminator is accepted and
/// the cursor stops at the end of the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NulStr;

impl Coder for NulStr {
    type Value = String;

    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<String, Error> {
        let start = cursor.index();
        let rest = buf.get(start..).ok_or(Error::OutOfRange {
            index: start,
            len: buf.len(),
        })?;
        match rest.iter().position(|&b| b == 0x00) {
            Some(nul) => {
                cursor.set(start + nul + 1);
                Ok(lossy(&rest[..nul]))
            }
            None => {
                cursor.set(buf.len());
                Ok(lossy(rest))
            }
        }
    }

    fn encode(&self, value: &String) -> Result<Bytes, Error> {
        if let Some(offset) = value.bytes().position(|b| b == 0x00) {
            return Err(Error::EmbeddedNul(offset));
        }
        Ok(merge([value.as_bytes(), &[0x00][..]]))
    }
}

/// Text preceded by its byte length, stored as a `P`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LenStr<P> {
    prefix: Num<P>,
    range: RangeCfg,
}

impl<P: Prefix> LenStr<P> {
    pub fn new(endian: Endian) -> Self {
        Self {
            prefix: Num::new(endian),
            range: RangeCfg::default(),
        }
    }

    /// Rejects (when decoding) byte lengths outside `range`.
    pub fn with_range(mut self, range: impl Into<RangeCfg>) -> Self {
        self.range = range.into();
        self
    }
}

impl<P: Prefix> Default for LenStr<P> {
    fn default() -> Self {
        Self::new(Endian::default())
    }
}

impl<P: Prefix> Coder for LenStr<P> {
    type Value = String;

    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<String, Error> {
        let len = self.prefix.read(buf, cursor)?.to_len();
        if !self.range.contains(len) {
            return Err(Error::InvalidLength(len));
        }
        Str::new(len).read(buf, cursor)
    }

    fn encode(&self, value: &String) -> Result<Bytes, Error> {
        let prefix = self.prefix.encode(&P::from_len(value.len())?)?;
        Ok(merge([&prefix[..], value.as_bytes()]))
    }
}

pub type U8LenStr = LenStr<u8>;
pub type U16LenStr = LenStr<u16>;
pub type U32LenStr = LenStr<u32>;

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Hello, world! Here are some special characters: ÅÄÖ地拖弓늄넉깽ぞむさタヨセЯИДБ";

    fn text() -> String {
        TEXT.to_string()
    }

    #[test]
    fn test_str() {
        let len = TEXT.len();
        assert_eq!(
            Str::new(0).encode(&text()),
            Err(Error::LengthMismatch {
                expected: 0,
                actual: len
            })
        );
        assert!(matches!(
            Str::new(TEXT.chars().count()).encode(&text()),
            Err(Error::LengthMismatch { .. })
        ));

        let encoded = Str::new(len).encode(&text()).unwrap();
        assert_eq!(encoded, TEXT.as_bytes());
        let mut cursor = Cursor::default();
        assert_eq!(Str::new(len).read(&encoded, &mut cursor).unwrap(), TEXT);
        assert_eq!(cursor.index(), len);

        assert!(matches!(
            Str::new(len + 1).decode(&encoded),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_str_lossy() {
        let decoded = Str::new(3).decode(&[b'a', 0xFF, b'b']).unwrap();
        assert_eq!(decoded, "a\u{FFFD}b");
    }

    #[test]
    fn test_nul_str() {
        let encoded = NulStr.encode(&"Test".to_string()).unwrap();
        assert_eq!(encoded, &[84, 101, 115, 116, 0][..]);
        let mut cursor = Cursor::default();
        assert_eq!(NulStr.read(&encoded, &mut cursor).unwrap(), "Test");
        assert_eq!(cursor.index(), 5);

        let encoded = NulStr.encode(&text()).unwrap();
        assert_eq!(encoded.len(), TEXT.len() + 1);
        assert_eq!(NulStr.decode(&encoded).unwrap(), TEXT);
    }

    #[test]
    fn test_nul_str_sequence() {
        let buf = b"ab\0\0cd\0";
        let mut cursor = Cursor::default();
        assert_eq!(NulStr.read(buf, &mut cursor).unwrap(), "ab");
        assert_eq!(NulStr.read(buf, &mut cursor).unwrap(), "");
        assert_eq!(NulStr.read(buf, &mut cursor).unwrap(), "cd");
        assert_eq!(cursor.index(), buf.len());
    }

    #[test]
    fn test_nul_str_unterminated() {
        let buf = b"xyz";
        let mut cursor = Cursor::new(1);
        assert_eq!(NulStr.read(buf, &mut cursor).unwrap(), "yz");
        assert_eq!(cursor.index(), 3);

        // At the end of the buffer there is nothing left to read
        assert_eq!(NulStr.read(buf, &mut cursor).unwrap(), "");
        assert_eq!(cursor.index(), 3);

        let mut cursor = Cursor::new(4);
        assert!(matches!(
            NulStr.read(buf, &mut cursor),
            Err(Error::OutOfRange { index: 4, len: 3 })
        ));
    }

    #[test]
    fn test_nul_str_embedded_nul() {
        assert_eq!(
            NulStr.encode(&"ab\0c".to_string()),
            Err(Error::EmbeddedNul(2))
        );
    }

    #[test]
    fn test_len_str() {
        let len = TEXT.len();

        let encoded = U8LenStr::default().encode(&text()).unwrap();
        assert_eq!(encoded[0] as usize, len);
        assert_eq!(&encoded[1..], TEXT.as_bytes());
        let mut cursor = Cursor::default();
        assert_eq!(U8LenStr::default().read(&encoded, &mut cursor).unwrap(), TEXT);
        assert_eq!(cursor.index(), 1 + len);

        let encoded = U16LenStr::default().encode(&text()).unwrap();
        assert_eq!(&encoded[..2], &[0, len as u8]);
        assert_eq!(U16LenStr::default().decode(&encoded).unwrap(), TEXT);

        let encoded = U32LenStr::default().encode(&text()).unwrap();
        assert_eq!(&encoded[..4], &[0, 0, 0, len as u8]);
        let mut cursor = Cursor::default();
        assert_eq!(U32LenStr::default().read(&encoded, &mut cursor).unwrap(), TEXT);
        assert_eq!(cursor.index(), 4 + len);
    }

    #[test]
    fn test_len_str_little_endian() {
        let len = TEXT.len();
        let coder = U16LenStr::new(Endian::Little);
        let encoded = coder.encode(&text()).unwrap();
        assert_eq!(&encoded[..2], &[len as u8, 0]);
        assert_eq!(coder.decode(&encoded).unwrap(), TEXT);

        let coder = U32LenStr::new(Endian::Little);
        let encoded = coder.encode(&text()).unwrap();
        assert_eq!(&encoded[..4], &[len as u8, 0, 0, 0]);
        assert_eq!(coder.decode(&encoded).unwrap(), TEXT);
    }

    #[test]
    fn test_len_str_too_long() {
        let long = "a".repeat(256);
        assert_eq!(
            U8LenStr::default().encode(&long),
            Err(Error::LengthExceeded(256, 255))
        );
        assert!(U16LenStr::default().encode(&long).is_ok());
    }

    #[test]
    fn test_len_str_range() {
        let encoded = U8LenStr::default().encode(&"hello".to_string()).unwrap();
        let coder = U8LenStr::default().with_range(..=4);
        assert_eq!(coder.decode(&encoded), Err(Error::InvalidLength(5)));
        let coder = U8LenStr::default().with_range(..=5);
        assert_eq!(coder.decode(&encoded).unwrap(), "hello");
    }

    #[test]
    fn test_len_str_truncated() {
        // Prefix claims more bytes than remain
        assert!(matches!(
            U8LenStr::default().decode(&[4, b'a', b'b']),
            Err(Error::OutOfRange { index: 5, len: 3 })
        ));
    }
}
