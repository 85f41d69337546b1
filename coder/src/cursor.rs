//! Read position shared by every coder in a decode call.

use crate::Error;

/// A mutable offset into the buffer being decoded.
///
/// Every coder that consumes bytes advances the cursor by exactly the number of bytes it read,
/// so composed coders (arrays, records) pick up where the previous one stopped. A cursor can be
/// reused across several top-level [crate::Coder::read] calls to decode consecutive values from
/// the same buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    /// Creates a cursor positioned at `index`.
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Returns the current offset.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves the cursor to `index`.
    pub fn set(&mut self, index: usize) {
        self.index = index;
    }

    /// Returns the number of bytes between the cursor and the end of `buf` (zero if the cursor is
    /// already past the end).
    pub fn remaining(&self, buf: &[u8]) -> usize {
        buf.len().saturating_sub(self.index)
    }

    /// Advances the cursor by `n` bytes.
    ///
    /// Fails (leaving the cursor untouched) if the new position would be past the end of `buf`.
    pub fn advance(&mut self, buf: &[u8], n: usize) -> Result<(), Error> {
        let end = self.end(buf, n)?;
        self.index = end;
        Ok(())
    }

    /// Returns the `n` bytes at the cursor and advances past them.
    pub fn take<'a>(&mut self, buf: &'a [u8], n: usize) -> Result<&'a [u8], Error> {
        let start = self.index;
        let end = self.end(buf, n)?;
        self.index = end;
        Ok(&buf[start..end])
    }

    fn end(&self, buf: &[u8], n: usize) -> Result<usize, Error> {
        match self.index.checked_add(n) {
            Some(end) if end <= buf.len() => Ok(end),
            _ => Err(Error::OutOfRange {
                index: self.index.saturating_add(n),
                len: buf.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_at_zero() {
        assert_eq!(Cursor::default().index(), 0);
        assert_eq!(Cursor::new(7).index(), 7);
    }

    #[test]
    fn test_take() {
        let buf = [1u8, 2, 3, 4, 5];
        let mut cursor = Cursor::new(1);
        assert_eq!(cursor.take(&buf, 3).unwrap(), &[2, 3, 4]);
        assert_eq!(cursor.index(), 4);
        assert_eq!(cursor.remaining(&buf), 1);

        // Reading exactly to the end is allowed
        assert_eq!(cursor.take(&buf, 1).unwrap(), &[5]);
        assert_eq!(cursor.index(), 5);
        assert_eq!(cursor.take(&buf, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_overrun_leaves_cursor() {
        let buf = [0u8; 4];
        let mut cursor = Cursor::new(2);
        assert_eq!(
            cursor.advance(&buf, 3),
            Err(Error::OutOfRange { index: 5, len: 4 })
        );
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn test_start_past_end() {
        let buf = [0u8; 2];
        let mut cursor = Cursor::new(3);
        assert_eq!(cursor.remaining(&buf), 0);
        assert!(matches!(
            cursor.take(&buf, 0),
            Err(Error::OutOfRange { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_overflow() {
        let buf = [0u8; 2];
        let mut cursor = Cursor::new(usize::MAX);
        assert!(matches!(
            cursor.advance(&buf, 1),
            Err(Error::OutOfRange { .. })
        ));
    }
}
