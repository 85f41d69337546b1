//! Configuration supplied when constructing coders.

use core::ops::{
    Bound, Range, RangeBounds, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive,
};

/// Byte order used by numeric coders (and numeric length prefixes).
///
/// Selected once, when the coder is constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Most significant byte first.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

/// Bounds on the lengths a length-prefixed coder accepts when decoding.
///
/// Untrusted input cannot request arbitrarily large collections once a limit is set. The default
/// accepts every length.
///
/// ```
/// use commonware_coder::RangeCfg;
///
/// let cfg = RangeCfg::from(..=1024);
/// assert!(cfg.contains(500));
/// assert!(!cfg.contains(2000));
/// assert!(!RangeCfg::from(1..).contains(0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeCfg {
    bounds: (Bound<usize>, Bound<usize>),
}

impl RangeCfg {
    pub fn new(range: impl RangeBounds<usize>) -> Self {
        Self {
            bounds: (range.start_bound().cloned(), range.end_bound().cloned()),
        }
    }

    /// Returns true if `len` lies within the bounds.
    pub fn contains(&self, len: usize) -> bool {
        RangeBounds::contains(&self.bounds, &len)
    }
}

impl Default for RangeCfg {
    fn default() -> Self {
        Self::new(..)
    }
}

macro_rules! impl_from_range {
    ($($range:ty),+) => {
        $(
            impl From<$range> for RangeCfg {
                fn from(range: $range) -> Self {
                    Self::new(range)
                }
            }
        )+
    };
}

impl_from_range!(
    Range<usize>,
    RangeInclusive<usize>,
    RangeFrom<usize>,
    RangeTo<usize>,
    RangeToInclusive<usize>,
    RangeFull
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endian_default() {
        assert_eq!(Endian::default(), Endian::Big);
    }

    #[test]
    fn test_unbounded() {
        let cfg = RangeCfg::default();
        assert_eq!(cfg, RangeCfg::from(..));
        assert!(cfg.contains(0));
        assert!(cfg.contains(usize::MAX));
    }

    #[test]
    fn test_bounds() {
        let cfg = RangeCfg::from(5..10);
        assert!(!cfg.contains(4));
        assert!(cfg.contains(5));
        assert!(cfg.contains(9));
        assert!(!cfg.contains(10));

        let cfg = RangeCfg::from(..=10);
        assert!(cfg.contains(0));
        assert!(cfg.contains(10));
        assert!(!cfg.contains(11));

        let cfg = RangeCfg::from(3..=3);
        assert!(cfg.contains(3));
        assert!(!cfg.contains(2));
        assert!(!cfg.contains(4));

        let cfg = RangeCfg::new((Bound::Excluded(5), Bound::Unbounded));
        assert!(!cfg.contains(5));
        assert!(cfg.contains(6));
    }
}
