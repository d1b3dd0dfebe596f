//! Dense per-slice pixel sets.

/// A set of `(row, col)` pixels on one `height x width` slice.
///
/// Stored as a row-major bitmap, so union and subtraction are linear in the
/// slice size and inserting the same pixel twice is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl PixelMask {
    /// Creates an empty mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Adds a pixel. Coordinates must be in bounds.
    #[inline]
    pub fn insert(&mut self, row: usize, col: usize) {
        debug_assert!(row < self.height && col < self.width);
        self.bits[row * self.width + col] = true;
    }

    /// Adds the inclusive column span `[c0, c1]` on one row.
    #[inline]
    pub fn insert_span(&mut self, row: usize, c0: usize, c1: usize) {
        let start = row * self.width;
        self.bits[start + c0..=start + c1].fill(true);
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.bits[row * self.width + col]
    }

    /// Number of pixels in the set.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// In-place union.
    pub fn union_with(&mut self, other: &PixelMask) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (a, &b) in self.bits.iter_mut().zip(&other.bits) {
            *a |= b;
        }
    }

    /// In-place difference: removes every pixel of `other`.
    pub fn subtract(&mut self, other: &PixelMask) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (a, &b) in self.bits.iter_mut().zip(&other.bits) {
            *a &= !b;
        }
    }

    /// Returns the pixels present in both masks.
    pub fn intersection(&self, other: &PixelMask) -> PixelMask {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        PixelMask {
            width: self.width,
            height: self.height,
            bits: self.bits.iter().zip(&other.bits).map(|(&a, &b)| a && b).collect(),
        }
    }

    /// Iterates over member pixels in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(move |(i, _)| (i / width, i % width))
    }
}
