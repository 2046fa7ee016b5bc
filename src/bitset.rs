//! Bit-board primitives: a fixed-width bitset of colours, one per cell.
//!
//! A puzzle's palette never exceeds [`MAX_COLORS`] entries, so a single
//! machine word is ample storage -- no flexible-array-member tricks, no
//! heap-allocated bitset.

use std::fmt;

/// A colour identifier. Colour `0` is always the background colour.
pub type ColorId = u32;

/// The widest palette a [`ColorSet`] can represent.
pub const MAX_COLORS: u32 = 32;

/// A set of candidate colours for one cell, represented as a bitmask.
///
/// Bit `i` set means colour `i` is still a candidate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ColorSet(u32);

impl ColorSet {
    /// The empty set -- a contradiction if it is ever a cell's `possible`.
    pub const EMPTY: Self = Self(0);

    /// A set containing only `color`.
    pub fn single(color: ColorId) -> Self {
        debug_assert!(color < MAX_COLORS);
        Self(1 << color)
    }

    /// The set of every colour in a palette of `ncolors` colours.
    pub fn full(ncolors: u32) -> Self {
        debug_assert!(ncolors <= MAX_COLORS);
        if ncolors == MAX_COLORS {
            Self(u32::MAX)
        } else {
            Self((1 << ncolors) - 1)
        }
    }

    pub fn set(&mut self, color: ColorId) {
        self.0 |= 1 << color;
    }

    pub fn clear(&mut self, color: ColorId) {
        self.0 &= !(1 << color);
    }

    pub fn test(&self, color: ColorId) -> bool {
        self.0 & (1 << color) != 0
    }

    pub fn popcount(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// `Some(color)` iff exactly one colour remains possible.
    pub fn single_color(&self) -> Option<ColorId> {
        if self.popcount() == 1 {
            Some(self.0.trailing_zeros())
        } else {
            None
        }
    }

    pub fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersect(&self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// `self` with every colour of `other` removed.
    pub fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn contains_all(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The individual colours still present in this set.
    pub fn colors(&self) -> impl Iterator<Item = ColorId> + '_ {
        (0..MAX_COLORS).filter(move |&c| self.test(c))
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(c) = self.single_color() {
            write!(f, "{}", c)
        } else {
            write!(f, "?")
        }
    }
}
