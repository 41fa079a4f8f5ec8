//! Bitboard representation: a 64-bit set where each bit maps to a square.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use serde::{Deserialize, Serialize};

use crate::square::Square;

/// Index table for the de Bruijn bit-scan, shared by forward and reverse scans.
const DEBRUIJN_INDEX: [u8; 64] = [
    0, 47, 1, 56, 48, 27, 2, 60,
    57, 49, 41, 37, 28, 16, 3, 61,
    54, 58, 35, 52, 50, 42, 21, 44,
    38, 32, 29, 23, 17, 11, 4, 62,
    46, 55, 26, 59, 40, 36, 15, 53,
    34, 51, 20, 43, 31, 22, 10, 45,
    25, 39, 14, 33, 19, 30, 9, 24,
    13, 18, 8, 12, 7, 6, 5, 63,
];

const DEBRUIJN: u64 = 0x03f7_9d71_b4cb_0a89;

const NOT_FILE_A: u64 = !0x0101_0101_0101_0101;
const NOT_FILE_H: u64 = !0x8080_8080_8080_8080;
const NOT_FILES_AB: u64 = !0x0303_0303_0303_0303;
const NOT_FILES_GH: u64 = !0xC0C0_C0C0_C0C0_C0C0;

/// A 64-bit board where each bit represents a square (a1 = bit 0, h8 = bit 63).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bitboard(u64);

impl Bitboard {
    /// Empty bitboard (no squares set).
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Full bitboard (all 64 squares set).
    pub const FULL: Bitboard = Bitboard(!0);

    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_2: Bitboard = Bitboard(0x0000_0000_0000_FF00);
    pub const RANK_3: Bitboard = Bitboard(0x0000_0000_00FF_0000);
    pub const RANK_4: Bitboard = Bitboard(0x0000_0000_FF00_0000);
    pub const RANK_5: Bitboard = Bitboard(0x0000_00FF_0000_0000);
    pub const RANK_6: Bitboard = Bitboard(0x0000_FF00_0000_0000);
    pub const RANK_7: Bitboard = Bitboard(0x00FF_0000_0000_0000);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);

    /// Create a bitboard from a raw `u64`.
    #[inline]
    pub const fn new(bits: u64) -> Bitboard {
        Bitboard(bits)
    }

    /// Return the underlying `u64`.
    #[inline]
    pub const fn inner(self) -> u64 {
        self.0
    }

    /// Return `true` if no bits are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return `true` if at least one bit is set.
    #[inline]
    pub const fn is_nonempty(self) -> bool {
        self.0 != 0
    }

    /// Count the number of set bits.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Return `true` if the given square's bit is set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & sq.bits() != 0
    }

    /// Return a new bitboard with the given square set.
    #[inline]
    pub const fn with(self, sq: Square) -> Bitboard {
        Bitboard(self.0 | sq.bits())
    }

    /// Return a new bitboard with the given square cleared.
    #[inline]
    pub const fn without(self, sq: Square) -> Bitboard {
        Bitboard(self.0 & !sq.bits())
    }

    /// Return the least significant set square, or `None` if empty.
    ///
    /// Isolates the lowest bit region with `bb ^ (bb - 1)` and maps it through a
    /// de Bruijn multiply-and-shift.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let isolated = self.0 ^ (self.0 - 1);
        let slot = (isolated.wrapping_mul(DEBRUIJN) >> 58) as usize;
        Square::from_index(DEBRUIJN_INDEX[slot])
    }

    /// Return the most significant set square, or `None` if empty.
    #[inline]
    pub const fn msb(self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let mut smeared = self.0;
        smeared |= smeared >> 1;
        smeared |= smeared >> 2;
        smeared |= smeared >> 4;
        smeared |= smeared >> 8;
        smeared |= smeared >> 16;
        smeared |= smeared >> 32;
        let slot = (smeared.wrapping_mul(DEBRUIJN) >> 58) as usize;
        Square::from_index(DEBRUIJN_INDEX[slot])
    }

    /// Pop the least significant set bit, returning the square and the remaining bitboard.
    #[inline]
    pub const fn pop_lsb(self) -> Option<(Square, Bitboard)> {
        match self.lsb() {
            Some(sq) => Some((sq, Bitboard(self.0 & (self.0 - 1)))),
            None => None,
        }
    }

    /// Iterate over the set squares from lowest to highest.
    ///
    /// The iterator owns a copy, so `self` is left untouched and every call
    /// starts a fresh sequence.
    #[inline]
    pub const fn squares(self) -> Squares {
        Squares(self.0)
    }

    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    #[inline]
    pub const fn east(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_H) << 1)
    }

    #[inline]
    pub const fn west(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_A) >> 1)
    }

    #[inline]
    pub const fn north_east(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_H) << 9)
    }

    #[inline]
    pub const fn north_west(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_A) << 7)
    }

    #[inline]
    pub const fn south_east(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_H) >> 7)
    }

    #[inline]
    pub const fn south_west(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_A) >> 9)
    }

    /// Two ranks north (double pawn push for White).
    #[inline]
    pub const fn north_north(self) -> Bitboard {
        Bitboard(self.0 << 16)
    }

    /// Two ranks south (double pawn push for Black).
    #[inline]
    pub const fn south_south(self) -> Bitboard {
        Bitboard(self.0 >> 16)
    }

    // Knight leaps, named by compass heading.

    #[inline]
    pub const fn north_north_east(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_H) << 17)
    }

    #[inline]
    pub const fn east_north_east(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILES_GH) << 10)
    }

    #[inline]
    pub const fn east_south_east(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILES_GH) >> 6)
    }

    #[inline]
    pub const fn south_south_east(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_H) >> 15)
    }

    #[inline]
    pub const fn south_south_west(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_A) >> 17)
    }

    #[inline]
    pub const fn west_south_west(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILES_AB) >> 10)
    }

    #[inline]
    pub const fn west_north_west(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILES_AB) << 6)
    }

    #[inline]
    pub const fn north_north_west(self) -> Bitboard {
        Bitboard((self.0 & NOT_FILE_A) << 15)
    }
}

/// Lazy iterator over the squares of a bitboard, lowest bit first.
#[derive(Clone, Debug)]
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        let (sq, rest) = Bitboard(self.0).pop_lsb()?;
        self.0 = rest.0;
        Some(sq)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for Squares {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Squares;

    #[inline]
    fn into_iter(self) -> Squares {
        self.squares()
    }
}

impl From<Square> for Bitboard {
    #[inline]
    fn from(sq: Square) -> Bitboard {
        sq.bitboard()
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in (0..8).rev() {
            write!(f, "  {} ", rank + 1)?;
            for file in 0..8 {
                if (self.0 >> (rank * 8 + file)) & 1 == 1 {
                    write!(f, "1 ")?;
                } else {
                    write!(f, ". ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "    a b c d e f g h")
    }
}
