//! Board squares as one-hot 64-bit values.

use std::fmt;
use std::num::NonZeroU64;

use crate::bitboard::Bitboard;

/// A single square, stored as a 64-bit value with exactly one bit set.
///
/// Bit 0 is a1, bit 7 is h1, bit 63 is h8. Because the inner value is a
/// [`NonZeroU64`], `Option<Square>` occupies eight bytes and `None` is the
/// all-zero bit pattern, which doubles as the "no square" sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(NonZeroU64);

impl Square {
    /// Total number of squares.
    pub const COUNT: usize = 64;

    /// Build a square from its bit index without bounds checking beyond a const panic.
    const fn bit(index: u8) -> Square {
        match NonZeroU64::new(1u64 << index) {
            Some(bits) => Square(bits),
            None => panic!("square index out of range"),
        }
    }

    /// Create a square from zero-based file (0 = a) and rank (0 = rank 1) indices.
    #[inline]
    pub const fn from_coords(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square::bit(rank * 8 + file))
        } else {
            None
        }
    }

    /// Create a square from a zero-based index, returning `None` if out of range.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 {
            Some(Square::bit(index))
        } else {
            None
        }
    }

    /// Interpret a bitboard as a square. Returns `None` unless exactly one bit is set.
    #[inline]
    pub const fn from_bitboard(bb: Bitboard) -> Option<Square> {
        let bits = bb.inner();
        if bits != 0 && bits & (bits - 1) == 0 {
            match NonZeroU64::new(bits) {
                Some(bits) => Some(Square(bits)),
                None => None,
            }
        } else {
            None
        }
    }

    /// Parse an algebraic notation string (e.g. "e4") into a square.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        match s.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => {
                Square::from_coords(file - b'a', rank - b'1')
            }
            _ => None,
        }
    }

    /// Return the zero-based index (0..63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0.trailing_zeros() as usize
    }

    /// Return the file index (0 = a, 7 = h).
    #[inline]
    pub const fn file(self) -> u8 {
        (self.index() & 7) as u8
    }

    /// Return the rank index (0 = rank 1, 7 = rank 8).
    #[inline]
    pub const fn rank(self) -> u8 {
        (self.index() >> 3) as u8
    }

    /// Return the file letter (`'a'..='h'`).
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    /// Return the rank digit (`'1'..='8'`).
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }

    /// Return the raw one-hot value.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0.get()
    }

    /// Return a bitboard with only this square set.
    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::new(self.0.get())
    }

    /// Return the square one rank towards rank 8, if on the board.
    #[inline]
    pub const fn up(self) -> Option<Square> {
        Square::from_bitboard(self.bitboard().north())
    }

    /// Return the square one rank towards rank 1, if on the board.
    #[inline]
    pub const fn down(self) -> Option<Square> {
        Square::from_bitboard(self.bitboard().south())
    }

    /// Iterate over all 64 squares in index order (a1, b1, ..., h8).
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square::bit)
    }

    pub const A1: Square = Square::bit(0);
    pub const B1: Square = Square::bit(1);
    pub const C1: Square = Square::bit(2);
    pub const D1: Square = Square::bit(3);
    pub const E1: Square = Square::bit(4);
    pub const F1: Square = Square::bit(5);
    pub const G1: Square = Square::bit(6);
    pub const H1: Square = Square::bit(7);
    pub const A2: Square = Square::bit(8);
    pub const B2: Square = Square::bit(9);
    pub const C2: Square = Square::bit(10);
    pub const D2: Square = Square::bit(11);
    pub const E2: Square = Square::bit(12);
    pub const F2: Square = Square::bit(13);
    pub const G2: Square = Square::bit(14);
    pub const H2: Square = Square::bit(15);
    pub const A3: Square = Square::bit(16);
    pub const B3: Square = Square::bit(17);
    pub const C3: Square = Square::bit(18);
    pub const D3: Square = Square::bit(19);
    pub const E3: Square = Square::bit(20);
    pub const F3: Square = Square::bit(21);
    pub const G3: Square = Square::bit(22);
    pub const H3: Square = Square::bit(23);
    pub const A4: Square = Square::bit(24);
    pub const B4: Square = Square::bit(25);
    pub const C4: Square = Square::bit(26);
    pub const D4: Square = Square::bit(27);
    pub const E4: Square = Square::bit(28);
    pub const F4: Square = Square::bit(29);
    pub const G4: Square = Square::bit(30);
    pub const H4: Square = Square::bit(31);
    pub const A5: Square = Square::bit(32);
    pub const B5: Square = Square::bit(33);
    pub const C5: Square = Square::bit(34);
    pub const D5: Square = Square::bit(35);
    pub const E5: Square = Square::bit(36);
    pub const F5: Square = Square::bit(37);
    pub const G5: Square = Square::bit(38);
    pub const H5: Square = Square::bit(39);
    pub const A6: Square = Square::bit(40);
    pub const B6: Square = Square::bit(41);
    pub const C6: Square = Square::bit(42);
    pub const D6: Square = Square::bit(43);
    pub const E6: Square = Square::bit(44);
    pub const F6: Square = Square::bit(45);
    pub const G6: Square = Square::bit(46);
    pub const H6: Square = Square::bit(47);
    pub const A7: Square = Square::bit(48);
    pub const B7: Square = Square::bit(49);
    pub const C7: Square = Square::bit(50);
    pub const D7: Square = Square::bit(51);
    pub const E7: Square = Square::bit(52);
    pub const F7: Square = Square::bit(53);
    pub const G7: Square = Square::bit(54);
    pub const H7: Square = Square::bit(55);
    pub const A8: Square = Square::bit(56);
    pub const B8: Square = Square::bit(57);
    pub const C8: Square = Square::bit(58);
    pub const D8: Square = Square::bit(59);
    pub const E8: Square = Square::bit(60);
    pub const F8: Square = Square::bit(61);
    pub const G8: Square = Square::bit(62);
    pub const H8: Square = Square::bit(63);
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}
