//! Side colors.

use std::fmt;
use std::ops::Not;

use crate::bitboard::Bitboard;

/// A side: White or Black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Total number of colors.
    pub const COUNT: usize = 2;

    /// All colors in index order.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Return the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the opposite color.
    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Parse the FEN active-color token.
    pub fn from_fen(token: &str) -> Option<Color> {
        match token {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }

    /// Shift a bitboard one rank towards the opponent.
    #[inline]
    pub const fn forward(self, bb: Bitboard) -> Bitboard {
        match self {
            Color::White => bb.north(),
            Color::Black => bb.south(),
        }
    }

    /// Squares from which this side's pawns may double-push.
    #[inline]
    pub const fn pawn_home_rank(self) -> Bitboard {
        match self {
            Color::White => Bitboard::RANK_2,
            Color::Black => Bitboard::RANK_7,
        }
    }

    /// Squares on which this side's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> Bitboard {
        match self {
            Color::White => Bitboard::RANK_8,
            Color::Black => Bitboard::RANK_1,
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "w"),
            Color::Black => write!(f, "b"),
        }
    }
}
