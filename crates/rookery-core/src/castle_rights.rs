//! Castling rights and castling geometry.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;

/// Which side of the board to castle toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];
}

/// Fixed squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlePath {
    /// King origin.
    pub king_from: Square,
    /// King destination.
    pub king_to: Square,
    /// Square the king crosses between origin and destination.
    pub king_passes: Square,
    /// Rook origin (its home corner).
    pub rook_from: Square,
    /// Rook destination.
    pub rook_to: Square,
    /// Squares that must be empty.
    pub between: Bitboard,
}

impl CastlePath {
    /// Return the castling path for a color and side.
    pub const fn of(color: Color, side: CastleSide) -> CastlePath {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => CastlePath {
                king_from: Square::E1,
                king_to: Square::G1,
                king_passes: Square::F1,
                rook_from: Square::H1,
                rook_to: Square::F1,
                between: Bitboard::new(Square::F1.bits() | Square::G1.bits()),
            },
            (Color::White, CastleSide::QueenSide) => CastlePath {
                king_from: Square::E1,
                king_to: Square::C1,
                king_passes: Square::D1,
                rook_from: Square::A1,
                rook_to: Square::D1,
                between: Bitboard::new(Square::B1.bits() | Square::C1.bits() | Square::D1.bits()),
            },
            (Color::Black, CastleSide::KingSide) => CastlePath {
                king_from: Square::E8,
                king_to: Square::G8,
                king_passes: Square::F8,
                rook_from: Square::H8,
                rook_to: Square::F8,
                between: Bitboard::new(Square::F8.bits() | Square::G8.bits()),
            },
            (Color::Black, CastleSide::QueenSide) => CastlePath {
                king_from: Square::E8,
                king_to: Square::C8,
                king_passes: Square::D8,
                rook_from: Square::A8,
                rook_to: Square::D8,
                between: Bitboard::new(Square::B8.bits() | Square::C8.bits() | Square::D8.bits()),
            },
        }
    }

    /// Find the path whose king destination is `king_to`.
    pub fn by_king_destination(king_to: Square) -> Option<CastlePath> {
        Color::ALL
            .into_iter()
            .flat_map(|color| CastleSide::ALL.map(|side| CastlePath::of(color, side)))
            .find(|path| path.king_to == king_to)
    }
}

/// Castling rights as four independent flags: bit 0 = WK, 1 = WQ, 2 = BK, 3 = BQ.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRights(u8);

/// Rights lost when a move starts or ends on each square.
const REVOKED_BY_SQUARE: [CastleRights; 64] = {
    let mut table = [CastleRights::NONE; 64];
    table[Square::E1.index()] = CastleRights::WHITE_BOTH;
    table[Square::A1.index()] = CastleRights::WHITE_QUEEN;
    table[Square::H1.index()] = CastleRights::WHITE_KING;
    table[Square::E8.index()] = CastleRights::BLACK_BOTH;
    table[Square::A8.index()] = CastleRights::BLACK_QUEEN;
    table[Square::H8.index()] = CastleRights::BLACK_KING;
    table
};

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);

    pub const WHITE_KING: CastleRights = CastleRights(0b0001);
    pub const WHITE_QUEEN: CastleRights = CastleRights(0b0010);
    pub const BLACK_KING: CastleRights = CastleRights(0b0100);
    pub const BLACK_QUEEN: CastleRights = CastleRights(0b1000);

    pub const WHITE_BOTH: CastleRights = CastleRights(0b0011);
    pub const BLACK_BOTH: CastleRights = CastleRights(0b1100);

    /// Return the raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Return `true` if no castling rights remain.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Return new rights with all bits from `other` added.
    #[inline]
    pub const fn insert(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    /// Return new rights with all bits from `other` removed.
    #[inline]
    pub const fn remove(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 & !other.0)
    }

    /// Check whether a specific color and side may still castle.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.contains(Self::flag(color, side))
    }

    /// Return the single-bit flag for a color and side.
    #[inline]
    pub const fn flag(color: Color, side: CastleSide) -> CastleRights {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => Self::WHITE_KING,
            (Color::White, CastleSide::QueenSide) => Self::WHITE_QUEEN,
            (Color::Black, CastleSide::KingSide) => Self::BLACK_KING,
            (Color::Black, CastleSide::QueenSide) => Self::BLACK_QUEEN,
        }
    }

    /// Return the rights left after a move from `from` to `to`.
    ///
    /// A king leaving its home square drops both of its rights; any move
    /// touching a rook corner drops that corner's right, which covers both
    /// the rook moving away and the rook being captured at home.
    #[inline]
    pub const fn after_move(self, from: Square, to: Square) -> CastleRights {
        self.remove(REVOKED_BY_SQUARE[from.index()])
            .remove(REVOKED_BY_SQUARE[to.index()])
    }

    /// Parse castling rights from the FEN castling field (e.g. "KQkq", "Kq", "-").
    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        if s.is_empty() || s.len() > 4 {
            return Err(FenError::InvalidCastling { found: s.to_string() });
        }

        let mut rights = CastleRights::NONE;
        for c in s.chars() {
            let flag = match c {
                'K' => Self::WHITE_KING,
                'Q' => Self::WHITE_QUEEN,
                'k' => Self::BLACK_KING,
                'q' => Self::BLACK_QUEEN,
                _ => return Err(FenError::InvalidCastlingChar { character: c }),
            };
            if rights.contains(flag) {
                return Err(FenError::InvalidCastling { found: s.to_string() });
            }
            rights = rights.insert(flag);
        }
        Ok(rights)
    }

    /// Serialize castling rights to the FEN castling field.
    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }

        [
            (Self::WHITE_KING, 'K'),
            (Self::WHITE_QUEEN, 'Q'),
            (Self::BLACK_KING, 'k'),
            (Self::BLACK_QUEEN, 'q'),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, c)| c)
        .collect()
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({})", self.to_fen())
    }
}
