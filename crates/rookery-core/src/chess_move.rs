//! Chess move representation, bit-packed into a u32.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::piece_kind::PieceKind;
use crate::square::Square;

const CAPTURE: u32 = 1 << 0;
const CHECK: u32 = 1 << 1;
const MATE: u32 = 1 << 2;
const SHOW_FILE: u32 = 1 << 3;
const SHOW_RANK: u32 = 1 << 4;
const FLAGS_MASK: u32 = 0xFF;

const FROM_SHIFT: u32 = 8;
const TO_SHIFT: u32 = 14;
const PIECE_SHIFT: u32 = 20;
const PROMO_SHIFT: u32 = 23;
const SQUARE_MASK: u32 = 0x3F;
const KIND_MASK: u32 = 0x7;

/// Promotion field value: no promotion.
const PROMO_NONE: u32 = 0;

/// A chess move packed into 32 bits.
///
/// ```text
/// bits  0-7:  annotation flags  (capture, check, mate, show-file, show-rank)
/// bits  8-13: origin square      (0-63)
/// bits 14-19: destination square (0-63)
/// bits 20-22: moving piece kind  (Pawn=0 .. King=5)
/// bits 23-25: promotion field    (0 = none, else kind index + 1)
/// ```
///
/// The promotion field doubles as a move-kind tag: King marks a castle and
/// Pawn marks an en passant capture. Equality and hashing ignore the flag
/// byte, so an annotated move is the same move as its bare form.
#[derive(Clone, Copy)]
pub struct Move(u32);

impl Move {
    /// Placeholder value (pawn a1 to a1). Never generated.
    pub const NULL: Move = Move(0);

    const fn pack(piece: PieceKind, from: Square, to: Square, promo: u32) -> Move {
        Move(
            ((from.index() as u32) << FROM_SHIFT)
                | ((to.index() as u32) << TO_SHIFT)
                | ((piece as u32) << PIECE_SHIFT)
                | (promo << PROMO_SHIFT),
        )
    }

    /// Create a plain move (quiet or capture).
    pub const fn new(piece: PieceKind, from: Square, to: Square) -> Move {
        Move::pack(piece, from, to, PROMO_NONE)
    }

    /// Create a pawn promotion to `promo`.
    pub const fn new_promotion(from: Square, to: Square, promo: PieceKind) -> Move {
        Move::pack(PieceKind::Pawn, from, to, promo as u32 + 1)
    }

    /// Create an en passant capture onto the target square `to`.
    pub const fn new_en_passant(from: Square, to: Square) -> Move {
        Move::pack(PieceKind::Pawn, from, to, PieceKind::Pawn as u32 + 1)
    }

    /// Create a castle from the king's origin and destination squares.
    pub const fn new_castle(king_from: Square, king_to: Square) -> Move {
        Move::pack(PieceKind::King, king_from, king_to, PieceKind::King as u32 + 1)
    }

    const fn square_at(self, shift: u32) -> Square {
        match Square::from_index(((self.0 >> shift) & SQUARE_MASK) as u8) {
            Some(sq) => sq,
            None => Square::A1,
        }
    }

    const fn kind_at(bits: u32) -> PieceKind {
        match PieceKind::from_index(bits as usize) {
            Some(kind) => kind,
            None => PieceKind::Pawn,
        }
    }

    /// The moving piece kind.
    pub const fn piece(self) -> PieceKind {
        Move::kind_at((self.0 >> PIECE_SHIFT) & KIND_MASK)
    }

    /// The origin square.
    pub const fn from(self) -> Square {
        self.square_at(FROM_SHIFT)
    }

    /// The destination square.
    pub const fn to(self) -> Square {
        self.square_at(TO_SHIFT)
    }

    const fn promo_field(self) -> u32 {
        (self.0 >> PROMO_SHIFT) & KIND_MASK
    }

    /// The piece a pawn promotes to, if this is a promotion.
    pub const fn promotion(self) -> Option<PieceKind> {
        match self.promo_field() {
            PROMO_NONE => None,
            field => match Move::kind_at(field - 1) {
                PieceKind::Pawn | PieceKind::King => None,
                kind => Some(kind),
            },
        }
    }

    pub const fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    pub const fn is_castle(self) -> bool {
        self.promo_field() == PieceKind::King as u32 + 1
    }

    pub const fn is_en_passant(self) -> bool {
        self.promo_field() == PieceKind::Pawn as u32 + 1
    }

    pub const fn is_capture(self) -> bool {
        self.0 & CAPTURE != 0
    }

    pub const fn is_check(self) -> bool {
        self.0 & CHECK != 0
    }

    pub const fn is_mate(self) -> bool {
        self.0 & MATE != 0
    }

    pub const fn show_file(self) -> bool {
        self.0 & SHOW_FILE != 0
    }

    pub const fn show_rank(self) -> bool {
        self.0 & SHOW_RANK != 0
    }

    pub const fn with_capture(self) -> Move {
        Move(self.0 | CAPTURE)
    }

    pub const fn with_check(self) -> Move {
        Move(self.0 | CHECK)
    }

    pub const fn with_mate(self) -> Move {
        Move(self.0 | MATE)
    }

    pub const fn with_show_file(self) -> Move {
        Move(self.0 | SHOW_FILE)
    }

    pub const fn with_show_rank(self) -> Move {
        Move(self.0 | SHOW_RANK)
    }

    /// Return the move with every annotation flag cleared.
    pub const fn bare(self) -> Move {
        Move(self.0 & !FLAGS_MASK)
    }

    /// Return the raw packed value, flags included.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Return the coordinate form, e.g. `e2e4` or `e7e8q`.
    pub fn to_coordinate(self) -> String {
        match self.promotion() {
            Some(kind) => format!("{}{}{}", self.from(), self.to(), kind.fen_char()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.bare().0 == other.bare().0
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bare().0.hash(state);
    }
}

/// Short algebraic notation.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_castle() {
            let text = if self.to().file() == 2 { "O-O-O" } else { "O-O" };
            f.write_str(text)?;
        } else {
            if self.piece() == PieceKind::Pawn {
                if self.is_capture() {
                    write!(f, "{}x", self.from().file_char())?;
                }
            } else {
                write!(f, "{}", self.piece().san_char())?;
                if self.show_file() {
                    write!(f, "{}", self.from().file_char())?;
                }
                if self.show_rank() {
                    write!(f, "{}", self.from().rank_char())?;
                }
                if self.is_capture() {
                    f.write_str("x")?;
                }
            }
            write!(f, "{}", self.to())?;
            if let Some(kind) = self.promotion() {
                write!(f, "={}", kind.san_char())?;
            }
        }
        if self.is_mate() {
            f.write_str("#")
        } else if self.is_check() {
            f.write_str("+")
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({:?} {}", self.piece(), self.to_coordinate())?;
        if self.is_castle() {
            write!(f, " castle")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        write!(f, " flags={:#04x})", self.0 & FLAGS_MASK)
    }
}
