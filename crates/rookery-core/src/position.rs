//! The mutable chess position: piece placement, side to move, castling,
//! en passant, move counters, and the undo stack that drives make/unmake.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::{CastlePath, CastleRights};
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::{BoardError, FenError};
use crate::movegen::attacked;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// State that a move destroys and that the move itself cannot restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Undo {
    mv: Move,
    captured: Option<PieceKind>,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
}

/// Complete chess position state.
///
/// Bitboards per piece kind and per side are kept in lockstep with a
/// square-to-kind lookup. Mutation goes through [`Position::make_move`] and
/// [`Position::unmake_move`], which nest like a stack.
#[derive(Clone)]
pub struct Position {
    /// Bitboard for each piece kind, indexed by [`PieceKind::index()`].
    pieces: [Bitboard; PieceKind::COUNT],
    /// Bitboard for each side, indexed by [`Color::index()`].
    sides: [Bitboard; Color::COUNT],
    /// What stands on each square, indexed by [`Square::index()`].
    squares: [Option<PieceKind>; Square::COUNT],
    side_to_move: Color,
    castling: CastleRights,
    /// En passant target square, valid for one ply after a double push.
    en_passant: Option<Square>,
    /// Plies since the last capture or pawn move.
    halfmove_clock: u16,
    /// Starts at 1, incremented after Black moves.
    fullmove_number: u16,
    history: Vec<Undo>,
}

impl Position {
    /// An empty board with White to move and no rights.
    pub(crate) fn empty() -> Position {
        Position {
            pieces: [Bitboard::EMPTY; PieceKind::COUNT],
            sides: [Bitboard::EMPTY; Color::COUNT],
            squares: [None; Square::COUNT],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    /// Return the standard starting position.
    pub fn starting_position() -> Position {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut pos = Position::empty();
        for (file, kind) in (0u8..).zip(BACK_RANK) {
            for (color, back, pawns) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                if let (Some(piece_sq), Some(pawn_sq)) =
                    (Square::from_coords(file, back), Square::from_coords(file, pawns))
                {
                    pos.put(piece_sq, kind, color);
                    pos.put(pawn_sq, PieceKind::Pawn, color);
                }
            }
        }
        pos.castling = CastleRights::ALL;
        pos
    }

    /// Assemble a position from already-parsed FEN fields.
    pub(crate) fn set_state(
        &mut self,
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) {
        self.side_to_move = side_to_move;
        self.castling = castling;
        self.en_passant = en_passant;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
    }

    /// Place a piece on an empty square.
    #[inline]
    pub(crate) fn put(&mut self, sq: Square, kind: PieceKind, color: Color) {
        debug_assert!(self.squares[sq.index()].is_none(), "{sq} is occupied");
        self.pieces[kind.index()] |= sq.bitboard();
        self.sides[color.index()] |= sq.bitboard();
        self.squares[sq.index()] = Some(kind);
    }

    /// Take a piece off its square.
    #[inline]
    fn remove(&mut self, sq: Square, kind: PieceKind, color: Color) {
        debug_assert_eq!(self.squares[sq.index()], Some(kind));
        self.pieces[kind.index()] ^= sq.bitboard();
        self.sides[color.index()] ^= sq.bitboard();
        self.squares[sq.index()] = None;
    }

    /// Return the piece kind on the given square, if any.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<PieceKind> {
        self.squares[sq.index()]
    }

    /// Return the color of the piece on the given square, if any.
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.sides[color.index()].contains(sq))
    }

    /// Return the bitboard for the given piece kind (both colors).
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    /// Return the bitboard for the given side.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    /// Return the occupied squares bitboard.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.sides[Color::White.index()] | self.sides[Color::Black.index()]
    }

    /// Return the square of `color`'s king, if it has one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        (self.pieces(PieceKind::King) & self.side(color)).lsb()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Number of moves made and not yet unmade.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The most recent move still on the undo stack.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|undo| undo.mv)
    }

    /// Return `true` if `color`'s king is attacked. A side with no king is never attacked.
    pub fn king_attacked(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|sq| attacked(self, sq, color.flip()))
    }

    /// Return `true` if the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.king_attacked(self.side_to_move)
    }

    /// Replace this position with the one described by `fen`.
    ///
    /// On error `self` is left exactly as it was.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = fen.parse()?;
        Ok(())
    }

    /// Apply `mv` and push an undo record. Returns the captured piece, if any.
    ///
    /// `mv` must be pseudo-legal in this position; legality with respect to
    /// the mover's own king is the caller's concern.
    pub fn make_move(&mut self, mv: Move) -> Option<PieceKind> {
        let us = self.side_to_move;
        let them = us.flip();
        let from = mv.from();
        let to = mv.to();
        let piece = mv.piece();

        let capture_sq = if mv.is_en_passant() {
            pawn_behind(us, to)
        } else {
            Some(to)
        };
        let captured = if mv.is_castle() {
            None
        } else {
            capture_sq.and_then(|sq| self.piece_on(sq).map(|kind| (sq, kind)))
        };

        self.history.push(Undo {
            mv: mv.bare(),
            captured: captured.map(|(_, kind)| kind),
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        });

        if let Some((sq, kind)) = captured {
            self.remove(sq, kind, them);
        }

        self.remove(from, piece, us);
        self.put(to, mv.promotion().unwrap_or(piece), us);

        if let Some(path) = castle_path(mv) {
            self.remove(path.rook_from, PieceKind::Rook, us);
            self.put(path.rook_to, PieceKind::Rook, us);
        }

        self.castling = self.castling.after_move(from, to);

        self.en_passant = if piece == PieceKind::Pawn && from.rank().abs_diff(to.rank()) == 2 {
            pawn_behind(us, to)
        } else {
            None
        };

        if captured.is_some() || piece == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = them;

        captured.map(|(_, kind)| kind)
    }

    /// Revert the most recent [`make_move`](Position::make_move).
    ///
    /// Returns the reverted move, or `None` if the undo stack is empty.
    pub fn unmake_move(&mut self) -> Option<Move> {
        let undo = self.history.pop()?;
        let mv = undo.mv;
        let us = self.side_to_move.flip();
        let them = self.side_to_move;
        let from = mv.from();
        let to = mv.to();

        self.side_to_move = us;

        if let Some(path) = castle_path(mv) {
            self.remove(path.rook_to, PieceKind::Rook, us);
            self.put(path.rook_from, PieceKind::Rook, us);
        }

        self.remove(to, mv.promotion().unwrap_or(mv.piece()), us);
        self.put(from, mv.piece(), us);

        if let Some(kind) = undo.captured {
            let sq = if mv.is_en_passant() { pawn_behind(us, to) } else { Some(to) };
            if let Some(sq) = sq {
                self.put(sq, kind, them);
            }
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        Some(mv)
    }

    /// Check the structural invariants tying bitboards and the square lookup together.
    pub fn validate(&self) -> Result<(), BoardError> {
        for i in 0..PieceKind::COUNT {
            for j in (i + 1)..PieceKind::COUNT {
                if (self.pieces[i] & self.pieces[j]).is_nonempty() {
                    return Err(BoardError::OverlappingPieces);
                }
            }
        }

        if (self.sides[Color::White.index()] & self.sides[Color::Black.index()]).is_nonempty() {
            return Err(BoardError::InconsistentSides);
        }

        let all_pieces = self.pieces.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        if all_pieces != self.occupied() {
            return Err(BoardError::InconsistentOccupied);
        }

        for sq in Square::all() {
            let from_bitboards = PieceKind::ALL
                .into_iter()
                .find(|&kind| self.pieces[kind.index()].contains(sq));
            if from_bitboards != self.squares[sq.index()] {
                return Err(BoardError::InconsistentLookup { square: sq });
            }
        }

        Ok(())
    }

    /// Return a pretty-printable wrapper for this position.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }
}

/// The square one rank behind `sq` from `us`'s point of view.
#[inline]
fn pawn_behind(us: Color, sq: Square) -> Option<Square> {
    match us {
        Color::White => sq.down(),
        Color::Black => sq.up(),
    }
}

/// The rook path of a castle, `None` for every other move.
#[inline]
fn castle_path(mv: Move) -> Option<CastlePath> {
    if mv.is_castle() {
        CastlePath::by_king_destination(mv.to())
    } else {
        None
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::starting_position()
    }
}

/// Positions compare by board state only; the undo stack is ignored.
impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        self.pieces == other.pieces
            && self.sides == other.sides
            && self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Eq for Position {}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{}\")", self)
    }
}

/// Wrapper for pretty-printing a position as an 8x8 grid.
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.0;
        for rank in (0u8..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0u8..8 {
                let c = Square::from_coords(file, rank)
                    .and_then(|sq| Some((pos.piece_on(sq)?, pos.color_on(sq)?)))
                    .map_or('.', |(kind, color)| match color {
                        Color::White => kind.san_char(),
                        Color::Black => kind.fen_char(),
                    });
                if file < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
