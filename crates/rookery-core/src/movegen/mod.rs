//! Pseudo-legal move generation.
//!
//! Generated moves obey piece movement rules but may leave the mover's own
//! king attacked. Castling is the exception: its squares are checked for
//! attacks here, since that rule cannot be recovered after the move is made.

mod king;
mod knights;
mod pawns;
mod sliders;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use self::king::gen_king;
use self::knights::gen_knights;
use self::pawns::gen_pawns;
use self::sliders::gen_sliders;

/// Capacity of a [`MoveList`]. Pseudo-legal counts stay well below this.
const MAX_MOVES: usize = 320;

/// Stack-allocated buffer for generated moves.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: u16,
}

impl MoveList {
    /// Create an empty move list.
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    /// Push a move onto the list.
    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!((self.len as usize) < MAX_MOVES);
        self.moves[self.len as usize] = mv;
        self.len += 1;
    }

    /// Return the number of moves in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Return `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    /// Return a mutable slice of the moves, for in-place annotation.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len as usize]
    }

    /// Keep only the moves for which `keep` returns `true`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut Move) -> bool) {
        let mut write = 0;
        for read in 0..self.len as usize {
            let mut mv = self.moves[read];
            if keep(&mut mv) {
                self.moves[write] = mv;
                write += 1;
            }
        }
        self.len = write as u16;
    }

    /// Return `true` if a move equal to `mv` (ignoring annotations) is in the list.
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Return `true` if any piece of `by_color` attacks `sq`.
pub fn attacked(pos: &Position, sq: Square, by_color: Color) -> bool {
    let them = pos.side(by_color);
    let occupied = pos.occupied();
    if (knight_attacks(sq) & them & pos.pieces(PieceKind::Knight)).is_nonempty() {
        return true;
    }
    if (king_attacks(sq) & them & pos.pieces(PieceKind::King)).is_nonempty() {
        return true;
    }
    // A pawn of `by_color` attacks `sq` exactly when a pawn of the other
    // color on `sq` would attack the pawn's square.
    if (pawn_attacks(by_color.flip(), sq) & them & pos.pieces(PieceKind::Pawn)).is_nonempty() {
        return true;
    }
    let queens = pos.pieces(PieceKind::Queen);
    if (rook_attacks(sq, occupied) & them & (pos.pieces(PieceKind::Rook) | queens)).is_nonempty() {
        return true;
    }
    (bishop_attacks(sq, occupied) & them & (pos.pieces(PieceKind::Bishop) | queens)).is_nonempty()
}

/// Generate all pseudo-legal moves for the side to move.
pub fn generate_pseudo_legal(pos: &Position) -> MoveList {
    let mut list = MoveList::new();
    gen_pawns(pos, &mut list);
    gen_knights(pos, &mut list);
    gen_sliders(pos, &mut list);
    gen_king(pos, &mut list);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn position(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    #[test]
    fn starting_position_20_moves() {
        let moves = generate_pseudo_legal(&Position::starting_position());
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn pseudo_legal_includes_moves_that_expose_the_king() {
        // The e2 knight is pinned, but its jumps are still generated here.
        let pos = position("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let moves = generate_pseudo_legal(&pos);
        let knight_moves = moves.as_slice().iter().filter(|m| m.from() == Square::E2).count();
        assert_eq!(knight_moves, 6);
    }

    #[test]
    fn attacked_by_each_piece_kind() {
        let pos = position("4k3/8/8/3p4/8/5n2/8/R3K2b w - - 0 1");
        assert!(attacked(&pos, Square::E4, Color::Black), "pawn d5 hits e4");
        assert!(attacked(&pos, Square::C4, Color::Black), "pawn d5 hits c4");
        assert!(!attacked(&pos, Square::D4, Color::Black), "pawns do not attack forward");
        assert!(attacked(&pos, Square::G1, Color::Black), "knight f3 hits g1");
        assert!(attacked(&pos, Square::G2, Color::Black), "bishop h1 hits g2");
        assert!(attacked(&pos, Square::D7, Color::Black), "king e8 hits d7");
        assert!(attacked(&pos, Square::A8, Color::White), "rook a1 hits a8");
        assert!(!attacked(&pos, Square::H8, Color::White));
    }

    #[test]
    fn sliders_are_blocked() {
        let pos = position("4k3/8/8/8/8/8/P7/R3K3 w - - 0 1");
        // The a2 pawn blocks the rook and does not attack straight ahead.
        assert!(!attacked(&pos, Square::A3, Color::White));
        assert!(attacked(&pos, Square::B3, Color::White));
    }

    #[test]
    fn move_list_retain_keeps_order() {
        let mut moves = generate_pseudo_legal(&Position::starting_position());
        let before: Vec<Move> = moves
            .as_slice()
            .iter()
            .copied()
            .filter(|m| m.piece() == PieceKind::Knight)
            .collect();
        moves.retain(|m| m.piece() == PieceKind::Knight);
        assert_eq!(moves.as_slice(), before.as_slice());
        assert_eq!(moves.len(), 4);
    }
}
