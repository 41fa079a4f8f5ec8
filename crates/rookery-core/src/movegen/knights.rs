//! Knight move generation.

use crate::attacks::knight_attacks;
use crate::chess_move::Move;
use crate::piece_kind::PieceKind;
use crate::position::Position;

use super::MoveList;

/// Generate pseudo-legal knight moves.
pub(super) fn gen_knights(pos: &Position, list: &mut MoveList) {
    let friendly = pos.side(pos.side_to_move());
    for src in pos.pieces(PieceKind::Knight) & friendly {
        for dst in knight_attacks(src) & !friendly {
            list.push(Move::new(PieceKind::Knight, src, dst));
        }
    }
}
