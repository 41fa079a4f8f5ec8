//! Sliding piece (bishop, rook, queen) move generation.

use crate::attacks::{bishop_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use super::MoveList;

/// Generate pseudo-legal slider moves (bishops, rooks, queens).
pub(super) fn gen_sliders(pos: &Position, list: &mut MoveList) {
    gen_slider_type(pos, list, PieceKind::Bishop, bishop_attacks);
    gen_slider_type(pos, list, PieceKind::Rook, rook_attacks);
    gen_slider_type(pos, list, PieceKind::Queen, queen_attacks);
}

fn gen_slider_type(
    pos: &Position,
    list: &mut MoveList,
    kind: PieceKind,
    attacks_fn: impl Fn(Square, Bitboard) -> Bitboard,
) {
    let friendly = pos.side(pos.side_to_move());
    let occupied = pos.occupied();
    for src in pos.pieces(kind) & friendly {
        for dst in attacks_fn(src, occupied) & !friendly {
            list.push(Move::new(kind, src, dst));
        }
    }
}
