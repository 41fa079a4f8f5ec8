//! King move and castling generation.

use crate::attacks::king_attacks;
use crate::castle_rights::{CastlePath, CastleSide};
use crate::chess_move::Move;
use crate::piece_kind::PieceKind;
use crate::position::Position;

use super::{MoveList, attacked};

/// Generate king steps (unfiltered) and castles (fully checked).
pub(super) fn gen_king(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let them = us.flip();
    let friendly = pos.side(us);

    for src in pos.pieces(PieceKind::King) & friendly {
        for dst in king_attacks(src) & !friendly {
            list.push(Move::new(PieceKind::King, src, dst));
        }
    }

    let castling = pos.castling();
    let occupied = pos.occupied();
    let our_rooks = pos.pieces(PieceKind::Rook) & friendly;
    let our_king = pos.pieces(PieceKind::King) & friendly;

    for side in CastleSide::ALL {
        if !castling.has(us, side) {
            continue;
        }
        let path = CastlePath::of(us, side);
        if !our_king.contains(path.king_from) || !our_rooks.contains(path.rook_from) {
            continue;
        }
        if (path.between & occupied).is_nonempty() {
            continue;
        }
        let safe = [path.king_from, path.king_passes, path.king_to]
            .into_iter()
            .all(|sq| !attacked(pos, sq, them));
        if safe {
            list.push(Move::new_castle(path.king_from, path.king_to));
        }
    }
}
