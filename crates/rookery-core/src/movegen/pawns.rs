//! Pawn move generation.

use crate::attacks::pawn_attacks;
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use super::MoveList;

/// Square one rank behind `sq` from the point of view of `us`.
#[inline]
fn behind(us: Color, sq: Square) -> Option<Square> {
    match us {
        Color::White => sq.down(),
        Color::Black => sq.up(),
    }
}

fn push_with_promotions(list: &mut MoveList, src: Square, dst: Square, promo_rank: Bitboard) {
    if promo_rank.contains(dst) {
        for kind in PieceKind::PROMOTIONS {
            list.push(Move::new_promotion(src, dst, kind));
        }
    } else {
        list.push(Move::new(PieceKind::Pawn, src, dst));
    }
}

/// Generate pseudo-legal pawn moves: pushes, captures, promotions, and en passant.
pub(super) fn gen_pawns(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let them = us.flip();
    let our_pawns = pos.pieces(PieceKind::Pawn) & pos.side(us);
    let enemy = pos.side(them);
    let empty = !pos.occupied();
    let promo_rank = us.promotion_rank();

    // Single pushes land on empty squares; double pushes need the
    // single-push square empty too, and start from the home rank.
    let single = us.forward(our_pawns) & empty;
    let double = us.forward(single & us.forward(us.pawn_home_rank())) & empty;

    for dst in single {
        if let Some(src) = behind(us, dst) {
            push_with_promotions(list, src, dst, promo_rank);
        }
    }

    for dst in double {
        if let Some(src) = behind(us, dst).and_then(|mid| behind(us, mid)) {
            list.push(Move::new(PieceKind::Pawn, src, dst));
        }
    }

    for src in our_pawns {
        for dst in pawn_attacks(us, src) & enemy {
            push_with_promotions(list, src, dst, promo_rank);
        }
    }

    if let Some(ep) = pos.en_passant() {
        // Our pawns that attack the target are exactly those a pawn of the
        // other color on the target would attack.
        for src in pawn_attacks(them, ep) & our_pawns {
            list.push(Move::new_en_passant(src, ep));
        }
    }
}
