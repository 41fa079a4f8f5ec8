//! King and knight attack sets, built from the directional shifts.

use crate::bitboard::Bitboard;
use crate::square::Square;

/// Every king step from a single square.
pub(super) fn king_from(sq: Square) -> Bitboard {
    let bb = sq.bitboard();
    bb.north()
        | bb.south()
        | bb.east()
        | bb.west()
        | bb.north_east()
        | bb.north_west()
        | bb.south_east()
        | bb.south_west()
}

/// Every knight leap from a single square.
pub(super) fn knight_from(sq: Square) -> Bitboard {
    let bb = sq.bitboard();
    bb.north_north_east()
        | bb.east_north_east()
        | bb.east_south_east()
        | bb.south_south_east()
        | bb.south_south_west()
        | bb.west_south_west()
        | bb.west_north_west()
        | bb.north_north_west()
}

/// Build a per-square table from a single-square generator.
pub(super) fn table(step: fn(Square) -> Bitboard) -> Vec<Bitboard> {
    Square::all().map(step).collect()
}
