//! Attack generation: per-square tables for every piece type.
//!
//! Tables are built once per process. Callers may inject a prebuilt set
//! (typically loaded from a cache file) with [`install`] before the first
//! lookup; otherwise the first lookup builds them.

pub mod cache;
mod leapers;
mod sliding;

use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::CacheError;
use crate::square::Square;

pub use self::sliding::{Slider, SlidingTable};

/// King, knight, and sliding-piece attack data for every square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackTables {
    king: Vec<Bitboard>,
    knight: Vec<Bitboard>,
    bishop: SlidingTable,
    rook: SlidingTable,
}

impl AttackTables {
    /// Build every table from scratch.
    pub fn build() -> AttackTables {
        let start = Instant::now();
        let tables = AttackTables {
            king: leapers::table(leapers::king_from),
            knight: leapers::table(leapers::knight_from),
            bishop: SlidingTable::build(Slider::Bishop),
            rook: SlidingTable::build(Slider::Rook),
        };
        debug!(elapsed = ?start.elapsed(), "built attack tables");
        tables
    }

    /// Read the snapshot at `path` if present, otherwise build and save one.
    pub fn load_or_build(path: impl AsRef<Path>) -> Result<AttackTables, CacheError> {
        cache::load_or_build(path.as_ref())
    }

    /// Reject tables that do not cover the board.
    pub(crate) fn validate(&self) -> Result<(), CacheError> {
        if self.king.len() != Square::COUNT {
            return Err(CacheError::Shape { what: "king table" });
        }
        if self.knight.len() != Square::COUNT {
            return Err(CacheError::Shape { what: "knight table" });
        }
        if !self.bishop.is_well_formed() {
            return Err(CacheError::Shape { what: "bishop table" });
        }
        if !self.rook.is_well_formed() {
            return Err(CacheError::Shape { what: "rook table" });
        }
        Ok(())
    }

    #[inline]
    pub fn king(&self, sq: Square) -> Bitboard {
        self.king[sq.index()]
    }

    #[inline]
    pub fn knight(&self, sq: Square) -> Bitboard {
        self.knight[sq.index()]
    }

    #[inline]
    pub fn bishop(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop.lookup(sq, occupied)
    }

    #[inline]
    pub fn rook(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook.lookup(sq, occupied)
    }

    /// The sliding table for one family.
    pub fn sliding(&self, slider: Slider) -> &SlidingTable {
        match slider {
            Slider::Bishop => &self.bishop,
            Slider::Rook => &self.rook,
        }
    }
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Return the process-wide tables, building them on first use.
#[inline]
pub fn tables() -> &'static AttackTables {
    TABLES.get_or_init(AttackTables::build)
}

/// Install prebuilt tables. Fails, handing the tables back, if a set is already in place.
pub fn install(tables: AttackTables) -> Result<(), AttackTables> {
    TABLES.set(tables)
}

/// Return the squares a knight on `sq` attacks.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    tables().knight(sq)
}

/// Return the squares a king on `sq` attacks.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    tables().king(sq)
}

/// Return the squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    let ahead = color.forward(sq.bitboard());
    ahead.east() | ahead.west()
}

/// Return rook attacks from `sq` given `occupied` squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().rook(sq, occupied)
}

/// Return bishop attacks from `sq` given `occupied` squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().bishop(sq, occupied)
}

/// Return queen attacks from `sq` given `occupied` squares.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::sliding::ray_attacks;
    use super::*;

    #[test]
    fn pawn_no_wrap_file_a() {
        let attacks = pawn_attacks(Color::White, Square::A4);
        assert_eq!(attacks, Square::B5.bitboard());
    }

    #[test]
    fn pawn_no_wrap_file_h() {
        let attacks = pawn_attacks(Color::White, Square::H4);
        assert_eq!(attacks, Square::G5.bitboard());
    }

    #[test]
    fn pawn_black_attacks_south() {
        let attacks = pawn_attacks(Color::Black, Square::E5);
        assert_eq!(attacks, Square::D4.bitboard() | Square::F4.bitboard());
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let occupied = Square::D6.bitboard() | Square::F3.bitboard();
        assert_eq!(
            queen_attacks(Square::D4, occupied),
            rook_attacks(Square::D4, occupied) | bishop_attacks(Square::D4, occupied)
        );
        assert_eq!(queen_attacks(Square::D4, Bitboard::EMPTY).count(), 27);
    }

    #[test]
    fn every_subset_matches_ray_cast() {
        let tables = tables();
        for slider in [Slider::Bishop, Slider::Rook] {
            let table = tables.sliding(slider);
            for sq in Square::all() {
                let mut seen = 0usize;
                for (occ, attacks) in table.entries(sq) {
                    assert_eq!(
                        attacks,
                        ray_attacks(slider, sq, occ),
                        "{slider:?} mismatch on {sq} with occupancy {:016x}",
                        occ.inner()
                    );
                    seen += 1;
                }
                assert_eq!(seen, 1 << table.mask(sq).count());
            }
        }
    }

    #[test]
    fn lookup_masks_live_occupancy() {
        let mut rng: u64 = 0xDEAD_BEEF_1234_5678;
        for sq in Square::all() {
            for _ in 0..64 {
                rng = rng
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let occupied = Bitboard::new(rng);
                assert_eq!(rook_attacks(sq, occupied), ray_attacks(Slider::Rook, sq, occupied));
                assert_eq!(
                    bishop_attacks(sq, occupied),
                    ray_attacks(Slider::Bishop, sq, occupied)
                );
            }
        }
    }

    #[test]
    fn validate_rejects_truncated_tables() {
        let mut tables = AttackTables::build();
        assert!(tables.validate().is_ok());
        tables.knight.pop();
        assert!(matches!(
            tables.validate(),
            Err(CacheError::Shape { what: "knight table" })
        ));
    }

    #[test]
    fn install_after_init_hands_tables_back() {
        let _ = tables();
        assert!(install(AttackTables::build()).is_err());
    }
}
