//! Occupancy-indexed attack tables for sliding pieces.
//!
//! For each square the table stores a relevant-occupancy mask and a map from
//! every subset of that mask to the exact attack set. Lookups mask the live
//! occupancy first, so only blockers that can matter reach the map.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bitboard::Bitboard;
use crate::square::Square;

type Shift = fn(Bitboard) -> Bitboard;

/// The two sliding movement families. Queens combine both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    fn directions(self) -> [Shift; 4] {
        match self {
            Slider::Bishop => [
                Bitboard::north_east,
                Bitboard::north_west,
                Bitboard::south_east,
                Bitboard::south_west,
            ],
            Slider::Rook => [
                Bitboard::north,
                Bitboard::south,
                Bitboard::east,
                Bitboard::west,
            ],
        }
    }
}

/// Walk every ray from `sq`, stopping at and including the first occupied square.
pub(crate) fn ray_attacks(slider: Slider, sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for step in slider.directions() {
        let mut cursor = step(sq.bitboard());
        while cursor.is_nonempty() {
            attacks |= cursor;
            if (cursor & occupied).is_nonempty() {
                break;
            }
            cursor = step(cursor);
        }
    }
    attacks
}

/// Ray squares from `sq` with the last square of each ray dropped.
///
/// The edge square at the end of a ray is attacked whether or not it is
/// occupied, so it never changes the result.
pub(crate) fn relevant_mask(slider: Slider, sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    for step in slider.directions() {
        let mut cursor = step(sq.bitboard());
        while cursor.is_nonempty() {
            let next = step(cursor);
            if next.is_nonempty() {
                mask |= cursor;
            }
            cursor = next;
        }
    }
    mask
}

/// Masks and occupancy maps for one slider family, indexed by square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingTable {
    masks: Vec<Bitboard>,
    attacks: Vec<FxHashMap<u64, Bitboard>>,
}

impl SlidingTable {
    /// Enumerate every occupancy subset of every square's mask.
    pub(crate) fn build(slider: Slider) -> SlidingTable {
        let mut masks = Vec::with_capacity(Square::COUNT);
        let mut attacks = Vec::with_capacity(Square::COUNT);

        for sq in Square::all() {
            let mask = relevant_mask(slider, sq);
            let bits = mask.inner();
            let mut map = FxHashMap::default();
            map.reserve(1usize << mask.count());

            // Carry-rippler: visits every subset of `bits`, starting and ending at 0.
            let mut subset: u64 = 0;
            loop {
                map.insert(subset, ray_attacks(slider, sq, Bitboard::new(subset)));
                subset = subset.wrapping_sub(bits) & bits;
                if subset == 0 {
                    break;
                }
            }

            masks.push(mask);
            attacks.push(map);
        }

        SlidingTable { masks, attacks }
    }

    /// Attack set from `sq` for the given board occupancy.
    #[inline]
    pub fn lookup(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let key = (occupied & self.masks[sq.index()]).inner();
        self.attacks[sq.index()][&key]
    }

    /// Relevant-occupancy mask for `sq`.
    #[inline]
    pub fn mask(&self, sq: Square) -> Bitboard {
        self.masks[sq.index()]
    }

    /// Iterate over every stored `(occupancy, attacks)` pair for `sq`.
    pub fn entries(&self, sq: Square) -> impl Iterator<Item = (Bitboard, Bitboard)> + '_ {
        self.attacks[sq.index()]
            .iter()
            .map(|(&occ, &attacks)| (Bitboard::new(occ), attacks))
    }

    /// Check that the table covers all 64 squares and every mask subset.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.masks.len() == Square::COUNT
            && self.attacks.len() == Square::COUNT
            && self.masks.iter().zip(&self.attacks).all(|(mask, map)| {
                map.len() == 1usize << mask.count()
                    && map.keys().all(|&occ| occ & !mask.inner() == 0)
            })
    }
}
