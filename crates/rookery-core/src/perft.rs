//! Perft (performance test) for move generation correctness verification.

use std::ops::AddAssign;
use std::thread;

use tracing::debug;

use crate::chess_move::Move;
use crate::movegen::generate_pseudo_legal;
use crate::position::Position;

/// Count the leaf nodes reachable in exactly `depth` plies.
///
/// Depth 0 returns 1 (the current position). Pseudo-legal moves are made
/// and only followed when the mover's king is left safe.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let us = pos.side_to_move();
    let moves = generate_pseudo_legal(pos);
    let mut nodes = 0u64;
    for &mv in moves.as_slice() {
        pos.make_move(mv);
        if !pos.king_attacked(us) {
            nodes += perft(pos, depth - 1);
        }
        pos.unmake_move();
    }
    nodes
}

/// Leaf-ply tallies gathered by [`perft_stats`].
///
/// Checks include mates, matching the usual published perft tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub mates: u64,
}

impl AddAssign for PerftStats {
    fn add_assign(&mut self, rhs: PerftStats) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.mates += rhs.mates;
    }
}

/// Like [`perft`], but also classify every leaf move.
pub fn perft_stats(pos: &mut Position, depth: u32) -> PerftStats {
    let mut stats = PerftStats::default();
    if depth == 0 {
        stats.nodes = 1;
        return stats;
    }

    let us = pos.side_to_move();
    let moves = generate_pseudo_legal(pos);
    for &mv in moves.as_slice() {
        let captured = pos.make_move(mv);
        if !pos.king_attacked(us) {
            if depth == 1 {
                tally_leaf(pos, mv, captured.is_some(), &mut stats);
            } else {
                stats += perft_stats(pos, depth - 1);
            }
        }
        pos.unmake_move();
    }
    stats
}

/// Classify a leaf move. `pos` is the position after `mv` was made.
fn tally_leaf(pos: &mut Position, mv: Move, captured: bool, stats: &mut PerftStats) {
    stats.nodes += 1;
    if captured {
        stats.captures += 1;
    }
    if mv.is_en_passant() {
        stats.en_passant += 1;
    }
    if mv.is_castle() {
        stats.castles += 1;
    }
    if mv.is_promotion() {
        stats.promotions += 1;
    }
    if pos.in_check() {
        stats.checks += 1;
        if !pos.has_legal_move() {
            stats.mates += 1;
        }
    }
}

/// Run perft with a per-root-move breakdown, sorted by coordinate text.
pub fn divide(pos: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = pos.legal_moves();
    let mut results: Vec<(Move, u64)> = moves
        .as_slice()
        .iter()
        .map(|&mv| {
            pos.make_move(mv);
            let count = perft(pos, depth - 1);
            pos.unmake_move();
            (mv, count)
        })
        .collect();
    results.sort_by_key(|(mv, _)| mv.to_coordinate());
    debug!(
        depth,
        root_moves = results.len(),
        nodes = results.iter().map(|(_, n)| n).sum::<u64>(),
        "divide finished"
    );
    results
}

/// Perft with the root moves spread over `threads` worker threads.
///
/// Each worker owns a clone of `pos`; the attack tables are shared.
pub fn perft_parallel(pos: &Position, depth: u32, threads: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut root = pos.clone();
    let moves = root.legal_moves();
    let roots = moves.as_slice();
    if roots.is_empty() {
        return 0;
    }

    let threads = threads.clamp(1, roots.len());
    let chunk = roots.len().div_ceil(threads);
    let nodes = thread::scope(|scope| {
        let workers: Vec<_> = roots
            .chunks(chunk)
            .map(|batch| {
                let mut local = root.clone();
                scope.spawn(move || {
                    batch
                        .iter()
                        .map(|&mv| {
                            local.make_move(mv);
                            let n = perft(&mut local, depth - 1);
                            local.unmake_move();
                            n
                        })
                        .sum::<u64>()
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .sum::<u64>()
    });
    debug!(depth, threads, nodes, "parallel perft finished");
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn position(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    #[test]
    fn perft_startpos_shallow() {
        let mut pos = Position::starting_position();
        assert_eq!(perft(&mut pos, 0), 1);
        assert_eq!(perft(&mut pos, 1), 20);
        assert_eq!(perft(&mut pos, 2), 400);
        assert_eq!(pos, Position::starting_position());
        assert_eq!(pos.history_len(), 0);
    }

    #[test]
    fn stats_startpos_depth_3() {
        let stats = perft_stats(&mut Position::starting_position(), 3);
        assert_eq!(
            stats,
            PerftStats {
                nodes: 8_902,
                captures: 34,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 12,
                mates: 0,
            }
        );
    }

    #[test]
    fn stats_kiwipete_depth_1() {
        let mut pos = position("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let stats = perft_stats(&mut pos, 1);
        assert_eq!(stats.nodes, 48);
        assert_eq!(stats.captures, 8);
        assert_eq!(stats.castles, 2);
        assert_eq!(stats.checks, 0);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut pos = Position::starting_position();
        let parts = divide(&mut pos, 3);
        assert_eq!(parts.len(), 20);
        assert_eq!(parts.iter().map(|(_, n)| n).sum::<u64>(), 8_902);
        assert_eq!(parts[0].0.to_coordinate(), "a2a3");
        let e2e4 = parts.iter().find(|(mv, _)| mv.to_coordinate() == "e2e4").unwrap();
        assert_eq!(e2e4.1, 600);
    }

    #[test]
    fn parallel_matches_serial() {
        let pos = position("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
        assert_eq!(perft_parallel(&pos, 3, 4), 2_812);
        assert_eq!(perft_parallel(&pos, 3, 1), 2_812);
        assert_eq!(perft_parallel(&pos, 0, 4), 1);
    }

    #[test]
    fn mated_position_has_no_nodes() {
        let pos = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(perft_parallel(&pos, 2, 2), 0);
    }
}
