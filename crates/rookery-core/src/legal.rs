//! Legal move filtering, SAN annotation, and move lookup by text.

use crate::chess_move::Move;
use crate::movegen::{MoveList, generate_pseudo_legal};
use crate::position::Position;

impl Position {
    /// Generate every legal move, annotated for short algebraic notation.
    ///
    /// Each pseudo-legal move is made and unmade in turn. Moves that leave the
    /// mover's king attacked are dropped; survivors are flagged as captures,
    /// checks, or mates, then disambiguated against each other.
    pub fn legal_moves(&mut self) -> MoveList {
        let us = self.side_to_move();
        let them = us.flip();
        let mut list = generate_pseudo_legal(self);

        list.retain(|mv| {
            let captured = self.make_move(*mv);
            let legal = !self.king_attacked(us);
            if legal {
                if captured.is_some() {
                    *mv = mv.with_capture();
                }
                if self.king_attacked(them) {
                    *mv = if self.has_legal_move() {
                        mv.with_check()
                    } else {
                        mv.with_mate()
                    };
                }
            }
            self.unmake_move();
            legal
        });

        disambiguate(list.as_mut_slice());
        list
    }

    /// Return `true` if the side to move has at least one legal move.
    pub fn has_legal_move(&mut self) -> bool {
        let us = self.side_to_move();
        let moves = generate_pseudo_legal(self);
        moves.as_slice().iter().any(|&mv| {
            self.make_move(mv);
            let legal = !self.king_attacked(us);
            self.unmake_move();
            legal
        })
    }

    /// Return `true` if `mv` is among the legal moves here.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        let us = self.side_to_move();
        if !generate_pseudo_legal(self).contains(mv) {
            return false;
        }
        self.make_move(mv);
        let legal = !self.king_attacked(us);
        self.unmake_move();
        legal
    }

    /// The side to move is in check and has no legal reply.
    pub fn is_checkmate(&mut self) -> bool {
        self.in_check() && !self.has_legal_move()
    }

    /// The side to move is not in check but has no legal move.
    pub fn is_stalemate(&mut self) -> bool {
        !self.in_check() && !self.has_legal_move()
    }

    /// Resolve move text against the legal moves.
    ///
    /// Accepts coordinate form (`e2e4`, `e7e8q`) or short algebraic
    /// notation (`Nf3`, `exd5`, `O-O`, `e8=Q+`). Check and mate suffixes are
    /// optional, and `0-0` is read as `O-O`.
    pub fn find_move(&mut self, text: &str) -> Option<Move> {
        let wanted = strip_suffixes(text).replace('0', "O");
        let moves = self.legal_moves();
        moves.as_slice().iter().copied().find(|mv| {
            mv.to_coordinate() == text || strip_suffixes(&mv.to_string()) == wanted
        })
    }
}

fn strip_suffixes(text: &str) -> &str {
    text.trim_end_matches(['+', '#', '!', '?'])
}

/// Mark origin file and/or rank on moves that share a piece and destination.
fn disambiguate(moves: &mut [Move]) {
    for i in 0..moves.len() {
        let mv = moves[i];
        if mv.is_promotion() || mv.is_castle() {
            continue;
        }
        let mut rivals = false;
        let mut same_file = false;
        let mut same_rank = false;
        for other in moves.iter() {
            if other.is_promotion()
                || other.is_castle()
                || other.piece() != mv.piece()
                || other.to() != mv.to()
                || other.from() == mv.from()
            {
                continue;
            }
            rivals = true;
            same_file |= other.from().file() == mv.from().file();
            same_rank |= other.from().rank() == mv.from().rank();
        }
        if !rivals {
            continue;
        }
        let mut annotated = mv;
        if same_file {
            annotated = annotated.with_show_rank();
        }
        // Rivals on neither line still need a qualifier; the file is the SAN default.
        if same_rank || !same_file {
            annotated = annotated.with_show_file();
        }
        moves[i] = annotated;
    }
}

#[cfg(test)]
mod tests {
    use crate::chess_move::Move;
    use crate::piece_kind::PieceKind;
    use crate::position::Position;
    use crate::square::Square;

    fn position(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    fn san(pos: &mut Position) -> Vec<String> {
        let mut text: Vec<String> = pos.legal_moves().as_slice().iter().map(|m| m.to_string()).collect();
        text.sort();
        text
    }

    #[test]
    fn start_has_twenty_legal_moves() {
        let mut pos = Position::starting_position();
        let before = pos.clone();
        assert_eq!(pos.legal_moves().len(), 20);
        assert_eq!(pos, before, "legal_moves must leave the position untouched");
        assert_eq!(pos.history_len(), 0);
    }

    #[test]
    fn pinned_knight_has_no_moves() {
        let mut pos = position("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let moves = pos.legal_moves();
        assert!(moves.as_slice().iter().all(|m| m.from() != Square::E2));
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let mut pos = position("4k3/8/8/8/8/8/r7/4K3 w - - 0 1");
        let targets: Vec<Square> = pos.legal_moves().as_slice().iter().map(|m| m.to()).collect();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&Square::D1));
        assert!(targets.contains(&Square::F1));
    }

    #[test]
    fn en_passant_discovered_check_is_illegal() {
        let mut pos = position("4k3/8/8/KPp4r/8/8/8/8 w - c6 0 1");
        assert!(pos.legal_moves().as_slice().iter().all(|m| !m.is_en_passant()));
    }

    #[test]
    fn en_passant_is_unique_and_flagged_as_capture() {
        let mut pos = Position::starting_position();
        for text in ["e4", "a6", "e5", "d5"] {
            let mv = pos.find_move(text).unwrap();
            pos.make_move(mv);
        }
        assert_eq!(pos.en_passant(), Some(Square::D6));
        let moves = pos.legal_moves();
        let ep: Vec<&Move> = moves.as_slice().iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(ep.len(), 1);
        assert!(ep[0].is_capture());
        assert_eq!(ep[0].to_string(), "exd6");

        let quiet = pos.find_move("Nf3").unwrap();
        pos.make_move(quiet);
        assert_eq!(pos.en_passant(), None);
    }

    #[test]
    fn check_and_mate_flags() {
        // Fool's mate: after 1.f3 e5 2.g4, Qh4 is mate.
        let mut pos = Position::starting_position();
        for text in ["f3", "e5", "g4"] {
            let mv = pos.find_move(text).unwrap();
            pos.make_move(mv);
        }
        let mate = pos.find_move("Qh4").unwrap();
        assert!(mate.is_mate());
        assert_eq!(mate.to_string(), "Qh4#");

        let mut pos = position("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        let check = pos.find_move("Ra8").unwrap();
        assert!(check.is_check() && !check.is_mate());
        assert_eq!(check.to_string(), "Ra8+");
    }

    #[test]
    fn checkmate_and_stalemate() {
        let mut mated = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(mated.is_checkmate());
        assert!(!mated.is_stalemate());

        let mut stale = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(stale.is_stalemate());
        assert!(!stale.is_checkmate());
        assert!(stale.legal_moves().is_empty());
    }

    #[test]
    fn castling_text() {
        let mut pos = position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let text = san(&mut pos);
        assert!(text.contains(&"O-O".to_string()));
        assert!(text.contains(&"O-O-O".to_string()));
        assert_eq!(pos.find_move("0-0"), Some(Move::new_castle(Square::E1, Square::G1)));
        assert_eq!(pos.find_move("e1c1"), Some(Move::new_castle(Square::E1, Square::C1)));
    }

    #[test]
    fn rooks_on_one_rank_show_file() {
        let mut pos = position("8/8/8/8/8/8/8/R6R w - - 0 1");
        let text = san(&mut pos);
        for shared in ["Rab1", "Rhb1", "Rad1", "Rhd1", "Rag1", "Rhg1"] {
            assert!(text.contains(&shared.to_string()), "missing {shared} in {text:?}");
        }
        // Squares only one rook reaches stay plain.
        assert!(text.contains(&"Ra8".to_string()));
        assert!(text.contains(&"Rh4".to_string()));
    }

    #[test]
    fn rooks_on_one_file_show_rank() {
        let mut pos = position("R7/8/8/8/8/8/8/R7 w - - 0 1");
        let text = san(&mut pos);
        assert!(text.contains(&"R1a4".to_string()), "{text:?}");
        assert!(text.contains(&"R8a4".to_string()), "{text:?}");
        assert!(text.contains(&"Rb1".to_string()));
    }

    #[test]
    fn knights_sharing_rank_or_file() {
        // b1 and f1 both reach d2; b1 and b5 both reach c3.
        let mut pos = position("8/8/8/1N6/8/8/8/1N3N2 w - - 0 1");
        let moves = pos.legal_moves();
        let to_d2: Vec<String> = moves
            .as_slice()
            .iter()
            .filter(|m| m.to() == Square::D2)
            .map(|m| m.to_string())
            .collect();
        assert_eq!(to_d2.len(), 2, "{to_d2:?}");
        assert!(to_d2.contains(&"Nbd2".to_string()));
        assert!(to_d2.contains(&"Nfd2".to_string()));

        let to_c3: Vec<String> = moves
            .as_slice()
            .iter()
            .filter(|m| m.to() == Square::C3)
            .map(|m| m.to_string())
            .collect();
        assert!(to_c3.contains(&"N1c3".to_string()), "{to_c3:?}");
        assert!(to_c3.contains(&"N5c3".to_string()), "{to_c3:?}");
    }

    #[test]
    fn knights_on_no_shared_line_show_file() {
        let mut pos = position("8/8/8/8/4N3/8/8/1N6 w - - 0 1");
        let moves = pos.legal_moves();
        let to_d2: Vec<String> = moves
            .as_slice()
            .iter()
            .filter(|m| m.to() == Square::D2)
            .map(|m| m.to_string())
            .collect();
        assert_eq!(to_d2.len(), 2, "{to_d2:?}");
        assert!(to_d2.contains(&"Nbd2".to_string()), "{to_d2:?}");
        assert!(to_d2.contains(&"Ned2".to_string()), "{to_d2:?}");
    }

    #[test]
    fn three_queens_need_full_square() {
        let mut pos = position("8/8/8/8/4Q2Q/8/8/7Q w - - 0 1");
        let moves = pos.legal_moves();
        let to_e1: Vec<String> = moves
            .as_slice()
            .iter()
            .filter(|m| m.to() == Square::E1)
            .map(|m| m.to_string())
            .collect();
        assert_eq!(to_e1.len(), 3);
        assert!(to_e1.contains(&"Qh4e1".to_string()), "{to_e1:?}");
        assert!(to_e1.contains(&"Qee1".to_string()), "{to_e1:?}");
        assert!(to_e1.contains(&"Q1e1".to_string()), "{to_e1:?}");
    }

    #[test]
    fn king_and_rooks_without_black_king() {
        // No destination is shared, so nothing needs disambiguating.
        let mut pos = position("8/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = pos.legal_moves();
        assert!(moves.as_slice().iter().all(|m| !m.show_file() && !m.show_rank()));
        assert_eq!(moves.as_slice().iter().filter(|m| m.is_castle()).count(), 2);
    }

    #[test]
    fn promotions_are_not_disambiguated() {
        let mut pos = position("1n2k3/P1P5/8/8/8/8/8/4K3 w - - 0 1");
        let moves = pos.legal_moves();
        let promos: Vec<&Move> = moves
            .as_slice()
            .iter()
            .filter(|m| m.to() == Square::B8)
            .collect();
        assert_eq!(promos.len(), 8);
        assert!(promos.iter().all(|m| m.is_capture() && !m.show_file() && !m.show_rank()));
    }

    #[test]
    fn is_legal_checks_the_king() {
        let mut pos = position("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(!pos.is_legal(Move::new(PieceKind::Knight, Square::E2, Square::C3)));
        assert!(pos.is_legal(Move::new(PieceKind::King, Square::E1, Square::D1)));
        assert!(!pos.is_legal(Move::new(PieceKind::Queen, Square::E2, Square::C3)));
    }

    #[test]
    fn find_move_coordinate_and_promotion() {
        let mut pos = position("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let q = pos.find_move("a7a8q").unwrap();
        assert_eq!(q.promotion(), Some(PieceKind::Queen));
        let n = pos.find_move("a8=N").unwrap();
        assert_eq!(n.promotion(), Some(PieceKind::Knight));
        assert!(pos.find_move("a7a8").is_none());
        assert!(pos.find_move("Qh5").is_none());
    }
}
