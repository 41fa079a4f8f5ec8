//! FEN string parsing and serialization for [`Position`].

use std::fmt;
use std::str::FromStr;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn parse_placement(placement: &str, pos: &mut Position) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    for (rank_index, rank_str) in ranks.iter().enumerate() {
        // FEN lists rank 8 first.
        let rank = 7 - rank_index as u8;
        let mut file: usize = 0;

        for c in rank_str.chars() {
            if let Some(digit) = c.to_digit(10) {
                if !(1..=8).contains(&digit) {
                    return Err(FenError::InvalidPieceChar { character: c });
                }
                file += digit as usize;
                continue;
            }

            let kind = PieceKind::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
            let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
            let sq = Square::from_coords(file as u8, rank).ok_or(FenError::BadRankLength {
                rank_index,
                length: file + 1,
            })?;
            pos.put(sq, kind, color);
            file += 1;
        }

        if file != 8 {
            return Err(FenError::BadRankLength { rank_index, length: file });
        }
    }
    Ok(())
}

fn parse_en_passant(field: &str, side_to_move: Color, pos: &Position) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant { found: field.to_string() };
    let sq = Square::from_algebraic(field).ok_or_else(invalid)?;

    // The target is the empty square the opponent's pawn just skipped over.
    let (target_rank, pushed_to) = match side_to_move {
        Color::White => (5, sq.down()),
        Color::Black => (2, sq.up()),
    };
    if sq.rank() != target_rank || pos.piece_on(sq).is_some() {
        return Err(invalid());
    }
    let pushed_pawn = pushed_to.filter(|&to| {
        pos.piece_on(to) == Some(PieceKind::Pawn) && pos.color_on(to) == Some(side_to_move.flip())
    });
    match pushed_pawn {
        Some(_) => Ok(Some(sq)),
        None => Err(invalid()),
    }
}

fn parse_counter(field: &'static str, text: &str, min: u16) -> Result<u16, FenError> {
    match text.parse::<u16>() {
        Ok(n) if n >= min => Ok(n),
        _ => Err(FenError::InvalidMoveCounter { field, found: text.to_string() }),
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let [placement, color, castling, en_passant, halfmove, fullmove] = fields[..] else {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        };

        let mut pos = Position::empty();
        parse_placement(placement, &mut pos)?;

        let side_to_move = Color::from_fen(color).ok_or_else(|| FenError::InvalidColor {
            found: color.to_string(),
        })?;
        let castling = CastleRights::from_fen(castling)?;
        let en_passant = parse_en_passant(en_passant, side_to_move, &pos)?;
        let halfmove_clock = parse_counter("halfmove clock", halfmove, 0)?;
        let fullmove_number = parse_counter("fullmove number", fullmove, 1)?;

        pos.set_state(side_to_move, castling, en_passant, halfmove_clock, fullmove_number);
        Ok(pos)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            let mut empty_count = 0u8;

            for file in 0u8..8 {
                let occupant = Square::from_coords(file, rank)
                    .and_then(|sq| Some((self.piece_on(sq)?, self.color_on(sq)?)));
                match occupant {
                    Some((kind, color)) => {
                        if empty_count > 0 {
                            write!(f, "{empty_count}")?;
                            empty_count = 0;
                        }
                        let c = match color {
                            Color::White => kind.san_char(),
                            Color::Black => kind.fen_char(),
                        };
                        write!(f, "{c}")?;
                    }
                    None => empty_count += 1,
                }
            }

            if empty_count > 0 {
                write!(f, "{empty_count}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }

        write!(f, " {} {}", self.side_to_move(), self.castling())?;
        match self.en_passant() {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::color::Color;
    use crate::error::FenError;
    use crate::piece_kind::PieceKind;
    use crate::position::Position;
    use crate::square::Square;

    fn parse(fen: &str) -> Result<Position, FenError> {
        fen.parse()
    }

    #[test]
    fn starting_fen_matches_starting_position() {
        let pos = parse(STARTING_FEN).unwrap();
        assert_eq!(pos, Position::starting_position());
        assert_eq!(pos.to_string(), STARTING_FEN);
    }

    #[test]
    fn roundtrip_various() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            "4k3/8/8/8/8/8/8/4K3 b - - 49 120",
            "8/8/8/8/8/8/8/R3K2R w KQ - 0 1",
        ] {
            assert_eq!(parse(fen).unwrap().to_string(), fen, "roundtrip failed for {fen}");
        }
    }

    #[test]
    fn fields_are_parsed() {
        let pos = parse("4k3/8/8/3pP3/8/8/8/4K3 w Kq d6 12 34").unwrap();
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.castling().to_fen(), "Kq");
        assert_eq!(pos.en_passant(), Some(Square::D6));
        assert_eq!(pos.halfmove_clock(), 12);
        assert_eq!(pos.fullmove_number(), 34);
        assert_eq!(pos.piece_on(Square::E5), Some(PieceKind::Pawn));
        assert_eq!(pos.color_on(Square::E5), Some(Color::White));
        assert!(pos.validate().is_ok());
    }

    #[test]
    fn wrong_field_count() {
        assert_eq!(
            parse("8/8/8/8/8/8/8/8 w - - 0"),
            Err(FenError::WrongFieldCount { found: 5 })
        );
        assert_eq!(parse(""), Err(FenError::WrongFieldCount { found: 0 }));
    }

    #[test]
    fn wrong_rank_count() {
        assert_eq!(
            parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::WrongRankCount { found: 7 })
        );
    }

    #[test]
    fn rank_too_long_or_short() {
        assert_eq!(
            parse("9/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPieceChar { character: '9' })
        );
        assert_eq!(
            parse("8/8/8/8/8/8/8/ppppppppp w - - 0 1"),
            Err(FenError::BadRankLength { rank_index: 7, length: 9 })
        );
        assert_eq!(
            parse("7/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::BadRankLength { rank_index: 0, length: 7 })
        );
        assert_eq!(
            parse("8/8/8/8/8/8/8/44p w - - 0 1"),
            Err(FenError::BadRankLength { rank_index: 7, length: 9 })
        );
    }

    #[test]
    fn invalid_piece_char() {
        assert_eq!(
            parse("8/8/8/8/8/8/8/7x w - - 0 1"),
            Err(FenError::InvalidPieceChar { character: 'x' })
        );
    }

    #[test]
    fn invalid_color() {
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::InvalidColor { .. })
        ));
    }

    #[test]
    fn invalid_castling() {
        assert_eq!(
            parse("8/8/8/8/8/8/8/8 w KX - 0 1"),
            Err(FenError::InvalidCastlingChar { character: 'X' })
        );
    }

    #[test]
    fn invalid_en_passant() {
        for ep in ["e9", "z3", "e4", "e3e"] {
            let fen = format!("8/8/8/8/8/8/8/8 w - {ep} 0 1");
            assert!(
                matches!(parse(&fen), Err(FenError::InvalidEnPassant { .. })),
                "accepted en passant {ep}"
            );
        }
    }

    #[test]
    fn en_passant_must_match_the_board() {
        let accepted = [
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
            "4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1",
        ];
        for fen in accepted {
            assert!(parse(fen).is_ok(), "rejected {fen}");
        }

        let rejected = [
            // Rank belongs to the other side's double push.
            "4k3/8/8/3pP3/8/8/8/4K3 b - d6 0 1",
            "4k3/8/8/8/3Pp3/8/8/4K3 w - d3 0 1",
            // Target square occupied.
            "4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1",
            // Nothing, or a friendly pawn, in front of the target.
            "4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1",
            "4k3/8/8/3PP3/8/8/8/4K3 w - d6 0 1",
            // An enemy piece that is not a pawn.
            "4k3/8/8/3nP3/8/8/8/4K3 w - d6 0 1",
        ];
        for fen in rejected {
            assert!(
                matches!(parse(fen), Err(FenError::InvalidEnPassant { .. })),
                "accepted {fen}"
            );
        }
    }

    #[test]
    fn invalid_counters() {
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::InvalidMoveCounter { field: "halfmove clock", .. })
        ));
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 w - - 0 -3"),
            Err(FenError::InvalidMoveCounter { field: "fullmove number", .. })
        ));
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 w - - 0 0"),
            Err(FenError::InvalidMoveCounter { field: "fullmove number", .. })
        ));
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 w - - 70000 1"),
            Err(FenError::InvalidMoveCounter { field: "halfmove clock", .. })
        ));
    }
}
