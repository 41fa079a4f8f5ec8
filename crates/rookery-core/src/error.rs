//! Error types for FEN parsing, position validation, and the attack-table cache.

/// Errors that occur when parsing a FEN string.
///
/// Every variant identifies the field that failed; parsing never partially
/// mutates an existing position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// The FEN string does not have exactly 6 space-separated fields.
    #[error("expected 6 FEN fields, found {found}")]
    WrongFieldCount {
        /// Number of fields found.
        found: usize,
    },
    /// The piece placement section does not have exactly 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount {
        /// Number of ranks found.
        found: usize,
    },
    /// A rank in the piece placement describes more or fewer than 8 squares.
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength {
        /// Zero-based rank index in FEN order (0 = rank 8, 7 = rank 1).
        rank_index: usize,
        /// Number of squares described.
        length: usize,
    },
    /// An unrecognized character appeared in the piece placement.
    #[error("invalid square or piece token in piece placement: '{character}'")]
    InvalidPieceChar {
        /// The offending character.
        character: char,
    },
    /// The active color field is not "w" or "b".
    #[error("invalid active color: \"{found}\"")]
    InvalidColor {
        /// The invalid color string.
        found: String,
    },
    /// The castling field is empty, too long, or repeats a flag.
    #[error("invalid castling field: \"{found}\"")]
    InvalidCastling {
        /// The invalid castling string.
        found: String,
    },
    /// An unrecognized character appeared in the castling rights field.
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar {
        /// The invalid character.
        character: char,
    },
    /// The en passant field is not "-" or a square on rank 3 or 6.
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant {
        /// The invalid en passant string.
        found: String,
    },
    /// A move counter is not a number or is out of range.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter {
        /// The field name ("halfmove clock" or "fullmove number").
        field: &'static str,
        /// The invalid string.
        found: String,
    },
}

/// Invariant violations detected by [`Position::validate`](crate::Position::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Two different piece kinds claim the same square.
    #[error("overlapping piece bitboards")]
    OverlappingPieces,
    /// The two side bitboards overlap.
    #[error("white and black side bitboards overlap")]
    InconsistentSides,
    /// The union of piece bitboards differs from the union of side bitboards.
    #[error("piece bitboards are inconsistent with side bitboards")]
    InconsistentOccupied,
    /// The square lookup disagrees with the bitboards.
    #[error("square lookup disagrees with bitboards at {square}")]
    InconsistentLookup {
        /// The first square found out of sync.
        square: crate::Square,
    },
}

/// Errors from loading or saving a serialized attack-table snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading or writing the cache file failed.
    #[error("attack cache I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
    /// The cache file is not a valid snapshot.
    #[error("attack cache decode error: {source}")]
    Decode {
        /// The underlying decode error.
        #[from]
        source: serde_json::Error,
    },
    /// The snapshot decoded but its tables have the wrong shape.
    #[error("attack cache has malformed {what}")]
    Shape {
        /// Which table failed validation.
        what: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::{BoardError, CacheError, FenError};

    #[test]
    fn fen_error_display() {
        let err = FenError::WrongFieldCount { found: 4 };
        assert_eq!(err.to_string(), "expected 6 FEN fields, found 4");
        let err = FenError::InvalidPieceChar { character: 'x' };
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn board_error_display() {
        let err = BoardError::OverlappingPieces;
        assert_eq!(err.to_string(), "overlapping piece bitboards");
    }

    #[test]
    fn cache_error_from_io() {
        let io = std::io::Error::other("disk gone");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Io { .. }));
    }
}
