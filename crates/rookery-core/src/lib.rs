//! Chess rules core: bitboard board representation, attack tables, move
//! generation, make/unmake, FEN, and perft.

pub mod attacks;
mod bitboard;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod legal;
pub mod movegen;
mod perft;
mod piece_kind;
mod position;
mod square;

pub use attacks::AttackTables;
pub use bitboard::{Bitboard, Squares};
pub use castle_rights::{CastlePath, CastleRights, CastleSide};
pub use chess_move::Move;
pub use color::Color;
pub use error::{BoardError, CacheError, FenError};
pub use fen::STARTING_FEN;
pub use movegen::{MoveList, attacked, generate_pseudo_legal};
pub use perft::{PerftStats, divide, perft, perft_parallel, perft_stats};
pub use piece_kind::PieceKind;
pub use position::{Position, PrettyPosition};
pub use square::Square;
