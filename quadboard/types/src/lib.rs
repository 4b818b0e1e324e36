/// All things related to Bitboards.
pub mod bitboard;
/// Enums for piece kinds, colors, and a struct for a chess piece.
pub mod piece;
/// Squares on a chessboard, indexed `0..64` from a1 to h8.
pub mod square;
/// Misc constants, board-size limits, and generation of the leaper attack tables.
pub mod utils;

pub use bitboard::*;
pub use piece::*;
pub use square::*;
pub use utils::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::bitboard::*;
    pub use crate::piece::*;
    pub use crate::square::*;
    pub use crate::utils::*;
}
