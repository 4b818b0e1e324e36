pub use types::*;

/// Attack generation for every piece: leaper lookup tables and bit-scan sliders.
pub mod attacks;
/// Pseudo-legal move generation, the legality filter and legal move lists.
pub mod movegen;
/// Enums and structs for modeling the movement of a piece on a chessboard.
pub mod moves;
/// Utility function for performance testing.
pub mod perft;
/// A chessboard in quad-bitboard form, always seen from the side to move.
pub mod position;
/// A fixed-depth history of positions for copy-on-make search.
pub mod stack;
/// Positions with known perft results.
pub mod suite;

pub use attacks::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use position::*;
pub use stack::*;
pub use suite::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::attacks::*;
    pub use crate::movegen::*;
    pub use crate::moves::*;
    pub use crate::perft::*;
    pub use crate::position::*;
    pub use crate::stack::*;
    pub use crate::suite::*;
    pub use types::prelude::*;
}
