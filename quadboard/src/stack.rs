use anyhow::{Context, Result};
use log::debug;

use super::{Move, Position, MAX_PLY};

/// A bounded history of [`Position`]s, one per ply, used for copy-on-make search.
///
/// Making a move writes a modified copy of the current position into the next slot and advances
/// the cursor. Unmaking only retreats the cursor: earlier snapshots are never touched, so there is
/// nothing to restore.
#[derive(Clone)]
pub struct PositionStack {
    positions: [Position; MAX_PLY],
    ply: usize,
}

impl PositionStack {
    /// Creates a new stack rooted at `position`.
    pub fn new(position: Position) -> Self {
        let mut positions = [Position::empty(); MAX_PLY];
        positions[0] = position;
        Self { positions, ply: 0 }
    }

    /// Creates a new stack rooted at the position described by `fen`.
    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::new(Position::from_fen(fen)?))
    }

    /// Creates a new stack rooted at the position reached by playing `moves` from `fen`.
    ///
    /// `moves` is a whitespace-separated list of moves in UCI notation, each of which must be
    /// legal.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let stack = PositionStack::load(FEN_STARTPOS, "e2e4 c7c5 g1f3").unwrap();
    /// assert_eq!(stack.ply(), 0);
    /// assert_eq!(
    ///     stack.current().to_fen(),
    ///     "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 0 1"
    /// );
    ///
    /// assert!(PositionStack::load(FEN_STARTPOS, "e2e4 e2e4").is_err());
    /// ```
    pub fn load(fen: &str, moves: &str) -> Result<Self> {
        let mut position = Position::from_fen(fen)?;

        for uci in moves.split_whitespace() {
            let mv = position
                .find_move(uci)
                .with_context(|| format!("Failed to apply moves {moves:?} to {fen:?}"))?;
            debug!("Applying {uci} ({mv:?}) to {position}");
            position.make_move(mv);
        }

        Ok(Self::new(position))
    }

    /// The position at the top of the stack.
    #[inline(always)]
    pub fn current(&self) -> &Position {
        &self.positions[self.ply]
    }

    /// Number of moves made since the root.
    #[inline(always)]
    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Makes `mv` on a copy of the current position and pushes the result.
    ///
    /// # Panics
    /// If the stack is already full.
    #[inline(always)]
    pub fn make_move(&mut self, mv: Move) {
        assert!(
            self.ply + 1 < MAX_PLY,
            "Position stack overflow: cannot search deeper than {} plies",
            MAX_PLY - 1
        );

        let next = self.positions[self.ply].with_move_made(mv);
        self.ply += 1;
        self.positions[self.ply] = next;
    }

    /// Discards the current position, returning to the one before the last move.
    ///
    /// # Panics
    /// If no move has been made.
    #[inline(always)]
    pub fn unmake_move(&mut self) {
        assert!(self.ply > 0, "Cannot unmake a move at the root position");
        self.ply -= 1;
    }

    /// Returns to the root position.
    pub fn reset(&mut self) {
        self.ply = 0;
    }
}

impl From<Position> for PositionStack {
    fn from(position: Position) -> Self {
        Self::new(position)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    #[test]
    fn test_make_unmake_round_trip() {
        let mut stack = PositionStack::from_fen(FEN_KIWIPETE).unwrap();
        let root = *stack.current();

        for mv in root.legal_moves() {
            stack.make_move(mv);
            assert_eq!(stack.ply(), 1);
            assert_ne!(*stack.current(), root);

            stack.unmake_move();
            assert_eq!(*stack.current(), root, "{mv:?} was not undone");
        }
    }

    #[test]
    fn test_reset_returns_to_root() {
        let mut stack = PositionStack::from_fen(FEN_STARTPOS).unwrap();
        let root = *stack.current();

        for uci in ["e2e4", "e7e5", "g1f3"] {
            let mv = stack.current().find_move(uci).unwrap();
            stack.make_move(mv);
        }
        assert_eq!(stack.ply(), 3);
        assert_eq!(
            stack.current().to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 0 1"
        );

        stack.reset();
        assert_eq!(stack.ply(), 0);
        assert_eq!(*stack.current(), root);
    }

    #[test]
    fn test_load_rejects_illegal_moves() {
        assert!(PositionStack::load(FEN_STARTPOS, "e2e5").is_err());
        assert!(PositionStack::load("not a fen", "").is_err());
    }

    #[test]
    #[should_panic]
    fn test_unmake_at_root_panics() {
        let mut stack = PositionStack::from_fen(FEN_STARTPOS).unwrap();
        stack.unmake_move();
    }

    #[test]
    #[should_panic]
    fn test_overflow_panics() {
        let mut stack = PositionStack::from_fen(FEN_STARTPOS).unwrap();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

        for uci in shuffle.iter().cycle().take(MAX_PLY) {
            let mv = stack.current().find_move(uci).unwrap();
            stack.make_move(mv);
        }
    }
}
