use std::time::Instant;

use anyhow::Result;

use super::{Move, Position, PositionStack};

/// Perform a perft at the specified depth, counting the leaf positions reachable from the top
/// of `stack`.
///
/// Moves at the last ply are counted without being made. The stack is returned to its starting ply.
///
/// # Example
/// ```
/// # use quadboard::*;
/// let mut stack = PositionStack::from_fen(FEN_STARTPOS).unwrap();
/// assert_eq!(perft(&mut stack, 0), 1);
/// assert_eq!(perft(&mut stack, 3), 8_902);
/// ```
pub fn perft(stack: &mut PositionStack, depth: usize) -> u64 {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return 1;
    }

    let position = *stack.current();
    let captures = position.generate_captures();
    let quiets = position.generate_quiets();

    let mut nodes = 0;
    for mv in captures.into_iter().chain(quiets) {
        if !position.is_legal(mv) {
            continue;
        }

        // Bulk counting; no need to make a move just to return 1.
        if depth == 1 {
            nodes += 1;
        } else {
            stack.make_move(mv);
            nodes += perft(stack, depth - 1);
            stack.unmake_move();
        }
    }

    nodes
}

/// Perform a perft at the specified depth for every legal move at the top of `stack`.
///
/// Returns each root move alongside the number of leaves below it, in generation order.
/// `depth` must be at least `1`.
pub fn splitperft(stack: &mut PositionStack, depth: usize) -> Vec<(Move, u64)> {
    let position = *stack.current();

    position
        .legal_moves()
        .into_iter()
        .map(|mv| {
            stack.make_move(mv);
            let nodes = perft(stack, depth.saturating_sub(1));
            stack.unmake_move();
            (mv, nodes)
        })
        .collect()
}

/// Runs a perft at `depth` from the position described by `fen`.
///
/// # Example
/// ```
/// # use quadboard::*;
/// assert_eq!(perft_fen(FEN_KIWIPETE, 2).unwrap(), 2_039);
/// ```
pub fn perft_fen(fen: &str, depth: usize) -> Result<u64> {
    let mut stack = PositionStack::from_fen(fen)?;
    Ok(perft(&mut stack, depth))
}

/// Prints a perft at the specified depth.
///
/// If the generic parameter `SPLIT` is `true`, this will perform a `splitperft`,
/// printing all moves at the first level (`depth`) followed by how many nodes
/// were reached after each of those moves.
///
/// If the generic parameter `PRETTY` is `true`, additional info will be printed.
pub fn print_perft<const PRETTY: bool, const SPLIT: bool>(position: &Position, depth: usize) -> u64 {
    if PRETTY {
        println!("Computing PERFT({depth}) of the following position:\n{position:?}\n");
    }

    let mut stack = PositionStack::new(*position);
    let side = position.side_to_move();

    let now = Instant::now();
    let total_nodes = if SPLIT && depth > 0 {
        let mut total_nodes = 0;
        for (mv, nodes) in splitperft(&mut stack, depth) {
            println!("{} {nodes}", mv.to_uci(side));
            total_nodes += nodes;
        }
        println!(); // Empty line between last splitperft and total_nodes
        total_nodes
    } else {
        perft(&mut stack, depth)
    };
    let elapsed = now.elapsed();

    if PRETTY {
        // Math
        let nps = total_nodes as f32 / elapsed.as_secs_f32();
        let m_nps = nps / 1_000_000.0;

        println!("Elapsed Time:          {elapsed:.1?}");
        println!("Total Nodes:           {total_nodes}");
        println!("Nodes / Sec:           {nps:.0}");
        println!("M Nodes / Sec:         {m_nps:.1}");
    } else {
        println!("{total_nodes}");
    }

    total_nodes
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    #[test]
    fn test_depth_one_counts_legal_moves() {
        for fen in [FEN_STARTPOS, FEN_KIWIPETE, "8/8/8/K2pP2r/8/8/8/4k3 w - d6 0 1"] {
            let mut stack = PositionStack::from_fen(fen).unwrap();
            let legal = stack.current().legal_moves().len() as u64;
            assert_eq!(perft(&mut stack, 1), legal, "{fen}");
        }
    }

    #[test]
    fn test_perft_leaves_stack_at_root() {
        let mut stack = PositionStack::from_fen(FEN_KIWIPETE).unwrap();
        let root = *stack.current();
        perft(&mut stack, 3);
        assert_eq!(stack.ply(), 0);
        assert_eq!(*stack.current(), root);
    }

    #[test]
    fn test_splitperft_sums_to_perft() {
        let mut stack = PositionStack::from_fen(FEN_KIWIPETE).unwrap();
        let split = splitperft(&mut stack, 3);
        assert_eq!(split.len(), 48);
        assert_eq!(split.iter().map(|(_, nodes)| nodes).sum::<u64>(), 97_862);

        let side = stack.current().side_to_move();
        let castle = split
            .iter()
            .find(|(mv, _)| mv.to_uci(side) == "e1g1")
            .map(|(_, nodes)| *nodes);
        assert_eq!(castle, Some(2_059));
    }

    #[test]
    fn test_checkmate_has_no_moves() {
        // Fool's mate
        let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1";
        assert_eq!(perft_fen(fen, 1).unwrap(), 0);
        assert_eq!(perft_fen(fen, 3).unwrap(), 0);
    }
}
