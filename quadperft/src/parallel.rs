use std::{sync::mpsc, time::Instant};

use anyhow::{ensure, Result};
use log::error;
use quadboard::{perft, Move, Position, PositionStack};
use threadpool::ThreadPool;

/// Splits a perft of `position` at the root, counting each root move's subtree on a pool of
/// `threads` workers.
///
/// Every job owns a private [`PositionStack`] rooted at its child position.
/// Results are returned in the order the root moves were generated.
pub fn parallel_splitperft(
    position: &Position,
    depth: usize,
    threads: usize,
) -> Result<Vec<(Move, u64)>> {
    let pool = ThreadPool::new(threads);
    let (sender, receiver) = mpsc::channel();
    let moves = position.legal_moves();

    for (i, mv) in moves.iter().copied().enumerate() {
        let sender = sender.clone();
        let child = position.with_move_made(mv);

        pool.execute(move || {
            let mut stack = PositionStack::new(child);
            let nodes = perft(&mut stack, depth.saturating_sub(1));

            if let Err(err) = sender.send((i, nodes)) {
                error!("Failed to send perft result for {mv:?}: {err}");
            }
        });
    }

    // The receiver stops once every job has dropped its sender
    drop(sender);

    let mut counts = vec![None; moves.len()];
    for (i, nodes) in receiver {
        counts[i] = Some(nodes);
    }

    let missing = counts.iter().filter(|nodes| nodes.is_none()).count();
    ensure!(
        missing == 0,
        "{missing} of {} root moves were not counted ({} workers panicked)",
        moves.len(),
        pool.panic_count()
    );

    Ok(moves
        .into_iter()
        .zip(counts.into_iter().flatten())
        .collect())
}

/// Prints a perft at the specified depth, counted on `threads` workers.
///
/// Output matches [`quadboard::print_perft`].
pub fn print_parallel_perft(
    position: &Position,
    depth: usize,
    threads: usize,
    split: bool,
    pretty: bool,
) -> Result<u64> {
    if pretty {
        println!("Computing PERFT({depth}) of the following position:\n{position:?}\n");
    }

    let side = position.side_to_move();

    let now = Instant::now();
    let results = parallel_splitperft(position, depth, threads)?;
    let elapsed = now.elapsed();

    let total_nodes = results.iter().map(|(_, nodes)| nodes).sum::<u64>();
    if split {
        for (mv, nodes) in &results {
            println!("{} {nodes}", mv.to_uci(side));
        }
        println!();
    }

    if pretty {
        let nps = total_nodes as f32 / elapsed.as_secs_f32();
        let m_nps = nps / 1_000_000.0;

        println!("Elapsed Time:          {elapsed:.1?}");
        println!("Total Nodes:           {total_nodes}");
        println!("Nodes / Sec:           {nps:.0}");
        println!("M Nodes / Sec:         {m_nps:.1}");
    } else {
        println!("{total_nodes}");
    }

    Ok(total_nodes)
}
