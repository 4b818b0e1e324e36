use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use log::{error, info};
use quadboard::{perft, PerftCase, PositionStack};

/// Thousands of nodes per second.
fn knps(nodes: u64, elapsed: Duration) -> f64 {
    nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON) / 1_000.0
}

/// Runs every case of `cases`, printing the expected and computed counts with timings.
///
/// Fails if any count differs from the expected one.
pub fn run_suite(cases: &[PerftCase]) -> Result<()> {
    let mut total_nodes = 0;
    let mut total_time = Duration::ZERO;
    let mut failures = 0;

    for (i, case) in cases.iter().enumerate() {
        info!("Case {}/{}: perft({}) of {}", i + 1, cases.len(), case.depth, case.fen);
        let mut stack = PositionStack::from_fen(case.fen)?;

        let now = Instant::now();
        let nodes = perft(&mut stack, case.depth);
        let elapsed = now.elapsed();

        println!(
            "Expected: {:>12} Computed: {:>12} {:>8} ms {:>10.0} K NPS",
            case.nodes,
            nodes,
            elapsed.as_millis(),
            knps(nodes, elapsed)
        );

        if nodes != case.nodes {
            error!(
                "perft({}) of {} computed {nodes} nodes, expected {}",
                case.depth, case.fen, case.nodes
            );
            failures += 1;
        }

        total_nodes += nodes;
        total_time += elapsed;
    }

    println!(
        "Total:    {total_nodes:>12} nodes {:>17} ms {:>10.0} K NPS",
        total_time.as_millis(),
        knps(total_nodes, total_time)
    );

    ensure!(failures == 0, "{failures} of {} perft cases failed", cases.len());
    Ok(())
}
