use anyhow::{bail, Result};
use clap::Parser;
use log::{info, warn};
use quadboard::{print_perft, PositionStack, MAX_PLY, PERFT_SUITE};

mod parallel;
mod report;

/// Counts the leaf nodes of the legal move tree of a chess position.
///
/// With no `--fen`, runs the built-in suite of reference positions and checks every result.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// FEN string of the position to count from
    #[arg(short, long)]
    fen: Option<String>,

    /// Number of plies to search
    #[arg(short, long, default_value_t = 5)]
    depth: usize,

    /// Moves to play from the FEN before counting, in UCI notation (e.g. "e2e4 e7e5")
    #[arg(short, long, default_value = "", requires = "fen")]
    moves: String,

    /// Print the node count below every root move
    #[arg(short, long)]
    split: bool,

    /// Print the board, elapsed time and nodes per second
    #[arg(short, long)]
    pretty: bool,

    /// Worker threads for counting root moves in parallel. 0 uses one per logical CPU.
    #[arg(short, long, default_value_t = 1)]
    threads: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let Some(fen) = args.fen else {
        info!("No FEN supplied, running the perft suite");
        return report::run_suite(&PERFT_SUITE);
    };

    if args.depth >= MAX_PLY {
        bail!("Depth must be less than {MAX_PLY}. Got {}", args.depth);
    }

    let stack = PositionStack::load(&fen, &args.moves)?;
    let position = *stack.current();

    let threads = match args.threads {
        0 => num_cpus::get(),
        n => n,
    };

    if threads > 1 && args.depth > 1 {
        info!("Counting with {threads} threads");
        parallel::print_parallel_perft(&position, args.depth, threads, args.split, args.pretty)?;
        return Ok(());
    }

    if threads > 1 {
        warn!("Depth {} is too shallow to split across threads, counting on one", args.depth);
    }

    match (args.pretty, args.split) {
        (true, true) => print_perft::<true, true>(&position, args.depth),
        (true, false) => print_perft::<true, false>(&position, args.depth),
        (false, true) => print_perft::<false, true>(&position, args.depth),
        (false, false) => print_perft::<false, false>(&position, args.depth),
    };

    Ok(())
}
