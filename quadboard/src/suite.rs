use super::{FEN_KIWIPETE, FEN_STARTPOS};

/// A position with a known perft result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerftCase {
    pub fen: &'static str,
    pub depth: usize,
    pub nodes: u64,
}

impl PerftCase {
    const fn new(fen: &'static str, depth: usize, nodes: u64) -> Self {
        Self { fen, depth, nodes }
    }
}

/// Reference positions for validating and benchmarking move generation.
///
/// See <https://www.chessprogramming.org/Perft_Results>.
pub const PERFT_SUITE: [PerftCase; 6] = [
    PerftCase::new(FEN_STARTPOS, 6, 119_060_324),
    PerftCase::new(FEN_KIWIPETE, 5, 193_690_690),
    PerftCase::new("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 7, 178_633_661),
    PerftCase::new(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        6,
        706_045_033,
    ),
    PerftCase::new(
        "rnbqkb1r/pp1p1ppp/2p5/4P3/2B5/8/PPP1NnPP/RNBQK2R w KQkq - 0 6",
        3,
        53_392,
    ),
    PerftCase::new(
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        5,
        164_075_551,
    ),
];
