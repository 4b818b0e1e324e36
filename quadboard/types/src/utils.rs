use std::path::Path;

use super::{Bitboard, Square};

/// FEN string for the starting position of chess.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A popular FEN string for debugging move generation.
pub const FEN_KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// <https://www.chessprogramming.org/Chess_Position#cite_note-4>
pub const MAX_NUM_MOVES: usize = 218;

/// Capacity of a capture buffer for a single position.
pub const MAX_CAPTURES: usize = 64;

/// Capacity of a quiet-move buffer for a single position.
pub const MAX_QUIETS: usize = 256;

/// Number of positions a search stack can hold, root included.
pub const MAX_PLY: usize = 32;

/// File value stored when no en passant capture is available.
pub const NO_EN_PASSANT: u8 = 8;

/// Deltas for the movement of the King.
pub const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (0, -1),
    (-1, 0),
    (0, 1),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// Deltas for the movement of the Rook.
pub const ROOK_DELTAS: [(i8, i8); 4] = [
    KING_DELTAS[0],
    KING_DELTAS[1],
    KING_DELTAS[2],
    KING_DELTAS[3],
];

/// Deltas for the movement of the Bishop.
pub const BISHOP_DELTAS: [(i8, i8); 4] = [
    KING_DELTAS[4],
    KING_DELTAS[5],
    KING_DELTAS[6],
    KING_DELTAS[7],
];

/// Deltas for the movement of the Knight.
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

/// Generates the attack tables for the leaper pieces, and writes them to new files created in
/// `outdir`.
///
/// This will produce the following 2 files located in `outdir`:
///     * `knight_attacks.dat`
///     * `king_attacks.dat`
///
/// Each file is 64 [`Bitboard`]s laid out in native byte order, indexed by [`Square`].
pub fn generate_piece_attack_datfiles<P: AsRef<Path>>(outdir: P) -> std::io::Result<()> {
    // Generate the blobs
    let knight: [u8; 512] = unsafe { std::mem::transmute(generate_leaper_mobility(&KNIGHT_DELTAS)) };
    let king: [u8; 512] = unsafe { std::mem::transmute(generate_leaper_mobility(&KING_DELTAS)) };

    // Write the blobs
    let path = |name| Path::new(outdir.as_ref()).join(name);
    std::fs::write(path("knight_attacks.dat"), knight)?;
    std::fs::write(path("king_attacks.dat"), king)?;

    Ok(())
}

/// Generates the moves from every location for the "Leaper" pieces.
/// Leapers may "leap" or "jump" to a square a specified distance away.
///
/// In standard chess, the Leapers are the King and Knight.
fn generate_leaper_mobility(deltas: &[(i8, i8)]) -> [Bitboard; Square::COUNT] {
    let mut mobility = [Bitboard::default(); Square::COUNT];

    for square in Square::iter() {
        let mut movement = Bitboard::default();

        for (df, dr) in deltas {
            if let Some(shifted) = square.offset(*df, *dr) {
                movement.set(shifted);
            }
        }

        mobility[square] = movement;
    }

    mobility
}

/// Computes the squares attacked by a slider on `square` by walking each ray in `deltas` one
/// step at a time.
///
/// Each ray stops at (and includes) the first square set in `blockers`.
/// Used as a reference for the bit-scan slider generators.
///
/// # Example
/// ```
/// # use types::{Bitboard, Square, ray_attacks, ROOK_DELTAS};
/// let blockers = Square::A3.bitboard();
/// let attacks = ray_attacks(&ROOK_DELTAS, Square::A1, blockers);
/// assert_eq!(attacks, Square::A2.bitboard() | Square::A3.bitboard() | (Bitboard::RANK_1 ^ Square::A1.bitboard()));
/// ```
pub fn ray_attacks(deltas: &[(i8, i8)], square: Square, blockers: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY_BOARD;

    for (df, dr) in deltas {
        let mut ray = square;

        while let Some(shifted) = ray.offset(*df, *dr) {
            ray = shifted;
            attacks |= ray.bitboard();

            if blockers.get(ray) {
                break;
            }
        }
    }

    attacks
}
