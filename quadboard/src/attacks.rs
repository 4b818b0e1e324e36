use super::{Bitboard, Square};

const KNIGHT_ATTACKS: [Bitboard; 64] = unsafe {
    std::mem::transmute(*include_bytes!(concat!(
        env!("OUT_DIR"),
        "/knight_attacks.dat"
    )))
};

const KING_ATTACKS: [Bitboard; 64] = unsafe {
    std::mem::transmute(*include_bytes!(concat!(
        env!("OUT_DIR"),
        "/king_attacks.dat"
    )))
};

const FILE_A: u64 = Bitboard::FILE_A.inner();
const FILE_H: u64 = Bitboard::FILE_H.inner();
const RANK_1: u64 = Bitboard::RANK_1.inner();
const RANK_8: u64 = Bitboard::RANK_8.inner();
const DIAGONAL: u64 = 0x8040201008040201;
const ANTI_DIAGONAL: u64 = 0x8102040810204081;

/// Index of the lowest set bit. `bits` must be nonempty.
#[inline(always)]
const fn lsb(bits: u64) -> u32 {
    bits.trailing_zeros()
}

/// Index of the highest set bit. `bits` must be nonempty.
#[inline(always)]
const fn msb(bits: u64) -> u32 {
    63 ^ bits.leading_zeros()
}

/// Computes the possible moves for a Rook at a given [`Square`] with the provided blockers.
///
/// This will yield a [`Bitboard`] that allows the Rook to capture the first blocker in each
/// direction.
/// A blocker on `square` itself is ignored.
///
/// Each of the four rays is masked against the blockers plus a sentinel edge of the board,
/// so a bit-scan always finds a nearest stop. A mask is then laid back from each stop towards
/// the rook, and opposing masks are intersected to leave only the reachable segment.
///
/// # Example
/// ```
/// # use quadboard::*;
/// let blockers = Square::D6.bitboard() | Square::F4.bitboard();
/// let attacks = rook_attacks(Square::D4, blockers);
/// assert!(attacks.get(Square::D6));
/// assert!(!attacks.get(Square::D7));
/// assert!(attacks.get(Square::D1));
/// assert_eq!(attacks.population(), 10);
/// ```
pub const fn rook_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    let sq = square.inner() as u32;
    let piece = 1u64 << sq;
    let occupied = blockers.inner() & !piece;

    let up = (FILE_A << sq) & (occupied | RANK_8);
    let down = (FILE_H >> (63 - sq)) & (occupied | RANK_1);
    let right = (RANK_1 << sq) & (occupied | FILE_H);
    let left = (RANK_8 >> (63 - sq)) & (occupied | FILE_A);

    let vertical = (FILE_H >> (63 - lsb(up))) & (FILE_A << msb(down));
    let horizontal = (RANK_8 >> (63 - lsb(right))) & (RANK_1 << msb(left));

    Bitboard::new((vertical | horizontal) ^ piece)
}

/// Computes the possible moves for a Bishop at a given [`Square`] with the provided blockers.
///
/// This will yield a [`Bitboard`] that allows the Bishop to capture the first blocker in each
/// direction.
/// A blocker on `square` itself is ignored.
///
/// # Example
/// ```
/// # use quadboard::*;
/// let attacks = bishop_attacks(Square::A1, Bitboard::EMPTY_BOARD);
/// assert_eq!(attacks, Bitboard::A1_H8_DIAG ^ Square::A1.bitboard());
/// ```
pub const fn bishop_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    let sq = square.inner() as u32;
    let piece = 1u64 << sq;
    let occupied = blockers.inner() & !piece;

    // The sentinels are the board edges each ray can run into.
    let up_right = (DIAGONAL << sq) & (occupied | 0xFF80808080808080);
    let down_left = (DIAGONAL >> (63 - sq)) & (occupied | 0x01010101010101FF);
    let up_left = (ANTI_DIAGONAL << sq) & (occupied | 0xFF01010101010101);
    let down_right = (ANTI_DIAGONAL >> (63 - sq)) & (occupied | 0x80808080808080FF);

    let diagonal = (DIAGONAL >> (63 - lsb(up_right))) & (DIAGONAL << msb(down_left));
    let anti_diagonal = (ANTI_DIAGONAL >> (63 - lsb(up_left))) & (ANTI_DIAGONAL << msb(down_right));

    Bitboard::new((diagonal | anti_diagonal) ^ piece)
}

/// Computes the possible moves for a Queen at a given [`Square`] with the provided blockers.
///
/// This will yield a [`Bitboard`] that allows the Queen to capture the first blocker.
pub const fn queen_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    rook_attacks(square, blockers).or(bishop_attacks(square, blockers))
}

/// Fetch the raw, unblocked attacks for a knight on the provided square.
pub const fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square.index()]
}

/// Fetch the raw, unblocked attacks for a king on the provided square.
pub const fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square.index()]
}
