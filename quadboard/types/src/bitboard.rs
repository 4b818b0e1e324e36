use std::{
    fmt,
    ops::{Not, Shl, Shr},
};

use super::Square;

/// A set of squares, one bit per square.
///
/// Bit `n` is square `n` in little-endian rank-file order: a1 is bit 0, h1 is bit 7 and h8 is
/// bit 63. Each byte is therefore one rank, which is what makes [`Bitboard::flipped`] a plain
/// byte swap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const EMPTY_BOARD: Self = Self(0);
    pub const FULL_BOARD: Self = Self(u64::MAX);

    pub const FILE_A: Self = Self(0x0101_0101_0101_0101);
    pub const FILE_H: Self = Self(Self::FILE_A.0 << 7);
    pub const NOT_FILE_A: Self = Self(!Self::FILE_A.0);
    pub const NOT_FILE_H: Self = Self(!Self::FILE_H.0);

    pub const RANK_1: Self = Self(0xFF);
    pub const RANK_2: Self = Self(Self::RANK_1.0 << 8);
    pub const RANK_3: Self = Self(Self::RANK_1.0 << 16);
    pub const RANK_4: Self = Self(Self::RANK_1.0 << 24);
    pub const RANK_5: Self = Self(Self::RANK_1.0 << 32);
    pub const RANK_6: Self = Self(Self::RANK_1.0 << 40);
    pub const RANK_7: Self = Self(Self::RANK_1.0 << 48);
    pub const RANK_8: Self = Self(Self::RANK_1.0 << 56);

    /// a1 through h8.
    pub const A1_H8_DIAG: Self = Self(0x8040_2010_0804_0201);
    /// h1 through a8.
    pub const H1_A8_DIAG: Self = Self(0x0102_0408_1020_4080);

    /// # Example
    /// ```
    /// # use types::Bitboard;
    /// assert_eq!(Bitboard::new(0xFF00), Bitboard::RANK_2);
    /// ```
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.inner())
    }

    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Mirrors the board top to bottom, so that rank `r` lands on rank `9 - r`.
    ///
    /// # Example
    /// ```
    /// # use types::Bitboard;
    /// assert_eq!(Bitboard::RANK_7.flipped(), Bitboard::RANK_2);
    /// assert_eq!(Bitboard::FILE_H.flipped(), Bitboard::FILE_H);
    /// ```
    pub const fn flipped(&self) -> Self {
        Self(self.0.swap_bytes())
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }

    pub const fn get(&self, square: Square) -> bool {
        self.0 >> square.inner() & 1 == 1
    }

    pub fn set(&mut self, square: Square) {
        self.0 |= Self::from_square(square).0;
    }

    pub fn clear(&mut self, square: Square) {
        self.0 &= !Self::from_square(square).0;
    }

    /// Lowest occupied square, or `None` on an empty board.
    pub const fn lsb(&self) -> Option<Square> {
        match self.0 {
            0 => None,
            _ => Some(self.lsb_unchecked()),
        }
    }

    /// Lowest occupied square. Only meaningful on a nonempty board.
    ///
    /// # Example
    /// ```
    /// # use types::{Bitboard, Square};
    /// assert_eq!(Bitboard::FILE_H.lsb_unchecked(), Square::H1);
    /// ```
    pub const fn lsb_unchecked(&self) -> Square {
        debug_assert!(self.0 != 0, "bit scan of an empty board");
        Square::from_bits_unchecked(self.0.trailing_zeros() as u8)
    }

    /// Highest occupied square. Only meaningful on a nonempty board.
    ///
    /// # Example
    /// ```
    /// # use types::{Bitboard, Square};
    /// assert_eq!(Bitboard::FILE_H.msb_unchecked(), Square::H8);
    /// ```
    pub const fn msb_unchecked(&self) -> Square {
        debug_assert!(self.0 != 0, "bit scan of an empty board");
        Square::from_bits_unchecked(63 - self.0.leading_zeros() as u8)
    }

    /// Keeps only the lowest set bit.
    ///
    /// # Example
    /// ```
    /// # use types::Bitboard;
    /// assert_eq!(Bitboard::new(0b0110_0100).isolate_lsb(), Bitboard::new(0b0100));
    /// assert!(Bitboard::EMPTY_BOARD.isolate_lsb().is_empty());
    /// ```
    pub const fn isolate_lsb(self) -> Self {
        Self(self.0 & self.0.wrapping_neg())
    }

    /// Removes the lowest set bit and returns its square.
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let square = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(square)
    }

    /// # Example
    /// ```
    /// # use types::Bitboard;
    /// assert_eq!((Bitboard::RANK_1 | Bitboard::FILE_A).population(), 15);
    /// ```
    pub const fn population(&self) -> u32 {
        self.0.count_ones()
    }

    /// Occupied squares, from a1 upward.
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bb: *self }
    }

    // `const` forms of the operators, for building masks in constants.

    pub const fn and(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn xor(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    pub const fn not(self) -> Self {
        Self(!self.0)
    }

    /// Writes the board as eight rows, rank 8 first, with `rank_label` before each row.
    fn write_grid(
        &self,
        f: &mut fmt::Formatter<'_>,
        rank_label: impl Fn(u8) -> String,
    ) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{}", rank_label(rank))?;
            for file in 0..8 {
                let mark = if self.get(Square::new(file, rank)) { 'X' } else { '.' };
                write!(f, "{mark} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

macro_rules! impl_bitwise_op {
    ($op:ident, $op_assign:ident, $func:ident, $func_assign:ident, $op_tok:tt) => {
        impl std::ops::$op for Bitboard {
            type Output = Self;
            fn $func(self, rhs: Self) -> Self::Output {
                Self(self.0 $op_tok rhs.0)
            }
        }

        impl std::ops::$op_assign for Bitboard {
            fn $func_assign(&mut self, rhs: Self) {
                self.0 = self.0 $op_tok rhs.0;
            }
        }
    };
}

impl_bitwise_op!(BitAnd, BitAndAssign, bitand, bitand_assign, &);
impl_bitwise_op!(BitOr, BitOrAssign, bitor, bitor_assign, |);
impl_bitwise_op!(BitXor, BitXorAssign, bitxor, bitxor_assign, ^);

impl Not for Bitboard {
    type Output = Self;
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl Shl<u32> for Bitboard {
    type Output = Self;
    fn shl(self, rhs: u32) -> Self::Output {
        Self(self.0 << rhs)
    }
}

impl Shr<u32> for Bitboard {
    type Output = Self;
    fn shr(self, rhs: u32) -> Self::Output {
        Self(self.0 >> rhs)
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self::from_square(square)
    }
}

/// Bare 8x8 grid of `X` and `.`.
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_grid(f, |_| String::new())
    }
}

/// Grid with rank and file labels.
impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_grid(f, |rank| format!("{}| ", rank + 1))?;
        write!(f, " +----------------\n   a b c d e f g h")
    }
}

pub struct BitboardIter {
    bb: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    fn next(&mut self) -> Option<Self::Item> {
        self.bb.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bb.population() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_grid_display() {
        let board = Bitboard::RANK_7 | Bitboard(Bitboard::FILE_A.0 << 1);
        let expected = ". X . . . . . . \n\
                        X X X X X X X X \n\
                        . X . . . . . . \n\
                        . X . . . . . . \n\
                        . X . . . . . . \n\
                        . X . . . . . . \n\
                        . X . . . . . . \n\
                        . X . . . . . . \n";
        assert_eq!(board.to_string(), expected);

        let debug = format!("{:?}", Bitboard::from_square(Square::H8));
        assert!(debug.starts_with("8| . . . . . . . X \n7| "));
        assert!(debug.ends_with("a b c d e f g h"));
    }

    #[test]
    fn test_derived_masks() {
        assert_eq!(Bitboard::FILE_H, Bitboard::new(0x8080_8080_8080_8080));
        assert_eq!(Bitboard::RANK_8, Bitboard::new(0xFF00_0000_0000_0000));
        assert_eq!(Bitboard::FILE_A | Bitboard::NOT_FILE_A, Bitboard::FULL_BOARD);
        assert!((Bitboard::FILE_H & Bitboard::NOT_FILE_H).is_empty());
    }

    #[test]
    fn test_bit_scans() {
        let board = Bitboard::from_square(Square::D2) | Bitboard::from_square(Square::G7);
        assert_eq!(board.lsb(), Some(Square::D2));
        assert_eq!(board.msb_unchecked(), Square::G7);
        assert_eq!(Bitboard::EMPTY_BOARD.lsb(), None);

        assert_eq!(Bitboard::new(1).msb_unchecked(), Square::A1);
        assert_eq!(Bitboard::new(1 << 63).lsb_unchecked(), Square::H8);
    }

    #[test]
    fn test_pop_lsb_drains_in_order() {
        let mut board = Bitboard::RANK_3;
        let mut files = Vec::new();
        while let Some(square) = board.pop_lsb() {
            files.push(square);
        }
        assert!(board.is_empty());
        assert_eq!(files.len(), 8);
        assert_eq!(files.first(), Some(&Square::A3));
        assert_eq!(files.last(), Some(&Square::H3));
        assert_eq!(board.pop_lsb(), None);
    }

    #[test]
    fn test_set_and_clear() {
        let mut board = Bitboard::EMPTY_BOARD;
        board.set(Square::E4);
        board.set(Square::E5);
        board.clear(Square::E4);
        assert_eq!(board, Bitboard::from(Square::E5));
        assert!(!board.get(Square::E4));
    }

    #[test]
    fn test_flip_is_an_involution() {
        for _ in 0..1000 {
            let board = Bitboard::new(rand::random());
            assert_eq!(board.flipped().flipped(), board);
            assert_eq!(board.flipped().population(), board.population());
        }
        assert_eq!(Bitboard::RANK_1.flipped(), Bitboard::RANK_8);
        assert_eq!(Bitboard::A1_H8_DIAG.flipped(), Bitboard::H1_A8_DIAG);
    }

    #[test]
    fn test_iter_matches_population() {
        let board = Bitboard::new(0x00F0_0000_1234_0081);
        assert_eq!(board.iter().len(), board.population() as usize);
        assert!(board.iter().all(|sq| board.get(sq)));
    }
}
