use std::{fmt, ops::BitOr};

use super::{Color, PieceKind, Square};

/// What a [`Move`] does besides moving a piece from one square to another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NONE: Self = Self(0x00);
    /// An opponent's piece is removed.
    pub const CAPTURE: Self = Self(0x08);
    /// A pawn captures the pawn that just passed it with a double push.
    pub const EN_PASSANT: Self = Self(0x10);
    /// A pawn reaches the last rank and becomes another piece.
    pub const PROMOTION: Self = Self(0x20);
    /// The king castles, moving a rook with it.
    pub const CASTLE: Self = Self(0x40);

    /// Fetches the raw flag bits.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns `true` if every flag in `flags` is set in `self`.
    pub const fn contains(&self, flags: Self) -> bool {
        self.0 & flags.0 == flags.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for MoveFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Debug for MoveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::CAPTURE, "capture"),
            (Self::EN_PASSANT, "en passant"),
            (Self::PROMOTION, "promotion"),
            (Self::CASTLE, "castle"),
        ];

        let set = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>();

        if set.is_empty() {
            write!(f, "quiet")
        } else {
            write!(f, "{}", set.join(" | "))
        }
    }
}

/// Represents a move made on a chess board, seen from the side making it.
///
/// The squares of a [`Move`] are mover-relative, just like the [`Position`](crate::Position)
/// it was generated from: the mover's pawns always advance towards rank 8.
/// Use [`Move::to_uci`] with the side to move to get the absolute notation.
///
/// The piece and flags share a single byte:
/// ```text
///     0 0 0 0 0 000
///     | | | | |  |
///     | | | | |  +- PieceKind code of the moving piece.
///     | | | | +- Capture.
///     | | | +- En passant.
///     | | +- Promotion.
///     | +- Castle.
///     +- Unused.
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    kind: u8,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    const PIECE_MASK: u8 = 0b0000_0111;

    /// Creates a new [`Move`] of `piece` from `from` to `to`, that does not promote.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let e2e4 = Move::new(PieceKind::Pawn, MoveFlags::NONE, Square::E2, Square::E4);
    /// assert_eq!(e2e4.to_string(), "e2e4");
    /// assert!(e2e4.is_double_push());
    /// ```
    pub const fn new(piece: PieceKind, flags: MoveFlags, from: Square, to: Square) -> Self {
        Self {
            kind: piece.bits() | flags.bits(),
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a new pawn [`Move`] that promotes to `promotion`.
    ///
    /// Set `capture` if the pawn also takes a piece.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let b7c8n = Move::new_promotion(Square::B7, Square::C8, PieceKind::Knight, true);
    /// assert_eq!(b7c8n.to_string(), "b7c8n");
    /// assert!(b7c8n.is_capture());
    /// ```
    pub const fn new_promotion(from: Square, to: Square, promotion: PieceKind, capture: bool) -> Self {
        let flags = if capture {
            MoveFlags::PROMOTION.union(MoveFlags::CAPTURE)
        } else {
            MoveFlags::PROMOTION
        };

        Self {
            kind: PieceKind::Pawn.bits() | flags.bits(),
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// The kind of piece being moved. For a promotion this is always a pawn.
    pub const fn piece(&self) -> PieceKind {
        match self.kind & Self::PIECE_MASK {
            1 => PieceKind::Pawn,
            2 => PieceKind::Knight,
            3 => PieceKind::Bishop,
            4 => PieceKind::Rook,
            5 => PieceKind::Queen,
            _ => PieceKind::King,
        }
    }

    /// The [`MoveFlags`] of this move.
    pub const fn flags(&self) -> MoveFlags {
        MoveFlags(self.kind & !Self::PIECE_MASK)
    }

    /// Fetches the mover-relative source square.
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Fetches the mover-relative destination square.
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The piece a pawn becomes, if this is a promotion.
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    pub const fn is_capture(&self) -> bool {
        self.flags().contains(MoveFlags::CAPTURE)
    }

    pub const fn is_en_passant(&self) -> bool {
        self.flags().contains(MoveFlags::EN_PASSANT)
    }

    pub const fn is_promotion(&self) -> bool {
        self.flags().contains(MoveFlags::PROMOTION)
    }

    pub const fn is_castle(&self) -> bool {
        self.flags().contains(MoveFlags::CASTLE)
    }

    /// Returns `true` if this [`Move`] is a castle towards the h-file.
    pub const fn is_short_castle(&self) -> bool {
        self.is_castle() && self.to.inner() == Square::G1.inner()
    }

    /// Returns `true` if this [`Move`] is a castle towards the a-file.
    pub const fn is_long_castle(&self) -> bool {
        self.is_castle() && self.to.inner() == Square::C1.inner()
    }

    /// Returns `true` if this [`Move`] is a pawn advancing two squares.
    pub const fn is_double_push(&self) -> bool {
        matches!(self.piece(), PieceKind::Pawn) && self.to.inner() == self.from.inner() + 16
    }

    /// Converts this [`Move`] to absolute [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation,
    /// given the color that made it.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// // Black's e7e5 is stored as e2e4 from Black's side of the board.
    /// let mv = Move::new(PieceKind::Pawn, MoveFlags::NONE, Square::E2, Square::E4);
    /// assert_eq!(mv.to_uci(Color::White), "e2e4");
    /// assert_eq!(mv.to_uci(Color::Black), "e7e5");
    /// ```
    pub fn to_uci(&self, side_to_move: Color) -> String {
        let from = self.from.relative_to(side_to_move);
        let to = self.to.relative_to(side_to_move);

        if let Some(promotion) = self.promotion {
            format!("{from}{to}{promotion}")
        } else {
            format!("{from}{to}")
        }
    }
}

impl fmt::Display for Move {
    /// A [`Move`] is displayed in its mover-relative UCI format.
    ///
    /// See [`Move::to_uci`] for absolute notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci(Color::White))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {:?})", self, self.piece().name(), self.flags())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_moves() -> [Move; 6] {
        let (from, to) = (Square::E2, Square::E4);
        [
            Move::new(PieceKind::Knight, MoveFlags::NONE, from, to),
            Move::new(PieceKind::Rook, MoveFlags::CAPTURE, from, to),
            Move::new(PieceKind::Pawn, MoveFlags::CAPTURE | MoveFlags::EN_PASSANT, from, to),
            Move::new(PieceKind::King, MoveFlags::CASTLE, Square::E1, Square::G1),
            Move::new_promotion(Square::E7, Square::E8, PieceKind::Queen, false),
            Move::new_promotion(Square::E7, Square::D8, PieceKind::Rook, true),
        ]
    }

    #[test]
    fn test_move_is_capture() {
        let flags = sample_moves().map(|mv| mv.is_capture());
        assert_eq!(flags, [false, true, true, false, false, true]);
    }

    #[test]
    fn test_move_is_en_passant() {
        let flags = sample_moves().map(|mv| mv.is_en_passant());
        assert_eq!(flags, [false, false, true, false, false, false]);
    }

    #[test]
    fn test_move_is_promotion() {
        let flags = sample_moves().map(|mv| mv.is_promotion());
        assert_eq!(flags, [false, false, false, false, true, true]);
    }

    #[test]
    fn test_move_is_castle() {
        let flags = sample_moves().map(|mv| mv.is_castle());
        assert_eq!(flags, [false, false, false, true, false, false]);

        let long = Move::new(PieceKind::King, MoveFlags::CASTLE, Square::E1, Square::C1);
        assert!(long.is_long_castle());
        assert!(!long.is_short_castle());
        assert!(sample_moves()[3].is_short_castle());
    }

    #[test]
    fn test_move_piece_survives_flags() {
        let pieces = sample_moves().map(|mv| mv.piece());
        assert_eq!(
            pieces,
            [
                PieceKind::Knight,
                PieceKind::Rook,
                PieceKind::Pawn,
                PieceKind::King,
                PieceKind::Pawn,
                PieceKind::Pawn
            ]
        );
    }

    #[test]
    fn test_move_to_uci_is_absolute() {
        let promo = Move::new_promotion(Square::B7, Square::A8, PieceKind::Knight, true);
        assert_eq!(promo.to_uci(Color::White), "b7a8n");
        assert_eq!(promo.to_uci(Color::Black), "b2a1n");

        let castle = Move::new(PieceKind::King, MoveFlags::CASTLE, Square::E1, Square::C1);
        assert_eq!(castle.to_uci(Color::Black), "e8c8");
    }
}
