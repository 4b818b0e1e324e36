use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
    str::FromStr,
};

use anyhow::{anyhow, bail, Context, Result};
use log::warn;

use super::{Bitboard, Color, Move, Piece, PieceKind, Square, NO_EN_PASSANT};

/// Castling rights of both players, stored relative to the side to move.
///
/// The low nibble holds the mover's rights and the high nibble holds the opponent's,
/// so swapping the nibbles swaps perspective:
///
/// ```text
///     00 00 00 00
///      |  |  |  |
///      |  |  |  +- Mover may castle long (bit 0) and short (bit 1).
///      |  |  +- Unused.
///      |  +- Opponent may castle long (bit 4) and short (bit 5).
///      +- Unused.
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: Self = Self(0x00);
    pub const MOVER_LONG: Self = Self(0x01);
    pub const MOVER_SHORT: Self = Self(0x02);
    pub const OPPONENT_LONG: Self = Self(0x10);
    pub const OPPONENT_SHORT: Self = Self(0x20);
    pub const MOVER: Self = Self(0x03);
    pub const OPPONENT: Self = Self(0x30);
    pub const ALL: Self = Self(0x33);

    /// Fetches the raw flag byte.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns `true` if every right in `rights` is present in `self`.
    pub const fn has(&self, rights: Self) -> bool {
        self.0 & rights.0 == rights.0
    }

    /// Returns a copy of `self` with every right in `rights` removed.
    pub const fn without(self, rights: Self) -> Self {
        Self(self.0 & !rights.0)
    }

    /// Swaps the mover's and the opponent's rights.
    ///
    /// # Example
    /// ```
    /// # use quadboard::CastlingRights;
    /// let rights = CastlingRights::MOVER_SHORT;
    /// assert_eq!(rights.flipped(), CastlingRights::OPPONENT_SHORT);
    /// assert_eq!(rights.flipped().flipped(), rights);
    /// ```
    pub const fn flipped(self) -> Self {
        Self(self.0.rotate_left(4))
    }

    /// Parses the castling field of a FEN string, as seen by White.
    ///
    /// Chess960 (Shredder-FEN) file letters are not supported and are skipped with a warning.
    pub fn from_uci(castling: &str) -> Result<Self> {
        let mut rights = Self::NONE;
        if castling == "-" {
            return Ok(rights);
        }

        for c in castling.chars() {
            match c {
                'K' => rights |= Self::MOVER_SHORT,
                'Q' => rights |= Self::MOVER_LONG,
                'k' => rights |= Self::OPPONENT_SHORT,
                'q' => rights |= Self::OPPONENT_LONG,
                'A'..='H' | 'a'..='h' => {
                    warn!("Ignoring Chess960 castling right {c:?} in {castling:?}: Chess960 is not supported")
                }
                _ => bail!("Invalid castling rights {castling:?}: Unknown char {c:?}"),
            }
        }

        Ok(rights)
    }

    /// Writes these rights as the castling field of a FEN string, as seen by White.
    pub fn to_uci(&self) -> String {
        let mut castling = String::with_capacity(4);

        if self.has(Self::MOVER_SHORT) {
            castling.push('K');
        }
        if self.has(Self::MOVER_LONG) {
            castling.push('Q');
        }
        if self.has(Self::OPPONENT_SHORT) {
            castling.push('k');
        }
        if self.has(Self::OPPONENT_LONG) {
            castling.push('q');
        }

        if castling.is_empty() {
            String::from("-")
        } else {
            castling
        }
    }
}

impl BitOr for CastlingRights {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CastlingRights {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// A chess position in quad-bitboard form, always seen from the side to move.
///
/// Four [`Bitboard`]s hold the whole board:
///  * `mover` marks every square occupied by the side to move.
///  * `p0`, `p1` and `p2` are the three bit planes of each square's [`PieceKind`] code,
///    with a code of `0` meaning the square is empty.
///
/// The board is stored as if the side to move were White. The mover's back rank is rank 1
/// and its pawns advance towards higher square indices. Whenever the turn passes, the whole
/// position is [flipped](Position::flip) so that this stays true.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    mover: Bitboard,
    p0: Bitboard,
    p1: Bitboard,
    p2: Bitboard,
    castling: CastlingRights,
    ep_file: u8,
    side_to_move: Color,
}

impl Position {
    /// An empty board with White to move and no rights.
    ///
    /// Not a reachable chess position: there are no kings.
    pub const fn empty() -> Self {
        Self {
            mover: Bitboard::EMPTY_BOARD,
            p0: Bitboard::EMPTY_BOARD,
            p1: Bitboard::EMPTY_BOARD,
            p2: Bitboard::EMPTY_BOARD,
            castling: CastlingRights::NONE,
            ep_file: NO_EN_PASSANT,
            side_to_move: Color::White,
        }
    }

    /// Creates a new [`Position`] from the provided FEN string.
    ///
    /// The half-move and full-move counters are optional and are not kept.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let position = Position::from_fen(FEN_STARTPOS).unwrap();
    /// assert_eq!(position.occupied().population(), 32);
    /// assert_eq!(position.side_to_move(), Color::White);
    ///
    /// assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.split_whitespace();

        let placements = split.next().ok_or(anyhow!(
            "Invalid FEN string: FEN string must have piece placements."
        ))?;
        let mut pos = Self::from_placements(placements)
            .with_context(|| format!("Invalid FEN string {fen:?}"))?;

        let active_color = split.next().unwrap_or("w");
        let side_to_move = Color::from_str(active_color)?;

        let castling = split.next().unwrap_or("-");
        pos.castling = CastlingRights::from_uci(castling)?;
        pos.check_castling_homes()
            .with_context(|| format!("Invalid castling rights in FEN string {fen:?}"))?;

        let en_passant_target = split.next().unwrap_or("-");
        if en_passant_target != "-" {
            let target = Square::from_uci(en_passant_target)
                .with_context(|| format!("Invalid en passant target in FEN string {fen:?}"))?;
            pos.check_en_passant_target(target, side_to_move)
                .with_context(|| format!("Invalid en passant target in FEN string {fen:?}"))?;
            pos.ep_file = target.file();
        }

        // Everything so far was read as White. Turn the board around if Black is to move.
        if side_to_move.is_black() {
            pos.flip();
        }

        Ok(pos)
    }

    /// Parses the piece placement field of a FEN string into a White-to-move [`Position`].
    fn from_placements(placements: &str) -> Result<Self> {
        let mut pos = Self::empty();

        if placements.matches('/').count() != 7 {
            bail!("Missing placements for all 8 ranks.");
        }

        // Need to reverse this so that White pieces are at the "bottom" of the board
        for (rank, row) in placements.split('/').rev().enumerate() {
            let mut file = 0;
            let rank = rank as u8;

            for piece_char in row.chars() {
                if let Some(empty) = piece_char.to_digit(10) {
                    file += empty as u8;
                    if file > 8 {
                        bail!("Rank {} has more than 8 files: {row:?}", rank + 1);
                    }
                    continue;
                }

                let piece = Piece::from_uci(piece_char).with_context(|| {
                    format!("Found non-piece, non-numeric char {piece_char:?} in rank {}", rank + 1)
                })?;

                if file > 7 {
                    bail!("Rank {} has more than 8 files: {row:?}", rank + 1);
                }

                pos.place(piece, Square::new(file, rank));
                file += 1;
            }

            if file != 8 {
                bail!("Rank {} must describe exactly 8 files. Got {file}: {row:?}", rank + 1);
            }
        }

        let white_kings = (pos.kings() & pos.mover).population();
        let black_kings = (pos.kings() & pos.opponents()).population();
        if white_kings != 1 || black_kings != 1 {
            bail!("Each side must have exactly one king. White has {white_kings}, Black has {black_kings}.");
        }

        Ok(pos)
    }

    /// Every castling right needs its king and rook on their starting squares.
    ///
    /// `self` must still be seen by White.
    fn check_castling_homes(&self) -> Result<()> {
        let homes = [
            (CastlingRights::MOVER_SHORT, Color::White, Square::E1, Square::H1),
            (CastlingRights::MOVER_LONG, Color::White, Square::E1, Square::A1),
            (CastlingRights::OPPONENT_SHORT, Color::Black, Square::E8, Square::H8),
            (CastlingRights::OPPONENT_LONG, Color::Black, Square::E8, Square::A8),
        ];

        for (right, color, king, rook) in homes {
            if !self.castling.has(right) {
                continue;
            }

            let king_home = self.piece_at(king) == Some(Piece::new(color, PieceKind::King));
            let rook_home = self.piece_at(rook) == Some(Piece::new(color, PieceKind::Rook));
            if !king_home || !rook_home {
                bail!(
                    "{} cannot castle with the rook on {rook}: needs a king on {king} and a rook on {rook}",
                    color.name()
                );
            }
        }

        Ok(())
    }

    /// The target must be the empty square a pawn of the opponent just skipped over.
    ///
    /// `self` must still be seen by White.
    fn check_en_passant_target(&self, target: Square, side_to_move: Color) -> Result<()> {
        let (target_rank, pawn_rank) = match side_to_move {
            Color::White => (5, 4),
            Color::Black => (2, 3),
        };

        if target.rank() != target_rank {
            bail!(
                "{target} is not on rank {} with {} to move",
                target_rank + 1,
                side_to_move.name()
            );
        }
        if self.piece_at(target).is_some() {
            bail!("{target} is occupied");
        }

        let pawn_square = Square::new(target.file(), pawn_rank);
        let pawn = Piece::new(side_to_move.opponent(), PieceKind::Pawn);
        if self.piece_at(pawn_square) != Some(pawn) {
            bail!("No {} pawn on {pawn_square} behind {target}", side_to_move.opponent().name());
        }

        Ok(())
    }

    /// Places `piece` on `square`, treating White as the side to move.
    fn place(&mut self, piece: Piece, square: Square) {
        let bits = piece.kind().bits();
        if bits & 0b001 != 0 {
            self.p0.set(square);
        }
        if bits & 0b010 != 0 {
            self.p1.set(square);
        }
        if bits & 0b100 != 0 {
            self.p2.set(square);
        }
        if piece.color().is_white() {
            self.mover.set(square);
        }
    }

    /// Generates a FEN string from this [`Position`].
    ///
    /// The half-move and full-move counters are not tracked and are always written as `0 1`.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 0 1";
    /// assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
    /// ```
    pub fn to_fen(&self) -> String {
        let mut placements = String::with_capacity(72);

        for rank in (0..8).rev() {
            let mut empty = 0;

            for file in 0..8 {
                if let Some(piece) = self.piece_at(Square::new(file, rank)) {
                    if empty != 0 {
                        placements += &empty.to_string();
                        empty = 0;
                    }
                    placements.push(piece.to_uci());
                } else {
                    empty += 1;
                }
            }

            if empty != 0 {
                placements += &empty.to_string();
            }
            if rank != 0 {
                placements.push('/');
            }
        }

        let active_color = self.side_to_move.to_uci();
        let castling = self.absolute_castling().to_uci();
        let en_passant_target = self
            .ep_square()
            .map(|square| square.to_uci())
            .unwrap_or(String::from("-"));

        format!("{placements} {active_color} {castling} {en_passant_target} 0 1")
    }

    /// Castling rights as White sees them.
    fn absolute_castling(&self) -> CastlingRights {
        match self.side_to_move {
            Color::White => self.castling,
            Color::Black => self.castling.flipped(),
        }
    }

    /// Turns the board around so that it is seen from the opponent's side.
    ///
    /// The opponent's pieces become the mover's, all four bitboards are mirrored rank-wise,
    /// the two halves of the castling rights swap and the side to move changes.
    /// The en passant file is unaffected. Flipping twice restores the original position.
    pub fn flip(&mut self) {
        let occupied = self.occupied();
        self.mover = (self.mover ^ occupied).flipped();
        self.p0 = self.p0.flipped();
        self.p1 = self.p1.flipped();
        self.p2 = self.p2.flipped();
        self.castling = self.castling.flipped();
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Returns a copy of this [`Position`] seen from the opponent's side. See [`Position::flip`].
    pub fn flipped(mut self) -> Self {
        self.flip();
        self
    }

    /// Applies `mv` to this position in place, then flips the board to the opponent.
    ///
    /// `mv` must be a pseudo-legal move for this position that has passed [`Position::is_legal`].
    /// Nothing is validated here.
    pub fn make_move(&mut self, mv: Move) {
        let from = mv.from().bitboard();
        let to = mv.to().bitboard();
        let moved = from | to;

        if mv.is_capture() && !mv.is_en_passant() {
            self.clear(to);

            // Taking a rook on its home square takes its castling right with it
            if mv.to() == Square::H8 {
                self.castling = self.castling.without(CastlingRights::OPPONENT_SHORT);
            } else if mv.to() == Square::A8 {
                self.castling = self.castling.without(CastlingRights::OPPONENT_LONG);
            }
        }

        self.ep_file = NO_EN_PASSANT;
        self.mover ^= moved;

        match mv.piece() {
            PieceKind::Pawn => {
                if mv.is_en_passant() {
                    self.p0 ^= moved;
                    self.p0 ^= to >> 8;
                } else if let Some(promotion) = mv.promotion() {
                    self.p0 ^= from;
                    self.set_planes(to, promotion);
                } else {
                    self.p0 ^= moved;

                    if mv.is_double_push() {
                        let neighbours =
                            ((to << 1) & Bitboard::NOT_FILE_A) | ((to >> 1) & Bitboard::NOT_FILE_H);
                        if (neighbours & self.pawns() & self.opponents()).is_nonempty() {
                            self.ep_file = mv.to().file();
                        }
                    }
                }
            }

            PieceKind::King => {
                self.p1 ^= moved;
                self.p2 ^= moved;
                self.castling = self.castling.without(CastlingRights::MOVER);

                if mv.is_castle() {
                    // h1 <-> f1 or a1 <-> d1
                    let rook = if mv.to() == Square::G1 {
                        Bitboard::new(0xA0)
                    } else {
                        Bitboard::new(0x09)
                    };
                    self.mover ^= rook;
                    self.p2 ^= rook;
                }
            }

            kind => {
                self.toggle_planes(moved, kind);

                if kind == PieceKind::Rook {
                    if mv.from() == Square::H1 {
                        self.castling = self.castling.without(CastlingRights::MOVER_SHORT);
                    } else if mv.from() == Square::A1 {
                        self.castling = self.castling.without(CastlingRights::MOVER_LONG);
                    }
                }
            }
        }

        self.flip();
    }

    /// Returns a copy of this [`Position`] after making `mv`. See [`Position::make_move`].
    pub fn with_move_made(mut self, mv: Move) -> Self {
        self.make_move(mv);
        self
    }

    /// Clears every square of `mask` on all three piece planes.
    fn clear(&mut self, mask: Bitboard) {
        let keep = !mask;
        self.p0 &= keep;
        self.p1 &= keep;
        self.p2 &= keep;
    }

    /// Sets the plane bits of `kind` on the squares of `mask`.
    fn set_planes(&mut self, mask: Bitboard, kind: PieceKind) {
        let bits = kind.bits();
        if bits & 0b001 != 0 {
            self.p0 |= mask;
        }
        if bits & 0b010 != 0 {
            self.p1 |= mask;
        }
        if bits & 0b100 != 0 {
            self.p2 |= mask;
        }
    }

    /// Toggles the plane bits of `kind` on the squares of `mask`.
    fn toggle_planes(&mut self, mask: Bitboard, kind: PieceKind) {
        let bits = kind.bits();
        if bits & 0b001 != 0 {
            self.p0 ^= mask;
        }
        if bits & 0b010 != 0 {
            self.p1 ^= mask;
        }
        if bits & 0b100 != 0 {
            self.p2 ^= mask;
        }
    }

    /// Squares occupied by the side to move.
    pub const fn mover(&self) -> Bitboard {
        self.mover
    }

    /// Squares occupied by the side not to move.
    pub const fn opponents(&self) -> Bitboard {
        self.mover.xor(self.occupied())
    }

    /// Squares occupied by any piece.
    pub const fn occupied(&self) -> Bitboard {
        self.p0.or(self.p1).or(self.p2)
    }

    /// The three piece-code planes, lowest bit first.
    pub const fn planes(&self) -> [Bitboard; 3] {
        [self.p0, self.p1, self.p2]
    }

    /// Pawns of both sides.
    pub const fn pawns(&self) -> Bitboard {
        self.p0.and(self.p1.not()).and(self.p2.not())
    }

    /// Knights of both sides.
    pub const fn knights(&self) -> Bitboard {
        self.p0.not().and(self.p1).and(self.p2.not())
    }

    /// Bishops of both sides.
    pub const fn bishops(&self) -> Bitboard {
        self.p0.and(self.p1)
    }

    /// Rooks of both sides.
    pub const fn rooks(&self) -> Bitboard {
        self.p0.not().and(self.p1.not()).and(self.p2)
    }

    /// Queens of both sides.
    pub const fn queens(&self) -> Bitboard {
        self.p0.and(self.p2)
    }

    /// Kings of both sides.
    pub const fn kings(&self) -> Bitboard {
        self.p1.and(self.p2)
    }

    /// Pieces of `kind`, of both sides.
    pub const fn pieces(&self, kind: PieceKind) -> Bitboard {
        match kind {
            PieceKind::Pawn => self.pawns(),
            PieceKind::Knight => self.knights(),
            PieceKind::Bishop => self.bishops(),
            PieceKind::Rook => self.rooks(),
            PieceKind::Queen => self.queens(),
            PieceKind::King => self.kings(),
        }
    }

    /// Fetches the [`PieceKind`] on a mover-relative `square`, if any.
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        let code = self.p0.get(square) as u8
            | (self.p1.get(square) as u8) << 1
            | (self.p2.get(square) as u8) << 2;

        PieceKind::from_bits(code).ok()
    }

    /// Fetches the colored [`Piece`] on an absolute (White's point of view) `square`, if any.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
    /// let position = Position::from_fen(fen).unwrap();
    /// assert_eq!(position.piece_at(Square::E4).unwrap().to_uci(), 'P');
    /// assert_eq!(position.piece_at(Square::D8).unwrap().to_uci(), 'q');
    /// assert!(position.piece_at(Square::E2).is_none());
    /// ```
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let square = square.relative_to(self.side_to_move);
        let kind = self.kind_at(square)?;
        let color = if self.mover.get(square) {
            self.side_to_move
        } else {
            self.side_to_move.opponent()
        };

        Some(Piece::new(color, kind))
    }

    /// The mover-relative [`Square`] of the mover's king.
    ///
    /// Every reachable position has one.
    pub const fn king_square(&self) -> Square {
        self.kings().and(self.mover).lsb_unchecked()
    }

    /// Castling rights, relative to the side to move.
    pub const fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// File of the pawn that may be captured en passant, or [`NO_EN_PASSANT`].
    pub const fn ep_file(&self) -> u8 {
        self.ep_file
    }

    /// The absolute en passant target square, if there is one.
    pub fn ep_square(&self) -> Option<Square> {
        (self.ep_file != NO_EN_PASSANT)
            .then(|| Square::new(self.ep_file, 5).relative_to(self.side_to_move))
    }

    /// The color whose turn it is.
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Checks the encoding invariants of this position.
    ///
    /// The mover's pieces must be a subset of the occupied squares, no square may hold the
    /// unused piece code `7`, and each side must have exactly one king.
    pub fn is_consistent(&self) -> bool {
        let unused_code = self.p0 & self.p1 & self.p2;

        (self.mover & !self.occupied()).is_empty()
            && unused_code.is_empty()
            && (self.kings() & self.mover).population() == 1
            && (self.kings() & self.opponents()).population() == 1
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Position {
    /// Display this position's FEN string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(400);

        for rank in (0..8).rev() {
            board_str += &format!("{}|", rank + 1);
            for file in 0..8 {
                let piece = self.piece_at(Square::new(file, rank));
                let piece_char = piece.map(|p| p.to_uci()).unwrap_or('.');
                board_str += &format!(" {piece_char}");
            }

            if rank == 6 {
                board_str += &format!("           FEN: {}", self.to_fen());
            } else if rank == 5 {
                board_str += &format!("          Side: {}", self.side_to_move.name());
            } else if rank == 4 {
                board_str += &format!("      Castling: {}", self.absolute_castling().to_uci());
            } else if rank == 3 {
                let ep = self
                    .ep_square()
                    .map(|t| t.to_uci())
                    .unwrap_or(String::from("-"));
                board_str += &format!("            EP: {ep}");
            }
            board_str += "\n";
        }
        board_str += " +----------------\n   a b c d e f g h";

        write!(f, "{board_str}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::FEN_STARTPOS;

    #[test]
    fn test_startpos_planes() {
        let pos = Position::from_fen(FEN_STARTPOS).unwrap();

        assert_eq!(pos.mover(), Bitboard::RANK_1 | Bitboard::RANK_2);
        assert_eq!(pos.opponents(), Bitboard::RANK_7 | Bitboard::RANK_8);
        assert_eq!(pos.pawns(), Bitboard::RANK_2 | Bitboard::RANK_7);
        assert_eq!(pos.kings(), Square::E1.bitboard() | Square::E8.bitboard());
        assert_eq!(pos.queens(), Square::D1.bitboard() | Square::D8.bitboard());
        assert_eq!(pos.rooks().population(), 4);
        assert_eq!(pos.bishops().population(), 4);
        assert_eq!(pos.knights().population(), 4);
        assert_eq!(pos.castling(), CastlingRights::ALL);
        assert_eq!(pos.ep_file(), NO_EN_PASSANT);
        assert_eq!(pos.king_square(), Square::E1);
        assert!(pos.is_consistent());
    }

    #[test]
    fn test_black_to_move_is_stored_from_blacks_side() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b Kq e3 0 1";
        let pos = Position::from_fen(fen).unwrap();

        // Black's pieces now sit on ranks 1 and 2
        assert_eq!(pos.mover(), Bitboard::RANK_1 | Bitboard::RANK_2);
        assert_eq!(pos.king_square(), Square::E1);
        assert_eq!(pos.kind_at(Square::E5), Some(PieceKind::Pawn));
        assert!(pos.opponents().get(Square::E5));

        // White's short right is now the opponent's, Black's long right is the mover's
        assert_eq!(pos.castling(), CastlingRights::OPPONENT_SHORT | CastlingRights::MOVER_LONG);
        assert_eq!(pos.ep_file(), 4);
        assert_eq!(pos.ep_square(), Some(Square::E3));
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn test_fen_round_trips() {
        let fens = [
            FEN_STARTPOS,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkb1r/pp1p1ppp/2p5/4P3/2B5/8/PPP1NnPP/RNBQK2R b KQkq - 0 1",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 1",
        ];

        for fen in fens {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.to_fen(), fen);
            assert!(pos.is_consistent(), "{fen}");
        }
    }

    #[test]
    fn test_fen_counters_are_optional() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w -").unwrap();
        assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn test_invalid_fens() {
        // Missing a rank
        assert!(Position::from_fen("4k3/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // Too many files
        assert!(Position::from_fen("4k4/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // Too few files
        assert!(Position::from_fen("4k2/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // Unknown piece
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4X3 w - - 0 1").is_err());
        // No white king
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/8 w - - 0 1").is_err());
        // Two black kings
        assert!(Position::from_fen("3kk3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // Bad side to move
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
        // Bad castling
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KX - 0 1").is_err());
        // Bad en passant square
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - j3 0 1").is_err());
        // Castling right without a rook on h1
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1").is_err());
        // Castling right with the king off e8
        assert!(Position::from_fen("r2k3r/8/8/8/8/8/8/4K3 w q - 0 1").is_err());
        // En passant target with no pawn behind it
        assert!(Position::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1").is_err());
        // En passant target on the wrong rank for the side to move
        assert!(Position::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e3 0 1").is_err());
        // En passant target occupied
        assert!(Position::from_fen("4k3/8/4n3/3Pp3/8/8/8/4K3 w - e6 0 1").is_err());
    }

    #[test]
    fn test_fen_rights_must_match_the_board() {
        let pos = Position::from_fen("r3k3/8/8/8/8/8/8/4K2R w Kq - 0 1").unwrap();
        assert_eq!(pos.castling(), CastlingRights::MOVER_SHORT | CastlingRights::OPPONENT_LONG);

        let castled = pos.with_move_made(pos.find_move("e1g1").unwrap());
        assert_eq!(castled.to_fen(), "r3k3/8/8/8/8/8/8/5RK1 b q - 0 1");

        // Black to move: the target sits on rank 3 with a white pawn in front of it
        let fen = "4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);

        let captured = pos.with_move_made(pos.find_move("d4e3").unwrap());
        assert_eq!(captured.to_fen(), "4k3/8/8/8/8/4p3/8/4K3 w - - 0 1");
        assert!(captured.is_consistent());
    }

    #[test]
    fn test_chess960_castling_is_ignored() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w HAha - 0 1").unwrap();
        assert_eq!(pos.castling(), CastlingRights::NONE);
    }

    #[test]
    fn test_flip_is_an_involution() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K1R1 w Qk - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        let flipped = pos.flipped();

        assert_ne!(flipped, pos);
        assert_eq!(flipped.side_to_move(), Color::Black);
        assert_eq!(flipped.castling(), CastlingRights::MOVER_SHORT | CastlingRights::OPPONENT_LONG);
        assert_eq!(flipped.flipped(), pos);

        // The absolute board does not change, only the perspective
        for square in Square::iter() {
            assert_eq!(flipped.piece_at(square), pos.piece_at(square));
        }
    }

    #[test]
    fn test_castling_rights_flip() {
        let rights = CastlingRights::MOVER_LONG | CastlingRights::OPPONENT_SHORT;
        assert_eq!(rights.flipped(), CastlingRights::MOVER_SHORT | CastlingRights::OPPONENT_LONG);
        assert_eq!(CastlingRights::ALL.flipped(), CastlingRights::ALL);
        assert_eq!(CastlingRights::from_uci("KQkq").unwrap(), CastlingRights::ALL);
        assert_eq!(CastlingRights::ALL.to_uci(), "KQkq");
        assert_eq!(CastlingRights::NONE.to_uci(), "-");
    }
}
