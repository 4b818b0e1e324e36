use anyhow::{bail, Result};

use super::{
    bishop_attacks, king_attacks, knight_attacks, queen_attacks, rook_attacks, Bitboard,
    CastlingRights, Move, MoveFlags, PieceKind, Position, Square, MAX_CAPTURES, MAX_NUM_MOVES,
    MAX_QUIETS, NO_EN_PASSANT,
};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_CAPTURES`] captures,
/// promotions and en passant moves.
pub type CaptureList = arrayvec::ArrayVec<Move, MAX_CAPTURES>;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_QUIETS`] quiet moves and
/// castles.
pub type QuietList = arrayvec::ArrayVec<Move, MAX_QUIETS>;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] legal moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// Piece kinds that move by their attack pattern, in generation order.
const PIECE_ORDER: [PieceKind; 5] = [
    PieceKind::King,
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Squares a pawn can capture en passant from, indexed by the file of the pawn that double-pushed.
const EN_PASSANT_CAPTURERS: [Bitboard; 8] = [
    Bitboard::new(0x0000000200000000),
    Bitboard::new(0x0000000500000000),
    Bitboard::new(0x0000000A00000000),
    Bitboard::new(0x0000001400000000),
    Bitboard::new(0x0000002800000000),
    Bitboard::new(0x0000005000000000),
    Bitboard::new(0x000000A000000000),
    Bitboard::new(0x0000004000000000),
];

/// Every rank but the last, where pawn pushes do not promote.
const NOT_RANK_8: Bitboard = Bitboard::RANK_8.not();

/// Computes the squares a `kind` on `square` attacks, given the board's `occupied` squares.
///
/// Pawns have no single-square pattern here; they are generated in bulk.
fn attacks_for(kind: PieceKind, square: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Knight => knight_attacks(square),
        PieceKind::Bishop => bishop_attacks(square, occupied),
        PieceKind::Rook => rook_attacks(square, occupied),
        PieceKind::Queen => queen_attacks(square, occupied),
        PieceKind::King => king_attacks(square),
        PieceKind::Pawn => Bitboard::EMPTY_BOARD,
    }
}

/// The lowest set bit of `bits`, as a [`Bitboard`].
#[inline(always)]
fn first(bits: u64) -> u64 {
    Bitboard::new(bits).isolate_lsb().inner()
}

impl Position {
    /// Generates every pseudo-legal move that does not capture or promote.
    ///
    /// Piece moves come first (king down to knight), then single and double pawn pushes,
    /// then long and short castling.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let position = Position::from_fen(FEN_STARTPOS).unwrap();
    /// assert_eq!(position.generate_quiets().len(), 20);
    /// ```
    pub fn generate_quiets(&self) -> QuietList {
        let mut quiets = QuietList::new();
        let occupied = self.occupied();
        let empty = !occupied;

        for kind in PIECE_ORDER {
            for from in self.pieces(kind) & self.mover() {
                for to in attacks_for(kind, from, occupied) & empty {
                    quiets.push(Move::new(kind, MoveFlags::NONE, from, to));
                }
            }
        }

        // Pushes onto the last rank are promotions, and are generated with the captures
        let pawns = self.pawns() & self.mover();
        let single_pushes = (pawns << 8) & empty & NOT_RANK_8;
        for to in single_pushes {
            let from = Square::from_bits_unchecked(to.inner() - 8);
            quiets.push(Move::new(PieceKind::Pawn, MoveFlags::NONE, from, to));
        }

        let double_pushes = (single_pushes << 8) & empty & Bitboard::RANK_4;
        for to in double_pushes {
            let from = Square::from_bits_unchecked(to.inner() - 16);
            quiets.push(Move::new(PieceKind::Pawn, MoveFlags::NONE, from, to));
        }

        if self.can_castle_long() {
            quiets.push(Move::new(
                PieceKind::King,
                MoveFlags::CASTLE,
                Square::E1,
                Square::C1,
            ));
        }

        if self.can_castle_short() {
            quiets.push(Move::new(
                PieceKind::King,
                MoveFlags::CASTLE,
                Square::E1,
                Square::G1,
            ));
        }

        quiets
    }

    /// Returns `true` if the mover holds the long castling right, b1 through d1 are empty,
    /// and none of c1, d1 or e1 is attacked.
    ///
    /// Each attack is found from the square's nearest blocker along every line through it,
    /// plus fixed masks for the leapers and pawns, rather than by moving the king.
    fn can_castle_long(&self) -> bool {
        let occupied = self.occupied().inner();
        if !self.castling().has(CastlingRights::MOVER_LONG) || occupied & 0x0E != 0 {
            return false;
        }

        // Nearest pieces up the e, d and c files, and right of the king along rank 1
        let orthogonal = first(0x1010101010101000 & occupied)
            | first(0x0808080808080800 & occupied)
            | first(0x0404040404040400 & occupied)
            | first(0x00000000000000E0 & occupied);

        // Nearest pieces up both diagonals from c1, d1 and e1
        let diagonal = first(0x0000000102040800 & occupied)
            | first(0x0000000001020400 & occupied)
            | first(0x0000000000010200 & occupied)
            | first(0x0000000080402000 & occupied)
            | first(0x0000008040201000 & occupied)
            | first(0x0000804020100800 & occupied);

        let attackers = (Bitboard::new(orthogonal) & (self.rooks() | self.queens()))
            | (Bitboard::new(diagonal) & (self.bishops() | self.queens()))
            | (Bitboard::new(0x00000000003E7700) & self.knights())
            | (Bitboard::new(0x0000000000003E00) & self.pawns())
            | (Bitboard::new(0x0000000000000600) & self.kings());

        (attackers & self.opponents()).is_empty()
    }

    /// Returns `true` if the mover holds the short castling right, f1 and g1 are empty,
    /// and none of e1, f1 or g1 is attacked.
    fn can_castle_short(&self) -> bool {
        let occupied = self.occupied().inner();
        if !self.castling().has(CastlingRights::MOVER_SHORT) || occupied & 0x60 != 0 {
            return false;
        }

        // Nearest pieces up the e, f and g files, and left of the king along rank 1 (a1 if none)
        let orthogonal = first(0x1010101010101000 & occupied)
            | first(0x2020202020202000 & occupied)
            | first(0x4040404040404000 & occupied)
            | Bitboard::new(0x000000000000000F & (occupied | 0x01))
                .msb_unchecked()
                .bitboard()
                .inner();

        // Nearest pieces up both diagonals from e1, f1 and g1. The g1 diagonal is only h2.
        let diagonal = first(0x0000000102040800 & occupied)
            | first(0x0000010204081000 & occupied)
            | first(0x0001020408102000 & occupied)
            | first(0x0000000080402000 & occupied)
            | first(0x0000000000804000 & occupied)
            | 0x0000000000008000;

        let attackers = (Bitboard::new(orthogonal) & (self.rooks() | self.queens()))
            | (Bitboard::new(diagonal) & (self.bishops() | self.queens()))
            | (Bitboard::new(0x0000000000F8DC00) & self.knights())
            | (Bitboard::new(0x000000000000F800) & self.pawns())
            | (Bitboard::new(0x0000000000004000) & self.kings());

        (attackers & self.opponents()).is_empty()
    }

    /// Generates every pseudo-legal capture, promotion and en passant capture.
    ///
    /// Piece captures come first (king down to knight), then pawn captures towards the h-file
    /// and towards the a-file, then promotions, then en passant.
    /// Every promotion is generated as a queen, rook, bishop and knight, in that order.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let position = Position::from_fen("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N w - - 0 1").unwrap();
    /// let captures = position.generate_captures();
    /// let promotions: Vec<_> = captures.iter().filter_map(|mv| mv.promotion()).collect();
    /// assert_eq!(&promotions[..4], &PieceKind::PROMOTIONS);
    /// ```
    pub fn generate_captures(&self) -> CaptureList {
        let mut captures = CaptureList::new();
        let occupied = self.occupied();
        let opponents = self.opponents();

        for kind in PIECE_ORDER {
            for from in self.pieces(kind) & self.mover() {
                for to in attacks_for(kind, from, occupied) & opponents {
                    captures.push(Move::new(kind, MoveFlags::CAPTURE, from, to));
                }
            }
        }

        let pawns = self.pawns() & self.mover();
        let takes_right = (pawns << 9) & Bitboard::NOT_FILE_A & opponents;
        let takes_left = (pawns << 7) & Bitboard::NOT_FILE_H & opponents;

        for to in takes_right & NOT_RANK_8 {
            let from = Square::from_bits_unchecked(to.inner() - 9);
            captures.push(Move::new(PieceKind::Pawn, MoveFlags::CAPTURE, from, to));
        }

        for to in takes_left & NOT_RANK_8 {
            let from = Square::from_bits_unchecked(to.inner() - 7);
            captures.push(Move::new(PieceKind::Pawn, MoveFlags::CAPTURE, from, to));
        }

        if (pawns & Bitboard::RANK_7).is_nonempty() {
            let mut promote = |from: u8, to: Square, capture: bool| {
                let from = Square::from_bits_unchecked(from);
                for promotion in PieceKind::PROMOTIONS {
                    captures.push(Move::new_promotion(from, to, promotion, capture));
                }
            };

            for to in takes_right & Bitboard::RANK_8 {
                promote(to.inner() - 9, to, true);
            }

            for to in takes_left & Bitboard::RANK_8 {
                promote(to.inner() - 7, to, true);
            }

            for to in (pawns << 8) & !occupied & Bitboard::RANK_8 {
                promote(to.inner() - 8, to, false);
            }
        }

        let ep_file = self.ep_file();
        if ep_file != NO_EN_PASSANT {
            let to = Square::new(ep_file, 5);
            for from in pawns & EN_PASSANT_CAPTURERS[ep_file as usize] {
                captures.push(Move::new(
                    PieceKind::Pawn,
                    MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                    from,
                    to,
                ));
            }
        }

        captures
    }

    /// Computes the opponent's pieces that would attack the mover's king after `mv`.
    ///
    /// The board after the move is worked out analytically: `mv` is never made.
    /// An empty result means `mv` does not leave the mover in check.
    pub fn attackers_after(&self, mv: Move) -> Bitboard {
        let from = mv.from().bitboard();
        let to = mv.to().bitboard();

        let mut occupied = (self.occupied() ^ from) | to;
        let mut opponents = self.opponents() & !to;

        if mv.is_en_passant() {
            let captured = to >> 8;
            occupied ^= captured;
            opponents ^= captured;
        }

        let king = if mv.piece() == PieceKind::King {
            mv.to()
        } else {
            self.king_square()
        };

        // Opponent pawns capture towards rank 1
        let king_bb = king.bitboard();
        let pawn_attacks =
            ((king_bb << 9) & Bitboard::NOT_FILE_A) | ((king_bb << 7) & Bitboard::NOT_FILE_H);

        let attackers = (knight_attacks(king) & self.knights())
            | (rook_attacks(king, occupied) & (self.rooks() | self.queens()))
            | (bishop_attacks(king, occupied) & (self.bishops() | self.queens()))
            | (pawn_attacks & self.pawns())
            | (king_attacks(king) & self.kings());

        attackers & opponents
    }

    /// Returns `true` if the pseudo-legal `mv` does not leave the mover's king attacked.
    pub fn is_legal(&self, mv: Move) -> bool {
        self.attackers_after(mv).is_empty()
    }

    /// Returns `true` if the mover's king is attacked in this position.
    pub fn is_in_check(&self) -> bool {
        let king = self.king_square();
        let null = Move::new(PieceKind::King, MoveFlags::NONE, king, king);
        !self.is_legal(null)
    }

    /// Generates every legal move, captures first.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let position = Position::from_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(position.legal_moves().len(), 48);
    /// ```
    pub fn legal_moves(&self) -> MoveList {
        let captures = self.generate_captures();
        let quiets = self.generate_quiets();

        captures
            .into_iter()
            .chain(quiets)
            .filter(|mv| self.is_legal(*mv))
            .collect()
    }

    /// Finds the legal move written as `uci` in absolute long algebraic notation.
    ///
    /// # Example
    /// ```
    /// # use quadboard::*;
    /// let position = Position::from_fen(FEN_STARTPOS).unwrap();
    /// let mv = position.find_move("g1f3").unwrap();
    /// assert_eq!(mv.piece(), PieceKind::Knight);
    ///
    /// assert!(position.find_move("e2e5").is_err());
    /// ```
    pub fn find_move(&self, uci: &str) -> Result<Move> {
        let side = self.side_to_move();
        let Some(mv) = self
            .legal_moves()
            .into_iter()
            .find(|mv| mv.to_uci(side) == uci)
        else {
            bail!("{uci:?} is not a legal move in position {self}");
        };

        Ok(mv)
    }
}
