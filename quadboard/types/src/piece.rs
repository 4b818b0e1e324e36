use std::{fmt, ops::Not, str::FromStr};

use anyhow::{bail, Result};

/// Side to move, or the owner of a piece in FEN placement.
///
/// Positions store pieces as "mover" and "opponent", never by color. Color is only
/// needed to read and write absolute notation.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub const COUNT: usize = 2;

    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// The side that moves after this one.
    ///
    /// # Example
    /// ```
    /// # use types::Color;
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// assert_eq!(!Color::White, Color::Black);
    /// ```
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// `0` for White, `1` for Black.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Parses the active-color field of a FEN string.
    ///
    /// # Example
    /// ```
    /// # use types::Color;
    /// assert_eq!(Color::from_uci('b').unwrap(), Color::Black);
    /// assert!(Color::from_uci('-').is_err());
    /// ```
    pub fn from_uci(color: char) -> Result<Self> {
        match color.to_ascii_lowercase() {
            'w' => Ok(Self::White),
            'b' => Ok(Self::Black),
            _ => bail!("Expected 'w' or 'b' for the side to move, found {color:?}"),
        }
    }

    pub const fn to_uci(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        self.opponent()
    }
}

/// A piece without its owner.
///
/// Each discriminant is the 3-bit code a square holds across the three piece planes of a
/// position. Code `0` is an empty square and `7` is unused.
///
/// ```text
///     code | P2 P1 P0 | kind
///     -----+----------+-------
///       1  |  0  0  1 | pawn
///       2  |  0  1  0 | knight
///       3  |  0  1  1 | bishop
///       4  |  1  0  0 | rook
///       5  |  1  0  1 | queen
///       6  |  1  1  0 | king
/// ```
///
/// Diagonal sliders (bishop, queen) are exactly the codes with `P0 & (P1 ^ P2)` set, and
/// orthogonal sliders (rook, queen) are `P2 & !P1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    pub const COUNT: usize = 6;

    /// Promotion targets, in the order the generator emits them.
    pub const PROMOTIONS: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// Every kind, ordered by plane code.
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::Pawn,
            Self::Knight,
            Self::Bishop,
            Self::Rook,
            Self::Queen,
            Self::King,
        ]
    }

    /// Decodes a plane code.
    ///
    /// # Example
    /// ```
    /// # use types::PieceKind;
    /// assert_eq!(PieceKind::from_bits(4).unwrap(), PieceKind::Rook);
    /// assert!(PieceKind::from_bits(0).is_err());
    /// assert!(PieceKind::from_bits(7).is_err());
    /// ```
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            1..=6 => Ok(Self::all()[bits as usize - 1]),
            _ => bail!("Plane code {bits} does not name a piece"),
        }
    }

    /// The plane code, in `1..=6`.
    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Zero-based position in [`PieceKind::all`].
    pub const fn index(&self) -> usize {
        self.bits() as usize - 1
    }

    /// Reads a FEN piece letter of either case.
    ///
    /// # Example
    /// ```
    /// # use types::PieceKind;
    /// assert_eq!(PieceKind::from_uci('n').unwrap(), PieceKind::Knight);
    /// assert_eq!(PieceKind::from_uci('K').unwrap(), PieceKind::King);
    /// assert!(PieceKind::from_uci('x').is_err());
    /// ```
    pub fn from_uci(kind: char) -> Result<Self> {
        match Self::all()
            .into_iter()
            .find(|k| k.to_uci() == kind.to_ascii_lowercase())
        {
            Some(kind) => Ok(kind),
            None => bail!("{kind:?} is not a piece letter"),
        }
    }

    /// Lowercase letter, as used in promotion suffixes.
    pub const fn to_uci(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

/// A piece together with its owner: one letter of FEN placement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    pub const COUNT: usize = Color::COUNT * PieceKind::COUNT;

    /// # Example
    /// ```
    /// # use types::{Piece, Color, PieceKind};
    /// assert_eq!(Piece::new(Color::White, PieceKind::Knight).to_string(), "N");
    /// assert_eq!(Piece::new(Color::Black, PieceKind::Queen).to_string(), "q");
    /// ```
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    pub const fn color(&self) -> Color {
        self.color
    }

    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// White pieces first, each side ordered by plane code.
    pub const fn index(&self) -> usize {
        self.color.index() * PieceKind::COUNT + self.kind.index()
    }

    /// Reads a FEN piece letter: uppercase is White.
    ///
    /// # Example
    /// ```
    /// # use types::{Piece, Color, PieceKind};
    /// let piece = Piece::from_uci('r').unwrap();
    /// assert_eq!(piece.color(), Color::Black);
    /// assert_eq!(piece.kind(), PieceKind::Rook);
    /// ```
    pub fn from_uci(piece: char) -> Result<Self> {
        let kind = PieceKind::from_uci(piece)?;
        let color = if piece.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Self::new(color, kind))
    }

    pub const fn to_uci(&self) -> char {
        let c = self.kind.to_uci();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

/// Text conversions shared by the single-character types of this module.
macro_rules! impl_char_conversions {
    ($type:ty) => {
        impl FromStr for $type {
            type Err = anyhow::Error;
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_uci(c),
                    _ => bail!("Expected a single character for {}, found {s:?}", stringify!($type)),
                }
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_uci())
            }
        }

        impl fmt::Debug for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} ({})", self.to_uci(), self.index())
            }
        }
    };
}

impl_char_conversions!(Piece);
impl_char_conversions!(PieceKind);
impl_char_conversions!(Color);
