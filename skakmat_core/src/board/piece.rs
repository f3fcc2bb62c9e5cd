use std::{
    fmt::{Debug, Display, Write},
    num::NonZeroU8,
};

use num_derive::{FromPrimitive, ToPrimitive};
use paste::paste;

/// The kind of a piece, independent of its colour.
///
/// Assigned the integers 1-6 so that a kind fits in 3 bits with 0 left over,
/// which lets [`Piece`] sit in a [`NonZeroU8`] and `Option<Piece>` occupy a
/// single byte — the whole point of the flat 64-cell board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, FromPrimitive, ToPrimitive)]
pub enum PieceType {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    pub const fn with_color(self, color: Color) -> Piece {
        Piece::new(color, self)
    }

    /// The letter used for this kind in FEN and SAN (uppercase).
    pub const fn as_uppercase_char(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// The lowercase letter used for black pieces in FEN and for promotion
    /// targets in coordinate moves.
    pub const fn as_lowercase_char(self) -> char {
        (self.as_uppercase_char() as u8 + 32) as char
    }

    /// Bishops and knights, for the insufficient-material rule.
    pub const fn is_minor(self) -> bool {
        matches!(self, PieceType::Knight | PieceType::Bishop)
    }
}

/// One of the two players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    White = 0,
    Black = 1,
}

impl Color {
    pub const fn is_white(self) -> bool {
        matches!(self, Color::White)
    }

    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 0 for white, 1 for black; for indexing per-color tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The rank direction this color's pawns advance in.
    pub(crate) const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank this color's pawns start on.
    pub(crate) const fn pawn_start_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// The rank this color's pawns promote on.
    pub(crate) const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The rank this color's king and rooks start on.
    pub(crate) const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

/// A piece: a [`Color`] and a [`PieceType`] packed into four bits.
///
/// Bit 3 is the colour (0 white, 1 black), bits 0-2 are the kind. The kind is
/// never 0, so the niche lets `Option<Piece>` stay one byte.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece(NonZeroU8);

macro_rules! piece_consts {
    ($($upper:ident => $variant:ident),* $(,)?) => {
        impl Piece {
            paste! {
                $(
                    pub const [<WHITE_ $upper>]: Piece =
                        Piece::new(Color::White, PieceType::$variant);
                    pub const [<BLACK_ $upper>]: Piece =
                        Piece::new(Color::Black, PieceType::$variant);
                )*
            }
        }
    };
}

piece_consts! {
    PAWN => Pawn,
    KNIGHT => Knight,
    BISHOP => Bishop,
    ROOK => Rook,
    QUEEN => Queen,
    KING => King,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        // Safety: piece_type as u8 is 1-6, never 0
        unsafe { Self(NonZeroU8::new_unchecked(((color as u8) << 3) | piece_type as u8)) }
    }

    pub const fn color(self) -> Color {
        if self.0.get() & 0b1000 != 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    pub const fn piece_type(self) -> PieceType {
        match self.0.get() & 0b0111 {
            1 => PieceType::Pawn,
            2 => PieceType::Knight,
            3 => PieceType::Bishop,
            4 => PieceType::Rook,
            5 => PieceType::Queen,
            6 => PieceType::King,
            _ => unreachable!(),
        }
    }

    pub const fn is(self, color: Color, piece_type: PieceType) -> bool {
        self.0.get() == Piece::new(color, piece_type).0.get()
    }

    /// The 4-bit packed representation, used by [`Move`](super::Move) and the
    /// Zobrist tables.
    pub(crate) const fn code(self) -> u8 {
        self.0.get()
    }

    /// Reconstructs a piece from its 4-bit code; returns [`None`] for the
    /// codes that do not name a piece (kind bits 0 or 7). Accepts `0` so it
    /// can decode the `Option<Piece>` fields of a packed move.
    pub(crate) const fn from_code(code: u8) -> Option<Self> {
        let code = code & 0x0F;
        if code & 0b0111 == 0 || code & 0b0111 == 7 {
            None
        } else {
            // Safety: zero was rejected by the kind-bits check above
            unsafe { Some(Self(NonZeroU8::new_unchecked(code))) }
        }
    }

    pub const fn as_fen_char(self) -> char {
        match self.color() {
            Color::White => self.piece_type().as_uppercase_char(),
            Color::Black => self.piece_type().as_lowercase_char(),
        }
    }

    pub const fn try_from_fen_char(c: char) -> Option<Self> {
        let piece_type = match c.to_ascii_uppercase() {
            'P' => PieceType::Pawn,
            'N' => PieceType::Knight,
            'B' => PieceType::Bishop,
            'R' => PieceType::Rook,
            'Q' => PieceType::Queen,
            'K' => PieceType::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self::new(color, piece_type))
    }
}

impl Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Piece")
            .field("color", &self.color())
            .field("piece_type", &self.piece_type())
            .finish()
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char(self.as_fen_char())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const ALL_COLORS: [Color; 2] = [Color::White, Color::Black];

    #[test]
    fn pack_and_unpack() {
        for color in ALL_COLORS {
            for piece_type in PieceType::ALL {
                let piece = Piece::new(color, piece_type);
                assert_eq!(piece.color(), color);
                assert_eq!(piece.piece_type(), piece_type);
                assert!(piece.is(color, piece_type));
            }
        }
    }

    #[test]
    fn option_piece_is_one_byte() {
        assert_eq!(std::mem::size_of::<Option<Piece>>(), 1);
    }

    #[test]
    fn code_roundtrip() {
        for color in ALL_COLORS {
            for piece_type in PieceType::ALL {
                let piece = Piece::new(color, piece_type);
                assert_eq!(Piece::from_code(piece.code()), Some(piece));
            }
        }

        assert_eq!(Piece::from_code(0), None);
        assert_eq!(Piece::from_code(7), None);
        assert_eq!(Piece::from_code(8), None);
        assert_eq!(Piece::from_code(15), None);
    }

    #[test]
    fn fen_chars() {
        assert_eq!(Piece::WHITE_KNIGHT.as_fen_char(), 'N');
        assert_eq!(Piece::BLACK_QUEEN.as_fen_char(), 'q');
        assert_eq!(Piece::try_from_fen_char('k'), Some(Piece::BLACK_KING));
        assert_eq!(Piece::try_from_fen_char('P'), Some(Piece::WHITE_PAWN));
        assert_eq!(Piece::try_from_fen_char('x'), None);
    }

    #[test]
    fn opponent_flips() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
    }

    #[test]
    fn minor_pieces() {
        assert!(PieceType::Knight.is_minor());
        assert!(PieceType::Bishop.is_minor());
        assert!(!PieceType::Rook.is_minor());
        assert!(!PieceType::Queen.is_minor());
    }
}
