use bitflags::bitflags;

use super::{Color, Square};

bitflags! {
    /// The four independent castling rights.
    ///
    /// A right records only the history-based half of castling legality: it
    /// is set while the king and the relevant rook have never moved (and the
    /// rook's home square has never been captured on). Whether a castle is
    /// actually playable right now — empty in-between squares, king not in
    /// or through check — is the move generator's concern.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Castling: u8 {
        const WHITE_KINGSIDE  = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE  = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;

        const WHITE = Self::WHITE_KINGSIDE.bits() | Self::WHITE_QUEENSIDE.bits();
        const BLACK = Self::BLACK_KINGSIDE.bits() | Self::BLACK_QUEENSIDE.bits();
    }
}

impl Default for Castling {
    fn default() -> Self {
        Self::all()
    }
}

impl Castling {
    pub const fn kingside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    pub const fn queenside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    pub const fn both(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE,
            Color::Black => Self::BLACK,
        }
    }

    /// The rights permanently lost when a piece moves from, or a capture
    /// lands on, `square`. Covers the king and rook home squares; every other
    /// square maps to no rights.
    pub(crate) fn revoked_by(square: Square) -> Self {
        match square {
            Square::A1 => Self::WHITE_QUEENSIDE,
            Square::E1 => Self::WHITE,
            Square::H1 => Self::WHITE_KINGSIDE,
            Square::A8 => Self::BLACK_QUEENSIDE,
            Square::E8 => Self::BLACK,
            Square::H8 => Self::BLACK_KINGSIDE,
            _ => Self::empty(),
        }
    }

    /// The castling field of a FEN record: `KQkq` subset, or `-` when no
    /// rights remain.
    pub fn as_fen_str(self) -> String {
        if self.is_empty() {
            return "-".to_owned();
        }

        let mut result = String::with_capacity(4);
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.contains(flag) {
                result.push(c);
            }
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_all_rights() {
        assert_eq!(Castling::default(), Castling::all());
    }

    #[test]
    fn per_color_masks() {
        assert_eq!(
            Castling::kingside(Color::White) | Castling::queenside(Color::White),
            Castling::WHITE
        );
        assert_eq!(Castling::both(Color::Black), Castling::BLACK);
    }

    #[test]
    fn revocation_squares() {
        assert_eq!(Castling::revoked_by(Square::E1), Castling::WHITE);
        assert_eq!(Castling::revoked_by(Square::H1), Castling::WHITE_KINGSIDE);
        assert_eq!(Castling::revoked_by(Square::A8), Castling::BLACK_QUEENSIDE);
        assert_eq!(Castling::revoked_by(Square::E4), Castling::empty());
        assert_eq!(Castling::revoked_by(Square::B1), Castling::empty());
    }

    #[test]
    fn fen_field() {
        assert_eq!(Castling::all().as_fen_str(), "KQkq");
        assert_eq!(Castling::empty().as_fen_str(), "-");
        assert_eq!(
            (Castling::WHITE_KINGSIDE | Castling::BLACK_QUEENSIDE).as_fen_str(),
            "Kq"
        );
    }
}
