use std::{
    fmt::{Display, Write},
    str::FromStr,
};

use thiserror::Error;

use super::{Move, PieceType, Square};

/// A move described by bare coordinates: from-square, to-square, and an
/// optional promotion kind, e.g. `e2e4`, `e1g1` (castling as a king move),
/// `e7e8q`.
///
/// This is the format collaborators speak — a front end translating a drag
/// gesture, or an AI replying with one entry from the legal-move list it was
/// shown. A `CoordMove` is only a description: resolve it against a position
/// with [`Position::find_move`](super::Position::find_move), which yields the
/// engine-built [`Move`] or nothing if no legal move matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Display for CoordMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            f.write_char(promotion.as_lowercase_char())?;
        }
        Ok(())
    }
}

/// A string that is not a valid coordinate move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCoordMoveError {
    #[error("expected 4 or 5 characters")]
    BadLength,
    #[error("invalid square `{0}`")]
    BadSquare(String),
    #[error("invalid promotion kind `{0}`")]
    BadPromotion(char),
}

impl FromStr for CoordMove {
    type Err = ParseCoordMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 4 && chars.len() != 5 {
            return Err(ParseCoordMoveError::BadLength);
        }

        let parse_square = |cs: &[char]| -> Result<Square, ParseCoordMoveError> {
            let text: String = cs.iter().collect();
            text.parse()
                .map_err(|_| ParseCoordMoveError::BadSquare(text))
        };

        let from = parse_square(&chars[0..2])?;
        let to = parse_square(&chars[2..4])?;

        let promotion = match chars.get(4) {
            Some(&c) => match c {
                'q' => Some(PieceType::Queen),
                'r' => Some(PieceType::Rook),
                'b' => Some(PieceType::Bishop),
                'n' => Some(PieceType::Knight),
                _ => return Err(ParseCoordMoveError::BadPromotion(c)),
            },
            None => None,
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl From<Move> for CoordMove {
    fn from(mv: Move) -> Self {
        Self {
            from: mv.from_square(),
            to: mv.to_square(),
            promotion: mv.promotion(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_plain_moves() {
        assert_eq!(
            "e2e4".parse(),
            Ok(CoordMove {
                from: Square::E2,
                to: Square::E4,
                promotion: None,
            })
        );
        assert_eq!(
            "b8c6".parse(),
            Ok(CoordMove {
                from: Square::B8,
                to: Square::C6,
                promotion: None,
            })
        );
    }

    #[test]
    fn parse_promotions() {
        for (text, kind) in [
            ("e7e8q", PieceType::Queen),
            ("e7e8r", PieceType::Rook),
            ("e7e8b", PieceType::Bishop),
            ("e7e8n", PieceType::Knight),
        ] {
            assert_eq!(
                text.parse(),
                Ok(CoordMove {
                    from: Square::E7,
                    to: Square::E8,
                    promotion: Some(kind),
                })
            );
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            CoordMove::from_str("e2"),
            Err(ParseCoordMoveError::BadLength)
        );
        assert_eq!(
            CoordMove::from_str("e2e4qq"),
            Err(ParseCoordMoveError::BadLength)
        );
        assert_eq!(
            CoordMove::from_str("i9e4"),
            Err(ParseCoordMoveError::BadSquare("i9".into()))
        );
        assert_eq!(
            CoordMove::from_str("e7e8x"),
            Err(ParseCoordMoveError::BadPromotion('x'))
        );
    }

    #[test]
    fn display_roundtrip() {
        for text in ["e2e4", "b8c6", "e7e8q", "e1g1"] {
            let coord: CoordMove = text.parse().unwrap();
            assert_eq!(coord.to_string(), text);
        }
    }

    #[test]
    fn resolves_against_the_legal_set() {
        let position = Position::starting_position();
        let coord: CoordMove = "g1f3".parse().unwrap();
        let mv = position
            .find_move(coord.from, coord.to, coord.promotion)
            .unwrap();
        assert_eq!(CoordMove::from(mv), coord);

        // Legal-shaped but not legal here.
        let coord: CoordMove = "e2e5".parse().unwrap();
        assert_eq!(position.find_move(coord.from, coord.to, coord.promotion), None);
    }
}
