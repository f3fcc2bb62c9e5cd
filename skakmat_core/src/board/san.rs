use std::fmt::{Display, Write};

use super::{InvalidMoveError, Move, PieceType, Position, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disambiguator {
    File(u8),
    Rank(u8),
    Square(Square),
}

impl Display for Disambiguator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Disambiguator::File(file) => f.write_char((file + b'a') as char),
            Disambiguator::Rank(rank) => f.write_char((rank + b'1') as char),
            Disambiguator::Square(square) => write!(f, "{square}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SanDetail {
    Normal {
        piece_type: PieceType,
        disambiguator: Option<Disambiguator>,
        is_capture: bool,
        to: Square,
        promotion: Option<PieceType>,
    },
    CastleShort,
    CastleLong,
}

/// A move in standard algebraic notation, e.g. `Nf3`, `exd5`, `O-O-O`,
/// `e8=Q#`.
///
/// Built by [`Position::san`]; rendered through [`Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct San {
    detail: SanDetail,
    is_check: bool,
    is_checkmate: bool,
}

impl Display for San {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.detail {
            SanDetail::Normal {
                piece_type,
                disambiguator,
                is_capture,
                to,
                promotion,
            } => {
                if piece_type != PieceType::Pawn {
                    f.write_char(piece_type.as_uppercase_char())?;
                }
                if let Some(disambiguator) = disambiguator {
                    write!(f, "{disambiguator}")?;
                }
                if is_capture {
                    f.write_char('x')?;
                }
                write!(f, "{to}")?;
                if let Some(promotion) = promotion {
                    f.write_char('=')?;
                    f.write_char(promotion.as_uppercase_char())?;
                }
            }
            SanDetail::CastleShort => f.write_str("O-O")?,
            SanDetail::CastleLong => f.write_str("O-O-O")?,
        }

        if self.is_checkmate {
            f.write_char('#')?;
        } else if self.is_check {
            f.write_char('+')?;
        }

        Ok(())
    }
}

impl Position {
    /// The standard algebraic notation for `mv` in this position.
    ///
    /// Fails with [`InvalidMoveError`] unless `mv` is legal here — notation
    /// depends on the legal-move context (disambiguation, check suffixes),
    /// so a move from some other position has no meaningful rendering.
    pub fn san(&self, mv: Move) -> Result<San, InvalidMoveError> {
        let legal_moves = self.legal_moves();
        if !legal_moves.contains(&mv) {
            return Err(InvalidMoveError::new(mv));
        }

        let detail = if mv.is_castle() {
            if mv.to_square().file() == 2 {
                SanDetail::CastleLong
            } else {
                SanDetail::CastleShort
            }
        } else {
            let piece_type = mv.piece().piece_type();
            let disambiguator = if piece_type == PieceType::Pawn {
                // Pawn captures always name the departure file (`exd5`);
                // pawn pushes never need disambiguating.
                mv.is_capture()
                    .then(|| Disambiguator::File(mv.from_square().file()))
            } else {
                disambiguator(mv, &legal_moves)
            };

            SanDetail::Normal {
                piece_type,
                disambiguator,
                is_capture: mv.is_capture(),
                to: mv.to_square(),
                promotion: mv.promotion(),
            }
        };

        // Shared terminal queries decide the suffix: `#` when the reply
        // position has no legal moves and its king is attacked, `+` on a
        // plain check.
        let next = self.apply_unchecked(mv);
        let is_check = next.is_in_check();
        let is_checkmate = is_check && next.legal_moves().is_empty();

        Ok(San {
            detail,
            is_check,
            is_checkmate,
        })
    }
}

/// Finds the minimal from-square qualifier distinguishing `mv` from other
/// legal moves of the same piece kind to the same destination.
fn disambiguator(mv: Move, legal_moves: &[Move]) -> Option<Disambiguator> {
    let from = mv.from_square();

    let mut ambiguous = false;
    let mut file_unique = true;
    let mut rank_unique = true;

    for other in legal_moves {
        if other.piece() == mv.piece()
            && other.to_square() == mv.to_square()
            && other.from_square() != from
        {
            ambiguous = true;
            if other.from_square().file() == from.file() {
                file_unique = false;
            }
            if other.from_square().rank() == from.rank() {
                rank_unique = false;
            }
        }
    }

    if !ambiguous {
        None
    } else if file_unique {
        Some(Disambiguator::File(from.file()))
    } else if rank_unique {
        Some(Disambiguator::Rank(from.rank()))
    } else {
        Some(Disambiguator::Square(from))
    }
}
