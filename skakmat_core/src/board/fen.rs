use thiserror::Error;

use super::{Castling, Color, IllegalSetupError, Piece, Position, Square};

/// A string that is not a valid FEN record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 6 fields, found {0}")]
    WrongFieldCount(usize),
    #[error("invalid piece placement field `{0}`")]
    BadPlacement(String),
    #[error("invalid side-to-move field `{0}`")]
    BadSideToMove(String),
    #[error("invalid castling field `{0}`")]
    BadCastling(String),
    #[error("invalid en passant field `{0}`")]
    BadEnPassant(String),
    #[error("invalid clock field `{0}`")]
    BadClock(String),
    #[error(transparent)]
    IllegalSetup(#[from] IllegalSetupError),
}

pub(super) fn parse(fen: &str) -> Result<Position, FenError> {
    let fields: Vec<_> = fen.split_whitespace().collect();
    let &[placement, to_move, castling, en_passant, halfmove_clock, fullmoves] =
        fields.as_slice()
    else {
        return Err(FenError::WrongFieldCount(fields.len()));
    };

    let cells = parse_placement(placement)?;

    let to_move = match to_move {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::BadSideToMove(other.to_owned())),
    };

    let castling = parse_castling(castling)?;

    let en_passant = match en_passant {
        "-" => None,
        square => Some(
            square
                .parse::<Square>()
                .map_err(|_| FenError::BadEnPassant(square.to_owned()))?,
        ),
    };

    let halfmove_clock = halfmove_clock
        .parse()
        .map_err(|_| FenError::BadClock(halfmove_clock.to_owned()))?;
    let fullmoves = fullmoves
        .parse()
        .map_err(|_| FenError::BadClock(fullmoves.to_owned()))?;

    Ok(Position::new(
        cells,
        to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmoves,
    )?)
}

fn parse_placement(placement: &str) -> Result<[Option<Piece>; 64], FenError> {
    let bad = || FenError::BadPlacement(placement.to_owned());

    let ranks: Vec<_> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(bad());
    }

    let mut cells = [None; 64];
    for (i, rank_spec) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;

        for c in rank_spec.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
            } else {
                let piece = Piece::try_from_fen_char(c).ok_or_else(|| bad())?;
                if file >= 8 {
                    return Err(bad());
                }
                cells[Square::new_unchecked(rank, file).index()] = Some(piece);
                file += 1;
            }
        }

        // Each rank must account for exactly 8 files.
        if file != 8 {
            return Err(bad());
        }
    }

    Ok(cells)
}

fn parse_castling(field: &str) -> Result<Castling, FenError> {
    if field == "-" {
        return Ok(Castling::empty());
    }

    let mut flags = Castling::empty();
    for c in field.chars() {
        flags |= match c {
            'K' => Castling::WHITE_KINGSIDE,
            'Q' => Castling::WHITE_QUEENSIDE,
            'k' => Castling::BLACK_KINGSIDE,
            'q' => Castling::BLACK_QUEENSIDE,
            _ => return Err(FenError::BadCastling(field.to_owned())),
        };
    }
    Ok(flags)
}

pub(super) fn format(position: &Position) -> String {
    let mut result = String::with_capacity(90);

    for rank in (0..8).rev() {
        let mut empty_run = 0;
        for file in 0..8 {
            match position.piece_at(Square::new_unchecked(rank, file)) {
                None => empty_run += 1,
                Some(piece) => {
                    if empty_run > 0 {
                        result.push((empty_run + b'0') as char);
                        empty_run = 0;
                    }
                    result.push(piece.as_fen_char());
                }
            }
        }
        if empty_run > 0 {
            result.push((empty_run + b'0') as char);
        }
        if rank > 0 {
            result.push('/');
        }
    }

    result.push(' ');
    result.push(if position.to_move().is_white() { 'w' } else { 'b' });
    result.push(' ');
    result.push_str(&position.castling().as_fen_str());
    result.push(' ');
    match position.en_passant() {
        Some(square) => result.push_str(&square.to_string()),
        None => result.push('-'),
    }
    result.push(' ');
    result.push_str(&position.halfmove_clock().to_string());
    result.push(' ');
    result.push_str(&position.fullmove_number().to_string());

    result
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::STARTING_POSITION_FEN;
    use pretty_assertions::assert_eq;

    #[test]
    fn starting_position_roundtrip() {
        let position = Position::try_parse_fen(STARTING_POSITION_FEN).unwrap();
        assert_eq!(position.fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn arbitrary_position_roundtrip() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 99 120",
        ];

        for fen in fens {
            let position = Position::try_parse_fen(fen).unwrap();
            assert_eq!(position.fen(), fen);
        }
    }

    #[test]
    fn rejects_wrong_field_counts() {
        assert_eq!(
            Position::try_parse_fen("only three fields"),
            Err(FenError::WrongFieldCount(3))
        );
        assert_eq!(Position::try_parse_fen(""), Err(FenError::WrongFieldCount(0)));
    }

    #[test]
    fn rejects_bad_placement() {
        // Seven ranks.
        assert!(matches!(
            Position::try_parse_fen("8/8/8/8/8/8/4K2k w - - 0 1"),
            Err(FenError::BadPlacement(_))
        ));
        // Rank with nine files.
        assert!(matches!(
            Position::try_parse_fen("9/8/8/8/8/8/8/4K2k w - - 0 1"),
            Err(FenError::BadPlacement(_))
        ));
        // Unknown piece letter.
        assert!(matches!(
            Position::try_parse_fen("4x3/8/8/8/8/8/8/4K2k w - - 0 1"),
            Err(FenError::BadPlacement(_))
        ));
    }

    #[test]
    fn rejects_bad_fields() {
        assert_eq!(
            Position::try_parse_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(FenError::BadSideToMove("x".into()))
        );
        assert_eq!(
            Position::try_parse_fen("4k3/8/8/8/8/8/8/4K3 w KX - 0 1"),
            Err(FenError::BadCastling("KX".into()))
        );
        assert_eq!(
            Position::try_parse_fen("4k3/8/8/8/8/8/8/4K3 w - e9 0 1"),
            Err(FenError::BadEnPassant("e9".into()))
        );
        assert_eq!(
            Position::try_parse_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1"),
            Err(FenError::BadClock("x".into()))
        );
    }
}
