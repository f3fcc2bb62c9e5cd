//! Full games driven through the public API, the way the rendering and AI
//! collaborators drive it: resolve a coordinate description against the
//! legal set, play the move, check the state after every move.

use skakmat_core::board::{CoordMove, Position, Square};
use skakmat_core::game::{DrawReason, GameRecord, GameState};

/// Plays a space-separated list of coordinate moves (`e2e4 e7e5 ...`),
/// panicking on anything the engine rejects.
fn play_all(record: &mut GameRecord, moves: &str) {
    for text in moves.split_whitespace() {
        let coord: CoordMove = text.parse().expect("well-formed coordinate move");
        let mv = record
            .position()
            .find_move(coord.from, coord.to, coord.promotion)
            .unwrap_or_else(|| panic!("{text} is not legal in {}", record.position().fen()));
        record.make_move(mv).expect("game still in progress");
    }
}

#[test]
fn scholars_mate_start_to_finish() {
    let mut record = GameRecord::new();
    record.black_player = "AI".to_owned();

    play_all(&mut record, "e2e4 e7e5 f1c4 b8c6 d1h5 g8f6 h5f7");

    assert_eq!(
        record.state(),
        GameState::Checkmate {
            winner: skakmat_core::board::Color::White
        }
    );
    assert_eq!(record.legal_moves().len(), 0);

    let pgn = record.pgn();
    assert!(pgn.contains("[Black \"AI\"]"));
    assert!(pgn.contains("1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0"));
}

#[test]
fn en_passant_window_closes_after_one_reply() {
    let mut record = GameRecord::new();
    play_all(&mut record, "e2e4 a7a6 e4e5 d7d5");

    // The double push just happened: the en passant capture is on offer.
    assert_eq!(record.position().en_passant(), Some(Square::D6));
    assert!(record
        .position()
        .find_move(Square::E5, Square::D6, None)
        .is_some());

    // One unrelated exchange later the offer is gone for good.
    play_all(&mut record, "a2a3 a6a5");
    assert_eq!(record.position().en_passant(), None);
    assert!(record
        .position()
        .find_move(Square::E5, Square::D6, None)
        .is_none());
}

#[test]
fn castling_round_trip() {
    let mut record = GameRecord::new();
    play_all(&mut record, "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6 e1g1");

    let position = record.position();
    assert_eq!(record.history().last().unwrap().san, "O-O");
    assert_eq!(
        position.piece_at(Square::G1).map(|p| p.piece_type()),
        Some(skakmat_core::board::PieceType::King)
    );
    assert_eq!(
        position.piece_at(Square::F1).map(|p| p.piece_type()),
        Some(skakmat_core::board::PieceType::Rook)
    );
    assert!(position.piece_at(Square::E1).is_none());
    assert!(position.piece_at(Square::H1).is_none());
}

#[test]
fn replaying_history_reproduces_every_position() {
    let mut record = GameRecord::new();
    play_all(&mut record, "d2d4 g8f6 c2c4 e7e6 b1c3 f8b4 e2e3 e8g8");

    // Rebuild the final position by reapplying the recorded moves to each
    // recorded predecessor; both paths must agree exactly.
    for entry in record.history() {
        let replayed = entry.position_before.apply_move(entry.mv).unwrap();
        let key_matches = replayed.repetition_key();
        let again = entry.position_before.apply_move(entry.mv).unwrap();
        assert_eq!(replayed, again);
        assert_eq!(key_matches, again.repetition_key());
    }

    let mut replay = record.history()[0].position_before.clone();
    for entry in record.history() {
        replay = replay.apply_move(entry.mv).unwrap();
    }
    assert_eq!(replay, *record.position());
}

#[test]
fn promotion_during_play() {
    let position =
        Position::try_parse_fen("4k3/8/8/8/8/8/p7/4K2R b K - 0 1").unwrap();
    let mut record = GameRecord::from_position(position);

    // The pawn must promote; a bare a2a1 resolves to nothing.
    let coord: CoordMove = "a2a1".parse().unwrap();
    assert!(record
        .position()
        .find_move(coord.from, coord.to, coord.promotion)
        .is_none());

    play_all(&mut record, "a2a1q");
    assert_eq!(record.history().last().unwrap().san, "a1=Q+");
    assert_eq!(record.state(), GameState::Ongoing);
}

#[test]
fn shuffling_kings_draws_by_repetition() {
    let position = Position::try_parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
    let mut record = GameRecord::from_position(position);

    play_all(&mut record, "e1d1 e8d8 d1e1 d8e8 e1d1 e8d8 d1e1 d8e8");
    assert_eq!(
        record.state(),
        GameState::Draw(DrawReason::ThreefoldRepetition)
    );

    // Terminal means terminal: nothing further is accepted.
    let mv = record.position().find_move(Square::E1, Square::D1, None);
    assert!(mv.is_none() || record.make_move(mv.unwrap()).is_err());
}
