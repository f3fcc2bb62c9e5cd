//! Game records: move history, terminal-state classification, and export.
//!
//! A [`GameRecord`] owns the sequence of positions a game has passed
//! through. It is the only component that can rule on repetition draws, and
//! it is what a persistence collaborator reads to write a game file.

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::board::{
    Color, Grid, InvalidMoveError, Move, PieceType, Position, Square, ZobristKey,
    STARTING_POSITION_FEN,
};
use crate::move_gen::MoveVec;

/// Why a finished game is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

/// The status of a game. Anything but [`Ongoing`](GameState::Ongoing) is
/// terminal: the record refuses further moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        self != GameState::Ongoing
    }

    /// The PGN result token: `1-0`, `0-1`, `1/2-1/2`, or `*` while the game
    /// is in play.
    pub fn result_token(self) -> &'static str {
        match self {
            GameState::Ongoing => "*",
            GameState::Checkmate {
                winner: Color::White,
            } => "1-0",
            GameState::Checkmate {
                winner: Color::Black,
            } => "0-1",
            GameState::Stalemate | GameState::Draw(_) => "1/2-1/2",
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameState::Ongoing => write!(f, "ongoing"),
            GameState::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameState::Stalemate => write!(f, "stalemate"),
            GameState::Draw(DrawReason::FiftyMoveRule) => write!(f, "draw by fifty-move rule"),
            GameState::Draw(DrawReason::ThreefoldRepetition) => {
                write!(f, "draw by threefold repetition")
            }
            GameState::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "draw by insufficient material")
            }
        }
    }
}

/// Why the record rejected a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game is over: {0}")]
    Finished(GameState),
    #[error(transparent)]
    Illegal(#[from] InvalidMoveError),
    #[error("no move to undo")]
    NothingToUndo,
}

/// One accepted move: the position it was played in, the move itself, and
/// its notation (computed at move time, when the context existed).
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub position_before: Position,
    pub mv: Move,
    pub san: String,
}

/// A chess game: current position, append-only history, and metadata.
///
/// One record per game session; the rendering and AI collaborators funnel
/// every accepted move through [`make_move`](Self::make_move), so the
/// history can never diverge from the position.
#[derive(Debug, Clone)]
pub struct GameRecord {
    position: Position,
    history: Vec<MoveRecord>,
    /// Repetition keys of every position reached, the current one included.
    keys: Vec<ZobristKey>,
    state: GameState,
    starting_fen: String,

    pub white_player: String,
    pub black_player: String,
    pub date: NaiveDate,
}

impl GameRecord {
    /// Starts a game from the standard initial setup.
    pub fn new() -> Self {
        Self::from_position(Position::starting_position())
    }

    /// Starts a game from an arbitrary (validated) position.
    pub fn from_position(position: Position) -> Self {
        let starting_fen = position.fen();
        let mut record = Self {
            keys: vec![position.repetition_key()],
            position,
            history: Vec::new(),
            state: GameState::Ongoing,
            starting_fen,
            white_player: "Player".to_owned(),
            black_player: "Player".to_owned(),
            date: Utc::now().date_naive(),
        };
        record.state = record.classify();
        record
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn legal_moves(&self) -> MoveVec {
        self.position.legal_moves()
    }

    /// The FEN the game started from.
    pub fn starting_fen(&self) -> &str {
        &self.starting_fen
    }

    /// Plays a move, returning its SAN notation.
    ///
    /// Rejects everything once the game has reached a terminal state, and
    /// rejects moves outside the legal set; in both cases the record is
    /// unchanged.
    pub fn make_move(&mut self, mv: Move) -> Result<String, GameError> {
        if self.state.is_terminal() {
            return Err(GameError::Finished(self.state));
        }

        // `san` validates legality; its notation needs the pre-move context.
        let san = self.position.san(mv)?.to_string();

        self.history.push(MoveRecord {
            position_before: self.position.clone(),
            mv,
            san: san.clone(),
        });
        self.position = self.position.apply_unchecked(mv);
        self.keys.push(self.position.repetition_key());
        self.state = self.classify();

        Ok(san)
    }

    /// Takes back the last move, restoring the prior position exactly.
    pub fn undo_move(&mut self) -> Result<Move, GameError> {
        let record = self.history.pop().ok_or(GameError::NothingToUndo)?;
        self.keys.pop();
        self.position = record.position_before;
        self.state = self.classify();
        Ok(record.mv)
    }

    /// Classifies the current position, sharing the engine's legal-move and
    /// check queries.
    fn classify(&self) -> GameState {
        let no_moves = self.position.legal_moves().is_empty();

        if no_moves {
            return if self.position.is_in_check() {
                GameState::Checkmate {
                    winner: self.position.to_move().opponent(),
                }
            } else {
                GameState::Stalemate
            };
        }

        if self.position.halfmove_clock() >= 100 {
            return GameState::Draw(DrawReason::FiftyMoveRule);
        }

        if self.repetition_count() >= 3 {
            return GameState::Draw(DrawReason::ThreefoldRepetition);
        }

        if insufficient_material(self.position.grid()) {
            return GameState::Draw(DrawReason::InsufficientMaterial);
        }

        GameState::Ongoing
    }

    /// How many times the current position has occurred, counting by the
    /// repetition identity (placement, side to move, castling rights, en
    /// passant target).
    fn repetition_count(&self) -> usize {
        let current = self.position.repetition_key();
        self.keys.iter().filter(|&&key| key == current).count()
    }

    /// The numbered SAN move list, wrapped at 80 columns, without headers or
    /// the result token.
    pub fn movetext(&self) -> String {
        let mut text = String::new();
        let mut line_len = 0;

        let mut push_token = |text: &mut String, token: &str| {
            if line_len > 0 && line_len + 1 + token.len() > 80 {
                text.push('\n');
                line_len = 0;
            } else if line_len > 0 {
                text.push(' ');
                line_len += 1;
            }
            text.push_str(token);
            line_len += token.len();
        };

        for (i, record) in self.history.iter().enumerate() {
            let before = &record.position_before;
            let token = match before.to_move() {
                Color::White => format!("{}. {}", before.fullmove_number(), record.san),
                Color::Black if i == 0 => {
                    format!("{}... {}", before.fullmove_number(), record.san)
                }
                Color::Black => record.san.clone(),
            };
            push_token(&mut text, &token);
        }

        text
    }

    /// A minimal PGN rendering of the game: the players, date, and result
    /// headers, a FEN header when the game did not start from the standard
    /// setup, and the numbered move list — just enough to round-trip the
    /// game. The record does no file I/O; writing the string somewhere is
    /// the persistence collaborator's job.
    pub fn pgn(&self) -> String {
        let result = self.state.result_token();

        let mut pgn = String::with_capacity(512);
        pgn.push_str(&format!("[White \"{}\"]\n", self.white_player));
        pgn.push_str(&format!("[Black \"{}\"]\n", self.black_player));
        pgn.push_str(&format!("[Date \"{}\"]\n", self.date.format("%Y.%m.%d")));
        pgn.push_str(&format!("[Result \"{result}\"]\n"));

        if self.starting_fen != STARTING_POSITION_FEN {
            pgn.push_str("[SetUp \"1\"]\n");
            pgn.push_str(&format!("[FEN \"{}\"]\n", self.starting_fen));
        }

        pgn.push('\n');

        let movetext = self.movetext();
        if movetext.is_empty() {
            pgn.push_str(result);
        } else {
            pgn.push_str(&movetext);
            pgn.push(' ');
            pgn.push_str(result);
        }
        pgn.push('\n');

        pgn
    }
}

impl Default for GameRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether neither side retains mating material: bare kings, a lone minor
/// piece, or same-colored lone bishops.
fn insufficient_material(grid: &Grid) -> bool {
    let mut minor_counts = [0u32; 2];
    let mut bishop_squares: [Option<Square>; 2] = [None; 2];

    for (square, piece) in grid.pieces() {
        let kind = piece.piece_type();
        match kind {
            PieceType::King => (),
            PieceType::Pawn | PieceType::Rook | PieceType::Queen => return false,
            PieceType::Knight | PieceType::Bishop => {
                minor_counts[piece.color().index()] += 1;
                if kind == PieceType::Bishop {
                    bishop_squares[piece.color().index()] = Some(square);
                }
            }
        }
    }

    match (minor_counts[0], minor_counts[1]) {
        (0, 0) | (1, 0) | (0, 1) => true,
        (1, 1) => match (bishop_squares[0], bishop_squares[1]) {
            // Two lone bishops on same-colored squares can never meet.
            (Some(white), Some(black)) => {
                (white.rank() + white.file()) % 2 == (black.rank() + black.file()) % 2
            }
            _ => false,
        },
        _ => false,
    }
}
