//! Chess rules engine: board state, legal move generation, terminal-state
//! classification, and game notation.
//!
//! The engine is a pure, synchronous library. It owns the [`Position`] and
//! [`GameRecord`] types and everything needed to referee a game; rendering,
//! move-picking AIs, and persistence are collaborators that call in.
//!
//! A minimal game loop:
//!
//! ```
//! use skakmat_core::board::Square;
//! use skakmat_core::game::{GameRecord, GameState};
//!
//! let mut game = GameRecord::new();
//!
//! // The front end resolves a gesture to a legal move, then plays it.
//! let mv = game.position().find_move(Square::E2, Square::E4, None).unwrap();
//! let san = game.make_move(mv).unwrap();
//! assert_eq!(san, "e4");
//! assert_eq!(game.state(), GameState::Ongoing);
//! ```
//!
//! [`Position`]: board::Position
//! [`GameRecord`]: game::GameRecord

pub mod board;
pub mod game;
pub mod move_gen;
pub mod perft;

#[cfg(test)]
pub(crate) mod test_utils;
