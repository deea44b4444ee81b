//! A minimax decision engine for chat-bot tic-tac-toe.
//!
//! The engine picks a move on behalf of a computer-controlled player. It explores every
//! reachable future board with a depth-aware minimax search, optionally pruned with
//! alpha-beta, and trades completeness for speed and unpredictability according to a
//! [`Difficulty`]. Boards are square, of any size from 2x2 up to [`board::MAX_BOARD_SIZE`],
//! with a configurable winning line length.
//!
//! # Example
//!
//! ```rust
//! use tictactoe_ai::{Board, DecisionEngine, Difficulty, Player};
//! use tictactoe_ai::random::LcgRandomGenerator;
//!
//! // X to move, X can complete the right-hand column
//! let board: Board = "XOX/OXO/...".parse().unwrap();
//!
//! let engine = DecisionEngine::builder()
//!     .with_difficulty(Difficulty::Unbeatable)
//!     .build()
//!     .unwrap();
//!
//! let mut random = LcgRandomGenerator::default();
//! let chosen = engine.decide(&board, Player::First, &mut random).unwrap();
//! assert_eq!(chosen.index(), 8);
//! ```

use serde::{Deserialize, Serialize};

/// Contains the `Board` snapshot and its query helpers.
pub mod board;
/// Contains the engine configuration and its TOML loader.
pub mod config;
/// The entry point of the library, containing `DecisionEngine` and its builder.
pub mod engine;
/// Contains the engine error type.
pub mod error;
/// Terminal scoring and the cutoff heuristic.
pub mod evaluator;
/// Contains traits and implementations for random number generation.
pub mod random;
/// The minimax searcher behind every difficulty tier.
pub mod search;
/// Difficulty levels and the search strategies they select.
pub mod strategy;
/// Records the explored game tree for inspection.
pub mod trace;

pub use board::Board;
pub use config::EngineConfig;
pub use engine::{DecisionEngine, DecisionEngineBuilder, decide};
pub use error::{EngineError, EngineErrorKind};
pub use strategy::{Difficulty, Strategy, TieBreak};
pub use trace::SearchTrace;

/// The state of one cell, or one of the two competing sides.
#[derive(
    Debug, Default, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize, strum::Display,
)]
pub enum Player {
    /// An empty cell.
    #[default]
    None,
    /// The side that moves first, shown as `X`.
    First,
    /// The side that moves second, shown as `O`.
    Second,
}

impl Player {
    /// Returns the other side. `None` has no opponent and maps to itself.
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
            Player::None => Player::None,
        }
    }

    /// The label shown on a cell owned by this player.
    pub fn symbol(self) -> char {
        match self {
            Player::None => ' ',
            Player::First => 'X',
            Player::Second => 'O',
        }
    }
}

/// The outcome of a board, derived on demand and never stored.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum GameResult {
    /// No line is complete and at least one cell is empty.
    InProgress,
    /// The given player owns a complete line.
    Win(Player),
    /// The board is full and nobody owns a complete line.
    Draw,
}

/// A cell index identifying where to place the next mark.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move(usize);

impl Move {
    /// Wraps a row-major cell index.
    pub const fn new(index: usize) -> Self {
        Move(index)
    }

    /// The row-major cell index.
    pub const fn index(self) -> usize {
        self.0
    }

    /// The `(row, col)` pair on a board with the given side length.
    pub const fn coordinates(self, size: usize) -> (usize, usize) {
        (self.0 / size, self.0 % size)
    }
}

impl From<Move> for usize {
    fn from(m: Move) -> Self {
        m.0
    }
}
