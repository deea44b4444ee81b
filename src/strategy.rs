use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How strong the computer player is.
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Often plays a random cell, otherwise looks one move ahead.
    Easy,
    /// Looks two plies ahead and guesses beyond that.
    Medium,
    /// Searches to the end of the game and varies between equally good moves.
    Hard,
    /// Searches to the end of the game and always answers the same way.
    #[default]
    Unbeatable,
}

impl Difficulty {
    /// The search strategy this level plays with.
    pub fn strategy(self) -> Strategy {
        match self {
            Difficulty::Easy => Strategy::Erratic {
                random_move_percent: 40,
                depth: 1,
            },
            Difficulty::Medium => Strategy::DepthLimited { depth: 2 },
            Difficulty::Hard => Strategy::FullSearch {
                tie_break: TieBreak::Random,
            },
            Difficulty::Unbeatable => Strategy::FullSearch {
                tie_break: TieBreak::HighestIndex,
            },
        }
    }
}

/// Rule for choosing among moves with the same best score.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum TieBreak {
    /// The tied move with the highest cell index.
    HighestIndex,
    /// A tied move drawn from the supplied random generator.
    Random,
}

/// A search policy. Each variant answers the same decision contract.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Strategy {
    /// Minimax to terminal boards.
    FullSearch {
        /// How equal-scoring moves are separated.
        tie_break: TieBreak,
    },
    /// Minimax cut off after `depth` plies, scoring cutoff boards heuristically.
    /// Ties are broken at random.
    DepthLimited {
        /// Plies searched before the heuristic takes over.
        depth: usize,
    },
    /// Plays a uniformly random legal move with the given odds, otherwise a
    /// depth-limited search.
    Erratic {
        /// Odds, out of 100, of ignoring the search entirely.
        random_move_percent: u8,
        /// Plies searched when not playing randomly.
        depth: usize,
    },
}

impl Strategy {
    /// The search horizon, or `None` for a search to the end of the game.
    pub fn depth_limit(self) -> Option<usize> {
        match self {
            Strategy::FullSearch { .. } => None,
            Strategy::DepthLimited { depth } | Strategy::Erratic { depth, .. } => Some(depth),
        }
    }

    /// The tie-break rule applied at the root.
    pub fn tie_break(self) -> TieBreak {
        match self {
            Strategy::FullSearch { tie_break } => tie_break,
            Strategy::DepthLimited { .. } | Strategy::Erratic { .. } => TieBreak::Random,
        }
    }
}

impl From<Difficulty> for Strategy {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.strategy()
    }
}
