use crate::board::{Board, DEFAULT_BOARD_SIZE};
use crate::error::EngineError;
use crate::strategy::Difficulty;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Node budget given to full searches on boards larger than the default when none
/// is configured.
pub const LARGE_BOARD_NODE_BUDGET: u64 = 100_000;

/// Immutable settings shared by every decision an engine makes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Side length of the board.
    pub size: usize,
    /// Marks in a row needed to win. `None` means the full side length.
    pub win_length: Option<usize>,
    /// Strength of play.
    pub difficulty: Difficulty,
    /// Prune branches that cannot change the result.
    pub alpha_beta_pruning: bool,
    /// Maximum nodes a full search may visit before settling for the best move
    /// of its last completed iteration. `None` searches 3x3 boards without limit and
    /// larger boards with [`LARGE_BOARD_NODE_BUDGET`].
    pub node_budget: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            win_length: None,
            difficulty: Difficulty::default(),
            alpha_beta_pruning: true,
            node_budget: None,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document such as
    ///
    /// ```toml
    /// size = 4
    /// win_length = 3
    /// difficulty = "medium"
    /// ```
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The effective win length.
    pub fn win_length(&self) -> usize {
        self.win_length.unwrap_or(self.size)
    }

    /// The budget full searches actually run under.
    pub fn effective_node_budget(&self) -> Option<u64> {
        self.node_budget
            .or((self.size > DEFAULT_BOARD_SIZE).then_some(LARGE_BOARD_NODE_BUDGET))
    }

    /// Checks that the dimensions describe a playable board and the budget is usable.
    pub fn validate(&self) -> Result<(), EngineError> {
        Board::new(self.size, self.win_length)?;
        if self.node_budget == Some(0) {
            return Err(EngineError::invalid_config("node budget must be positive"));
        }
        Ok(())
    }

    /// An empty board with these dimensions.
    pub fn empty_board(&self) -> Result<Board, EngineError> {
        Board::new(self.size, self.win_length)
    }

    /// True iff `board` has the dimensions this configuration plays on.
    pub fn matches(&self, board: &Board) -> bool {
        board.size() == self.size && board.win_length() == self.win_length()
    }
}
