use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::search::{RootOutcome, Searcher, iterative_deepening};
use crate::strategy::{Difficulty, Strategy};
use crate::trace::SearchTrace;
use crate::{Move, Player};
use tracing::{debug, instrument};

/// Chooses moves for a computer-controlled player.
///
/// The engine holds nothing but its configuration, so one instance can serve any number
/// of games at once; every call gets its own board snapshot and random generator.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: EngineConfig,
    strategy: Strategy,
}

/// A builder for creating instances of `DecisionEngine`.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngineBuilder {
    config: EngineConfig,
}

impl DecisionEngineBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Sets the side length of the boards the engine plays on.
    pub fn with_size(mut self, size: usize) -> Self {
        self.config.size = size;
        self
    }

    /// Sets how many marks in a row win.
    pub fn with_win_length(mut self, win_length: usize) -> Self {
        self.config.win_length = Some(win_length);
        self
    }

    /// Sets the strength of play.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.config.difficulty = difficulty;
        self
    }

    /// Enables or disables alpha-beta pruning.
    pub fn with_alpha_beta_pruning(mut self, use_abp: bool) -> Self {
        self.config.alpha_beta_pruning = use_abp;
        self
    }

    /// Caps the nodes a full search may visit.
    pub fn with_node_budget(mut self, node_budget: u64) -> Self {
        self.config.node_budget = Some(node_budget);
        self
    }

    /// Validates the configuration and builds the engine.
    pub fn build(self) -> Result<DecisionEngine, EngineError> {
        DecisionEngine::new(self.config)
    }
}

impl DecisionEngine {
    /// Returns a new builder for `DecisionEngine`.
    pub fn builder() -> DecisionEngineBuilder {
        DecisionEngineBuilder::new()
    }

    /// Creates an engine from a configuration, rejecting unusable dimensions.
    #[instrument]
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let strategy = config.difficulty.strategy();
        Ok(Self { config, strategy })
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The search strategy selected by the configured difficulty.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Chooses a move for `to_move` on `board`.
    ///
    /// Fails with `InvalidState` when the board does not match the configured
    /// dimensions, when the game is already decided or the board is full, or when
    /// `to_move` is [`Player::None`].
    #[instrument(skip(self, board, random), fields(board = %board, difficulty = %self.config.difficulty))]
    pub fn decide(
        &self,
        board: &Board,
        to_move: Player,
        random: &mut impl RandomGenerator,
    ) -> Result<Move, EngineError> {
        self.check_decidable(board, to_move)?;

        if let Strategy::Erratic {
            random_move_percent,
            ..
        } = self.strategy
        {
            if random.chance(random_move_percent) {
                let empty: Vec<usize> = board.empty_cells().collect();
                let index = random
                    .pick(&empty)
                    .copied()
                    .ok_or_else(|| EngineError::invalid_state("no empty cell to play"))?;
                debug!(cell = index, "playing a random move");
                return Ok(Move::new(index));
            }
        }

        let outcome = self.search(board, to_move)?;
        let chosen = outcome
            .choose(self.strategy.tie_break(), random)
            .ok_or_else(|| EngineError::invalid_state("search produced no move"))?;
        debug!(
            cell = chosen.index(),
            score = outcome.score,
            tied = outcome.candidates.len(),
            "move chosen"
        );
        Ok(chosen)
    }

    /// Records the explored game tree from `board` down to `max_depth` plies.
    ///
    /// The trace is independent of difficulty: it always backs up plain minimax scores
    /// without pruning, so every explored sibling carries its true value at that horizon.
    #[instrument(skip(self, board), fields(board = %board))]
    pub fn trace(
        &self,
        board: &Board,
        to_move: Player,
        max_depth: usize,
    ) -> Result<SearchTrace, EngineError> {
        self.check_decidable(board, to_move)?;
        Ok(SearchTrace::explore(board, to_move, max_depth))
    }

    fn search(&self, board: &Board, to_move: Player) -> Result<RootOutcome, EngineError> {
        let pruning = self.config.alpha_beta_pruning;
        let outcome = match (self.strategy.depth_limit(), self.config.effective_node_budget()) {
            (None, Some(budget)) => iterative_deepening(board, to_move, pruning, budget)?,
            (depth_limit, _) => Searcher::new(to_move, depth_limit, pruning).search_root(board)?,
        };
        Ok(outcome)
    }

    fn check_decidable(&self, board: &Board, to_move: Player) -> Result<(), EngineError> {
        if to_move == Player::None {
            return Err(EngineError::invalid_state("no player to move"));
        }
        if !self.config.matches(board) {
            return Err(EngineError::invalid_state(format!(
                "board is {}x{} with win length {}, engine plays {}x{} with win length {}",
                board.size(),
                board.size(),
                board.win_length(),
                self.config.size,
                self.config.size,
                self.config.win_length()
            )));
        }
        if board.is_full() {
            return Err(EngineError::invalid_state("board is full"));
        }
        if board.is_terminal() {
            return Err(EngineError::invalid_state(format!(
                "game is already won by {}",
                board.winner()
            )));
        }
        Ok(())
    }
}

/// One-shot decision with a fresh engine and the thread-local random generator.
pub fn decide(board: &Board, to_move: Player, config: EngineConfig) -> Result<Move, EngineError> {
    DecisionEngine::new(config)?.decide(board, to_move, &mut StandardRandomGenerator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineErrorKind;
    use crate::random::LcgRandomGenerator;

    fn engine(difficulty: Difficulty) -> DecisionEngine {
        DecisionEngine::builder()
            .with_difficulty(difficulty)
            .build()
            .unwrap()
    }

    #[test]
    fn takes_the_winning_cell() {
        // arrange
        let board = Board::from_cells(
            3,
            None,
            vec![
                Player::First,
                Player::Second,
                Player::First,
                Player::Second,
                Player::First,
                Player::Second,
                Player::None,
                Player::None,
                Player::None,
            ],
        )
        .unwrap();

        // act
        let chosen = engine(Difficulty::Unbeatable)
            .decide(&board, Player::First, &mut LcgRandomGenerator::default())
            .unwrap();

        // assert
        assert_eq!(chosen.index(), 8);
    }

    #[test]
    fn blocks_the_opponent() {
        // arrange: O to move, X threatens the main diagonal
        let board: Board = "X.O/.X./...".parse().unwrap();

        // act
        let chosen = engine(Difficulty::Unbeatable)
            .decide(&board, Player::Second, &mut LcgRandomGenerator::default())
            .unwrap();

        // assert
        assert_eq!(chosen.index(), 8);
    }

    #[test]
    fn medium_blocks_an_immediate_threat() {
        let board: Board = "X.O/.X./...".parse().unwrap();
        for seed in 0..20 {
            let chosen = engine(Difficulty::Medium)
                .decide(&board, Player::Second, &mut LcgRandomGenerator::new(seed))
                .unwrap();
            assert_eq!(chosen.index(), 8);
        }
    }

    #[test]
    fn easy_only_plays_empty_cells() {
        let board: Board = "XO./X.O/...".parse().unwrap();
        let mut random = LcgRandomGenerator::new(11);
        let easy = engine(Difficulty::Easy);
        for _ in 0..50 {
            let chosen = easy.decide(&board, Player::First, &mut random).unwrap();
            assert_eq!(board.cell_at(chosen.index()).unwrap(), Player::None);
        }
    }

    #[test]
    fn easy_mixes_random_moves_with_the_one_ply_search() {
        // arrange: X wins at 2, which a one-ply search always finds
        let board: Board = "XX./OO./...".parse().unwrap();
        let easy = engine(Difficulty::Easy);
        let mut random = LcgRandomGenerator::new(11);

        // act
        let chosen: Vec<usize> = (0..50)
            .map(|_| easy.decide(&board, Player::First, &mut random).unwrap().index())
            .collect();

        // assert
        assert!(chosen.contains(&2));
        assert!(chosen.iter().any(|&cell| cell != 2));
    }

    #[test]
    fn erratic_without_random_moves_matches_the_one_ply_search() {
        let never_random = DecisionEngine {
            config: EngineConfig::default(),
            strategy: Strategy::Erratic {
                random_move_percent: 0,
                depth: 1,
            },
        };
        let mut random = LcgRandomGenerator::new(5);
        for (notation, to_move) in [
            ("XX./OO./...", Player::First),
            ("X.O/.X./...", Player::Second),
            ("X../.../...", Player::Second),
            (".../.../...", Player::First),
        ] {
            let board: Board = notation.parse().unwrap();
            let searched = Searcher::new(to_move, Some(1), true)
                .search_root(&board)
                .unwrap();
            for _ in 0..10 {
                let chosen = never_random.decide(&board, to_move, &mut random).unwrap();
                assert!(searched.candidates.contains(&chosen), "{}", notation);
            }
        }
    }

    #[test]
    fn full_board_is_invalid_state() {
        let board: Board = "XOX/XOO/OXX".parse().unwrap();
        let err = engine(Difficulty::Unbeatable)
            .decide(&board, Player::First, &mut LcgRandomGenerator::default())
            .unwrap_err();
        assert!(matches!(err.kind, EngineErrorKind::InvalidState(_)));
    }

    #[test]
    fn won_board_is_invalid_state() {
        let board: Board = "XXX/OO./...".parse().unwrap();
        let err = engine(Difficulty::Easy)
            .decide(&board, Player::Second, &mut LcgRandomGenerator::default())
            .unwrap_err();
        assert!(matches!(err.kind, EngineErrorKind::InvalidState(_)));
    }

    #[test]
    fn rejects_mismatched_board_and_empty_player() {
        let unbeatable = engine(Difficulty::Unbeatable);
        let mut random = LcgRandomGenerator::default();
        let big = Board::new(4, None).unwrap();
        assert!(unbeatable.decide(&big, Player::First, &mut random).is_err());
        assert!(
            unbeatable
                .decide(&Board::default(), Player::None, &mut random)
                .is_err()
        );
    }

    #[test]
    fn builder_rejects_bad_dimensions() {
        let err = DecisionEngine::builder()
            .with_size(3)
            .with_win_length(5)
            .build()
            .unwrap_err();
        assert!(matches!(err.kind, EngineErrorKind::InvalidConfig(_)));
    }

    #[test]
    fn one_shot_decide_uses_config() {
        let board: Board = "XOX/OXO/...".parse().unwrap();
        let chosen = decide(&board, Player::First, EngineConfig::default()).unwrap();
        assert_eq!(chosen.index(), 8);
    }

    #[test]
    fn builder_from_config_keeps_settings() {
        let config = EngineConfig::from_toml_str("size = 4\nwin_length = 3\ndifficulty = \"easy\"").unwrap();
        let built = DecisionEngineBuilder::from_config(config)
            .with_node_budget(10_000)
            .build()
            .unwrap();
        assert_eq!(built.config().size, 4);
        assert_eq!(built.config().node_budget, Some(10_000));
        assert_eq!(built.strategy(), Difficulty::Easy.strategy());
    }
}
