//! Depth-aware minimax with optional alpha-beta pruning.
//!
//! Every branch works on its own board snapshot, so nothing is undone on the way back up.
//! The searcher always plays for the player to move at the root (the owner): owner nodes
//! maximize, opponent nodes minimize, and all scores are from the owner's point of view.

use crate::board::Board;
use crate::evaluator::{heuristic, score_outcome};
use crate::random::RandomGenerator;
use crate::strategy::TieBreak;
use crate::{GameResult, Move, Player};
use derive_more::{Display, Error};
use tracing::{trace, warn};

/// Lower bound of every score.
pub const NEG_INFINITY: i32 = -10_000_000;
/// Upper bound of every score.
pub const POS_INFINITY: i32 = 10_000_000;

/// The search ran past its node budget.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Display, Error)]
#[display("node budget exhausted")]
pub struct BudgetExhausted;

/// Result of searching the root of one decision.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RootOutcome {
    /// Every root move sharing the best score, in ascending cell order.
    pub candidates: Vec<Move>,
    /// The best score from the owner's point of view.
    pub score: i32,
}

impl RootOutcome {
    /// Applies a tie-break rule to the candidates.
    pub fn choose(&self, tie_break: TieBreak, random: &mut impl RandomGenerator) -> Option<Move> {
        match tie_break {
            TieBreak::HighestIndex => self.candidates.last().copied(),
            TieBreak::Random => random.pick(&self.candidates).copied(),
        }
    }
}

/// One search configuration, reused across iterations of iterative deepening.
#[derive(Debug, Clone)]
pub struct Searcher {
    owner: Player,
    depth_limit: Option<usize>,
    use_alpha_beta_pruning: bool,
    node_budget: Option<u64>,
    nodes: u64,
}

impl Searcher {
    /// Creates a searcher playing for `owner`. A `depth_limit` of `None` searches to the
    /// end of the game.
    pub fn new(owner: Player, depth_limit: Option<usize>, use_alpha_beta_pruning: bool) -> Self {
        Self {
            owner,
            depth_limit,
            use_alpha_beta_pruning,
            node_budget: None,
            nodes: 0,
        }
    }

    /// Number of nodes visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches every root move and collects the best-scoring ones.
    ///
    /// Each root child is searched with a window one below the best score seen so
    /// far, so a tie is always scored exactly while worse moves are cut early. Only a
    /// searcher given a node budget can fail.
    pub fn search_root(&mut self, board: &Board) -> Result<RootOutcome, BudgetExhausted> {
        let mut best: Option<i32> = None;
        let mut candidates = Vec::new();

        for index in board.empty_cells() {
            let child = board.placed(index, self.owner);
            let alpha = best.map_or(NEG_INFINITY, |b| b - 1);
            let value = self.minimax(&child, self.owner.opponent(), 1, alpha, POS_INFINITY)?;
            match best {
                Some(b) if value < b => {}
                Some(b) if value == b => candidates.push(Move::new(index)),
                _ => {
                    best = Some(value);
                    candidates.clear();
                    candidates.push(Move::new(index));
                }
            }
        }

        Ok(RootOutcome {
            candidates,
            score: best.unwrap_or(0),
        })
    }

    /// Backs up the score of `board` with `to_move` about to play, `depth` plies below
    /// the root.
    pub(crate) fn minimax(
        &mut self,
        board: &Board,
        to_move: Player,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32, BudgetExhausted> {
        self.nodes += 1;
        if self.node_budget.is_some_and(|budget| self.nodes > budget) {
            return Err(BudgetExhausted);
        }

        let result = board.result();
        if result != GameResult::InProgress {
            return Ok(score_outcome(result, self.owner, depth));
        }
        if self.depth_limit.is_some_and(|limit| depth >= limit) {
            return Ok(heuristic(board, self.owner));
        }

        let maximizing = to_move == self.owner;
        let mut best = if maximizing { NEG_INFINITY } else { POS_INFINITY };
        for index in board.empty_cells() {
            let child = board.placed(index, to_move);
            let value = self.minimax(&child, to_move.opponent(), depth + 1, alpha, beta)?;
            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }
            if self.use_alpha_beta_pruning && alpha >= beta {
                break;
            }
        }
        Ok(best)
    }
}

/// Full search under a node budget, deepening one ply at a time.
///
/// The one-ply iteration runs without a budget and always completes. When a later
/// iteration runs out of budget the outcome of the last completed one is returned.
pub fn iterative_deepening(
    board: &Board,
    owner: Player,
    use_alpha_beta_pruning: bool,
    node_budget: u64,
) -> Result<RootOutcome, BudgetExhausted> {
    let horizon = board.empty_cells().count();
    let mut searcher = Searcher::new(owner, Some(1), use_alpha_beta_pruning);
    let mut outcome = searcher.search_root(board)?;

    for depth in 2..=horizon {
        // the last ply reaches every terminal board
        let limit = if depth == horizon { None } else { Some(depth) };
        searcher.depth_limit = limit;
        searcher.node_budget = Some(node_budget);
        match searcher.search_root(board) {
            Ok(deeper) => {
                trace!(depth, nodes = searcher.nodes, score = deeper.score, "iteration complete");
                outcome = deeper;
            }
            Err(BudgetExhausted) => {
                warn!(
                    depth,
                    node_budget,
                    "node budget exhausted, keeping the previous iteration"
                );
                break;
            }
        }
    }
    Ok(outcome)
}
