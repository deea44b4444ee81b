//! Scores boards from the point of view of one player.
//!
//! Terminal boards get an exact, depth-adjusted score. Boards reached at a depth cutoff
//! get a bounded positional estimate that never competes with a real win or loss.

use crate::board::Board;
use crate::error::EngineError;
use crate::{GameResult, Player};

/// Base score of a won game. A win at depth `d` scores `WIN_SCORE - d`.
pub const WIN_SCORE: i32 = 1_000_000;
/// The cutoff heuristic is clamped to `±HEURISTIC_LIMIT`.
pub const HEURISTIC_LIMIT: i32 = 100_000;
/// Weight of a line that is one mark short of complete.
const THREAT_WEIGHT: i32 = 10;

/// Scores a terminal board for `perspective`.
///
/// Faster wins score higher and slower losses score higher, so among equally won
/// branches the shallowest is preferred and among equally lost ones the deepest.
/// Fails with `InvalidState` if the game is still in progress.
pub fn score(board: &Board, perspective: Player, depth: usize) -> Result<i32, EngineError> {
    match board.result() {
        GameResult::InProgress => Err(EngineError::invalid_state(
            "only terminal boards have an exact score",
        )),
        result => Ok(score_outcome(result, perspective, depth)),
    }
}

/// Scores an already derived result. `InProgress` scores as a draw.
pub fn score_outcome(result: GameResult, perspective: Player, depth: usize) -> i32 {
    let depth = depth as i32;
    match result {
        GameResult::Win(winner) if winner == perspective => WIN_SCORE - depth,
        GameResult::Win(_) => -WIN_SCORE + depth,
        GameResult::Draw | GameResult::InProgress => 0,
    }
}

/// Cheap positional estimate of a non-terminal board for `perspective`.
///
/// Every line holding marks of only one side counts for that side: a line one mark
/// short of complete is worth [`THREAT_WEIGHT`], any other line its mark count. Lines
/// held by the opponent count against. Blocked and empty lines count for nothing.
pub fn heuristic(board: &Board, perspective: Player) -> i32 {
    let opponent = perspective.opponent();
    let cells = board.cells();
    let needed = board.win_length();
    let total: i32 = board
        .lines()
        .map(|line| {
            let (mut mine, mut theirs) = (0, 0);
            for cell in line.cells().map(|i| cells[i]) {
                if cell == Player::None {
                    continue;
                }
                if cell == perspective {
                    mine += 1;
                } else if cell == opponent {
                    theirs += 1;
                }
            }
            match (mine, theirs) {
                (0, 0) => 0,
                (n, 0) => line_weight(n, needed),
                (0, n) => -line_weight(n, needed),
                _ => 0,
            }
        })
        .sum();
    total.clamp(-HEURISTIC_LIMIT, HEURISTIC_LIMIT)
}

fn line_weight(marks: usize, needed: usize) -> i32 {
    if marks + 1 == needed {
        THREAT_WEIGHT
    } else {
        marks as i32
    }
}
