extern crate tictactoe_ai;

use tictactoe_ai::random::StandardRandomGenerator;
use tictactoe_ai::{Board, DecisionEngine, Difficulty, GameResult, Player};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Medium plays X, Unbeatable plays O
    let first = DecisionEngine::builder()
        .with_difficulty(Difficulty::Medium)
        .build()
        .unwrap();
    let second = DecisionEngine::builder()
        .with_difficulty(Difficulty::Unbeatable)
        .build()
        .unwrap();
    let mut random = StandardRandomGenerator;

    let mut board = Board::default();
    let mut to_move = Player::First;
    while board.result() == GameResult::InProgress {
        let engine = if to_move == Player::First {
            &first
        } else {
            &second
        };

        // Show how the engine sees the position before it commits
        let trace = engine.trace(&board, to_move, 2).unwrap();
        for (m, score) in trace.root_scores() {
            println!("{} cell {} = {}", to_move, m.index(), score);
        }

        let chosen = engine.decide(&board, to_move, &mut random).unwrap();
        board = board.apply(chosen, to_move).unwrap();
        println!("{} plays {:?}: {}", to_move, chosen.coordinates(board.size()), board);
        to_move = to_move.opponent();
    }

    println!("Result: {:?}", board.result());
    assert_ne!(board.result(), GameResult::Win(Player::First));
}
