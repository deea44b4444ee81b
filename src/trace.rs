use crate::board::Board;
use crate::evaluator::{heuristic, score_outcome};
use crate::{GameResult, Move, Player};
use ego_tree::{NodeMut, NodeRef, Tree};
use std::fmt;

/// One explored position in a [`SearchTrace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceNode {
    /// The move that led here from the parent. `None` for the root.
    pub prev_move: Option<Move>,
    /// The player about to move in this position.
    pub to_move: Player,
    /// Plies below the root.
    pub depth: usize,
    /// The backed-up minimax score, from the root player's point of view.
    pub score: i32,
    /// True if the game is over in this position.
    pub is_terminal: bool,
}

/// The game tree explored for one position, kept for inspection.
///
/// Unlike a decision, a trace never prunes: every sibling holds its exact minimax
/// value at the traced horizon. The bot uses it to explain a move or suggest one.
#[derive(Debug, Clone)]
pub struct SearchTrace {
    tree: Tree<TraceNode>,
}

impl SearchTrace {
    /// Explores `board` with `to_move` to play, down to `max_depth` plies.
    pub fn explore(board: &Board, to_move: Player, max_depth: usize) -> Self {
        let mut tree = Tree::new(TraceNode {
            prev_move: None,
            to_move,
            depth: 0,
            score: 0,
            is_terminal: false,
        });
        let mut root = tree.root_mut();
        let score = expand(&mut root, board, to_move, to_move, max_depth);
        let node = root.value();
        node.score = score;
        node.is_terminal = board.is_terminal();
        Self { tree }
    }

    /// Returns an immutable reference to the underlying tree.
    pub fn tree(&self) -> &Tree<TraceNode> {
        &self.tree
    }

    /// Number of recorded positions, the root included.
    pub fn node_count(&self) -> usize {
        self.tree.nodes().count()
    }

    /// The root's backed-up score.
    pub fn best_score(&self) -> i32 {
        self.tree.root().value().score
    }

    /// The score of every root move, in ascending cell order.
    pub fn root_scores(&self) -> Vec<(Move, i32)> {
        self.tree
            .root()
            .children()
            .filter_map(|child| {
                let node = child.value();
                node.prev_move.map(|m| (m, node.score))
            })
            .collect()
    }

    /// The line of play both sides follow under minimax, from the root down.
    ///
    /// Among equal scores the highest cell index is taken, matching the deterministic
    /// tie-break of a decision.
    pub fn principal_variation(&self) -> Vec<Move> {
        let mut line = Vec::new();
        let mut node = self.tree.root();
        while let Some(next) = best_child(node) {
            if let Some(m) = next.value().prev_move {
                line.push(m);
            }
            node = next;
        }
        line
    }

    /// Renders the tree as indented text, one position per line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in self.tree.root().traverse() {
            if let ego_tree::iter::Edge::Open(node) = edge {
                let value = node.value();
                write!(f, "{:indent$}", "", indent = value.depth * 2)?;
                match value.prev_move {
                    Some(m) => write!(f, "#{}", m.index())?,
                    None => write!(f, "root")?,
                }
                writeln!(f, " to_move={} score={}", value.to_move, value.score)?;
            }
        }
        Ok(())
    }
}

fn best_child(node: NodeRef<'_, TraceNode>) -> Option<NodeRef<'_, TraceNode>> {
    let maximizing = node.value().to_move == root_player(node);
    node.children().reduce(|best, child| {
        let (b, c) = (best.value().score, child.value().score);
        let better = if maximizing { c >= b } else { c <= b };
        if better { child } else { best }
    })
}

fn root_player(node: NodeRef<'_, TraceNode>) -> Player {
    node.ancestors()
        .last()
        .map_or(node.value().to_move, |root| root.value().to_move)
}

fn expand(
    node: &mut NodeMut<'_, TraceNode>,
    board: &Board,
    owner: Player,
    to_move: Player,
    max_depth: usize,
) -> i32 {
    let depth = node.value().depth;
    let result = board.result();
    if result != GameResult::InProgress {
        return score_outcome(result, owner, depth);
    }
    if depth >= max_depth {
        return heuristic(board, owner);
    }

    let maximizing = to_move == owner;
    let mut best: Option<i32> = None;
    for index in board.empty_cells() {
        let child_board = board.placed(index, to_move);
        let mut child = node.append(TraceNode {
            prev_move: Some(Move::new(index)),
            to_move: to_move.opponent(),
            depth: depth + 1,
            score: 0,
            is_terminal: child_board.is_terminal(),
        });
        let score = expand(&mut child, &child_board, owner, to_move.opponent(), max_depth);
        child.value().score = score;
        best = Some(match best {
            None => score,
            Some(b) if maximizing => b.max(score),
            Some(b) => b.min(score),
        });
    }
    best.unwrap_or(0)
}
