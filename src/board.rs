use crate::error::EngineError;
use crate::{GameResult, Move, Player};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of the standard board.
pub const DEFAULT_BOARD_SIZE: usize = 3;
/// Largest supported side length.
pub const MAX_BOARD_SIZE: usize = 16;

/// Row, column, and both diagonal directions, as `(row step, col step)`.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// One immutable board snapshot.
///
/// Cells are stored row-major: index `i` maps to `(i / size, i % size)`. The number of
/// cells always equals `size * size`, and `2 <= win_length <= size` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard", into = "RawBoard")]
pub struct Board {
    size: usize,
    win_length: usize,
    cells: Vec<Player>,
}

impl Board {
    /// Creates an empty board. The win length defaults to the full side length
    /// when `win_length` is `None`.
    pub fn new(size: usize, win_length: Option<usize>) -> Result<Self, EngineError> {
        let win_length = win_length.unwrap_or(size);
        validate_dimensions(size, win_length)?;
        Ok(Self {
            size,
            win_length,
            cells: vec![Player::None; size * size],
        })
    }

    /// Creates a board from row-major cells.
    pub fn from_cells(
        size: usize,
        win_length: Option<usize>,
        cells: Vec<Player>,
    ) -> Result<Self, EngineError> {
        let win_length = win_length.unwrap_or(size);
        validate_dimensions(size, win_length)?;
        if cells.len() != size * size {
            return Err(EngineError::invalid_state(format!(
                "expected {} cells for a {}x{} board, got {}",
                size * size,
                size,
                size,
                cells.len()
            )));
        }
        Ok(Self {
            size,
            win_length,
            cells,
        })
    }

    /// Parses row notation such as `"XO./.X./..O"` with the given win length.
    ///
    /// Rows are separated by `/` or newlines. `X` is [`Player::First`], `O` is
    /// [`Player::Second`], and `.`, `-`, `_` or a space is an empty cell.
    pub fn parse(notation: &str, win_length: Option<usize>) -> Result<Self, EngineError> {
        let rows: Vec<&str> = notation
            .split(['/', '\n'])
            .map(|row| row.trim_end_matches('\r'))
            .filter(|row| !row.is_empty())
            .collect();
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in &rows {
            if row.chars().count() != size {
                return Err(EngineError::invalid_state(format!(
                    "row {:?} does not have {} cells",
                    row, size
                )));
            }
            for symbol in row.chars() {
                cells.push(match symbol {
                    'X' | 'x' => Player::First,
                    'O' | 'o' => Player::Second,
                    '.' | '-' | '_' | ' ' => Player::None,
                    other => {
                        return Err(EngineError::invalid_state(format!(
                            "unknown cell symbol {:?}",
                            other
                        )));
                    }
                });
            }
        }
        Self::from_cells(size, win_length, cells)
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of identical marks in a row needed to win.
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Player] {
        &self.cells
    }

    /// Returns the state of one cell.
    pub fn cell_at(&self, index: usize) -> Result<Player, EngineError> {
        self.cells
            .get(index)
            .copied()
            .ok_or_else(|| EngineError::out_of_range(index, self.cells.len()))
    }

    /// Indices of the empty cells, in ascending order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Player::None)
            .map(|(i, _)| i)
    }

    /// Number of marks placed so far.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Player::None).count()
    }

    /// True iff no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Player::None)
    }

    /// Every window of `win_length` consecutive cells along a row, a column or a diagonal.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        let size = self.size;
        let len = self.win_length;
        (0..size * size)
            .flat_map(move |index| {
                DIRECTIONS.iter().map(move |&direction| Line {
                    row: index / size,
                    col: index % size,
                    direction,
                    len,
                    size,
                })
            })
            .filter(Line::fits)
    }

    /// The player owning an unbroken line of `win_length` marks, or [`Player::None`].
    pub fn winner(&self) -> Player {
        self.lines()
            .find_map(|line| {
                let mut cells = line.cells();
                let first = self.cells[cells.next()?];
                if first == Player::None {
                    return None;
                }
                cells.all(|i| self.cells[i] == first).then_some(first)
            })
            .unwrap_or(Player::None)
    }

    /// True iff somebody has won or the board is full.
    pub fn is_terminal(&self) -> bool {
        self.winner() != Player::None || self.is_full()
    }

    /// Derives the current game result.
    pub fn result(&self) -> GameResult {
        match self.winner() {
            Player::None if self.is_full() => GameResult::Draw,
            Player::None => GameResult::InProgress,
            winner => GameResult::Win(winner),
        }
    }

    /// Returns a new snapshot with `player` placed on `index`. `self` is left untouched.
    pub fn with_move(&self, index: usize, player: Player) -> Result<Board, EngineError> {
        if player == Player::None {
            return Err(EngineError::invalid_state("cannot place an empty mark"));
        }
        match self.cell_at(index)? {
            Player::None => Ok(self.placed(index, player)),
            owner => Err(EngineError::invalid_state(format!(
                "cell {} is already taken by {}",
                index, owner
            ))),
        }
    }

    /// Applies a chosen move for `player`.
    pub fn apply(&self, chosen: Move, player: Player) -> Result<Board, EngineError> {
        self.with_move(chosen.index(), player)
    }

    /// Copy with one more mark. `index` must come from [`Board::empty_cells`].
    pub(crate) fn placed(&self, index: usize, player: Player) -> Board {
        let mut next = self.clone();
        next.cells[index] = player;
        next
    }
}

impl Default for Board {
    /// An empty 3x3 board where three in a row wins.
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            win_length: DEFAULT_BOARD_SIZE,
            cells: vec![Player::None; DEFAULT_BOARD_SIZE * DEFAULT_BOARD_SIZE],
        }
    }
}

impl FromStr for Board {
    type Err = EngineError;

    /// Parses row notation with the win length equal to the side length.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::parse(s, None)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(self.size).enumerate() {
            if row > 0 {
                f.write_str("/")?;
            }
            for cell in cells {
                let symbol = match cell {
                    Player::None => '.',
                    player => player.symbol(),
                };
                write!(f, "{}", symbol)?;
            }
        }
        Ok(())
    }
}

/// A straight run of `win_length` cells on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    row: usize,
    col: usize,
    direction: (isize, isize),
    len: usize,
    size: usize,
}

impl Line {
    /// Cell indices along the line, starting from its first cell.
    pub fn cells(self) -> impl Iterator<Item = usize> {
        (0..self.len).map(move |step| {
            let (row, col) = self.offset(step);
            row as usize * self.size + col as usize
        })
    }

    fn offset(&self, step: usize) -> (isize, isize) {
        let step = step as isize;
        (
            self.row as isize + self.direction.0 * step,
            self.col as isize + self.direction.1 * step,
        )
    }

    fn fits(&self) -> bool {
        let (row, col) = self.offset(self.len - 1);
        let size = self.size as isize;
        (0..size).contains(&row) && (0..size).contains(&col)
    }
}

fn validate_dimensions(size: usize, win_length: usize) -> Result<(), EngineError> {
    if !(2..=MAX_BOARD_SIZE).contains(&size) {
        return Err(EngineError::invalid_config(format!(
            "board size must be between 2 and {}, got {}",
            MAX_BOARD_SIZE, size
        )));
    }
    if !(2..=size).contains(&win_length) {
        return Err(EngineError::invalid_config(format!(
            "win length must be between 2 and {}, got {}",
            size, win_length
        )));
    }
    Ok(())
}

/// Unvalidated wire form of a [`Board`].
#[derive(Serialize, Deserialize)]
struct RawBoard {
    size: usize,
    win_length: usize,
    cells: Vec<Player>,
}

impl TryFrom<RawBoard> for Board {
    type Error = EngineError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        Board::from_cells(raw.size, Some(raw.win_length), raw.cells)
    }
}

impl From<Board> for RawBoard {
    fn from(board: Board) -> Self {
        RawBoard {
            size: board.size,
            win_length: board.win_length,
            cells: board.cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineErrorKind;

    #[test]
    fn default_board_is_empty_3x3() {
        let board = Board::default();
        assert_eq!(board.size(), 3);
        assert_eq!(board.win_length(), 3);
        assert_eq!(board.empty_cells().count(), 9);
        assert_eq!(board.result(), GameResult::InProgress);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(Board::new(1, None).is_err());
        assert!(Board::new(MAX_BOARD_SIZE + 1, None).is_err());
        assert!(Board::new(3, Some(4)).is_err());
        assert!(Board::new(3, Some(1)).is_err());
        assert!(Board::new(4, Some(3)).is_ok());
    }

    #[test]
    fn rejects_cell_count_mismatch() {
        let err = Board::from_cells(3, None, vec![Player::None; 8]).unwrap_err();
        assert!(matches!(err.kind, EngineErrorKind::InvalidState(_)));
    }

    #[test]
    fn cell_at_out_of_range() {
        let board = Board::default();
        let err = board.cell_at(9).unwrap_err();
        assert_eq!(err.kind, EngineErrorKind::OutOfRange { index: 9, cells: 9 });
    }

    #[test]
    fn empty_cells_ascending() {
        let board: Board = "X.O/.X./O..".parse().unwrap();
        assert_eq!(board.empty_cells().collect::<Vec<_>>(), vec![1, 3, 5, 7, 8]);
    }

    #[test]
    fn empty_cells_of_full_board() {
        let board: Board = "XOX/XOO/OXX".parse().unwrap();
        assert_eq!(board.empty_cells().count(), 0);
        assert!(board.is_full());
    }

    #[test]
    fn counts_lines_on_3x3() {
        // 3 rows, 3 columns, 2 diagonals
        assert_eq!(Board::default().lines().count(), 8);
    }

    #[test]
    fn counts_lines_with_short_win_length() {
        let board = Board::new(4, Some(3)).unwrap();
        // 8 horizontal, 8 vertical, 4 + 4 diagonal windows
        assert_eq!(board.lines().count(), 24);
    }

    #[test]
    fn every_line_of_3x3_wins() {
        let board = Board::default();
        for line in board.lines() {
            for player in [Player::First, Player::Second] {
                let mut cells = vec![Player::None; 9];
                for i in line.cells() {
                    cells[i] = player;
                }
                let won = Board::from_cells(3, None, cells).unwrap();
                assert_eq!(won.winner(), player);
                assert_eq!(won.result(), GameResult::Win(player));
            }
        }
    }

    #[test]
    fn no_winner_without_complete_line() {
        let board: Board = "XX./OO./...".parse().unwrap();
        assert_eq!(board.winner(), Player::None);
        assert!(!board.is_terminal());
    }

    #[test]
    fn detects_offset_diagonal_with_short_win_length() {
        let board = Board::parse(".X../..X./...X/....", Some(3)).unwrap();
        assert_eq!(board.winner(), Player::First);
    }

    #[test]
    fn detects_anti_diagonal_on_2x2() {
        let board = Board::from_cells(
            2,
            None,
            vec![Player::None, Player::Second, Player::Second, Player::None],
        )
        .unwrap();
        assert_eq!(board.winner(), Player::Second);
    }

    #[test]
    fn full_board_without_line_is_draw() {
        let board: Board = "XOX/XOO/OXX".parse().unwrap();
        assert_eq!(board.winner(), Player::None);
        assert!(board.is_terminal());
        assert_eq!(board.result(), GameResult::Draw);
    }

    #[test]
    fn with_move_leaves_original_untouched() {
        let board = Board::default();
        let next = board.with_move(4, Player::First).unwrap();
        assert_eq!(board.cell_at(4).unwrap(), Player::None);
        assert_eq!(next.cell_at(4).unwrap(), Player::First);
        assert_eq!(next.filled_count(), 1);
    }

    #[test]
    fn with_move_rejects_taken_cell_and_empty_mark() {
        let board: Board = "X../.../...".parse().unwrap();
        assert!(matches!(
            board.with_move(0, Player::Second).unwrap_err().kind,
            EngineErrorKind::InvalidState(_)
        ));
        assert!(matches!(
            board.with_move(1, Player::None).unwrap_err().kind,
            EngineErrorKind::InvalidState(_)
        ));
        assert!(matches!(
            board.with_move(42, Player::First).unwrap_err().kind,
            EngineErrorKind::OutOfRange { .. }
        ));
    }

    #[test]
    fn display_round_trips_notation() {
        let board: Board = "X.O/.X./O..".parse().unwrap();
        assert_eq!(board.to_string(), "X.O/.X./O..");
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        assert!("XO/.../...".parse::<Board>().is_err());
        assert!("XQ./.../...".parse::<Board>().is_err());
    }
}
