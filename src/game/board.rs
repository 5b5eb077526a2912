//! The 3x3 grid and its terminal-state detection.

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// The mark a player writes into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// Symbol of the first player to occupy a room.
    X,
    /// Symbol of the second player.
    O,
}

impl Symbol {
    /// Returns the opposing symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}

/// One position in the grid.
///
/// A cell only ever transitions `Empty` to `Marked`, never back and never
/// between symbols; [`Board::place`] is the sole mutation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No symbol placed yet.
    Empty,
    /// Cell claimed by a symbol.
    Marked(Symbol),
}

/// The 8 winning triples as row-major indices: rows, columns, main
/// diagonal, anti-diagonal.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Fixed 3x3 grid of cells, row-major.
///
/// The board knows nothing about players or turns; turn order is the
/// room's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Rebuilds a board from raw cells (persistence snapshots).
    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Self { cells }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Places `symbol` at 1-based `(row, col)`.
    ///
    /// Exactly one cell transitions from empty to `symbol` on success; no
    /// cell changes on failure.
    ///
    /// # Errors
    ///
    /// [`GameError::OutOfRange`] when either coordinate falls outside
    /// `[1, 3]`, [`GameError::CellOccupied`] when the target already holds
    /// a symbol.
    pub fn place(&mut self, row: u8, col: u8, symbol: Symbol) -> Result<(), GameError> {
        let idx = Self::index(row, col)?;
        match self.cells[idx] {
            Cell::Empty => {
                self.cells[idx] = Cell::Marked(symbol);
                Ok(())
            }
            Cell::Marked(_) => Err(GameError::CellOccupied),
        }
    }

    /// Returns true iff at least one winning line is fully occupied by
    /// `symbol`. Checks rows, then columns, then the diagonals, and
    /// short-circuits on the first match.
    pub fn evaluate_victory(&self, symbol: Symbol) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == Cell::Marked(symbol)))
    }

    /// Returns true iff every cell is occupied.
    ///
    /// A full board that also holds a winning line is a win, not a
    /// stalemate; the caller checks victory first.
    pub fn evaluate_stalemate(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// The grid as rows of display strings (`"X"`, `"O"`, `" "`).
    pub fn grid(&self) -> [[String; 3]; 3] {
        std::array::from_fn(|row| {
            std::array::from_fn(|col| match self.cells[row * 3 + col] {
                Cell::Empty => " ".to_string(),
                Cell::Marked(s) => s.to_string(),
            })
        })
    }

    fn index(row: u8, col: u8) -> Result<usize, GameError> {
        if !(1..=3).contains(&row) || !(1..=3).contains(&col) {
            return Err(GameError::OutOfRange);
        }
        Ok((row as usize - 1) * 3 + (col as usize - 1))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_out_of_range_leaves_board_unchanged() {
        let mut board = Board::new();
        for (row, col) in [(0, 1), (1, 0), (4, 1), (1, 4), (0, 0), (255, 255)] {
            assert_eq!(board.place(row, col, Symbol::X), Err(GameError::OutOfRange));
        }
        assert_eq!(board, Board::new());
    }

    #[test]
    fn place_occupied_cell_fails_without_overwrite() {
        let mut board = Board::new();
        board.place(2, 2, Symbol::X).unwrap();
        let before = board.clone();
        assert_eq!(board.place(2, 2, Symbol::O), Err(GameError::CellOccupied));
        assert_eq!(board.place(2, 2, Symbol::X), Err(GameError::CellOccupied));
        assert_eq!(board, before);
    }

    #[test]
    fn place_marks_exactly_one_cell() {
        let mut board = Board::new();
        board.place(1, 3, Symbol::O).unwrap();
        let marked: Vec<_> = board
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != Cell::Empty)
            .collect();
        assert_eq!(marked, vec![(2usize, &Cell::Marked(Symbol::O))]);
    }

    #[test]
    fn victory_detected_on_each_of_the_eight_lines() {
        let coords: [[(u8, u8); 3]; 8] = [
            [(1, 1), (1, 2), (1, 3)],
            [(2, 1), (2, 2), (2, 3)],
            [(3, 1), (3, 2), (3, 3)],
            [(1, 1), (2, 1), (3, 1)],
            [(1, 2), (2, 2), (3, 2)],
            [(1, 3), (2, 3), (3, 3)],
            [(1, 1), (2, 2), (3, 3)],
            [(1, 3), (2, 2), (3, 1)],
        ];
        for line in coords {
            let mut board = Board::new();
            for (row, col) in line {
                board.place(row, col, Symbol::X).unwrap();
            }
            assert!(board.evaluate_victory(Symbol::X), "line {:?}", line);
            assert!(!board.evaluate_victory(Symbol::O), "line {:?}", line);
        }
    }

    #[test]
    fn no_victory_without_a_complete_line() {
        let mut board = Board::new();
        board.place(1, 1, Symbol::X).unwrap();
        board.place(1, 2, Symbol::X).unwrap();
        assert!(!board.evaluate_victory(Symbol::X));

        // Mixed line is no one's win.
        board.place(1, 3, Symbol::O).unwrap();
        assert!(!board.evaluate_victory(Symbol::X));
        assert!(!board.evaluate_victory(Symbol::O));
    }

    #[test]
    fn stalemate_requires_a_full_grid() {
        let mut board = Board::new();
        assert!(!board.evaluate_stalemate());
        board.place(2, 2, Symbol::X).unwrap();
        assert!(!board.evaluate_stalemate());
    }

    #[test]
    fn drawn_grid_is_stalemate_with_no_victor() {
        // X O X / O X O / O X O: full, no line for either symbol.
        let mut board = Board::new();
        let pattern = [
            (1, 1, Symbol::X),
            (1, 2, Symbol::O),
            (1, 3, Symbol::X),
            (2, 1, Symbol::O),
            (2, 2, Symbol::X),
            (2, 3, Symbol::O),
            (3, 1, Symbol::O),
            (3, 2, Symbol::X),
            (3, 3, Symbol::O),
        ];
        for (row, col, symbol) in pattern {
            board.place(row, col, symbol).unwrap();
        }
        assert!(!board.evaluate_victory(Symbol::X));
        assert!(!board.evaluate_victory(Symbol::O));
        assert!(board.evaluate_stalemate());
    }

    #[test]
    fn full_winning_board_still_reports_victory() {
        let mut board = Board::new();
        for row in 1..=3u8 {
            for col in 1..=3u8 {
                board.place(row, col, Symbol::X).unwrap();
            }
        }
        assert!(board.evaluate_stalemate());
        assert!(board.evaluate_victory(Symbol::X));
    }

    #[test]
    fn grid_renders_symbols_and_blanks() {
        let mut board = Board::new();
        board.place(1, 1, Symbol::X).unwrap();
        board.place(3, 3, Symbol::O).unwrap();
        let grid = board.grid();
        assert_eq!(grid[0][0], "X");
        assert_eq!(grid[2][2], "O");
        assert_eq!(grid[1][1], " ");
    }
}
