use std::fmt;

use itertools::Itertools;

use crate::csp::model::{Model, VarId};
use crate::csp::solver::{Assignment, Outcome, SolveError, solve};

/// A 9x9 grid of cells, where `0` marks an empty cell and `1..=9` a given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board(Vec<Vec<u8>>);

impl Board {
    /// Wraps a grid after validating its shape.
    ///
    /// # Panics
    ///
    /// If the grid is not 9x9 or any cell holds a value outside `0..=9`.
    #[must_use]
    pub fn new(board: Vec<Vec<u8>>) -> Self {
        assert_eq!(board.len(), SIZE, "a sudoku board needs {SIZE} rows");
        for (r, row) in board.iter().enumerate() {
            assert_eq!(row.len(), SIZE, "row {r} needs {SIZE} cells");
            for (c, &cell) in row.iter().enumerate() {
                assert!(
                    cell <= 9,
                    "cell ({r}, {c}) holds {cell}, expected 0 for empty or 1..=9"
                );
            }
        }
        Self(board)
    }

    /// The cell at `(row, col)`, `0` when empty.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.0[row][col]
    }

    /// Iterates over the rows of the board.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.0.iter().map(Vec::as_slice)
    }
}

impl From<[[u8; 9]; 9]> for Board {
    fn from(board: [[u8; 9]; 9]) -> Self {
        Self::new(board.iter().map(|r| r.to_vec()).collect())
    }
}

impl From<Vec<Vec<u8>>> for Board {
    fn from(board: Vec<Vec<u8>>) -> Self {
        Self::new(board)
    }
}

impl From<Board> for Vec<Vec<u8>> {
    fn from(board: Board) -> Self {
        board.0
    }
}

const SIZE: usize = 9;
const BLOCK: usize = 3;

/// A well-formed puzzle from Project Euler's collection, chosen because its
/// solution is unique.
pub const EXAMPLE: [[u8; 9]; 9] = [
    [0, 0, 3, 0, 2, 0, 6, 0, 0],
    [9, 0, 0, 3, 0, 5, 0, 0, 1],
    [0, 0, 1, 8, 0, 6, 4, 0, 0],
    [0, 0, 8, 1, 0, 2, 9, 0, 0],
    [7, 0, 0, 0, 0, 0, 0, 0, 8],
    [0, 0, 6, 7, 0, 8, 2, 0, 0],
    [0, 0, 2, 6, 0, 9, 5, 0, 0],
    [8, 0, 0, 2, 0, 3, 0, 0, 9],
    [0, 0, 5, 0, 1, 0, 3, 0, 0],
];

/// One Sudoku instance: a partially filled board plus the standard rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    /// The given cells.
    pub board: Board,
}

impl Sudoku {
    /// Builds a puzzle from a board of givens.
    #[must_use]
    pub const fn new(board: Board) -> Self {
        Self { board }
    }

    /// Builds the constraint model: one variable per cell with domain
    /// `1..=9`, all-different rows, columns and blocks, and one pinned value
    /// per given. The returned handles are in row-major order.
    #[must_use]
    pub fn to_model(&self) -> (Model, Vec<VarId>) {
        let mut model = Model::new();
        let vars: Vec<VarId> = (0..SIZE)
            .cartesian_product(0..SIZE)
            .map(|(r, c)| model.new_var(format!("r{r}c{c}"), 1, 9))
            .collect();
        let at = |r: usize, c: usize| vars[r * SIZE + c];

        for r in 0..SIZE {
            let row: Vec<VarId> = (0..SIZE).map(|c| at(r, c)).collect();
            model.all_different(&row);
        }
        for c in 0..SIZE {
            let col: Vec<VarId> = (0..SIZE).map(|r| at(r, c)).collect();
            model.all_different(&col);
        }
        for br in (0..SIZE).step_by(BLOCK) {
            for bc in (0..SIZE).step_by(BLOCK) {
                let block: Vec<VarId> = (br..br + BLOCK)
                    .cartesian_product(bc..bc + BLOCK)
                    .map(|(r, c)| at(r, c))
                    .collect();
                model.all_different(&block);
            }
        }
        for r in 0..SIZE {
            for c in 0..SIZE {
                let given = self.board.cell(r, c);
                if given != 0 {
                    model.equal_const(at(r, c), i32::from(given));
                }
            }
        }
        (model, vars)
    }

    /// Reads a satisfying assignment back into a fully filled board.
    ///
    /// # Panics
    ///
    /// If the assignment belongs to a different model than the one built by
    /// [`to_model`](Self::to_model).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn decode_solution(&self, vars: &[VarId], assignment: &Assignment) -> Self {
        let board = (0..SIZE)
            .map(|r| {
                (0..SIZE)
                    .map(|c| assignment.value(vars[r * SIZE + c]) as u8)
                    .collect()
            })
            .collect();
        Self::new(Board::new(board))
    }

    /// Solves the puzzle. `None` means the givens contradict the rules.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] when the external solver fails to reach a
    /// conclusion.
    pub fn solve(&self) -> Result<Option<Self>, SolveError> {
        let (model, vars) = self.to_model();
        match solve(&model)? {
            Outcome::Satisfiable(assignment) => Ok(Some(self.decode_solution(&vars, &assignment))),
            Outcome::Unsatisfiable => Ok(None),
        }
    }
}

impl From<Board> for Sudoku {
    fn from(board: Board) -> Self {
        Self::new(board)
    }
}

impl From<Sudoku> for Board {
    fn from(sudoku: Sudoku) -> Self {
        sudoku.board
    }
}

impl fmt::Display for Sudoku {
    /// Renders the board with 3x3 block separators, `.` for empty cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.board.rows().enumerate() {
            if r % BLOCK == 0 {
                writeln!(f, "+-------+-------+-------+")?;
            }
            for (c, &cell) in row.iter().enumerate() {
                if c % BLOCK == 0 {
                    write!(f, "| ")?;
                }
                if cell == 0 {
                    write!(f, ". ")?;
                } else {
                    write!(f, "{cell} ")?;
                }
            }
            writeln!(f, "|")?;
        }
        write!(f, "+-------+-------+-------+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED_EXAMPLE: [[u8; 9]; 9] = [
        [4, 8, 3, 9, 2, 1, 6, 5, 7],
        [9, 6, 7, 3, 4, 5, 8, 2, 1],
        [2, 5, 1, 8, 7, 6, 4, 9, 3],
        [5, 4, 8, 1, 3, 2, 9, 7, 6],
        [7, 2, 9, 5, 6, 4, 1, 3, 8],
        [1, 3, 6, 7, 9, 8, 2, 4, 5],
        [3, 7, 2, 6, 8, 9, 5, 1, 4],
        [8, 1, 4, 2, 5, 3, 7, 6, 9],
        [6, 9, 5, 4, 1, 7, 3, 8, 2],
    ];

    fn distinct(cells: impl Iterator<Item = u8>) -> bool {
        let mut seen = [false; 10];
        for cell in cells {
            if seen[cell as usize] {
                return false;
            }
            seen[cell as usize] = true;
        }
        true
    }

    #[test]
    fn test_example_has_its_unique_solution() {
        let sudoku = Sudoku::new(Board::from(EXAMPLE));
        let solved = sudoku.solve().unwrap().expect("example must be solvable");
        assert_eq!(solved.board, Board::from(SOLVED_EXAMPLE));
    }

    #[test]
    fn test_solution_preserves_givens() {
        let sudoku = Sudoku::new(Board::from(EXAMPLE));
        let solved = sudoku.solve().unwrap().unwrap();
        for r in 0..9 {
            for c in 0..9 {
                let given = sudoku.board.cell(r, c);
                if given != 0 {
                    assert_eq!(solved.board.cell(r, c), given);
                }
            }
        }
    }

    #[test]
    fn test_empty_board_fills_legally() {
        let sudoku = Sudoku::new(Board::new(vec![vec![0; 9]; 9]));
        let solved = sudoku.solve().unwrap().expect("empty board is solvable");
        for r in 0..9 {
            assert!(distinct((0..9).map(|c| solved.board.cell(r, c))));
        }
        for c in 0..9 {
            assert!(distinct((0..9).map(|r| solved.board.cell(r, c))));
        }
        for br in (0..9).step_by(3) {
            for bc in (0..9).step_by(3) {
                let block = (br..br + 3)
                    .flat_map(|r| (bc..bc + 3).map(move |c| (r, c)))
                    .map(|(r, c)| solved.board.cell(r, c));
                assert!(distinct(block));
            }
        }
    }

    #[test]
    fn test_conflicting_givens_are_unsat() {
        let mut grid = vec![vec![0; 9]; 9];
        grid[0][0] = 5;
        grid[0][8] = 5;
        let sudoku = Sudoku::new(Board::new(grid));
        assert_eq!(sudoku.solve().unwrap(), None);
    }

    #[test]
    fn test_solved_board_round_trips() {
        let sudoku = Sudoku::new(Board::from(SOLVED_EXAMPLE));
        let solved = sudoku.solve().unwrap().unwrap();
        assert_eq!(solved.board, sudoku.board);
    }

    #[test]
    #[should_panic(expected = "needs 9 rows")]
    fn test_short_board_rejected() {
        let _ = Board::new(vec![vec![0; 9]; 8]);
    }

    #[test]
    #[should_panic(expected = "needs 9 cells")]
    fn test_ragged_row_rejected() {
        let mut grid = vec![vec![0; 9]; 9];
        grid[4].pop();
        let _ = Board::new(grid);
    }

    #[test]
    #[should_panic(expected = "expected 0 for empty or 1..=9")]
    fn test_out_of_range_cell_rejected() {
        let mut grid = vec![vec![0; 9]; 9];
        grid[2][3] = 10;
        let _ = Board::new(grid);
    }

    #[test]
    fn test_display_marks_blocks_and_blanks() {
        let sudoku = Sudoku::new(Board::from(EXAMPLE));
        let rendered = sudoku.to_string();
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("+-------+-------+-------+"));
        assert_eq!(lines.next(), Some("| . . 3 | . 2 . | 6 . . |"));
        assert_eq!(rendered.lines().count(), 13);
        assert!(rendered.ends_with("+-------+-------+-------+"));
    }
}
