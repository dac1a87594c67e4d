use std::fmt;

use itertools::Itertools;

use crate::csp::model::{Model, VarId};
use crate::csp::solver::{Assignment, Outcome, SolveError, solve};

/// The N-Queens problem on an `n` by `n` board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Queens {
    n: usize,
}

impl Queens {
    /// Creates an instance for an `n` by `n` board.
    ///
    /// # Panics
    ///
    /// If `n` is zero.
    #[must_use]
    pub const fn new(n: usize) -> Self {
        assert!(n >= 1, "a board needs at least one column");
        Self { n }
    }

    /// The board dimension.
    #[must_use]
    pub const fn size(self) -> usize {
        self.n
    }

    /// Builds the constraint model. One variable per column holds the row of
    /// that column's queen, which rules out column attacks by construction;
    /// all-different rules out row attacks, and one distance constraint per
    /// column pair rules out both diagonals at once.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn to_model(self) -> (Model, Vec<VarId>) {
        let mut model = Model::new();
        let vars: Vec<VarId> = (0..self.n)
            .map(|c| model.new_var(format!("q{c}"), 0, self.n as i32 - 1))
            .collect();
        model.all_different(&vars);
        for (i, j) in (0..self.n).tuple_combinations() {
            model.abs_diff_not_equal(vars[i], vars[j], (j - i) as i32);
        }
        (model, vars)
    }

    /// Reads a satisfying assignment back into a placement.
    ///
    /// # Panics
    ///
    /// If the assignment belongs to a different model than the one built by
    /// [`to_model`](Self::to_model).
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn decode_solution(self, vars: &[VarId], assignment: &Assignment) -> Placement {
        Placement {
            rows: vars
                .iter()
                .map(|&v| assignment.value(v) as usize)
                .collect(),
        }
    }

    /// Solves the instance. `None` means no non-attacking placement exists,
    /// which holds exactly for `n` of 2 and 3.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] when the external solver fails to reach a
    /// conclusion.
    pub fn solve(self) -> Result<Option<Placement>, SolveError> {
        let (model, vars) = self.to_model();
        match solve(&model)? {
            Outcome::Satisfiable(assignment) => {
                Ok(Some(self.decode_solution(&vars, &assignment)))
            }
            Outcome::Unsatisfiable => Ok(None),
        }
    }
}

/// A non-attacking placement: `rows()[c]` is the row of the queen in column
/// `c`, counted from the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    rows: Vec<usize>,
}

impl Placement {
    /// Queen rows in column order.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// The board dimension.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.rows.len()
    }
}

impl fmt::Display for Placement {
    /// Renders the board one cell wide per column, `*` marking a queen.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = format!("{}+", "+---".repeat(self.rows.len()));
        for row in 0..self.rows.len() {
            writeln!(f, "{separator}")?;
            for &queen_row in &self.rows {
                write!(f, "|{}", if queen_row == row { " * " } else { "   " })?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "{separator}")
    }
}
