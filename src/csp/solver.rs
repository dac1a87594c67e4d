#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The boundary to the external SAT solver.
//!
//! Everything up to here is pure bookkeeping; this module is the only place
//! that talks to [`splr`]. Each call builds a fresh solver from the clause
//! list, so repeated solves of the same model are independent and
//! deterministic.

use std::fmt;

use crate::csp::encode::Encoding;
use crate::csp::model::{Model, VarId};

/// One integer value per model variable, indexed by [`VarId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<i32>,
}

impl Assignment {
    pub(crate) const fn new(values: Vec<i32>) -> Self {
        Self { values }
    }

    /// The value assigned to `var`.
    ///
    /// # Panics
    ///
    /// If `var` belongs to a model with more variables than this assignment
    /// covers.
    #[must_use]
    pub fn value(&self, var: VarId) -> i32 {
        self.values[var.index()]
    }

    /// All values in variable declaration order.
    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Number of assigned variables.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the assignment covers no variables at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A conclusive solver verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model has a solution, and here is one.
    Satisfiable(Assignment),
    /// The solver proved that no assignment satisfies the model.
    Unsatisfiable,
}

impl Outcome {
    /// Whether this is the satisfiable verdict.
    #[must_use]
    pub const fn is_satisfiable(&self) -> bool {
        matches!(self, Self::Satisfiable(_))
    }

    /// The witness, if the verdict is satisfiable.
    #[must_use]
    pub const fn assignment(&self) -> Option<&Assignment> {
        match self {
            Self::Satisfiable(assignment) => Some(assignment),
            Self::Unsatisfiable => None,
        }
    }
}

/// The external solver gave up or failed instead of producing a verdict.
///
/// Timeouts, resource exhaustion and internal solver errors all land here;
/// callers treat them identically, as the absence of an answer. An
/// inconclusive result never masquerades as `Unsatisfiable`.
#[derive(Debug)]
pub struct SolveError(splr::SolverError);

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "external solver failed: {:?}", self.0)
    }
}

impl std::error::Error for SolveError {}

impl From<splr::SolverError> for SolveError {
    fn from(err: splr::SolverError) -> Self {
        Self(err)
    }
}

/// Encodes `model` and asks the external solver for a verdict.
///
/// # Errors
///
/// Returns [`SolveError`] when the external solver fails to reach a
/// conclusion.
pub fn solve(model: &Model) -> Result<Outcome, SolveError> {
    solve_encoded(&Encoding::new(model))
}

/// Presents an already-built encoding to the external solver. Splitting
/// this from [`solve`] lets the command line time encoding and solving
/// separately.
///
/// # Errors
///
/// Returns [`SolveError`] when the external solver fails to reach a
/// conclusion.
pub fn solve_encoded(encoding: &Encoding) -> Result<Outcome, SolveError> {
    if encoding.is_trivially_unsat() {
        // The empty clause must never reach the solver.
        return Ok(Outcome::Unsatisfiable);
    }
    if encoding.cnf().clauses.is_empty() {
        // No variables, no constraints.
        return Ok(Outcome::Satisfiable(Assignment::new(Vec::new())));
    }
    match splr::Certificate::try_from(encoding.cnf().to_dimacs_clauses()) {
        Ok(splr::Certificate::SAT(answer)) => Ok(Outcome::Satisfiable(encoding.decode(&answer))),
        Ok(splr::Certificate::UNSAT) => Ok(Outcome::Unsatisfiable),
        Err(err) => Err(SolveError::from(err)),
    }
}
