#![deny(missing_docs)]
//! This crate poses four classic constraint-satisfaction puzzles as integer
//! models, lowers them to CNF, and lets an off-the-shelf SAT solver do the
//! searching.
//!
//! Each puzzle module follows the same shape: build a
//! [`csp::model::Model`], call [`csp::solver::solve`], and decode the
//! returned assignment back into the puzzle's own vocabulary. None of the
//! search logic lives here; anything clever happens inside [`splr`].

/// The `coloring` module colors the map of Australia so that no two
/// bordering regions share a color.
pub mod coloring;

/// The `cryptarithm` module solves verbal arithmetic such as
/// `TWO + TWO = FOUR`, one digit per letter.
pub mod cryptarithm;

/// The `csp` module is the shared layer: integer variables, constraints,
/// the CNF encoding, and the boundary to the external SAT solver.
pub mod csp;

/// The `queens` module places N mutually non-attacking queens on an N by N
/// board.
pub mod queens;

/// The `sudoku` module fills a 9x9 grid subject to the usual row, column
/// and block rules.
pub mod sudoku;
