#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module poses 9x9 Sudoku as a constraint model.

/// The `solver` module holds the board type, the constraint model and the
/// solution decoder.
pub mod solver;
