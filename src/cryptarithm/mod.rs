#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module poses verbal arithmetic (`TWO + TWO = FOUR`) as a constraint
//! model.

/// The `solver` module parses puzzles, builds the column-by-column model
/// with carry variables, and renders solved sums.
pub mod solver;
