#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module poses the N-Queens placement problem as a constraint model.

/// The `solver` module builds the column-per-variable model and renders
/// placements as an ASCII board.
pub mod solver;
