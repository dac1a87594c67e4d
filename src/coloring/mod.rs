#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module poses map coloring as a constraint model.

/// The `solver` module builds the region graph, colors it, and names the
/// colors in the output.
pub mod solver;
