#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The shared constraint layer: integer variables and constraints on one
//! side, the external SAT solver on the other, with the direct encoding in
//! between.
//!
//! The flow is the same for every puzzle. Build a [`model::Model`], hand it
//! to [`solver::solve`], and match on the [`solver::Outcome`]. Encoding to
//! clauses and reading the certificate back are internal steps, exposed only
//! so the command line can report clause statistics and dump DIMACS.

pub mod cnf;
pub mod constraint;
pub mod encode;
pub mod model;
pub mod solver;
