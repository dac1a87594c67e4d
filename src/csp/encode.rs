#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Lowering a [`Model`] to CNF via the direct encoding.
//!
//! Every `(variable, value)` pair gets one boolean indicator, and each
//! variable's block carries an at-least-one clause plus pairwise
//! at-most-one clauses, so exactly one indicator per variable holds in any
//! solution. Constraints then become conflict clauses over indicators:
//! forbidding `a = v and b = v` is the clause `(!a_v or !b_v)`.
//!
//! Linear equalities fold left to right through scratch columns of
//! partial-sum indicators, one ternary implication clause per
//! `(partial sum, next value)` pair, and the final column is checked
//! against the right-hand side. The implication chain pins each scratch
//! column's true indicator, so scratch columns carry no exactly-one
//! clauses.

use itertools::Itertools;

use crate::csp::cnf::Cnf;
use crate::csp::constraint::{Constraint, abs_diff};
use crate::csp::model::{Domain, Model, VarId};
use crate::csp::solver::Assignment;

/// Widest partial-sum interval we are willing to spend indicators on.
const MAX_SCRATCH_VALUES: usize = 100_000;

/// A block of indicators for one partial-sum interval, laid out after the
/// model variables' blocks.
#[derive(Debug, Clone, Copy)]
struct Scratch {
    first: usize,
    lo: i64,
    hi: i64,
}

impl Scratch {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn lit(self, sum: i64) -> i32 {
        debug_assert!(
            self.lo <= sum && sum <= self.hi,
            "partial sum {sum} outside scratch interval [{}, {}]",
            self.lo,
            self.hi
        );
        (self.first + (sum - self.lo) as usize) as i32
    }
}

/// The CNF image of a model, plus the bookkeeping needed to read a solver
/// certificate back into integer values.
#[derive(Debug, Clone)]
pub struct Encoding {
    cnf: Cnf,
    offsets: Vec<usize>,
    domains: Vec<Domain>,
}

impl Encoding {
    /// Encodes `model` into clauses.
    ///
    /// A constraint that can never hold (pinning a variable to a value
    /// outside its domain) produces an empty clause rather than a panic;
    /// [`is_trivially_unsat`](Self::is_trivially_unsat) reports it and the
    /// solver front end short-circuits to unsatisfiable.
    #[must_use]
    pub fn new(model: &Model) -> Self {
        let mut offsets = Vec::with_capacity(model.num_vars());
        let mut domains = Vec::with_capacity(model.num_vars());
        let mut next = 1;
        for index in 0..model.num_vars() {
            let domain = model.domain(VarId::new(index));
            offsets.push(next);
            domains.push(domain);
            next += domain.size();
        }

        let mut encoding = Self {
            cnf: Cnf::new(),
            offsets,
            domains,
        };
        for index in 0..model.num_vars() {
            encoding.exactly_one(VarId::new(index));
        }
        for constraint in model.constraints() {
            encoding.encode_constraint(model, constraint, &mut next);
        }
        encoding
    }

    /// The clauses produced so far.
    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Whether encoding already proved the model unsatisfiable, in which
    /// case the clause set must not be handed to the external solver.
    #[must_use]
    pub fn is_trivially_unsat(&self) -> bool {
        self.cnf.has_empty_clause()
    }

    /// The DIMACS index of the indicator for `var = value`.
    ///
    /// # Panics
    ///
    /// If `value` lies outside the variable's domain.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn literal(&self, var: VarId, value: i32) -> i32 {
        let domain = self.domains[var.index()];
        assert!(
            domain.contains(value),
            "value {value} outside domain [{}, {}] of variable #{}",
            domain.lo(),
            domain.hi(),
            var.index()
        );
        (self.offsets[var.index()] + (value - domain.lo()) as usize) as i32
    }

    /// Reads a satisfying certificate (signed DIMACS literals, as returned
    /// by the external solver) back into one integer value per model
    /// variable.
    ///
    /// # Panics
    ///
    /// If some variable has no true indicator. The exactly-one clauses make
    /// that impossible for any genuine certificate, so a panic here means
    /// the certificate belongs to a different encoding.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn decode(&self, answer: &[i32]) -> Assignment {
        let mut truth = vec![false; self.cnf.num_vars + 1];
        for &lit in answer {
            let index = lit.unsigned_abs() as usize;
            if index < truth.len() {
                truth[index] = lit > 0;
            }
        }
        let values = self
            .domains
            .iter()
            .enumerate()
            .map(|(index, domain)| {
                domain
                    .values()
                    .find(|&value| truth[self.offsets[index] + (value - domain.lo()) as usize])
                    .unwrap_or_else(|| {
                        panic!("certificate assigns no value to variable #{index}")
                    })
            })
            .collect();
        Assignment::new(values)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn exactly_one(&mut self, var: VarId) {
        let first = self.offsets[var.index()];
        let size = self.domains[var.index()].size();
        self.cnf.add_clause((0..size).map(|i| (first + i) as i32));
        for (a, b) in (0..size).tuple_combinations() {
            self.cnf
                .add_clause([-((first + a) as i32), -((first + b) as i32)]);
        }
    }

    fn encode_constraint(&mut self, model: &Model, constraint: &Constraint, next: &mut usize) {
        match constraint {
            Constraint::NotEqual(a, b) => self.forbid_equal(*a, *b),
            Constraint::NotEqualConst(var, value) => {
                if self.domains[var.index()].contains(*value) {
                    let lit = self.literal(*var, *value);
                    self.cnf.add_clause([-lit]);
                }
            }
            Constraint::EqualConst(var, value) => {
                if self.domains[var.index()].contains(*value) {
                    let lit = self.literal(*var, *value);
                    self.cnf.add_clause([lit]);
                } else {
                    self.cnf.add_clause(std::iter::empty());
                }
            }
            Constraint::AllDifferent(vars) => {
                for (&a, &b) in vars.iter().tuple_combinations() {
                    self.forbid_equal(a, b);
                }
            }
            Constraint::AbsDiffNotEqual { a, b, distance } => {
                for va in self.domains[a.index()].values() {
                    for vb in self.domains[b.index()].values() {
                        if abs_diff(va, vb) == *distance {
                            let la = self.literal(*a, va);
                            let lb = self.literal(*b, vb);
                            self.cnf.add_clause([-la, -lb]);
                        }
                    }
                }
            }
            Constraint::LinearEq { terms, rhs } => {
                self.encode_linear_eq(model, terms, *rhs, next);
            }
        }
    }

    fn forbid_equal(&mut self, a: VarId, b: VarId) {
        let dom_b = self.domains[b.index()];
        for value in self.domains[a.index()].values() {
            if dom_b.contains(value) {
                let la = self.literal(a, value);
                let lb = self.literal(b, value);
                self.cnf.add_clause([-la, -lb]);
            }
        }
    }

    fn encode_linear_eq(&mut self, model: &Model, terms: &[(i32, VarId)], rhs: i32, next: &mut usize) {
        match terms {
            [] => {
                if rhs != 0 {
                    self.cnf.add_clause(std::iter::empty());
                }
            }
            [(coefficient, var)] => {
                // One term needs no scratch columns: forbid every value that
                // misses the target, and the at-least-one clause does the rest.
                for value in model.domain(*var).values() {
                    if i64::from(*coefficient) * i64::from(value) != i64::from(rhs) {
                        let lit = self.literal(*var, value);
                        self.cnf.add_clause([-lit]);
                    }
                }
            }
            _ => self.encode_linear_ladder(model, terms, rhs, next),
        }
    }

    fn encode_linear_ladder(
        &mut self,
        model: &Model,
        terms: &[(i32, VarId)],
        rhs: i32,
        next: &mut usize,
    ) {
        let count = terms.len();
        let mut bounds = Vec::with_capacity(count);
        let mut running = (0_i64, 0_i64);
        for &(coefficient, var) in terms {
            let (lo, hi) = term_bounds(coefficient, model.domain(var));
            running = (running.0 + lo, running.1 + hi);
            bounds.push(running);
        }

        let (first_coefficient, first_var) = terms[0];
        let mut prev = new_scratch(bounds[0], next);
        for value in model.domain(first_var).values() {
            let sum = i64::from(first_coefficient) * i64::from(value);
            let lit = self.literal(first_var, value);
            self.cnf.add_clause([-lit, prev.lit(sum)]);
        }

        for k in 1..count - 1 {
            let (coefficient, var) = terms[k];
            let scratch = new_scratch(bounds[k], next);
            let (lo, hi) = bounds[k - 1];
            for partial in lo..=hi {
                for value in model.domain(var).values() {
                    let sum = partial + i64::from(coefficient) * i64::from(value);
                    let lit = self.literal(var, value);
                    self.cnf
                        .add_clause([-prev.lit(partial), -lit, scratch.lit(sum)]);
                }
            }
            prev = scratch;
        }

        let (last_coefficient, last_var) = terms[count - 1];
        let (lo, hi) = bounds[count - 2];
        for partial in lo..=hi {
            for value in model.domain(last_var).values() {
                let sum = partial + i64::from(last_coefficient) * i64::from(value);
                if sum != i64::from(rhs) {
                    let lit = self.literal(last_var, value);
                    self.cnf.add_clause([-prev.lit(partial), -lit]);
                }
            }
        }
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn new_scratch((lo, hi): (i64, i64), next: &mut usize) -> Scratch {
    let size = (hi - lo + 1) as usize;
    assert!(
        size <= MAX_SCRATCH_VALUES,
        "partial-sum column spans {size} values, too wide to one-hot encode"
    );
    let scratch = Scratch {
        first: *next,
        lo,
        hi,
    };
    *next += size;
    scratch
}

/// Range of `coefficient * value` as `value` sweeps the domain.
fn term_bounds(coefficient: i32, domain: Domain) -> (i64, i64) {
    let c = i64::from(coefficient);
    if c >= 0 {
        (c * i64::from(domain.lo()), c * i64::from(domain.hi()))
    } else {
        (c * i64::from(domain.hi()), c * i64::from(domain.lo()))
    }
}
