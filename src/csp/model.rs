#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The constraint model: bounded integer variables plus the constraints over
//! them.
//!
//! A [`Model`] is an ordinary owned value. Puzzle encoders build one
//! functionally (declare variables, add constraints) and pass it to
//! [`solve`](crate::csp::solver::solve); nothing in the model mutates once it
//! has been handed over, and independent models share no state.

use crate::csp::constraint::Constraint;
use crate::csp::solver::Assignment;

/// A closed integer interval `[lo, hi]` used as a variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain {
    lo: i32,
    hi: i32,
}

impl Domain {
    /// Creates the domain `[lo, hi]`.
    ///
    /// # Panics
    ///
    /// If `lo > hi` (an empty domain has no satisfiable assignment and is
    /// always a caller bug).
    #[must_use]
    pub fn new(lo: i32, hi: i32) -> Self {
        assert!(lo <= hi, "empty domain [{lo}, {hi}]");
        Self { lo, hi }
    }

    /// The inclusive lower bound.
    #[must_use]
    pub const fn lo(self) -> i32 {
        self.lo
    }

    /// The inclusive upper bound.
    #[must_use]
    pub const fn hi(self) -> i32 {
        self.hi
    }

    /// Number of values in the domain.
    #[must_use]
    pub const fn size(self) -> usize {
        (self.hi as i64 - self.lo as i64 + 1) as usize
    }

    /// Whether `value` lies inside the domain.
    #[must_use]
    pub const fn contains(self, value: i32) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Iterates over the domain values in increasing order.
    pub fn values(self) -> impl Iterator<Item = i32> {
        self.lo..=self.hi
    }
}

/// Handle to a variable declared in a [`Model`].
///
/// Handles are plain indices into the model's variable table, assigned in
/// declaration order. Encoders that need "the i-th queen" keep an ordered
/// `Vec<VarId>` rather than looking anything up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

impl VarId {
    pub(crate) const fn new(index: usize) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self(index as u32)
    }

    /// The position of this variable in its model's declaration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct VarInfo {
    label: String,
    domain: Domain,
}

/// An immutable-once-built set of variables and constraints describing one
/// puzzle instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    vars: Vec<VarInfo>,
    constraints: Vec<Constraint>,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a fresh variable with domain `[lo, hi]` and returns its
    /// handle. The label is kept for diagnostics only; it plays no part in
    /// solving.
    ///
    /// # Panics
    ///
    /// If `lo > hi`.
    pub fn new_var(&mut self, label: impl Into<String>, lo: i32, hi: i32) -> VarId {
        let id = VarId::new(self.vars.len());
        self.vars.push(VarInfo {
            label: label.into(),
            domain: Domain::new(lo, hi),
        });
        id
    }

    /// Number of declared variables.
    #[must_use]
    pub const fn num_vars(&self) -> usize {
        self.vars.len()
    }

    /// The domain `var` was declared with.
    ///
    /// # Panics
    ///
    /// If `var` was not declared in this model.
    #[must_use]
    pub fn domain(&self, var: VarId) -> Domain {
        self.check_declared(var);
        self.vars[var.index()].domain
    }

    /// The diagnostic label `var` was declared with.
    ///
    /// # Panics
    ///
    /// If `var` was not declared in this model.
    #[must_use]
    pub fn label(&self, var: VarId) -> &str {
        self.check_declared(var);
        &self.vars[var.index()].label
    }

    /// The constraints added so far, in insertion order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Requires `a != b`.
    pub fn not_equal(&mut self, a: VarId, b: VarId) {
        self.check_declared(a);
        self.check_declared(b);
        self.constraints.push(Constraint::NotEqual(a, b));
    }

    /// Requires `var != value`.
    pub fn not_equal_const(&mut self, var: VarId, value: i32) {
        self.check_declared(var);
        self.constraints.push(Constraint::NotEqualConst(var, value));
    }

    /// Requires `var == value`.
    pub fn equal_const(&mut self, var: VarId, value: i32) {
        self.check_declared(var);
        self.constraints.push(Constraint::EqualConst(var, value));
    }

    /// Requires all of `vars` to take pairwise-distinct values.
    pub fn all_different(&mut self, vars: &[VarId]) {
        for &v in vars {
            self.check_declared(v);
        }
        self.constraints.push(Constraint::AllDifferent(vars.to_vec()));
    }

    /// Requires `|a - b| != distance`, with the absolute value taken as the
    /// two-way branch `d if d >= 0 else -d`.
    pub fn abs_diff_not_equal(&mut self, a: VarId, b: VarId, distance: i32) {
        self.check_declared(a);
        self.check_declared(b);
        self.constraints.push(Constraint::AbsDiffNotEqual { a, b, distance });
    }

    /// Requires `sum(coefficient * var) == rhs` over the given terms, exact
    /// integer arithmetic.
    pub fn linear_eq(&mut self, terms: &[(i32, VarId)], rhs: i32) {
        for &(_, v) in terms {
            self.check_declared(v);
        }
        self.constraints.push(Constraint::LinearEq {
            terms: terms.to_vec(),
            rhs,
        });
    }

    /// Checks a full assignment against every domain bound and every
    /// constraint in this model. Used by `--verify` and by tests; the solver
    /// itself never calls this.
    #[must_use]
    pub fn check_assignment(&self, assignment: &Assignment) -> bool {
        if assignment.len() != self.vars.len() {
            return false;
        }
        let values = assignment.values();
        let in_domain = self
            .vars
            .iter()
            .zip(values)
            .all(|(info, &value)| info.domain.contains(value));
        in_domain && self.constraints.iter().all(|c| c.satisfied_by(values))
    }

    fn check_declared(&self, var: VarId) {
        assert!(
            var.index() < self.vars.len(),
            "variable #{} was not declared in this model ({} variables)",
            var.index(),
            self.vars.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_bounds_and_size() {
        let d = Domain::new(-2, 5);
        assert_eq!(d.lo(), -2);
        assert_eq!(d.hi(), 5);
        assert_eq!(d.size(), 8);
        assert!(d.contains(-2));
        assert!(d.contains(5));
        assert!(!d.contains(6));
        assert_eq!(d.values().collect::<Vec<_>>(), vec![-2, -1, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_singleton_domain() {
        let d = Domain::new(3, 3);
        assert_eq!(d.size(), 1);
        assert_eq!(d.values().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    #[should_panic(expected = "empty domain")]
    fn test_empty_domain_panics() {
        let _ = Domain::new(1, 0);
    }

    #[test]
    fn test_var_ids_follow_declaration_order() {
        let mut model = Model::new();
        let a = model.new_var("a", 0, 1);
        let b = model.new_var("b", 0, 1);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(model.num_vars(), 2);
        assert_eq!(model.label(b), "b");
        assert_eq!(model.domain(a), Domain::new(0, 1));
    }

    #[test]
    #[should_panic(expected = "was not declared in this model")]
    fn test_foreign_var_rejected() {
        let mut other = Model::new();
        let _ = other.new_var("x", 0, 9);
        let foreign = other.new_var("y", 0, 9);

        let mut model = Model::new();
        let local = model.new_var("a", 0, 9);
        // `foreign` has index 1, `model` only has one variable.
        model.not_equal(local, foreign);
    }

    #[test]
    fn test_constraints_accumulate_in_order() {
        let mut model = Model::new();
        let a = model.new_var("a", 0, 2);
        let b = model.new_var("b", 0, 2);
        model.not_equal(a, b);
        model.equal_const(a, 1);
        model.all_different(&[a, b]);
        assert_eq!(model.constraints().len(), 3);
        assert!(matches!(model.constraints()[1], Constraint::EqualConst(v, 1) if v == a));
    }
}
