#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The constraint vocabulary shared by every puzzle encoder.

use itertools::Itertools;

use crate::csp::model::VarId;

/// A single constraint over variables of a
/// [`Model`](crate::csp::model::Model).
///
/// The set is deliberately small: these six shapes are exactly what the four
/// puzzles need, and each has a direct clause-level encoding in
/// [`encode`](crate::csp::encode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The two variables take different values.
    NotEqual(VarId, VarId),
    /// The variable avoids one concrete value.
    NotEqualConst(VarId, i32),
    /// The variable is pinned to one concrete value.
    EqualConst(VarId, i32),
    /// All listed variables take pairwise-distinct values.
    AllDifferent(Vec<VarId>),
    /// `|a - b| != distance`. Used for queen diagonals, where `distance` is
    /// the row gap between two columns.
    AbsDiffNotEqual {
        /// Left-hand variable.
        a: VarId,
        /// Right-hand variable.
        b: VarId,
        /// The forbidden absolute difference.
        distance: i32,
    },
    /// `sum(coefficient * variable) == rhs` in exact integer arithmetic.
    LinearEq {
        /// `(coefficient, variable)` pairs, summed left to right.
        terms: Vec<(i32, VarId)>,
        /// The required total.
        rhs: i32,
    },
}

impl Constraint {
    /// Evaluates this constraint against a full assignment, where
    /// `values[i]` is the value of the variable with index `i`.
    ///
    /// # Panics
    ///
    /// If the constraint mentions a variable index outside `values`. Models
    /// reject such constraints at insertion, so this fires only on an
    /// assignment for the wrong model.
    #[must_use]
    pub fn satisfied_by(&self, values: &[i32]) -> bool {
        match self {
            Self::NotEqual(a, b) => values[a.index()] != values[b.index()],
            Self::NotEqualConst(v, c) => values[v.index()] != *c,
            Self::EqualConst(v, c) => values[v.index()] == *c,
            Self::AllDifferent(vars) => vars
                .iter()
                .tuple_combinations()
                .all(|(a, b)| values[a.index()] != values[b.index()]),
            Self::AbsDiffNotEqual { a, b, distance } => {
                abs_diff(values[a.index()], values[b.index()]) != *distance
            }
            Self::LinearEq { terms, rhs } => {
                let sum: i64 = terms
                    .iter()
                    .map(|&(c, v)| i64::from(c) * i64::from(values[v.index()]))
                    .sum();
                sum == i64::from(*rhs)
            }
        }
    }
}

/// `|a - b|` as a two-way branch on the sign of the difference.
pub(crate) const fn abs_diff(a: i32, b: i32) -> i32 {
    let d = a - b;
    if d >= 0 { d } else { -d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::model::Model;

    fn three_vars() -> (Model, VarId, VarId, VarId) {
        let mut model = Model::new();
        let a = model.new_var("a", 0, 9);
        let b = model.new_var("b", 0, 9);
        let c = model.new_var("c", 0, 9);
        (model, a, b, c)
    }

    #[test]
    fn test_not_equal() {
        let (_, a, b, _) = three_vars();
        let constraint = Constraint::NotEqual(a, b);
        assert!(constraint.satisfied_by(&[1, 2, 0]));
        assert!(!constraint.satisfied_by(&[4, 4, 0]));
    }

    #[test]
    fn test_const_comparisons() {
        let (_, a, _, _) = three_vars();
        assert!(Constraint::EqualConst(a, 7).satisfied_by(&[7, 0, 0]));
        assert!(!Constraint::EqualConst(a, 7).satisfied_by(&[6, 0, 0]));
        assert!(Constraint::NotEqualConst(a, 7).satisfied_by(&[6, 0, 0]));
        assert!(!Constraint::NotEqualConst(a, 7).satisfied_by(&[7, 0, 0]));
    }

    #[test]
    fn test_all_different() {
        let (_, a, b, c) = three_vars();
        let constraint = Constraint::AllDifferent(vec![a, b, c]);
        assert!(constraint.satisfied_by(&[1, 2, 3]));
        assert!(!constraint.satisfied_by(&[1, 2, 1]));
    }

    #[test]
    fn test_abs_diff_is_symmetric() {
        let (_, a, b, _) = three_vars();
        let constraint = Constraint::AbsDiffNotEqual { a, b, distance: 2 };
        assert!(!constraint.satisfied_by(&[1, 3, 0]));
        assert!(!constraint.satisfied_by(&[3, 1, 0]));
        assert!(constraint.satisfied_by(&[3, 2, 0]));
    }

    #[test]
    fn test_abs_diff_helper_branches() {
        assert_eq!(abs_diff(5, 2), 3);
        assert_eq!(abs_diff(2, 5), 3);
        assert_eq!(abs_diff(4, 4), 0);
    }

    #[test]
    fn test_linear_eq_with_coefficients() {
        let (_, a, b, c) = three_vars();
        // 100a + 10b + c == 123
        let constraint = Constraint::LinearEq {
            terms: vec![(100, a), (10, b), (1, c)],
            rhs: 123,
        };
        assert!(constraint.satisfied_by(&[1, 2, 3]));
        assert!(!constraint.satisfied_by(&[1, 2, 4]));
    }

    #[test]
    fn test_linear_eq_empty_sum() {
        let constraint = Constraint::LinearEq {
            terms: vec![],
            rhs: 0,
        };
        assert!(constraint.satisfied_by(&[]));
        let constraint = Constraint::LinearEq {
            terms: vec![],
            rhs: 1,
        };
        assert!(!constraint.satisfied_by(&[]));
    }
}
