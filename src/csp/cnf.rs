//! Clause storage in DIMACS conventions: variables are positive integers,
//! a negative literal is negation, `0` never appears inside a clause.

use std::fmt;

use smallvec::SmallVec;

/// One disjunction of literals. Almost every clause produced here is a unit,
/// a pair, or a ternary, so the inline capacity covers the common case.
pub type Clause = SmallVec<[i32; 4]>;

/// A conjunction of clauses over `1..=num_vars`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf {
    /// The clauses, in the order they were added.
    pub clauses: Vec<Clause>,
    /// Highest variable index mentioned by any clause.
    pub num_vars: usize,
}

impl Cnf {
    /// Creates an empty formula.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one clause. `num_vars` grows to cover every literal seen.
    pub fn add_clause(&mut self, literals: impl IntoIterator<Item = i32>) {
        let clause: Clause = literals.into_iter().collect();
        for &lit in &clause {
            debug_assert_ne!(lit, 0, "0 terminates a DIMACS clause, it is not a literal");
            self.num_vars = self.num_vars.max(lit.unsigned_abs() as usize);
        }
        self.clauses.push(clause);
    }

    /// Total number of literal occurrences across all clauses.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(SmallVec::len).sum()
    }

    /// Whether the formula contains an empty clause and is therefore
    /// unsatisfiable without any search.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(|c| c.is_empty())
    }

    /// Copies the clauses into the owned nested-`Vec` shape the external
    /// solver ingests.
    #[must_use]
    pub fn to_dimacs_clauses(&self) -> Vec<Vec<i32>> {
        self.clauses.iter().map(|c| c.to_vec()).collect()
    }
}

impl fmt::Display for Cnf {
    /// Renders the formula in DIMACS CNF format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(f, "{lit} ")?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_vars_tracks_largest_literal() {
        let mut cnf = Cnf::new();
        cnf.add_clause([1, -2]);
        assert_eq!(cnf.num_vars, 2);
        cnf.add_clause([-7]);
        assert_eq!(cnf.num_vars, 7);
        cnf.add_clause([3, 4]);
        assert_eq!(cnf.num_vars, 7);
        assert_eq!(cnf.clauses.len(), 3);
        assert_eq!(cnf.literal_count(), 5);
    }

    #[test]
    fn test_empty_clause_detection() {
        let mut cnf = Cnf::new();
        cnf.add_clause([1, 2]);
        assert!(!cnf.has_empty_clause());
        cnf.add_clause(std::iter::empty());
        assert!(cnf.has_empty_clause());
    }

    #[test]
    fn test_dimacs_rendering() {
        let mut cnf = Cnf::new();
        cnf.add_clause([1, -3]);
        cnf.add_clause([2]);
        assert_eq!(cnf.to_string(), "p cnf 3 2\n1 -3 0\n2 0\n");
    }

    #[test]
    fn test_to_dimacs_clauses_preserves_order() {
        let mut cnf = Cnf::new();
        cnf.add_clause([-1, 2]);
        cnf.add_clause([3]);
        assert_eq!(cnf.to_dimacs_clauses(), vec![vec![-1, 2], vec![3]]);
    }
}
