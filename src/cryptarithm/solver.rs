use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::csp::model::{Model, VarId};
use crate::csp::solver::{Assignment, Outcome, SolveError, solve};

/// A verbal-arithmetic puzzle: addend words summing to a total word, one
/// digit per distinct letter.
///
/// The usual rules apply. Distinct letters take distinct digits, and the
/// leading letter of any word longer than one digit is nonzero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cryptarithm {
    addends: Vec<String>,
    total: String,
    letters: Vec<char>,
}

impl Cryptarithm {
    /// Builds a puzzle from its words. Case is normalized, so `two` and
    /// `TWO` are the same word.
    ///
    /// # Panics
    ///
    /// If there are no addends, any word is empty or contains a non-letter,
    /// the words use more than ten distinct letters, or the total has fewer
    /// digits than some addend (the sum of nonnegative numbers can never
    /// lose digits).
    #[must_use]
    pub fn new(addends: &[&str], total: &str) -> Self {
        assert!(!addends.is_empty(), "a puzzle needs at least one addend");
        let addends: Vec<String> = addends.iter().map(|w| validate_word(w)).collect();
        let total = validate_word(total);
        for word in &addends {
            assert!(
                word.len() <= total.len(),
                "the total {total} has fewer digits than addend {word}"
            );
        }

        let mut letters = Vec::new();
        for word in addends.iter().chain(std::iter::once(&total)) {
            for letter in word.chars() {
                if !letters.contains(&letter) {
                    letters.push(letter);
                }
            }
        }
        assert!(
            letters.len() <= 10,
            "the puzzle uses {} distinct letters, only 10 digits exist",
            letters.len()
        );

        Self {
            addends,
            total,
            letters,
        }
    }

    /// Parses the `ADDEND+ADDEND=TOTAL` form, ignoring whitespace around
    /// words.
    ///
    /// # Panics
    ///
    /// If the text has no `=`, or any word fails the checks of
    /// [`new`](Self::new).
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let (lhs, total) = text
            .split_once('=')
            .unwrap_or_else(|| panic!("expected ADDEND+ADDEND=TOTAL, got {text}"));
        let addends: Vec<&str> = lhs.split('+').map(str::trim).collect();
        Self::new(&addends, total.trim())
    }

    /// The addend words, normalized to uppercase.
    pub fn addends(&self) -> impl Iterator<Item = &str> {
        self.addends.iter().map(String::as_str)
    }

    /// The total word, normalized to uppercase.
    #[must_use]
    pub fn total(&self) -> &str {
        &self.total
    }

    /// The distinct letters in first-appearance order, addends before
    /// total.
    #[must_use]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Builds the constraint model.
    ///
    /// Each letter becomes a digit variable on `0..=9`, one all-different
    /// spans the lot, and the leading letter of every multi-digit word is
    /// forbidden from being zero. The addition is decomposed column by
    /// column, least significant first: each column's digits plus the
    /// incoming carry equal the total's digit plus ten times the outgoing
    /// carry, and the carry out of the last column is zero because no
    /// column is left to absorb it.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn to_model(&self) -> (Model, FxHashMap<char, VarId>) {
        let mut model = Model::new();

        let leading: FxHashSet<char> = self
            .addends
            .iter()
            .chain(std::iter::once(&self.total))
            .filter(|word| word.len() > 1)
            .filter_map(|word| word.chars().next())
            .collect();

        let mut letter_vars = FxHashMap::default();
        for &letter in &self.letters {
            letter_vars.insert(letter, model.new_var(letter.to_string(), 0, 9));
        }
        let all: Vec<VarId> = self.letters.iter().map(|l| letter_vars[l]).collect();
        model.all_different(&all);
        for &letter in &self.letters {
            if leading.contains(&letter) {
                model.not_equal_const(letter_vars[&letter], 0);
            }
        }

        let width = self.total.len();
        let carry_max = self.addends.len() as i32 - 1;
        let carries: Vec<VarId> = (1..width)
            .map(|j| model.new_var(format!("carry{j}"), 0, carry_max))
            .collect();

        let addend_letters: Vec<Vec<char>> =
            self.addends.iter().map(|w| w.chars().collect()).collect();
        let total_letters: Vec<char> = self.total.chars().collect();

        for column in 0..width {
            let mut terms: Vec<(i32, VarId)> = Vec::new();
            for letters in &addend_letters {
                if column < letters.len() {
                    terms.push((1, letter_vars[&letters[letters.len() - 1 - column]]));
                }
            }
            if column > 0 {
                terms.push((1, carries[column - 1]));
            }
            terms.push((-1, letter_vars[&total_letters[width - 1 - column]]));
            if column + 1 < width {
                terms.push((-10, carries[column]));
            }
            model.linear_eq(&terms, 0);
        }

        (model, letter_vars)
    }

    /// Reads a satisfying assignment back into a digit per letter.
    ///
    /// # Panics
    ///
    /// If `letter_vars` does not cover this puzzle's letters, or the
    /// assignment belongs to a different model than the one built by
    /// [`to_model`](Self::to_model).
    #[must_use]
    pub fn decode_solution(
        &self,
        letter_vars: &FxHashMap<char, VarId>,
        assignment: &Assignment,
    ) -> Solution {
        let digits: Vec<(char, i32)> = self
            .letters
            .iter()
            .map(|&letter| (letter, assignment.value(letter_vars[&letter])))
            .collect();
        let value = |word: &str| {
            word.chars().fold(0_i64, |acc, letter| {
                acc * 10 + i64::from(assignment.value(letter_vars[&letter]))
            })
        };
        Solution {
            addends: self
                .addends
                .iter()
                .map(|word| (word.clone(), value(word)))
                .collect(),
            total: (self.total.clone(), value(&self.total)),
            digits,
        }
    }

    /// Solves the puzzle. `None` means no digit assignment makes the sum
    /// work.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] when the external solver fails to reach a
    /// conclusion.
    pub fn solve(&self) -> Result<Option<Solution>, SolveError> {
        let (model, letter_vars) = self.to_model();
        match solve(&model)? {
            Outcome::Satisfiable(assignment) => {
                Ok(Some(self.decode_solution(&letter_vars, &assignment)))
            }
            Outcome::Unsatisfiable => Ok(None),
        }
    }
}

fn validate_word(word: &str) -> String {
    assert!(!word.is_empty(), "words must not be empty");
    let upper = word.to_ascii_uppercase();
    for letter in upper.chars() {
        assert!(
            letter.is_ascii_uppercase(),
            "word {word} contains non-letter {letter}"
        );
    }
    upper
}

/// A solved puzzle: the digit of every letter plus the numeric value of
/// every word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    addends: Vec<(String, i64)>,
    total: (String, i64),
    digits: Vec<(char, i32)>,
}

impl Solution {
    /// The digit assigned to `letter`, if the puzzle uses it.
    #[must_use]
    pub fn digit(&self, letter: char) -> Option<i32> {
        self.digits
            .iter()
            .find(|&&(l, _)| l == letter)
            .map(|&(_, digit)| digit)
    }

    /// Iterates over `(letter, digit)` pairs in first-appearance order.
    pub fn digits(&self) -> impl Iterator<Item = (char, i32)> {
        self.digits.iter().copied()
    }

    /// The numeric value of `word` under this solution, or `None` if the
    /// word uses a letter the puzzle does not.
    #[must_use]
    pub fn value(&self, word: &str) -> Option<i64> {
        word.chars().try_fold(0_i64, |acc, letter| {
            self.digit(letter).map(|digit| acc * 10 + i64::from(digit))
        })
    }
}

impl fmt::Display for Solution {
    /// Renders the solved sum in column-addition layout, units aligned on
    /// the right.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.total.0.len();
        for (i, (_, value)) in self.addends.iter().enumerate() {
            if i + 1 == self.addends.len() {
                writeln!(f, "+ {value:>width$}")?;
            } else {
                writeln!(f, "  {value:>width$}")?;
            }
        }
        writeln!(f, "{}", "-".repeat(width + 2))?;
        write!(f, "  {:>width$}", self.total.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_parse_splits_addends_from_total() {
        let puzzle = Cryptarithm::parse("TWO+TWO=FOUR");
        assert_eq!(puzzle.addends().collect::<Vec<_>>(), vec!["TWO", "TWO"]);
        assert_eq!(puzzle.total(), "FOUR");
        assert_eq!(puzzle.letters(), &['T', 'W', 'O', 'F', 'U', 'R']);
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let puzzle = Cryptarithm::parse("two + two = four");
        assert_eq!(puzzle.total(), "FOUR");
        assert_eq!(puzzle.addends().collect::<Vec<_>>(), vec!["TWO", "TWO"]);
    }

    #[test]
    fn test_two_plus_two_satisfies_the_identity() {
        let puzzle = Cryptarithm::parse("TWO+TWO=FOUR");
        let solution = puzzle.solve().unwrap().expect("TWO+TWO=FOUR is solvable");
        let two = solution.value("TWO").unwrap();
        let four = solution.value("FOUR").unwrap();
        assert_eq!(two + two, four);
        assert!(solution.digit('T').unwrap() >= 1);
        assert!(solution.digit('F').unwrap() >= 1);
        assert!(solution.digits().map(|(_, d)| d).all_unique());
    }

    #[test]
    fn test_send_more_money_has_the_classic_solution() {
        let puzzle = Cryptarithm::parse("SEND+MORE=MONEY");
        let solution = puzzle.solve().unwrap().expect("a classic, solvable");
        let expected = [
            ('S', 9),
            ('E', 5),
            ('N', 6),
            ('D', 7),
            ('M', 1),
            ('O', 0),
            ('R', 8),
            ('Y', 2),
        ];
        for (letter, digit) in expected {
            assert_eq!(solution.digit(letter), Some(digit), "wrong digit for {letter}");
        }
        assert_eq!(solution.value("MONEY"), Some(10652));
    }

    #[test]
    fn test_doubling_cannot_triple_the_digits() {
        assert_eq!(Cryptarithm::parse("A+A=AAA").solve().unwrap(), None);
    }

    #[test]
    fn test_value_of_foreign_word_is_none() {
        let puzzle = Cryptarithm::parse("A+B=C");
        let solution = puzzle.solve().unwrap().unwrap();
        assert_eq!(solution.value("XYZ"), None);
    }

    #[test]
    #[should_panic(expected = "expected ADDEND+ADDEND=TOTAL")]
    fn test_missing_total_rejected() {
        let _ = Cryptarithm::parse("TWO+TWO");
    }

    #[test]
    #[should_panic(expected = "only 10 digits exist")]
    fn test_too_many_letters_rejected() {
        let _ = Cryptarithm::new(&["ABCDE", "FGHIJ"], "KLMNO");
    }

    #[test]
    #[should_panic(expected = "fewer digits than addend")]
    fn test_shrinking_total_rejected() {
        let _ = Cryptarithm::new(&["ABC"], "AB");
    }

    #[test]
    #[should_panic(expected = "contains non-letter")]
    fn test_digits_in_words_rejected() {
        let _ = Cryptarithm::new(&["T2O", "TWO"], "FOUR");
    }

    #[test]
    #[should_panic(expected = "at least one addend")]
    fn test_no_addends_rejected() {
        let _ = Cryptarithm::new(&[], "FOUR");
    }

    #[test]
    #[should_panic(expected = "words must not be empty")]
    fn test_empty_addend_rejected() {
        let _ = Cryptarithm::parse("+TWO=FOUR");
    }

    #[test]
    fn test_display_lays_out_the_columns() {
        let puzzle = Cryptarithm::parse("SEND+MORE=MONEY");
        let solution = puzzle.solve().unwrap().unwrap();
        let expected = "   9567
+  1085
-------
  10652";
        assert_eq!(solution.to_string(), expected);
    }
}
