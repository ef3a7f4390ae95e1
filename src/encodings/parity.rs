//! # Parity Constraints
//!
//! A parity constraint over `n` literals is encoded by blocking every sign
//! assignment of the wrong parity, giving `2^(n-1)` clauses of full width for
//! `n >= 1`. Over zero literals the constraint is either trivially true (no
//! clause) or a contradiction (the empty clause).

use super::SignPatterns;
use crate::types::{Clause, Lit};

/// Gets the number of clauses of the parity encoding over `n` literals
///
/// # Panics
///
/// If `2^(n-1)` does not fit in a `usize`. [`crate::instances::Formula`]
/// rejects such constraints on insertion.
#[must_use]
pub fn n_clauses(n: usize, value: bool) -> usize {
    if n == 0 {
        return usize::from(value);
    }
    assert!(n <= max_arity(), "parity constraint too wide to count");
    1 << (n - 1)
}

/// The maximum number of literals of a parity constraint whose clause count
/// fits in a `usize`
#[must_use]
pub fn max_arity() -> usize {
    usize::BITS as usize
}

/// Lazy clause generator for a parity constraint
///
/// For each literal the two signs `+var` and `-var` are enumerated (positive
/// first) and every combination whose number of negative signs has a parity
/// different from the target, adjusted by the number of negated input
/// literals, is a clause.
///
/// # Example
///
/// ```
/// use cnfgen::{clause, encodings::parity::Parity, lit};
///
/// let lits = [lit![0], lit![1]];
/// let cls: Vec<_> = Parity::new(&lits, true).collect();
/// assert_eq!(cls, vec![clause![lit![0], lit![1]], clause![!lit![0], !lit![1]]]);
/// ```
#[derive(Clone, Debug)]
pub struct Parity<'a> {
    lits: &'a [Lit],
    /// Parity of the number of negative signs in blocked combinations
    blocked_odd: bool,
    patterns: SignPatterns,
}

impl<'a> Parity<'a> {
    /// Creates the generator for `lits` summing to `value` modulo two
    pub fn new(lits: &'a [Lit], value: bool) -> Self {
        let n_neg = lits.iter().filter(|l| l.is_neg()).count();
        let target = value ^ (n_neg % 2 == 1);
        Parity {
            lits,
            blocked_odd: !target,
            patterns: SignPatterns::new(lits.len()),
        }
    }
}

impl Iterator for Parity<'_> {
    type Item = Clause;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let signs = self.patterns.current()?;
            let odd = signs.iter().filter(|&&neg| neg).count() % 2 == 1;
            let clause = if odd == self.blocked_odd {
                Some(
                    self.lits
                        .iter()
                        .zip(signs)
                        .map(|(lit, &neg)| lit.var().lit(!neg))
                        .collect(),
                )
            } else {
                None
            };
            self.patterns.advance();
            if clause.is_some() {
                return clause;
            }
        }
    }
}
