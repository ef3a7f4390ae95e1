//! # Pseudo-Boolean Constraints
//!
//! Brute-force encoding of weighted linear constraints with arbitrary integer
//! weights. All `2^n` truth assignments of the `n` input literals are
//! enumerated and every assignment violating the constraint is blocked by a
//! clause negating it. The number of clauses is therefore exponential in the
//! number of literals. No auxiliary variables are introduced.

use super::SignPatterns;
use crate::types::{Clause, Lit, RsHashMap};

/// The maximum number of literals of a pseudo-boolean constraint for which
/// the assignments can be enumerated with a `usize` count
#[must_use]
pub fn max_arity() -> usize {
    usize::BITS as usize - 1
}

/// Counts the assignments of the weighted literals whose weighted sum of true
/// literals makes `blocked` return `true`, without enumerating them. Sums are
/// taken in `i128`, which cannot overflow for up to [`max_arity`] weights.
pub fn n_blocked<F>(lits: &[(Lit, isize)], blocked: F) -> usize
where
    F: Fn(i128) -> bool,
{
    // number of assignments reaching each weighted sum
    let mut sums: RsHashMap<i128, usize> = RsHashMap::default();
    sums.insert(0, 1);
    for &(_, w) in lits {
        let mut next: RsHashMap<i128, usize> = RsHashMap::default();
        for (&sum, &cnt) in &sums {
            *next.entry(sum).or_default() += cnt;
            *next.entry(sum + w as i128).or_default() += cnt;
        }
        sums = next;
    }
    sums.into_iter()
        .filter(|&(sum, _)| blocked(sum))
        .map(|(_, cnt)| cnt)
        .sum()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Relation {
    Eq,
    Geq,
}

/// Lazy clause generator for a weighted linear constraint
///
/// For each literal `l` the two choices `-l` (`l` is true) and `+l` (`l` is
/// false) are enumerated, `-l` first. A combination is blocked if the weighted
/// sum of the literals it sets to true violates the relation; the combination
/// itself is then the blocking clause.
///
/// # Example
///
/// ```
/// use cnfgen::{encodings::pb::BruteForce, lit};
///
/// let lits = [(lit![0], 1), (lit![1], 2), (lit![2], 4)];
/// assert_eq!(BruteForce::geq(&lits, 7).count(), 7);
/// ```
#[derive(Clone, Debug)]
pub struct BruteForce<'a> {
    lits: &'a [(Lit, isize)],
    relation: Relation,
    bound: isize,
    patterns: SignPatterns,
}

impl<'a> BruteForce<'a> {
    /// Clauses enforcing `weighted sum of lits = bound`
    pub fn eq(lits: &'a [(Lit, isize)], bound: isize) -> Self {
        BruteForce {
            lits,
            relation: Relation::Eq,
            bound,
            patterns: SignPatterns::new(lits.len()),
        }
    }

    /// Clauses enforcing `weighted sum of lits >= bound`
    pub fn geq(lits: &'a [(Lit, isize)], bound: isize) -> Self {
        BruteForce {
            lits,
            relation: Relation::Geq,
            bound,
            patterns: SignPatterns::new(lits.len()),
        }
    }
}

impl Iterator for BruteForce<'_> {
    type Item = Clause;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let falsified = self.patterns.current()?;
            let sum: i128 = self
                .lits
                .iter()
                .zip(falsified)
                .filter(|&(_, &f)| !f)
                .map(|(&(_, w), _)| w as i128)
                .sum();
            let blocked = match self.relation {
                Relation::Eq => sum != self.bound as i128,
                Relation::Geq => sum < self.bound as i128,
            };
            let clause = if blocked {
                Some(
                    self.lits
                        .iter()
                        .zip(falsified)
                        .map(|(&(l, _), &f)| if f { l } else { !l })
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
