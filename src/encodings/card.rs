//! # Cardinality Constraints
//!
//! Exact blocking encodings of the threshold family. All shapes reduce to two
//! primitives:
//!
//! - `less(t)`: every size-`t` subset of the literals may not be all true,
//!   giving `C(n, t)` clauses of negated literals for `0 < t <= n`, the empty
//!   clause for `t <= 0` and no clause for `t > n`.
//! - `greater(t)`: every size-`(n-t)` subset of the literals may not be all
//!   false, giving `C(n, n-t)` clauses for `0 <= t < n`, the empty clause for
//!   `t >= n` and no clause for `t < 0`.
//!
//! The other shapes are derived: `leq(t) = less(t+1)`, `geq(t) = greater(t-1)`
//! and `eq(t)` is `leq(t)` followed by `geq(t)`. The disequality `neq(t)`
//! blocks every assignment with exactly `t` true literals, one clause over
//! all literals per size-`t` subset.

use itertools::{Combinations, Itertools};

use crate::{
    types::{Clause, Lit},
    utils::checked_binomial,
};

/// Lazy clause generator for a single blocking primitive
#[derive(Clone, Debug)]
pub struct Blocking<'a> {
    inner: BlockingInt<'a>,
}

#[derive(Clone, Debug)]
enum BlockingInt<'a> {
    /// No clause
    Nothing,
    /// The empty clause, not yet returned
    Contradiction,
    /// All subsets of a given size
    Subsets {
        combinations: Combinations<std::slice::Iter<'a, Lit>>,
        negate: bool,
    },
    /// For every subset of a given size, the clause that is false exactly
    /// when the subset is the set of true literals
    Exact {
        lits: &'a [Lit],
        combinations: Combinations<std::ops::Range<usize>>,
    },
}

impl<'a> Blocking<'a> {
    fn subsets(lits: &'a [Lit], size: usize, negate: bool) -> Self {
        Blocking {
            inner: BlockingInt::Subsets {
                combinations: lits.iter().combinations(size),
                negate,
            },
        }
    }

    fn exact(lits: &'a [Lit], size: usize) -> Self {
        Blocking {
            inner: BlockingInt::Exact {
                lits,
                combinations: (0..lits.len()).combinations(size),
            },
        }
    }

    fn nothing() -> Self {
        Blocking {
            inner: BlockingInt::Nothing,
        }
    }

    fn contradiction() -> Self {
        Blocking {
            inner: BlockingInt::Contradiction,
        }
    }
}

impl Iterator for Blocking<'_> {
    type Item = Clause;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.inner, BlockingInt::Contradiction) {
            self.inner = BlockingInt::Nothing;
            return Some(Clause::new());
        }
        match &mut self.inner {
            BlockingInt::Nothing | BlockingInt::Contradiction => None,
            BlockingInt::Subsets {
                combinations,
                negate,
            } => {
                let negate = *negate;
                combinations.next().map(|subset| {
                    subset
                        .into_iter()
                        .map(|&l| if negate { !l } else { l })
                        .collect()
                })
            }
            BlockingInt::Exact { lits, combinations } => combinations.next().map(|subset| {
                lits.iter()
                    .enumerate()
                    .map(|(idx, &l)| if subset.contains(&idx) { !l } else { l })
                    .collect()
            }),
        }
    }
}

/// Lazy clause generator for any cardinality constraint
pub type Clauses<'a> = std::iter::Chain<Blocking<'a>, Blocking<'a>>;

/// Clauses enforcing `sum of lits < t`
#[must_use]
pub fn less(lits: &[Lit], t: isize) -> Clauses<'_> {
    less_primitive(lits, t).chain(Blocking::nothing())
}

/// Clauses enforcing `sum of lits <= t`
#[must_use]
pub fn less_or_equal(lits: &[Lit], t: isize) -> Clauses<'_> {
    less(lits, t.saturating_add(1))
}

/// Clauses enforcing `sum of lits > t`
#[must_use]
pub fn greater(lits: &[Lit], t: isize) -> Clauses<'_> {
    greater_primitive(lits, t).chain(Blocking::nothing())
}

/// Clauses enforcing `sum of lits >= t`
#[must_use]
pub fn greater_or_equal(lits: &[Lit], t: isize) -> Clauses<'_> {
    greater(lits, t.saturating_sub(1))
}

/// Clauses enforcing `sum of lits = t`: the clauses of `leq(t)` followed by
/// the ones of `geq(t)`
#[must_use]
pub fn equal(lits: &[Lit], t: isize) -> Clauses<'_> {
    less_primitive(lits, t.saturating_add(1)).chain(greater_primitive(lits, t.saturating_sub(1)))
}

/// Clauses enforcing `sum of lits != t`
#[must_use]
pub fn not_equal(lits: &[Lit], t: isize) -> Clauses<'_> {
    let exact = match usize::try_from(t) {
        Ok(t) if t <= lits.len() => Blocking::exact(lits, t),
        _ => Blocking::nothing(),
    };
    exact.chain(Blocking::nothing())
}

fn less_primitive(lits: &[Lit], t: isize) -> Blocking<'_> {
    if t <= 0 {
        return Blocking::contradiction();
    }
    let t = t.unsigned_abs();
    if t > lits.len() {
        return Blocking::nothing();
    }
    Blocking::subsets(lits, t, true)
}

fn greater_primitive(lits: &[Lit], t: isize) -> Blocking<'_> {
    if t < 0 {
        return Blocking::nothing();
    }
    let t = t.unsigned_abs();
    if t >= lits.len() {
        return Blocking::contradiction();
    }
    Blocking::subsets(lits, lits.len() - t, false)
}

/// Number of clauses of [`less`] over `n` literals, or [`None`] if the count
/// does not fit in a `usize`
#[must_use]
pub fn n_less(n: usize, t: isize) -> Option<usize> {
    if t <= 0 {
        return Some(1);
    }
    checked_binomial(n, t.unsigned_abs())
}

/// Number of clauses of [`less_or_equal`] over `n` literals
#[must_use]
pub fn n_less_or_equal(n: usize, t: isize) -> Option<usize> {
    n_less(n, t.saturating_add(1))
}

/// Number of clauses of [`greater`] over `n` literals, or [`None`] if the
/// count does not fit in a `usize`
#[must_use]
pub fn n_greater(n: usize, t: isize) -> Option<usize> {
    if t < 0 {
        return Some(0);
    }
    let t = t.unsigned_abs();
    if t >= n {
        return Some(1);
    }
    checked_binomial(n, n - t)
}

/// Number of clauses of [`greater_or_equal`] over `n` literals
#[must_use]
pub fn n_greater_or_equal(n: usize, t: isize) -> Option<usize> {
    n_greater(n, t.saturating_sub(1))
}

/// Number of clauses of [`equal`] over `n` literals
#[must_use]
pub fn n_equal(n: usize, t: isize) -> Option<usize> {
    n_less_or_equal(n, t)?.checked_add(n_greater_or_equal(n, t)?)
}

/// Number of clauses of [`not_equal`] over `n` literals
#[must_use]
pub fn n_not_equal(n: usize, t: isize) -> Option<usize> {
    match usize::try_from(t) {
        Ok(t) => checked_binomial(n, t),
        Err(_) => Some(0),
    }
}
