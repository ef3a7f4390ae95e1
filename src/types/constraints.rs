//! # Constraint Types
//!
//! Different types of constraints. The most basic one is [`Clause`], the
//! others ([`ParityConstr`], [`CardConstraint`] and [`PBConstraint`]) are
//! stored symbolically in a formula and only lowered to clauses when iterated
//! over or written out.

use std::{fmt, ops};

use crate::encodings::{card, parity, pb};

use super::{Assignment, IWLitIter, Lit, LitIter, TernaryVal};

/// Type representing a clause.
/// Wrapper around a std collection to allow for changing the data structure.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Default)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// Creates a new empty clause
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the clause as a slice of literals
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the length of the clause
    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the clause is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Checks whether the clause is satisfied by a given assignment
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        self.iter()
            .any(|&lit| assign.lit_value(lit) == TernaryVal::True)
    }

    /// Gets an iterator over the clause
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.lits.iter()
    }

    /// Adds a literal to the clause
    pub fn add(&mut self, lit: Lit) {
        self.lits.push(lit)
    }
}

impl<const N: usize> From<[Lit; N]> for Clause {
    fn from(value: [Lit; N]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl From<&[Lit]> for Clause {
    fn from(value: &[Lit]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(lits: Vec<Lit>) -> Self {
        Self { lits }
    }
}

impl Extend<Lit> for Clause {
    fn extend<T: IntoIterator<Item = Lit>>(&mut self, iter: T) {
        self.lits.extend(iter)
    }
}

impl ops::Index<usize> for Clause {
    type Output = Lit;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;

    type IntoIter = std::slice::Iter<'a, Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.iter()
    }
}

impl IntoIterator for Clause {
    type Item = Lit;

    type IntoIter = std::vec::IntoIter<Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.into_iter()
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self {
            lits: Vec::from_iter(iter),
        }
    }
}

/// Clauses can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.iter().enumerate() {
            if i != 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", lit)?
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Creates a clause from a list of literals
///
/// # Examples
///
/// ```
/// use cnfgen::{clause, lit};
///
/// let cl = clause![lit![0], !lit![1]];
/// assert_eq!(cl.len(), 2);
/// ```
#[macro_export]
macro_rules! clause {
    ( $($l:expr),* ) => {
        {
            let mut tmp_clause = $crate::types::Clause::new();
            $(
                tmp_clause.add($l);
            )*
            tmp_clause
        }
    };
}

/// A parity constraint: the literals summed modulo two equal `value`
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct ParityConstr {
    lits: Vec<Lit>,
    value: bool,
}

impl ParityConstr {
    /// Gets the literals of the constraint
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the parity value, `true` standing for odd
    pub fn value(&self) -> bool {
        self.value
    }
}

/// An unweighted threshold over a set of literals. The relation is given by
/// the [`CardConstraint`] variant this is wrapped in.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct CardConstr {
    lits: Vec<Lit>,
    b: isize,
}

impl CardConstr {
    /// Gets the literals of the constraint
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the bound of the constraint
    pub fn bound(&self) -> isize {
        self.b
    }
}

/// Type representing a cardinality constraint.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum CardConstraint {
    /// `sum of lits < b`
    LT(CardConstr),
    /// `sum of lits <= b`
    LE(CardConstr),
    /// `sum of lits > b`
    GT(CardConstr),
    /// `sum of lits >= b`
    GE(CardConstr),
    /// `sum of lits = b`
    EQ(CardConstr),
    /// `sum of lits != b`
    NE(CardConstr),
}

impl CardConstraint {
    /// Constructs a new strict upper bound constraint (`sum of lits < b`)
    pub fn new_lt<LI: LitIter>(lits: LI, b: isize) -> Self {
        CardConstraint::LT(CardConstr {
            lits: lits.into_iter().collect(),
            b,
        })
    }

    /// Constructs a new upper bound constraint (`sum of lits <= b`)
    pub fn new_le<LI: LitIter>(lits: LI, b: isize) -> Self {
        CardConstraint::LE(CardConstr {
            lits: lits.into_iter().collect(),
            b,
        })
    }

    /// Constructs a new strict lower bound constraint (`sum of lits > b`)
    pub fn new_gt<LI: LitIter>(lits: LI, b: isize) -> Self {
        CardConstraint::GT(CardConstr {
            lits: lits.into_iter().collect(),
            b,
        })
    }

    /// Constructs a new lower bound constraint (`sum of lits >= b`)
    pub fn new_ge<LI: LitIter>(lits: LI, b: isize) -> Self {
        CardConstraint::GE(CardConstr {
            lits: lits.into_iter().collect(),
            b,
        })
    }

    /// Constructs a new equality constraint (`sum of lits = b`)
    pub fn new_eq<LI: LitIter>(lits: LI, b: isize) -> Self {
        CardConstraint::EQ(CardConstr {
            lits: lits.into_iter().collect(),
            b,
        })
    }

    /// Constructs a new disequality constraint (`sum of lits != b`)
    pub fn new_ne<LI: LitIter>(lits: LI, b: isize) -> Self {
        CardConstraint::NE(CardConstr {
            lits: lits.into_iter().collect(),
            b,
        })
    }

    fn inner(&self) -> &CardConstr {
        match self {
            CardConstraint::LT(constr)
            | CardConstraint::LE(constr)
            | CardConstraint::GT(constr)
            | CardConstraint::GE(constr)
            | CardConstraint::EQ(constr)
            | CardConstraint::NE(constr) => constr,
        }
    }

    /// Gets the literals of the constraint
    pub fn lits(&self) -> &[Lit] {
        &self.inner().lits
    }

    /// Gets the bound of the constraint
    pub fn bound(&self) -> isize {
        self.inner().b
    }

    /// Gets the number of clauses the constraint is lowered to
    ///
    /// # Panics
    ///
    /// If the count does not fit in a `usize`. A
    /// [`Formula`](crate::instances::Formula) rejects such constraints on
    /// insertion.
    pub fn n_clauses(&self) -> usize {
        self.checked_n_clauses()
            .expect("cardinality clause count does not fit in usize")
    }

    /// Gets the number of clauses the constraint is lowered to, or [`None`] if
    /// the count does not fit in a `usize`
    pub fn checked_n_clauses(&self) -> Option<usize> {
        self.n_clauses_over(self.lits().len())
    }

    /// Gets the largest number of literals for which the clause count of a
    /// constraint with this relation and bound fits in a `usize`
    pub fn max_arity(&self) -> usize {
        // the clause count is monotone in the number of literals
        let (mut lo, mut hi) = (0, usize::MAX);
        if self.n_clauses_over(hi).is_some() {
            return hi;
        }
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.n_clauses_over(mid).is_some() {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Clause count of a constraint with the same relation and bound over `n`
    /// literals
    fn n_clauses_over(&self, n: usize) -> Option<usize> {
        match self {
            CardConstraint::LT(constr) => card::n_less(n, constr.b),
            CardConstraint::LE(constr) => card::n_less_or_equal(n, constr.b),
            CardConstraint::GT(constr) => card::n_greater(n, constr.b),
            CardConstraint::GE(constr) => card::n_greater_or_equal(n, constr.b),
            CardConstraint::EQ(constr) => card::n_equal(n, constr.b),
            CardConstraint::NE(constr) => card::n_not_equal(n, constr.b),
        }
    }

    /// Lazily lowers the constraint to clauses
    pub fn clauses(&self) -> card::Clauses<'_> {
        match self {
            CardConstraint::LT(constr) => card::less(&constr.lits, constr.b),
            CardConstraint::LE(constr) => card::less_or_equal(&constr.lits, constr.b),
            CardConstraint::GT(constr) => card::greater(&constr.lits, constr.b),
            CardConstraint::GE(constr) => card::greater_or_equal(&constr.lits, constr.b),
            CardConstraint::EQ(constr) => card::equal(&constr.lits, constr.b),
            CardConstraint::NE(constr) => card::not_equal(&constr.lits, constr.b),
        }
    }

    /// Checks whether the constraint is satisfied by a given assignment
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        let count = self
            .lits()
            .iter()
            .filter(|&&lit| assign.lit_value(lit) == TernaryVal::True)
            .count() as isize;
        match self {
            CardConstraint::LT(constr) => count < constr.b,
            CardConstraint::LE(constr) => count <= constr.b,
            CardConstraint::GT(constr) => count > constr.b,
            CardConstraint::GE(constr) => count >= constr.b,
            CardConstraint::EQ(constr) => count == constr.b,
            CardConstraint::NE(constr) => count != constr.b,
        }
    }
}

/// A weighted linear constraint over literals. The relation is given by the
/// [`PBConstraint`] variant this is wrapped in.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct PBConstr {
    lits: Vec<(Lit, isize)>,
    b: isize,
}

impl PBConstr {
    /// Gets the weighted literals of the constraint
    pub fn lits(&self) -> &[(Lit, isize)] {
        &self.lits
    }

    /// Gets the bound of the constraint
    pub fn bound(&self) -> isize {
        self.b
    }
}

/// Type representing a pseudo-boolean constraint with arbitrary integer
/// weights. Strict and upper bound relations are normalized to
/// [`PBConstraint::GE`] when the constraint is built from a linear operator,
/// see [`crate::instances::LinearOp`].
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum PBConstraint {
    /// `weighted sum of lits >= b`
    GE(PBConstr),
    /// `weighted sum of lits = b`
    EQ(PBConstr),
}

impl PBConstraint {
    /// Constructs a new lower bound pseudo-boolean constraint
    pub fn new_ge<LI: IWLitIter>(lits: LI, b: isize) -> Self {
        PBConstraint::GE(PBConstr {
            lits: lits.into_iter().collect(),
            b,
        })
    }

    /// Constructs a new equality pseudo-boolean constraint
    pub fn new_eq<LI: IWLitIter>(lits: LI, b: isize) -> Self {
        PBConstraint::EQ(PBConstr {
            lits: lits.into_iter().collect(),
            b,
        })
    }

    fn inner(&self) -> &PBConstr {
        match self {
            PBConstraint::GE(constr) | PBConstraint::EQ(constr) => constr,
        }
    }

    /// Gets the weighted literals of the constraint
    pub fn lits(&self) -> &[(Lit, isize)] {
        &self.inner().lits
    }

    /// Gets the bound of the constraint
    pub fn bound(&self) -> isize {
        self.inner().b
    }

    /// Gets the number of clauses the constraint is lowered to. This counts
    /// blocked assignments through their weighted sums without enumerating
    /// the clauses.
    pub fn n_clauses(&self) -> usize {
        match self {
            PBConstraint::GE(constr) => {
                pb::n_blocked(&constr.lits, |sum| sum < constr.b as i128)
            }
            PBConstraint::EQ(constr) => {
                pb::n_blocked(&constr.lits, |sum| sum != constr.b as i128)
            }
        }
    }

    /// Lazily lowers the constraint to clauses
    pub fn clauses(&self) -> pb::BruteForce<'_> {
        match self {
            PBConstraint::GE(constr) => pb::BruteForce::geq(&constr.lits, constr.b),
            PBConstraint::EQ(constr) => pb::BruteForce::eq(&constr.lits, constr.b),
        }
    }

    /// Checks whether the constraint is satisfied by a given assignment
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        let sum: i128 = self
            .lits()
            .iter()
            .filter(|(lit, _)| assign.lit_value(*lit) == TernaryVal::True)
            .map(|&(_, w)| w as i128)
            .sum();
        match self {
            PBConstraint::GE(constr) => sum >= constr.b as i128,
            PBConstraint::EQ(constr) => sum == constr.b as i128,
        }
    }
}

/// A constraint stored in a formula. This is a closed set of kinds, every
/// consumer matches on it exhaustively.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum Constraint {
    /// A single clause
    Clause(Clause),
    /// A parity (XOR) constraint
    Parity(ParityConstr),
    /// An unweighted threshold or equality
    Card(CardConstraint),
    /// A weighted linear constraint
    PB(PBConstraint),
}

impl Constraint {
    /// Constructs a new parity constraint
    pub fn new_parity<LI: LitIter>(lits: LI, value: bool) -> Self {
        Constraint::Parity(ParityConstr {
            lits: lits.into_iter().collect(),
            value,
        })
    }

    /// Gets the number of clauses the constraint is lowered to, without
    /// materializing them
    pub fn n_clauses(&self) -> usize {
        match self {
            Constraint::Clause(_) => 1,
            Constraint::Parity(constr) => parity::n_clauses(constr.lits.len(), constr.value),
            Constraint::Card(constr) => constr.n_clauses(),
            Constraint::PB(constr) => constr.n_clauses(),
        }
    }

    /// Lazily lowers the constraint to clauses. Every call returns a fresh
    /// iterator.
    pub fn clauses(&self) -> Clauses<'_> {
        match self {
            Constraint::Clause(cl) => Clauses::Single(Some(cl)),
            Constraint::Parity(constr) => {
                Clauses::Parity(parity::Parity::new(&constr.lits, constr.value))
            }
            Constraint::Card(constr) => Clauses::Card(constr.clauses()),
            Constraint::PB(constr) => Clauses::PB(constr.clauses()),
        }
    }

    /// Gets an iterator over all literals of the constraint
    pub fn lits(&self) -> Box<dyn Iterator<Item = Lit> + '_> {
        match self {
            Constraint::Clause(cl) => Box::new(cl.iter().copied()),
            Constraint::Parity(constr) => Box::new(constr.lits.iter().copied()),
            Constraint::Card(constr) => Box::new(constr.lits().iter().copied()),
            Constraint::PB(constr) => Box::new(constr.lits().iter().map(|(l, _)| *l)),
        }
    }

    /// Checks whether the constraint is satisfied by a given assignment
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        match self {
            Constraint::Clause(cl) => cl.is_sat(assign),
            Constraint::Parity(constr) => {
                let odd = constr
                    .lits
                    .iter()
                    .filter(|&&lit| assign.lit_value(lit) == TernaryVal::True)
                    .count()
                    % 2
                    == 1;
                odd == constr.value
            }
            Constraint::Card(constr) => constr.is_sat(assign),
            Constraint::PB(constr) => constr.is_sat(assign),
        }
    }
}

impl From<Clause> for Constraint {
    fn from(value: Clause) -> Self {
        Constraint::Clause(value)
    }
}

impl From<CardConstraint> for Constraint {
    fn from(value: CardConstraint) -> Self {
        Constraint::Card(value)
    }
}

impl From<PBConstraint> for Constraint {
    fn from(value: PBConstraint) -> Self {
        Constraint::PB(value)
    }
}

/// Lazy clause iterator of a [`Constraint`]
pub enum Clauses<'a> {
    /// The constraint is a clause already
    Single(Option<&'a Clause>),
    /// Expansion of a parity constraint
    Parity(parity::Parity<'a>),
    /// Expansion of a cardinality constraint
    Card(card::Clauses<'a>),
    /// Expansion of a pseudo-boolean constraint
    PB(pb::BruteForce<'a>),
}

impl Iterator for Clauses<'_> {
    type Item = Clause;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Clauses::Single(cl) => cl.take().cloned(),
            Clauses::Parity(iter) => iter.next(),
            Clauses::Card(iter) => iter.next(),
            Clauses::PB(iter) => iter.next(),
        }
    }
}
