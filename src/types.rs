//! # Common Types for Formula Generation
//!
//! Common types used throughout the library to guarantee type safety.

use std::{fmt, ops};

use thiserror::Error;

pub mod constraints;
pub use constraints::{Clause, Constraint};

/// The hash map to use throughout the library
#[cfg(feature = "fxhash")]
pub type RsHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fxhash"))]
pub type RsHashMap<K, V> = std::collections::HashMap<K, V>;

/// The hash set to use throughout the library
#[cfg(feature = "fxhash")]
pub type RsHashSet<V> = rustc_hash::FxHashSet<V>;
#[cfg(not(feature = "fxhash"))]
pub type RsHashSet<V> = std::collections::HashSet<V>;

/// Type representing boolean variables of a formula. Variable indexing
/// internally starts from 0 and the maximum index is `(u32::MAX - 1) / 2`. In
/// all textual output formats a variable is shown with index `idx + 1`, so
/// that the index 0 stays reserved.
#[derive(Hash, Eq, PartialEq, PartialOrd, Clone, Copy, Ord, Debug)]
#[repr(transparent)]
pub struct Var {
    idx: u32,
}

impl Var {
    /// The maximum index that can be represented.
    pub const MAX_IDX: u32 = (u32::MAX - 1) / 2;

    /// Creates a new variables with a given index.
    /// Indices start from 0.
    /// Panics if `idx > Var::MAX_IDX`.
    pub fn new(idx: u32) -> Var {
        if idx > Var::MAX_IDX {
            panic!("variable index too high")
        }
        Var { idx }
    }

    /// Creates a new variables with a given index.
    /// Indices start from 0.
    /// Returns `Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX)` if
    /// `idx > Var::MAX_IDX`.
    pub fn new_with_error(idx: u32) -> Result<Var, TypeError> {
        if idx > Var::MAX_IDX {
            return Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX));
        }
        Ok(Var { idx })
    }

    /// Creates a new variables with a given index.
    /// Does not perform any check on the index, only use this if you are sure
    /// that `idx <= Var::MAX_IDX`.
    #[inline]
    pub fn new_unchecked(idx: u32) -> Var {
        Var { idx }
    }

    /// Creates a literal that is not negated.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::types::{Var,Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::positive(5);
    ///
    /// assert_eq!(lit, var.pos_lit());
    /// ```
    #[inline]
    pub fn pos_lit(self) -> Lit {
        Lit::new_unchecked(self.idx, false)
    }

    /// Creates a negated literal.
    #[inline]
    pub fn neg_lit(self) -> Lit {
        Lit::new_unchecked(self.idx, true)
    }

    /// Creates a literal with the given polarity, `true` being the positive
    /// literal. This matches the `(polarity, name)` convention of named
    /// literals.
    #[inline]
    pub fn lit(self, polarity: bool) -> Lit {
        Lit::new_unchecked(self.idx, !polarity)
    }

    /// Returns the index of the variable as a `usize` for indexing data
    /// structures.
    #[inline]
    pub fn idx(&self) -> usize {
        self.idx as usize
    }

    /// Returns the 32 bit index of the variable.
    #[inline]
    pub fn idx32(&self) -> u32 {
        self.idx
    }

    /// Converts the variable to its index in DIMACS and OPB files, which is
    /// `idx + 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::types::Var;
    ///
    /// assert_eq!(Var::new(0).to_dimacs(), 1);
    /// ```
    #[inline]
    pub fn to_dimacs(self) -> u32 {
        self.idx + 1
    }
}

/// Variables can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.to_dimacs())
    }
}

/// More easily creates variables. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use cnfgen::{var, types::Var};
///
/// assert_eq!(var![42], Var::new(42));
/// ```
#[macro_export]
macro_rules! var {
    ($v:expr) => {
        $crate::types::Var::new($v)
    };
}

/// Type representing literals, possibly negated boolean variables.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug)]
#[repr(transparent)]
pub struct Lit {
    /// Literal representation is `idx << 1` with the last bit representing
    /// whether the literal is negated or not.
    lidx: u32,
}

impl Lit {
    /// Represents a literal in memory
    #[inline]
    fn represent(idx: u32, negated: bool) -> u32 {
        (idx << 1) + (negated as u32)
    }

    /// Creates a new (negated or not) literal with a given index.
    /// Panics if `idx > Var::MAX_IDX`.
    pub fn new(idx: u32, negated: bool) -> Lit {
        if idx > Var::MAX_IDX {
            panic!("variable index too high")
        }
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    /// Creates a new (negated or not) literal with a given index.
    /// Returns `Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX)` if
    /// `idx > Var::MAX_IDX`.
    pub fn new_with_error(idx: u32, negated: bool) -> Result<Lit, TypeError> {
        if idx > Var::MAX_IDX {
            return Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX));
        }
        Ok(Lit {
            lidx: Lit::represent(idx, negated),
        })
    }

    /// Creates a new (negated or not) literal with a given index.
    /// Does not perform any check on the index.
    #[inline]
    pub fn new_unchecked(idx: u32, negated: bool) -> Lit {
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    /// Creates a new positive literal with a given index.
    /// Panics if `idx > Var::MAX_IDX`.
    #[inline]
    pub fn positive(idx: u32) -> Lit {
        Lit::new(idx, false)
    }

    /// Creates a new negated literal with a given index.
    /// Panics if `idx > Var::MAX_IDX`.
    #[inline]
    pub fn negative(idx: u32) -> Lit {
        Lit::new(idx, true)
    }

    /// Creates a literal from its signed DIMACS representation. Returns an
    /// error if the value is zero or the index too high.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::types::Lit;
    ///
    /// assert_eq!(Lit::from_dimacs(-3).unwrap(), Lit::negative(2));
    /// assert!(Lit::from_dimacs(0).is_err());
    /// ```
    pub fn from_dimacs(val: i32) -> Result<Lit, TypeError> {
        if val == 0 {
            return Err(TypeError::DimacsZero);
        }
        let negated = val < 0;
        let idx = val.unsigned_abs();
        Lit::new_with_error(idx - 1, negated)
    }

    /// Gets the variable index of the literal
    #[inline]
    pub fn vidx(&self) -> usize {
        (self.lidx >> 1) as usize
    }

    /// Gets the 32bit variable index of the literal
    #[inline]
    pub fn vidx32(&self) -> u32 {
        self.lidx >> 1
    }

    /// Gets the variables that the literal corresponds to.
    #[inline]
    pub fn var(&self) -> Var {
        Var::new_unchecked(self.vidx32())
    }

    /// True if the literal is positive.
    #[inline]
    pub fn is_pos(&self) -> bool {
        (self.lidx & 1u32) == 0
    }

    /// True if the literal is negated.
    #[inline]
    pub fn is_neg(&self) -> bool {
        (self.lidx & 1u32) == 1
    }

    /// Converts the literal to its signed DIMACS representation: the variable
    /// index plus one, negative if the literal is negated. Panics if the
    /// literal does not fit into an `i32`.
    pub fn to_dimacs(self) -> i32 {
        let idx: i32 = (self.vidx32() + 1)
            .try_into()
            .expect("variable index too high to fit in i32");
        if self.is_neg() {
            -idx
        } else {
            idx
        }
    }
}

/// Trait implementation allowing for negating literals with the `!` operator.
impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            lidx: self.lidx ^ 1u32,
        }
    }
}

/// Trait implementation allowing for negating literals with the unary `-` operator.
impl ops::Neg for Lit {
    type Output = Lit;

    #[inline]
    fn neg(self) -> Lit {
        Lit {
            lidx: self.lidx ^ 1u32,
        }
    }
}

/// Literals are printed in their DIMACS form
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// More easily creates literals. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use cnfgen::{lit, types::Lit};
///
/// assert_eq!(lit![42], Lit::positive(42));
/// assert_eq!(!lit![42], Lit::negative(42));
/// ```
#[macro_export]
macro_rules! lit {
    ($l:expr) => {
        $crate::types::Lit::positive($l)
    };
}

/// More easily creates literals with DIMACS indexing (starts from 1) and
/// negation (negative value is negation). Mainly used in tests.
///
/// # Examples
///
/// ```
/// use cnfgen::{lit, dimacs_lit, types::Lit};
///
/// assert_eq!(dimacs_lit![42], lit![41]);
/// assert_eq!(dimacs_lit![-42], !lit![41]);
/// ```
#[macro_export]
macro_rules! dimacs_lit {
    ($l:expr) => {
        $crate::types::Lit::from_dimacs($l).unwrap()
    };
}

/// Ternary value assigned to a literal or variable, including possible "don't care"
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TernaryVal {
    /// Positive assignment.
    True,
    /// Negative assignment.
    False,
    /// Formula is satisfied, no matter the assignment.
    DontCare,
}

impl fmt::Display for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryVal::True => write!(f, "1"),
            TernaryVal::False => write!(f, "0"),
            TernaryVal::DontCare => write!(f, "_"),
        }
    }
}

impl fmt::Debug for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for TernaryVal {
    fn from(value: bool) -> Self {
        if value {
            return TernaryVal::True;
        }
        TernaryVal::False
    }
}

/// Type representing an assignment of variables.
#[derive(Clone, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Assignment {
    assignment: Vec<TernaryVal>,
}

impl Assignment {
    /// Get the value that the solution assigns to a variable.
    /// If the variable is not included in the solution, will return `TernaryVal::DontCare`.
    pub fn var_value(&self, var: Var) -> TernaryVal {
        if var.idx() >= self.assignment.len() {
            TernaryVal::DontCare
        } else {
            self.assignment[var.idx()]
        }
    }

    /// Same as [`Assignment::var_value`], but for literals.
    pub fn lit_value(&self, lit: Lit) -> TernaryVal {
        if lit.is_neg() {
            match self.var_value(lit.var()) {
                TernaryVal::DontCare => TernaryVal::DontCare,
                TernaryVal::True => TernaryVal::False,
                TernaryVal::False => TernaryVal::True,
            }
        } else {
            self.var_value(lit.var())
        }
    }

    /// Assigns a variable in the assignment
    pub fn assign_var(&mut self, var: Var, val: TernaryVal) {
        if self.assignment.len() < var.idx() + 1 {
            self.assignment.resize(var.idx() + 1, TernaryVal::DontCare);
        }
        self.assignment[var.idx()] = val;
    }

    /// Assigns a literal to true
    pub fn assign_lit(&mut self, lit: Lit) {
        let val = if lit.is_pos() {
            TernaryVal::True
        } else {
            TernaryVal::False
        };
        self.assign_var(lit.var(), val)
    }

    /// Truncates a solution to only include assignments up to a maximum variable
    pub fn truncate(mut self, max_var: Var) -> Self {
        self.assignment.truncate(max_var.idx() + 1);
        self
    }

    /// Get the maximum variable in the assignment
    pub fn max_var(&self) -> Option<Var> {
        if self.assignment.is_empty() {
            None
        } else {
            Some(var![self.assignment.len() as u32 - 1])
        }
    }

    /// Parses an assignment from a solver value line (`v 1 -2 3 0`).
    pub fn from_vline(line: &str) -> Result<Self, InvalidVLine> {
        let mut assignment = Assignment::default();
        assignment.extend_from_vline(line)?;
        Ok(assignment)
    }

    /// Extends the assignment with the values of another solver value line.
    /// Solvers may split long solutions over multiple lines.
    pub fn extend_from_vline(&mut self, line: &str) -> Result<(), InvalidVLine> {
        let Some(values) = line.strip_prefix('v') else {
            return Err(InvalidVLine::InvalidTag(
                line.chars().next().unwrap_or(' '),
            ));
        };
        let mut empty = true;
        for token in values.split_whitespace() {
            empty = false;
            let val: i32 = token
                .parse()
                .map_err(|_| InvalidVLine::InvalidValue(token.to_string()))?;
            if val == 0 {
                break;
            }
            let lit = Lit::from_dimacs(val)
                .map_err(|_| InvalidVLine::InvalidValue(token.to_string()))?;
            let current = self.var_value(lit.var());
            let new = TernaryVal::from(lit.is_pos());
            if current != TernaryVal::DontCare && current != new {
                return Err(InvalidVLine::ConflictingAssignment(lit.var()));
            }
            self.assign_lit(lit);
        }
        if empty {
            return Err(InvalidVLine::EmptyLine);
        }
        Ok(())
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.assignment
            .iter()
            .try_for_each(|tv| write!(f, "{}", tv))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.assignment
            .iter()
            .try_for_each(|tv| write!(f, "{}", tv))
    }
}

impl FromIterator<Lit> for Assignment {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        let mut assignment = Assignment::default();
        iter.into_iter().for_each(|l| assignment.assign_lit(l));
        assignment
    }
}

impl From<Vec<TernaryVal>> for Assignment {
    fn from(assignment: Vec<TernaryVal>) -> Self {
        Self { assignment }
    }
}

/// Errors related to types
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum TypeError {
    /// The requested index is too high.
    /// Contains the requested and the maximum index.
    #[error("index {0} is too high (maximum {1})")]
    IdxTooHigh(u32, u32),
    /// DIMACS literal is zero
    #[error("zero is an invalid DIMACS literal")]
    DimacsZero,
}

/// Errors in solver value lines
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidVLine {
    /// The line does not start with `v`
    #[error("the value line does not start with 'v' but with '{0}'")]
    InvalidTag(char),
    /// A token is not a valid literal
    #[error("invalid value in value line: {0}")]
    InvalidValue(String),
    /// The same variable was assigned twice with different values
    #[error("the solver assigned {0} different values")]
    ConflictingAssignment(Var),
    /// The line contains no values
    #[error("empty value line")]
    EmptyLine,
}

/// An iterator over literals
pub trait LitIter: IntoIterator<Item = Lit> {}
impl<I: IntoIterator<Item = Lit>> LitIter for I {}
/// An iterator over integer-weighted literals
pub trait IWLitIter: IntoIterator<Item = (Lit, isize)> {}
impl<I: IntoIterator<Item = (Lit, isize)>> IWLitIter for I {}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::{Assignment, InvalidVLine, Lit, TernaryVal, TypeError, Var};

    #[test]
    fn var_index() {
        let idx = 5;
        let var = Var::new(idx);
        assert_eq!(var.idx(), idx as usize);
        assert_eq!(var.idx32(), idx);
    }

    #[test]
    fn var_lits() {
        let var = Var::new(5);
        assert_eq!(var.pos_lit(), Lit::positive(5));
        assert_eq!(var.neg_lit(), Lit::negative(5));
        assert_eq!(var.lit(true), Lit::positive(5));
        assert_eq!(var.lit(false), Lit::negative(5));
    }

    #[test]
    fn var_too_high() {
        assert_eq!(
            Var::new_with_error(Var::MAX_IDX + 1),
            Err(TypeError::IdxTooHigh(Var::MAX_IDX + 1, Var::MAX_IDX))
        );
    }

    #[test]
    fn lit_representation() {
        let lidx = Lit::represent(5, true);
        assert_eq!(lidx, 0b1011);
    }

    #[test]
    fn lit_negation() {
        let lit1 = Lit::positive(0);
        let lit2 = !lit1;
        assert!(!lit2.is_pos());
        assert!(lit2.is_neg());
        assert_eq!(lit1.var(), lit2.var());
        assert_eq!(-lit1, lit2);
    }

    #[test]
    fn dimacs_lit_idx_plus_one() {
        let lit = Lit::positive(5);
        assert_eq!(lit.to_dimacs(), 6);
        assert_eq!((!lit).to_dimacs(), -6);
        assert_eq!(Lit::from_dimacs(6), Ok(lit));
        assert_eq!(Lit::from_dimacs(-6), Ok(!lit));
    }

    #[test]
    fn dimacs_lit_zero() {
        assert_eq!(Lit::from_dimacs(0), Err(TypeError::DimacsZero));
    }

    #[test]
    fn lit_display() {
        assert_eq!(format!("{}", Lit::negative(2)), "-3");
        assert_eq!(format!("{}", Var::new(2)), "x3");
    }

    #[test]
    fn sol_lit_val() {
        let sol = Assignment::from(vec![
            TernaryVal::True,
            TernaryVal::False,
            TernaryVal::DontCare,
        ]);
        assert_eq!(sol.lit_value(Lit::negative(0)), TernaryVal::False);
        assert_eq!(sol.lit_value(Lit::positive(0)), TernaryVal::True);
        assert_eq!(sol.lit_value(Lit::negative(1)), TernaryVal::True);
        assert_eq!(sol.lit_value(Lit::positive(2)), TernaryVal::DontCare);
        assert_eq!(sol.lit_value(Lit::positive(7)), TernaryVal::DontCare);
    }

    #[test]
    fn sol_from_lits() {
        let true_sol = Assignment::from(vec![
            TernaryVal::True,
            TernaryVal::DontCare,
            TernaryVal::False,
        ]);
        let sol = Assignment::from_iter(vec![lit![0], !lit![2]]);
        assert_eq!(true_sol, sol);
    }

    #[test]
    fn sol_from_vline() {
        let sol = Assignment::from_vline("v 1 -2 4 0").unwrap();
        assert_eq!(
            sol,
            Assignment::from(vec![
                TernaryVal::True,
                TernaryVal::False,
                TernaryVal::DontCare,
                TernaryVal::True,
            ])
        );
    }

    #[test]
    fn sol_vline_errors() {
        assert_eq!(
            Assignment::from_vline("s 1 0"),
            Err(InvalidVLine::InvalidTag('s'))
        );
        assert_eq!(Assignment::from_vline("v"), Err(InvalidVLine::EmptyLine));
        assert_eq!(
            Assignment::from_vline("v 1 -1 0"),
            Err(InvalidVLine::ConflictingAssignment(Var::new(0)))
        );
        assert_eq!(
            Assignment::from_vline("v a 0"),
            Err(InvalidVLine::InvalidValue(String::from("a")))
        );
    }

    #[test]
    fn lit_mem_size() {
        assert_eq!(size_of::<Var>(), size_of::<u32>());
        assert_eq!(size_of::<Lit>(), size_of::<u32>());
        assert_eq!(size_of::<TernaryVal>(), 1);
    }
}
