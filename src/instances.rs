//! # Formulas and Variable Management
//!
//! The [`Formula`] type storing symbolic constraints over named variables, the
//! [`VarPool`] mapping names to variables and file I/O for formulas.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::types::{RsHashMap, TypeError, Var};

mod formula;
pub use formula::{Formula, InsertionPolicy};

pub mod fio;

/// Errors raised when adding constraints to a [`Formula`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A literal occurs more than once in a constraint
    #[error("literal `{0}` is repeated in the constraint")]
    RepeatedLiteral(String),
    /// A variable occurs with both polarities in a constraint
    #[error("variable `{0}` occurs with both polarities in the constraint")]
    OppositeLiterals(String),
    /// A variable name is not registered and the policy does not register it
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    /// A pre-compressed constraint mentions a variable that is not registered
    #[error("variable {0} is not registered in the formula")]
    VarOutOfRange(Var),
    /// An operator string that is not a supported relation
    #[error("invalid operator `{0}`, only <=, >=, <, >, ==, != are allowed")]
    InvalidOperator(String),
    /// The expansion of the constraint does not fit a `usize` clause count
    #[error("constraint over {0} literals exceeds the maximum arity of {1}")]
    ArityTooLarge(usize, usize),
    /// Normalizing a weighted constraint to a lower bound overflows an
    /// `isize` weight or bound
    #[error("normalizing the constraint overflows its integer coefficients")]
    CoefficientOverflow,
    /// A mapping axiom that the chosen encoding cannot express
    #[error("axiom `{0}` is not supported by this mapping encoding")]
    UnsupportedAxiom(&'static str),
    /// Invalid literal or variable
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Bidirectional mapping between variable names and variables. Variables are
/// assigned dense indices in the order their names are first seen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VarPool {
    names: Vec<String>,
    descriptions: Vec<Option<String>>,
    index: RsHashMap<String, Var>,
}

impl VarPool {
    /// Creates a new empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a variable name and returns its variable. If the name is
    /// already registered, the existing variable is returned and the
    /// description is updated if one is given.
    ///
    /// # Panics
    ///
    /// If more than [`Var::MAX_IDX`] + 1 variables are registered.
    pub fn add_variable(&mut self, name: &str, description: Option<&str>) -> Var {
        if let Some(&var) = self.index.get(name) {
            if let Some(desc) = description {
                self.descriptions[var.idx()] = Some(desc.to_string());
            }
            return var;
        }
        let var = Var::new(self.n_vars());
        self.names.push(name.to_string());
        self.descriptions.push(description.map(str::to_string));
        self.index.insert(name.to_string(), var);
        var
    }

    /// Gets the variable registered for a name
    pub fn var(&self, name: &str) -> Option<Var> {
        self.index.get(name).copied()
    }

    /// Gets the name of a variable
    pub fn name(&self, var: Var) -> Option<&str> {
        self.names.get(var.idx()).map(String::as_str)
    }

    /// Gets the description of a variable, if it has one
    pub fn description(&self, var: Var) -> Option<&str> {
        self.descriptions.get(var.idx())?.as_deref()
    }

    /// Checks whether a variable is registered in the pool
    pub fn contains(&self, var: Var) -> bool {
        var.idx() < self.names.len()
    }

    /// Gets the number of registered variables
    pub fn n_vars(&self) -> u32 {
        u32::try_from(self.names.len()).expect("more variables than fit in u32")
    }

    /// Gets the registered variable with the highest index
    pub fn max_var(&self) -> Option<Var> {
        self.n_vars().checked_sub(1).map(Var::new)
    }

    /// Forgets all variables with index `n` or higher
    pub(crate) fn truncate(&mut self, n: u32) {
        let n = n as usize;
        for name in self.names.drain(n.min(self.names.len())..) {
            self.index.remove(&name);
        }
        self.descriptions.truncate(n);
    }

    /// Iterates over the variable names in registration order. Every call
    /// starts from the first variable.
    pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

/// A relation between a linear sum and a right hand side, as written in
/// operator strings like `<=`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinearOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==` (also written `=`)
    Eq,
    /// `!=`, only available for unweighted sums
    Ne,
}

impl FromStr for LinearOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(LinearOp::Lt),
            "<=" => Ok(LinearOp::Le),
            ">" => Ok(LinearOp::Gt),
            ">=" => Ok(LinearOp::Ge),
            "==" | "=" => Ok(LinearOp::Eq),
            "!=" => Ok(LinearOp::Ne),
            _ => Err(Error::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for LinearOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinearOp::Lt => write!(f, "<"),
            LinearOp::Le => write!(f, "<="),
            LinearOp::Gt => write!(f, ">"),
            LinearOp::Ge => write!(f, ">="),
            LinearOp::Eq => write!(f, "=="),
            LinearOp::Ne => write!(f, "!="),
        }
    }
}
