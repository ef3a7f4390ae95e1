//! # Deciding Formulas with SAT Solvers
//!
//! Generated formulas are checked by handing their DIMACS encoding to an
//! external solver executable, see [`external::Solver`] and
//! [`crate::instances::Formula::is_satisfiable`].

use std::fmt;

use thiserror::Error;

pub mod external;

/// States that a solver can be in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverState {
    /// No query has been solved yet
    Input,
    /// The last query was found satisfiable
    Sat,
    /// The last query was found unsatisfiable
    Unsat,
    /// The solver gave no answer for the last query
    Unknown,
}

impl fmt::Display for SolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverState::Input => write!(f, "INPUT"),
            SolverState::Sat => write!(f, "SAT"),
            SolverState::Unsat => write!(f, "UNSAT"),
            SolverState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Error returned when an action is not possible in the current solver state
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("action requires {required_state} state, but solver is in state {actual_state}")]
pub struct StateError {
    /// The state required for the action
    pub required_state: SolverState,
    /// The state the solver is actually in
    pub actual_state: SolverState,
}

/// Return value for solving queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverResult {
    /// The query was found satisfiable.
    Sat,
    /// The query was found unsatisfiable.
    Unsat,
    /// The solver terminated without an answer.
    Interrupted,
}

impl fmt::Display for SolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverResult::Sat => write!(f, "SAT"),
            SolverResult::Unsat => write!(f, "UNSAT"),
            SolverResult::Interrupted => write!(f, "Interrupted"),
        }
    }
}
