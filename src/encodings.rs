//! # Lowering of Constraints to CNF
//!
//! Exact combinatorial CNF encodings of the constraint kinds stored in a
//! [`crate::instances::Formula`]. None of the encodings introduce auxiliary
//! variables: every clause only contains literals of the encoded constraint.
//! The clause count of the parity and pseudo-boolean encodings is exponential
//! in the number of literals, callers are expected to bound the arity.
//!
//! All encodings are exposed as lazy iterators borrowing the literals of the
//! constraint, so that clauses can be streamed to a writer without
//! materializing the full expansion.
//!
//! The [`mapping`] module builds constraints rather than clauses: it encodes
//! relations between two finite sets on top of the other encodings.

pub mod card;
pub mod mapping;
pub mod parity;
pub mod pb;

/// Odometer over sign patterns of `n` positions, in the order of a cartesian
/// product where `false` precedes `true` and the first position is the most
/// significant one.
#[derive(Clone, Debug)]
pub(crate) struct SignPatterns {
    signs: Vec<bool>,
    done: bool,
}

impl SignPatterns {
    pub(crate) fn new(n: usize) -> Self {
        SignPatterns {
            signs: vec![false; n],
            done: false,
        }
    }

    /// Gets the current pattern, or [`None`] if all patterns were visited
    pub(crate) fn current(&self) -> Option<&[bool]> {
        if self.done {
            return None;
        }
        Some(&self.signs)
    }

    /// Moves to the next pattern
    pub(crate) fn advance(&mut self) {
        for sign in self.signs.iter_mut().rev() {
            if *sign {
                *sign = false;
            } else {
                *sign = true;
                return;
            }
        }
        // carry out of the first position
        self.done = true;
    }
}
