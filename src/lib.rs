//! # cnfgen - Compiling Combinatorial Constraints to CNF
//!
//! `cnfgen` is the engine behind a generator of benchmark formulas for SAT
//! solvers. Formula families describe their constraints over named variables
//! (clauses, parity constraints, cardinality and weighted linear constraints
//! and mappings between finite sets) and `cnfgen` compiles them to clauses
//! and writes them in the DIMACS, OPB or LaTeX format.
//!
//! ```
//! use cnfgen::{
//!     encodings::mapping::{Axioms, MappingSpec},
//!     instances::Formula,
//! };
//!
//! // three pigeons do not fit into two holes
//! let axioms = Axioms {
//!     complete: true,
//!     injective: true,
//!     ..Default::default()
//! };
//! let mut php = Formula::new();
//! php.unary_mapping(&MappingSpec::new(3, 2).with_axioms(axioms))
//!     .unwrap();
//! assert_eq!(php.n_vars(), 6);
//! assert_eq!(php.len(), 9);
//! ```
//!
//! ## Features
//!
//! | Feature name | Description |
//! | --- | --- |
//! | `fxhash` | Use the faster firefox hash function from `rustc-hash` in `cnfgen`. |
//! | `compression` | Enable parsing and writing compressed files. |
//! | `rand` | Enable randomization features. (Shuffling formulas.) |
//!
//! ## Logging
//!
//! The library logs through the [`log`] facade with the targets listed in
//! [`targets`]. No logger is installed.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! Currently, the MSRV is 1.76.0.

pub mod encodings;
pub mod instances;
pub mod solvers;
pub mod targets;
pub mod transformations;
pub mod types;

mod utils;
