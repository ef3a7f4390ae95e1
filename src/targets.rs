//! Targets for [`log`] messages emitted by the library.
//!
//! The library does not install a logger, binaries decide what to record,
//! e.g. `RUST_LOG=mapping=debug` with `env_logger`.

/// Logs related to inserting constraints into a [formula](crate::instances::Formula)
pub const FORMULA: &str = "formula";

/// Logs related to [mapping encodings](crate::encodings::mapping)
pub const MAPPING: &str = "mapping";

/// Logs related to writing and parsing [file formats](crate::instances::fio)
pub const SERIALIZE: &str = "serialize";

/// Logs related to calling [external solvers](crate::solvers::external)
pub const SOLVER: &str = "solver";
