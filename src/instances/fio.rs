//! # File IO (Writing and Parsing)
//!
//! Writers for the DIMACS CNF, OPB and LaTeX formats, a DIMACS CNF parser and
//! a parser for the output of SAT solvers. It is recommended to write formulas
//! through the methods of [`crate::instances::Formula`] rather than through
//! these functions directly.

use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
};

use thiserror::Error;

use crate::types::Assignment;

pub mod dimacs;
pub mod latex;
pub mod opb;

/// Opens a reader for the file at Path.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub fn open_compressed_uncompressed_read<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn io::Read>, io::Error> {
    let path = path.as_ref();
    let raw_reader = File::open(path)?;
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            return Ok(Box::new(bzip2::read::BzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            return Ok(Box::new(flate2::read::GzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            return Ok(Box::new(xz2::read::XzDecoder::new(raw_reader)));
        }
    }
    Ok(Box::new(raw_reader))
}

/// Opens a writer for the file at Path.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub fn open_compressed_uncompressed_write<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn io::Write>, io::Error> {
    let path = path.as_ref();
    let raw_writer = File::create(path)?;
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            return Ok(Box::new(io::BufWriter::new(bzip2::write::BzEncoder::new(
                raw_writer,
                bzip2::Compression::fast(),
            ))));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            return Ok(Box::new(io::BufWriter::new(flate2::write::GzEncoder::new(
                raw_writer,
                flate2::Compression::fast(),
            ))));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            return Ok(Box::new(io::BufWriter::new(xz2::write::XzEncoder::new(
                raw_writer, 1,
            ))));
        }
    }
    Ok(Box::new(io::BufWriter::new(raw_writer)))
}

/// The answer of a SAT solver
#[derive(Debug, PartialEq, Eq)]
pub enum SolverOutput {
    /// The instance is satisfiable with the given assignment
    Sat(Assignment),
    /// The instance is unsatisfiable
    Unsat,
    /// The solver gave up
    Unknown,
}

/// Errors in the output of a SAT solver
#[derive(Error, Debug)]
pub enum SatSolverOutputError {
    /// The solution does not satisfy the instance
    #[error("The output of the SAT solver is incorrect.")]
    Nonsolution,
    /// The output has no `s` line
    #[error("No solution line found in the output.")]
    NoSline,
    /// The output claims satisfiability but has no `v` line
    #[error("No value line found in the output.")]
    NoVline,
    /// The `s` line has an unknown answer
    #[error("Invalid solution line found in the output.")]
    InvalidSLine,
}

/// Parses the output of a SAT solver following the SAT competition output
/// format
pub fn parse_sat_solver_output<R: BufRead>(reader: R) -> anyhow::Result<SolverOutput> {
    let mut is_sat = false;
    let mut solution: Option<Assignment> = None;

    for line in reader.lines() {
        let line = &line?;

        // solution line
        if let Some(answer) = line.strip_prefix("s ") {
            match answer.trim() {
                "UNSATISFIABLE" => return Ok(SolverOutput::Unsat),
                "UNKNOWN" | "INDETERMINATE" => return Ok(SolverOutput::Unknown),
                "SATISFIABLE" => is_sat = true,
                _ => anyhow::bail!(SatSolverOutputError::InvalidSLine),
            }
        }

        // value line
        if line.starts_with("v ") {
            match &mut solution {
                Some(assign) => assign.extend_from_vline(line)?,
                None => solution = Some(Assignment::from_vline(line)?),
            }
        }
    }

    // without a solution line the output cannot be trusted
    if !is_sat {
        anyhow::bail!(SatSolverOutputError::NoSline);
    }

    match solution {
        Some(solution) => Ok(SolverOutput::Sat(solution)),
        None => anyhow::bail!(SatSolverOutputError::NoVline),
    }
}
