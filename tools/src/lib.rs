//! # cnfgen-tools - Formula Families and the `cnfgen` Command Line Tool
//!
//! Formula families built on top of the `cnfgen` engine and helpers for
//! writing them in the format chosen on the command line.

use std::io;

use clap::ValueEnum;
use cnfgen::instances::{fio, Formula};

pub mod families {
    //! # Benchmark Formula Families

    mod parity;
    mod pigeonhole;

    pub use parity::parity;
    pub use pigeonhole::{binary_pigeonhole, pigeonhole};
}

/// Output formats of the command line tool
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// DIMACS CNF
    #[default]
    Dimacs,
    /// OPB pseudo-boolean constraints
    Opb,
    /// A LaTeX `align` block
    Latex,
}

/// Options for writing a formula, independent of the format
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutputOptions {
    /// Write the formula header as comments
    pub header: bool,
    /// Write variable names (DIMACS only)
    pub varnames: bool,
}

/// Writes a formula in the given format
pub fn write_formula<W: io::Write>(
    writer: &mut W,
    formula: &Formula,
    format: Format,
    opts: OutputOptions,
) -> io::Result<()> {
    match format {
        Format::Dimacs => formula.write_dimacs(
            writer,
            fio::dimacs::Options {
                export_header: opts.header,
                export_varnames: opts.varnames,
            },
        ),
        Format::Opb => formula.write_opb(
            writer,
            fio::opb::Options {
                export_header: opts.header,
                ..Default::default()
            },
        ),
        Format::Latex => formula.write_latex(
            writer,
            fio::latex::Options {
                export_header: opts.header,
                ..Default::default()
            },
        ),
    }
}
