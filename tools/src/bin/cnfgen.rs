//! # `cnfgen`
//!
//! A small tool for generating pigeonhole and parity benchmark formulas.

use std::{io, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use cnfgen::instances::{fio, Formula};
use cnfgen_tools::{families, write_formula, Format, OutputOptions};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    family: Family,
    /// The output format
    #[arg(long, value_enum, default_value_t = Format::Dimacs)]
    format: Format,
    /// Do not write the formula header as comments
    #[arg(long)]
    no_header: bool,
    /// Write the variable names as `c varname` lines (DIMACS only)
    #[arg(long)]
    varnames: bool,
    /// The output path. Writes to `stdout` if not given. With feature
    /// `compression`, `.bz2`, `.gz` and `.xz` files are compressed.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Family {
    /// Pigeonhole principle
    Php {
        /// Number of pigeons
        pigeons: usize,
        /// Number of holes
        holes: usize,
        /// Every pigeon flies into at most one hole
        #[arg(long)]
        functional: bool,
        /// Every hole gets a pigeon
        #[arg(long)]
        onto: bool,
    },
    /// Binary pigeonhole principle
    Bphp {
        /// Number of pigeons
        pigeons: usize,
        /// Number of holes
        holes: usize,
    },
    /// Parity principle
    Parity {
        /// Number of elements
        n: usize,
    },
}

fn generate(family: &Family) -> anyhow::Result<Formula> {
    let formula = match *family {
        Family::Php {
            pigeons,
            holes,
            functional,
            onto,
        } => families::pigeonhole(pigeons, holes, functional, onto)?,
        Family::Bphp { pigeons, holes } => families::binary_pigeonhole(pigeons, holes)?,
        Family::Parity { n } => families::parity(n)?,
    };
    Ok(formula)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let formula = generate(&args.family).context("error generating the formula")?;
    log::info!(
        "generated formula with {} variables and {} clauses",
        formula.n_vars(),
        formula.len()
    );
    let opts = OutputOptions {
        header: !args.no_header,
        varnames: args.varnames,
    };

    if let Some(out_path) = args.output {
        let mut writer = fio::open_compressed_uncompressed_write(&out_path)
            .with_context(|| format!("error opening {}", out_path.display()))?;
        write_formula(&mut writer, &formula, args.format, opts)
            .context("error writing the output file")?;
    } else {
        write_formula(&mut io::stdout().lock(), &formula, args.format, opts)
            .context("error writing the formula")?;
    }
    Ok(())
}
