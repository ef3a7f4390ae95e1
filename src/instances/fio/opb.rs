//! # Writing OPB Files
//!
//! Formulas are written as linear pseudo-boolean constraints, one per line.
//! Parity constraints and disequalities have no linear form and are written
//! as their clauses.
//!
//! ## References
//!
//! - [OPB format](https://www.cril.univ-artois.fr/PB12/format.pdf)

use std::io::{self, Write};

use crate::{
    instances::Formula,
    targets,
    types::{
        constraints::{CardConstraint, PBConstraint},
        Clause, Constraint, Lit,
    },
};

/// Options for writing OPB files
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Express negated literals by negating their coefficient and offsetting
    /// the right hand side. Otherwise they are written as `~x<idx>`.
    pub no_negated_lits: bool,
    /// Write the formula header as comment lines
    pub export_header: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            no_negated_lits: true,
            export_header: true,
        }
    }
}

/// The relation of a linear constraint line
#[derive(Clone, Copy)]
enum Relation {
    Ge,
    Eq,
}

/// Writes a formula to an OPB file
pub fn write_formula<W: Write>(
    writer: &mut W,
    formula: &Formula,
    opts: Options,
) -> Result<(), io::Error> {
    let n_constrs: usize = formula
        .constraints()
        .map(|constr| match constr {
            Constraint::Parity(_) | Constraint::Card(CardConstraint::NE(_)) => constr.n_clauses(),
            _ => 1,
        })
        .sum();
    log::debug!(
        target: targets::SERIALIZE,
        "writing OPB with {} variables and {n_constrs} constraints",
        formula.n_vars()
    );
    writeln!(
        writer,
        "* #variable= {} #constraint= {n_constrs}",
        formula.n_vars()
    )?;
    if opts.export_header {
        for line in formula.header().lines() {
            writeln!(writer, "{}", format!("* {line}").trim_end())?;
        }
    }
    writeln!(writer, "*")?;
    for constr in formula.constraints() {
        match constr {
            Constraint::Clause(cl) => write_clause(writer, cl, opts)?,
            Constraint::Parity(_) | Constraint::Card(CardConstraint::NE(_)) => constr
                .clauses()
                .try_for_each(|cl| write_clause(writer, &cl, opts))?,
            Constraint::Card(card) => write_card(writer, card, opts)?,
            Constraint::PB(pb) => write_pb(writer, pb, opts)?,
        }
    }
    writer.flush()
}

fn write_clause<W: Write>(writer: &mut W, clause: &Clause, opts: Options) -> Result<(), io::Error> {
    write_linear(
        writer,
        clause.iter().map(|&l| (l, 1)),
        Relation::Ge,
        1,
        opts,
    )
}

fn write_card<W: Write>(
    writer: &mut W,
    card: &CardConstraint,
    opts: Options,
) -> Result<(), io::Error> {
    let lits = card.lits().iter().copied();
    match card {
        CardConstraint::GE(constr) => {
            write_linear(writer, lits.map(|l| (l, 1)), Relation::Ge, constr.bound() as i128, opts)
        }
        CardConstraint::GT(constr) => write_linear(
            writer,
            lits.map(|l| (l, 1)),
            Relation::Ge,
            (constr.bound() as i128) + 1,
            opts,
        ),
        CardConstraint::LE(constr) => write_linear(
            writer,
            lits.map(|l| (l, -1)),
            Relation::Ge,
            -(constr.bound() as i128),
            opts,
        ),
        CardConstraint::LT(constr) => write_linear(
            writer,
            lits.map(|l| (l, -1)),
            Relation::Ge,
            1 - (constr.bound() as i128),
            opts,
        ),
        CardConstraint::EQ(constr) => {
            write_linear(writer, lits.map(|l| (l, 1)), Relation::Eq, constr.bound() as i128, opts)
        }
        CardConstraint::NE(_) => card
            .clauses()
            .try_for_each(|cl| write_clause(writer, &cl, opts)),
    }
}

fn write_pb<W: Write>(writer: &mut W, pb: &PBConstraint, opts: Options) -> Result<(), io::Error> {
    let rel = match pb {
        PBConstraint::GE(_) => Relation::Ge,
        PBConstraint::EQ(_) => Relation::Eq,
    };
    write_linear(writer, pb.lits().iter().copied(), rel, pb.bound() as i128, opts)
}

/// Writes a single linear constraint line. A negated literal `~x` with
/// weight `w` is rewritten as `-w x` and offsets the right hand side by `-w`,
/// unless negated literals are allowed in the output. The offset right hand
/// side may leave the `isize` range.
fn write_linear<W, I>(
    writer: &mut W,
    terms: I,
    rel: Relation,
    mut rhs: i128,
    opts: Options,
) -> Result<(), io::Error>
where
    W: Write,
    I: IntoIterator<Item = (Lit, isize)>,
{
    let mut first = true;
    for (lit, weight) in terms {
        if !first {
            write!(writer, " ")?;
        }
        first = false;
        let idx = lit.vidx() + 1;
        let weight = weight as i128;
        if lit.is_pos() {
            write!(writer, "{weight:+} x{idx}")?;
        } else if opts.no_negated_lits {
            rhs -= weight;
            write!(writer, "{:+} x{idx}", -weight)?;
        } else {
            write!(writer, "{weight:+} ~x{idx}")?;
        }
    }
    match rel {
        Relation::Ge => writeln!(writer, " >= {rhs};"),
        Relation::Eq => writeln!(writer, " = {rhs};"),
    }
}
