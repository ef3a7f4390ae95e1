//! # Writing LaTeX
//!
//! Renders the clauses of a formula as rows of an `align` environment, either
//! as a snippet or as a standalone document.

use std::io::{self, Write};

use crate::{instances::Formula, targets, types::Clause};

/// Number of rows in an `align` block before a page break in full documents
const CLAUSES_PER_PAGE: usize = 40;

const PREAMBLE: &str = "%
\\documentclass[10pt,a4paper]{article}
\\usepackage[margin=1in]{geometry}
\\usepackage{amsmath}
\\usepackage{listings}
\\usepackage[utf8]{inputenc}
";

/// Options for writing LaTeX
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Write the formula header as LaTeX comments
    pub export_header: bool,
    /// Write a standalone document instead of an `align` block
    pub full_document: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            export_header: true,
            full_document: false,
        }
    }
}

fn ascii(line: &str) -> String {
    line.chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

/// Renders the positive and negative literal of a variable name. The overline
/// only covers the part of the name before its first sub- or superscript.
fn literal_texts(name: &str) -> (String, String) {
    let pos = format!("           {{{name}}}");
    let neg = match name.find(['_', '^']).filter(|&split| split > 0) {
        Some(split) => format!(
            "{{\\overline{{{}}}{}}}",
            &name[..split],
            &name[split..]
        ),
        None => format!("  \\overline{{{name}}}"),
    };
    (pos, neg)
}

/// Writes a formula as LaTeX
pub fn write_formula<W: Write>(
    writer: &mut W,
    formula: &Formula,
    opts: Options,
) -> Result<(), io::Error> {
    log::debug!(
        target: targets::SERIALIZE,
        "writing LaTeX for {} clauses",
        formula.len()
    );
    if opts.export_header && !formula.header().is_empty() {
        for line in formula.header().lines() {
            writeln!(writer, "{}", ascii(&format!("% {line}")).trim_end())?;
        }
        writeln!(writer, "%")?;
    }

    if opts.full_document {
        write!(writer, "{PREAMBLE}")?;
        writeln!(writer, "\\begin{{document}}")?;
        let title = formula.header().lines().next().unwrap_or_default();
        writeln!(writer, "\\title{{{}}}", ascii(title).replace('_', "\\_"))?;
        writeln!(writer, "\\author{{CNFgen formula generator}}")?;
        writeln!(writer, "\\maketitle")?;
        writeln!(writer, "\\noindent\\textbf{{Formula header:}}")?;
        writeln!(writer, "\\begin{{lstlisting}}[breaklines]")?;
        for line in formula.header().lines() {
            writeln!(writer, "{}", ascii(line))?;
        }
        writeln!(writer, "\\end{{lstlisting}}")?;
        writeln!(writer, "\\bigskip")?;
        writeln!(
            writer,
            "\\noindent\\textbf{{CNF with {} variables and {} clauses:}}",
            formula.n_vars(),
            formula.len()
        )?;
    }

    let texts: Vec<(String, String)> = formula.variables().map(literal_texts).collect();
    let write_clause = |writer: &mut W, clause: &Clause, first: bool| -> io::Result<()> {
        write!(writer, "{}", if first { "\n&" } else { " \\\\\n&" })?;
        let connective = if opts.full_document || first {
            "       "
        } else {
            " \\land "
        };
        write!(writer, "{connective}")?;
        if clause.is_empty() {
            return write!(writer, "\\square");
        }
        let lits: Vec<&str> = clause
            .iter()
            .map(|lit| {
                let (pos, neg) = &texts[lit.vidx()];
                if lit.is_pos() {
                    pos.as_str()
                } else {
                    neg.as_str()
                }
            })
            .collect();
        if opts.full_document {
            write!(writer, "{}", lits.join(" \\lor "))
        } else {
            write!(writer, "\\left( {} \\right)", lits.join(" \\lor "))
        }
    };

    write!(writer, "\\begin{{align}}")?;
    if formula.is_empty() {
        write!(writer, "\n   \\top")?;
    }
    for (idx, clause) in formula.clauses().enumerate() {
        if opts.full_document && idx > 0 && idx % CLAUSES_PER_PAGE == 0 {
            write!(writer, "\n\\end{{align}}\\pagebreak\n\\begin{{align}}")?;
            write_clause(writer, &clause, true)?;
        } else {
            write_clause(writer, &clause, idx == 0)?;
        }
    }
    writeln!(writer, "\n\\end{{align}}")?;

    if opts.full_document {
        writeln!(writer, "\\end{{document}}")?;
    }
    writer.flush()
}
