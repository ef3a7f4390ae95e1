//! # Parsing and Writing DIMACS CNF Files
//!
//! The parser accepts input that does not strictly follow the format, as
//! long as it is still reasonable. Comment lines before the p
//! line become the header of the parsed formula, `c varname <idx> <name>`
//! lines name the variables.
//!
//! ## References
//!
//! - [DIMACS CNF](http://www.satcompetition.org/2011/format-benchmarks2011.html)

use std::{
    convert::TryFrom,
    io::{self, BufRead, BufReader, Read, Write},
};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{i32, line_ending, multispace0, multispace1, u64},
    combinator::{all_consuming, map_res, recognize, success},
    error::{Error as NomError, ErrorKind, ParseError},
    multi::separated_list0,
    sequence::{pair, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::{
    instances::{self, Formula, InsertionPolicy},
    targets,
    types::{Clause, Lit, RsHashMap},
};

/// Options for writing DIMACS CNF files
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Write the formula header as comment lines
    pub export_header: bool,
    /// Write a `c varname <idx> <name>` line per variable
    pub export_varnames: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            export_header: true,
            export_varnames: false,
        }
    }
}

/// Errors occuring within the DIMACS parsing module
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid literal in the file
    #[error("invalid literal: {0}")]
    Lit(String),
    /// Invalid ending of a clause
    #[error("invalid clause ending: {0}")]
    ClauseEnding(String),
    /// The preamble never ended
    #[error("preamble never ends")]
    PreambleNoEnd,
    /// P line value is too large to fit in a [`usize`]
    #[error("value in p-line too large to fit usize: {0}")]
    PValTooLarge(u64),
    /// Invalid p line
    #[error("invalid p-line: {0}")]
    PLine(String),
    /// A variable name given by a varname comment, or the decimal index used
    /// for an unnamed variable, is already taken by another variable
    #[error("variable {0} is named `{1}`, which another variable already uses")]
    DuplicateVarName(usize, String),
    /// The parsed clause could not be added to the formula
    #[error(transparent)]
    Formula(#[from] instances::Error),
    /// IO error reading file
    #[error("IO error: {0}")]
    IOError(io::Error),
    /// Base error from nom parsing
    #[error("nom error: {0} ({1:?})")]
    NomError(String, ErrorKind),
    /// Incomplete nom error
    #[error("nom parser requested more data")]
    NomIncomplete,
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Lit(l0), Self::Lit(r0)) => l0 == r0,
            (Self::ClauseEnding(l0), Self::ClauseEnding(r0)) => l0 == r0,
            (Self::PValTooLarge(l0), Self::PValTooLarge(r0)) => l0 == r0,
            (Self::PLine(l0), Self::PLine(r0)) => l0 == r0,
            (Self::DuplicateVarName(l0, l1), Self::DuplicateVarName(r0, r1)) => {
                l0 == r0 && l1 == r1
            }
            (Self::Formula(l0), Self::Formula(r0)) => l0 == r0,
            (Self::IOError(_), Self::IOError(_)) => true,
            (Self::NomError(l0, l1), Self::NomError(r0, r1)) => l0 == r0 && l1 == r1,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl ParseError<&str> for Error {
    fn from_error_kind(input: &str, kind: ErrorKind) -> Self {
        Self::NomError(String::from(input), kind)
    }

    fn append(_: &str, _: ErrorKind, other: Self) -> Self {
        // the other error is more meaningful than a plain nom error
        other
    }
}

/// Content of the preamble of a CNF file
#[derive(PartialEq, Debug, Default)]
struct Preamble {
    n_vars: usize,
    n_clauses: usize,
    header: Vec<String>,
    varnames: RsHashMap<usize, String>,
}

/// Parses a CNF formula from a reader (typically a (compressed) file).
///
/// Variables `1..=n` of the p line are registered first, named by their
/// `c varname` line or their decimal index. Variables beyond the p line are
/// registered when first seen. Every clause is stored as given, without
/// checking for repeated or opposite literals.
pub fn parse_cnf<R: Read>(reader: R) -> Result<Formula, Error> {
    let reader = BufReader::new(reader);
    let (reader, preamble) = parse_preamble(reader)?;
    log::debug!(
        target: targets::SERIALIZE,
        "parsing DIMACS body with {} variables and {} clauses declared",
        preamble.n_vars,
        preamble.n_clauses
    );
    let mut formula = Formula::with_policy(InsertionPolicy::Unchecked);
    formula.set_header(preamble.header.join("\n"));
    let mut varnames = preamble.varnames;
    let mut register_up_to = |formula: &mut Formula, n: usize| -> Result<(), Error> {
        while (formula.n_vars() as usize) < n {
            let idx = formula.n_vars() as usize + 1;
            let name = varnames.remove(&idx).unwrap_or_else(|| idx.to_string());
            formula.add_variable(&name, None);
            if formula.n_vars() as usize != idx {
                return Err(Error::DuplicateVarName(idx, name));
            }
        }
        Ok(())
    };
    register_up_to(&mut formula, preamble.n_vars)?;
    parse_cnf_body(reader, |clause| {
        if let Some(max) = clause.iter().map(Lit::vidx).max() {
            register_up_to(&mut formula, max + 1)?;
        }
        formula.add_constraint(clause.into())?;
        Ok(())
    })?;
    formula.set_policy(InsertionPolicy::default());
    Ok(formula)
}

fn unwrap_dimacs_error(err: nom::Err<Error>) -> Error {
    match err {
        nom::Err::Incomplete(_) => Error::NomIncomplete,
        nom::Err::Error(e) => e,
        nom::Err::Failure(e) => e,
    }
}

/// Parses the comments before and including the p line
fn parse_preamble<R: BufRead>(mut reader: R) -> Result<(R, Preamble), Error> {
    let mut header = vec![];
    let mut varnames = RsHashMap::default();
    loop {
        let mut buf = String::new();
        match reader.read_line(&mut buf) {
            Ok(len) => {
                if len == 0 {
                    return Err(Error::PreambleNoEnd);
                }
            }
            Err(ioe) => return Err(Error::IOError(ioe)),
        };
        if buf.trim().is_empty() {
            continue;
        }
        if let Some(comment) = buf.strip_prefix('c') {
            let comment = comment.trim_end();
            let comment = comment.strip_prefix(' ').unwrap_or(comment);
            match parse_varname(comment) {
                Some((idx, name)) => {
                    varnames.insert(idx, name.to_string());
                }
                None => header.push(comment.to_string()),
            }
            continue;
        }
        if buf.starts_with('p') {
            let (_, (n_vars, n_clauses)) = parse_p_line(&buf).map_err(unwrap_dimacs_error)?;
            return Ok((
                reader,
                Preamble {
                    n_vars,
                    n_clauses,
                    header,
                    varnames,
                },
            ));
        }
        return Err(Error::PLine(buf));
    }
}

/// Parses the content of a `c varname <idx> <name>` comment
fn parse_varname(comment: &str) -> Option<(usize, &str)> {
    let (idx, name) = comment.strip_prefix("varname ")?.split_once(' ')?;
    Some((idx.parse().ok()?, name))
}

/// Main parser for the clauses of a CNF file
fn parse_cnf_body<R, F>(mut reader: R, mut add_clause: F) -> Result<(), Error>
where
    R: BufRead,
    F: FnMut(Clause) -> Result<(), Error>,
{
    loop {
        let mut buf = String::new();
        match reader.read_line(&mut buf) {
            Ok(len) => {
                if len == 0 {
                    return Ok(());
                }
            }
            Err(ioe) => return Err(Error::IOError(ioe)),
        };
        let (_, opt_clause) = parse_cnf_line(&buf).map_err(unwrap_dimacs_error)?;
        if let Some(clause) = opt_clause {
            add_clause(clause)?;
        }
    }
}

/// Parses the p line, returning the number of variables and clauses
fn parse_p_line(input: &str) -> IResult<&str, (usize, usize), Error> {
    let full_p_line = String::from(input);
    let (input, _) = tuple::<_, _, NomError<_>, _>((
        terminated(tag("p"), multispace1),
        terminated(tag("cnf"), multispace1),
    ))(input)
    .map_err(|e| e.map(|_| Error::PLine(full_p_line.clone())))?;
    let (input, (n_vars, _, n_clauses)) =
        tuple::<_, _, NomError<_>, _>((u64, multispace1, u64))(input)
            .map_err(|e| e.map(|_| Error::PLine(full_p_line)))?;
    let n_vars = match usize::try_from(n_vars) {
        Ok(v) => v,
        Err(_) => return Err(nom::Err::Error(Error::PValTooLarge(n_vars))),
    };
    let n_clauses = match usize::try_from(n_clauses) {
        Ok(v) => v,
        Err(_) => return Err(nom::Err::Error(Error::PValTooLarge(n_clauses))),
    };
    Ok((input, (n_vars, n_clauses)))
}

/// Parses a CNF line, either a comment or a clause
fn parse_cnf_line(input: &str) -> IResult<&str, Option<Clause>, Error> {
    let (input, _) = multispace0(input)?;
    if input.trim().is_empty() {
        // Tolerate empty lines
        return Ok((input, None));
    }
    match tag::<&str, &str, NomError<&str>>("c")(input) {
        Ok((input, _)) => Ok((input, None)),
        Err(_) => {
            // Line is not a comment
            let (input, clause) =
                terminated(separated_list0(multispace1, parse_lit), parse_clause_ending)(input)?;
            Ok((input, Some(Clause::from_iter(clause))))
        }
    }
}

/// Nuclear parser for literal
fn parse_lit(input: &str) -> IResult<&str, Lit, Error> {
    map_res(i32, Lit::from_dimacs)(input)
        .map_err(|e| e.map(|e: NomError<&str>| Error::Lit(String::from(e.input))))
}

/// Parses the end of a clause
/// A '0' followed by a linebreak, as well as a '0' followed by
/// whitespace or only a linebreak are treated as valid clause endings.
/// This is more lean than the file format spec.
fn parse_clause_ending(input: &str) -> IResult<&str, &str, Error> {
    recognize(pair(
        multispace0,
        alt((
            recognize(all_consuming(success(""))),
            recognize(all_consuming(tag("0"))),
            recognize(terminated(tag("0"), line_ending)),
            recognize(terminated(tag("0"), multispace1)),
            recognize(line_ending),
        )),
    ))(input)
    .map_err(|e| e.map(|e: NomError<&str>| Error::ClauseEnding(String::from(e.input))))
}

/// Writes a formula to a DIMACS CNF file, expanding all constraints to
/// clauses
pub fn write_formula<W: Write>(
    writer: &mut W,
    formula: &Formula,
    opts: Options,
) -> Result<(), io::Error> {
    log::debug!(
        target: targets::SERIALIZE,
        "writing DIMACS CNF with {} variables and {} clauses",
        formula.n_vars(),
        formula.len()
    );
    if opts.export_header {
        for line in formula.header().lines() {
            let line: String = line
                .chars()
                .map(|c| if c.is_ascii() { c } else { '?' })
                .collect();
            writeln!(writer, "{}", format!("c {line}").trim_end())?;
        }
    }
    if opts.export_varnames {
        for (idx, name) in formula.variables().enumerate() {
            writeln!(writer, "c varname {} {}", idx + 1, name)?;
        }
    }
    writeln!(writer, "p cnf {} {}", formula.n_vars(), formula.len())?;
    formula
        .clauses()
        .try_for_each(|cl| write_clause(writer, &cl))?;
    writer.flush()
}

fn write_clause<W: Write>(writer: &mut W, clause: &Clause) -> Result<(), io::Error> {
    clause
        .iter()
        .try_for_each(|l| write!(writer, "{} ", l.to_dimacs()))?;
    writeln!(writer, "0")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{
        parse_clause_ending, parse_cnf, parse_cnf_line, parse_lit, parse_p_line,
        parse_preamble, write_formula, Error, Options,
    };
    use crate::{
        clause, dimacs_lit,
        instances::{Formula, InsertionPolicy},
        types::Clause,
    };

    #[test]
    fn parse_lit_pass() {
        assert_eq!(parse_lit("15 "), Ok((" ", dimacs_lit![15])));
        assert_eq!(parse_lit("-42 "), Ok((" ", dimacs_lit![-42])));
        assert_eq!(parse_lit("42 63"), Ok((" 63", dimacs_lit![42])));
    }

    #[test]
    fn parse_lit_fail() {
        assert_eq!(
            parse_lit("abc "),
            Err(nom::Err::Error(Error::Lit(String::from("abc "))))
        );
        assert_eq!(
            parse_lit("0 "),
            Err(nom::Err::Error(Error::Lit(String::from("0 "))))
        );
    }

    #[test]
    fn parse_p_line_pass() {
        assert_eq!(parse_p_line("p cnf 23 42"), Ok(("", (23, 42))));
        assert_eq!(parse_p_line("p  cnf 0 0\n"), Ok(("\n", (0, 0))));
    }

    #[test]
    fn parse_p_line_fail() {
        assert_eq!(
            parse_p_line("a cnf 23 42"),
            Err(nom::Err::Error(Error::PLine(String::from("a cnf 23 42"))))
        );
        assert_eq!(
            parse_p_line("p wcnf 23 42 52"),
            Err(nom::Err::Error(Error::PLine(String::from(
                "p wcnf 23 42 52"
            ))))
        );
        assert_eq!(
            parse_p_line("p cnf ab"),
            Err(nom::Err::Error(Error::PLine(String::from("p cnf ab"))))
        );
    }

    #[test]
    fn parse_clause_ending_pass() {
        assert_eq!(parse_clause_ending("0"), Ok(("", "0")));
        assert_eq!(parse_clause_ending("0 test"), Ok(("test", "0 ")));
        assert_eq!(parse_clause_ending("0\n"), Ok(("", "0\n")));
        assert_eq!(parse_clause_ending("\n"), Ok(("", "\n")));
    }

    #[test]
    fn parse_clause_ending_fail() {
        assert_eq!(
            parse_clause_ending("0test"),
            Err(nom::Err::Error(Error::ClauseEnding(String::from("0test"))))
        );
    }

    #[test]
    fn parse_cnf_line_pass() {
        assert_eq!(parse_cnf_line("c test"), Ok((" test", None)));
        assert_eq!(parse_cnf_line("   \n"), Ok(("", None)));
        assert_eq!(
            parse_cnf_line("42 34 -16 0"),
            Ok((
                "",
                Some(clause![dimacs_lit![42], dimacs_lit![34], dimacs_lit![-16]])
            ))
        );
        assert_eq!(parse_cnf_line("0\n"), Ok(("", Some(Clause::new()))));
    }

    #[test]
    fn parse_cnf_line_fail() {
        assert_eq!(
            parse_cnf_line("42 34 a -16 0"),
            Err(nom::Err::Error(Error::ClauseEnding(String::from(
                "a -16 0"
            ))))
        );
    }

    #[test]
    fn parse_preamble_header_and_names() {
        let data = "c first line\nc\nc varname 2 y\np cnf 2 0\n";
        let (_, preamble) = parse_preamble(Cursor::new(data)).unwrap();
        assert_eq!(preamble.n_vars, 2);
        assert_eq!(preamble.header, vec!["first line", ""]);
        assert_eq!(preamble.varnames.get(&2).map(String::as_str), Some("y"));
    }

    #[test]
    fn parse_preamble_fail() {
        assert_eq!(
            parse_preamble(Cursor::new("c only comments\n")).unwrap_err(),
            Error::PreambleNoEnd
        );
        assert_eq!(
            parse_preamble(Cursor::new("1 2 0\n")).unwrap_err(),
            Error::PLine(String::from("1 2 0\n"))
        );
    }

    #[test]
    fn parse_cnf_registers_vars() {
        let data = "c header\np cnf 3 2\n1 -2 0\n\n-5 0\n";
        let formula = parse_cnf(Cursor::new(data)).unwrap();
        assert_eq!(formula.header(), "header");
        assert_eq!(
            formula.variables().collect::<Vec<_>>(),
            vec!["1", "2", "3", "4", "5"]
        );
        let cls: Vec<Clause> = formula.clauses().collect();
        assert_eq!(
            cls,
            vec![
                clause![dimacs_lit![1], dimacs_lit![-2]],
                clause![dimacs_lit![-5]]
            ]
        );
        assert_eq!(formula.policy(), InsertionPolicy::Default);
    }

    #[test]
    fn parse_cnf_keeps_tautologies() {
        let formula = parse_cnf(Cursor::new("p cnf 1 1\n1 -1 1 0\n")).unwrap();
        assert_eq!(formula.len(), 1);
    }

    #[test]
    fn parse_cnf_duplicate_names() {
        assert_eq!(
            parse_cnf(Cursor::new("c varname 1 2\np cnf 2 0\n")).unwrap_err(),
            Error::DuplicateVarName(2, String::from("2"))
        );
        assert_eq!(
            parse_cnf(Cursor::new("c varname 1 x\nc varname 2 x\np cnf 2 0\n")).unwrap_err(),
            Error::DuplicateVarName(2, String::from("x"))
        );
        assert_eq!(
            parse_cnf(Cursor::new("c varname 1 3\np cnf 1 1\n3 0\n")).unwrap_err(),
            Error::DuplicateVarName(3, String::from("3"))
        );
        let formula = parse_cnf(Cursor::new("c varname 1 2\np cnf 1 0\n")).unwrap();
        assert_eq!(formula.variables().collect::<Vec<_>>(), vec!["2"]);
    }

    #[test]
    fn write_empty() {
        let mut cursor = Cursor::new(vec![]);
        write_formula(&mut cursor, &Formula::new(), Options::default()).unwrap();
        assert_eq!(String::from_utf8(cursor.into_inner()).unwrap(), "p cnf 0 0\n");
    }

    #[test]
    fn write_header_and_names() {
        let mut formula = Formula::new();
        formula.set_header("Pigeonhole principle  \n\nnon-ascii: é");
        formula
            .add_clause(&[(true, "p_{1,1}"), (false, "p_{1,2}")])
            .unwrap();
        formula.add_clause::<&str>(&[]).unwrap();
        let mut cursor = Cursor::new(vec![]);
        let opts = Options {
            export_header: true,
            export_varnames: true,
        };
        write_formula(&mut cursor, &formula, opts).unwrap();
        assert_eq!(
            String::from_utf8(cursor.into_inner()).unwrap(),
            "c Pigeonhole principle\nc\nc non-ascii: ?\nc varname 1 p_{1,1}\nc varname 2 p_{1,2}\np cnf 2 2\n1 -2 0\n0\n"
        );
    }

    #[test]
    fn write_parse_roundtrip() {
        let mut formula = Formula::new();
        formula.set_header("round trip");
        formula
            .add_parity(&[(true, "a"), (false, "b"), (true, "c")], false)
            .unwrap();
        formula
            .add_greater_or_equal(&[(true, "a"), (true, "d")], 1)
            .unwrap();
        let opts = Options {
            export_header: true,
            export_varnames: true,
        };
        let mut cursor = Cursor::new(vec![]);
        write_formula(&mut cursor, &formula, opts).unwrap();
        cursor.set_position(0);
        let parsed = parse_cnf(cursor).unwrap();
        assert_eq!(parsed.header(), "round trip");
        assert_eq!(
            parsed.variables().collect::<Vec<_>>(),
            formula.variables().collect::<Vec<_>>()
        );
        assert_eq!(
            parsed.clauses().collect::<Vec<_>>(),
            formula.clauses().collect::<Vec<_>>()
        );
    }
}
