//! # Formulas
//!
//! A formula is an append-only sequence of symbolic constraints over named
//! variables. Constraints are only lowered to clauses when iterated over or
//! written out.

use std::{cell::Cell, io, path::Path};

use crate::{
    encodings::{
        mapping::{self, BinaryMapping, MappingSpec, UnaryMapping},
        parity, pb,
    },
    solvers::{external, SolverResult},
    targets,
    types::{
        constraints::{CardConstraint, PBConstraint},
        Assignment, Clause, Constraint, Lit, RsHashSet, Var,
    },
};

use super::{fio, Error, LinearOp, VarPool};

/// How strictly named literals are checked when inserting constraints
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InsertionPolicy {
    /// Reject repeated literals, opposite literals and unknown variables
    Strict,
    /// Reject repeated and opposite literals, register unknown variables
    #[default]
    Default,
    /// No checks, unknown variables are registered
    Unchecked,
}

impl InsertionPolicy {
    fn compressor(self) -> Compressor {
        match self {
            InsertionPolicy::Strict => Compressor {
                resolve: resolve_known,
                check_lits: reject_malformed,
                check_vars: reject_unregistered,
            },
            InsertionPolicy::Default => Compressor {
                resolve: resolve_or_register,
                check_lits: reject_malformed,
                check_vars: reject_unregistered,
            },
            InsertionPolicy::Unchecked => Compressor {
                resolve: resolve_or_register,
                check_lits: accept,
                check_vars: accept,
            },
        }
    }
}

/// The checking routines of an insertion policy, chosen once when the policy
/// is set
#[derive(Clone, Copy, Debug)]
struct Compressor {
    resolve: fn(&mut VarPool, &str) -> Result<Var, Error>,
    check_lits: fn(&[Lit], &VarPool) -> Result<(), Error>,
    check_vars: fn(&[Lit], &VarPool) -> Result<(), Error>,
}

fn resolve_known(pool: &mut VarPool, name: &str) -> Result<Var, Error> {
    pool.var(name)
        .ok_or_else(|| Error::UnknownVariable(name.to_string()))
}

fn resolve_or_register(pool: &mut VarPool, name: &str) -> Result<Var, Error> {
    Ok(pool.add_variable(name, None))
}

fn accept(_: &[Lit], _: &VarPool) -> Result<(), Error> {
    Ok(())
}

fn reject_malformed(lits: &[Lit], pool: &VarPool) -> Result<(), Error> {
    let mut seen = RsHashSet::default();
    for &lit in lits {
        if !seen.insert(lit) {
            return Err(Error::RepeatedLiteral(lit_name(lit, pool)));
        }
    }
    if let Some(&lit) = lits.iter().find(|&&lit| seen.contains(&!lit)) {
        return Err(Error::OppositeLiterals(var_name(lit.var(), pool)));
    }
    Ok(())
}

fn reject_unregistered(lits: &[Lit], pool: &VarPool) -> Result<(), Error> {
    match lits.iter().find(|lit| !pool.contains(lit.var())) {
        Some(lit) => Err(Error::VarOutOfRange(lit.var())),
        None => Ok(()),
    }
}

/// Rejects constraints whose clause count does not fit a `usize`
fn check_size(constr: &Constraint) -> Result<(), Error> {
    match constr {
        Constraint::Parity(constr) if constr.lits().len() > parity::max_arity() => Err(
            Error::ArityTooLarge(constr.lits().len(), parity::max_arity()),
        ),
        Constraint::Card(constr) if constr.checked_n_clauses().is_none() => Err(
            Error::ArityTooLarge(constr.lits().len(), constr.max_arity()),
        ),
        Constraint::PB(constr) if constr.lits().len() > pb::max_arity() => {
            Err(Error::ArityTooLarge(constr.lits().len(), pb::max_arity()))
        }
        _ => Ok(()),
    }
}

fn var_name(var: Var, pool: &VarPool) -> String {
    pool.name(var)
        .map_or_else(|| var.to_string(), str::to_string)
}

fn lit_name(lit: Lit, pool: &VarPool) -> String {
    if lit.is_pos() {
        var_name(lit.var(), pool)
    } else {
        format!("-{}", var_name(lit.var(), pool))
    }
}

/// A CNF formula stored as symbolic constraints over named variables.
///
/// Literals are given by callers as `(polarity, name)` pairs and compressed
/// to [`Lit`]s according to the formula's [`InsertionPolicy`]. The formula
/// keeps the constraints unexpanded: [`Formula::len`] counts the clauses
/// without materializing them and [`Formula::clauses`] expands them lazily.
///
/// ```
/// use cnfgen::instances::Formula;
///
/// let mut formula = Formula::new();
/// formula.add_clause(&[(true, "a"), (false, "b")]).unwrap();
/// formula.add_parity(&[(true, "a"), (true, "b")], true).unwrap();
/// assert_eq!(formula.len(), 3);
/// assert_eq!(formula.dimacs(Default::default()), "p cnf 2 3\n1 -2 0\n1 2 0\n-1 -2 0\n");
/// ```
#[derive(Clone, Debug)]
pub struct Formula {
    header: String,
    pool: VarPool,
    constrs: Vec<Constraint>,
    policy: InsertionPolicy,
    compressor: Compressor,
    n_clauses: Cell<Option<usize>>,
}

impl Default for Formula {
    fn default() -> Self {
        Self::with_policy(InsertionPolicy::default())
    }
}

impl Formula {
    /// Creates a new empty formula with the default insertion policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty formula with a given insertion policy
    pub fn with_policy(policy: InsertionPolicy) -> Self {
        Formula {
            header: String::new(),
            pool: VarPool::new(),
            constrs: vec![],
            policy,
            compressor: policy.compressor(),
            n_clauses: Cell::new(Some(0)),
        }
    }

    /// Changes the insertion policy used for all subsequent insertions
    pub fn set_policy(&mut self, policy: InsertionPolicy) {
        self.policy = policy;
        self.compressor = policy.compressor();
    }

    /// Gets the active insertion policy
    pub fn policy(&self) -> InsertionPolicy {
        self.policy
    }

    /// Gets the free-form header text of the formula
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Sets the header text of the formula
    pub fn set_header<S: Into<String>>(&mut self, header: S) {
        self.header = header.into();
    }

    /// Registers a variable, see [`VarPool::add_variable`]
    pub fn add_variable(&mut self, name: &str, description: Option<&str>) -> Var {
        self.pool.add_variable(name, description)
    }

    /// Gets the variable registered for a name
    pub fn var(&self, name: &str) -> Option<Var> {
        self.pool.var(name)
    }

    /// Gets the variable pool of the formula
    pub fn pool(&self) -> &VarPool {
        &self.pool
    }

    /// Iterates over the variable names in registration order
    pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
        self.pool.variables()
    }

    /// Gets the number of registered variables
    pub fn n_vars(&self) -> u32 {
        self.pool.n_vars()
    }

    /// Gets the number of clauses the formula expands to. The count is cached
    /// between insertions.
    pub fn len(&self) -> usize {
        if let Some(n) = self.n_clauses.get() {
            return n;
        }
        let n = self.constrs.iter().map(Constraint::n_clauses).sum();
        self.n_clauses.set(Some(n));
        n
    }

    /// Checks whether the formula expands to no clauses
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the number of symbolic constraints in the formula
    pub fn n_constraints(&self) -> usize {
        self.constrs.len()
    }

    /// Iterates over the symbolic constraints in insertion order
    pub fn constraints(&self) -> std::slice::Iter<'_, Constraint> {
        self.constrs.iter()
    }

    /// Lazily expands all constraints to clauses, in insertion order. Every
    /// call starts from the first clause.
    pub fn clauses(&self) -> impl Iterator<Item = Clause> + '_ {
        self.constrs.iter().flat_map(Constraint::clauses)
    }

    /// Compresses named literals under the active policy, registering
    /// variables if the policy allows it. Nothing is registered if the
    /// literals are rejected.
    pub fn compress<S: AsRef<str>>(&mut self, lits: &[(bool, S)]) -> Result<Vec<Lit>, Error> {
        let n_vars = self.pool.n_vars();
        let lits = lits
            .iter()
            .map(|(pol, name)| {
                (self.compressor.resolve)(&mut self.pool, name.as_ref()).map(|v| v.lit(*pol))
            })
            .collect::<Result<Vec<_>, _>>()
            .and_then(|lits| (self.compressor.check_lits)(&lits, &self.pool).map(|()| lits));
        if lits.is_err() {
            self.pool.truncate(n_vars);
        }
        lits
    }

    /// Turns a clause back into `(polarity, name)` pairs
    pub fn decompress_clause(&self, clause: &Clause) -> Result<Vec<(bool, &str)>, Error> {
        clause
            .iter()
            .map(|lit| {
                self.pool
                    .name(lit.var())
                    .map(|name| (lit.is_pos(), name))
                    .ok_or(Error::VarOutOfRange(lit.var()))
            })
            .collect()
    }

    fn push(&mut self, constr: Constraint) {
        log::trace!(target: targets::FORMULA, "adding constraint {constr:?}");
        match &constr {
            Constraint::Clause(_) | Constraint::Parity(_) => {
                let n = constr.n_clauses();
                self.n_clauses.set(self.n_clauses.get().map(|len| len + n));
            }
            // counting these might be expensive, postpone until needed
            Constraint::Card(_) | Constraint::PB(_) => self.n_clauses.set(None),
        }
        self.constrs.push(constr);
    }

    /// Compresses named literals, builds a constraint from them and adds it.
    /// Variables registered on the way are forgotten again if any step fails.
    fn insert<S, F>(&mut self, lits: &[(bool, S)], build: F) -> Result<(), Error>
    where
        S: AsRef<str>,
        F: FnOnce(Vec<Lit>) -> Result<Constraint, Error>,
    {
        let n_vars = self.pool.n_vars();
        let constr = self
            .compress(lits)
            .and_then(build)
            .and_then(|constr| check_size(&constr).map(|()| constr));
        match constr {
            Ok(constr) => {
                self.push(constr);
                Ok(())
            }
            Err(err) => {
                self.pool.truncate(n_vars);
                Err(err)
            }
        }
    }

    /// Adds a clause given by named literals
    pub fn add_clause<S: AsRef<str>>(&mut self, lits: &[(bool, S)]) -> Result<(), Error> {
        self.insert(lits, |lits| Ok(Constraint::Clause(Clause::from(lits))))
    }

    /// Adds a parity constraint: the number of true literals modulo two is
    /// `value`
    pub fn add_parity<S: AsRef<str>>(&mut self, lits: &[(bool, S)], value: bool) -> Result<(), Error> {
        self.insert(lits, |lits| Ok(Constraint::new_parity(lits, value)))
    }

    /// Adds the constraint that strictly less than `t` literals are true
    pub fn add_less_than<S: AsRef<str>>(&mut self, lits: &[(bool, S)], t: isize) -> Result<(), Error> {
        self.insert(lits, |lits| Ok(CardConstraint::new_lt(lits, t).into()))
    }

    /// Adds the constraint that at most `t` literals are true
    pub fn add_less_or_equal<S: AsRef<str>>(
        &mut self,
        lits: &[(bool, S)],
        t: isize,
    ) -> Result<(), Error> {
        self.insert(lits, |lits| Ok(CardConstraint::new_le(lits, t).into()))
    }

    /// Adds the constraint that strictly more than `t` literals are true
    pub fn add_greater_than<S: AsRef<str>>(
        &mut self,
        lits: &[(bool, S)],
        t: isize,
    ) -> Result<(), Error> {
        self.insert(lits, |lits| Ok(CardConstraint::new_gt(lits, t).into()))
    }

    /// Adds the constraint that at least `t` literals are true
    pub fn add_greater_or_equal<S: AsRef<str>>(
        &mut self,
        lits: &[(bool, S)],
        t: isize,
    ) -> Result<(), Error> {
        self.insert(lits, |lits| Ok(CardConstraint::new_ge(lits, t).into()))
    }

    /// Adds the constraint that exactly `value` literals are true
    pub fn add_equal_to<S: AsRef<str>>(
        &mut self,
        lits: &[(bool, S)],
        value: isize,
    ) -> Result<(), Error> {
        self.insert(lits, |lits| Ok(CardConstraint::new_eq(lits, value).into()))
    }

    /// Adds an unweighted linear constraint `sum of lits <op> bound`
    pub fn add_linear<S: AsRef<str>>(
        &mut self,
        lits: &[(bool, S)],
        op: LinearOp,
        bound: isize,
    ) -> Result<(), Error> {
        self.insert(lits, |lits| {
            let constr = match op {
                LinearOp::Lt => CardConstraint::new_lt(lits, bound),
                LinearOp::Le => CardConstraint::new_le(lits, bound),
                LinearOp::Gt => CardConstraint::new_gt(lits, bound),
                LinearOp::Ge => CardConstraint::new_ge(lits, bound),
                LinearOp::Eq => CardConstraint::new_eq(lits, bound),
                LinearOp::Ne => CardConstraint::new_ne(lits, bound),
            };
            Ok(constr.into())
        })
    }

    /// Adds a weighted linear constraint `sum of weight * var <op> bound`
    /// over named variables. Upper bounds are normalized to lower bounds over
    /// negated weights. [`LinearOp::Ne`] is not supported for weighted sums.
    ///
    /// The constraint is lowered by enumerating all assignments of its
    /// variables, it is therefore limited to [`pb::max_arity`] terms.
    ///
    /// # Errors
    ///
    /// [`Error::CoefficientOverflow`] if the normalized weights or bound do
    /// not fit an `isize`, e.g., `<=` with a bound of [`isize::MIN`].
    pub fn add_weighted_linear<S: AsRef<str>>(
        &mut self,
        terms: &[(isize, S)],
        op: LinearOp,
        bound: isize,
    ) -> Result<(), Error> {
        let lits: Vec<(bool, &str)> = terms.iter().map(|(_, name)| (true, name.as_ref())).collect();
        self.insert(&lits, |lits| {
            let weights = terms.iter().map(|(w, _)| *w);
            let negated = || {
                lits.iter()
                    .zip(weights.clone())
                    .map(|(&lit, w)| w.checked_neg().map(|w| (lit, w)))
                    .collect::<Option<Vec<_>>>()
                    .ok_or(Error::CoefficientOverflow)
            };
            let overflow = |b: Option<isize>| b.ok_or(Error::CoefficientOverflow);
            let constr = match op {
                LinearOp::Ge => PBConstraint::new_ge(lits.iter().copied().zip(weights), bound),
                LinearOp::Gt => PBConstraint::new_ge(
                    lits.iter().copied().zip(weights),
                    overflow(bound.checked_add(1))?,
                ),
                LinearOp::Eq => PBConstraint::new_eq(lits.iter().copied().zip(weights), bound),
                LinearOp::Le => {
                    PBConstraint::new_ge(negated()?, overflow(bound.checked_neg())?)
                }
                LinearOp::Lt => {
                    PBConstraint::new_ge(negated()?, overflow(1isize.checked_sub(bound))?)
                }
                LinearOp::Ne => return Err(Error::InvalidOperator(op.to_string())),
            };
            Ok(constr.into())
        })
    }

    /// Adds the constraint that at least half of the literals are true
    pub fn add_loose_majority<S: AsRef<str>>(&mut self, lits: &[(bool, S)]) -> Result<(), Error> {
        let n = lits.len() as isize;
        self.add_greater_or_equal(lits, (n + 1) / 2)
    }

    /// Adds the constraint that at most half of the literals are true
    pub fn add_loose_minority<S: AsRef<str>>(&mut self, lits: &[(bool, S)]) -> Result<(), Error> {
        let n = lits.len() as isize;
        self.add_less_or_equal(lits, n / 2)
    }

    /// Adds the constraint that more than half of the literals are true
    pub fn add_strict_majority<S: AsRef<str>>(&mut self, lits: &[(bool, S)]) -> Result<(), Error> {
        let n = lits.len() as isize;
        self.add_greater_or_equal(lits, n / 2 + 1)
    }

    /// Adds the constraint that less than half of the literals are true
    pub fn add_strict_minority<S: AsRef<str>>(&mut self, lits: &[(bool, S)]) -> Result<(), Error> {
        let n = lits.len() as isize;
        self.add_less_or_equal(lits, (n - 1).div_euclid(2))
    }

    /// Adds a constraint over already compressed literals. Unless the policy
    /// is [`InsertionPolicy::Unchecked`], all variables must be registered and
    /// the literals must be free of repetitions and opposite pairs.
    pub fn add_constraint(&mut self, constr: Constraint) -> Result<(), Error> {
        check_size(&constr)?;
        let lits: Vec<Lit> = constr.lits().collect();
        (self.compressor.check_vars)(&lits, &self.pool)?;
        (self.compressor.check_lits)(&lits, &self.pool)?;
        self.push(constr);
        Ok(())
    }

    /// Registers the variables of a unary mapping and adds its axioms.
    /// Variables are named `f(d)=r` with 1-based domain and range indices.
    pub fn unary_mapping(&mut self, spec: &MappingSpec) -> Result<UnaryMapping, Error> {
        mapping::unary(self, spec, |d, r| format!("f({})={}", d + 1, r + 1))
    }

    /// Same as [`Formula::unary_mapping`] with custom variable names
    pub fn unary_mapping_with_names<F>(
        &mut self,
        spec: &MappingSpec,
        names: F,
    ) -> Result<UnaryMapping, Error>
    where
        F: FnMut(usize, usize) -> String,
    {
        mapping::unary(self, spec, names)
    }

    /// Registers the bit variables of a binary mapping and adds its axioms.
    /// Variables are named `Y_{d,b}` with 1-based domain indices and 0-based
    /// bit indices, bit 0 being the least significant.
    pub fn binary_mapping(&mut self, spec: &MappingSpec) -> Result<BinaryMapping, Error> {
        mapping::binary(self, spec, |d, b| format!("Y_{{{},{}}}", d + 1, b))
    }

    /// Same as [`Formula::binary_mapping`] with custom variable names
    pub fn binary_mapping_with_names<F>(
        &mut self,
        spec: &MappingSpec,
        names: F,
    ) -> Result<BinaryMapping, Error>
    where
        F: FnMut(usize, usize) -> String,
    {
        mapping::binary(self, spec, names)
    }

    /// Writes the formula in DIMACS CNF format
    pub fn write_dimacs<W: io::Write>(
        &self,
        writer: &mut W,
        opts: fio::dimacs::Options,
    ) -> Result<(), io::Error> {
        fio::dimacs::write_formula(writer, self, opts)
    }

    /// Writes the formula to a DIMACS CNF file at a path. With feature
    /// `compression`, the output is compressed according to the file
    /// extension.
    pub fn write_dimacs_path<P: AsRef<Path>>(
        &self,
        path: P,
        opts: fio::dimacs::Options,
    ) -> Result<(), io::Error> {
        let mut writer = fio::open_compressed_uncompressed_write(path)?;
        self.write_dimacs(&mut writer, opts)?;
        io::Write::flush(&mut writer)
    }

    /// Renders the formula in DIMACS CNF format
    pub fn dimacs(&self, opts: fio::dimacs::Options) -> String {
        render(|buf| self.write_dimacs(buf, opts))
    }

    /// Writes the formula in OPB format
    pub fn write_opb<W: io::Write>(
        &self,
        writer: &mut W,
        opts: fio::opb::Options,
    ) -> Result<(), io::Error> {
        fio::opb::write_formula(writer, self, opts)
    }

    /// Renders the formula in OPB format
    pub fn opb(&self, opts: fio::opb::Options) -> String {
        render(|buf| self.write_opb(buf, opts))
    }

    /// Writes the formula as a LaTeX `align` block
    pub fn write_latex<W: io::Write>(
        &self,
        writer: &mut W,
        opts: fio::latex::Options,
    ) -> Result<(), io::Error> {
        fio::latex::write_formula(writer, self, opts)
    }

    /// Renders the formula as a LaTeX `align` block
    pub fn latex(&self, opts: fio::latex::Options) -> String {
        render(|buf| self.write_latex(buf, opts))
    }

    /// Checks whether an assignment satisfies every constraint
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        self.constrs.iter().all(|constr| constr.is_sat(assign))
    }

    /// Decides the formula with an external solver. Returns whether the
    /// formula is satisfiable and, if so, the solver's assignment.
    pub fn is_satisfiable(
        &self,
        solver: &mut external::Solver,
    ) -> anyhow::Result<(bool, Option<Assignment>)> {
        log::info!(
            target: targets::SOLVER,
            "solving formula with {} variables and {} clauses",
            self.n_vars(),
            self.len()
        );
        match solver.solve(self)? {
            SolverResult::Sat => {
                let mut assign = solver.solution()?;
                if let Some(max_var) = self.pool.max_var() {
                    assign = assign.truncate(max_var);
                }
                if !self.is_sat(&assign) {
                    anyhow::bail!(fio::SatSolverOutputError::Nonsolution);
                }
                Ok((true, Some(assign)))
            }
            SolverResult::Unsat => Ok((false, None)),
            SolverResult::Interrupted => {
                anyhow::bail!("the solver returned no answer")
            }
        }
    }
}

/// Renders a writer into a string. Writing to a `Vec` does not fail and all
/// writers only output valid UTF-8.
fn render<F>(write: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), io::Error>,
{
    let mut buf = vec![];
    write(&mut buf).expect("writing to a vector cannot fail");
    String::from_utf8(buf).expect("formula writers produce valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::{Formula, InsertionPolicy};
    use crate::{
        clause,
        instances::{Error, LinearOp},
        lit,
        types::{constraints::CardConstraint, Clause, Constraint, Lit},
        var,
    };

    fn names(names: &[&'static str]) -> Vec<(bool, &'static str)> {
        names.iter().map(|&n| (true, n)).collect()
    }

    #[test]
    fn insertion_registers_in_order() {
        let mut formula = Formula::new();
        formula.add_clause(&[(true, "b"), (false, "a")]).unwrap();
        formula.add_clause(&[(true, "c")]).unwrap();
        assert_eq!(formula.variables().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        let cls: Vec<Clause> = formula.clauses().collect();
        assert_eq!(cls, vec![clause![lit![0], !lit![1]], clause![lit![2]]]);
    }

    #[test]
    fn default_policy_rejects_malformed() {
        let mut formula = Formula::new();
        assert_eq!(
            formula.add_clause(&[(true, "a"), (true, "a")]),
            Err(Error::RepeatedLiteral(String::from("a")))
        );
        assert_eq!(
            formula.add_clause(&[(true, "a"), (false, "a")]),
            Err(Error::OppositeLiterals(String::from("a")))
        );
        assert_eq!(formula.n_constraints(), 0);
    }

    #[test]
    fn strict_policy_rejects_unknown() {
        let mut formula = Formula::with_policy(InsertionPolicy::Strict);
        assert_eq!(
            formula.add_clause(&[(true, "a")]),
            Err(Error::UnknownVariable(String::from("a")))
        );
        formula.add_variable("a", None);
        formula.add_clause(&[(true, "a")]).unwrap();
        assert_eq!(formula.len(), 1);
    }

    #[test]
    fn unchecked_policy_accepts_anything() {
        let mut formula = Formula::with_policy(InsertionPolicy::Unchecked);
        formula
            .add_clause(&[(true, "a"), (true, "a"), (false, "a")])
            .unwrap();
        assert_eq!(formula.n_vars(), 1);
        formula.set_policy(InsertionPolicy::Default);
        assert!(formula.add_clause(&[(true, "a"), (true, "a")]).is_err());
    }

    #[test]
    fn len_tracks_insertions() {
        let mut formula = Formula::new();
        assert!(formula.is_empty());
        formula.add_clause(&names(&["a", "b"])).unwrap();
        formula.add_parity(&names(&["a", "b", "c"]), true).unwrap();
        assert_eq!(formula.len(), 5);
        formula.add_less_than(&names(&["a", "b", "c"]), 2).unwrap();
        assert_eq!(formula.len(), 8);
        formula
            .add_weighted_linear(&[(3, "a"), (5, "b"), (7, "c")], LinearOp::Eq, 8)
            .unwrap();
        assert_eq!(formula.len(), 15);
        assert_eq!(formula.clauses().count(), 15);
    }

    #[test]
    fn linear_not_equal() {
        let mut formula = Formula::new();
        formula
            .add_linear(&names(&["a", "b", "c"]), LinearOp::Ne, 1)
            .unwrap();
        let constrs: Vec<&Constraint> = formula.constraints().collect();
        assert_eq!(
            constrs,
            vec![&Constraint::from(CardConstraint::new_ne(
                vec![lit![0], lit![1], lit![2]],
                1
            ))]
        );
        assert_eq!(formula.len(), 3);
    }

    #[test]
    fn weighted_not_equal_unsupported() {
        let mut formula = Formula::new();
        assert_eq!(
            formula.add_weighted_linear(&[(1, "a")], LinearOp::Ne, 1),
            Err(Error::InvalidOperator(String::from("!=")))
        );
    }

    #[test]
    fn parity_arity_guard() {
        let mut formula = Formula::new();
        let lits: Vec<(bool, String)> = (0..65).map(|i| (true, format!("x{i}"))).collect();
        assert_eq!(formula.add_parity(&lits, true), Err(Error::ArityTooLarge(65, 64)));
        let terms: Vec<(isize, String)> = (0..64).map(|i| (1, format!("x{i}"))).collect();
        assert_eq!(
            formula.add_weighted_linear(&terms, LinearOp::Ge, 1),
            Err(Error::ArityTooLarge(64, 63))
        );
    }

    #[test]
    fn card_clause_count_guard() {
        let mut formula = Formula::new();
        let lits: Vec<(bool, String)> = (0..64).map(|i| (true, format!("x{i}"))).collect();
        formula.add_less_than(&lits, 32).unwrap();
        assert_eq!(formula.len(), 1_832_624_140_942_590_534);
        assert_eq!(formula.n_vars(), 64);

        let lits: Vec<(bool, String)> = (0..100).map(|i| (true, format!("y{i}"))).collect();
        let max = CardConstraint::new_lt(std::iter::empty::<Lit>(), 50).max_arity();
        assert!(max < 100);
        assert_eq!(formula.add_less_than(&lits, 50), Err(Error::ArityTooLarge(100, max)));
        let max = CardConstraint::new_eq(std::iter::empty::<Lit>(), 50).max_arity();
        assert_eq!(
            formula.add_linear(&lits, LinearOp::Eq, 50),
            Err(Error::ArityTooLarge(100, max))
        );
        assert_eq!(formula.n_vars(), 64);
        assert_eq!(formula.var("y0"), None);
        assert_eq!(formula.n_constraints(), 1);

        let lits: Vec<_> = (0..100).map(|i| lit![i]).collect();
        formula.set_policy(InsertionPolicy::Unchecked);
        assert!(matches!(
            formula.add_constraint(CardConstraint::new_ge(lits, 50).into()),
            Err(Error::ArityTooLarge(100, _))
        ));
    }

    #[test]
    fn weighted_extreme_coefficients() {
        let mut formula = Formula::new();
        formula
            .add_weighted_linear(&[(isize::MAX, "a"), (1, "b")], LinearOp::Ge, 0)
            .unwrap();
        assert_eq!(formula.len(), 0);
        formula
            .add_weighted_linear(&[(isize::MAX, "a"), (1, "b")], LinearOp::Ge, isize::MAX)
            .unwrap();
        assert_eq!(formula.len(), 2);

        assert_eq!(
            formula.add_weighted_linear(&[(1, "c")], LinearOp::Le, isize::MIN),
            Err(Error::CoefficientOverflow)
        );
        assert_eq!(
            formula.add_weighted_linear(&[(isize::MIN, "c")], LinearOp::Le, 0),
            Err(Error::CoefficientOverflow)
        );
        assert_eq!(
            formula.add_weighted_linear(&[(1, "c")], LinearOp::Lt, isize::MIN + 1),
            Err(Error::CoefficientOverflow)
        );
        assert_eq!(
            formula.add_weighted_linear(&[(1, "c")], LinearOp::Gt, isize::MAX),
            Err(Error::CoefficientOverflow)
        );
        assert_eq!(formula.var("c"), None);
        assert_eq!(formula.n_constraints(), 2);

        formula
            .add_weighted_linear(&[(isize::MIN + 1, "c")], LinearOp::Le, isize::MIN + 1)
            .unwrap();
        assert_eq!(formula.len(), 3);
    }

    #[test]
    fn rejected_literals_register_nothing() {
        let mut formula = Formula::new();
        assert_eq!(
            formula.add_clause(&[(true, "a"), (true, "a")]),
            Err(Error::RepeatedLiteral(String::from("a")))
        );
        assert_eq!(formula.n_vars(), 0);
        assert_eq!(formula.var("a"), None);
        assert_eq!(
            formula.add_less_or_equal(&[(true, "b"), (true, "c"), (false, "b")], 1),
            Err(Error::OppositeLiterals(String::from("b")))
        );
        assert_eq!(formula.n_vars(), 0);
        assert_eq!(
            formula.compress(&[(true, "x"), (false, "x")]),
            Err(Error::OppositeLiterals(String::from("x")))
        );
        assert_eq!(formula.n_vars(), 0);

        formula.add_clause(&[(true, "d")]).unwrap();
        assert_eq!(
            formula.add_weighted_linear(&[(1, "e"), (2, "f")], LinearOp::Ne, 1),
            Err(Error::InvalidOperator(String::from("!=")))
        );
        assert_eq!(formula.variables().collect::<Vec<_>>(), vec!["d"]);
        assert_eq!(formula.add_variable("e", None), var![1]);
    }

    #[test]
    fn majority_thresholds() {
        let lits = names(&["a", "b", "c", "d", "e"]);
        let mut formula = Formula::new();
        formula.add_loose_majority(&lits).unwrap();
        formula.add_loose_minority(&lits).unwrap();
        formula.add_strict_majority(&lits).unwrap();
        formula.add_strict_minority(&lits).unwrap();
        let bounds: Vec<isize> = formula
            .constraints()
            .map(|c| match c {
                Constraint::Card(card) => card.bound(),
                _ => panic!("expected a cardinality constraint"),
            })
            .collect();
        assert_eq!(bounds, vec![3, 2, 3, 2]);
    }

    #[test]
    fn add_constraint_checks_vars() {
        let mut formula = Formula::new();
        formula.add_variable("a", None);
        assert_eq!(
            formula.add_constraint(clause![lit![0], lit![1]].into()),
            Err(Error::VarOutOfRange(var![1]))
        );
        formula.add_constraint(clause![!lit![0]].into()).unwrap();
        assert_eq!(
            formula.decompress_clause(&clause![!lit![0]]),
            Ok(vec![(false, "a")])
        );
    }

    #[test]
    fn header_roundtrip() {
        let mut formula = Formula::new();
        assert_eq!(formula.header(), "");
        formula.set_header("line one\nline two");
        assert_eq!(formula.header(), "line one\nline two");
    }
}
