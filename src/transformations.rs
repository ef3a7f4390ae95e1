//! # Formula Transformations
//!
//! Reshuffling a formula into a logically equivalent one, up to renaming of
//! variables and flipping of polarities. Shuffled formulas are used to check
//! that solvers do not depend on the order of the input.

use crate::{
    instances::{Formula, InsertionPolicy},
    targets,
    types::{Clause, Var},
};

/// Reshuffles the expanded clauses of a formula.
///
/// - `var_order` lists the variables of `formula` in the order they are
///     registered in the new formula, keeping their names
/// - `flips[v]` flips the polarity of every literal of variable `v`
/// - `clause_order` lists the clause indices of `formula` in their new order
///
/// The header of the new formula is prefixed with `Reshuffling of:`.
///
/// # Panics
///
/// If `var_order` is not a permutation of the variables, `flips` does not
/// have one entry per variable or `clause_order` is not a permutation of the
/// clause indices.
pub fn shuffle_with(
    formula: &Formula,
    var_order: &[Var],
    flips: &[bool],
    clause_order: &[usize],
) -> Formula {
    let n_vars = formula.n_vars() as usize;
    assert_eq!(var_order.len(), n_vars, "variable order is not a permutation");
    assert_eq!(flips.len(), n_vars, "one polarity flip per variable required");
    assert_eq!(clause_order.len(), formula.len(), "clause order is not a permutation");

    let mut out = Formula::with_policy(InsertionPolicy::Unchecked);
    out.set_header(format!("Reshuffling of:\n\n{}", formula.header()));
    let mut substitution = vec![None; n_vars];
    for &var in var_order {
        let name = formula
            .pool()
            .name(var)
            .expect("variable order is not a permutation");
        let new = out.add_variable(name, formula.pool().description(var));
        substitution[var.idx()] = Some(new);
    }
    let substitution: Vec<Var> = substitution
        .into_iter()
        .map(|var| var.expect("variable order is not a permutation"))
        .collect();

    let clauses: Vec<Clause> = formula.clauses().collect();
    for &idx in clause_order {
        let clause: Clause = clauses[idx]
            .iter()
            .map(|lit| {
                substitution[lit.vidx()].lit(lit.is_pos() != flips[lit.vidx()])
            })
            .collect();
        // variables are all registered and the policy is unchecked
        out.add_constraint(clause.into())
            .expect("shuffled clause over registered variables");
    }
    out.set_policy(formula.policy());
    log::debug!(
        target: targets::FORMULA,
        "reshuffled formula with {} variables and {} clauses",
        out.n_vars(),
        out.len()
    );
    out
}

/// Randomly reshuffles a formula, see [`shuffle_with`]
#[cfg(feature = "rand")]
pub fn shuffle<R: rand::Rng + ?Sized>(formula: &Formula, rng: &mut R) -> Formula {
    use rand::seq::SliceRandom;

    let mut var_order: Vec<Var> = (0..formula.n_vars()).map(Var::new).collect();
    var_order.shuffle(rng);
    let flips: Vec<bool> = (0..formula.n_vars()).map(|_| rng.random_bool(0.5)).collect();
    let mut clause_order: Vec<usize> = (0..formula.len()).collect();
    clause_order.shuffle(rng);
    shuffle_with(formula, &var_order, &flips, &clause_order)
}

#[cfg(test)]
mod tests {
    use super::shuffle_with;
    use crate::{instances::Formula, var};

    fn formula() -> Formula {
        let mut formula = Formula::new();
        formula.set_header("three clauses");
        formula.add_clause(&[(true, "a"), (false, "b")]).unwrap();
        formula.add_clause(&[(true, "b"), (true, "c")]).unwrap();
        formula.add_clause(&[(false, "c")]).unwrap();
        formula
    }

    #[test]
    fn identity() {
        let formula = formula();
        let out = shuffle_with(
            &formula,
            &[var![0], var![1], var![2]],
            &[false; 3],
            &[0, 1, 2],
        );
        assert_eq!(out.header(), "Reshuffling of:\n\nthree clauses");
        assert_eq!(
            out.clauses().collect::<Vec<_>>(),
            formula.clauses().collect::<Vec<_>>()
        );
    }

    #[test]
    fn permute_and_flip() {
        let out = shuffle_with(
            &formula(),
            &[var![2], var![0], var![1]],
            &[true, false, false],
            &[2, 0, 1],
        );
        assert_eq!(out.variables().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(
            out.dimacs(crate::instances::fio::dimacs::Options {
                export_header: false,
                export_varnames: false,
            }),
            "p cnf 3 3\n-1 0\n-2 -3 0\n3 1 0\n"
        );
    }

    #[cfg(feature = "rand")]
    #[test]
    fn random_shuffle_preserves_size() {
        use rand::SeedableRng;

        let formula = formula();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let out = super::shuffle(&formula, &mut rng);
        assert_eq!(out.n_vars(), 3);
        assert_eq!(out.len(), 3);
        let mut sizes: Vec<usize> = out.clauses().map(|cl| cl.len()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 2, 2]);
    }
}
