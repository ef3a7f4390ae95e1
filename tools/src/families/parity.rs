//! Parity principle formulas: the elements of a set of odd size cannot be
//! perfectly matched.

use cnfgen::instances::{Error, Formula};
use itertools::Itertools;

fn edge(i: usize, j: usize) -> String {
    let (i, j) = if i < j { (i, j) } else { (j, i) };
    format!("p_{{{},{}}}", i + 1, j + 1)
}

/// Parity principle on `n` elements with one variable `p_{i,j}` per pair
/// `i < j`, every element being matched exactly once
pub fn parity(n: usize) -> Result<Formula, Error> {
    let mut formula = Formula::new();
    formula.set_header(format!("Parity principle formula for {n} elements"));
    for (i, j) in (0..n).tuple_combinations() {
        formula.add_variable(&edge(i, j), None);
    }
    for i in 0..n {
        let lits: Vec<(bool, String)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (true, edge(i, j)))
            .collect();
        formula.add_equal_to(&lits, 1)?;
    }
    Ok(formula)
}

#[cfg(test)]
mod tests {
    use super::parity;

    #[test]
    fn three_elements() {
        let formula = parity(3).unwrap();
        assert_eq!(
            formula.variables().collect::<Vec<_>>(),
            vec!["p_{1,2}", "p_{1,3}", "p_{2,3}"]
        );
        // per element: one clause for at least one and one for at most one
        assert_eq!(formula.len(), 6);
    }

    #[test]
    fn single_element() {
        let formula = parity(1).unwrap();
        assert_eq!(formula.n_vars(), 0);
        assert_eq!(formula.len(), 1);
        assert!(formula.clauses().all(|cl| cl.is_empty()));
    }
}
