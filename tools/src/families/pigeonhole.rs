//! Pigeonhole principle formulas: `pigeons` pigeons fly into `holes` holes,
//! no two of them sharing a hole. Unsatisfiable if and only if there are more
//! pigeons than holes.

use cnfgen::{
    encodings::mapping::{Axioms, MappingSpec},
    instances::{Error, Formula},
};

/// Pigeonhole principle with one variable `p_{p,h}` per pigeon and hole.
/// Optionally every pigeon flies into at most one hole (`functional`) and
/// every hole gets a pigeon (`onto`).
pub fn pigeonhole(
    pigeons: usize,
    holes: usize,
    functional: bool,
    onto: bool,
) -> Result<Formula, Error> {
    let mut formula = Formula::new();
    let kind = match (functional, onto) {
        (false, false) => "Pigeonhole principle",
        (true, false) => "Functional pigeonhole principle",
        (false, true) => "Onto pigeonhole principle",
        (true, true) => "Functional onto pigeonhole principle",
    };
    formula.set_header(format!(
        "{kind} formula for {pigeons} pigeons and {holes} holes"
    ));
    let spec = MappingSpec::new(pigeons, holes).with_axioms(Axioms {
        complete: true,
        functional,
        surjective: onto,
        injective: true,
        nondecreasing: false,
    });
    formula.unary_mapping_with_names(&spec, |p, h| format!("p_{{{},{}}}", p + 1, h + 1))?;
    Ok(formula)
}

/// Binary pigeonhole principle: every pigeon spells the index of its hole in
/// binary
pub fn binary_pigeonhole(pigeons: usize, holes: usize) -> Result<Formula, Error> {
    let mut formula = Formula::new();
    formula.set_header(format!(
        "Binary pigeonhole principle formula for {pigeons} pigeons and {holes} holes"
    ));
    let spec = MappingSpec::new(pigeons, holes).with_axioms(Axioms {
        injective: true,
        ..Default::default()
    });
    formula.binary_mapping(&spec)?;
    Ok(formula)
}

#[cfg(test)]
mod tests {
    use cnfgen::instances::fio::dimacs::Options;

    use super::{binary_pigeonhole, pigeonhole};

    #[test]
    fn php_three_two() {
        let formula = pigeonhole(3, 2, false, false).unwrap();
        assert_eq!(formula.n_vars(), 6);
        // 3 pigeon clauses and 3 hole clauses per hole
        assert_eq!(formula.len(), 9);
        assert_eq!(formula.variables().next(), Some("p_{1,1}"));
    }

    #[test]
    fn php_functional_onto_adds_clauses() {
        let formula = pigeonhole(3, 2, true, true).unwrap();
        // additionally 1 clause per pigeon and 1 per hole
        assert_eq!(formula.len(), 9 + 3 + 2);
    }

    #[test]
    fn php_header() {
        let formula = pigeonhole(2, 1, true, false).unwrap();
        assert!(formula
            .dimacs(Options::default())
            .starts_with("c Functional pigeonhole principle formula for 2 pigeons and 1 holes\np cnf 2 "));
    }

    #[test]
    fn bphp_three_two() {
        let formula = binary_pigeonhole(3, 2).unwrap();
        assert_eq!(formula.n_vars(), 3);
        // three pairs of pigeons must differ in their only bit
        assert_eq!(formula.len(), 6);
    }
}
