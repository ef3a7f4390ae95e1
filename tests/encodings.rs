use cnfgen::{
    encodings::mapping::{Axioms, MappingSpec},
    instances::{Formula, LinearOp},
    types::{Assignment, Clause, TernaryVal},
};

/// All complete assignments over `n` variables
fn assignments(n: u32) -> impl Iterator<Item = Assignment> {
    (0..1u32 << n).map(move |bits| {
        (0..n)
            .map(|i| TernaryVal::from((bits >> i) & 1 == 1))
            .collect::<Vec<_>>()
            .into()
    })
}

fn holds(lhs: isize, op: LinearOp, rhs: isize) -> bool {
    match op {
        LinearOp::Lt => lhs < rhs,
        LinearOp::Le => lhs <= rhs,
        LinearOp::Gt => lhs > rhs,
        LinearOp::Ge => lhs >= rhs,
        LinearOp::Eq => lhs == rhs,
        LinearOp::Ne => lhs != rhs,
    }
}

fn models(formula: &Formula) -> usize {
    let clauses: Vec<Clause> = formula.clauses().collect();
    assert_eq!(clauses.len(), formula.len());
    assignments(formula.n_vars())
        .filter(|assign| {
            let sat = clauses.iter().all(|cl| cl.is_sat(assign));
            assert_eq!(sat, formula.is_sat(assign));
            sat
        })
        .count()
}

const OPS: [LinearOp; 6] = [
    LinearOp::Lt,
    LinearOp::Le,
    LinearOp::Gt,
    LinearOp::Ge,
    LinearOp::Eq,
    LinearOp::Ne,
];

#[test]
fn unweighted_linear_semantics() {
    let lits = [(true, "a"), (false, "b"), (true, "c"), (false, "d")];
    for op in OPS {
        for bound in -1..=5 {
            let mut formula = Formula::new();
            formula.add_linear(&lits, op, bound).unwrap();
            let clauses: Vec<Clause> = formula.clauses().collect();
            for assign in assignments(formula.n_vars()) {
                let count = lits
                    .iter()
                    .filter(|(pol, name)| {
                        let var = formula.var(name).unwrap();
                        assign.var_value(var) == TernaryVal::from(*pol)
                    })
                    .count() as isize;
                assert_eq!(
                    clauses.iter().all(|cl| cl.is_sat(&assign)),
                    holds(count, op, bound),
                    "sum {op} {bound} at {assign:?}"
                );
            }
        }
    }
}

#[test]
fn weighted_linear_semantics() {
    let terms = [(3, "a"), (-2, "b"), (5, "c"), (1, "d")];
    for op in OPS.into_iter().filter(|&op| op != LinearOp::Ne) {
        for bound in -3..=10 {
            let mut formula = Formula::new();
            formula.add_weighted_linear(&terms, op, bound).unwrap();
            let clauses: Vec<Clause> = formula.clauses().collect();
            assert_eq!(clauses.len(), formula.len());
            for assign in assignments(formula.n_vars()) {
                let sum: isize = terms
                    .iter()
                    .filter(|(_, name)| {
                        assign.var_value(formula.var(name).unwrap()) == TernaryVal::True
                    })
                    .map(|(w, _)| w)
                    .sum();
                assert_eq!(
                    clauses.iter().all(|cl| cl.is_sat(&assign)),
                    holds(sum, op, bound),
                    "weighted sum {op} {bound} at {assign:?}"
                );
                assert_eq!(formula.is_sat(&assign), holds(sum, op, bound));
            }
        }
    }
}

#[test]
fn parity_semantics() {
    for n in 0..=5 {
        for value in [false, true] {
            let names: Vec<(bool, String)> = (0..n).map(|i| (i % 2 == 0, format!("x{i}"))).collect();
            let mut formula = Formula::new();
            formula.add_parity(&names, value).unwrap();
            if n == 0 {
                // an empty sum is even
                assert_eq!(models(&formula), usize::from(!value));
            } else {
                assert_eq!(formula.len(), 1 << (n - 1));
                assert_eq!(models(&formula), 1 << (n - 1));
            }
        }
    }
}

#[test]
fn majority_semantics() {
    let lits: Vec<(bool, String)> = (0..5).map(|i| (true, format!("x{i}"))).collect();
    let mut formula = Formula::new();
    formula.add_strict_majority(&lits).unwrap();
    formula.add_loose_minority(&lits).unwrap();
    assert_eq!(models(&formula), 0);

    let mut formula = Formula::new();
    formula.add_loose_majority(&lits).unwrap();
    formula.add_strict_minority(&lits).unwrap();
    assert_eq!(models(&formula), 0);
}

fn php(pigeons: usize, holes: usize, axioms: Axioms) -> Formula {
    let mut formula = Formula::new();
    formula
        .unary_mapping(&MappingSpec::new(pigeons, holes).with_axioms(axioms))
        .unwrap();
    formula
}

const PHP: Axioms = Axioms {
    complete: true,
    functional: false,
    surjective: false,
    injective: true,
    nondecreasing: false,
};

#[test]
fn pigeonhole_models() {
    assert_eq!(models(&php(3, 2, PHP)), 0);
    // each hole goes to one pigeon or none, no pigeon without a hole
    assert_eq!(models(&php(2, 3, PHP)), 27 - 8 - 8 + 1);
    let bijection = Axioms {
        functional: true,
        surjective: true,
        ..PHP
    };
    assert_eq!(models(&php(3, 3, bijection)), 6);
    let monotone = Axioms {
        nondecreasing: true,
        ..bijection
    };
    assert_eq!(models(&php(3, 3, monotone)), 1);
}

#[test]
fn binary_pigeonhole_models() {
    let injective = Axioms {
        injective: true,
        ..Default::default()
    };
    let bphp = |pigeons, holes| {
        let mut formula = Formula::new();
        formula
            .binary_mapping(&MappingSpec::new(pigeons, holes).with_axioms(injective))
            .unwrap();
        formula
    };
    assert_eq!(models(&bphp(3, 2)), 0);
    assert_eq!(models(&bphp(2, 2)), 2);
    // injective maps of 2 pigeons into 3 holes
    assert_eq!(models(&bphp(2, 3)), 6);
    assert_eq!(models(&bphp(5, 4)), 0);
}
