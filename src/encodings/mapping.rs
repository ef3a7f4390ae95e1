//! # Mapping Encodings
//!
//! Encodings of a (partial) function between a finite domain and a finite
//! range, as used by pigeonhole-style formulas. Domain and range elements are
//! identified by their position, which is also their rank for the
//! nondecreasing axiom.
//!
//! - The unary encoding has one indicator variable per allowed pair `(d, r)`
//!   and expresses the axioms as cardinality constraints and clauses.
//! - The binary encoding gives every domain element `ceil(log2(|R|))` bits
//!   spelling the index of its image, the first `|R|` bit patterns in
//!   lexicographic order being the valid ones.
//!
//! Both encodings add their constraints to a [`Formula`] and return a handle
//! to look up the variables they registered.

use itertools::Itertools;

use crate::{
    instances::{Error, Formula},
    targets,
    types::{constraints::CardConstraint, Clause, Lit, RsHashSet, Var},
    utils,
};

/// The properties a mapping is required to have
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Axioms {
    /// Every domain element has an image
    pub complete: bool,
    /// Every domain element has at most one image
    pub functional: bool,
    /// Every range element has a pre-image
    pub surjective: bool,
    /// Every range element has at most one pre-image
    pub injective: bool,
    /// The mapping preserves the order of domain and range elements
    pub nondecreasing: bool,
}

/// Description of a mapping between `domain` and `range` elements
///
/// ```
/// use cnfgen::encodings::mapping::{Axioms, MappingSpec};
///
/// let spec = MappingSpec::new(3, 2)
///     .with_axioms(Axioms {
///         complete: true,
///         injective: true,
///         ..Default::default()
///     })
///     .with_sparsity([(0, 0), (1, 0), (1, 1), (2, 1)]);
/// assert!(spec.allows(1, 1));
/// assert!(!spec.allows(0, 1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingSpec {
    domain: usize,
    range: usize,
    sparsity: Option<RsHashSet<(usize, usize)>>,
    axioms: Axioms,
}

impl MappingSpec {
    /// Creates an unrestricted mapping without axioms
    pub fn new(domain: usize, range: usize) -> Self {
        MappingSpec {
            domain,
            range,
            sparsity: None,
            axioms: Axioms::default(),
        }
    }

    /// Sets the axioms the mapping has to satisfy
    #[must_use]
    pub fn with_axioms(mut self, axioms: Axioms) -> Self {
        self.axioms = axioms;
        self
    }

    /// Restricts the mapping to the given `(domain, range)` pairs
    #[must_use]
    pub fn with_sparsity<I>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        self.sparsity = Some(allowed.into_iter().collect());
        self
    }

    /// Gets the number of domain elements
    pub fn domain(&self) -> usize {
        self.domain
    }

    /// Gets the number of range elements
    pub fn range(&self) -> usize {
        self.range
    }

    /// Gets the axioms of the mapping
    pub fn axioms(&self) -> Axioms {
        self.axioms
    }

    /// Checks whether domain element `d` may be mapped to range element `r`
    pub fn allows(&self, d: usize, r: usize) -> bool {
        d < self.domain
            && r < self.range
            && self
                .sparsity
                .as_ref()
                .map_or(true, |allowed| allowed.contains(&(d, r)))
    }
}

/// Handle to the variables of a unary mapping
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnaryMapping {
    domain: usize,
    range: usize,
    vars: Vec<Option<Var>>,
}

impl UnaryMapping {
    /// Gets the indicator variable of `d -> r`, if the pair is allowed
    pub fn var(&self, d: usize, r: usize) -> Option<Var> {
        if d >= self.domain || r >= self.range {
            return None;
        }
        self.vars[d * self.range + r]
    }

    /// Iterates over the indicator literals of the images of `d`
    pub fn images(&self, d: usize) -> impl Iterator<Item = Lit> + '_ {
        (0..self.range).filter_map(move |r| self.var(d, r).map(Var::pos_lit))
    }

    /// Iterates over the indicator literals of the pre-images of `r`
    pub fn preimages(&self, r: usize) -> impl Iterator<Item = Lit> + '_ {
        (0..self.domain).filter_map(move |d| self.var(d, r).map(Var::pos_lit))
    }

    /// Gets the number of indicator variables
    pub fn n_vars(&self) -> usize {
        self.vars.iter().flatten().count()
    }
}

/// Registers the variables of a unary mapping in `formula` and adds the
/// constraints of its axioms, in the order complete, surjective, injective,
/// functional, nondecreasing
pub fn unary<F>(formula: &mut Formula, spec: &MappingSpec, mut names: F) -> Result<UnaryMapping, Error>
where
    F: FnMut(usize, usize) -> String,
{
    let mut vars = Vec::with_capacity(spec.domain * spec.range);
    for (d, r) in (0..spec.domain).cartesian_product(0..spec.range) {
        vars.push(if spec.allows(d, r) {
            Some(formula.add_variable(&names(d, r), None))
        } else {
            None
        });
    }
    let mapping = UnaryMapping {
        domain: spec.domain,
        range: spec.range,
        vars,
    };
    let axioms = spec.axioms;
    if axioms.complete {
        for d in 0..spec.domain {
            formula.add_constraint(CardConstraint::new_ge(mapping.images(d), 1).into())?;
        }
    }
    if axioms.surjective {
        for r in 0..spec.range {
            formula.add_constraint(CardConstraint::new_ge(mapping.preimages(r), 1).into())?;
        }
    }
    if axioms.injective {
        for r in 0..spec.range {
            formula.add_constraint(CardConstraint::new_le(mapping.preimages(r), 1).into())?;
        }
    }
    if axioms.functional {
        for d in 0..spec.domain {
            formula.add_constraint(CardConstraint::new_le(mapping.images(d), 1).into())?;
        }
    }
    if axioms.nondecreasing {
        for (a, b) in (0..spec.domain).tuple_combinations() {
            for (i, j) in (0..spec.range).cartesian_product(0..spec.range) {
                if i <= j {
                    continue;
                }
                if let (Some(ai), Some(bj)) = (mapping.var(a, i), mapping.var(b, j)) {
                    formula.add_constraint(Clause::from([ai.neg_lit(), bj.neg_lit()]).into())?;
                }
            }
        }
    }
    log::debug!(
        target: targets::MAPPING,
        "unary mapping {}x{} with {} variables and {:?}",
        spec.domain,
        spec.range,
        mapping.n_vars(),
        axioms
    );
    Ok(mapping)
}

/// Handle to the bit variables of a binary mapping
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMapping {
    domain: usize,
    range: usize,
    bits: u32,
    vars: Vec<Var>,
}

impl BinaryMapping {
    /// Gets the number of bits per domain element
    pub fn n_bits(&self) -> u32 {
        self.bits
    }

    /// Gets the variable of bit `b` of domain element `d`. Bit 0 is the least
    /// significant bit.
    pub fn bit_var(&self, d: usize, b: u32) -> Option<Var> {
        if d >= self.domain || b >= self.bits {
            return None;
        }
        Some(self.vars[d * self.bits as usize + b as usize])
    }

    /// Gets the bit pattern encoding range element `r`, most significant bit
    /// first
    pub fn image_bits(&self, r: usize) -> Option<Vec<bool>> {
        if r >= self.range {
            return None;
        }
        Some(pattern(r, self.bits))
    }

    /// Gets the clause excluding that `d` is mapped to the given bit pattern
    /// (most significant bit first)
    ///
    /// # Panics
    ///
    /// If `d` is not in the domain or the pattern length differs from
    /// [`BinaryMapping::n_bits`].
    pub fn forbid_bits(&self, d: usize, bits: &[bool]) -> Clause {
        assert_eq!(bits.len(), self.bits as usize);
        bits.iter()
            .zip((0..self.bits).rev())
            .map(|(&bit, b)| {
                let var = self.bit_var(d, b).expect("domain element out of range");
                var.lit(!bit)
            })
            .collect()
    }

    /// Gets the clause excluding that `d` is mapped to range element `r`
    pub fn forbid_image(&self, d: usize, r: usize) -> Option<Clause> {
        if d >= self.domain {
            return None;
        }
        Some(self.forbid_bits(d, &self.image_bits(r)?))
    }

    fn forbid_both(&self, first: (usize, usize), second: (usize, usize)) -> Option<Clause> {
        let mut cl = self.forbid_image(first.0, first.1)?;
        cl.extend(self.forbid_image(second.0, second.1)?);
        Some(cl)
    }
}

/// The `bits` bit pattern of `value`, most significant bit first
fn pattern(value: usize, bits: u32) -> Vec<bool> {
    (0..bits).rev().map(|b| (value >> b) & 1 == 1).collect()
}

/// Registers the bit variables of a binary mapping in `formula` and adds
/// clauses excluding invalid bit patterns, followed by the injective,
/// nondecreasing and sparsity clauses. Complete and functional are implied by
/// the encoding, a surjective binary mapping is not supported.
pub fn binary<F>(formula: &mut Formula, spec: &MappingSpec, mut names: F) -> Result<BinaryMapping, Error>
where
    F: FnMut(usize, usize) -> String,
{
    let axioms = spec.axioms;
    if axioms.surjective {
        return Err(Error::UnsupportedAxiom("surjective"));
    }
    let bits = utils::bits_needed(spec.range);
    let vars = (0..spec.domain)
        .cartesian_product(0..bits as usize)
        .map(|(d, b)| formula.add_variable(&names(d, b), None))
        .collect();
    let mapping = BinaryMapping {
        domain: spec.domain,
        range: spec.range,
        bits,
        vars,
    };
    let n_patterns = 1usize << bits;
    for d in 0..spec.domain {
        for invalid in spec.range..n_patterns {
            formula.add_constraint(mapping.forbid_bits(d, &pattern(invalid, bits)).into())?;
        }
    }
    let pairs = || (0..spec.domain).tuple_combinations::<(usize, usize)>();
    if axioms.injective {
        for r in 0..spec.range {
            for (d1, d2) in pairs() {
                if let Some(cl) = mapping.forbid_both((d1, r), (d2, r)) {
                    formula.add_constraint(cl.into())?;
                }
            }
        }
    }
    if axioms.nondecreasing {
        let range_pairs = (0..spec.range).tuple_combinations::<(usize, usize)>();
        for ((d1, d2), (r1, r2)) in pairs().cartesian_product(range_pairs) {
            if let Some(cl) = mapping.forbid_both((d1, r2), (d2, r1)) {
                formula.add_constraint(cl.into())?;
            }
        }
    }
    if spec.sparsity.is_some() {
        for (d, r) in (0..spec.domain).cartesian_product(0..spec.range) {
            if spec.allows(d, r) {
                continue;
            }
            if let Some(cl) = mapping.forbid_image(d, r) {
                formula.add_constraint(cl.into())?;
            }
        }
    }
    log::debug!(
        target: targets::MAPPING,
        "binary mapping {}x{} with {} bits per element and {:?}",
        spec.domain,
        spec.range,
        bits,
        axioms
    );
    Ok(mapping)
}
