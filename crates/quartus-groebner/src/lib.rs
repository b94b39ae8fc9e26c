//! # quartus-groebner
//!
//! Gröbner bases over finite fields, the integers and the rationals.
//!
//! Two engines share one critical-pair state machine: the term-rewriting
//! (Buchberger) loop and the batched (F4) variant that reduces whole degree
//! bunches by structured sparse elimination. Exact coefficient domains go
//! through a modular lifting orchestrator (randomized primes, Hilbert-series
//! luckiness ranking, Chinese remaindering, Farey reconstruction, exact
//! verification). A supplied Hilbert series turns either engine into a
//! degree-scheduled computation with early termination.
//!
//! The main entry point is [`groebner_basis`], which dispatches on the
//! coefficient domain; [`buchberger`], [`f4`], [`hilbert_driven`] and
//! [`is_groebner_basis`] expose the machinery directly.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod basis;
pub mod buchberger;
pub mod f4;
pub mod hilbert;
pub mod linalg;
pub mod modular;
pub mod pair;
pub mod pairset;
pub mod update;

#[cfg(test)]
mod proptests;

use rayon::prelude::*;
use thiserror::Error;

use quartus_poly::{MonomialOrder, SparsePoly};
use quartus_rings::integers::Z;
use quartus_rings::rationals::Q;
use quartus_rings::traits::{CoefficientRing, Ring};
use quartus_rings::zp::Zp;

pub use crate::buchberger::buchberger;
pub use crate::f4::f4;
pub use crate::hilbert::HilbertSeries;
pub use crate::modular::{groebner_q, groebner_z, groebner_z_with_rng, LiftConfig};
pub use crate::pair::SelectionStrategy;

/// Errors surfaced by the entry points. Everything else (unlucky primes,
/// overflowing prime products, non-converging lifts) resolves internally.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GroebnerError {
    /// No generators were supplied, so no ring can be inferred.
    #[error("empty generator list")]
    EmptyGenerators,

    /// Generators live in polynomial rings of different variable counts.
    #[error("generators disagree on variable count: {0} vs {1}")]
    MixedVariableCounts(usize, usize),

    /// Finite-field generators carry different moduli.
    #[error("generators carry different moduli: {0} vs {1}")]
    MixedModuli(u64, u64),

    /// The batched engine needs a degree-compatible order.
    #[error("a graded monomial order is required, got {0}")]
    UnsupportedOrder(MonomialOrder),
}

/// Diagnostic counters attached to every result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GBStats {
    /// S-polynomials formed and reduced (or batched into a matrix).
    pub pairs_processed: usize,
    /// Reductions that vanished.
    pub zero_reductions: usize,
    /// Pairs discarded by the Hilbert criterion.
    pub hilbert_pruned: usize,
}

impl GBStats {
    /// Accumulates another run's counters into this one.
    pub fn absorb(&mut self, other: &GBStats) {
        self.pairs_processed += other.pairs_processed;
        self.zero_reductions += other.zero_reductions;
        self.hilbert_pruned += other.hilbert_pruned;
    }
}

/// A computed basis with its diagnostics.
#[derive(Clone, Debug)]
pub struct GBResult<R: Ring> {
    /// The reduced, canonically scaled basis, sorted by leading monomial.
    pub basis: Vec<SparsePoly<R>>,
    /// Diagnostic counters.
    pub stats: GBStats,
    /// True when the rewriting machinery produced the result, false for
    /// shortcut paths (unit ideal, univariate collapse). The lifting
    /// orchestrator keys a heuristic off this flag.
    pub from_rewriting: bool,
}

/// When the main loop inter-reduces the whole basis.
///
/// The default is never: over-eager minimization costs quadratic work for
/// little reduction benefit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MinimizationPolicy {
    /// Only the finalization pass inter-reduces.
    #[default]
    Never,
    /// Inter-reduce after every `n` basis insertions.
    EveryN(usize),
}

/// Engine configuration in the style of the other solver crates: plain
/// fields, sensible defaults.
#[derive(Clone, Debug, Default)]
pub struct GroebnerConfig {
    /// Pair extraction comparator.
    pub selection: SelectionStrategy,
    /// Mid-loop inter-reduction schedule.
    pub minimization: MinimizationPolicy,
    /// Target series for Hilbert-driven termination and degree quotas.
    pub hilbert_target: Option<HilbertSeries>,
}

/// Checks the generators agree on a polynomial ring, returning its
/// variable count.
pub(crate) fn validate_generators<R: Ring>(
    generators: &[SparsePoly<R>],
) -> Result<usize, GroebnerError> {
    let Some(first) = generators.first() else {
        return Err(GroebnerError::EmptyGenerators);
    };
    let num_vars = first.num_vars();
    for g in generators {
        if g.num_vars() != num_vars {
            return Err(GroebnerError::MixedVariableCounts(num_vars, g.num_vars()));
        }
    }
    Ok(num_vars)
}

/// A coefficient domain with a Gröbner pipeline attached: finite fields run
/// the engines directly, exact domains go through the lifting orchestrator.
pub trait GroebnerDomain: CoefficientRing + Send + Sync {
    /// Domain-specific input validation beyond the generic checks.
    fn validate(generators: &[SparsePoly<Self>]) -> Result<(), GroebnerError> {
        let _ = generators;
        Ok(())
    }

    /// Computes the reduced Gröbner basis with diagnostics.
    fn compute(
        generators: &[SparsePoly<Self>],
        order: MonomialOrder,
    ) -> Result<GBResult<Self>, GroebnerError>;
}

impl GroebnerDomain for Zp {
    fn validate(generators: &[SparsePoly<Self>]) -> Result<(), GroebnerError> {
        let mut modulus = 0u64;
        for g in generators {
            for (_, c) in g.terms() {
                let m = c.modulus();
                if m == 0 {
                    continue;
                }
                if modulus == 0 {
                    modulus = m;
                } else if m != modulus {
                    return Err(GroebnerError::MixedModuli(modulus, m));
                }
            }
        }
        Ok(())
    }

    fn compute(
        generators: &[SparsePoly<Self>],
        order: MonomialOrder,
    ) -> Result<GBResult<Self>, GroebnerError> {
        let config = GroebnerConfig::default();
        if order.is_graded() {
            f4(generators, order, &config)
        } else {
            buchberger(generators, order, &config)
        }
    }
}

impl GroebnerDomain for Z {
    fn compute(
        generators: &[SparsePoly<Self>],
        order: MonomialOrder,
    ) -> Result<GBResult<Self>, GroebnerError> {
        groebner_z(generators, order)
    }
}

impl GroebnerDomain for Q {
    fn compute(
        generators: &[SparsePoly<Self>],
        order: MonomialOrder,
    ) -> Result<GBResult<Self>, GroebnerError> {
        groebner_q(generators, order)
    }
}

/// Computes the reduced Gröbner basis of the ideal generated by
/// `generators` under `order`, dispatching on the coefficient domain.
///
/// # Errors
///
/// Fails fast on an empty generator list, mismatched variable counts or
/// moduli, and (for the batched engine) non-graded orders.
pub fn groebner_basis<R: GroebnerDomain>(
    generators: &[SparsePoly<R>],
    order: MonomialOrder,
) -> Result<Vec<SparsePoly<R>>, GroebnerError> {
    groebner_basis_with_stats(generators, order).map(|r| r.basis)
}

/// [`groebner_basis`] returning the diagnostic counters as well.
pub fn groebner_basis_with_stats<R: GroebnerDomain>(
    generators: &[SparsePoly<R>],
    order: MonomialOrder,
) -> Result<GBResult<R>, GroebnerError> {
    validate_generators(generators)?;
    R::validate(generators)?;
    R::compute(generators, order)
}

/// Hilbert-driven computation against a precomputed target series.
///
/// Homogeneous generators run the degree-scheduled loop directly. Otherwise
/// the explicit two-phase pipeline applies (homogenize, solve, set the fresh
/// variable to one, re-reduce) and `target` must describe the homogenized
/// ideal.
pub fn hilbert_driven<R: CoefficientRing>(
    generators: &[SparsePoly<R>],
    order: MonomialOrder,
    target: &HilbertSeries,
) -> Result<GBResult<R>, GroebnerError> {
    validate_generators(generators)?;
    let config = GroebnerConfig {
        hilbert_target: Some(target.clone()),
        ..GroebnerConfig::default()
    };

    if generators.iter().all(SparsePoly::is_homogeneous) {
        return buchberger(generators, order, &config);
    }

    let homogenized: Vec<SparsePoly<R>> =
        generators.iter().map(SparsePoly::homogenize).collect();
    let solved = buchberger(&homogenized, order, &config)?;

    let mut affine = basis::Basis::new();
    for g in &solved.basis {
        let d = g.dehomogenize();
        if !d.is_zero() {
            affine.insert(d);
        }
    }
    Ok(GBResult {
        basis: affine.finalize(order),
        stats: solved.stats,
        from_rewriting: solved.from_rewriting,
    })
}

/// Verifies that `candidate` is a Gröbner basis of the ideal generated by
/// `ideal`: every generator reduces to zero modulo the candidate, and every
/// S-polynomial of the candidate reduces to zero.
#[must_use]
pub fn is_groebner_basis<R>(
    ideal: &[SparsePoly<R>],
    candidate: &[SparsePoly<R>],
    order: MonomialOrder,
) -> bool
where
    R: CoefficientRing + Send + Sync,
{
    let candidate: Vec<SparsePoly<R>> = candidate
        .iter()
        .map(|g| g.with_order(order))
        .filter(|g| !g.is_zero())
        .collect();
    if candidate.is_empty() {
        return ideal.iter().all(SparsePoly::is_zero);
    }
    let refs: Vec<&SparsePoly<R>> = candidate.iter().collect();

    let members = ideal
        .par_iter()
        .all(|g| g.with_order(order).reduces_to_zero(&refs));
    if !members {
        return false;
    }

    let index_pairs: Vec<(usize, usize)> = (0..candidate.len())
        .flat_map(|i| ((i + 1)..candidate.len()).map(move |j| (i, j)))
        .collect();
    index_pairs.par_iter().all(|&(i, j)| {
        pair::s_polynomial(&candidate[i], &candidate[j]).reduces_to_zero(&refs)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartus_poly::Monomial;

    fn qp(terms: &[(&[u16], i64)], n: usize, order: MonomialOrder) -> SparsePoly<Q> {
        SparsePoly::new(
            terms
                .iter()
                .map(|&(e, c)| (Monomial::new(e), Q::new(c, 1)))
                .collect(),
            n,
            order,
        )
    }

    fn cyclic3(order: MonomialOrder) -> Vec<SparsePoly<Q>> {
        vec![
            qp(&[(&[1, 0, 0], 1), (&[0, 1, 0], 1), (&[0, 0, 1], 1)], 3, order),
            qp(
                &[(&[1, 1, 0], 1), (&[0, 1, 1], 1), (&[1, 0, 1], 1)],
                3,
                order,
            ),
            qp(&[(&[1, 1, 1], 1), (&[0, 0, 0], -1)], 3, order),
        ]
    }

    #[test]
    fn test_membership_and_self_consistency() {
        let order = MonomialOrder::Grevlex;
        let gens = cyclic3(order);
        let basis = groebner_basis(&gens, order).unwrap();
        assert!(is_groebner_basis(&gens, &basis, order));
    }

    #[test]
    fn test_idempotence() {
        let order = MonomialOrder::Grevlex;
        let basis = groebner_basis(&cyclic3(order), order).unwrap();
        let again = groebner_basis(&basis, order).unwrap();
        assert_eq!(basis, again);
    }

    #[test]
    fn test_q_and_z_agree_on_cyclic3() {
        let order = MonomialOrder::Grevlex;
        let q_basis = groebner_basis(&cyclic3(order), order).unwrap();

        let z_gens: Vec<SparsePoly<Z>> = cyclic3(order)
            .iter()
            .map(|g| g.map_coeffs(|c| Z(c.numerator())))
            .collect();
        let z_basis = groebner_basis(&z_gens, order).unwrap();

        let z_lead: Vec<Monomial> = z_basis
            .iter()
            .map(|g| *g.leading_monomial().unwrap())
            .collect();
        let q_lead: Vec<Monomial> = q_basis
            .iter()
            .map(|g| *g.leading_monomial().unwrap())
            .collect();
        assert_eq!(z_lead, q_lead);
    }

    #[test]
    fn test_hilbert_driven_matches_plain() {
        let order = MonomialOrder::Grevlex;
        // homogeneous system: x^2 - yz, xy - z^2
        let gens = vec![
            qp(&[(&[2, 0, 0], 1), (&[0, 1, 1], -1)], 3, order),
            qp(&[(&[1, 1, 0], 1), (&[0, 0, 2], -1)], 3, order),
        ];
        let plain = buchberger(&gens, order, &GroebnerConfig::default()).unwrap();
        let lts: Vec<Monomial> = plain
            .basis
            .iter()
            .map(|g| *g.leading_monomial().unwrap())
            .collect();
        let target = HilbertSeries::of_monomial_ideal(&lts, 3);

        let driven = hilbert_driven(&gens, order, &target).unwrap();
        assert_eq!(driven.basis, plain.basis);
    }

    #[test]
    fn test_hilbert_driven_prunes() {
        let order = MonomialOrder::Grevlex;
        let gens = vec![
            qp(&[(&[2, 0, 0], 1), (&[0, 1, 1], -1)], 3, order),
            qp(&[(&[1, 1, 0], 1), (&[0, 0, 2], -1)], 3, order),
            qp(&[(&[0, 2, 0], 1), (&[1, 0, 1], -1)], 3, order),
        ];
        let plain = buchberger(&gens, order, &GroebnerConfig::default()).unwrap();
        let lts: Vec<Monomial> = plain
            .basis
            .iter()
            .map(|g| *g.leading_monomial().unwrap())
            .collect();
        let target = HilbertSeries::of_monomial_ideal(&lts, 3);

        let driven = hilbert_driven(&gens, order, &target).unwrap();
        assert_eq!(driven.basis, plain.basis);
        assert!(driven.stats.hilbert_pruned > 0);
    }

    #[test]
    fn test_mixed_variable_counts_rejected() {
        let order = MonomialOrder::Grevlex;
        let gens = vec![
            qp(&[(&[1, 0], 1)], 2, order),
            qp(&[(&[1, 0, 0], 1)], 3, order),
        ];
        assert_eq!(
            groebner_basis(&gens, order),
            Err(GroebnerError::MixedVariableCounts(2, 3))
        );
    }

    #[test]
    fn test_mixed_moduli_rejected() {
        let order = MonomialOrder::Grevlex;
        let gens = vec![
            SparsePoly::new(vec![(Monomial::new(&[1, 0]), Zp::new(1, 7))], 2, order),
            SparsePoly::new(vec![(Monomial::new(&[0, 1]), Zp::new(1, 11))], 2, order),
        ];
        assert_eq!(
            groebner_basis(&gens, order),
            Err(GroebnerError::MixedModuli(7, 11))
        );
    }

    #[test]
    fn test_is_groebner_basis_rejects_partial() {
        let order = MonomialOrder::Grevlex;
        let gens = cyclic3(order);
        // the raw generators are not a Gröbner basis
        assert!(!is_groebner_basis(&gens, &gens, order));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            GroebnerError::EmptyGenerators.to_string(),
            "empty generator list"
        );
        assert_eq!(
            GroebnerError::UnsupportedOrder(MonomialOrder::Lex).to_string(),
            "a graded monomial order is required, got lex"
        );
    }
}
