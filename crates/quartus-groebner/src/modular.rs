//! Modular lifting for exact coefficient domains.
//!
//! Over Z (and Q, after clearing denominators) the basis is computed over
//! increasing random prime moduli instead of the exact domain, when the shape
//! of the problem makes that worthwhile. Per-prime bases are ranked for
//! luckiness by their Hilbert series and leading-monomial sequences; matching
//! bases are Chinese-remaindered together, residues are recognized as
//! rationals by Farey reconstruction, and a candidate only returns after an
//! exact Gröbner verification. Lifting that makes no visible progress falls
//! back to the exact-domain engine; it never surfaces as an error.

use num_traits::{One, Zero};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use quartus_integers::primes::random_prime;
use quartus_integers::reconstruct::{crt_pair, crt_pair_u128, rational_reconstruct};
use quartus_integers::{Integer, Rational};
use quartus_poly::{Monomial, MonomialOrder, SparsePoly};
use quartus_rings::integers::Z;
use quartus_rings::rationals::Q;
use quartus_rings::traits::Ring;
use quartus_rings::zp::Zp;

use crate::buchberger::buchberger;
use crate::f4::f4;
use crate::hilbert::{cmp_by_hilbert_polynomial, HilbertSeries};
use crate::{is_groebner_basis, GBResult, GBStats, GroebnerConfig, GroebnerError};

/// Knobs of the lifting loop.
#[derive(Clone, Debug)]
pub struct LiftConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Bit width of the primes drawn (large first, to hit the generic case).
    pub prime_bits: u32,
    /// Total primes tried before giving up on the modular route.
    pub max_rounds: usize,
    /// Lucky combinations without a verified lift before giving up.
    pub max_lift_rounds: usize,
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            prime_bits: 59,
            max_rounds: 30,
            max_lift_rounds: 10,
        }
    }
}

/// Accumulated CRT residues of the best ("base") per-prime result.
///
/// Residues live in machine words while the running prime product fits in a
/// `u128`; the first prime that would overflow triggers a one-time widening
/// to arbitrary precision.
enum ResidueStore {
    Machine(Vec<Vec<(Monomial, u128)>>),
    Big(Vec<Vec<(Monomial, Integer)>>),
}

/// What one prime's result does to the accumulated state.
enum RoundOutcome {
    /// This prime's basis supersedes everything accumulated so far.
    Replace,
    /// This prime is unlucky; its result is dropped.
    Discard,
    /// Series, cardinality and leading monomials all agree: lift.
    Combine,
}

struct ModularBase {
    modulus: Integer,
    modulus_machine: Option<u128>,
    residues: ResidueStore,
    lead_monomials: Vec<Monomial>,
    series: HilbertSeries,
    num_vars: usize,
    order: MonomialOrder,
}

impl ModularBase {
    fn from_first_prime(
        basis: &[SparsePoly<Zp>],
        p: u64,
        series: HilbertSeries,
        num_vars: usize,
        order: MonomialOrder,
    ) -> Self {
        let residues = basis
            .iter()
            .map(|g| {
                g.terms()
                    .iter()
                    .map(|(m, c)| (*m, c.value() as u128))
                    .collect()
            })
            .collect();
        Self {
            modulus: Integer::from(p),
            modulus_machine: Some(p as u128),
            residues: ResidueStore::Machine(residues),
            lead_monomials: lead_sequence(basis),
            series,
            num_vars,
            order,
        }
    }

    /// Chinese-remainders a matching per-prime basis into the accumulator.
    fn combine(&mut self, basis: &[SparsePoly<Zp>], p: u64) {
        let widen = match self.modulus_machine {
            Some(m) => m.checked_mul(p as u128).is_none(),
            None => false,
        };
        if widen {
            // the running product no longer fits a machine double word
            if let ResidueStore::Machine(rows) = &self.residues {
                let rows = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|(m, r)| (*m, int_from_u128(*r)))
                            .collect()
                    })
                    .collect();
                self.residues = ResidueStore::Big(rows);
            }
            self.modulus_machine = None;
        }

        match &mut self.residues {
            ResidueStore::Machine(rows) => {
                let m1 = self.modulus_machine.expect("machine store has machine modulus");
                for (row, g) in rows.iter_mut().zip(basis) {
                    *row = merge_residues(row, g, |r1, r2| crt_pair_u128(*r1, m1, r2, p), 0u128);
                }
                self.modulus_machine = Some(m1 * p as u128);
            }
            ResidueStore::Big(rows) => {
                let m1 = self.modulus.clone();
                for (row, g) in rows.iter_mut().zip(basis) {
                    *row = merge_residues(row, g, |r1, r2| crt_pair(r1, &m1, r2, p), Integer::zero());
                }
            }
        }
        self.modulus = self.modulus.clone() * Integer::from(p);
    }

    /// Attempts Farey reconstruction of every accumulated coefficient.
    fn reconstruct(&self) -> Option<Vec<SparsePoly<Q>>> {
        let rows: Vec<Vec<(Monomial, Integer)>> = match &self.residues {
            ResidueStore::Machine(rows) => rows
                .iter()
                .map(|row| row.iter().map(|(m, r)| (*m, int_from_u128(*r))).collect())
                .collect(),
            ResidueStore::Big(rows) => rows.clone(),
        };

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let mut terms = Vec::with_capacity(row.len());
            for (m, r) in row {
                let c = rational_reconstruct(&r, &self.modulus)?;
                if !c.is_zero() {
                    terms.push((m, Q::from(c)));
                }
            }
            result.push(terms);
        }
        Some(
            result
                .into_iter()
                .map(|terms| SparsePoly::new(terms, self.num_vars, self.order))
                .collect(),
        )
    }
}

/// Computes a Gröbner basis over the integers.
///
/// Uses the modular route when the problem shape warrants it, the exact
/// engines otherwise.
pub fn groebner_z(
    generators: &[SparsePoly<Z>],
    order: MonomialOrder,
) -> Result<GBResult<Z>, GroebnerError> {
    let mut rng = ChaCha8Rng::seed_from_u64(LiftConfig::default().seed);
    groebner_z_with_rng(generators, order, &LiftConfig::default(), &mut rng)
}

/// [`groebner_z`] with an injected random source for the prime drawing.
pub fn groebner_z_with_rng<G: Rng + ?Sized>(
    generators: &[SparsePoly<Z>],
    order: MonomialOrder,
    lift: &LiftConfig,
    rng: &mut G,
) -> Result<GBResult<Z>, GroebnerError> {
    let num_vars = crate::validate_generators(generators)?;

    if !modular_worthwhile(generators, order) {
        return exact_z(generators, order);
    }

    let mut stats = GBStats::default();
    let mut base: Option<ModularBase> = None;
    let mut used: Vec<u64> = Vec::new();
    let mut lift_rounds = 0usize;

    for _ in 0..lift.max_rounds {
        let p = random_prime(rng, lift.prime_bits);
        if used.contains(&p) || !prime_keeps_leads(generators, p) {
            // unlucky draw: the reduction would degenerate a leading term
            continue;
        }

        let gens_p: Vec<SparsePoly<Zp>> = generators
            .iter()
            .map(|g| g.map_coeffs(|c| Zp::new(c.as_inner().mod_u64(p), p)))
            .collect();
        let config = GroebnerConfig::default();
        let result = if order.is_graded() {
            f4(&gens_p, order, &config)?
        } else {
            buchberger(&gens_p, order, &config)?
        };
        stats.absorb(&result.stats);
        if !result.from_rewriting {
            // the per-prime run bypassed the rewriting machinery, so the
            // modular route has no shortcut to offer
            debug!("per-prime fallback result, abandoning modular route");
            return exact_z(generators, order);
        }
        used.push(p);

        let mut basis = result.basis;
        basis.sort_by(|a, b| {
            order.compare(
                a.leading_monomial().expect("nonzero"),
                b.leading_monomial().expect("nonzero"),
            )
        });
        let series = HilbertSeries::of_monomial_ideal(&lead_sequence(&basis), num_vars);

        let outcome = match &mut base {
            None => RoundOutcome::Replace,
            Some(b) => {
                use std::cmp::Ordering;
                let verdict = cmp_by_hilbert_polynomial(&series, &b.series)
                    .then_with(|| basis.len().cmp(&b.lead_monomials.len()))
                    .then_with(|| {
                        cmp_lead_sequences(&lead_sequence(&basis), &b.lead_monomials, order)
                    });
                match verdict {
                    // strictly better Hilbert data: every prime so far was unlucky
                    Ordering::Less => RoundOutcome::Replace,
                    Ordering::Greater => RoundOutcome::Discard,
                    Ordering::Equal => RoundOutcome::Combine,
                }
            }
        };
        match outcome {
            RoundOutcome::Replace => {
                debug!(prime = p, "replacing accumulated base");
                base = Some(ModularBase::from_first_prime(&basis, p, series, num_vars, order));
            }
            RoundOutcome::Discard => {
                debug!(prime = p, "unlucky prime discarded");
                continue;
            }
            RoundOutcome::Combine => {
                base.as_mut().expect("combine implies a base").combine(&basis, p);
                lift_rounds += 1;
            }
        }

        let b = base.as_ref().expect("base set above");
        if let Some(rational) = b.reconstruct() {
            let candidate: Vec<SparsePoly<Z>> =
                rational.iter().map(clear_denominators).collect();
            if verify_over_z(generators, &candidate, order) {
                debug!(primes = used.len(), "lift verified");
                return Ok(GBResult {
                    basis: candidate,
                    stats,
                    from_rewriting: true,
                });
            }
        }

        if lift_rounds >= lift.max_lift_rounds {
            // lifting keeps pace with raw reductions instead of converging
            debug!("no convergence after {lift_rounds} lifts, going exact");
            break;
        }
    }

    let exact = exact_z(generators, order)?;
    stats.absorb(&exact.stats);
    Ok(GBResult {
        basis: exact.basis,
        stats,
        from_rewriting: exact.from_rewriting,
    })
}

/// Computes a Gröbner basis over the rationals by clearing denominators and
/// lifting over Z.
pub fn groebner_q(
    generators: &[SparsePoly<Q>],
    order: MonomialOrder,
) -> Result<GBResult<Q>, GroebnerError> {
    crate::validate_generators(generators)?;
    let z_gens: Vec<SparsePoly<Z>> = generators.iter().map(clear_denominators).collect();
    let result = groebner_z(&z_gens, order)?;
    Ok(GBResult {
        basis: result
            .basis
            .iter()
            .map(|g| g.map_coeffs(|c| Q(Rational::from_integer(c.as_inner().clone()))).canonicalize())
            .collect(),
        stats: result.stats,
        from_rewriting: result.from_rewriting,
    })
}

/// Small, graded-or-homogeneous problems go modular; everything else runs
/// the exact engines directly.
fn modular_worthwhile<R: Ring>(gens: &[SparsePoly<R>], order: MonomialOrder) -> bool {
    let num_vars = gens.first().map_or(0, SparsePoly::num_vars);
    let total_terms: usize = gens.iter().map(SparsePoly::len).sum();
    let small = gens.len() <= 24 && total_terms <= 600 && num_vars <= 8;
    let graded_or_homogeneous =
        order.is_graded() || gens.iter().all(SparsePoly::is_homogeneous);
    small && graded_or_homogeneous
}

fn exact_z(
    gens: &[SparsePoly<Z>],
    order: MonomialOrder,
) -> Result<GBResult<Z>, GroebnerError> {
    let config = GroebnerConfig::default();
    if order.is_graded() {
        f4(gens, order, &config)
    } else {
        buchberger(gens, order, &config)
    }
}

/// A prime is rejected outright when it kills a generator's leading
/// coefficient: the reduced system would have different leading structure.
fn prime_keeps_leads(gens: &[SparsePoly<Z>], p: u64) -> bool {
    gens.iter().all(|g| {
        g.leading_coeff()
            .is_none_or(|c| c.as_inner().mod_u64(p) != 0)
    })
}

fn lead_sequence<R: Ring>(basis: &[SparsePoly<R>]) -> Vec<Monomial> {
    basis
        .iter()
        .map(|g| *g.leading_monomial().expect("nonzero basis element"))
        .collect()
}

fn cmp_lead_sequences(
    a: &[Monomial],
    b: &[Monomial],
    order: MonomialOrder,
) -> std::cmp::Ordering {
    for (x, y) in a.iter().zip(b) {
        let c = order.compare(x, y);
        if c != std::cmp::Ordering::Equal {
            return c;
        }
    }
    a.len().cmp(&b.len())
}

/// Merges the accumulated residue row with a fresh per-prime polynomial over
/// the union of supports; either side may miss a monomial (residue zero).
fn merge_residues<T: Clone>(
    row: &[(Monomial, T)],
    g: &SparsePoly<Zp>,
    mut crt: impl FnMut(&T, u64) -> T,
    zero: T,
) -> Vec<(Monomial, T)> {
    let order = g.order();
    let mut out = Vec::with_capacity(row.len().max(g.len()));
    let (mut a, mut b) = (0usize, 0usize);
    let terms = g.terms();
    while a < row.len() || b < terms.len() {
        let from_row = b >= terms.len()
            || (a < row.len()
                && order.compare(&row[a].0, &terms[b].0) == std::cmp::Ordering::Greater);
        let both = a < row.len() && b < terms.len() && row[a].0 == terms[b].0;
        if both {
            out.push((row[a].0, crt(&row[a].1, terms[b].1.value())));
            a += 1;
            b += 1;
        } else if from_row {
            out.push((row[a].0, crt(&row[a].1, 0)));
            a += 1;
        } else {
            out.push((terms[b].0, crt(&zero, terms[b].1.value())));
            b += 1;
        }
    }
    out
}

/// Scales a rational polynomial to a primitive integer polynomial.
fn clear_denominators(g: &SparsePoly<Q>) -> SparsePoly<Z> {
    let den_lcm = g
        .terms()
        .iter()
        .fold(Integer::one(), |acc, (_, c)| acc.lcm(&c.denominator()));
    g.map_coeffs(|c| {
        let scaled = c.0.clone() * Rational::from_integer(den_lcm.clone());
        Z(scaled.to_integer().expect("denominators cleared"))
    })
    .canonicalize()
}

/// Exact verification: the original generators reduce to zero modulo the
/// candidate, and the candidate passes the S-polynomial test.
fn verify_over_z(
    generators: &[SparsePoly<Z>],
    candidate: &[SparsePoly<Z>],
    order: MonomialOrder,
) -> bool {
    if candidate.is_empty() {
        return generators.iter().all(SparsePoly::is_zero);
    }
    let candidate: Vec<SparsePoly<Z>> =
        candidate.iter().map(|g| g.with_order(order)).collect();
    is_groebner_basis(generators, &candidate, order)
}

fn int_from_u128(v: u128) -> Integer {
    Integer::from((v >> 64) as u64) * Integer::pow2(64) + Integer::from(v as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zp(terms: &[(&[u16], i64)], n: usize, order: MonomialOrder) -> SparsePoly<Z> {
        SparsePoly::new(
            terms
                .iter()
                .map(|&(e, c)| (Monomial::new(e), Z::new(c)))
                .collect(),
            n,
            order,
        )
    }

    #[test]
    fn test_modular_matches_exact_cyclic3() {
        let order = MonomialOrder::Grevlex;
        let gens = vec![
            zp(&[(&[1, 0, 0], 1), (&[0, 1, 0], 1), (&[0, 0, 1], 1)], 3, order),
            zp(
                &[(&[1, 1, 0], 1), (&[0, 1, 1], 1), (&[1, 0, 1], 1)],
                3,
                order,
            ),
            zp(&[(&[1, 1, 1], 1), (&[0, 0, 0], -1)], 3, order),
        ];
        let lifted = groebner_z(&gens, order).unwrap();
        let exact = exact_z(&gens, order).unwrap();
        assert_eq!(lifted.basis, exact.basis);
    }

    #[test]
    fn test_modular_simple_system() {
        let order = MonomialOrder::Grevlex;
        // x^2 - y, y^2 - 1
        let gens = vec![
            zp(&[(&[2, 0], 1), (&[0, 1], -1)], 2, order),
            zp(&[(&[0, 2], 1), (&[0, 0], -1)], 2, order),
        ];
        let result = groebner_z(&gens, order).unwrap();
        let refs: Vec<&SparsePoly<Z>> = result.basis.iter().collect();
        for g in &gens {
            assert!(g.reduces_to_zero(&refs));
        }
    }

    #[test]
    fn test_q_entry_is_monic() {
        let order = MonomialOrder::Grevlex;
        let half = Q::new(1, 2);
        let gens = vec![SparsePoly::new(
            vec![
                (Monomial::new(&[2, 0]), half),
                (Monomial::new(&[0, 1]), Q::new(-3, 4)),
            ],
            2,
            order,
        )];
        let result = groebner_q(&gens, order).unwrap();
        assert_eq!(result.basis.len(), 1);
        assert!(result.basis[0].leading_coeff().unwrap().is_one());
    }

    #[test]
    fn test_clear_denominators_primitive() {
        let order = MonomialOrder::Grevlex;
        let g = SparsePoly::new(
            vec![
                (Monomial::new(&[1, 0]), Q::new(2, 3)),
                (Monomial::new(&[0, 1]), Q::new(4, 9)),
            ],
            2,
            order,
        );
        let z = clear_denominators(&g);
        assert_eq!(z.leading_coeff(), Some(&Z::new(3)));
    }

    #[test]
    fn test_residue_merge_disjoint_supports() {
        let order = MonomialOrder::Grevlex;
        let g = SparsePoly::new(
            vec![(Monomial::new(&[1, 0]), Zp::new(4, 7))],
            2,
            order,
        );
        let row = vec![(Monomial::new(&[0, 1]), 2u128)];
        let merged = merge_residues(&row, &g, |r, v| crt_pair_u128(*r, 5, v, 7), 0u128);
        assert_eq!(merged.len(), 2);
        // x-term: 0 mod 5, 4 mod 7 -> 25; y-term: 2 mod 5, 0 mod 7 -> 7
        assert_eq!(merged[0], (Monomial::new(&[1, 0]), 25));
        assert_eq!(merged[1], (Monomial::new(&[0, 1]), 7));
    }
}
