//! The term-rewriting (Buchberger) engine.
//!
//! The classical main loop: extract the next bunch of critical pairs, form
//! and reduce their S-polynomials, insert the survivors through the basis
//! updater, and occasionally inter-reduce on a schedule controlled by the
//! injected minimization policy. When a target Hilbert series is supplied,
//! pairs are consumed in non-decreasing degree order and the series of the
//! partial leading-term ideal doubles as termination oracle and per-degree
//! work quota.

use tracing::debug;

use quartus_poly::{univariate_gcd, MonomialOrder, SparsePoly};
use quartus_rings::traits::CoefficientRing;

use crate::basis::Basis;
use crate::hilbert::HilbertSeries;
use crate::pair::s_polynomial;
use crate::pairset::PairSet;
use crate::update::update_basis;
use crate::{GBResult, GBStats, GroebnerConfig, GroebnerError, MinimizationPolicy};

/// Outcome of generator preprocessing.
pub(crate) enum Preprocessed<R: CoefficientRing> {
    /// A nonzero constant generator: the ideal is the whole ring.
    Unit,
    /// The univariate case, collapsed to a single GCD.
    Collapsed(SparsePoly<R>),
    /// Canonicalized, de-duplicated generators ready for the main loop.
    Ready(Vec<SparsePoly<R>>),
}

/// Canonicalizes the generators, drops zeros and mutually redundant
/// elements, and short-circuits the trivial cases.
pub(crate) fn preprocess<R: CoefficientRing>(
    generators: &[SparsePoly<R>],
    order: MonomialOrder,
) -> Preprocessed<R> {
    let mut gens: Vec<SparsePoly<R>> = generators
        .iter()
        .map(|g| g.with_order(order).canonicalize())
        .filter(|g| !g.is_zero())
        .collect();

    if gens.iter().any(SparsePoly::is_constant) {
        return Preprocessed::Unit;
    }

    // every generator in one variable: the ideal is principal
    if !gens.is_empty() {
        let vars: Vec<_> = gens.iter().map(SparsePoly::univariate_in).collect();
        if let Some(Some(v)) = vars.first() {
            if vars.iter().all(|w| *w == Some(*v)) {
                let mut gcd = gens[0].clone();
                for g in &gens[1..] {
                    gcd = univariate_gcd(&gcd, g);
                }
                if gcd.is_constant() {
                    return Preprocessed::Unit;
                }
                return Preprocessed::Collapsed(gcd.canonicalize());
            }
        }
    }

    // drop generators redundant by mutual pseudo-division
    let mut kept: Vec<Option<SparsePoly<R>>> = gens.drain(..).map(Some).collect();
    for i in 0..kept.len() {
        let candidate = kept[i].take().expect("not yet dropped");
        let others: Vec<&SparsePoly<R>> = kept.iter().flatten().collect();
        if others.is_empty() || !candidate.reduces_to_zero(&others) {
            kept[i] = Some(candidate);
        }
    }

    Preprocessed::Ready(kept.into_iter().flatten().collect())
}

/// Degree-scheduling state for a Hilbert-driven run.
pub(crate) struct HilbertTracker {
    target: HilbertSeries,
    num_vars: usize,
    cached: Option<Option<(u32, i64)>>,
}

impl HilbertTracker {
    pub(crate) fn new(target: HilbertSeries, num_vars: usize) -> Self {
        Self {
            target,
            num_vars,
            cached: None,
        }
    }

    /// Invalidates the cached deficiency after a basis change.
    pub(crate) fn invalidate(&mut self) {
        self.cached = None;
    }

    /// First degree where the current leading-term ideal falls short of the
    /// target, with the number of independent reductions still needed there.
    /// `None` means the leading-term structure is complete.
    pub(crate) fn deficiency<R: CoefficientRing>(
        &mut self,
        basis: &Basis<R>,
    ) -> Option<(u32, i64)> {
        if self.cached.is_none() {
            let lts: Vec<_> = basis
                .live()
                .map(|(_, p)| *p.leading_monomial().expect("live slots are nonzero"))
                .collect();
            let series = HilbertSeries::of_monomial_ideal(&lts, self.num_vars);
            self.cached = Some(series.deficiency(&self.target));
        }
        self.cached.expect("just computed")
    }
}

/// The result of reducing one S-polynomial against the live basis.
pub(crate) enum PairOutcome {
    Zero,
    Unit,
    Added(usize),
}

/// Reduces `s` modulo the live basis and inserts a nonzero survivor.
pub(crate) fn reduce_and_insert<R: CoefficientRing>(
    basis: &mut Basis<R>,
    pairs: &mut PairSet,
    s: &SparsePoly<R>,
    stats: &mut GBStats,
) -> PairOutcome {
    stats.pairs_processed += 1;
    let nf = s.normal_form(&basis.live_polys());
    if nf.is_zero() {
        stats.zero_reductions += 1;
        return PairOutcome::Zero;
    }
    if nf.is_constant() {
        return PairOutcome::Unit;
    }
    let nf = nf.canonicalize();
    debug!(
        degree = nf.total_degree(),
        terms = nf.len(),
        live = basis.len_live(),
        "basis grows"
    );
    PairOutcome::Added(update_basis(basis, pairs, nf))
}

/// The singleton basis `{1}` for the unit ideal.
pub(crate) fn unit_basis<R: CoefficientRing>(
    num_vars: usize,
    order: MonomialOrder,
    stats: GBStats,
    from_rewriting: bool,
) -> GBResult<R> {
    GBResult {
        basis: vec![SparsePoly::one(num_vars, order)],
        stats,
        from_rewriting,
    }
}

/// Computes a Gröbner basis by the term-rewriting algorithm.
///
/// Honors the config's selection strategy, minimization policy, and optional
/// Hilbert target. With a target, callers must arrange a homogeneous ideal
/// (the public entry point homogenizes) so degree extraction is monotone.
pub fn buchberger<R: CoefficientRing>(
    generators: &[SparsePoly<R>],
    order: MonomialOrder,
    config: &GroebnerConfig,
) -> Result<GBResult<R>, GroebnerError> {
    let num_vars = crate::validate_generators(generators)?;
    let mut stats = GBStats::default();

    let gens = match preprocess(generators, order) {
        Preprocessed::Unit => return Ok(unit_basis(num_vars, order, stats, false)),
        Preprocessed::Collapsed(g) => {
            return Ok(GBResult {
                basis: vec![g],
                stats,
                from_rewriting: false,
            })
        }
        Preprocessed::Ready(gens) => gens,
    };

    let mut basis = Basis::new();
    let mut pairs = if config.hilbert_target.is_some() {
        PairSet::graded(order, config.selection)
    } else {
        PairSet::flat(order, config.selection)
    };
    for g in gens {
        update_basis(&mut basis, &mut pairs, g);
    }

    let mut tracker = config
        .hilbert_target
        .clone()
        .map(|target| HilbertTracker::new(target, num_vars));
    let mut since_minimize = 0usize;

    'main: while !pairs.is_empty() {
        let mut quota: Option<i64> = None;
        if let Some(t) = tracker.as_mut() {
            let Some((needed_degree, q)) = t.deficiency(&basis) else {
                // leading-term structure complete: oracle terminates the loop
                stats.hilbert_pruned += pairs.drain_all();
                break 'main;
            };
            // pairs below the needed degree cannot contribute new leads
            while pairs.min_degree().is_some_and(|d| d < needed_degree) {
                stats.hilbert_pruned += pairs.extract_next().len();
            }
            if pairs.is_empty() {
                break 'main;
            }
            if pairs.min_degree() == Some(needed_degree) {
                quota = Some(q);
            }
        }

        let bunch = pairs.extract_next();
        let mut pending = bunch.len();
        for pair in bunch {
            pending -= 1;
            if quota.is_some_and(|q| q <= 0) {
                // the quota for this degree is met: the rest must reduce to zero
                stats.hilbert_pruned += pending + 1;
                break;
            }
            let (Some(fi), Some(fj)) = (basis.get(pair.i), basis.get(pair.j)) else {
                continue; // originating slot tombstoned
            };
            let s = s_polynomial(fi, fj);
            match reduce_and_insert(&mut basis, &mut pairs, &s, &mut stats) {
                PairOutcome::Zero => {}
                PairOutcome::Unit => return Ok(unit_basis(num_vars, order, stats, true)),
                PairOutcome::Added(_) => {
                    if let Some(t) = tracker.as_mut() {
                        t.invalidate();
                    }
                    if let Some(q) = quota.as_mut() {
                        *q -= 1;
                    }
                    since_minimize += 1;
                    if let MinimizationPolicy::EveryN(n) = config.minimization {
                        if since_minimize >= n.max(1) {
                            since_minimize = 0;
                            basis.minimize();
                            basis.interreduce();
                            pairs.retain(|p| basis.is_live(p.i) && basis.is_live(p.j));
                        }
                    }
                }
            }
        }
    }

    Ok(GBResult {
        basis: basis.finalize(order),
        stats,
        from_rewriting: true,
    })
}
