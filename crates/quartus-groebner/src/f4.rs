//! The batched (F4) engine.
//!
//! Each degree bunch of critical pairs becomes one structured elimination:
//! the pairs' cofactor multiples are pulled through a per-slot cache of
//! previously reduced multiples ("simplify"), the monomial set is closed
//! under symbolic preprocessing, and the resulting sparse matrix is brought
//! to echelon form in four block passes. Rows that surface a new leading
//! monomial enter the basis through the updater; the rest refresh the cache.
//!
//! Only degree-compatible orders are accepted: the bunching is by total
//! degree, which must agree with the term order for extraction to be sound.

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use quartus_poly::{Monomial, MonomialOrder, SparsePoly};
use quartus_rings::traits::CoefficientRing;

use crate::basis::Basis;
use crate::buchberger::{
    preprocess, reduce_and_insert, unit_basis, HilbertTracker, PairOutcome, Preprocessed,
};
use crate::linalg::{better_pivot, eliminate, row_echelon, RowLayout, SparseRow};
use crate::pair::s_polynomial;
use crate::pairset::PairSet;
use crate::update::update_basis;
use crate::{GBResult, GBStats, GroebnerConfig, GroebnerError};

/// Bunches below this size take the one-pair-at-a-time path instead of a
/// matrix round. Smaller over non-field domains, whose per-row elimination
/// is costlier.
fn min_batch<R: CoefficientRing>() -> usize {
    if R::FIELD {
        8
    } else {
        3
    }
}

/// Per-slot cache of reduced multiples, most recently produced last.
///
/// Entry zero is always `(1, f_slot)` itself, so a cache walk terminates.
struct ReductionCache<R: CoefficientRing> {
    entries: Vec<Vec<(Monomial, SparsePoly<R>)>>,
}

impl<R: CoefficientRing> ReductionCache<R> {
    fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Seeds the cache line for a freshly inserted basis slot.
    fn seed(&mut self, handle: usize, poly: SparsePoly<R>) {
        debug_assert_eq!(handle, self.entries.len());
        let one = Monomial::one(poly.num_vars());
        self.entries.push(vec![(one, poly)]);
    }

    /// The "simplify" walk: reuse an exact or divisibility-compatible cached
    /// multiple of `f_slot`, most recent first, instead of recomputing.
    fn simplify(&self, slot: usize, mult: &Monomial) -> SparsePoly<R> {
        for (m, poly) in self.entries[slot].iter().rev() {
            if m == mult {
                return poly.clone();
            }
            if mult.is_divisible_by(m) {
                let rest = mult.div(m).expect("divisibility just checked");
                return poly.mul_monomial(&rest);
            }
        }
        unreachable!("cache entry zero has multiplier 1")
    }

    /// Records the reduced form of `mult * f_slot`, making it most recent.
    fn update(&mut self, slot: usize, mult: Monomial, poly: SparsePoly<R>) {
        let line = &mut self.entries[slot];
        if let Some(pos) = line.iter().position(|(m, _)| *m == mult) {
            line.remove(pos);
        }
        line.push((mult, poly));
    }
}

/// One matrix row in the making: which basis slot and cofactor produced it.
struct HPoly<R: CoefficientRing> {
    slot: usize,
    multiplier: Monomial,
    poly: SparsePoly<R>,
}

/// Computes a Gröbner basis by batched linear-algebra reduction.
///
/// # Errors
///
/// Rejects non-graded monomial orders with [`GroebnerError::UnsupportedOrder`].
pub fn f4<R>(
    generators: &[SparsePoly<R>],
    order: MonomialOrder,
    config: &GroebnerConfig,
) -> Result<GBResult<R>, GroebnerError>
where
    R: CoefficientRing + Send + Sync,
{
    if !order.is_graded() {
        return Err(GroebnerError::UnsupportedOrder(order));
    }
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
    let mut pairs = PairSet::graded(order, config.selection);
    let mut cache = ReductionCache::new();
    for g in gens {
        let poly = g.clone();
        let handle = update_basis(&mut basis, &mut pairs, g);
        cache.seed(handle, poly);
    }

    let mut tracker = config
        .hilbert_target
        .clone()
        .map(|target| HilbertTracker::new(target, num_vars));

    'main: while !pairs.is_empty() {
        let mut quota: Option<i64> = None;
        if let Some(t) = tracker.as_mut() {
            let Some((needed_degree, q)) = t.deficiency(&basis) else {
                stats.hilbert_pruned += pairs.drain_all();
                break 'main;
            };
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

        if bunch.len() < min_batch::<R>() {
            // small bunch: identical to the term-rewriting inner loop
            let mut pending = bunch.len();
            for pair in bunch {
                pending -= 1;
                if quota.is_some_and(|q| q <= 0) {
                    stats.hilbert_pruned += pending + 1;
                    break;
                }
                let (Some(fi), Some(fj)) = (basis.get(pair.i), basis.get(pair.j)) else {
                    continue;
                };
                let s = s_polynomial(fi, fj);
                match reduce_and_insert(&mut basis, &mut pairs, &s, &mut stats) {
                    PairOutcome::Zero => {}
                    PairOutcome::Unit => return Ok(unit_basis(num_vars, order, stats, true)),
                    PairOutcome::Added(handle) => {
                        cache.seed(handle, basis.get(handle).expect("just added").clone());
                        if let Some(t) = tracker.as_mut() {
                            t.invalidate();
                        }
                        if let Some(q) = quota.as_mut() {
                            *q -= 1;
                        }
                    }
                }
            }
            continue;
        }

        // --- matrix round ---

        // initial H set: both cofactor multiples of every pair, simplified
        let mut h_polys: Vec<HPoly<R>> = Vec::new();
        let mut seen: FxHashSet<(usize, Monomial)> = FxHashSet::default();
        let mut live_pairs = 0usize;
        for pair in &bunch {
            let (Some(fi), Some(fj)) = (basis.get(pair.i), basis.get(pair.j)) else {
                continue;
            };
            live_pairs += 1;
            for (slot, f) in [(pair.i, fi), (pair.j, fj)] {
                let lt = f.leading_monomial().expect("live slots are nonzero");
                let mult = pair.lcm.div(lt).expect("lcm divisible by parent lead");
                if seen.insert((slot, mult)) {
                    h_polys.push(HPoly {
                        slot,
                        multiplier: mult,
                        poly: cache.simplify(slot, &mult),
                    });
                }
            }
        }
        stats.pairs_processed += live_pairs;
        if h_polys.is_empty() {
            continue;
        }

        // symbolic preprocessing: close the monomial set under reduction
        let mut annihilated: FxHashSet<Monomial> = h_polys
            .iter()
            .map(|h| *h.poly.leading_monomial().expect("simplify keeps nonzero"))
            .collect();
        let mut known: FxHashSet<Monomial> = FxHashSet::default();
        let mut worklist: Vec<Monomial> = Vec::new();
        for h in &h_polys {
            for (m, _) in h.poly.terms() {
                if known.insert(*m) {
                    worklist.push(*m);
                }
            }
        }
        while let Some(m) = worklist.pop() {
            if annihilated.contains(&m) {
                continue;
            }
            let reducer = basis
                .live()
                .find(|(_, f)| m.is_divisible_by(f.leading_monomial().expect("nonzero")));
            let Some((slot, f)) = reducer else { continue };
            let mult = m
                .div(f.leading_monomial().expect("nonzero"))
                .expect("divisibility just checked");
            let h = cache.simplify(slot, &mult);
            debug_assert_eq!(h.leading_monomial(), Some(&m));
            annihilated.insert(m);
            for (m2, _) in h.terms() {
                if known.insert(*m2) {
                    worklist.push(*m2);
                }
            }
            h_polys.push(HPoly {
                slot,
                multiplier: mult,
                poly: h,
            });
        }

        // columns: annihilated (pivoting) monomials first, the rest moved
        // right, each block descending under the order
        let mut pivot_cols: Vec<Monomial> = annihilated.iter().copied().collect();
        let mut tail_cols: Vec<Monomial> =
            known.iter().filter(|m| !annihilated.contains(m)).copied().collect();
        pivot_cols.sort_by(|a, b| order.compare(b, a));
        tail_cols.sort_by(|a, b| order.compare(b, a));
        let pivot_count = pivot_cols.len();

        let mut col_of: FxHashMap<Monomial, u32> = FxHashMap::default();
        let mut monomial_of: Vec<Monomial> = Vec::with_capacity(known.len());
        for m in pivot_cols.into_iter().chain(tail_cols) {
            col_of.insert(m, monomial_of.len() as u32);
            monomial_of.push(m);
        }

        // assemble rows in parallel
        let entry_rows: Vec<Vec<(u32, R)>> = h_polys
            .par_iter()
            .map(|h| {
                let mut entries: Vec<(u32, R)> = h
                    .poly
                    .terms()
                    .iter()
                    .map(|(m, c)| (col_of[m], c.clone()))
                    .collect();
                entries.sort_by_key(|(c, _)| *c);
                entries
            })
            .collect();

        let mut fill = vec![0usize; monomial_of.len()];
        for row in &entry_rows {
            for (c, _) in row {
                fill[*c as usize] += 1;
            }
        }
        let layout = RowLayout::choose(&fill, entry_rows.len());

        let rows: Vec<SparseRow<R>> = entry_rows
            .par_iter()
            .map(|entries| SparseRow::from_entries(&layout, entries))
            .collect();

        debug!(
            rows = rows.len(),
            cols = monomial_of.len(),
            pivots = pivot_count,
            degree = bunch.first().map_or(0, |p| p.degree()),
            "matrix round"
        );

        // split into pivot rows [A|B] and the rest [C|D]; per pivot column
        // pick the row with least fill-in to the right block
        let mut pivot_for: Vec<Option<usize>> = vec![None; pivot_count];
        for (idx, row) in rows.iter().enumerate() {
            let lead = row.leading(&layout).expect("H rows are nonzero") as usize;
            debug_assert!(lead < pivot_count);
            pivot_for[lead] = Some(match pivot_for[lead] {
                None => idx,
                Some(best) => {
                    if better_pivot(row, &rows[best], &layout, lead as u32) {
                        idx
                    } else {
                        best
                    }
                }
            });
        }
        let chosen: FxHashSet<usize> = pivot_for.iter().flatten().copied().collect();

        let mut sources: Vec<(usize, Monomial)> = Vec::new();
        let mut pivot_rows: Vec<SparseRow<R>> = Vec::new();
        let mut pivot_leads: Vec<u32> = Vec::new();
        let mut cd_rows: Vec<SparseRow<R>> = Vec::new();
        for (idx, row) in rows.into_iter().enumerate() {
            if chosen.contains(&idx) {
                let lead = row.leading(&layout).expect("nonzero");
                sources.push((h_polys[idx].slot, h_polys[idx].multiplier));
                pivot_leads.push(lead);
                pivot_rows.push(row);
            } else {
                cd_rows.push(row);
            }
        }

        // pass 1: back-substitute within the pivot rows (A becomes diagonal)
        let by_lead: FxHashMap<u32, usize> = pivot_leads
            .iter()
            .enumerate()
            .map(|(i, &l)| (l, i))
            .collect();
        let mut lead_sequence: Vec<u32> = pivot_leads.clone();
        lead_sequence.sort_unstable();
        for &lead in lead_sequence.iter().rev() {
            let i = by_lead[&lead];
            let cols_to_clear: Vec<u32> = lead_sequence
                .iter()
                .copied()
                .filter(|&l| l > lead && pivot_rows[i].coeff(&layout, l).is_some())
                .collect();
            for l in cols_to_clear {
                let j = by_lead[&l];
                let (a, b) = index_pair(&mut pivot_rows, i, j);
                eliminate(a, b, l, &layout);
            }
        }

        // pass 2: annihilate C against the diagonalized pivot rows
        for row in &mut cd_rows {
            let present: Vec<u32> = lead_sequence
                .iter()
                .copied()
                .filter(|&l| row.coeff(&layout, l).is_some())
                .collect();
            for l in present {
                eliminate(row, &pivot_rows[by_lead[&l]], l, &layout);
            }
        }

        // pass 3: bring D to row-echelon form by generic elimination
        let cd_before = cd_rows.len();
        row_echelon(&mut cd_rows, &layout);
        stats.zero_reductions += cd_before - cd_rows.len();

        // pass 4: back-substitute the echelon D into B
        for row in &mut pivot_rows {
            for d_row in &cd_rows {
                let lead = d_row.leading(&layout).expect("echelon rows are nonzero");
                if row.coeff(&layout, lead).is_some() {
                    eliminate(row, d_row, lead, &layout);
                }
            }
        }

        // extraction: D rows carry new leading monomials
        let mut added = 0usize;
        for d_row in &cd_rows {
            let poly = row_to_poly(d_row, &layout, &monomial_of, num_vars, order);
            let candidate = poly.canonicalize();
            if candidate.is_constant() {
                return Ok(unit_basis(num_vars, order, stats, true));
            }
            debug_assert!(!annihilated
                .contains(candidate.leading_monomial().expect("nonzero")));
            let handle = update_basis(&mut basis, &mut pairs, candidate.clone());
            cache.seed(handle, candidate);
            added += 1;
        }

        // pivot rows refresh the cache line of the element they reduce
        for ((slot, mult), row) in sources.into_iter().zip(&pivot_rows) {
            let poly = row_to_poly(row, &layout, &monomial_of, num_vars, order);
            cache.update(slot, mult, poly);
        }

        if added > 0 {
            if let Some(t) = tracker.as_mut() {
                t.invalidate();
            }
            if let Some(q) = quota.as_mut() {
                *q -= added as i64;
            }
        }
    }

    Ok(GBResult {
        basis: basis.finalize(order),
        stats,
        from_rewriting: true,
    })
}

fn index_pair<T>(v: &mut [T], i: usize, j: usize) -> (&mut T, &T) {
    assert_ne!(i, j);
    if i < j {
        let (a, b) = v.split_at_mut(j);
        (&mut a[i], &b[0])
    } else {
        let (a, b) = v.split_at_mut(i);
        (&mut b[0], &a[j])
    }
}

fn row_to_poly<R: CoefficientRing>(
    row: &SparseRow<R>,
    layout: &RowLayout,
    monomial_of: &[Monomial],
    num_vars: usize,
    order: MonomialOrder,
) -> SparsePoly<R> {
    SparsePoly::new(
        row.to_entries(layout)
            .into_iter()
            .map(|(c, v)| (monomial_of[c as usize], v))
            .collect(),
        num_vars,
        order,
    )
}
