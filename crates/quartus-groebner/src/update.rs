//! Incremental basis update with Gebauer-Möller pruning.
//!
//! Inserting a new element must leave the pair set holding exactly the
//! non-redundant critical pairs implied by the enlarged basis. Three filters
//! run here: the disjoint-support (product) criterion, the lcm-dominance
//! (chain) criterion among the freshly created pairs, and a purge of existing
//! pairs that the new leading term makes redundant. Pure bookkeeping; no
//! error conditions.

use quartus_poly::{Monomial, SparsePoly};
use quartus_rings::traits::CoefficientRing;

use crate::basis::Basis;
use crate::pair::CriticalPair;
use crate::pairset::PairSet;

/// Inserts `g` into the basis and updates the pair set.
///
/// Returns the handle of the new slot.
pub fn update_basis<R: CoefficientRing>(
    basis: &mut Basis<R>,
    pairs: &mut PairSet,
    g: SparsePoly<R>,
) -> usize {
    let t = *g.leading_monomial().expect("inserted element must be nonzero");

    struct Candidate {
        slot: usize,
        lcm: Monomial,
        coprime: bool,
    }

    let candidates: Vec<Candidate> = basis
        .live()
        .map(|(slot, f)| {
            let lt = f.leading_monomial().expect("live slots are nonzero");
            Candidate {
                slot,
                lcm: lt.lcm(&t),
                coprime: lt.is_coprime(&t),
            }
        })
        .collect();

    // Dominance pass over the new pairs. A candidate falls when another
    // candidate's lcm properly divides its lcm, or when it shares an lcm
    // with an earlier candidate (one representative per lcm class; a coprime
    // class member annihilates the whole class). Coprime candidates take
    // part in the filtering and are dropped afterwards.
    let survivors: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| {
            !candidates.iter().any(|d| {
                d.slot != c.slot
                    && (c.lcm.is_properly_divisible_by(&d.lcm)
                        || (d.lcm == c.lcm && (d.coprime || d.slot < c.slot)))
            })
        })
        .collect();

    // Purge existing pairs made redundant by t: those whose lcm t divides
    // without t realizing the lcm through either parent. The realization
    // check keeps pairs that g cannot actually simplify.
    pairs.retain(|p| {
        if !p.lcm.is_divisible_by(&t) {
            return true;
        }
        let lt_i = basis
            .get(p.i)
            .and_then(SparsePoly::leading_monomial);
        let lt_j = basis
            .get(p.j)
            .and_then(SparsePoly::leading_monomial);
        let realized_i = lt_i.is_some_and(|m| m.lcm(&t) == p.lcm);
        let realized_j = lt_j.is_some_and(|m| m.lcm(&t) == p.lcm);
        realized_i || realized_j
    });

    let new_handle = basis.num_slots();
    for c in survivors {
        if c.coprime {
            // disjoint support: the S-polynomial reduces to zero a priori
            continue;
        }
        let f = basis.get(c.slot).expect("candidate slot is live");
        pairs.insert(CriticalPair::new(c.slot, new_handle, f, &g));
    }

    let handle = basis.insert(g);
    debug_assert_eq!(handle, new_handle);
    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::SelectionStrategy;
    use quartus_poly::MonomialOrder;
    use quartus_rings::rationals::Q;

    fn poly(terms: &[(&[u16], i64)]) -> SparsePoly<Q> {
        SparsePoly::new(
            terms
                .iter()
                .map(|&(e, c)| (Monomial::new(e), Q::new(c, 1)))
                .collect(),
            3,
            MonomialOrder::Grevlex,
        )
    }

    fn fresh() -> (Basis<Q>, PairSet) {
        (
            Basis::new(),
            PairSet::flat(MonomialOrder::Grevlex, SelectionStrategy::Sugar),
        )
    }

    #[test]
    fn test_coprime_pairs_dropped() {
        let (mut basis, mut pairs) = fresh();
        update_basis(&mut basis, &mut pairs, poly(&[(&[2, 0, 0], 1)])); // x^2
        update_basis(&mut basis, &mut pairs, poly(&[(&[0, 3, 0], 1)])); // y^3
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_sharing_pairs_kept() {
        let (mut basis, mut pairs) = fresh();
        update_basis(&mut basis, &mut pairs, poly(&[(&[2, 1, 0], 1)])); // x^2*y
        update_basis(&mut basis, &mut pairs, poly(&[(&[1, 2, 0], 1)])); // x*y^2
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_chain_dominance_filters_new_pairs() {
        let (mut basis, mut pairs) = fresh();
        update_basis(&mut basis, &mut pairs, poly(&[(&[3, 0, 0], 1), (&[0, 0, 1], 1)])); // x^3 + z
        update_basis(&mut basis, &mut pairs, poly(&[(&[2, 0, 0], 1), (&[0, 1, 0], 1)])); // x^2 + y
        let before = pairs.len();
        assert_eq!(before, 1);
        // x + 1: lcm with x^2 is x^2, with x^3 is x^3; x^2 properly divides
        // x^3, so only the (x^2, new) pair is created
        update_basis(&mut basis, &mut pairs, poly(&[(&[1, 0, 0], 1), (&[0, 0, 0], 1)]));
        assert_eq!(pairs.len(), before + 1);
    }

    #[test]
    fn test_purge_keeps_realized_pairs() {
        let (mut basis, mut pairs) = fresh();
        // lts x^2*y and x*y^2: pair lcm x^2*y^2
        update_basis(&mut basis, &mut pairs, poly(&[(&[2, 1, 0], 1)]));
        update_basis(&mut basis, &mut pairs, poly(&[(&[1, 2, 0], 1)]));
        assert_eq!(pairs.len(), 1);

        // t = x*y divides x^2*y^2, and lcm(x^2*y, x*y) = x^2*y != lcm,
        // lcm(x*y^2, x*y) = x*y^2 != lcm -> the old pair is purged
        update_basis(&mut basis, &mut pairs, poly(&[(&[1, 1, 0], 1)]));
        let remaining: usize = pairs.len();
        // the purged pair is replaced by pairs against the new element
        assert_eq!(remaining, 2);
    }
}
