//! The basis arena.
//!
//! Basis elements live in slots addressed by stable integer handles; critical
//! pairs store handles, never references. Removing an element leaves a
//! tombstone so handles held by pending pairs stay valid. Minimality and
//! reducedness are not maintained during the main loop; they are enforced by
//! the finalization pass here.

use quartus_poly::{MonomialOrder, SparsePoly};
use quartus_rings::traits::{CoefficientRing, Ring};

/// An arena of polynomial slots with tombstones.
pub struct Basis<R: Ring> {
    slots: Vec<Option<SparsePoly<R>>>,
}

impl<R: Ring> Basis<R> {
    /// Creates an empty basis.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Appends a polynomial, returning its handle.
    pub fn insert(&mut self, poly: SparsePoly<R>) -> usize {
        self.slots.push(Some(poly));
        self.slots.len() - 1
    }

    /// The polynomial at `handle`, unless tombstoned.
    #[must_use]
    pub fn get(&self, handle: usize) -> Option<&SparsePoly<R>> {
        self.slots.get(handle).and_then(Option::as_ref)
    }

    /// True when `handle` addresses a live slot.
    #[must_use]
    pub fn is_live(&self, handle: usize) -> bool {
        self.get(handle).is_some()
    }

    /// Tombstones a slot.
    pub fn remove(&mut self, handle: usize) {
        if let Some(slot) = self.slots.get_mut(handle) {
            *slot = None;
        }
    }

    /// Replaces the polynomial in a live slot wholesale.
    pub fn replace(&mut self, handle: usize, poly: SparsePoly<R>) {
        let slot = self.slots.get_mut(handle).expect("valid handle");
        assert!(slot.is_some(), "cannot replace a tombstone");
        *slot = Some(poly);
    }

    /// Number of slots ever allocated (tombstones included).
    #[must_use]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of live elements.
    #[must_use]
    pub fn len_live(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Iterates over live `(handle, polynomial)` entries.
    pub fn live(&self) -> impl Iterator<Item = (usize, &SparsePoly<R>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(h, slot)| slot.as_ref().map(|p| (h, p)))
    }

    /// Collects references to all live polynomials.
    #[must_use]
    pub fn live_polys(&self) -> Vec<&SparsePoly<R>> {
        self.live().map(|(_, p)| p).collect()
    }
}

impl<R: Ring> Default for Basis<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CoefficientRing> Basis<R> {
    /// Tombstones every live slot whose leading term is divisible by another
    /// live leading term, and returns the affected handles.
    ///
    /// Ties (equal leading monomials) keep the lower handle.
    pub fn minimize(&mut self) -> Vec<usize> {
        let live: Vec<(usize, quartus_poly::Monomial)> = self
            .live()
            .map(|(h, p)| (h, *p.leading_monomial().expect("live slots are nonzero")))
            .collect();

        let mut removed = Vec::new();
        for &(h, lm) in &live {
            let redundant = live.iter().any(|&(h2, lm2)| {
                h2 != h && (lm.is_properly_divisible_by(&lm2) || (lm2 == lm && h2 < h))
            });
            if redundant {
                self.remove(h);
                removed.push(h);
            }
        }
        removed
    }

    /// Fully inter-reduces the live elements in place.
    ///
    /// Assumes the basis is already minimal, so leading terms are untouched
    /// and a single pass leaves every tail irreducible.
    pub fn interreduce(&mut self) {
        let handles: Vec<usize> = self.live().map(|(h, _)| h).collect();
        for &h in &handles {
            let others: Vec<SparsePoly<R>> = self
                .live()
                .filter(|&(h2, _)| h2 != h)
                .map(|(_, p)| p.clone())
                .collect();
            let refs: Vec<&SparsePoly<R>> = others.iter().collect();
            let reduced = self.get(h).expect("live handle").normal_form(&refs);
            debug_assert!(!reduced.is_zero(), "minimal basis element reduced to zero");
            self.replace(h, reduced);
        }
    }

    /// Finalization: drop tombstones, minimize, sort by leading monomial for
    /// faster reduction, fully inter-reduce, canonicalize.
    #[must_use]
    pub fn finalize(mut self, order: MonomialOrder) -> Vec<SparsePoly<R>> {
        self.minimize();
        self.interreduce();

        let mut result: Vec<SparsePoly<R>> =
            self.slots.into_iter().flatten().map(|p| p.canonicalize()).collect();
        result.sort_by(|a, b| {
            order.compare(
                a.leading_monomial().expect("nonzero"),
                b.leading_monomial().expect("nonzero"),
            )
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartus_poly::Monomial;
    use quartus_rings::rationals::Q;

    fn poly(terms: &[(&[u16], i64)]) -> SparsePoly<Q> {
        SparsePoly::new(
            terms
                .iter()
                .map(|&(e, c)| (Monomial::new(e), Q::new(c, 1)))
                .collect(),
            2,
            MonomialOrder::Grevlex,
        )
    }

    #[test]
    fn test_handles_stable_across_tombstones() {
        let mut basis = Basis::new();
        let a = basis.insert(poly(&[(&[1, 0], 1)]));
        let b = basis.insert(poly(&[(&[0, 1], 1)]));
        basis.remove(a);
        assert!(!basis.is_live(a));
        assert!(basis.is_live(b));
        assert_eq!(basis.len_live(), 1);
        assert_eq!(basis.num_slots(), 2);
    }

    #[test]
    fn test_minimize_removes_divisible_leads() {
        let mut basis = Basis::new();
        basis.insert(poly(&[(&[1, 0], 1)])); // x
        let x2 = basis.insert(poly(&[(&[2, 0], 1), (&[0, 1], 1)])); // x^2 + y
        basis.insert(poly(&[(&[0, 1], 1)])); // y
        let removed = basis.minimize();
        assert_eq!(removed, vec![x2]);
        assert_eq!(basis.len_live(), 2);
    }

    #[test]
    fn test_finalize_reduces_and_sorts() {
        let mut basis = Basis::new();
        basis.insert(poly(&[(&[2, 0], 2), (&[0, 1], 2)])); // 2x^2 + 2y
        basis.insert(poly(&[(&[0, 1], 3)])); // 3y
        let out = basis.finalize(MonomialOrder::Grevlex);
        // y sorts first, x^2 is tail-reduced by y and made monic
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], poly(&[(&[0, 1], 1)]));
        assert_eq!(out[1], poly(&[(&[2, 0], 1)]));
    }
}
