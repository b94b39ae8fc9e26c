//! Critical pairs and selection strategies.
//!
//! A critical pair records one not-yet-processed S-polynomial by the slot
//! handles of its two parents, the lcm of their leading monomials, and a
//! "sugar" degree used by the sugar selection strategy. Handles may later
//! point at tombstoned slots; consumers skip such pairs.

use std::cmp::Ordering;

use quartus_poly::{Monomial, MonomialOrder, SparsePoly};
use quartus_rings::traits::{CoefficientRing, Ring};

/// A critical pair of basis slots `i < j`.
#[derive(Clone, Debug)]
pub struct CriticalPair {
    /// Lower slot handle.
    pub i: usize,
    /// Higher slot handle.
    pub j: usize,
    /// lcm of the parents' leading monomials.
    pub lcm: Monomial,
    /// Sugar degree: max écart of the parents plus the lcm degree.
    pub sugar: u32,
}

impl CriticalPair {
    /// Creates the pair for slots `i` and `j` holding `fi` and `fj`.
    #[must_use]
    pub fn new<R: Ring>(i: usize, j: usize, fi: &SparsePoly<R>, fj: &SparsePoly<R>) -> Self {
        let (i, j, fi, fj) = if i < j { (i, j, fi, fj) } else { (j, i, fj, fi) };
        let lcm = fi
            .leading_monomial()
            .expect("pair parent must be nonzero")
            .lcm(fj.leading_monomial().expect("pair parent must be nonzero"));
        let sugar = fi.ecart().max(fj.ecart()) + lcm.total_degree();
        Self { i, j, lcm, sugar }
    }

    /// The total degree of the pair's lcm.
    #[must_use]
    pub fn degree(&self) -> u32 {
        self.lcm.total_degree()
    }

    /// Normal selection: lcm under the active order, then slot indices.
    #[must_use]
    pub fn cmp_normal(&self, other: &Self, order: MonomialOrder) -> Ordering {
        order
            .compare(&self.lcm, &other.lcm)
            .then_with(|| (self.i, self.j).cmp(&(other.i, other.j)))
    }

    /// Sugar selection: sugar degree first, normal selection as tiebreak.
    #[must_use]
    pub fn cmp_sugar(&self, other: &Self, order: MonomialOrder) -> Ordering {
        self.sugar
            .cmp(&other.sugar)
            .then_with(|| self.cmp_normal(other, order))
    }
}

/// Which comparator drives pair extraction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SelectionStrategy {
    /// Smallest lcm under the active order first.
    Normal,
    /// Smallest sugar degree first; tends to keep intermediate results small.
    #[default]
    Sugar,
}

impl SelectionStrategy {
    /// Compares two pairs under this strategy.
    #[must_use]
    pub fn compare(&self, a: &CriticalPair, b: &CriticalPair, order: MonomialOrder) -> Ordering {
        match self {
            SelectionStrategy::Normal => a.cmp_normal(b, order),
            SelectionStrategy::Sugar => a.cmp_sugar(b, order),
        }
    }
}

/// Forms the S-polynomial of `fi` and `fj`.
///
/// Each parent is multiplied by the complementary cofactor of the leading
/// monomial lcm; the coefficients are cross-multiplied through the
/// coefficient lcm so the construction is denominator-free over Z as well.
#[must_use]
pub fn s_polynomial<R: CoefficientRing>(
    fi: &SparsePoly<R>,
    fj: &SparsePoly<R>,
) -> SparsePoly<R> {
    let (lm_i, lc_i) = fi.leading_term().expect("nonzero parent");
    let (lm_j, lc_j) = fj.leading_term().expect("nonzero parent");

    let lcm = lm_i.lcm(lm_j);
    let mi = lcm.div(lm_i).expect("lcm divisible by its factor");
    let mj = lcm.div(lm_j).expect("lcm divisible by its factor");

    let l = lc_i.lcm(lc_j);
    let ci = l.checked_div(lc_i).expect("coefficient lcm divisible");
    let cj = l.checked_div(lc_j).expect("coefficient lcm divisible");

    fi.mul_term(&mi, &ci).sub(&fj.mul_term(&mj, &cj))
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_pair_orientation_and_sugar() {
        let f = poly(&[(&[2, 0], 1), (&[0, 1], 1)]); // x^2 + y
        let g = poly(&[(&[1, 1], 1), (&[0, 0], 1)]); // xy + 1
        let p = CriticalPair::new(1, 0, &g, &f);
        assert_eq!((p.i, p.j), (0, 1));
        assert_eq!(p.lcm, Monomial::new(&[2, 1]));
        // écarts are 0 under a graded order, so sugar = deg lcm
        assert_eq!(p.sugar, 3);
    }

    #[test]
    fn test_s_polynomial_cancels_leads() {
        let f = poly(&[(&[2, 0], 1), (&[0, 1], 1)]);
        let g = poly(&[(&[1, 1], 1), (&[0, 0], 1)]);
        let s = s_polynomial(&f, &g);
        // y*f - x*g = y^2 - x
        assert_eq!(s, poly(&[(&[0, 2], 1), (&[1, 0], -1)]));
    }

    #[test]
    fn test_selection_comparators() {
        let order = MonomialOrder::Grevlex;
        let low = CriticalPair {
            i: 0,
            j: 1,
            lcm: Monomial::new(&[1, 1]),
            sugar: 5,
        };
        let high = CriticalPair {
            i: 0,
            j: 2,
            lcm: Monomial::new(&[2, 1]),
            sugar: 3,
        };
        assert_eq!(
            SelectionStrategy::Normal.compare(&low, &high, order),
            Ordering::Less
        );
        assert_eq!(
            SelectionStrategy::Sugar.compare(&low, &high, order),
            Ordering::Greater
        );
    }
}
