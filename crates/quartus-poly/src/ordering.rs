//! Monomial orderings.
//!
//! The choice of monomial ordering defines the leading term and therefore
//! the whole shape of a Gröbner basis computation. The batched engine and
//! degree-scheduled pair processing additionally require a *graded* order
//! (one that compares total degree first).

use std::cmp::Ordering;

use crate::monomial::Monomial;

/// A monomial ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MonomialOrder {
    /// Lexicographic order.
    ///
    /// x > y > z means x^a y^b z^c > x^d y^e z^f iff
    /// the first nonzero difference (a-d, b-e, c-f) is positive.
    Lex,

    /// Graded lexicographic order.
    ///
    /// First compares total degree, then uses lex as tiebreaker.
    Grlex,

    /// Graded reverse lexicographic order.
    ///
    /// First compares total degree, then uses reverse lex (last variable
    /// first) with the comparison reversed.
    #[default]
    Grevlex,
}

impl MonomialOrder {
    /// Compares two monomials according to this ordering.
    #[must_use]
    pub fn compare(&self, a: &Monomial, b: &Monomial) -> Ordering {
        match self {
            MonomialOrder::Lex => a.cmp_lex(b),
            MonomialOrder::Grlex => a.cmp_grlex(b),
            MonomialOrder::Grevlex => a.cmp_grevlex(b),
        }
    }

    /// True for orders that compare total degree first.
    ///
    /// Degree-compatible orders are the precondition for the batched engine
    /// and for degree-scheduled pair extraction.
    #[must_use]
    pub const fn is_graded(&self) -> bool {
        matches!(self, MonomialOrder::Grlex | MonomialOrder::Grevlex)
    }

    /// Returns a short name for the ordering.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            MonomialOrder::Lex => "lex",
            MonomialOrder::Grlex => "grlex",
            MonomialOrder::Grevlex => "grevlex",
        }
    }
}

impl std::fmt::Display for MonomialOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_order() {
        let order = MonomialOrder::Lex;
        let x = Monomial::var(0, 2);
        let y2 = Monomial::new(&[0, 2]);

        // x dominates any power of y in lex
        assert_eq!(order.compare(&x, &y2), Ordering::Greater);
        assert!(!order.is_graded());
    }

    #[test]
    fn test_graded_orders() {
        let x = Monomial::var(0, 2);
        let y2 = Monomial::new(&[0, 2]);

        for order in [MonomialOrder::Grlex, MonomialOrder::Grevlex] {
            assert_eq!(order.compare(&x, &y2), Ordering::Less);
            assert!(order.is_graded());
        }
    }

    #[test]
    fn test_grlex_vs_grevlex_tiebreak() {
        // x*z vs y^2: same degree; grlex says x*z > y^2 (lex on x),
        // grevlex says y^2 > x*z (z is penalized first)
        let xz = Monomial::new(&[1, 0, 1]);
        let y2 = Monomial::new(&[0, 2, 0]);
        assert_eq!(MonomialOrder::Grlex.compare(&xz, &y2), Ordering::Greater);
        assert_eq!(MonomialOrder::Grevlex.compare(&xz, &y2), Ordering::Less);
    }
}
