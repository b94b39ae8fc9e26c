//! Property-based tests for sparse polynomial arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::monomial::Monomial;
    use crate::multivar::SparsePoly;
    use crate::ordering::MonomialOrder;
    use quartus_rings::rationals::Q;
    use quartus_rings::traits::Ring;

    fn arb_poly() -> impl Strategy<Value = SparsePoly<Q>> {
        proptest::collection::vec(((0u16..4, 0u16..4, 0u16..4), -9i64..10), 0..6).prop_map(
            |terms| {
                SparsePoly::new(
                    terms
                        .into_iter()
                        .map(|((a, b, c), coeff)| (Monomial::new(&[a, b, c]), Q::new(coeff, 1)))
                        .collect(),
                    3,
                    MonomialOrder::Grevlex,
                )
            },
        )
    }

    proptest! {
        #[test]
        fn add_commutative(p in arb_poly(), q in arb_poly()) {
            prop_assert_eq!(p.add(&q), q.add(&p));
        }

        #[test]
        fn mul_distributes(p in arb_poly(), q in arb_poly(), r in arb_poly()) {
            prop_assert_eq!(p.mul(&q.add(&r)), p.mul(&q).add(&p.mul(&r)));
        }

        #[test]
        fn sub_self_is_zero(p in arb_poly()) {
            prop_assert!(p.sub(&p).is_zero());
        }

        #[test]
        fn terms_strictly_descending(p in arb_poly()) {
            let order = p.order();
            for w in p.terms().windows(2) {
                prop_assert_eq!(order.compare(&w[0].0, &w[1].0), std::cmp::Ordering::Greater);
            }
        }

        #[test]
        fn multiple_reduces_to_zero(p in arb_poly(), a in 0u16..3, b in 0u16..3, c in -5i64..6) {
            prop_assume!(!p.is_zero());
            prop_assume!(c != 0);
            let g = p.mul_term(&Monomial::new(&[a, b]), &Q::new(c, 1));
            prop_assert!(g.reduces_to_zero(&[&p]));
        }

        #[test]
        fn normal_form_is_irreducible(p in arb_poly(), q in arb_poly()) {
            prop_assume!(!q.is_zero());
            let nf = p.normal_form(&[&q]);
            let q_lm = q.leading_monomial().unwrap();
            for (m, _) in nf.terms() {
                prop_assert!(!m.is_divisible_by(q_lm));
            }
        }

        #[test]
        fn homogenize_is_homogeneous(p in arb_poly()) {
            let h = p.homogenize();
            prop_assert!(h.is_homogeneous());
            prop_assert_eq!(h.dehomogenize(), p);
        }

        #[test]
        fn canonicalize_is_monic(p in arb_poly()) {
            prop_assume!(!p.is_zero());
            let c = p.canonicalize();
            prop_assert!(c.leading_coeff().unwrap().is_one());
        }
    }
}
