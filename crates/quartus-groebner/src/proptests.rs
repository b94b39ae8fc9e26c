//! Property-based tests over random small systems.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{buchberger, f4, groebner_basis, is_groebner_basis, GroebnerConfig};
    use quartus_poly::{Monomial, MonomialOrder, SparsePoly};
    use quartus_rings::zp::Zp;

    const P: u64 = 101;

    fn arb_poly() -> impl Strategy<Value = SparsePoly<Zp>> {
        proptest::collection::vec(((0u16..3, 0u16..3), 1i64..100), 1..5).prop_map(|terms| {
            SparsePoly::new(
                terms
                    .into_iter()
                    .map(|((a, b), c)| (Monomial::new(&[a, b]), Zp::from_signed(c, P)))
                    .collect(),
                2,
                MonomialOrder::Grevlex,
            )
        })
    }

    fn arb_system() -> impl Strategy<Value = Vec<SparsePoly<Zp>>> {
        proptest::collection::vec(arb_poly(), 1..4)
            .prop_filter("nonzero system", |gens| gens.iter().any(|g| !g.is_zero()))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn generators_reduce_to_zero(gens in arb_system()) {
            let order = MonomialOrder::Grevlex;
            let basis = groebner_basis(&gens, order).unwrap();
            let refs: Vec<&SparsePoly<Zp>> = basis.iter().collect();
            for g in &gens {
                prop_assert!(g.reduces_to_zero(&refs));
            }
        }

        #[test]
        fn result_is_self_consistent(gens in arb_system()) {
            let order = MonomialOrder::Grevlex;
            let basis = groebner_basis(&gens, order).unwrap();
            prop_assert!(is_groebner_basis(&gens, &basis, order));
        }

        #[test]
        fn result_is_idempotent(gens in arb_system()) {
            let order = MonomialOrder::Grevlex;
            let basis = groebner_basis(&gens, order).unwrap();
            let again = groebner_basis(&basis, order).unwrap();
            prop_assert_eq!(basis, again);
        }

        #[test]
        fn engines_agree(gens in arb_system()) {
            let order = MonomialOrder::Grevlex;
            let config = GroebnerConfig::default();
            let scalar = buchberger(&gens, order, &config).unwrap();
            let batched = f4(&gens, order, &config).unwrap();
            prop_assert_eq!(scalar.basis, batched.basis);
        }

        #[test]
        fn leading_terms_are_minimal(gens in arb_system()) {
            let order = MonomialOrder::Grevlex;
            let basis = groebner_basis(&gens, order).unwrap();
            for (i, a) in basis.iter().enumerate() {
                for (j, b) in basis.iter().enumerate() {
                    if i != j {
                        let (la, lb) = (a.leading_monomial().unwrap(), b.leading_monomial().unwrap());
                        prop_assert!(!la.is_divisible_by(lb));
                    }
                }
            }
        }
    }
}
