//! Property-based tests for the lifting arithmetic.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::modular::{inv_mod, mul_mod, pow_mod};
    use crate::reconstruct::{crt_pair, rational_reconstruct};
    use crate::{Integer, Rational};

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn gcd_divides_both(a in non_zero_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let g = a.gcd(&b);
            prop_assert!((a % g.clone()).is_zero());
            prop_assert!((b % g).is_zero());
        }

        #[test]
        fn euclid_rem_in_range(a in small_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let (q, r) = a.div_rem_euclid(&b);
            prop_assert!(!r.is_negative());
            prop_assert!(r < b.abs());
            prop_assert_eq!(q * b + r, a);
        }

        #[test]
        fn isqrt_brackets(a in 0i64..1_000_000) {
            let a = Integer::new(a);
            let r = a.isqrt();
            prop_assert!(r.clone() * r.clone() <= a);
            prop_assert!((r.clone() + Integer::new(1)).pow(2) > a);
        }

        #[test]
        fn modular_inverse_roundtrip(a in 1u64..1_000_002) {
            const P: u64 = 1_000_003;
            let inv = inv_mod(a, P).unwrap();
            prop_assert_eq!(mul_mod(a, inv, P), 1);
        }

        #[test]
        fn fermat_little_theorem(a in 1u64..1_000_002) {
            const P: u64 = 1_000_003;
            prop_assert_eq!(pow_mod(a, P - 1, P), 1);
        }

        #[test]
        fn crt_recovers_both_residues(x in 0i64..100_000) {
            let (p1, p2) = (1_000_003u64, 999_983u64);
            let x = Integer::new(x);
            let combined = crt_pair(&Integer::from(x.mod_u64(p1)), &Integer::from(p1), x.mod_u64(p2), p2);
            prop_assert_eq!(combined.mod_u64(p1), x.mod_u64(p1));
            prop_assert_eq!(combined.mod_u64(p2), x.mod_u64(p2));
        }

        #[test]
        fn farey_roundtrip(num in small_int(), den in non_zero_int()) {
            // modulus far above 2 * max(|num|, den)^2, so recovery is guaranteed
            let m = Integer::new(1_000_003) * Integer::new(999_983);
            let target = Rational::from_i64(num, den);
            prop_assume!(target.denominator().mod_u64(1_000_003) != 0);
            prop_assume!(target.denominator().mod_u64(999_983) != 0);

            // residue = num * den^{-1} mod m, built by CRT over the two primes
            let encode = |p: u64| {
                let n = target.numerator().mod_u64(p);
                let d = inv_mod(target.denominator().mod_u64(p), p).unwrap();
                mul_mod(n, d, p)
            };
            let residue = crt_pair(
                &Integer::from(encode(1_000_003)),
                &Integer::new(1_000_003),
                encode(999_983),
                999_983,
            );
            prop_assert_eq!(rational_reconstruct(&residue, &m), Some(target));
        }
    }
}
