//! Chinese remaindering and Farey (rational) reconstruction.
//!
//! The lifting orchestrator accumulates per-prime residues with `crt_pair`
//! (or its machine-width sibling while the running modulus still fits in a
//! `u128`) and periodically attempts to recognize the accumulated residues as
//! rationals of bounded height.

use num_traits::{One, Zero};

use crate::modular::{inv_mod, mul_mod, sub_mod};
use crate::{Integer, Rational};

/// Combines `x ≡ r1 (mod m1)` and `x ≡ r2 (mod m2)` into the unique
/// `0 <= x < m1*m2`.
///
/// # Panics
///
/// Panics if the moduli are not coprime.
#[must_use]
pub fn crt_pair(r1: &Integer, m1: &Integer, r2: u64, m2: u64) -> Integer {
    let r1_mod = r1.mod_u64(m2);
    let m1_mod = m1.mod_u64(m2);
    let inv = inv_mod(m1_mod, m2).expect("CRT moduli must be coprime");
    let t = mul_mod(sub_mod(r2, r1_mod, m2), inv, m2);
    r1.clone() + m1.clone() * Integer::from(t)
}

/// Machine-width CRT step: same contract as [`crt_pair`] for a running
/// modulus that still fits in a `u128`.
///
/// The caller must guarantee `m1 * m2` does not overflow `u128`; the result
/// is then exact.
#[must_use]
pub fn crt_pair_u128(r1: u128, m1: u128, r2: u64, m2: u64) -> u128 {
    let r1_mod = (r1 % m2 as u128) as u64;
    let m1_mod = (m1 % m2 as u128) as u64;
    let inv = inv_mod(m1_mod, m2).expect("CRT moduli must be coprime");
    let t = mul_mod(sub_mod(r2, r1_mod, m2), inv, m2) as u128;
    r1 + m1 * t
}

/// Maps a residue `0 <= r < m` into the symmetric range `(-m/2, m/2]`.
#[must_use]
pub fn symmetric(r: &Integer, m: &Integer) -> Integer {
    let two_r = Integer::new(2) * r.clone();
    if &two_r > m {
        r.clone() - m.clone()
    } else {
        r.clone()
    }
}

/// Farey reconstruction: recognizes a residue `c (mod m)` as a rational
/// `n/d` with `|n|, d <= floor(sqrt(m/2))`, if one exists.
///
/// Returns `None` when no rational of that height matches; callers retry with
/// a larger accumulated modulus.
#[must_use]
pub fn rational_reconstruct(c: &Integer, m: &Integer) -> Option<Rational> {
    let bound = (m.clone() / Integer::new(2)).isqrt();
    let (_, c) = c.div_rem_euclid(m);

    if c <= bound {
        return Some(Rational::from_integer(c));
    }

    let mut r0 = m.clone();
    let mut r1 = c;
    let mut t0 = Integer::zero();
    let mut t1 = Integer::one();

    while r1 > bound {
        let q = r0.clone() / r1.clone();
        let r2 = r0 - q.clone() * r1.clone();
        let t2 = t0 - q * t1.clone();
        (r0, r1) = (r1, r2);
        (t0, t1) = (t1, t2);
    }

    if t1.is_zero() {
        return None;
    }
    let (num, den) = if t1.is_negative() {
        (-r1, -t1)
    } else {
        (r1, t1)
    };
    if den > bound || den.is_zero() {
        return None;
    }
    if !num.gcd(&den).is_one() {
        return None;
    }
    Some(Rational::new(num, den))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crt_pair() {
        // x ≡ 2 (mod 3), x ≡ 3 (mod 5) → x = 8
        let x = crt_pair(&Integer::new(2), &Integer::new(3), 3, 5);
        assert_eq!(x.to_i64(), Some(8));

        // chain a third congruence: x ≡ 2 (mod 7) → 23 mod 105
        let x = crt_pair(&x, &Integer::new(15), 2, 7);
        assert_eq!(x.to_i64(), Some(23));
    }

    #[test]
    fn test_crt_pair_u128() {
        let x = crt_pair_u128(2, 3, 3, 5);
        assert_eq!(x, 8);
        let p1 = (1u64 << 61) - 1;
        let p2 = 998_244_353u64;
        let x = crt_pair_u128(12345, p1 as u128, 67890, p2);
        assert_eq!((x % p1 as u128) as u64, 12345);
        assert_eq!((x % p2 as u128) as u64, 67890);
    }

    #[test]
    fn test_symmetric() {
        let m = Integer::new(11);
        assert_eq!(symmetric(&Integer::new(3), &m).to_i64(), Some(3));
        assert_eq!(symmetric(&Integer::new(8), &m).to_i64(), Some(-3));
    }

    #[test]
    fn test_rational_reconstruct() {
        // 1/3 mod 1000003: residue = inv(3) mod p
        let p = Integer::new(1_000_003);
        let third = Integer::from(crate::modular::inv_mod(3, 1_000_003).unwrap());
        let r = rational_reconstruct(&third, &p).unwrap();
        assert_eq!(r, Rational::from_i64(1, 3));

        // -7/5
        let res = Integer::from(crate::modular::mul_mod(
            1_000_003 - 7,
            crate::modular::inv_mod(5, 1_000_003).unwrap(),
            1_000_003,
        ));
        let r = rational_reconstruct(&res, &p).unwrap();
        assert_eq!(r, Rational::from_i64(-7, 5));
    }

    #[test]
    fn test_reconstruct_small_integers() {
        let p = Integer::new(1_000_003);
        for v in [-20i64, -1, 0, 1, 42] {
            let (_, residue) = Integer::new(v).div_rem_euclid(&p);
            let r = rational_reconstruct(&residue, &p).unwrap();
            assert_eq!(r, Rational::from_i64(v, 1));
        }
    }
}
