//! Algebraic structure traits.
//!
//! This module defines the core algebraic traits the polynomial and
//! elimination machinery is generic over.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// A ring is a set with addition and multiplication operations.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative and commutative with identity `one()`
/// - Multiplication distributes over addition
/// - Every element has an additive inverse (`neg`)
pub trait Ring:
    Clone + Eq + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Returns true if this is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns true if this is the multiplicative identity.
    fn is_one(&self) -> bool;

    /// Computes self^n for non-negative n.
    fn pow(&self, n: u32) -> Self {
        if n == 0 {
            return Self::one();
        }

        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;

        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base.clone();
            }
            base = base.clone() * base;
            exp >>= 1;
        }

        result
    }
}

/// A Euclidean domain supports division with remainder.
///
/// For any a, b with b ≠ 0, there exist q, r such that:
/// - a = b*q + r
/// - Either r = 0 or φ(r) < φ(b) for some Euclidean function φ
pub trait EuclideanDomain: Ring {
    /// Computes the quotient and remainder of division.
    ///
    /// # Panics
    ///
    /// May panic if `other` is zero.
    fn div_rem(&self, other: &Self) -> (Self, Self);

    /// Computes the quotient of division.
    fn div(&self, other: &Self) -> Self {
        self.div_rem(other).0
    }

    /// Computes the remainder of division.
    fn rem(&self, other: &Self) -> Self {
        self.div_rem(other).1
    }

    /// Computes the greatest common divisor.
    fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();

        while !b.is_zero() {
            let r = a.rem(&b);
            a = b;
            b = r;
        }

        a
    }

    /// Computes the least common multiple.
    fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let g = self.gcd(other);
        self.div(&g) * other.clone()
    }

    /// Exact division: `Some(q)` when `other` divides `self` exactly.
    fn checked_div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        let (q, r) = self.div_rem(other);
        r.is_zero().then_some(q)
    }
}

/// A field is a ring where every non-zero element has a multiplicative inverse.
pub trait Field: EuclideanDomain {
    /// Computes the multiplicative inverse.
    ///
    /// Returns `None` if the element is zero.
    fn inv(&self) -> Option<Self>;

    /// Divides by another element.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    fn field_div(&self, other: &Self) -> Self {
        self.clone() * other.inv().expect("division by zero")
    }
}

/// The capability surface the reduction and elimination kernels need from a
/// coefficient domain beyond Euclidean division.
///
/// The kernels never branch on a concrete type: field fast paths are taken
/// whenever `try_inv` succeeds, and the cross-multiplication discipline kicks
/// in otherwise.
pub trait CoefficientRing: EuclideanDomain {
    /// True when every nonzero element is invertible.
    const FIELD: bool;

    /// Returns true if this element has a multiplicative inverse.
    fn is_unit(&self) -> bool;

    /// The multiplicative inverse, when this element is a unit.
    fn try_inv(&self) -> Option<Self>;

    /// The unit `u` such that `self / u` is the canonical associate
    /// (`self` itself over a field, `|self|` over Z).
    ///
    /// Used to pin a canonical scaling for basis elements: monic over
    /// fields, positive leading coefficient over Z.
    fn canonical_unit(&self) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integers::Z;

    #[test]
    fn test_pow() {
        assert_eq!(Z::new(3).pow(0), Z::new(1));
        assert_eq!(Z::new(3).pow(4), Z::new(81));
        assert_eq!(Z::new(-2).pow(3), Z::new(-8));
    }

    #[test]
    fn test_gcd_lcm_defaults() {
        assert_eq!(Z::new(12).gcd(&Z::new(18)).0.abs(), Z::new(6).0);
        assert_eq!(Z::new(4).lcm(&Z::new(6)).0.abs(), Z::new(12).0);
    }
}
