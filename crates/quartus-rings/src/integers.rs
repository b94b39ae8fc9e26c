//! The ring of integers Z.

use crate::traits::{CoefficientRing, EuclideanDomain, Ring};
use quartus_integers::Integer;

/// The ring of integers.
///
/// This is a wrapper around `quartus_integers::Integer` that implements
/// the algebraic traits.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Z(pub Integer);

impl Z {
    /// Creates a new integer.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(Integer::new(value))
    }

    /// Returns the inner Integer.
    #[must_use]
    pub fn into_inner(self) -> Integer {
        self.0
    }

    /// Returns a reference to the inner Integer.
    #[must_use]
    pub fn as_inner(&self) -> &Integer {
        &self.0
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        self.0.signum()
    }
}

impl Ring for Z {
    fn zero() -> Self {
        Self(Integer::new(0))
    }

    fn one() -> Self {
        Self(Integer::new(1))
    }

    fn is_zero(&self) -> bool {
        use num_traits::Zero;
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        use num_traits::One;
        self.0.is_one()
    }
}

impl EuclideanDomain for Z {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        let q = self.0.clone() / &other.0;
        let r = self.0.clone() % &other.0;
        (Self(q), Self(r))
    }

    fn gcd(&self, other: &Self) -> Self {
        Self(self.0.gcd(&other.0))
    }

    fn lcm(&self, other: &Self) -> Self {
        Self(self.0.lcm(&other.0))
    }
}

impl CoefficientRing for Z {
    const FIELD: bool = false;

    fn is_unit(&self) -> bool {
        self.0.abs() == Integer::new(1)
    }

    fn try_inv(&self) -> Option<Self> {
        if self.is_unit() {
            Some(self.clone())
        } else {
            None
        }
    }

    fn canonical_unit(&self) -> Self {
        if self.0.is_negative() {
            Self::new(-1)
        } else {
            Self::one()
        }
    }
}

// Arithmetic operations
impl std::ops::Add for Z {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Z {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Z {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl std::ops::Neg for Z {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl From<i64> for Z {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Integer> for Z {
    fn from(value: Integer) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Z {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean() {
        let (q, r) = Z::new(17).div_rem(&Z::new(5));
        assert_eq!(q, Z::new(3));
        assert_eq!(r, Z::new(2));
    }

    #[test]
    fn test_units() {
        assert!(Z::new(1).is_unit());
        assert!(Z::new(-1).is_unit());
        assert!(!Z::new(2).is_unit());
        assert_eq!(Z::new(-1).try_inv(), Some(Z::new(-1)));
        assert_eq!(Z::new(3).try_inv(), None);
    }

    #[test]
    fn test_canonical_unit() {
        assert_eq!(Z::new(-6).canonical_unit(), Z::new(-1));
        assert_eq!(Z::new(6).canonical_unit(), Z::new(1));
        // dividing by the canonical unit yields the positive associate
        let c = Z::new(-6);
        let u = c.canonical_unit();
        assert_eq!(c.div(&u), Z::new(6));
    }
}
