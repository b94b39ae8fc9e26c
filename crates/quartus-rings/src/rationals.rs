//! The field of rational numbers Q.

use crate::traits::{CoefficientRing, EuclideanDomain, Field, Ring};
use quartus_integers::{Integer, Rational};

/// The field of rational numbers.
///
/// This is a wrapper around `quartus_integers::Rational` that implements
/// the algebraic traits.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Q(pub Rational);

impl Q {
    /// Creates a new rational from numerator and denominator.
    #[must_use]
    pub fn new(num: i64, den: i64) -> Self {
        Self(Rational::from_i64(num, den))
    }

    /// Creates a rational from an integer.
    #[must_use]
    pub fn from_integer(n: i64) -> Self {
        Self(Rational::from(n))
    }

    /// Returns the numerator.
    #[must_use]
    pub fn numerator(&self) -> Integer {
        self.0.numerator()
    }

    /// Returns the denominator.
    #[must_use]
    pub fn denominator(&self) -> Integer {
        self.0.denominator()
    }

    /// Returns the inner Rational.
    #[must_use]
    pub fn into_inner(self) -> Rational {
        self.0
    }

    /// Returns a reference to the inner Rational.
    #[must_use]
    pub fn as_inner(&self) -> &Rational {
        &self.0
    }
}

impl Ring for Q {
    fn zero() -> Self {
        Self(Rational::from(0))
    }

    fn one() -> Self {
        Self(Rational::from(1))
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

impl EuclideanDomain for Q {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        // In a field, division is exact, so the remainder is always zero
        (Self(self.0.clone() / other.0.clone()), Self::zero())
    }

    fn gcd(&self, other: &Self) -> Self {
        if self.is_zero() && other.is_zero() {
            Self::zero()
        } else {
            Self::one()
        }
    }
}

impl Field for Q {
    fn inv(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(Self(self.0.recip()))
        }
    }
}

impl CoefficientRing for Q {
    const FIELD: bool = true;

    fn is_unit(&self) -> bool {
        !self.is_zero()
    }

    fn try_inv(&self) -> Option<Self> {
        self.inv()
    }

    fn canonical_unit(&self) -> Self {
        if self.is_zero() {
            Self::one()
        } else {
            self.clone()
        }
    }
}

// Arithmetic operations
impl std::ops::Add for Q {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Q {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Q {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl std::ops::Neg for Q {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl From<i64> for Q {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<Rational> for Q {
    fn from(value: Rational) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Q {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ops() {
        let a = Q::new(1, 2);
        let b = Q::new(1, 3);
        assert_eq!(a.clone() + b.clone(), Q::new(5, 6));
        assert_eq!(a.clone() * b, Q::new(1, 6));
        assert_eq!(a.inv(), Some(Q::new(2, 1)));
    }

    #[test]
    fn test_canonical_unit() {
        // dividing by the canonical unit gives 1, i.e. monic scaling
        let c = Q::new(-3, 4);
        assert_eq!(c.div(&c.canonical_unit()), Q::one());
        assert_eq!(Q::zero().canonical_unit(), Q::one());
    }
}
