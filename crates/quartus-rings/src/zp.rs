//! The prime field Z_p with a runtime modulus.
//!
//! The modular lifting orchestrator draws fresh primes while it runs, so the
//! modulus cannot be a const generic here. Each element carries its modulus;
//! `Ring::zero()`/`Ring::one()` produce *unattached* constants (modulus 0)
//! that adopt the modulus of the first attached operand they meet. Mixing two
//! attached elements of different moduli is a bug and panics.

use crate::traits::{CoefficientRing, EuclideanDomain, Field, Ring};
use quartus_integers::modular::{add_mod, inv_mod, mul_mod, sub_mod};
use std::hash::{Hash, Hasher};

/// An element of the prime field Z_p for a runtime prime p.
#[derive(Clone, Copy, Debug)]
pub struct Zp {
    value: u64,
    modulus: u64,
}

impl Zp {
    /// Creates a new field element.
    ///
    /// # Panics
    ///
    /// Panics if `modulus < 2`.
    #[must_use]
    pub fn new(value: u64, modulus: u64) -> Self {
        assert!(modulus >= 2, "modulus must be at least 2");
        Self {
            value: value % modulus,
            modulus,
        }
    }

    /// Creates a field element from a signed value.
    #[must_use]
    pub fn from_signed(value: i64, modulus: u64) -> Self {
        if value >= 0 {
            Self::new(value as u64, modulus)
        } else {
            let r = (-value) as u64 % modulus;
            Self::new(modulus - r, modulus)
        }
    }

    /// Returns the residue in `[0, p)`.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.value
    }

    /// Returns the modulus, or 0 for an unattached constant.
    #[must_use]
    pub const fn modulus(self) -> u64 {
        self.modulus
    }

    /// Resolves the common modulus of two operands.
    fn joint_modulus(self, other: Self) -> u64 {
        match (self.modulus, other.modulus) {
            (0, m) | (m, 0) => m,
            (a, b) => {
                assert_eq!(a, b, "mixed moduli: {a} vs {b}");
                a
            }
        }
    }

    fn attach(self, modulus: u64) -> Self {
        if self.modulus != 0 || modulus == 0 {
            self
        } else {
            Self::new(self.value, modulus)
        }
    }
}

impl PartialEq for Zp {
    fn eq(&self, other: &Self) -> bool {
        (self.modulus == other.modulus || self.modulus == 0 || other.modulus == 0)
            && self.value == other.value
    }
}

impl Eq for Zp {}

impl Hash for Zp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Consistent with PartialEq, which ignores an unattached modulus.
        self.value.hash(state);
    }
}

impl Ring for Zp {
    fn zero() -> Self {
        Self {
            value: 0,
            modulus: 0,
        }
    }

    fn one() -> Self {
        Self {
            value: 1,
            modulus: 0,
        }
    }

    fn is_zero(&self) -> bool {
        self.value == 0
    }

    fn is_one(&self) -> bool {
        self.value == 1
    }
}

impl EuclideanDomain for Zp {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        // Exact division in a field
        let m = self.joint_modulus(*other);
        let inv = other
            .attach(m)
            .inv()
            .expect("division by zero in Z_p");
        (*self * inv, Self::zero())
    }

    fn gcd(&self, other: &Self) -> Self {
        if self.is_zero() && other.is_zero() {
            Self::zero()
        } else {
            Self::one()
        }
    }
}

impl Field for Zp {
    fn inv(&self) -> Option<Self> {
        if self.value == 0 {
            return None;
        }
        if self.modulus == 0 {
            // unattached 1 is its own inverse; anything else is meaningless
            return (self.value == 1).then_some(*self);
        }
        inv_mod(self.value, self.modulus).map(|v| Self {
            value: v,
            modulus: self.modulus,
        })
    }
}

impl CoefficientRing for Zp {
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
            *self
        }
    }
}

impl std::ops::Add for Zp {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let m = self.joint_modulus(rhs);
        if m == 0 {
            return Self {
                value: self.value + rhs.value,
                modulus: 0,
            };
        }
        Self {
            value: add_mod(self.attach(m).value, rhs.attach(m).value, m),
            modulus: m,
        }
    }
}

impl std::ops::Sub for Zp {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        let m = self.joint_modulus(rhs);
        if m == 0 {
            assert!(self.value >= rhs.value, "unattached subtraction underflow");
            return Self {
                value: self.value - rhs.value,
                modulus: 0,
            };
        }
        Self {
            value: sub_mod(self.attach(m).value, rhs.attach(m).value, m),
            modulus: m,
        }
    }
}

impl std::ops::Mul for Zp {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let m = self.joint_modulus(rhs);
        if m == 0 {
            return Self {
                value: self.value * rhs.value,
                modulus: 0,
            };
        }
        Self {
            value: mul_mod(self.attach(m).value, rhs.attach(m).value, m),
            modulus: m,
        }
    }
}

impl std::ops::Neg for Zp {
    type Output = Self;

    fn neg(self) -> Self::Output {
        if self.modulus == 0 || self.value == 0 {
            assert!(self.value == 0, "cannot negate an unattached constant");
            return self;
        }
        Self {
            value: self.modulus - self.value,
            modulus: self.modulus,
        }
    }
}

impl std::fmt::Display for Zp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f7(v: i64) -> Zp {
        Zp::from_signed(v, 7)
    }

    #[test]
    fn test_field_ops() {
        assert_eq!(f7(5) + f7(4), f7(2));
        assert_eq!(f7(5) - f7(6), f7(6));
        assert_eq!(f7(5) * f7(4), f7(6));
        assert_eq!(-f7(3), f7(4));
    }

    #[test]
    fn test_inverse() {
        let a = f7(3);
        assert_eq!(a * a.inv().unwrap(), f7(1));
        assert_eq!(f7(0).inv(), None);
    }

    #[test]
    fn test_unattached_constants() {
        let zero = Zp::zero();
        let one = Zp::one();
        assert!(zero.is_zero());
        assert!(one.is_one());
        // constants adopt the modulus of the attached operand
        assert_eq!(f7(3) + zero, f7(3));
        assert_eq!(f7(3) * one, f7(3));
        assert_eq!(one + f7(6), f7(0));
    }

    #[test]
    #[should_panic(expected = "mixed moduli")]
    fn test_mixed_moduli_panics() {
        let _ = Zp::new(1, 7) + Zp::new(1, 11);
    }
}
