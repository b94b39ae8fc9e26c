//! # quartus-poly
//!
//! Sparse multivariate polynomial arithmetic for Quartus.
//!
//! This crate provides:
//! - Packed monomials with cached total degree (`Monomial`)
//! - Monomial orders: lex, grlex, grevlex (`MonomialOrder`)
//! - Sparse polynomials ordered by the active order (`SparsePoly`)
//! - Generalized (pseudo-)reduction and normal forms
//! - Homogenization and the univariate GCD boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod monomial;
pub mod multivar;
pub mod ordering;
pub mod univar;

#[cfg(test)]
mod proptests;

pub use monomial::{Monomial, MAX_VARS};
pub use multivar::SparsePoly;
pub use ordering::MonomialOrder;
pub use univar::univariate_gcd;
