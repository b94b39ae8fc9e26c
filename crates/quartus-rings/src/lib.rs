//! # quartus-rings
//!
//! Coefficient domains for Quartus.
//!
//! This crate provides:
//! - Abstract traits: `Ring`, `EuclideanDomain`, `Field`, `CoefficientRing`
//! - Concrete implementations: `Z`, `Q`, `Zp`
//!
//! ## Trait Hierarchy
//!
//! ```text
//! Ring
//!  └── EuclideanDomain
//!       ├── CoefficientRing   (capability surface for elimination kernels)
//!       └── Field
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod integers;
pub mod rationals;
pub mod traits;
pub mod zp;

pub use integers::Z;
pub use rationals::Q;
pub use traits::{CoefficientRing, EuclideanDomain, Field, Ring};
pub use zp::Zp;
