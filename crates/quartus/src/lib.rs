//! # Quartus
//!
//! A polynomial ideal toolkit written in Rust.
//!
//! Quartus computes Gröbner bases of multivariate polynomial ideals over
//! finite fields, the integers and the rationals, under lex, grlex and
//! grevlex monomial orders.
//!
//! ## Features
//!
//! - **Two engines**: the classical term-rewriting loop and a batched
//!   linear-algebra variant sharing one critical-pair state machine
//! - **Exact arithmetic**: modular lifting with randomized primes,
//!   Chinese remaindering and rational reconstruction
//! - **Hilbert-driven scheduling**: a known Hilbert series turns either
//!   engine into a degree-quota computation with early termination
//! - **Sparse elimination**: hybrid dense/sparse rows specialized for prime
//!   fields and generic Euclidean domains
//!
//! ## Quick Start
//!
//! ```rust
//! use quartus::prelude::*;
//!
//! // the ideal (x^2 + y^2 - 1, x*y) under lex
//! let order = MonomialOrder::Lex;
//! let circle = SparsePoly::new(
//!     vec![
//!         (Monomial::new(&[2, 0]), Q::new(1, 1)),
//!         (Monomial::new(&[0, 2]), Q::new(1, 1)),
//!         (Monomial::new(&[0, 0]), Q::new(-1, 1)),
//!     ],
//!     2,
//!     order,
//! );
//! let axes = SparsePoly::new(
//!     vec![(Monomial::new(&[1, 1]), Q::new(1, 1))],
//!     2,
//!     order,
//! );
//!
//! let basis = groebner_basis(&[circle, axes], order).unwrap();
//! assert_eq!(basis.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use quartus_groebner as groebner;
pub use quartus_integers as integers;
pub use quartus_poly as poly;
pub use quartus_rings as rings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use quartus_groebner::{
        buchberger, f4, groebner_basis, groebner_basis_with_stats, hilbert_driven,
        is_groebner_basis, GroebnerConfig, GroebnerError, HilbertSeries,
    };
    pub use quartus_integers::{Integer, Rational};
    pub use quartus_poly::{Monomial, MonomialOrder, SparsePoly};
    pub use quartus_rings::{CoefficientRing, Field, Ring, Q, Z, Zp};
}
