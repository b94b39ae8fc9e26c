//! Univariate GCD at the boundary.
//!
//! When every generator of an ideal lives in a single variable, the whole
//! Gröbner computation collapses to one GCD. The Euclidean loop below runs on
//! the generalized remainder of [`SparsePoly::normal_form`], which already
//! handles both capability levels: exact division over a field, primitive
//! pseudo-remainder sequences over Z.

use quartus_rings::traits::CoefficientRing;

use crate::multivar::SparsePoly;

/// Computes the GCD of two univariate polynomials in the same variable.
///
/// Inputs that are constants or zero are handled; the result is canonical
/// (monic over a field, positive-primitive over Z).
///
/// # Panics
///
/// Panics if the inputs involve two different variables.
#[must_use]
pub fn univariate_gcd<R: CoefficientRing>(
    a: &SparsePoly<R>,
    b: &SparsePoly<R>,
) -> SparsePoly<R> {
    if let (Some(va), Some(vb)) = (a.univariate_in(), b.univariate_in()) {
        assert_eq!(va, vb, "gcd of polynomials in different variables");
    }

    let mut a = a.canonicalize();
    let mut b = b.canonicalize();

    // order (a, b) by degree so the first remainder step is meaningful
    if a.total_degree() < b.total_degree() {
        std::mem::swap(&mut a, &mut b);
    }

    while !b.is_zero() {
        let r = a.normal_form(&[&b]);
        a = b;
        b = r;
    }
    a.canonicalize()
}
