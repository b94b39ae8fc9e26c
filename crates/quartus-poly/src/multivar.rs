//! Sparse multivariate polynomials.
//!
//! Terms are kept strictly descending under the polynomial's monomial order,
//! so the leading term is always the first entry. The generalized
//! (pseudo-)reduction here is the single division routine every engine in the
//! workspace goes through: over a field it is ordinary multivariate division,
//! over Z it cross-multiplies with lcm-derived cofactors so no denominators
//! ever appear.

use quartus_rings::traits::{CoefficientRing, Ring};

use crate::monomial::{Monomial, MAX_VARS};
use crate::ordering::MonomialOrder;

/// A sparse multivariate polynomial.
///
/// Terms are stored as (monomial, coefficient) pairs, strictly descending
/// under the active monomial ordering, with no zero coefficients.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SparsePoly<R: Ring> {
    /// Terms in descending order (leading term first).
    terms: Vec<(Monomial, R)>,
    /// Number of variables.
    num_vars: usize,
    /// Monomial ordering used for sorting.
    order: MonomialOrder,
}

impl<R: Ring> SparsePoly<R> {
    /// Creates a new polynomial from terms.
    ///
    /// Terms are sorted, like terms combined, and zeros dropped.
    #[must_use]
    pub fn new(terms: Vec<(Monomial, R)>, num_vars: usize, order: MonomialOrder) -> Self {
        let mut poly = Self {
            terms,
            num_vars,
            order,
        };
        poly.normalize();
        poly
    }

    /// Creates a polynomial from terms already strictly descending under
    /// `order`, with no zero coefficients or duplicate monomials.
    #[must_use]
    pub fn from_sorted_terms(
        terms: Vec<(Monomial, R)>,
        num_vars: usize,
        order: MonomialOrder,
    ) -> Self {
        debug_assert!(terms
            .windows(2)
            .all(|w| order.compare(&w[0].0, &w[1].0) == std::cmp::Ordering::Greater));
        debug_assert!(terms.iter().all(|(_, c)| !c.is_zero()));
        Self {
            terms,
            num_vars,
            order,
        }
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero(num_vars: usize, order: MonomialOrder) -> Self {
        Self {
            terms: Vec::new(),
            num_vars,
            order,
        }
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one(num_vars: usize, order: MonomialOrder) -> Self {
        Self::constant(R::one(), num_vars, order)
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: R, num_vars: usize, order: MonomialOrder) -> Self {
        if c.is_zero() {
            Self::zero(num_vars, order)
        } else {
            Self {
                terms: vec![(Monomial::one(num_vars), c)],
                num_vars,
                order,
            }
        }
    }

    /// Creates a single variable x_i.
    #[must_use]
    pub fn var(i: usize, num_vars: usize, order: MonomialOrder) -> Self {
        Self {
            terms: vec![(Monomial::var(i, num_vars), R::one())],
            num_vars,
            order,
        }
    }

    /// Creates the single-term polynomial `c * m`.
    #[must_use]
    pub fn monomial(m: Monomial, c: R, num_vars: usize, order: MonomialOrder) -> Self {
        if c.is_zero() {
            Self::zero(num_vars, order)
        } else {
            Self {
                terms: vec![(m, c)],
                num_vars,
                order,
            }
        }
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the monomial ordering.
    #[must_use]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    /// Returns the terms, leading term first.
    #[must_use]
    pub fn terms(&self) -> &[(Monomial, R)] {
        &self.terms
    }

    /// Returns the leading monomial.
    #[must_use]
    pub fn leading_monomial(&self) -> Option<&Monomial> {
        self.terms.first().map(|(m, _)| m)
    }

    /// Returns the leading coefficient.
    #[must_use]
    pub fn leading_coeff(&self) -> Option<&R> {
        self.terms.first().map(|(_, c)| c)
    }

    /// Returns the leading term (monomial, coefficient).
    #[must_use]
    pub fn leading_term(&self) -> Option<&(Monomial, R)> {
        self.terms.first()
    }

    /// Computes the total degree (max over terms).
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.terms.iter().map(|(m, _)| m.total_degree()).max().unwrap_or(0)
    }

    /// The écart: total degree minus degree of the leading monomial.
    ///
    /// Zero exactly for polynomials whose leading term realizes the total
    /// degree (always, under a graded order); the sugar of a critical pair
    /// builds on it.
    #[must_use]
    pub fn ecart(&self) -> u32 {
        match self.leading_monomial() {
            Some(lm) => self.total_degree() - lm.total_degree(),
            None => 0,
        }
    }

    /// Returns true if this is a nonzero constant.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].0.is_one()
    }

    /// Returns true if every term has the same total degree.
    #[must_use]
    pub fn is_homogeneous(&self) -> bool {
        match self.terms.first() {
            None => true,
            Some((m, _)) => {
                let d = m.total_degree();
                self.terms.iter().all(|(m, _)| m.total_degree() == d)
            }
        }
    }

    /// If exactly one variable occurs in this polynomial, returns its index.
    ///
    /// Constants (no variable at all) return `None`.
    #[must_use]
    pub fn univariate_in(&self) -> Option<usize> {
        let mut var = None;
        for (m, _) in &self.terms {
            for i in 0..self.num_vars {
                if m.exponent(i) > 0 {
                    match var {
                        None => var = Some(i),
                        Some(v) if v == i => {}
                        Some(_) => return None,
                    }
                }
            }
        }
        var
    }

    /// Sorts terms, combines like terms, drops zeros.
    fn normalize(&mut self) {
        let order = self.order;
        self.terms.sort_by(|a, b| order.compare(&b.0, &a.0));

        let mut write = 0usize;
        let mut read = 0usize;
        while read < self.terms.len() {
            let mut acc = self.terms[read].clone();
            read += 1;
            while read < self.terms.len() && self.terms[read].0 == acc.0 {
                acc.1 = acc.1 + self.terms[read].1.clone();
                read += 1;
            }
            if !acc.1.is_zero() {
                self.terms[write] = acc;
                write += 1;
            }
        }
        self.terms.truncate(write);
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        assert_eq!(self.num_vars, other.num_vars);
        assert!(self.order == other.order);

        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Self::new(terms, self.num_vars, self.order)
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(m, c)| (*m, -c.clone())).collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Subtracts two polynomials.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies two polynomials (schoolbook algorithm).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.num_vars, other.num_vars);
        assert!(self.order == other.order);

        if self.is_zero() || other.is_zero() {
            return Self::zero(self.num_vars, self.order);
        }

        let mut terms = Vec::with_capacity(self.len() * other.len());
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                terms.push((m1.mul(m2), c1.clone() * c2.clone()));
            }
        }
        Self::new(terms, self.num_vars, self.order)
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero(self.num_vars, self.order);
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, x)| (*m, x.clone() * c.clone()))
                .collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Multiplies by a monomial.
    ///
    /// Monomial multiplication preserves any multiplicative order, so the
    /// term list stays sorted without a resort.
    #[must_use]
    pub fn mul_monomial(&self, m: &Monomial) -> Self {
        Self {
            terms: self.terms.iter().map(|(m2, c)| (m.mul(m2), c.clone())).collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Multiplies by the term `c * m`.
    #[must_use]
    pub fn mul_term(&self, m: &Monomial, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero(self.num_vars, self.order);
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m2, x)| (m.mul(m2), x.clone() * c.clone()))
                .collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Maps the coefficients into another ring, dropping images of zero.
    ///
    /// Monomials are untouched, so sortedness is preserved.
    #[must_use]
    pub fn map_coeffs<B: Ring>(&self, f: impl Fn(&R) -> B) -> SparsePoly<B> {
        SparsePoly {
            terms: self
                .terms
                .iter()
                .filter_map(|(m, c)| {
                    let fc = f(c);
                    (!fc.is_zero()).then_some((*m, fc))
                })
                .collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Returns the same polynomial re-sorted under a different order.
    #[must_use]
    pub fn with_order(&self, order: MonomialOrder) -> Self {
        if order == self.order {
            return self.clone();
        }
        Self::new(self.terms.clone(), self.num_vars, order)
    }

    /// Homogenizes with a fresh variable appended after the existing ones.
    ///
    /// # Panics
    ///
    /// Panics if there is no spare variable slot below [`MAX_VARS`].
    #[must_use]
    pub fn homogenize(&self) -> Self {
        assert!(self.num_vars < MAX_VARS, "no spare variable to homogenize with");
        let n = self.num_vars;
        let d = self.total_degree();
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| (m.with_exponent(n, (d - m.total_degree()) as u16), c.clone()))
            .collect();
        Self::new(terms, n + 1, self.order)
    }

    /// Sets the last variable to 1 and drops it.
    #[must_use]
    pub fn dehomogenize(&self) -> Self {
        assert!(self.num_vars > 0);
        let n = self.num_vars - 1;
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| {
                let exps: Vec<u16> = (0..n).map(|i| m.exponent(i)).collect();
                (Monomial::new(&exps), c.clone())
            })
            .collect();
        Self::new(terms, n, self.order)
    }
}

impl<R: CoefficientRing> SparsePoly<R> {
    /// The content: GCD of all coefficients.
    #[must_use]
    pub fn content(&self) -> R {
        let mut acc = R::zero();
        for (_, c) in &self.terms {
            acc = acc.gcd(c);
            if acc.is_unit() {
                break;
            }
        }
        acc
    }

    /// Divides out the content.
    #[must_use]
    pub fn primitive_part(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let content = self.content();
        if content.is_one() {
            return self.clone();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| {
                    (*m, c.checked_div(&content).expect("content divides coefficients"))
                })
                .collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Canonical scaling: monic over a field, positive-primitive over Z.
    #[must_use]
    pub fn canonicalize(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let primitive = self.primitive_part();
        let unit = primitive
            .leading_coeff()
            .expect("nonzero polynomial")
            .canonical_unit();
        if unit.is_one() {
            return primitive;
        }
        Self {
            terms: primitive
                .terms
                .iter()
                .map(|(m, c)| (*m, c.checked_div(&unit).expect("unit division is exact")))
                .collect(),
            num_vars: primitive.num_vars,
            order: primitive.order,
        }
    }

    /// Generalized remainder of `self` modulo a list of divisors.
    ///
    /// Every term of the result is irreducible modulo the divisors' leading
    /// terms. Over a field this is the ordinary multivariate normal form;
    /// over Z the running remainder is cross-multiplied by lcm-derived
    /// cofactors so the computation stays denominator-free, and the result is
    /// returned primitive.
    #[must_use]
    pub fn normal_form(&self, divisors: &[&Self]) -> Self {
        if self.is_zero() || divisors.is_empty() {
            return self.clone();
        }

        let mut rem = self.clone();
        let mut out: Vec<(Monomial, R)> = Vec::new();

        'term: while let Some((lm, lc)) = rem.leading_term().map(|(m, c)| (*m, c.clone())) {
            for g in divisors {
                let Some(g_lm) = g.leading_monomial() else {
                    continue;
                };
                if !lm.is_divisible_by(g_lm) {
                    continue;
                }
                let quo_m = lm.div(g_lm).expect("divisibility just checked");
                let g_lc = g.leading_coeff().expect("nonzero divisor");

                if let Some(quo_c) = lc.checked_div(g_lc) {
                    rem = rem.sub(&g.mul_term(&quo_m, &quo_c));
                } else {
                    // cross-multiply: s*lc = t*g_lc = lcm(lc, g_lc)
                    let l = lc.lcm(g_lc);
                    let s = l.checked_div(&lc).expect("lcm divisible by its factor");
                    let t = l.checked_div(g_lc).expect("lcm divisible by its factor");
                    for (_, c) in &mut out {
                        *c = c.clone() * s.clone();
                    }
                    rem = rem.scale(&s).sub(&g.mul_term(&quo_m, &t));
                }
                continue 'term;
            }

            // leading term irreducible: emit it and move on
            out.push((lm, lc));
            rem.terms.remove(0);
        }

        let result = Self {
            terms: out,
            num_vars: self.num_vars,
            order: self.order,
        };
        if R::FIELD || result.is_zero() {
            result
        } else {
            result.primitive_part()
        }
    }

    /// True if `self` reduces to zero modulo the divisors.
    #[must_use]
    pub fn reduces_to_zero(&self, divisors: &[&Self]) -> bool {
        self.normal_form(divisors).is_zero()
    }
}

impl<R: Ring> std::fmt::Display for SparsePoly<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let rendered: Vec<_> = self
            .terms
            .iter()
            .map(|(m, c)| {
                if m.is_one() {
                    format!("{c:?}")
                } else {
                    format!("{c:?}*{m}")
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" + "))
    }
}
