//! Hilbert series of leading-term ideals.
//!
//! A series is a numerator polynomial over `(1-t)^k`; construction divides
//! out `(1-t)` while the numerator allows it, so two series are equal exactly
//! when their reduced numerators and pole orders coincide. The engines use
//! series both as a termination oracle (the leading-term ideal under
//! construction already matches a known target) and as a degree scheduler
//! (the deficiency quota), and the lifting orchestrator ranks primes by the
//! induced Hilbert polynomials.

use std::cell::OnceCell;
use std::cmp::Ordering;

use num_traits::{One, Zero};
use quartus_integers::Rational;
use quartus_poly::Monomial;

/// A rational generating function `numerator / (1-t)^pole_order`.
#[derive(Clone, Debug)]
pub struct HilbertSeries {
    /// Numerator coefficients, ascending by degree, trailing zeros trimmed.
    numerator: Vec<Rational>,
    /// Denominator exponent of `(1-t)` after reduction.
    pole_order: usize,
    /// Memoized Hilbert polynomial (coefficients in n, ascending).
    hilbert_poly: OnceCell<Vec<Rational>>,
}

impl PartialEq for HilbertSeries {
    fn eq(&self, other: &Self) -> bool {
        self.pole_order == other.pole_order && self.numerator == other.numerator
    }
}

impl Eq for HilbertSeries {}

impl HilbertSeries {
    /// Creates a series, dividing `(1-t)` out of the numerator while exact.
    #[must_use]
    pub fn new(numerator: Vec<Rational>, pole_order: usize) -> Self {
        let mut numerator = trim(numerator);
        let mut pole_order = pole_order;
        while pole_order > 0 {
            match div_one_minus_t(&numerator) {
                Some(q) => {
                    numerator = q;
                    pole_order -= 1;
                }
                None => break,
            }
        }
        Self {
            numerator,
            pole_order,
            hilbert_poly: OnceCell::new(),
        }
    }

    /// The series of the quotient by a monomial ideal, given the ideal's
    /// generators (typically the live leading terms of a partial basis).
    #[must_use]
    pub fn of_monomial_ideal(generators: &[Monomial], num_vars: usize) -> Self {
        let minimal = minimal_generators(generators);
        Self::new(ideal_numerator(&minimal), num_vars)
    }

    /// Numerator coefficients, ascending.
    #[must_use]
    pub fn numerator(&self) -> &[Rational] {
        &self.numerator
    }

    /// Krull dimension of the quotient: the reduced pole order.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.pole_order
    }

    /// Degree of the quotient: the reduced numerator evaluated at 1.
    #[must_use]
    pub fn degree(&self) -> Rational {
        self.numerator
            .iter()
            .fold(Rational::zero(), |acc, c| acc + c.clone())
    }

    /// Splits the numerator as `N = Q * (1-t)^k + R` with `deg_{(1-t)} R < k`.
    ///
    /// `Q` (the integral part) only perturbs finitely many low degrees of
    /// the series; `R` carries the asymptotics. Both are returned as
    /// ordinary coefficient vectors in `t`.
    #[must_use]
    pub fn numerator_split(&self) -> (Vec<Rational>, Vec<Rational>) {
        let mut cur = self.numerator.clone();
        let mut remainder: Vec<Rational> = Vec::new();
        let mut power = vec![Rational::one()]; // (1-t)^i

        for _ in 0..self.pole_order {
            // digit = cur evaluated at 1; (cur - digit) is divisible by (1-t)
            let digit = cur
                .iter()
                .fold(Rational::zero(), |acc, c| acc + c.clone());
            if !digit.is_zero() {
                if cur.is_empty() {
                    cur.push(Rational::zero());
                }
                cur[0] = cur[0].clone() - digit.clone();
                let scaled: Vec<Rational> =
                    power.iter().map(|c| c.clone() * digit.clone()).collect();
                remainder = add(&remainder, &scaled);
            }
            cur = div_one_minus_t(&cur).expect("constant-adjusted numerator divides");
            power = mul_one_minus_t(&power);
        }
        (trim(cur), trim(remainder))
    }

    /// The numerator re-expressed over `(1-t)^target_pole`.
    ///
    /// # Panics
    ///
    /// Panics if `target_pole` is below the reduced pole order.
    #[must_use]
    pub fn numerator_at_pole(&self, target_pole: usize) -> Vec<Rational> {
        assert!(target_pole >= self.pole_order);
        let mut num = self.numerator.clone();
        for _ in self.pole_order..target_pole {
            num = mul_one_minus_t(&num);
        }
        num
    }

    /// The Hilbert polynomial: coefficients in `n`, ascending. Memoized.
    ///
    /// Computed from the finite-difference (binomial) expansion of the
    /// reduced numerator: `HP(n) = sum_i a_i * C(n - i + k - 1, k - 1)`.
    pub fn hilbert_polynomial(&self) -> &[Rational] {
        self.hilbert_poly.get_or_init(|| {
            let k = self.pole_order;
            if k == 0 {
                return Vec::new();
            }
            let mut factorial = Rational::one();
            for j in 2..k {
                factorial = factorial * Rational::from(j as i64);
            }

            let mut acc: Vec<Rational> = Vec::new();
            for (i, a) in self.numerator.iter().enumerate() {
                if a.is_zero() {
                    continue;
                }
                // binomial C(n - i + k - 1, k - 1) as a polynomial in n
                let mut term = vec![Rational::one()];
                for j in 0..k - 1 {
                    let shift = Rational::from(k as i64 - 1 - i as i64 - j as i64);
                    term = mul_linear(&term, &shift);
                }
                let scale = a.clone() / factorial.clone();
                for (d, c) in term.into_iter().enumerate() {
                    let scaled = c * scale.clone();
                    if d >= acc.len() {
                        acc.resize(d + 1, Rational::zero());
                    }
                    acc[d] = acc[d].clone() + scaled;
                }
            }
            trim(acc)
        })
    }

    /// First degree where this series disagrees with `target`, with the
    /// numerator coefficient difference there (both numerators brought to a
    /// common pole order).
    ///
    /// `None` means the series agree. For a partial basis against the true
    /// target the difference is positive: it counts the independent
    /// reductions still needed at that degree.
    #[must_use]
    pub fn deficiency(&self, target: &Self) -> Option<(u32, i64)> {
        if self == target {
            return None;
        }
        let pole = self.pole_order.max(target.pole_order);
        let a = self.numerator_at_pole(pole);
        let b = target.numerator_at_pole(pole);
        for d in 0..a.len().max(b.len()) {
            let ca = a.get(d).cloned().unwrap_or_else(Rational::zero);
            let cb = b.get(d).cloned().unwrap_or_else(Rational::zero);
            if ca != cb {
                let diff = ca - cb;
                let quota = diff
                    .to_integer()
                    .and_then(|n| n.to_i64())
                    .expect("leading-term series have integer numerators");
                return Some((d as u32, quota));
            }
        }
        None
    }
}

/// Ranks two series by their Hilbert polynomials, evaluated exactly beyond
/// every real root of the difference (Cauchy bound), so the asymptotically
/// smaller quotient compares as `Less`.
#[must_use]
pub fn cmp_by_hilbert_polynomial(a: &HilbertSeries, b: &HilbertSeries) -> Ordering {
    let pa = a.hilbert_polynomial();
    let pb = b.hilbert_polynomial();

    let mut diff: Vec<Rational> = Vec::new();
    for d in 0..pa.len().max(pb.len()) {
        let ca = pa.get(d).cloned().unwrap_or_else(Rational::zero);
        let cb = pb.get(d).cloned().unwrap_or_else(Rational::zero);
        diff.push(ca - cb);
    }
    let diff = trim(diff);
    let Some(lead) = diff.last() else {
        return Ordering::Equal;
    };

    // every real root lies within 1 + max |c_i / c_lead|
    let mut bound = Rational::one();
    for c in &diff {
        let ratio = (c.clone() / lead.clone()).abs();
        if ratio > bound {
            bound = ratio;
        }
    }
    let point = Rational::from_integer(bound.numerator() / bound.denominator())
        + Rational::from(2);

    let value = diff
        .iter()
        .rev()
        .fold(Rational::zero(), |acc, c| acc * point.clone() + c.clone());
    match value.signum() {
        s if s < 0 => Ordering::Less,
        0 => Ordering::Equal,
        _ => Ordering::Greater,
    }
}

/// Minimal generating set of a monomial ideal: drops every generator
/// divisible by another (equal duplicates keep one copy).
#[must_use]
pub fn minimal_generators(generators: &[Monomial]) -> Vec<Monomial> {
    let mut minimal: Vec<Monomial> = Vec::new();
    for m in generators {
        if minimal.iter().any(|g| m.is_divisible_by(g)) {
            continue;
        }
        minimal.retain(|g| !g.is_divisible_by(m));
        minimal.push(*m);
    }
    minimal
}

/// Numerator of the quotient series by the monomial ideal `gens`
/// (assumed minimal), via the colon-ideal recursion
/// `N(G + m) = N(G) - t^deg(m) * N(G : m)`.
fn ideal_numerator(gens: &[Monomial]) -> Vec<Rational> {
    match gens {
        [] => vec![Rational::one()],
        [m] => {
            // 1 - t^deg(m)
            let d = m.total_degree() as usize;
            let mut num = vec![Rational::zero(); d + 1];
            num[0] = Rational::one();
            num[d] = -Rational::one();
            num
        }
        [rest @ .., m] => {
            let colon: Vec<Monomial> = minimal_generators(
                &rest
                    .iter()
                    .map(|g| g.div(&g.gcd(m)).expect("gcd divides"))
                    .collect::<Vec<_>>(),
            );
            let left = ideal_numerator(rest);
            let right = shift(&ideal_numerator(&colon), m.total_degree() as usize);
            sub(&left, &right)
        }
    }
}

fn trim(mut v: Vec<Rational>) -> Vec<Rational> {
    while v.last().is_some_and(Rational::is_zero) {
        v.pop();
    }
    v
}

fn add(a: &[Rational], b: &[Rational]) -> Vec<Rational> {
    let mut out = vec![Rational::zero(); a.len().max(b.len())];
    for (d, slot) in out.iter_mut().enumerate() {
        let ca = a.get(d).cloned().unwrap_or_else(Rational::zero);
        let cb = b.get(d).cloned().unwrap_or_else(Rational::zero);
        *slot = ca + cb;
    }
    trim(out)
}

fn sub(a: &[Rational], b: &[Rational]) -> Vec<Rational> {
    let mut out = vec![Rational::zero(); a.len().max(b.len())];
    for (d, slot) in out.iter_mut().enumerate() {
        let ca = a.get(d).cloned().unwrap_or_else(Rational::zero);
        let cb = b.get(d).cloned().unwrap_or_else(Rational::zero);
        *slot = ca - cb;
    }
    trim(out)
}

fn shift(a: &[Rational], by: usize) -> Vec<Rational> {
    if a.is_empty() {
        return Vec::new();
    }
    let mut out = vec![Rational::zero(); by];
    out.extend(a.iter().cloned());
    out
}

/// Multiplies by `(1-t)`.
fn mul_one_minus_t(a: &[Rational]) -> Vec<Rational> {
    sub(a, &shift(a, 1))
}

/// Exact division by `(1-t)`: prefix sums, valid when they close at zero.
fn div_one_minus_t(a: &[Rational]) -> Option<Vec<Rational>> {
    if a.is_empty() {
        return Some(Vec::new());
    }
    let mut prefix = Vec::with_capacity(a.len());
    let mut acc = Rational::zero();
    for c in a {
        acc = acc + c.clone();
        prefix.push(acc.clone());
    }
    if !prefix.pop().expect("nonempty").is_zero() {
        return None;
    }
    Some(trim(prefix))
}

/// Multiplies a polynomial by the linear factor `(n + shift)`.
fn mul_linear(p: &[Rational], shift: &Rational) -> Vec<Rational> {
    let mut out = vec![Rational::zero(); p.len() + 1];
    for (d, c) in p.iter().enumerate() {
        out[d] = out[d].clone() + c.clone() * shift.clone();
        out[d + 1] = out[d + 1].clone() + c.clone();
    }
    out
}
