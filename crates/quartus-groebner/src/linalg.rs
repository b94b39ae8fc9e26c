//! Hybrid dense/sparse rows and structured Gaussian elimination.
//!
//! One row layout serves both coefficient capabilities: columns whose fill
//! ratio exceeds ~10% (chosen once per matrix) are backed by a plain array,
//! the rest live in a sorted (column, value) tail. Over a field, elimination
//! scales by the pivot reciprocal; over a general ring it cross-multiplies
//! with lcm-derived cofactors and strips common content afterwards, so the
//! arithmetic stays exact and denominator-free without invertibility.

use quartus_rings::traits::{CoefficientRing, Ring};

/// Column classification shared by every row of one matrix.
pub struct RowLayout {
    num_cols: usize,
    /// col -> dense slot, or `u32::MAX` for tail columns.
    dense_slot: Vec<u32>,
    /// dense slot -> col, ascending.
    dense_cols: Vec<u32>,
}

const TAIL: u32 = u32::MAX;

/// Fill ratio (in percent) above which a column gets a dense slot.
const DENSE_FILL_PERCENT: usize = 10;

impl RowLayout {
    /// Chooses dense columns from per-column fill counts.
    #[must_use]
    pub fn choose(column_fill: &[usize], num_rows: usize) -> Self {
        let num_cols = column_fill.len();
        let mut dense_slot = vec![TAIL; num_cols];
        let mut dense_cols = Vec::new();
        for (col, &fill) in column_fill.iter().enumerate() {
            if num_rows > 0 && fill * 100 > num_rows * DENSE_FILL_PERCENT {
                dense_slot[col] = dense_cols.len() as u32;
                dense_cols.push(col as u32);
            }
        }
        Self {
            num_cols,
            dense_slot,
            dense_cols,
        }
    }

    /// A layout with no dense columns (degenerate, used by tests).
    #[must_use]
    pub fn all_sparse(num_cols: usize) -> Self {
        Self {
            num_cols,
            dense_slot: vec![TAIL; num_cols],
            dense_cols: Vec::new(),
        }
    }

    /// Total column count.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }
}

/// One matrix row: dense slice over the layout's dense columns plus a sorted
/// sparse tail. Mutated in place during elimination.
#[derive(Clone)]
pub struct SparseRow<R> {
    dense: Vec<R>,
    cols: Vec<u32>,
    vals: Vec<R>,
}

impl<R: CoefficientRing> SparseRow<R> {
    /// Builds a row from entries sorted by column.
    #[must_use]
    pub fn from_entries(layout: &RowLayout, entries: &[(u32, R)]) -> Self {
        let mut dense = vec![R::zero(); layout.dense_cols.len()];
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        for (col, val) in entries {
            debug_assert!((*col as usize) < layout.num_cols);
            let slot = layout.dense_slot[*col as usize];
            if slot == TAIL {
                cols.push(*col);
                vals.push(val.clone());
            } else {
                dense[slot as usize] = val.clone();
            }
        }
        Self { dense, cols, vals }
    }

    /// True when every entry is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.cols.is_empty() && self.dense.iter().all(Ring::is_zero)
    }

    /// Number of structurally non-zero entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.cols.len() + self.dense.iter().filter(|v| !v.is_zero()).count()
    }

    /// The smallest column holding a non-zero value.
    #[must_use]
    pub fn leading(&self, layout: &RowLayout) -> Option<u32> {
        let dense_lead = layout
            .dense_cols
            .iter()
            .zip(&self.dense)
            .find(|(_, v)| !v.is_zero())
            .map(|(c, _)| *c);
        let sparse_lead = self.cols.first().copied();
        match (dense_lead, sparse_lead) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// The value at `col`, if structurally present and non-zero.
    #[must_use]
    pub fn coeff(&self, layout: &RowLayout, col: u32) -> Option<R> {
        let slot = layout.dense_slot[col as usize];
        if slot == TAIL {
            self.cols
                .binary_search(&col)
                .ok()
                .map(|i| self.vals[i].clone())
        } else {
            let v = &self.dense[slot as usize];
            (!v.is_zero()).then(|| v.clone())
        }
    }

    /// Scales every entry.
    pub fn scale(&mut self, factor: &R) {
        for v in &mut self.dense {
            if !v.is_zero() {
                *v = v.clone() * factor.clone();
            }
        }
        for v in &mut self.vals {
            *v = v.clone() * factor.clone();
        }
    }

    /// `self -= factor * other`: dense slice updated directly, sparse tails
    /// merged in one linear pass.
    pub fn axpy(&mut self, factor: &R, other: &Self) {
        for (slot, v) in other.dense.iter().enumerate() {
            if !v.is_zero() {
                self.dense[slot] = self.dense[slot].clone() - factor.clone() * v.clone();
            }
        }

        let mut cols = Vec::with_capacity(self.cols.len() + other.cols.len());
        let mut vals = Vec::with_capacity(cols.capacity());
        let (mut a, mut b) = (0usize, 0usize);
        while a < self.cols.len() || b < other.cols.len() {
            let take_a = b >= other.cols.len()
                || (a < self.cols.len() && self.cols[a] < other.cols[b]);
            let take_both =
                a < self.cols.len() && b < other.cols.len() && self.cols[a] == other.cols[b];
            if take_both {
                let v = self.vals[a].clone() - factor.clone() * other.vals[b].clone();
                if !v.is_zero() {
                    cols.push(self.cols[a]);
                    vals.push(v);
                }
                a += 1;
                b += 1;
            } else if take_a {
                cols.push(self.cols[a]);
                vals.push(self.vals[a].clone());
                a += 1;
            } else {
                let v = -(factor.clone() * other.vals[b].clone());
                if !v.is_zero() {
                    cols.push(other.cols[b]);
                    vals.push(v);
                }
                b += 1;
            }
        }
        self.cols = cols;
        self.vals = vals;
    }

    /// Divides out the content of the row (no-op over a field).
    pub fn strip_content(&mut self) {
        if R::FIELD {
            return;
        }
        let mut content = R::zero();
        for v in self.dense.iter().chain(&self.vals) {
            if !v.is_zero() {
                content = content.gcd(v);
                if content.is_unit() {
                    return;
                }
            }
        }
        if content.is_zero() || content.is_one() {
            return;
        }
        for v in self.dense.iter_mut().chain(&mut self.vals) {
            if !v.is_zero() {
                *v = v.checked_div(&content).expect("content divides entries");
            }
        }
    }

    /// All entries sorted by column.
    #[must_use]
    pub fn to_entries(&self, layout: &RowLayout) -> Vec<(u32, R)> {
        let mut entries: Vec<(u32, R)> = layout
            .dense_cols
            .iter()
            .zip(&self.dense)
            .filter(|(_, v)| !v.is_zero())
            .map(|(c, v)| (*c, v.clone()))
            .collect();
        entries.extend(self.cols.iter().copied().zip(self.vals.iter().cloned()));
        entries.sort_by_key(|(c, _)| *c);
        entries
    }
}

/// Cancels `col` in `row` using `pivot` (which must be non-zero at `col`).
///
/// Field path: one reciprocal-scaled axpy. Ring path: cross-multiplication by
/// lcm-derived cofactors, content stripped afterwards.
pub fn eliminate<R: CoefficientRing>(
    row: &mut SparseRow<R>,
    pivot: &SparseRow<R>,
    col: u32,
    layout: &RowLayout,
) {
    let Some(c) = row.coeff(layout, col) else {
        return;
    };
    let p = pivot
        .coeff(layout, col)
        .expect("pivot must be non-zero at its column");

    if let Some(p_inv) = p.try_inv() {
        row.axpy(&(c * p_inv), pivot);
    } else {
        let l = c.lcm(&p);
        let s = l.checked_div(&c).expect("lcm divisible by its factor");
        let t = l.checked_div(&p).expect("lcm divisible by its factor");
        row.scale(&s);
        row.axpy(&t, pivot);
        row.strip_content();
    }
    debug_assert!(row.coeff(layout, col).is_none());
}

/// True when `a` is the better pivot choice: sparser, with unit leading
/// coefficients breaking ties (they keep ring elimination division-free).
#[must_use]
pub fn better_pivot<R: CoefficientRing>(
    a: &SparseRow<R>,
    b: &SparseRow<R>,
    layout: &RowLayout,
    col: u32,
) -> bool {
    if !R::FIELD {
        let unit = |r: &SparseRow<R>| r.coeff(layout, col).is_some_and(|v| v.is_unit());
        match (unit(a), unit(b)) {
            (true, false) => return true,
            (false, true) => return false,
            _ => {}
        }
    }
    a.nnz() < b.nnz()
}

/// Brings `rows` to row-echelon form in place by generic elimination.
///
/// Pivots pick the sparsest candidate (unit leads preferred over non-fields);
/// zero rows are dropped and the survivors end up sorted by leading column.
pub fn row_echelon<R: CoefficientRing>(rows: &mut Vec<SparseRow<R>>, layout: &RowLayout) {
    let mut settled = 0usize;

    loop {
        // find the smallest leading column among unsettled rows
        let mut lead: Option<u32> = None;
        for row in rows[settled..].iter() {
            if let Some(l) = row.leading(layout) {
                lead = Some(lead.map_or(l, |best| best.min(l)));
            }
        }
        let Some(col) = lead else { break };

        // choose the pivot among rows leading at `col`
        let mut pivot_idx: Option<usize> = None;
        for idx in settled..rows.len() {
            if rows[idx].leading(layout) == Some(col) {
                pivot_idx = Some(match pivot_idx {
                    None => idx,
                    Some(best) => {
                        if better_pivot(&rows[idx], &rows[best], layout, col) {
                            idx
                        } else {
                            best
                        }
                    }
                });
            }
        }
        let pivot_idx = pivot_idx.expect("some row leads at the minimal column");
        rows.swap(settled, pivot_idx);

        let (pivot, rest) = rows[settled..].split_first_mut().expect("nonempty");
        for row in rest {
            if row.leading(layout) == Some(col) {
                eliminate(row, pivot, col, layout);
            }
        }
        settled += 1;
    }

    rows.retain(|r| !r.is_zero());
    rows.sort_by_key(|r| r.leading(layout));
}
