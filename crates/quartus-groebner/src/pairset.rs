//! Removable, ordered collections of critical pairs.
//!
//! Two layouts share one interface: a flat collection ordered by the injected
//! selection strategy (extraction yields one minimal pair), and a graded
//! collection bucketed by lcm total degree (extraction yields the entire
//! minimal-degree bucket). Degree-scheduled callers rely on graded extraction
//! being non-decreasing across the life of the set; that holds whenever the
//! ideal is homogeneous, which those callers arrange by homogenizing first.

use std::collections::BTreeMap;

use quartus_poly::MonomialOrder;

use crate::pair::{CriticalPair, SelectionStrategy};

enum Store {
    Flat(Vec<CriticalPair>),
    Graded(BTreeMap<u32, Vec<CriticalPair>>),
}

/// The pending critical pairs of a computation.
pub struct PairSet {
    store: Store,
    order: MonomialOrder,
    selection: SelectionStrategy,
}

impl PairSet {
    /// Creates a flat pair set: one global order, single-pair extraction.
    #[must_use]
    pub fn flat(order: MonomialOrder, selection: SelectionStrategy) -> Self {
        Self {
            store: Store::Flat(Vec::new()),
            order,
            selection,
        }
    }

    /// Creates a graded pair set bucketed by lcm total degree.
    #[must_use]
    pub fn graded(order: MonomialOrder, selection: SelectionStrategy) -> Self {
        Self {
            store: Store::Graded(BTreeMap::new()),
            order,
            selection,
        }
    }

    /// True when extraction yields whole degree buckets.
    #[must_use]
    pub fn is_graded(&self) -> bool {
        matches!(self.store, Store::Graded(_))
    }

    /// Number of pending pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.store {
            Store::Flat(v) => v.len(),
            Store::Graded(b) => b.values().map(Vec::len).sum(),
        }
    }

    /// True when no pairs are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.store {
            Store::Flat(v) => v.is_empty(),
            Store::Graded(b) => b.is_empty(),
        }
    }

    /// Inserts a pair.
    pub fn insert(&mut self, pair: CriticalPair) {
        match &mut self.store {
            Store::Flat(v) => v.push(pair),
            Store::Graded(b) => b.entry(pair.degree()).or_default().push(pair),
        }
    }

    /// Keeps only the pairs satisfying the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&CriticalPair) -> bool) {
        match &mut self.store {
            Store::Flat(v) => v.retain(|p| keep(p)),
            Store::Graded(b) => {
                b.retain(|_, bucket| {
                    bucket.retain(|p| keep(p));
                    !bucket.is_empty()
                });
            }
        }
    }

    /// The smallest pending lcm degree, if any.
    #[must_use]
    pub fn min_degree(&self) -> Option<u32> {
        match &self.store {
            Store::Flat(v) => v.iter().map(CriticalPair::degree).min(),
            Store::Graded(b) => b.keys().next().copied(),
        }
    }

    /// Extracts the next bunch to process: a single minimal pair in flat
    /// mode, the entire minimal-degree bucket in graded mode. The bunch is
    /// sorted by the selection strategy.
    pub fn extract_next(&mut self) -> Vec<CriticalPair> {
        match &mut self.store {
            Store::Flat(v) => {
                if v.is_empty() {
                    return Vec::new();
                }
                let mut best = 0;
                for idx in 1..v.len() {
                    if self.selection.compare(&v[idx], &v[best], self.order)
                        == std::cmp::Ordering::Less
                    {
                        best = idx;
                    }
                }
                vec![v.swap_remove(best)]
            }
            Store::Graded(b) => {
                let Some(&degree) = b.keys().next() else {
                    return Vec::new();
                };
                let mut bucket = b.remove(&degree).expect("bucket exists");
                bucket.sort_by(|a, b| self.selection.compare(a, b, self.order));
                bucket
            }
        }
    }

    /// Drains every pending pair, e.g. when a termination oracle fires.
    pub fn drain_all(&mut self) -> usize {
        let n = self.len();
        match &mut self.store {
            Store::Flat(v) => v.clear(),
            Store::Graded(b) => b.clear(),
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartus_poly::Monomial;

    fn pair(i: usize, j: usize, exps: &[u16], sugar: u32) -> CriticalPair {
        CriticalPair {
            i,
            j,
            lcm: Monomial::new(exps),
            sugar,
        }
    }

    #[test]
    fn test_flat_extraction_order() {
        let mut set = PairSet::flat(MonomialOrder::Grevlex, SelectionStrategy::Normal);
        set.insert(pair(0, 1, &[2, 1], 3));
        set.insert(pair(0, 2, &[1, 1], 2));
        set.insert(pair(1, 2, &[3, 0], 3));

        let first = set.extract_next();
        assert_eq!(first.len(), 1);
        assert_eq!((first[0].i, first[0].j), (0, 2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_graded_bucket_extraction() {
        let mut set = PairSet::graded(MonomialOrder::Grevlex, SelectionStrategy::Sugar);
        set.insert(pair(0, 1, &[2, 1], 3));
        set.insert(pair(0, 2, &[1, 1], 2));
        set.insert(pair(1, 2, &[0, 2], 2));

        assert_eq!(set.min_degree(), Some(2));
        let bunch = set.extract_next();
        assert_eq!(bunch.len(), 2);
        assert!(bunch.iter().all(|p| p.degree() == 2));
        assert_eq!(set.min_degree(), Some(3));
    }

    #[test]
    fn test_retain() {
        let mut set = PairSet::graded(MonomialOrder::Grevlex, SelectionStrategy::Sugar);
        set.insert(pair(0, 1, &[2, 1], 3));
        set.insert(pair(0, 2, &[1, 1], 2));
        set.retain(|p| p.j != 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.min_degree(), Some(3));
    }

    #[test]
    fn test_drain_all() {
        let mut set = PairSet::flat(MonomialOrder::Grevlex, SelectionStrategy::Sugar);
        set.insert(pair(0, 1, &[2, 1], 3));
        set.insert(pair(0, 2, &[1, 1], 2));
        assert_eq!(set.drain_all(), 2);
        assert!(set.is_empty());
    }
}
