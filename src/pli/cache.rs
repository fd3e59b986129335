// Memoizing cache of PLIs keyed by column set. Single-column PLIs are built
// eagerly at construction and pinned; higher-arity PLIs are built lazily by
// intersecting the PLI of the lowest-indexed member with the PLI of the
// remaining columns, so the result for a given X is independent of the path
// by which X was first requested.
//
// Read-only and thread-safe once built: `dashmap` gives compute-if-absent
// semantics without a crate-wide lock, the same pattern this codebase uses
// elsewhere for concurrent lookup structures. Bounded mode swaps the
// unbounded `DashMap` for a mutex-guarded LRU map so memory stays capped for
// wide schemas where the PLI population would otherwise grow as 2^m.

use crate::column_set::ColumnSet;
use crate::common::bounded_map::BoundedHashMap;
use crate::dataset::Dataset;
use crate::error::{AfdError, Result};
use crate::pli::Pli;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

enum Store {
    Unbounded(DashMap<ColumnSet, Arc<Pli>>),
    Bounded(Mutex<BoundedHashMap<ColumnSet, Arc<Pli>>>),
}

pub struct PliCache<'d> {
    dataset: &'d dyn Dataset,
    column_count: usize,
    singles: Vec<Arc<Pli>>,
    multi: Store,
}

impl<'d> PliCache<'d> {
    /// Builds the cache, eagerly constructing every single-column PLI.
    ///
    /// `capacity` switches on bounded LRU mode for multi-column entries when
    /// `Some`; single-column entries are always pinned regardless of mode.
    pub fn new(dataset: &'d dyn Dataset, capacity: Option<usize>) -> Result<Self> {
        let column_count = dataset.column_count();
        let mut singles = Vec::with_capacity(column_count);
        for c in 0..column_count {
            singles.push(Arc::new(Pli::build(c, dataset)?));
        }
        let multi = match capacity {
            Some(cap) => Store::Bounded(Mutex::new(BoundedHashMap::new(cap.max(1)))),
            None => Store::Unbounded(DashMap::new()),
        };
        Ok(Self {
            dataset,
            column_count,
            singles,
            multi,
        })
    }

    /// Returns the PLI for `columns`, building and memoizing it if absent.
    pub fn get_pli(&self, columns: &ColumnSet) -> Result<Arc<Pli>> {
        if columns.is_empty() {
            return Err(AfdError::EmptyColumnSet);
        }
        for c in columns.iter() {
            if c >= self.column_count {
                return Err(AfdError::InvalidColumn(c, self.column_count));
            }
        }

        if columns.cardinality() == 1 {
            let c = columns.iter().next().expect("cardinality checked above");
            return Ok(Arc::clone(&self.singles[c]));
        }

        if let Some(hit) = self.lookup(columns) {
            return Ok(hit);
        }

        let lowest = columns.iter().next().expect("non-empty, checked above");
        let rest = columns.without_bit(lowest);
        let rest_pli = self.get_pli(&rest)?;
        let single = Arc::clone(&self.singles[lowest]);
        let built = Arc::new(single.intersect(&rest_pli));

        debug!(columns = ?columns, key_count = built.key_count(), "built PLI");
        self.store(columns.clone(), Arc::clone(&built));
        Ok(built)
    }

    fn lookup(&self, columns: &ColumnSet) -> Option<Arc<Pli>> {
        match &self.multi {
            Store::Unbounded(map) => map.get(columns).map(|e| Arc::clone(e.value())),
            Store::Bounded(map) => map.lock().get(columns).cloned(),
        }
    }

    fn store(&self, columns: ColumnSet, pli: Arc<Pli>) {
        match &self.multi {
            Store::Unbounded(map) => {
                map.insert(columns, pli);
            }
            Store::Bounded(map) => {
                let (_, evicted) = map.lock().insert(columns, pli);
                if let Some(evicted) = evicted {
                    debug!(columns = ?evicted, "evicted PLI from bounded cache");
                }
            }
        }
    }

    pub fn dataset(&self) -> &dyn Dataset {
        self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InMemoryDataset;

    fn ds() -> InMemoryDataset {
        let data = vec![
            vec!["A".into(), "1".into()],
            vec!["A".into(), "2".into()],
            vec!["B".into(), "1".into()],
            vec!["B".into(), "2".into()],
        ];
        InMemoryDataset::with_generated_names(data, 2).unwrap()
    }

    #[test]
    fn empty_column_set_errors() {
        let d = ds();
        let cache = PliCache::new(&d, None).unwrap();
        let err = cache.get_pli(&ColumnSet::empty(2)).unwrap_err();
        assert_eq!(err, AfdError::EmptyColumnSet);
    }

    #[test]
    fn out_of_range_column_errors() {
        let d = ds();
        let cache = PliCache::new(&d, None).unwrap();
        let err = cache.get_pli(&ColumnSet::singleton(2, 9)).unwrap_err();
        assert!(matches!(err, AfdError::InvalidColumn(9, 2)));
    }

    #[test]
    fn repeated_lookup_is_deterministic() {
        let d = ds();
        let cache = PliCache::new(&d, None).unwrap();
        let cols = ColumnSet::from_iter(2, [0, 1]);
        let a = cache.get_pli(&cols).unwrap();
        let b = cache.get_pli(&cols).unwrap();
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn bounded_mode_rebuilds_after_eviction() {
        let d = ds();
        let cache = PliCache::new(&d, Some(1)).unwrap();
        let cols = ColumnSet::from_iter(2, [0, 1]);
        let a = cache.get_pli(&cols).unwrap();
        // Force eviction by requesting a different multi-column key... here
        // there's only one possible multi-column key for m=2, so re-fetch
        // simply proves the bounded path also returns a correct, equal PLI.
        let b = cache.get_pli(&cols).unwrap();
        assert_eq!(a, b);
    }

    fn ds3() -> InMemoryDataset {
        let data = vec![
            vec!["A".into(), "1".into(), "x".into()],
            vec!["A".into(), "2".into(), "x".into()],
            vec!["B".into(), "1".into(), "y".into()],
            vec!["B".into(), "2".into(), "y".into()],
        ];
        InMemoryDataset::with_generated_names(data, 3).unwrap()
    }

    #[test]
    fn bounded_mode_actually_evicts_and_rebuilds_a_correct_pli() {
        let d = ds3();
        let cache = PliCache::new(&d, Some(1)).unwrap();
        let ab = ColumnSet::from_iter(3, [0, 1]);
        let bc = ColumnSet::from_iter(3, [1, 2]);

        let ab_first = cache.get_pli(&ab).unwrap();
        // A distinct multi-column key evicts `ab` out of the capacity-1
        // bounded store.
        cache.get_pli(&bc).unwrap();
        let ab_second = cache.get_pli(&ab).unwrap();

        assert_eq!(ab_first, ab_second);
        assert!(!Arc::ptr_eq(&ab_first, &ab_second));
    }
}
