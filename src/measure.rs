// g3 error measure (§4.C): the fraction of rows that would need to be
// removed for a candidate LHS to functionally determine the RHS.
//
// `calculate_error` is the exact computation the search calls `validate`
// with; `estimate_error` restricts the same counting scheme to a sample of
// rows, which is what backs `estimate` and is allowed to over- or
// under-state the true value.

use crate::column_set::ColumnSet;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::pli::cache::PliCache;
use crate::pli::Pli;
use crate::sampling::SamplingStrategy;
use std::collections::{HashMap, HashSet};

pub trait ErrorMeasure: Send + Sync {
    fn calculate_error(
        &self,
        lhs: &ColumnSet,
        rhs: usize,
        dataset: &dyn Dataset,
        cache: &PliCache,
    ) -> Result<f64>;

    fn estimate_error(
        &self,
        lhs: &ColumnSet,
        rhs: usize,
        dataset: &dyn Dataset,
        cache: &PliCache,
        sampler: &dyn SamplingStrategy,
        sample_size: usize,
    ) -> Result<f64>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct G3Measure;

impl G3Measure {
    /// row -> index of its containing class in `pli`, for rows that belong
    /// to a non-singleton class. Rows absent from the map are singletons.
    fn row_to_class(pli: &Pli) -> HashMap<usize, usize> {
        let mut map = HashMap::new();
        for (label, class) in pli.classes().iter().enumerate() {
            for &row in class {
                map.insert(row, label);
            }
        }
        map
    }

    fn top_of(class: &[usize], row_to_label: &HashMap<usize, usize>) -> usize {
        let mut buckets: HashMap<Option<usize>, usize> = HashMap::new();
        for &row in class {
            let key = row_to_label.get(&row).copied();
            // Absent rows are each their own singleton bucket in the RHS
            // partition; key them uniquely so they never merge.
            let bucket_key = key.or(Some(usize::MAX - row));
            *buckets.entry(bucket_key).or_insert(0) += 1;
        }
        buckets.into_values().max().unwrap_or(0)
    }
}

impl ErrorMeasure for G3Measure {
    fn calculate_error(
        &self,
        lhs: &ColumnSet,
        rhs: usize,
        dataset: &dyn Dataset,
        cache: &PliCache,
    ) -> Result<f64> {
        let n = dataset.row_count();
        if n == 0 {
            return Ok(0.0);
        }
        let rhs_pli = cache.get_pli(&ColumnSet::singleton(lhs.width(), rhs))?;
        let row_to_label = Self::row_to_class(&rhs_pli);

        if lhs.is_empty() {
            let top_all = rhs_pli.classes().iter().map(|c| c.len()).max().unwrap_or(1);
            return Ok((n - top_all) as f64 / n as f64);
        }

        let lhs_pli = cache.get_pli(lhs)?;
        let mut removed = 0usize;
        for class in lhs_pli.classes() {
            let top = Self::top_of(class, &row_to_label);
            removed += class.len() - top;
        }
        Ok(removed as f64 / n as f64)
    }

    fn estimate_error(
        &self,
        lhs: &ColumnSet,
        rhs: usize,
        dataset: &dyn Dataset,
        cache: &PliCache,
        sampler: &dyn SamplingStrategy,
        sample_size: usize,
    ) -> Result<f64> {
        let n = dataset.row_count();
        if n == 0 {
            return Ok(0.0);
        }
        let sample: HashSet<usize> = sampler.sample(n, sample_size).into_iter().collect();
        if sample.is_empty() {
            return Ok(0.0);
        }
        let k = sample.len();

        let rhs_pli = cache.get_pli(&ColumnSet::singleton(lhs.width(), rhs))?;
        let row_to_label = Self::row_to_class(&rhs_pli);

        if lhs.is_empty() {
            let mut buckets: HashMap<Option<usize>, usize> = HashMap::new();
            for &row in &sample {
                let key = row_to_label.get(&row).copied();
                let bucket_key = key.or(Some(usize::MAX - row));
                *buckets.entry(bucket_key).or_insert(0) += 1;
            }
            let top_all = buckets.into_values().max().unwrap_or(1);
            return Ok((k - top_all) as f64 / k as f64);
        }

        let lhs_pli = cache.get_pli(lhs)?;
        let mut removed = 0usize;
        for class in lhs_pli.classes() {
            let filtered: Vec<usize> = class.iter().copied().filter(|r| sample.contains(r)).collect();
            if filtered.len() < 2 {
                continue;
            }
            let top = Self::top_of(&filtered, &row_to_label);
            removed += filtered.len() - top;
        }
        Ok(removed as f64 / k as f64)
    }
}
