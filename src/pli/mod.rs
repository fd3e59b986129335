pub mod cache;

use crate::column_set::ColumnSet;
use crate::dataset::Dataset;
use crate::error::{AfdError, Result};
use std::collections::HashMap;

/// Partition of row-IDs induced by agreement on a column set.
///
/// Singleton classes (rows that agree with no other row) carry no
/// FD-relevant information and are elided — they never appear in
/// `classes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pli {
    columns: ColumnSet,
    classes: Vec<Vec<usize>>,
}

impl Pli {
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn classes(&self) -> &[Vec<usize>] {
        &self.classes
    }

    /// Builds the single-column PLI for `col` by grouping row-IDs on their
    /// token, dropping groups of size 1.
    pub fn build(col: usize, dataset: &dyn Dataset) -> Result<Self> {
        if col >= dataset.column_count() {
            return Err(AfdError::InvalidColumn(col, dataset.column_count()));
        }
        let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
        for row in 0..dataset.row_count() {
            groups.entry(dataset.value(row, col)).or_default().push(row);
        }
        let classes = groups
            .into_values()
            .filter(|g| g.len() >= 2)
            .collect::<Vec<_>>();
        Ok(Self {
            columns: ColumnSet::singleton(dataset.column_count(), col),
            classes,
        })
    }

    /// Refines `self` against `other`: two rows land in the same output
    /// class iff they were in the same class in both inputs.
    ///
    /// Builds an auxiliary row -> class-label map from `other` once, then
    /// re-buckets each of `self`'s classes by that label. O(n) for the
    /// lookup map plus O(sum of class sizes) for the re-bucketing.
    pub fn intersect(&self, other: &Self) -> Self {
        let mut row_to_label: HashMap<usize, usize> = HashMap::new();
        for (label, class) in other.classes.iter().enumerate() {
            for &row in class {
                row_to_label.insert(row, label);
            }
        }

        let mut classes = Vec::new();
        for class in &self.classes {
            let mut buckets: HashMap<Option<usize>, Vec<usize>> = HashMap::new();
            for &row in class {
                // Rows absent from `other` (singletons there) each form
                // their own bucket, keyed by the row itself so they never
                // collide with a real label.
                let key = row_to_label.get(&row).copied();
                let bucket_key = key.or(Some(usize::MAX - row));
                buckets.entry(bucket_key).or_default().push(row);
            }
            for bucket in buckets.into_values() {
                if bucket.len() >= 2 {
                    classes.push(bucket);
                }
            }
        }

        Self {
            columns: self.columns.union(&other.columns),
            classes,
        }
    }

    /// Number of non-singleton classes.
    pub fn key_count(&self) -> usize {
        self.classes.len()
    }

    /// Σ |class| * (|class| - 1), used by the g3 measure's denominator math.
    pub fn entropy_contribution(&self) -> usize {
        self.classes.iter().map(|c| c.len() * (c.len() - 1)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InMemoryDataset;

    fn ds(rows: &[&[&str]]) -> InMemoryDataset {
        let data = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        InMemoryDataset::with_generated_names(data, rows[0].len()).unwrap()
    }

    #[test]
    fn build_drops_singletons() {
        let d = ds(&[&["A"], &["A"], &["B"]]);
        let p = Pli::build(0, &d).unwrap();
        assert_eq!(p.classes().len(), 1);
        let mut members = p.classes()[0].clone();
        members.sort();
        assert_eq!(members, vec![0, 1]);
    }

    #[test]
    fn build_invalid_column() {
        let d = ds(&[&["A"]]);
        let err = Pli::build(5, &d).unwrap_err();
        assert_eq!(err, AfdError::InvalidColumn(5, 1));
    }

    #[test]
    fn intersect_matches_s4_scenario() {
        // c0 = [A,A,B,B], c1 = [1,2,1,2]
        let d = ds(&[
            &["A", "1"],
            &["A", "2"],
            &["B", "1"],
            &["B", "2"],
        ]);
        let p0 = Pli::build(0, &d).unwrap();
        let p1 = Pli::build(1, &d).unwrap();
        assert_eq!(p0.classes().len(), 2);
        assert_eq!(p1.classes().len(), 2);

        let p01 = p0.intersect(&p1);
        assert!(p01.classes().is_empty());
    }

    #[test]
    fn intersect_is_commutative_and_associative_up_to_class_order() {
        let d = ds(&[
            &["A", "1", "x"],
            &["A", "1", "y"],
            &["A", "2", "x"],
            &["B", "2", "x"],
            &["B", "2", "x"],
        ]);
        let p = Pli::build(0, &d).unwrap();
        let q = Pli::build(1, &d).unwrap();
        let r = Pli::build(2, &d).unwrap();

        let pq = p.intersect(&q);
        let qp = q.intersect(&p);
        assert_eq!(sorted_classes(&pq), sorted_classes(&qp));

        let left = p.intersect(&q).intersect(&r);
        let right = p.intersect(&q.intersect(&r));
        assert_eq!(sorted_classes(&left), sorted_classes(&right));
    }

    fn sorted_classes(p: &Pli) -> Vec<Vec<usize>> {
        let mut classes: Vec<Vec<usize>> = p
            .classes()
            .iter()
            .map(|c| {
                let mut c = c.clone();
                c.sort();
                c
            })
            .collect();
        classes.sort();
        classes
    }
}
