// Dataset collaborator: owns row/column access for the search. CSV parsing
// and any other ingest format are explicitly out of scope for this crate —
// callers build a `Dataset` however they like and hand it to `discover`.

use crate::error::{AfdError, Result};

/// Read-only, thread-safe tabular data the search operates over.
///
/// Tokens are compared by equality only; there is no type coercion and no
/// NULL handling beyond treating a missing value as an ordinary token.
pub trait Dataset: Send + Sync {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;

    /// The token at `(row, col)`.
    ///
    /// # Panics
    /// Panics if `row` or `col` is out of bounds — a programmer error, not a
    /// data condition the engine is designed to recover from.
    fn value(&self, row: usize, col: usize) -> &str;

    fn column_name(&self, col: usize) -> &str;
}

/// An in-memory, row-major `Dataset` built from owned strings.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    rows: Vec<Vec<String>>,
    column_names: Vec<String>,
}

impl InMemoryDataset {
    /// Builds a dataset from row-major data, validating that every row has
    /// exactly `column_names.len()` values.
    pub fn new(rows: Vec<Vec<String>>, column_names: Vec<String>) -> Result<Self> {
        let expected = column_names.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(AfdError::DimensionMismatch {
                    row: i,
                    expected,
                    actual: row.len(),
                });
            }
        }
        Ok(Self { rows, column_names })
    }

    /// Builds a dataset with synthesized column names `col_0 .. col_{m-1}`.
    pub fn with_generated_names(rows: Vec<Vec<String>>, column_count: usize) -> Result<Self> {
        let names = (0..column_count).map(|c| format!("col_{c}")).collect();
        Self::new(rows, names)
    }
}

impl Dataset for InMemoryDataset {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.column_names.len()
    }

    fn value(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    fn column_name(&self, col: usize) -> &str {
        &self.column_names[col]
    }
}
