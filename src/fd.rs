// The result type `discover` produces: a single functional dependency
// X -> a. Equality and hashing ignore the recorded error — two FDs with the
// same (LHS, RHS) are the same dependency no matter what error is attached.

use crate::column_set::ColumnSet;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct FunctionalDependency {
    lhs: ColumnSet,
    rhs: usize,
    error: Option<f64>,
}

impl FunctionalDependency {
    /// # Panics
    /// Panics if `rhs` is a member of `lhs` — RHS must not appear in its own
    /// determinant.
    pub fn new(lhs: ColumnSet, rhs: usize, error: Option<f64>) -> Self {
        assert!(!lhs.test(rhs), "rhs {rhs} must not be a member of lhs");
        Self { lhs, rhs, error }
    }

    pub fn lhs(&self) -> &ColumnSet {
        &self.lhs
    }

    pub fn rhs(&self) -> usize {
        self.rhs
    }

    pub fn error(&self) -> Option<f64> {
        self.error
    }
}

impl PartialEq for FunctionalDependency {
    fn eq(&self, other: &Self) -> bool {
        self.lhs == other.lhs && self.rhs == other.rhs
    }
}

impl Eq for FunctionalDependency {}

impl Hash for FunctionalDependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.rhs.hash(state);
    }
}
