// A single lattice vertex for one fixed RHS. The state machine
// Unknown -> Estimated -> Validated is monotone: once Validated, a node is
// never re-estimated or re-validated (§3 Node, §8 round-trip law).

use crate::column_set::ColumnSet;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::measure::ErrorMeasure;
use crate::pli::cache::PliCache;
use crate::sampling::SamplingStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Unknown,
    Estimated,
    Validated,
}

#[derive(Debug, Clone)]
pub struct Node {
    lhs: ColumnSet,
    error: f64,
    state: NodeState,
}

impl Node {
    pub fn new(lhs: ColumnSet) -> Self {
        Self {
            lhs,
            error: 0.0,
            state: NodeState::Unknown,
        }
    }

    pub fn lhs(&self) -> &ColumnSet {
        &self.lhs
    }

    pub fn level(&self) -> usize {
        self.lhs.cardinality()
    }

    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_validated(&self) -> bool {
        self.state == NodeState::Validated
    }

    /// Whether this node satisfies the error bound given its current
    /// (possibly only estimated) error.
    pub fn holds(&self, max_error: f64) -> bool {
        self.state != NodeState::Unknown && self.error <= max_error
    }

    /// Computes the exact g3 and transitions to `Validated`. A no-op on an
    /// already-`Validated` node beyond re-returning its error.
    pub fn validate(
        &mut self,
        rhs: usize,
        dataset: &dyn Dataset,
        cache: &PliCache,
        measure: &dyn ErrorMeasure,
    ) -> Result<f64> {
        if self.state == NodeState::Validated {
            return Ok(self.error);
        }
        let g3 = measure.calculate_error(&self.lhs, rhs, dataset, cache)?;
        self.error = g3;
        self.state = NodeState::Validated;
        Ok(g3)
    }

    /// Draws a sampled g3 estimate and transitions Unknown -> Estimated.
    /// Never downgrades a `Validated` node.
    pub fn estimate(
        &mut self,
        rhs: usize,
        dataset: &dyn Dataset,
        cache: &PliCache,
        measure: &dyn ErrorMeasure,
        sampler: &dyn SamplingStrategy,
        sample_size: usize,
    ) -> Result<f64> {
        if self.state == NodeState::Validated {
            return Ok(self.error);
        }
        let g3 = measure.estimate_error(&self.lhs, rhs, dataset, cache, sampler, sample_size)?;
        self.error = g3;
        self.state = NodeState::Estimated;
        Ok(g3)
    }
}
