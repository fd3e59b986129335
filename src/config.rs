// Validated configuration surface for `discover`. `max_error` is checked
// eagerly at construction so a bad ε is rejected before any search work
// starts (§7 NumericDomain).

use crate::error::{AfdError, Result};
use crate::measure::{ErrorMeasure, G3Measure};
use crate::metrics::{Metrics, NoopMetrics};
use crate::sampling::{SamplingStrategy, UniformSampler};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub const DEFAULT_SAMPLE_SIZE: usize = 256;
pub const DEFAULT_SEED: u64 = 0x5EED_u64;

pub struct DiscoveryConfig {
    max_error: f64,
    measure: Arc<dyn ErrorMeasure>,
    sampler: Arc<dyn SamplingStrategy>,
    sample_size: usize,
    cache_capacity: Option<usize>,
    cancel: Arc<AtomicBool>,
    metrics: Arc<dyn Metrics>,
}

impl DiscoveryConfig {
    pub fn builder(max_error: f64) -> Result<DiscoveryConfigBuilder> {
        DiscoveryConfigBuilder::new(max_error)
    }

    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    pub fn measure(&self) -> &dyn ErrorMeasure {
        self.measure.as_ref()
    }

    pub fn sampler(&self) -> &dyn SamplingStrategy {
        self.sampler.as_ref()
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn cache_capacity(&self) -> Option<usize> {
        self.cache_capacity
    }

    pub fn cancel_flag(&self) -> &Arc<AtomicBool> {
        &self.cancel
    }

    pub fn metrics(&self) -> &dyn Metrics {
        self.metrics.as_ref()
    }
}

pub struct DiscoveryConfigBuilder {
    max_error: f64,
    measure: Arc<dyn ErrorMeasure>,
    sampler: Arc<dyn SamplingStrategy>,
    sample_size: usize,
    cache_capacity: Option<usize>,
    cancel: Arc<AtomicBool>,
    metrics: Arc<dyn Metrics>,
}

impl DiscoveryConfigBuilder {
    fn new(max_error: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&max_error) {
            return Err(AfdError::NumericDomain(max_error));
        }
        Ok(Self {
            max_error,
            measure: Arc::new(G3Measure),
            sampler: Arc::new(UniformSampler::new(DEFAULT_SEED)),
            sample_size: DEFAULT_SAMPLE_SIZE,
            cache_capacity: None,
            cancel: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(NoopMetrics),
        })
    }

    pub fn measure(mut self, measure: Arc<dyn ErrorMeasure>) -> Self {
        self.measure = measure;
        self
    }

    pub fn sampler(mut self, sampler: Arc<dyn SamplingStrategy>) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size.max(1);
        self
    }

    pub fn cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = Some(cache_capacity);
        self
    }

    pub fn cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn build(self) -> DiscoveryConfig {
        DiscoveryConfig {
            max_error: self.max_error,
            measure: self.measure,
            sampler: self.sampler,
            sample_size: self.sample_size,
            cache_capacity: self.cache_capacity,
            cancel: self.cancel,
            metrics: self.metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_epsilon() {
        let err = DiscoveryConfig::builder(1.5).unwrap_err();
        assert_eq!(err, AfdError::NumericDomain(1.5));
        let err = DiscoveryConfig::builder(-0.1).unwrap_err();
        assert_eq!(err, AfdError::NumericDomain(-0.1));
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(DiscoveryConfig::builder(0.0).is_ok());
        assert!(DiscoveryConfig::builder(1.0).is_ok());
    }

    #[test]
    fn builder_defaults_are_usable() {
        let config = DiscoveryConfig::builder(0.1).unwrap().build();
        assert_eq!(config.max_error(), 0.1);
        assert_eq!(config.sample_size(), DEFAULT_SAMPLE_SIZE);
        assert!(config.cache_capacity().is_none());
    }
}
