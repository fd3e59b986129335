// Injectable metrics collector. No process-wide mutable singleton: the
// handle flows through `DiscoveryConfig` and the caller decides what, if
// anything, it does with the counters.

use std::time::Duration;

pub trait Metrics: Send + Sync {
    fn incr_counter(&self, name: &'static str);
    fn record_duration(&self, name: &'static str, duration: Duration);
}

/// Default collector: discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn incr_counter(&self, _name: &'static str) {}
    fn record_duration(&self, _name: &'static str, _duration: Duration) {}
}
