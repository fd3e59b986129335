// rusty-fd: approximate functional dependency discovery over tabular data.
//
// Entry point is `discover`, which runs one `SearchSpace` per RHS column
// against a `PliCache` shared across all of them, and concatenates the
// minimal covers each one finds.

pub mod column_set;
pub mod common;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fd;
pub mod measure;
pub mod metrics;
pub mod node;
pub mod pli;
pub mod sampling;
pub mod search;
pub mod trie;

pub use column_set::ColumnSet;
pub use config::{DiscoveryConfig, DiscoveryConfigBuilder};
pub use dataset::{Dataset, InMemoryDataset};
pub use error::{AfdError, Result};
pub use fd::FunctionalDependency;
pub use pli::cache::PliCache;

use search::SearchSpace;
use tracing::info_span;

/// Discovers the minimal cover of approximate functional dependencies over
/// `dataset`, one RHS column at a time, `0 <= a < column_count`.
///
/// Column sets serving as an LHS never include their own RHS column; each
/// RHS is searched independently against a single `PliCache` shared across
/// all of them, so a PLI built while searching one RHS is reused for every
/// other.
pub fn discover(dataset: &dyn Dataset, config: &DiscoveryConfig) -> Result<Vec<FunctionalDependency>> {
    let span = info_span!("discover", columns = dataset.column_count(), rows = dataset.row_count());
    let _guard = span.enter();

    let cache = PliCache::new(dataset, config.cache_capacity())?;
    let mut results = Vec::new();
    for rhs in 0..dataset.column_count() {
        let mut space = SearchSpace::new(rhs, dataset, &cache, config);
        results.extend(space.run()?);
        if config.cancel_flag().load(std::sync::atomic::Ordering::Relaxed) {
            break;
        }
    }
    Ok(results)
}
