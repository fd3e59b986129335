// SearchSpace: the per-RHS lattice walk (§4.D). One instance explores the
// LHS powerset lattice for a single fixed RHS column, using
// sample-estimate/validate with the two pruning tries to find the minimal
// cover of approximate FDs X -> rhs.

use crate::column_set::ColumnSet;
use crate::config::DiscoveryConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::fd::FunctionalDependency;
use crate::node::Node;
use crate::pli::cache::PliCache;
use crate::trie::{MaxNonFds, MinValidFds};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::Ordering as AtomicOrdering;
use std::time::Instant;
use tracing::{debug, info, info_span};

/// A launchpad/queue entry ordered by `(level asc, error asc)`, with
/// insertion order as the final tiebreaker so a fixed sampler seed gives a
/// fully reproducible traversal (§5 ordering guarantees).
struct PqEntry {
    level: usize,
    error: f64,
    seq: u64,
    lhs: ColumnSet,
}

impl PartialEq for PqEntry {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level && self.error.to_bits() == other.error.to_bits() && self.seq == other.seq
    }
}
impl Eq for PqEntry {}

impl PartialOrd for PqEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PqEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level
            .cmp(&other.level)
            .then_with(|| self.error.total_cmp(&other.error))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

pub struct SearchSpace<'a> {
    rhs: usize,
    width: usize,
    dataset: &'a dyn Dataset,
    cache: &'a PliCache<'a>,
    config: &'a DiscoveryConfig,
    node_map: HashMap<ColumnSet, Node>,
    min_valid: MinValidFds,
    max_non_fd: MaxNonFds,
    peaks: Vec<ColumnSet>,
    next_seq: u64,
}

impl<'a> SearchSpace<'a> {
    pub fn new(
        rhs: usize,
        dataset: &'a dyn Dataset,
        cache: &'a PliCache<'a>,
        config: &'a DiscoveryConfig,
    ) -> Self {
        Self {
            rhs,
            width: dataset.column_count(),
            dataset,
            cache,
            config,
            node_map: HashMap::new(),
            min_valid: MinValidFds::new(),
            max_non_fd: MaxNonFds::new(),
            peaks: Vec::new(),
            next_seq: 0,
        }
    }

    /// Runs the full lattice search for this RHS and returns its minimal
    /// cover of approximate FDs.
    pub fn run(&mut self) -> Result<Vec<FunctionalDependency>> {
        let span = info_span!("search_space", rhs = self.rhs);
        let _guard = span.enter();
        let started = Instant::now();
        self.config.metrics().incr_counter("search_space.run");

        let root = ColumnSet::empty(self.width);
        let root_error = self.validate_node(&root)?;
        if root_error <= self.config.max_error() {
            info!(rhs = self.rhs, error = root_error, "rhs is constant");
            self.min_valid.insert(root);
            self.config
                .metrics()
                .record_duration("search_space.duration", started.elapsed());
            return Ok(self.collect_results());
        }

        let mut heap: BinaryHeap<Reverse<PqEntry>> = BinaryHeap::new();
        for i in 0..self.width {
            if i == self.rhs {
                continue;
            }
            let lhs = ColumnSet::singleton(self.width, i);
            let err = self.estimate_node(&lhs)?;
            self.push(&mut heap, lhs, err);
        }

        while let Some(Reverse(entry)) = heap.pop() {
            if self.cancelled() {
                break;
            }
            let l = entry.lhs;

            if self.min_valid.contains_subset_of(&l) {
                continue;
            }

            let mut peak: Option<ColumnSet> = None;
            if self.max_non_fd.contains_superset_of(&l) {
                // invalid-prune: known non-FD superset makes l invalid too;
                // skip straight to escape.
            } else {
                let g3 = self.validate_node(&l)?;
                if g3 <= self.config.max_error() {
                    peak = Some(l.clone());
                } else {
                    let (found_peak, highest_invalid) = self.ascend(l.clone())?;
                    if let Some(hi) = highest_invalid {
                        self.max_non_fd.insert(hi);
                    }
                    peak = found_peak;
                }
            }

            if let Some(p) = peak {
                info!(rhs = self.rhs, peak = ?p, "peak found");
                self.config.metrics().incr_counter("search_space.peak_found");
                if !self.peaks.contains(&p) {
                    self.peaks.push(p.clone());
                }
                self.trickle_down(p)?;
            }

            for new_lhs in self.escape(&l)? {
                if self.min_valid.contains_subset_of(&new_lhs) {
                    continue;
                }
                let err = self.estimate_node(&new_lhs)?;
                self.push(&mut heap, new_lhs, err);
            }
        }

        self.config
            .metrics()
            .record_duration("search_space.duration", started.elapsed());
        Ok(self.collect_results())
    }

    fn cancelled(&self) -> bool {
        self.config.cancel_flag().load(AtomicOrdering::Relaxed)
    }

    fn push(&mut self, heap: &mut BinaryHeap<Reverse<PqEntry>>, lhs: ColumnSet, error: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        heap.push(Reverse(PqEntry {
            level: lhs.cardinality(),
            error,
            seq,
            lhs,
        }));
    }

    fn estimate_node(&mut self, lhs: &ColumnSet) -> Result<f64> {
        let rhs = self.rhs;
        let dataset = self.dataset;
        let cache = self.cache;
        let measure = self.config.measure();
        let sampler = self.config.sampler();
        let sample_size = self.config.sample_size();
        let node = self
            .node_map
            .entry(lhs.clone())
            .or_insert_with(|| Node::new(lhs.clone()));
        node.estimate(rhs, dataset, cache, measure, sampler, sample_size)
    }

    fn validate_node(&mut self, lhs: &ColumnSet) -> Result<f64> {
        let rhs = self.rhs;
        let dataset = self.dataset;
        let cache = self.cache;
        let measure = self.config.measure();
        let node = self
            .node_map
            .entry(lhs.clone())
            .or_insert_with(|| Node::new(lhs.clone()));
        node.validate(rhs, dataset, cache, measure)
    }

    fn supersets_one_up(&self, lhs: &ColumnSet) -> Vec<ColumnSet> {
        (0..self.width)
            .filter(|&c| c != self.rhs && !lhs.test(c))
            .map(|c| lhs.with_bit(c))
            .collect()
    }

    /// Climbs from a non-validated (already invalid) launchpad toward a
    /// valid LHS, widening the non-FD frontier as it goes (§4.D Ascend).
    /// Implemented iteratively; the original algorithm's recursive version
    /// could reach a call depth of `width`, which an iterative loop avoids
    /// (REDESIGN FLAGS / §9).
    fn ascend(&mut self, start: ColumnSet) -> Result<(Option<ColumnSet>, Option<ColumnSet>)> {
        let mut current = start.clone();
        let mut highest_invalid = Some(start);
        let mut peak: Option<ColumnSet> = None;

        // Phase 1: climb toward the first valid LHS.
        loop {
            let children = self.unpruned_children(&current);
            if children.is_empty() {
                return Ok((None, highest_invalid));
            }
            for c in &children {
                self.estimate_node(c)?;
            }
            let min_child = self.pick_extreme(&children, true);
            let g3 = self.validate_node(&min_child)?;
            if g3 <= self.config.max_error() {
                peak = Some(min_child);
                break;
            }
            current = min_child.clone();
            highest_invalid = Some(min_child);
        }

        // Phase 2: widen the non-FD frontier from the peak upward.
        current = peak.clone().expect("peak set in phase 1");
        loop {
            let children = self.unpruned_children(&current);
            if children.is_empty() {
                break;
            }
            for c in &children {
                self.estimate_node(c)?;
            }
            let max_child = self.pick_extreme(&children, false);
            let g3 = self.validate_node(&max_child)?;
            if g3 <= self.config.max_error() {
                break;
            }
            highest_invalid = Some(max_child.clone());
            current = max_child;
        }

        Ok((peak, highest_invalid))
    }

    fn unpruned_children(&self, lhs: &ColumnSet) -> Vec<ColumnSet> {
        self.supersets_one_up(lhs)
            .into_iter()
            .filter(|c| !self.min_valid.contains_subset_of(c))
            .collect()
    }

    fn pick_extreme(&self, candidates: &[ColumnSet], want_min: bool) -> ColumnSet {
        candidates
            .iter()
            .min_by(|a, b| {
                let ea = self.node_map.get(*a).map(|n| n.error()).unwrap_or(0.0);
                let eb = self.node_map.get(*b).map(|n| n.error()).unwrap_or(0.0);
                if want_min {
                    ea.total_cmp(&eb)
                } else {
                    eb.total_cmp(&ea)
                }
            })
            .cloned()
            .expect("candidates is non-empty")
    }

    /// Finds every minimal valid LHS <= `peak` (§4.D TrickleDown).
    fn trickle_down(&mut self, peak: ColumnSet) -> Result<()> {
        let mut heap: BinaryHeap<Reverse<PqEntry>> = BinaryHeap::new();
        let mut visited: HashSet<ColumnSet> = HashSet::new();

        let peak_error = self.node_map.get(&peak).map(|n| n.error()).unwrap_or(0.0);
        self.push(&mut heap, peak, peak_error);

        while let Some(Reverse(entry)) = heap.pop() {
            if self.cancelled() {
                break;
            }
            let n = entry.lhs;

            if n.is_empty() {
                continue;
            }

            if self.min_valid.contains_subset_of(&n) {
                if visited.insert(n.clone()) {
                    self.enqueue_parents(&mut heap, &n)?;
                }
                continue;
            }

            if visited.contains(&n) {
                debug!(rhs = self.rhs, minimal_fd = ?n, "minimal FD emitted");
                self.config.metrics().incr_counter("search_space.minimal_fd");
                self.min_valid.insert(n);
                continue;
            }

            let g3 = self.validate_node(&n)?;
            if g3 <= self.config.max_error() {
                visited.insert(n.clone());
                self.push(&mut heap, n.clone(), g3);
                self.enqueue_parents(&mut heap, &n)?;
            }
            // else: invalid, and by g3's monotonicity every subset of n is
            // also invalid — discard without descending further.
        }

        Ok(())
    }

    fn enqueue_parents(&mut self, heap: &mut BinaryHeap<Reverse<PqEntry>>, n: &ColumnSet) -> Result<()> {
        for c in n.iter() {
            let parent = n.without_bit(c);
            if parent.is_empty() {
                continue;
            }
            let err = self.estimate_node(&parent)?;
            self.push(heap, parent, err);
        }
        Ok(())
    }

    /// Generates new launchpads outside every currently known peak that
    /// covers `l` (§4.D Escape).
    fn escape(&self, l: &ColumnSet) -> Result<Vec<ColumnSet>> {
        let covering: Vec<&ColumnSet> = self.peaks.iter().filter(|p| l.is_subset_of(p)).collect();
        if covering.is_empty() {
            return Ok(Vec::new());
        }
        let gaps: Vec<ColumnSet> = covering
            .into_iter()
            .map(|p| p.complement_excluding(self.width, self.rhs))
            .collect();
        let hitting_sets = minimal_hitting_sets(self.width, &gaps);
        Ok(hitting_sets.into_iter().map(|h| l.union(&h)).collect())
    }

    fn collect_results(&self) -> Vec<FunctionalDependency> {
        self.min_valid
            .iter()
            .map(|x| {
                let error = self.node_map.get(x).map(|n| n.error());
                FunctionalDependency::new(x.clone(), self.rhs, error)
            })
            .collect()
    }
}

/// Incremental minimal-hitting-set enumeration over `gaps`: each accepted
/// hitter is extended through every column of a gap it doesn't already
/// intersect, then the family is pruned to inclusion-minimal members.
fn minimal_hitting_sets(width: usize, gaps: &[ColumnSet]) -> Vec<ColumnSet> {
    let mut hitters: Vec<ColumnSet> = vec![ColumnSet::empty(width)];
    for gap in gaps {
        let mut next: Vec<ColumnSet> = Vec::new();
        for h in &hitters {
            if !h.intersection(gap).is_empty() {
                next.push(h.clone());
            } else {
                for c in gap.iter() {
                    next.push(h.with_bit(c));
                }
            }
        }
        hitters = minimal_only(next);
    }
    hitters
}

fn minimal_only(sets: Vec<ColumnSet>) -> Vec<ColumnSet> {
    let mut dedup: Vec<ColumnSet> = Vec::new();
    for s in sets {
        if !dedup.contains(&s) {
            dedup.push(s);
        }
    }
    dedup
        .iter()
        .filter(|s| !dedup.iter().any(|o| o != *s && o.is_subset_of(s)))
        .cloned()
        .collect()
}
