// The two pruning structures a SearchSpace owns alongside its node map.
//
// Both are keyed on the column set's sorted ascending bit list — the
// canonical identity `ColumnSet` already gives us — and both are
// maintained as anti-chains: inserting a dominated member is a no-op, and
// inserting a dominating member evicts whatever it now dominates. A flat
// `Vec<ColumnSet>` is enough here; column counts in practice never get
// large enough that a literal prefix trie over the bit list would pay for
// its own complexity (see DESIGN.md).

use crate::column_set::ColumnSet;

/// The currently known minimal valid LHSs for one RHS.
#[derive(Debug, Default)]
pub struct MinValidFds {
    members: Vec<ColumnSet>,
}

impl MinValidFds {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff some stored minimal LHS is a subset of `y` — i.e. `y` is
    /// known to be non-minimal (or itself already covered).
    pub fn contains_subset_of(&self, y: &ColumnSet) -> bool {
        self.members.iter().any(|x| x.is_subset_of(y))
    }

    /// Inserts `x` if it is not already dominated by a stored member,
    /// removing any stored member `x` now makes non-minimal.
    pub fn insert(&mut self, x: ColumnSet) {
        if self.members.iter().any(|m| m.is_subset_of(&x)) {
            return;
        }
        self.members.retain(|m| !x.is_subset_of(m) || *m == x);
        if !self.members.contains(&x) {
            self.members.push(x);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSet> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Anti-chain check used by tests: no stored member is a proper subset
    /// of another.
    pub fn is_antichain(&self) -> bool {
        self.members.iter().enumerate().all(|(i, a)| {
            self.members
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !(a.is_subset_of(b) && a != b))
        })
    }
}

/// The currently known maximal invalid LHSs for one RHS.
#[derive(Debug, Default)]
pub struct MaxNonFds {
    members: Vec<ColumnSet>,
}

impl MaxNonFds {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff some stored maximal non-FD is a superset of `y` — i.e. `y`
    /// is known to be invalid too.
    pub fn contains_superset_of(&self, y: &ColumnSet) -> bool {
        self.members.iter().any(|x| x.is_superset_of(y))
    }

    pub fn insert(&mut self, x: ColumnSet) {
        if self.members.iter().any(|m| m.is_superset_of(&x)) {
            return;
        }
        self.members.retain(|m| !m.is_subset_of(&x) || *m == x);
        if !self.members.contains(&x) {
            self.members.push(x);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSet> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_antichain(&self) -> bool {
        self.members.iter().enumerate().all(|(i, a)| {
            self.members
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !(b.is_subset_of(a) && a != b))
        })
    }
}
