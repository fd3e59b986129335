// End-to-end coverage of `discover` against the scenario family this crate
// was designed around: constant columns, exact duplicate-row FDs,
// approximate thresholds, minimality, and multi-peak escape.

use rusty_fd::measure::{ErrorMeasure, G3Measure};
use rusty_fd::pli::cache::PliCache;
use rusty_fd::{discover, ColumnSet, DiscoveryConfig, InMemoryDataset};

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn dataset(rows: &[&[&str]]) -> InMemoryDataset {
    init_tracing();
    let width = rows[0].len();
    let data = rows
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect();
    InMemoryDataset::with_generated_names(data, width).unwrap()
}

#[test]
fn constant_column_is_determined_by_the_empty_lhs() {
    let ds = dataset(&[
        &["const", "a", "1"],
        &["const", "b", "2"],
        &["const", "c", "3"],
    ]);
    let config = DiscoveryConfig::builder(0.0).unwrap().build();
    let fds = discover(&ds, &config).unwrap();
    assert!(fds
        .iter()
        .any(|fd| fd.rhs() == 0 && fd.lhs().is_empty()));
}

#[test]
fn exact_duplicate_rows_yield_exact_fd_both_ways() {
    let ds = dataset(&[
        &["x", "1"],
        &["x", "1"],
        &["y", "2"],
        &["y", "2"],
    ]);
    let config = DiscoveryConfig::builder(0.0).unwrap().build();
    let fds = discover(&ds, &config).unwrap();
    assert!(fds.iter().any(|fd| fd.rhs() == 1 && fd.lhs().sorted_bits() == vec![0]));
    assert!(fds.iter().any(|fd| fd.rhs() == 0 && fd.lhs().sorted_bits() == vec![1]));
}

#[test]
fn approximate_threshold_admits_a_near_fd_rejected_at_zero_error() {
    let ds = dataset(&[
        &["a", "1"],
        &["a", "1"],
        &["a", "2"],
        &["b", "3"],
    ]);

    let exact = DiscoveryConfig::builder(0.0).unwrap().build();
    let exact_fds = discover(&ds, &exact).unwrap();
    assert!(!exact_fds
        .iter()
        .any(|fd| fd.rhs() == 1 && fd.lhs().sorted_bits() == vec![0]));

    let approx = DiscoveryConfig::builder(0.3).unwrap().build();
    let approx_fds = discover(&ds, &approx).unwrap();
    assert!(approx_fds
        .iter()
        .any(|fd| fd.rhs() == 1 && fd.lhs().sorted_bits() == vec![0]));
}

#[test]
fn only_minimal_determinants_are_reported() {
    let ds = dataset(&[
        &["A", "x", "p", "1"],
        &["A", "y", "q", "1"],
        &["B", "x", "p", "2"],
        &["B", "y", "q", "2"],
    ]);
    let config = DiscoveryConfig::builder(0.0).unwrap().build();
    let fds = discover(&ds, &config).unwrap();

    assert!(fds.iter().any(|fd| fd.rhs() == 3 && fd.lhs().sorted_bits() == vec![0]));
    assert!(!fds.iter().any(|fd| fd.rhs() == 3 && fd.lhs().sorted_bits() == vec![0, 1]));
    assert!(!fds.iter().any(|fd| fd.rhs() == 3 && fd.lhs().sorted_bits() == vec![0, 2]));
}

#[test]
fn disjoint_minimal_determinants_are_both_found() {
    let rows: Vec<Vec<&str>> = vec![
        vec!["a", "a", "x", "x", "1"],
        vec!["a", "b", "x", "y", "2"],
        vec!["b", "a", "y", "x", "3"],
        vec!["b", "b", "y", "y", "4"],
    ];
    let data: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| r.into_iter().map(|s| s.to_string()).collect())
        .collect();
    let ds = InMemoryDataset::with_generated_names(data, 5).unwrap();

    let config = DiscoveryConfig::builder(0.0).unwrap().build();
    let fds = discover(&ds, &config).unwrap();

    assert!(fds.iter().any(|fd| fd.rhs() == 4 && fd.lhs().sorted_bits() == vec![0, 1]));
    assert!(fds.iter().any(|fd| fd.rhs() == 4 && fd.lhs().sorted_bits() == vec![2, 3]));
}

#[test]
fn results_contain_no_rhs_in_its_own_lhs() {
    let ds = dataset(&[
        &["a", "1", "x"],
        &["a", "2", "y"],
        &["b", "1", "x"],
        &["b", "2", "y"],
    ]);
    let config = DiscoveryConfig::builder(0.0).unwrap().build();
    let fds = discover(&ds, &config).unwrap();
    for fd in &fds {
        assert!(!fd.lhs().test(fd.rhs()));
    }
}

/// Brute-force every non-empty LHS for one RHS by exhaustively walking the
/// powerset, then reduce to the subsets with no valid proper subset of their
/// own. Small enough widths that this is a trustworthy oracle to check
/// `discover`'s output against (§8 property 3: completeness of the cover).
fn brute_force_minimal_lhs(
    ds: &InMemoryDataset,
    rhs: usize,
    max_error: f64,
) -> Vec<Vec<usize>> {
    let width = ds.column_count();
    let cache = PliCache::new(ds, None).unwrap();
    let measure = G3Measure;
    let others: Vec<usize> = (0..width).filter(|&c| c != rhs).collect();

    let mut valid: Vec<Vec<usize>> = Vec::new();
    for mask in 0u32..(1u32 << others.len()) {
        let bits: Vec<usize> = others
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &c)| c)
            .collect();
        let lhs = ColumnSet::from_iter(width, bits.iter().copied());
        let g3 = measure.calculate_error(&lhs, rhs, ds, &cache).unwrap();
        if g3 <= max_error {
            valid.push(bits);
        }
    }

    valid
        .iter()
        .filter(|x| {
            !valid
                .iter()
                .any(|y| y != *x && y.iter().all(|c| x.contains(c)))
        })
        .cloned()
        .collect()
}

#[test]
fn discover_matches_brute_force_minimal_cover() {
    let ds = dataset(&[
        &["A", "x", "p", "1"],
        &["A", "y", "q", "1"],
        &["B", "x", "p", "2"],
        &["B", "y", "r", "2"],
        &["C", "z", "q", "3"],
    ]);
    let max_error = 0.1;
    let config = DiscoveryConfig::builder(max_error).unwrap().build();
    let fds = discover(&ds, &config).unwrap();

    for rhs in 0..ds.column_count() {
        let mut expected = brute_force_minimal_lhs(&ds, rhs, max_error);
        expected.sort();
        let mut found: Vec<Vec<usize>> = fds
            .iter()
            .filter(|fd| fd.rhs() == rhs)
            .map(|fd| fd.lhs().sorted_bits())
            .collect();
        found.sort();
        assert_eq!(found, expected, "mismatch for rhs {rhs}");
    }
}
