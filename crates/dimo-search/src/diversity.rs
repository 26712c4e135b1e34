//! Brand-diversity ordering.
//!
//! Candidates are first sorted by `(rank, distance)`, unranked last. The
//! sorted list is then split into passes: each pass takes the first store
//! of up to [`DIVERSITY_WIDTH`] distinct brands, in sorted order, and
//! leaves the rest for the next pass. Concatenating the passes gives a
//! result whose head covers as many brands as possible while each pass
//! stays in rank/distance order.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::types::ScoredCandidate;

/// Maximum number of distinct brands taken in a single pass.
pub const DIVERSITY_WIDTH: usize = 10;

/// Reorder `candidates` for display. Output is a permutation of the input.
#[must_use]
pub fn diversify(mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    candidates.sort_by(compare_rank_then_distance);

    let mut ordered = Vec::with_capacity(candidates.len());
    let mut remaining = candidates;

    // Every pass moves at least the first remaining store, so this ends
    // after at most `len` passes.
    while remaining.len() > 1 {
        let (head, tail) = split_pass(remaining);
        ordered.extend(head);
        remaining = tail;
    }
    ordered.extend(remaining);
    ordered
}

/// One pass: first store of each new brand (up to the width) goes to the
/// head, everything else to the tail. Both keep their relative order.
fn split_pass(pass: Vec<ScoredCandidate>) -> (Vec<ScoredCandidate>, Vec<ScoredCandidate>) {
    let mut seen: HashSet<String> = HashSet::with_capacity(DIVERSITY_WIDTH);
    let mut head = Vec::with_capacity(DIVERSITY_WIDTH.min(pass.len()));
    let mut tail = Vec::with_capacity(pass.len());

    for candidate in pass {
        if seen.len() < DIVERSITY_WIDTH && !seen.contains(&candidate.brand_name) {
            seen.insert(candidate.brand_name.clone());
            head.push(candidate);
        } else {
            tail.push(candidate);
        }
    }

    (head, tail)
}

fn compare_rank_then_distance(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    a.ordering_rank()
        .cmp(&b.ordering_rank())
        .then_with(|| a.distance_km.total_cmp(&b.distance_km))
}
