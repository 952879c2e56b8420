//! Change detection against seen sets
//!
//! The diff engine compares one fetch cycle's snapshot with the durable seen
//! set for a feature and produces the keys to announce plus the seen set the
//! cycle should commit. Announcement order is sorted ascending by key so
//! cycles are deterministic and reproducible.

use std::collections::HashSet;

use crate::models::Item;

/// Result of diffing a snapshot against a seen set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    /// Keys present in the snapshot but not yet seen, sorted ascending
    pub to_announce: Vec<String>,
    /// The seen set including this cycle's announcements
    pub updated_seen: HashSet<String>,
}

impl DiffOutcome {
    /// Whether this diff found anything to announce
    pub fn is_empty(&self) -> bool {
        self.to_announce.is_empty()
    }
}

/// Compute the not-yet-seen subset of a snapshot.
///
/// An empty snapshot announces nothing and returns the seen set unchanged,
/// so no spurious state writes happen on empty cycles.
pub fn diff(snapshot: &[Item], seen: &HashSet<String>) -> DiffOutcome {
    let current: HashSet<&str> = snapshot.iter().map(|i| i.key.as_str()).collect();

    let mut to_announce: Vec<String> = current
        .iter()
        .filter(|k| !seen.contains(**k))
        .map(|k| k.to_string())
        .collect();
    to_announce.sort();

    let mut updated_seen = seen.clone();
    updated_seen.extend(to_announce.iter().cloned());

    DiffOutcome {
        to_announce,
        updated_seen,
    }
}

/// Remove another feature's announcements from this diff's rendering list.
///
/// Used for the dual NEW/UPDATED pipeline: a key announced as NEW this cycle
/// must not also be announced as UPDATED. Applied after both diffs are
/// computed, so each feature's `updated_seen` commit stays independent and
/// correct.
pub fn suppress(outcome: &DiffOutcome, announced_elsewhere: &[String]) -> Vec<String> {
    let suppressed: HashSet<&str> = announced_elsewhere.iter().map(String::as_str).collect();
    outcome
        .to_announce
        .iter()
        .filter(|k| !suppressed.contains(k.as_str()))
        .cloned()
        .collect()
}
