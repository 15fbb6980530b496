//! Estimated study time over the prerequisite closure of a selection.
//!
//! A selection (the frontier) is expanded through `prerequisites` until
//! nothing new is reachable. Every distinct LO in that closure contributes its
//! estimated time exactly once, no matter how many selected LOs depend on it
//! or how often it was selected. Ids missing from the index are forward
//! references: they cost nothing and have no prerequisites.

use lo_core::index::{LoMetadata, MetadataIndex};
use serde::Serialize;
use std::collections::HashSet;

/// Result of an estimation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Estimate {
    /// Summed estimated time of every LO in `included`.
    pub total: f64,
    /// Every distinct LO counted, in visit order.
    pub included: Vec<String>,
    /// Members of `included` that are absent from the index.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<String>,
}

impl Estimate {
    pub fn len(&self) -> usize {
        self.included.len()
    }

    pub fn is_empty(&self) -> bool {
        self.included.is_empty()
    }
}

/// Total estimated time to complete `targets` and all their prerequisites.
pub fn estimate_total<S: AsRef<str>>(index: &MetadataIndex, targets: &[S]) -> f64 {
    estimate_excluding(index, targets, &HashSet::new()).total
}

/// Like [`estimate_total`], also reporting which LOs were counted.
pub fn estimate<S: AsRef<str>>(index: &MetadataIndex, targets: &[S]) -> Estimate {
    estimate_excluding(index, targets, &HashSet::new())
}

/// Time still needed for `targets` when the LOs in `completed` are mastered.
///
/// Completed LOs cost nothing and are not expanded: their prerequisites are
/// only counted when some uncompleted LO in the closure also needs them.
pub fn estimate_remaining<S, C>(index: &MetadataIndex, targets: &[S], completed: &[C]) -> Estimate
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    let completed: HashSet<&str> = completed.iter().map(AsRef::as_ref).collect();
    estimate_excluding(index, targets, &completed)
}

fn estimate_excluding<S: AsRef<str>>(
    index: &MetadataIndex,
    targets: &[S],
    excluded: &HashSet<&str>,
) -> Estimate {
    let mut result = Estimate::default();
    let mut counted: Vec<(usize, f64)> = Vec::new();
    walk_closure(index, targets, excluded, |id, meta| {
        match (index.position(id), meta) {
            (Some(pos), Some(meta)) => counted.push((pos, meta.estimated_time)),
            _ => result.unknown.push(id.to_string()),
        }
        result.included.push(id.to_string());
    });
    result.total = sum_in_authored_order(counted);

    tracing::debug!(
        "estimated {} LOs from {} targets: {} ({} unknown)",
        result.included.len(),
        targets.len(),
        result.total,
        result.unknown.len()
    );
    result
}

/// Float addition is not associative, so times are added in authored order
/// rather than visit order. The same closure always yields the same total.
fn sum_in_authored_order(mut counted: Vec<(usize, f64)>) -> f64 {
    counted.sort_unstable_by_key(|&(pos, _)| pos);
    counted.into_iter().map(|(_, time)| time).sum()
}

/// Visit every distinct LO reachable from `targets`, skipping `excluded` ids.
///
/// An id is marked seen before its prerequisites are pushed, and a popped id
/// that was already seen is dropped without expansion. This is what makes
/// cyclic prerequisite graphs terminate.
fn walk_closure<'a, S: AsRef<str>>(
    index: &'a MetadataIndex,
    targets: &'a [S],
    excluded: &HashSet<&str>,
    mut visit: impl FnMut(&'a str, Option<&'a LoMetadata>),
) {
    let mut seen: HashSet<&'a str> = HashSet::with_capacity(targets.len());
    let mut work: Vec<&'a str> = targets.iter().map(AsRef::as_ref).collect();

    while let Some(id) = work.pop() {
        if !seen.insert(id) || excluded.contains(id) {
            continue;
        }
        let meta = index.get(id);
        visit(id, meta);
        if let Some(meta) = meta {
            work.extend(
                meta.prerequisites
                    .iter()
                    .map(String::as_str)
                    .filter(|p| !seen.contains(p)),
            );
        }
    }
}
