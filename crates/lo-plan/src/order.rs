//! Dependency-safe study order over the prerequisite closure of a selection.
//!
//! Prerequisite edges point from a dependent LO to the LO it needs, so the
//! schedule walks them inverted: an LO is released once every prerequisite in
//! the closure has been scheduled.

use lo_core::index::MetadataIndex;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Tie-break key: indexed LOs by authored position, then unknown LOs by the
/// order in which the closure walk discovered them.
type Rank = (bool, usize);

/// Order `targets` and all their prerequisites so that every prerequisite
/// precedes the LOs that need it.
///
/// When several LOs are ready at once the one authored earliest goes first.
/// LOs caught on a prerequisite cycle can never become ready; they are
/// appended at the end in the same tie-break order.
pub fn prerequisite_order<S: AsRef<str>>(index: &MetadataIndex, targets: &[S]) -> Vec<String> {
    let nodes = discover(index, targets);
    if nodes.is_empty() {
        return Vec::new();
    }

    let slot: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let mut unknown_seen = 0usize;
    let ranks: Vec<Rank> = nodes
        .iter()
        .map(|id| match index.position(id) {
            Some(pos) => (false, pos),
            None => {
                unknown_seen += 1;
                (true, unknown_seen - 1)
            }
        })
        .collect();

    let mut indegree = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut seen_edges: HashSet<(usize, usize)> = HashSet::new();

    for (dependent, id) in nodes.iter().enumerate() {
        for prerequisite in index.prerequisites(id) {
            let Some(&prerequisite) = slot.get(prerequisite.as_str()) else {
                continue;
            };
            if prerequisite == dependent || !seen_edges.insert((prerequisite, dependent)) {
                continue;
            }
            indegree[dependent] += 1;
            dependents[prerequisite].push(dependent);
        }
    }

    let mut ready: BTreeSet<(Rank, usize)> = indegree
        .iter()
        .enumerate()
        .filter(|(_, deg)| **deg == 0)
        .map(|(i, _)| (ranks[i], i))
        .collect();
    let mut scheduled = vec![false; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());

    while let Some((_, node)) = ready.pop_first() {
        scheduled[node] = true;
        order.push(nodes[node].to_string());
        for &dependent in &dependents[node] {
            indegree[dependent] -= 1;
            if indegree[dependent] == 0 {
                ready.insert((ranks[dependent], dependent));
            }
        }
    }

    if order.len() < nodes.len() {
        let mut remaining: Vec<usize> = (0..nodes.len()).filter(|&i| !scheduled[i]).collect();
        remaining.sort_by_key(|&i| ranks[i]);
        tracing::warn!(
            "prerequisite cycle: {} LOs appended without a dependency-safe position",
            remaining.len()
        );
        order.extend(remaining.into_iter().map(|i| nodes[i].to_string()));
    }

    order
}

/// Breadth-first walk of the prerequisite closure, each id listed once.
fn discover<'a, S: AsRef<str>>(index: &'a MetadataIndex, targets: &'a [S]) -> Vec<&'a str> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut nodes = Vec::new();

    for target in targets.iter().map(AsRef::as_ref) {
        if seen.insert(target) {
            queue.push_back(target);
        }
    }

    while let Some(id) = queue.pop_front() {
        nodes.push(id);
        for prerequisite in index.prerequisites(id) {
            if seen.insert(prerequisite.as_str()) {
                queue.push_back(prerequisite);
            }
        }
    }

    nodes
}
