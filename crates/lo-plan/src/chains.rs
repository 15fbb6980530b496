//! Prerequisite chains: root-to-leaf paths from a selected LO down to
//! foundational LOs that need nothing else.

use lo_core::index::MetadataIndex;
use serde::Serialize;
use std::collections::HashSet;

/// One path from a target to a leaf prerequisite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chain {
    /// LO ids from the target down to the leaf.
    pub ids: Vec<String>,
    /// Summed estimated time of the chain's members.
    pub time: f64,
}

impl Chain {
    pub fn target(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }

    pub fn leaf(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// DFS state for a single target.
struct ChainWalk<'a> {
    index: &'a MetadataIndex,
    visited: HashSet<&'a str>,
    path: Vec<&'a str>,
    chains: Vec<Chain>,
}

/// Every prerequisite chain reachable from `targets`, grouped by target in
/// input order.
///
/// Each target gets a fresh visited set. Within one target an LO is entered at
/// most once, so a prerequisite shared by two branches ends only the first
/// branch that reaches it, and cycles terminate.
pub fn prerequisite_chains<S: AsRef<str>>(index: &MetadataIndex, targets: &[S]) -> Vec<Chain> {
    let mut chains = Vec::new();
    for target in targets.iter().map(AsRef::as_ref) {
        let mut walk = ChainWalk {
            index,
            visited: HashSet::new(),
            path: Vec::new(),
            chains: Vec::new(),
        };
        walk.descend(target);
        chains.append(&mut walk.chains);
    }
    tracing::debug!(
        "found {} prerequisite chains from {} targets",
        chains.len(),
        targets.len()
    );
    chains
}

impl<'a> ChainWalk<'a> {
    /// Depth-first from `target`. Frames hold a node's prerequisites and the
    /// next one to visit, so depth is bounded by the heap, not the call stack.
    fn descend(&mut self, target: &'a str) {
        let index = self.index;
        if !self.enter(target) {
            return;
        }
        let mut frames: Vec<(&'a [String], usize)> = vec![(index.prerequisites(target), 0)];
        while let Some(frame) = frames.last_mut() {
            let (prerequisites, next) = *frame;
            if let Some(prerequisite) = prerequisites.get(next) {
                frame.1 += 1;
                if self.enter(prerequisite) {
                    frames.push((index.prerequisites(prerequisite), 0));
                }
            } else {
                frames.pop();
                self.path.pop();
            }
        }
    }

    /// Put `id` on the path unless already visited; leaves are recorded on entry.
    fn enter(&mut self, id: &'a str) -> bool {
        if !self.visited.insert(id) {
            return false;
        }
        self.path.push(id);
        if self.index.prerequisites(id).is_empty() {
            self.record();
        }
        true
    }

    fn record(&mut self) {
        let time: f64 = self
            .path
            .iter()
            .map(|id| self.index.estimated_time(id))
            .sum();
        self.chains.push(Chain {
            ids: self.path.iter().map(|id| (*id).to_string()).collect(),
            time,
        });
    }
}
