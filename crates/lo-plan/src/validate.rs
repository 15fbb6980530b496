//! Authoring checks over a metadata index.
//!
//! Planning never fails on these defects (dangling references cost nothing,
//! cycles are walked once), but they usually point at mistakes in the
//! curriculum metadata and are worth surfacing to authors.

use lo_core::index::MetadataIndex;
use serde::Serialize;

/// A prerequisite reference to an id the index does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingPrerequisite {
    pub lo: String,
    pub prerequisite: String,
}

/// Findings of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub dangling: Vec<DanglingPrerequisite>,
    /// LOs that list themselves as a prerequisite.
    pub self_prerequisites: Vec<String>,
    /// Groups of two or more LOs that (transitively) require each other,
    /// members in authored order.
    pub cycles: Vec<Vec<String>>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.self_prerequisites.is_empty() && self.cycles.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.dangling.len() + self.self_prerequisites.len() + self.cycles.len()
    }
}

/// Check every LO's prerequisites for dangling references, self-references
/// and cycles.
pub fn validate(index: &MetadataIndex) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); index.len()];

    for (pos, (id, meta)) in index.iter().enumerate() {
        let mut self_listed = false;
        for prerequisite in &meta.prerequisites {
            match index.position(prerequisite) {
                Some(target) if target == pos => self_listed = true,
                Some(target) => edges[pos].push(target),
                None => report.dangling.push(DanglingPrerequisite {
                    lo: id.to_string(),
                    prerequisite: prerequisite.clone(),
                }),
            }
        }
        if self_listed {
            report.self_prerequisites.push(id.to_string());
        }
    }

    let ids: Vec<&str> = index.ids().collect();
    let mut components = strongly_connected(&edges);
    components.retain(|c| c.len() > 1);
    for component in &mut components {
        component.sort_unstable();
    }
    components.sort_unstable_by_key(|c| c[0]);
    report.cycles = components
        .into_iter()
        .map(|c| c.into_iter().map(|i| ids[i].to_string()).collect())
        .collect();

    if !report.is_clean() {
        tracing::warn!(
            "metadata has {} dangling prerequisites, {} self-prerequisites, {} cycles",
            report.dangling.len(),
            report.self_prerequisites.len(),
            report.cycles.len()
        );
    }
    report
}

/// Tarjan state shared by the frames of one walk.
struct Tarjan<'a> {
    edges: &'a [Vec<usize>],
    next_index: usize,
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

fn strongly_connected(edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = edges.len();
    let mut tarjan = Tarjan {
        edges,
        next_index: 0,
        index: vec![None; n],
        lowlink: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        components: Vec::new(),
    };
    for node in 0..n {
        if tarjan.index[node].is_none() {
            tarjan.connect(node);
        }
    }
    tarjan.components
}

impl Tarjan<'_> {
    /// Tarjan's walk from `root`. Frames are (node, next edge) pairs on the
    /// heap, so long prerequisite chains cannot overflow the call stack.
    fn connect(&mut self, root: usize) {
        let edges = self.edges;
        self.open(root);
        let mut frames = vec![(root, 0)];
        while let Some(frame) = frames.last_mut() {
            let (node, next_edge) = *frame;
            if let Some(&next) = edges[node].get(next_edge) {
                frame.1 += 1;
                match self.index[next] {
                    None => {
                        self.open(next);
                        frames.push((next, 0));
                    }
                    Some(seen) if self.on_stack[next] => {
                        self.lowlink[node] = self.lowlink[node].min(seen);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if Some(self.lowlink[node]) == self.index[node] {
                self.close(node);
            }
            if let Some(&(parent, _)) = frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[node]);
            }
        }
    }

    fn open(&mut self, node: usize) {
        self.index[node] = Some(self.next_index);
        self.lowlink[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    /// Pop the component rooted at `node` off the stack.
    fn close(&mut self, node: usize) {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member] = false;
            component.push(member);
            if member == node {
                break;
            }
        }
        self.components.push(component);
    }
}
