//! Metadata index: the authored curriculum, keyed by LO id.

use crate::id::module_prefix_with;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Authoring metadata for a single Learning Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoMetadata {
    /// Cost to complete this LO alone, in minutes. Never negative.
    pub estimated_time: f64,
    /// LOs that must be counted whenever this LO is selected.
    /// May name ids that are not in the index.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl LoMetadata {
    pub fn new(estimated_time: f64) -> Self {
        Self {
            estimated_time: sanitize_time(estimated_time),
            prerequisites: Vec::new(),
            title: None,
        }
    }

    #[must_use]
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Clamp a raw time to a usable cost: negative, NaN and infinite values become 0.
pub fn sanitize_time(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

/// Immutable mapping from LO id to [`LoMetadata`].
///
/// Insertion order is the authored curriculum order: iterating ids reproduces
/// the sequence the metadata endpoint delivered. Build one with
/// [`FromIterator`] or [`crate::schema::from_json`]; when an id is inserted
/// twice the later metadata wins and the first position is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataIndex {
    entries: IndexMap<String, LoMetadata>,
}

/// Aggregate statistics for an index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub total_los: usize,
    pub total_modules: usize,
    pub total_time: f64,
    pub prerequisite_edges: usize,
    /// Prerequisite references to ids absent from the index.
    pub dangling_prerequisites: usize,
}

impl MetadataIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LoMetadata> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Authored position of `id`, if indexed.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.get_index_of(id)
    }

    /// Ids in authored order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in authored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LoMetadata)> {
        self.entries.iter().map(|(id, meta)| (id.as_str(), meta))
    }

    /// Estimated time of `id`; unknown ids cost nothing.
    pub fn estimated_time(&self, id: &str) -> f64 {
        self.entries.get(id).map_or(0.0, |m| m.estimated_time)
    }

    /// Prerequisites of `id`; unknown ids have none.
    pub fn prerequisites(&self, id: &str) -> &[String] {
        self.entries
            .get(id)
            .map_or(&[][..], |m| m.prerequisites.as_slice())
    }

    /// Position of each module's first authored member.
    pub fn module_first_positions(&self, delimiter: char) -> HashMap<&str, usize> {
        let mut first = HashMap::new();
        for (pos, id) in self.entries.keys().enumerate() {
            first
                .entry(module_prefix_with(id, delimiter))
                .or_insert(pos);
        }
        first
    }

    /// Position of each module's last authored member.
    pub fn module_last_positions(&self, delimiter: char) -> HashMap<&str, usize> {
        let mut last = HashMap::new();
        for (pos, id) in self.entries.keys().enumerate() {
            last.insert(module_prefix_with(id, delimiter), pos);
        }
        last
    }

    /// Distinct module prefixes in order of first appearance.
    pub fn modules(&self, delimiter: char) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut modules = Vec::new();
        for id in self.entries.keys() {
            let prefix = module_prefix_with(id, delimiter);
            if seen.insert(prefix) {
                modules.push(prefix);
            }
        }
        modules
    }

    pub fn stats(&self, delimiter: char) -> IndexStats {
        let prerequisite_edges = self
            .entries
            .values()
            .map(|m| m.prerequisites.len())
            .sum();
        let dangling_prerequisites = self
            .entries
            .values()
            .flat_map(|m| m.prerequisites.iter())
            .filter(|p| !self.entries.contains_key(p.as_str()))
            .count();
        IndexStats {
            total_los: self.entries.len(),
            total_modules: self.modules(delimiter).len(),
            total_time: self.entries.values().map(|m| m.estimated_time).sum(),
            prerequisite_edges,
            dangling_prerequisites,
        }
    }
}

impl FromIterator<(String, LoMetadata)> for MetadataIndex {
    fn from_iter<T: IntoIterator<Item = (String, LoMetadata)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MetadataIndex {
    type Item = (&'a String, &'a LoMetadata);
    type IntoIter = indexmap::map::Iter<'a, String, LoMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
