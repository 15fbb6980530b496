//! Study sequencing: impose the authored curriculum order on a selection.
//!
//! The selection usually comes back from the optimizer unordered and may
//! contain LOs the index has never seen (newly authored or externally
//! recommended content). Known LOs keep their authored order; unknown LOs are
//! kept next to the rest of their module so the resulting learning path stays
//! locally coherent.

use lo_core::config::{SequenceStrategy, SequencingConfig};
use lo_core::id::module_prefix_with;
use lo_core::index::MetadataIndex;
use std::collections::HashMap;

/// Orders selections according to a [`SequencingConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequencer {
    config: SequencingConfig,
}

/// Selected LOs that share a module prefix.
struct ModulePartition<'a> {
    /// Authored position of the module's first member, if the module is indexed.
    rank: Option<usize>,
    known: Vec<(usize, &'a str)>,
    unknown: Vec<&'a str>,
}

impl Sequencer {
    pub fn new(config: SequencingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SequencingConfig {
        &self.config
    }

    /// Order `selected` into a study sequence.
    ///
    /// The output always holds exactly the input ids; duplicates are kept and
    /// end up adjacent to each other. Indexed LOs of the same module keep
    /// their authored order. When modules interleave in the index, module
    /// grouping takes precedence: with `[M1-a, M2-a, M1-b]` authored, `M1-b`
    /// still comes before `M2-a`.
    pub fn sequence<S: AsRef<str>>(&self, index: &MetadataIndex, selected: &[S]) -> Vec<String> {
        let ordered = match self.config.strategy {
            SequenceStrategy::Grouped => {
                sequence_grouped(index, selected, self.config.module_delimiter)
            }
            SequenceStrategy::Global => {
                sequence_global(index, selected, self.config.module_delimiter)
            }
        };
        tracing::debug!(
            "sequenced {} LOs with {:?} strategy",
            ordered.len(),
            self.config.strategy
        );
        ordered
    }
}

/// Order `selected` with the default module-grouped strategy.
///
/// See [`Sequencer::sequence`]; authored order is only guaranteed within a
/// module.
pub fn sequence<S: AsRef<str>>(index: &MetadataIndex, selected: &[S]) -> Vec<String> {
    Sequencer::default().sequence(index, selected)
}

fn sequence_grouped<S: AsRef<str>>(
    index: &MetadataIndex,
    selected: &[S],
    delimiter: char,
) -> Vec<String> {
    let module_rank = index.module_first_positions(delimiter);

    // Partitions are created in order of first appearance in `selected`,
    // which is the tie-break among modules the index does not know.
    let mut partitions: Vec<ModulePartition<'_>> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for id in selected.iter().map(AsRef::as_ref) {
        let module = module_prefix_with(id, delimiter);
        let slot = *slots.entry(module).or_insert_with(|| {
            partitions.push(ModulePartition {
                rank: module_rank.get(module).copied(),
                known: Vec::new(),
                unknown: Vec::new(),
            });
            partitions.len() - 1
        });
        let partition = &mut partitions[slot];
        match index.position(id) {
            Some(pos) => partition.known.push((pos, id)),
            None => partition.unknown.push(id),
        }
    }

    partitions.sort_by_key(|p| (p.rank.is_none(), p.rank));

    let mut ordered = Vec::with_capacity(selected.len());
    for mut partition in partitions {
        partition.known.sort_by_key(|&(pos, _)| pos);
        ordered.extend(partition.known.iter().map(|&(_, id)| id.to_string()));
        ordered.extend(partition.unknown.iter().map(|id| (*id).to_string()));
    }
    ordered
}

/// Two-pass ordering: every known LO by authored position, then every unknown
/// LO by the last authored position of its module (unindexed modules last).
fn sequence_global<S: AsRef<str>>(
    index: &MetadataIndex,
    selected: &[S],
    delimiter: char,
) -> Vec<String> {
    let module_last = index.module_last_positions(delimiter);

    let mut known: Vec<(usize, &str)> = Vec::new();
    let mut unknown: Vec<(Option<usize>, &str)> = Vec::new();
    for id in selected.iter().map(AsRef::as_ref) {
        match index.position(id) {
            Some(pos) => known.push((pos, id)),
            None => {
                let last = module_last.get(module_prefix_with(id, delimiter)).copied();
                unknown.push((last, id));
            }
        }
    }

    known.sort_by_key(|&(pos, _)| pos);
    unknown.sort_by_key(|&(last, _)| (last.is_none(), last));

    known
        .into_iter()
        .map(|(_, id)| id)
        .chain(unknown.into_iter().map(|(_, id)| id))
        .map(str::to_string)
        .collect()
}
