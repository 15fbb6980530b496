//! Planning operations over a Learning Object [`MetadataIndex`].
//!
//! Provides estimation (prerequisite-closure time totals), sequencing
//! (authored, module-grouped study order), dependency-safe prerequisite
//! ordering, prerequisite chains, course progress, and index validation.
//! Every operation is a pure function of the index and its arguments.
//!
//! [`MetadataIndex`]: lo_core::index::MetadataIndex

pub mod chains;
pub mod estimate;
pub mod order;
pub mod progress;
pub mod sequence;
pub mod validate;

pub use chains::{Chain, prerequisite_chains};
pub use estimate::{Estimate, estimate, estimate_remaining, estimate_total};
pub use order::prerequisite_order;
pub use progress::{CourseProgress, PathEntry, advance};
pub use sequence::{Sequencer, sequence};
pub use validate::{DanglingPrerequisite, ValidationReport, validate};
