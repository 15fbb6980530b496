//! Core types and storage for Learning Object planning.
//!
//! Provides the authored-order metadata model ([`index::MetadataIndex`]), LO id
//! helpers, lenient JSON parsing of the metadata endpoint's payload, session
//! storage under `.lo/`, and planner configuration.

pub mod config;
pub mod id;
pub mod index;
pub mod schema;
pub mod storage;
