//! Wire format of the metadata endpoint and lenient conversion to [`MetadataIndex`].
//!
//! The endpoint returns a JSON object keyed by LO id:
//!
//! ```json
//! { "U1-2": { "cell_estimated_time": "20", "cell_prereqs": ["U1-1"] } }
//! ```
//!
//! Key order in the document is the authored curriculum order. Individual
//! entries are never rejected: bad times become 0, bad prerequisite lists are
//! filtered, and non-object entries become zero-cost leaves.

use crate::index::{LoMetadata, MetadataIndex, sanitize_time};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

const TIME_KEYS: &[&str] = &["cell_estimated_time", "estimatedTime", "estimated_time"];
const PREREQ_KEYS: &[&str] = &["cell_prereqs", "prerequisites"];
const TITLE_KEYS: &[&str] = &["cell_title", "title"];

/// Document-level schema violations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("metadata document must be a JSON object keyed by LO id, found {0}")]
    NotAnObject(&'static str),
}

#[derive(Serialize)]
struct WireEntry<'a> {
    cell_estimated_time: String,
    cell_prereqs: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    cell_title: Option<&'a str>,
}

/// Parse a metadata document into an index.
pub fn from_json(json: &str) -> Result<MetadataIndex> {
    let document: Value =
        serde_json::from_str(json).context("failed to deserialize LO metadata from JSON")?;
    from_value(document)
}

/// Convert an already-parsed metadata document into an index.
pub fn from_value(document: Value) -> Result<MetadataIndex> {
    let entries = match document {
        Value::Object(entries) => entries,
        other => return Err(SchemaError::NotAnObject(json_kind(&other)).into()),
    };

    let mut malformed = 0usize;
    let index: MetadataIndex = entries
        .into_iter()
        .map(|(id, raw)| {
            let meta = match raw {
                Value::Object(fields) => parse_entry(&id, &fields, &mut malformed),
                other => {
                    tracing::warn!(
                        "LO {} metadata is {}, not an object; treating as zero-cost",
                        id,
                        json_kind(&other)
                    );
                    malformed += 1;
                    LoMetadata::default()
                }
            };
            (id, meta)
        })
        .collect();

    tracing::info!(
        "loaded metadata for {} LOs ({} malformed entries normalized)",
        index.len(),
        malformed
    );
    Ok(index)
}

/// Serialize an index to the canonical wire form, preserving authored order.
pub fn to_json(index: &MetadataIndex) -> Result<String> {
    let wire: IndexMap<&str, WireEntry<'_>> = index
        .iter()
        .map(|(id, meta)| {
            (
                id,
                WireEntry {
                    cell_estimated_time: meta.estimated_time.to_string(),
                    cell_prereqs: &meta.prerequisites,
                    cell_title: meta.title.as_deref(),
                },
            )
        })
        .collect();
    serde_json::to_string_pretty(&wire).context("failed to serialize LO metadata to JSON")
}

fn parse_entry(id: &str, fields: &Map<String, Value>, malformed: &mut usize) -> LoMetadata {
    let estimated_time = match first_field(fields, TIME_KEYS) {
        None | Some(Value::Null) => 0.0,
        Some(raw) => parse_time(raw).unwrap_or_else(|| {
            tracing::warn!("LO {} has unparseable estimated time {}; using 0", id, raw);
            *malformed += 1;
            0.0
        }),
    };

    let prerequisites = match first_field(fields, PREREQ_KEYS) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            tracing::warn!(
                "LO {} prerequisites are {}, not a list; ignoring",
                id,
                json_kind(other)
            );
            *malformed += 1;
            Vec::new()
        }
    };

    let title = first_field(fields, TITLE_KEYS)
        .and_then(Value::as_str)
        .map(str::to_string);

    LoMetadata {
        estimated_time,
        prerequisites,
        title,
    }
}

fn first_field<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| fields.get(*k))
}

/// Times arrive stringified (`"20"`) or as plain numbers.
fn parse_time(raw: &Value) -> Option<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(sanitize_time(parsed))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
