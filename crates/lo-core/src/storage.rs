//! Read/write session metadata files from disk.

use crate::index::MetadataIndex;
use crate::schema;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const LO_DIR: &str = ".lo";
const METADATA_FILE: &str = "metadata.json";

/// Get the path to the session directory for a given project root.
pub fn lo_dir(project_root: &Path) -> PathBuf {
    project_root.join(LO_DIR)
}

/// Get the path to the cached metadata file for a given project root.
pub fn metadata_file(project_root: &Path) -> PathBuf {
    lo_dir(project_root).join(METADATA_FILE)
}

/// Check if a metadata snapshot exists for the given project root.
pub fn index_exists(project_root: &Path) -> bool {
    metadata_file(project_root).exists()
}

/// Load the metadata index saved under a project root.
pub fn load(project_root: &Path) -> Result<MetadataIndex> {
    load_file(&metadata_file(project_root))
}

/// Load a metadata index from an arbitrary JSON file.
pub fn load_file(path: &Path) -> Result<MetadataIndex> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read LO metadata from {}", path.display()))?;
    schema::from_json(&json).with_context(|| format!("invalid LO metadata in {}", path.display()))
}

/// Save a metadata index, creating the .lo directory if needed.
pub fn save(project_root: &Path, index: &MetadataIndex) -> Result<()> {
    let dir = lo_dir(project_root);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create session directory {}", dir.display()))?;

    let path = metadata_file(project_root);
    let json = schema::to_json(index)?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write LO metadata to {}", path.display()))?;

    Ok(())
}
