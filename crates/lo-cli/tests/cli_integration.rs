//! Integration tests for lo-cli functionality.
//! Tests the underlying library functions that the CLI commands invoke.

use lo_core::config::{PlannerConfig, SequenceStrategy};
use lo_core::index::{LoMetadata, MetadataIndex};
use lo_plan::{CourseProgress, PathEntry, Sequencer};

fn make_index() -> MetadataIndex {
    [
        ("U1-1", LoMetadata::new(10.0).with_title("Variables")),
        ("U1-2", LoMetadata::new(20.0).with_prerequisites(["U1-1"])),
        ("U2-1", LoMetadata::new(5.0)),
    ]
    .into_iter()
    .map(|(id, meta)| (id.to_string(), meta))
    .collect()
}

#[test]
fn test_storage_load_nonexistent() {
    let tmpdir = tempfile::tempdir().unwrap();
    let result = lo_core::storage::load(tmpdir.path());
    assert!(result.is_err(), "loading from empty dir should fail");
}

#[test]
fn test_import_then_load() {
    let tmpdir = tempfile::tempdir().unwrap();
    let payload = tmpdir.path().join("payload.json");
    std::fs::write(
        &payload,
        r#"{"U1-1": {"cell_estimated_time": "10", "cell_prereqs": []},
            "U1-2": {"cell_estimated_time": 20, "cell_prereqs": ["U1-1"]}}"#,
    )
    .unwrap();

    let index = lo_core::storage::load_file(&payload).unwrap();
    lo_core::storage::save(tmpdir.path(), &index).unwrap();
    assert!(lo_core::storage::index_exists(tmpdir.path()));

    let loaded = lo_core::storage::load(tmpdir.path()).unwrap();
    assert_eq!(loaded, index);
    assert_eq!(lo_plan::estimate_total(&loaded, &["U1-2"]), 30.0);
}

#[test]
fn test_estimate_on_saved_session() {
    let tmpdir = tempfile::tempdir().unwrap();
    lo_core::storage::save(tmpdir.path(), &make_index()).unwrap();

    let loaded = lo_core::storage::load(tmpdir.path()).unwrap();
    let estimate = lo_plan::estimate_remaining(&loaded, &["U1-2", "U2-1"], &["U1-1"]);
    assert_eq!(estimate.total, 25.0);
    assert_eq!(loaded.get("U1-1").unwrap().title.as_deref(), Some("Variables"));
}

#[test]
fn test_sequence_uses_configured_strategy() {
    let tmpdir = tempfile::tempdir().unwrap();
    let lo_dir = lo_core::storage::lo_dir(tmpdir.path());
    std::fs::create_dir_all(&lo_dir).unwrap();
    std::fs::write(
        lo_dir.join("config.toml"),
        "[sequencing]\nstrategy = \"global\"\n",
    )
    .unwrap();

    let config = PlannerConfig::load(tmpdir.path()).unwrap();
    assert_eq!(config.sequencing.strategy, SequenceStrategy::Global);

    let ordered =
        Sequencer::new(config.sequencing).sequence(&make_index(), &["U1-new", "U2-1", "U1-1"]);
    assert_eq!(ordered, ["U1-1", "U2-1", "U1-new"]);
}

#[test]
fn test_progress_file_parses() {
    let json = r#"[
        {"id": "U1-1", "started_on": "2024-03-01T08:00:00Z", "completed_on": "2024-03-01T09:00:00Z"},
        {"id": "U1-2", "started_on": "2024-03-01T09:00:00Z", "completed_on": null},
        {"id": "U2-1"}
    ]"#;
    let path: Vec<PathEntry> = serde_json::from_str(json).unwrap();
    let progress = CourseProgress::from_path(&make_index(), &path);
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.remaining_time, 25.0);
    assert_eq!(progress.resume_at.as_deref(), Some("U1-2"));
}

#[test]
fn test_validate_and_info_on_clean_index() {
    let index = make_index();
    assert!(lo_plan::validate(&index).is_clean());

    let stats = index.stats('-');
    assert_eq!(stats.total_los, 3);
    assert_eq!(stats.total_modules, 2);
    assert_eq!(stats.total_time, 35.0);
}

#[test]
fn test_config_defaults_without_file() {
    let tmpdir = tempfile::tempdir().unwrap();
    let config = PlannerConfig::load(tmpdir.path()).unwrap();
    assert_eq!(config.sequencing.module_delimiter, '-');
    assert_eq!(config.sequencing.strategy, SequenceStrategy::Grouped);
    assert_eq!(config.estimation.time_unit, "min");
}
