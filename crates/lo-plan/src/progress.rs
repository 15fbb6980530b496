//! Learner progress along a created course's learning path.

use chrono::{DateTime, Utc};
use lo_core::index::MetadataIndex;
use serde::{Deserialize, Serialize};

/// One LO on a learning path with its study timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathEntry {
    pub id: String,
    pub started_on: Option<DateTime<Utc>>,
    pub completed_on: Option<DateTime<Utc>>,
}

impl PathEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_started(&self) -> bool {
        self.started_on.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_on.is_some()
    }
}

/// Summary of how far a learner has come along a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseProgress {
    pub total: usize,
    pub completed: usize,
    /// 0 to 100; an empty path is 0% complete.
    pub percent_complete: f64,
    /// Estimated time of completed entries.
    pub completed_time: f64,
    /// Estimated time of entries not yet completed.
    pub remaining_time: f64,
    /// Where the learner should pick up, `None` for an empty path.
    pub resume_at: Option<String>,
}

impl CourseProgress {
    pub fn from_path(index: &MetadataIndex, path: &[PathEntry]) -> Self {
        let mut completed = 0;
        let mut completed_time = 0.0;
        let mut remaining_time = 0.0;
        for entry in path {
            let time = index.estimated_time(&entry.id);
            if entry.is_completed() {
                completed += 1;
                completed_time += time;
            } else {
                remaining_time += time;
            }
        }

        let percent_complete = if path.is_empty() {
            0.0
        } else {
            completed as f64 * 100.0 / path.len() as f64
        };

        Self {
            total: path.len(),
            completed,
            percent_complete,
            completed_time,
            remaining_time,
            resume_at: resume_position(path).map(|i| path[i].id.clone()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Entry after the last completed one; the first entry when nothing before the
/// final entry is completed.
fn resume_position(path: &[PathEntry]) -> Option<usize> {
    if path.is_empty() {
        return None;
    }
    let last_completed = path[..path.len() - 1]
        .iter()
        .rposition(PathEntry::is_completed);
    Some(last_completed.map_or(0, |i| i + 1))
}

/// Complete the entry at `current` and start the one after it.
///
/// Returns the index of the newly started entry. The final entry has no
/// successor, so advancing from it (or from an out-of-range index) changes
/// nothing and returns `None`.
pub fn advance(path: &mut [PathEntry], current: usize, now: DateTime<Utc>) -> Option<usize> {
    let next = current.checked_add(1)?;
    if next >= path.len() {
        return None;
    }
    path[current].completed_on = Some(now);
    path[next].started_on = Some(now);
    tracing::debug!("completed {}, started {}", path[current].id, path[next].id);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lo_core::index::LoMetadata;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn index() -> MetadataIndex {
        [("a", 10.0), ("b", 20.0), ("c", 30.0)]
            .into_iter()
            .map(|(id, t)| (id.to_string(), LoMetadata::new(t)))
            .collect()
    }

    fn path(done: &[bool]) -> Vec<PathEntry> {
        ["a", "b", "c"]
            .iter()
            .zip(done)
            .map(|(id, &done)| PathEntry {
                id: (*id).to_string(),
                started_on: Some(at(8)),
                completed_on: done.then(|| at(9)),
            })
            .collect()
    }

    #[test]
    fn test_fresh_path_resumes_at_first_entry() {
        let progress = CourseProgress::from_path(&index(), &path(&[false, false, false]));
        assert_eq!(progress.completed, 0);
        assert_eq!(progress.percent_complete, 0.0);
        assert_eq!(progress.remaining_time, 60.0);
        assert_eq!(progress.resume_at.as_deref(), Some("a"));
    }

    #[test]
    fn test_resumes_after_last_completed() {
        let progress = CourseProgress::from_path(&index(), &path(&[true, false, false]));
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.completed_time, 10.0);
        assert_eq!(progress.remaining_time, 50.0);
        assert_eq!(progress.resume_at.as_deref(), Some("b"));
    }

    #[test]
    fn test_gap_resumes_after_latest_completion() {
        let progress = CourseProgress::from_path(&index(), &path(&[false, true, false]));
        assert_eq!(progress.resume_at.as_deref(), Some("c"));
    }

    #[test]
    fn test_finished_path_resumes_at_last_entry() {
        let progress = CourseProgress::from_path(&index(), &path(&[true, true, true]));
        assert!(progress.is_finished());
        assert_eq!(progress.percent_complete, 100.0);
        assert_eq!(progress.resume_at.as_deref(), Some("c"));
    }

    #[test]
    fn test_empty_path() {
        let progress = CourseProgress::from_path(&index(), &[]);
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percent_complete, 0.0);
        assert_eq!(progress.resume_at, None);
        assert!(!progress.is_finished());
    }

    #[test]
    fn test_unknown_entries_cost_nothing() {
        let progress = CourseProgress::from_path(&index(), &[PathEntry::new("ghost")]);
        assert_eq!(progress.remaining_time, 0.0);
        assert_eq!(progress.resume_at.as_deref(), Some("ghost"));
    }

    #[test]
    fn test_advance_completes_current_and_starts_next() {
        let mut path = vec![PathEntry::new("a"), PathEntry::new("b")];
        assert_eq!(advance(&mut path, 0, at(10)), Some(1));
        assert_eq!(path[0].completed_on, Some(at(10)));
        assert_eq!(path[1].started_on, Some(at(10)));
        assert!(!path[1].is_completed());
    }

    #[test]
    fn test_advance_from_last_entry_is_a_no_op() {
        let mut path = vec![PathEntry::new("a"), PathEntry::new("b")];
        assert_eq!(advance(&mut path, 1, at(10)), None);
        assert_eq!(advance(&mut path, 7, at(10)), None);
        assert_eq!(advance(&mut path, usize::MAX, at(10)), None);
        assert!(path.iter().all(|e| !e.is_started() && !e.is_completed()));
    }

    #[test]
    fn test_advance_from_max_index_does_not_overflow() {
        let mut path = vec![PathEntry::new("a")];
        assert_eq!(advance(&mut path, usize::MAX, at(10)), None);
        assert!(!path[0].is_completed());
    }

    #[test]
    fn test_path_entry_deserializes_partial_records() {
        let entry: PathEntry =
            serde_json::from_str(r#"{"id":"a","started_on":"2024-03-01T08:00:00Z"}"#).unwrap();
        assert_eq!(entry.started_on, Some(at(8)));
        assert!(!entry.is_completed());
    }
}
