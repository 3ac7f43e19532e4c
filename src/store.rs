//! Session storage boundary
//!
//! The analyzer never touches storage. Shells that persist results inject a
//! [`SessionStore`] and hand it [`SessionRecord`]s built from an input and its
//! analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::error::ComputeError;
use crate::types::{Mood, SessionAnalysis, SessionInput};

/// Default number of sessions returned by a history listing
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// A persisted session: the input, its analysis, and a store-assigned identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub input: SessionInput,
    pub analysis: SessionAnalysis,
}

impl SessionRecord {
    /// Wrap an analysis with a fresh id and the current time
    pub fn new(input: SessionInput, analysis: SessionAnalysis) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            input,
            analysis,
        }
    }

    pub fn summary(&self) -> HistoryEntry {
        HistoryEntry {
            id: self.id,
            recorded_at: self.recorded_at,
            duration_seconds: self.input.duration_seconds,
            words_per_minute: self.analysis.metrics.words_per_minute,
            correction_count: self.input.correction_count,
            mood: self.analysis.assessment.mood,
        }
    }
}

/// One row of a history listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub words_per_minute: u32,
    pub correction_count: u32,
    pub mood: Mood,
}

/// Storage for analyzed sessions
pub trait SessionStore {
    /// Persist a record
    fn save(&mut self, record: SessionRecord) -> Result<(), ComputeError>;

    /// Most recent records first, at most `limit` of them
    fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, ComputeError>;

    /// Number of stored records
    fn len(&self) -> Result<usize, ComputeError>;

    fn is_empty(&self) -> Result<bool, ComputeError> {
        Ok(self.len()? == 0)
    }
}

/// Newest first. Records with the same timestamp keep reverse insertion order.
fn newest_first(mut records: Vec<SessionRecord>, limit: usize) -> Vec<SessionRecord> {
    records.reverse();
    records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    records.truncate(limit);
    records
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    records: Vec<SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&mut self, record: SessionRecord) -> Result<(), ComputeError> {
        self.records.push(record);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, ComputeError> {
        Ok(newest_first(self.records.clone(), limit))
    }

    fn len(&self) -> Result<usize, ComputeError> {
        Ok(self.records.len())
    }
}

/// Append-only JSON Lines file, one record per line
#[derive(Debug, Clone)]
pub struct JsonlSessionStore {
    path: PathBuf,
}

impl JsonlSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_all(&self) -> Result<Vec<SessionRecord>, ComputeError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = std::fs::File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: SessionRecord = serde_json::from_str(trimmed).map_err(|e| {
                ComputeError::StoreError(format!(
                    "{}: bad record on line {}: {}",
                    self.path.display(),
                    line_num + 1,
                    e
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }
}

impl SessionStore for JsonlSessionStore {
    fn save(&mut self, record: SessionRecord) -> Result<(), ComputeError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let line = serde_json::to_string(&record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        debug!(id = %record.id, path = %self.path.display(), "stored session record");
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, ComputeError> {
        Ok(newest_first(self.load_all()?, limit))
    }

    fn len(&self) -> Result<usize, ComputeError> {
        Ok(self.load_all()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyze;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn make_record(wpm_words: usize, seconds_after_start: i64) -> SessionRecord {
        let text = vec!["word"; wpm_words].join(" ");
        let input = SessionInput::from_timestamps(60.0, &[0, 200, 400], 0, text);
        let analysis = analyze(&input).unwrap();
        let mut record = SessionRecord::new(input, analysis);
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();
        record.recorded_at = start + Duration::seconds(seconds_after_start);
        record
    }

    #[test]
    fn test_records_get_unique_ids() {
        let a = make_record(10, 0);
        let b = make_record(10, 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_memory_store_recent_newest_first() {
        let mut store = MemorySessionStore::new();
        store.save(make_record(10, 0)).unwrap();
        store.save(make_record(20, 60)).unwrap();
        store.save(make_record(30, 30)).unwrap();

        let recent = store.recent(2).unwrap();
        let wpms: Vec<u32> = recent
            .iter()
            .map(|r| r.analysis.metrics.words_per_minute)
            .collect();
        assert_eq!(wpms, vec![20, 30]);
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn test_memory_store_ties_prefer_latest_insert() {
        let mut store = MemorySessionStore::new();
        store.save(make_record(10, 0)).unwrap();
        store.save(make_record(20, 0)).unwrap();

        let recent = store.recent(DEFAULT_HISTORY_LIMIT).unwrap();
        assert_eq!(recent[0].analysis.metrics.words_per_minute, 20);
    }

    #[test]
    fn test_jsonl_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sessions.jsonl");
        let mut store = JsonlSessionStore::new(&path);

        assert!(store.is_empty().unwrap());

        let first = make_record(10, 0);
        let second = make_record(40, 10);
        store.save(first.clone()).unwrap();
        store.save(second.clone()).unwrap();

        let reopened = JsonlSessionStore::new(&path);
        assert_eq!(reopened.len().unwrap(), 2);
        assert_eq!(reopened.recent(10).unwrap(), vec![second, first]);
    }

    #[test]
    fn test_jsonl_store_reports_corrupt_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.jsonl");
        std::fs::write(&path, "{\"id\": 1}\n").unwrap();

        let store = JsonlSessionStore::new(&path);
        let err = store.recent(5).unwrap_err();
        assert!(matches!(err, ComputeError::StoreError(ref msg) if msg.contains("line 1")));
    }

    #[test]
    fn test_summary_fields() {
        let record = make_record(25, 0);
        let summary = record.summary();

        assert_eq!(summary.id, record.id);
        assert_eq!(summary.words_per_minute, 25);
        assert_eq!(summary.correction_count, 0);
        assert_eq!(summary.mood, Mood::Relaxed);
        assert_eq!(summary.duration_seconds, 60.0);
    }
}
