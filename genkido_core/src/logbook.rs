//! Exercise log persistence.
//!
//! The log book owns the flat list of daily exercise logs and enforces the
//! at-most-one-per-(definition, day) invariant: every write path is an
//! upsert, last writer wins.

use crate::{Error, ExerciseDefinition, ExerciseLog, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// All recorded exercise logs
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LogBook {
    logs: Vec<ExerciseLog>,
}

impl LogBook {
    /// Set the count for one (definition, day) pair, creating the log on
    /// first interaction
    pub fn upsert(&mut self, definition_id: Uuid, day: NaiveDate, count: i64) -> &ExerciseLog {
        let position = self
            .logs
            .iter()
            .position(|l| l.definition_id == definition_id && l.day == day);

        match position {
            Some(index) => {
                self.logs[index].count = count;
                &self.logs[index]
            }
            None => {
                self.logs.push(ExerciseLog::new(definition_id, count, day));
                self.logs.last().unwrap()
            }
        }
    }

    /// Mark a definition complete for the day by setting its count to the
    /// goal (manual tap or the goal-reached event from a countdown)
    pub fn complete(&mut self, definition: &ExerciseDefinition, day: NaiveDate) {
        self.upsert(definition.id, day, definition.goal.max(1));
        tracing::debug!("Completed '{}' for {}", definition.name, day);
    }

    /// Undo a completion by resetting the count to 0
    ///
    /// The log row is kept; a zeroed log and an absent log both evaluate
    /// as incomplete.
    pub fn undo(&mut self, definition_id: Uuid, day: NaiveDate) {
        if let Some(log) = self
            .logs
            .iter_mut()
            .find(|l| l.definition_id == definition_id && l.day == day)
        {
            log.count = 0;
        }
    }

    pub fn get(&self, definition_id: Uuid, day: NaiveDate) -> Option<&ExerciseLog> {
        self.logs
            .iter()
            .find(|l| l.definition_id == definition_id && l.day == day)
    }

    /// All logs bucketed to the given day
    pub fn logs_for_day(&self, day: NaiveDate) -> Vec<ExerciseLog> {
        self.logs.iter().filter(|l| l.day == day).cloned().collect()
    }

    /// All-time total count for one definition (the "since the beginning"
    /// stats row)
    pub fn total_count(&self, definition_id: Uuid) -> i64 {
        self.logs
            .iter()
            .filter(|l| l.definition_id == definition_id)
            .map(|l| l.count)
            .sum()
    }

    /// Load the log book from a JSON file
    ///
    /// Missing file yields an empty book; a corrupt file logs a warning
    /// and yields an empty book rather than failing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No log book at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open log book {:?}: {}. Starting empty.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock log book {:?}: {}. Starting empty.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read log book {:?}: {}. Starting empty.", path, e);
            return Ok(Self::default());
        }
        file.unlock()?;

        match serde_json::from_str::<LogBook>(&contents) {
            Ok(book) => {
                tracing::debug!("Loaded {} logs from {:?}", book.logs.len(), path);
                Ok(book)
            }
            Err(e) => {
                tracing::warn!("Failed to parse log book {:?}: {}. Starting empty.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the log book atomically (temp file, fsync, rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "log book path missing parent")
        })?)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved log book to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompletionKind;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let mut book = LogBook::default();
        let id = Uuid::new_v4();

        book.upsert(id, day(), 10);
        book.upsert(id, day(), 25);

        assert_eq!(book.logs_for_day(day()).len(), 1);
        assert_eq!(book.get(id, day()).unwrap().count, 25);
    }

    #[test]
    fn test_at_most_one_log_per_definition_and_day() {
        let mut book = LogBook::default();
        let id = Uuid::new_v4();
        let other_day = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

        for count in [5, 10, 15] {
            book.upsert(id, day(), count);
        }
        book.upsert(id, other_day, 7);

        assert_eq!(book.logs_for_day(day()).len(), 1);
        assert_eq!(book.logs_for_day(other_day).len(), 1);
    }

    #[test]
    fn test_complete_sets_count_to_goal() {
        let mut book = LogBook::default();
        let definition = ExerciseDefinition::new("Pushups", CompletionKind::Counted, 50, 0);

        book.complete(&definition, day());
        assert_eq!(book.get(definition.id, day()).unwrap().count, 50);
    }

    #[test]
    fn test_complete_binary_records_a_count() {
        let mut book = LogBook::default();
        let definition = ExerciseDefinition::new("Stretch", CompletionKind::Binary, 0, 0);

        book.complete(&definition, day());
        assert!(book.get(definition.id, day()).unwrap().count > 0);
    }

    #[test]
    fn test_undo_zeroes_but_keeps_the_row() {
        let mut book = LogBook::default();
        let definition = ExerciseDefinition::new("Pushups", CompletionKind::Counted, 50, 0);

        book.complete(&definition, day());
        book.undo(definition.id, day());

        let log = book.get(definition.id, day()).unwrap();
        assert_eq!(log.count, 0);
        assert_eq!(book.logs_for_day(day()).len(), 1);
    }

    #[test]
    fn test_undo_without_log_is_a_noop() {
        let mut book = LogBook::default();
        book.undo(Uuid::new_v4(), day());
        assert!(book.logs_for_day(day()).is_empty());
    }

    #[test]
    fn test_total_count_across_days() {
        let mut book = LogBook::default();
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();

        book.upsert(id, day(), 50);
        book.upsert(id, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(), 30);
        book.upsert(other, day(), 99);

        assert_eq!(book.total_count(id), 80);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("logs.json");

        let mut book = LogBook::default();
        let id = Uuid::new_v4();
        book.upsert(id, day(), 42);
        book.save(&path).unwrap();

        let loaded = LogBook::load(&path).unwrap();
        assert_eq!(loaded.get(id, day()).unwrap().count, 42);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let book = LogBook::load(&temp_dir.path().join("none.json")).unwrap();
        assert!(book.logs_for_day(day()).is_empty());
    }
}
