//! Meal journal: append-only JSONL log of meals.
//!
//! Meals are appended as JSON lines with file locking. Unlike exercise
//! logs there is no per-day uniqueness; a day can hold any number of
//! meals, and individual meals are user-deletable.

use crate::{Error, MealLog, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Sink trait for persisting meals
pub trait MealSink {
    fn append(&mut self, meal: &MealLog) -> Result<()>;
}

/// JSONL-based meal journal with file locking
pub struct MealJournal {
    path: PathBuf,
}

impl MealJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl MealSink for MealJournal {
    fn append(&mut self, meal: &MealLog) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(meal)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended meal {} to journal", meal.id);
        Ok(())
    }
}

/// Read all meals from a journal file, oldest first
///
/// Malformed lines are skipped with a warning rather than failing the
/// whole read.
pub fn read_meals(path: &Path) -> Result<Vec<MealLog>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut meals = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<MealLog>(&line) {
            Ok(meal) => meals.push(meal),
            Err(e) => {
                tracing::warn!("Failed to parse meal at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} meals from journal", meals.len());
    Ok(meals)
}

/// Read the meals whose timestamps fall in `[day 00:00, next day 00:00)`
pub fn meals_for_day(path: &Path, day: NaiveDate) -> Result<Vec<MealLog>> {
    let meals = read_meals(path)?;
    Ok(meals.into_iter().filter(|m| m.day() == day).collect())
}

/// Remove one meal by id, rewriting the journal atomically
///
/// Returns true when a meal was removed.
pub fn remove_meal(path: &Path, id: Uuid) -> Result<bool> {
    let meals = read_meals(path)?;
    let remaining: Vec<_> = meals.iter().filter(|m| m.id != id).collect();

    if remaining.len() == meals.len() {
        return Ok(false);
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "journal path missing parent")
    })?)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        for meal in &remaining {
            let line = serde_json::to_string(meal)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Removed meal {} from journal", id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_append_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("meals.jsonl");

        let meal = MealLog::new(at(2, 12), Some("lunch".into()));
        let meal_id = meal.id;

        let mut journal = MealJournal::new(&path);
        journal.append(&meal).unwrap();

        let meals = read_meals(&path).unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, meal_id);
        assert_eq!(meals[0].note.as_deref(), Some("lunch"));
    }

    #[test]
    fn test_multiple_meals_per_day_allowed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("meals.jsonl");

        let mut journal = MealJournal::new(&path);
        for hour in [8, 12, 19] {
            journal.append(&MealLog::new(at(2, hour), None)).unwrap();
        }

        assert_eq!(read_meals(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_meals_for_day_filters_calendar_range() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("meals.jsonl");

        let mut journal = MealJournal::new(&path);
        journal.append(&MealLog::new(at(2, 12), None)).unwrap();
        journal.append(&MealLog::new(at(2, 23), None)).unwrap();
        journal.append(&MealLog::new(at(3, 0), None)).unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(meals_for_day(&path, day).unwrap().len(), 2);
    }

    #[test]
    fn test_remove_meal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("meals.jsonl");

        let keep = MealLog::new(at(2, 12), None);
        let drop = MealLog::new(at(2, 19), None);

        let mut journal = MealJournal::new(&path);
        journal.append(&keep).unwrap();
        journal.append(&drop).unwrap();

        assert!(remove_meal(&path, drop.id).unwrap());

        let meals = read_meals(&path).unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, keep.id);
    }

    #[test]
    fn test_remove_unknown_id_is_false() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("meals.jsonl");

        let mut journal = MealJournal::new(&path);
        journal.append(&MealLog::new(at(2, 12), None)).unwrap();

        assert!(!remove_meal(&path, Uuid::new_v4()).unwrap());
        assert_eq!(read_meals(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_read_missing_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let meals = read_meals(&temp_dir.path().join("none.jsonl")).unwrap();
        assert!(meals.is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("meals.jsonl");

        let mut journal = MealJournal::new(&path);
        journal.append(&MealLog::new(at(2, 12), None)).unwrap();

        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{ broken\n");
        std::fs::write(&path, contents).unwrap();

        journal.append(&MealLog::new(at(2, 13), None)).unwrap();

        assert_eq!(read_meals(&path).unwrap().len(), 2);
    }
}
