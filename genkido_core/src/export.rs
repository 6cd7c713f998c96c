//! CSV export of day summaries.
//!
//! Writes one row per calendar day for a backward range ending at the
//! anchor day, re-deriving each `DaySummary` from the stores.

use crate::{journal, DaySummary, ExerciseCatalog, LogBook, Result, WindowConfig};
use chrono::{Duration, NaiveDate};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    completed: usize,
    total: usize,
    all_exercises_completed: bool,
    meal_count: usize,
    meal_outside_window: bool,
    day_complete: bool,
}

impl From<&DaySummary> for CsvRow {
    fn from(summary: &DaySummary) -> Self {
        CsvRow {
            date: summary.day.to_string(),
            completed: summary.completed_count(),
            total: summary.total_count(),
            all_exercises_completed: summary.all_exercises_completed(),
            meal_count: summary.meal_count,
            meal_outside_window: summary.has_meal_outside_window,
            day_complete: summary.is_day_complete(),
        }
    }
}

/// Export the last `days` day summaries (newest first, anchor day included)
///
/// The CSV is fsynced before returning. Returns the number of rows written.
pub fn export_history(
    out_path: &Path,
    anchor_day: NaiveDate,
    days: i64,
    catalog: &ExerciseCatalog,
    log_book: &LogBook,
    journal_path: &Path,
    window: &WindowConfig,
) -> Result<usize> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let active: Vec<_> = catalog.active().into_iter().cloned().collect();
    let meals = journal::read_meals(journal_path)?;

    let mut writer = csv::Writer::from_path(out_path)?;
    let mut written = 0;

    for offset in 0..days.max(0) {
        let day = anchor_day - Duration::days(offset);
        let day_logs = log_book.logs_for_day(day);
        let day_meals: Vec<_> = meals.iter().filter(|m| m.day() == day).cloned().collect();

        let summary = DaySummary::evaluate(day, &active, &day_logs, &day_meals, window);
        writer.serialize(CsvRow::from(&summary))?;
        written += 1;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} day summaries to {:?}", written, out_path);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{MealJournal, MealSink};
    use crate::MealLog;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
    }

    #[test]
    fn test_export_writes_one_row_per_day() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("history.csv");
        let journal_path = temp_dir.path().join("meals.jsonl");

        let catalog = ExerciseCatalog::with_defaults();
        let book = LogBook::default();
        let window = WindowConfig::default();

        let count =
            export_history(&out, anchor(), 7, &catalog, &book, &journal_path, &window).unwrap();
        assert_eq!(count, 7);

        let reader = csv::Reader::from_path(&out).unwrap();
        assert_eq!(reader.into_records().count(), 7);
    }

    #[test]
    fn test_export_reflects_completion_and_meals() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("history.csv");
        let journal_path = temp_dir.path().join("meals.jsonl");

        let catalog = ExerciseCatalog::with_defaults();
        let mut book = LogBook::default();
        for definition in catalog.active() {
            book.upsert(definition.id, anchor(), definition.goal);
        }

        let mut journal = MealJournal::new(&journal_path);
        journal
            .append(&MealLog::new(anchor().and_hms_opt(20, 0, 0).unwrap(), None))
            .unwrap();

        export_history(
            &out,
            anchor(),
            1,
            &catalog,
            &book,
            &journal_path,
            &WindowConfig::default(),
        )
        .unwrap();

        let mut reader = csv::Reader::from_path(&out).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        // date, completed, total, all_completed, meal_count, outside, complete
        assert_eq!(&record[0], "2025-06-20");
        assert_eq!(&record[1], "5");
        assert_eq!(&record[2], "5");
        assert_eq!(&record[3], "true");
        assert_eq!(&record[4], "1");
        assert_eq!(&record[5], "true");
        assert_eq!(&record[6], "false");
    }

    #[test]
    fn test_export_zero_days() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("history.csv");
        let journal_path = temp_dir.path().join("meals.jsonl");

        let count = export_history(
            &out,
            anchor(),
            0,
            &ExerciseCatalog::default(),
            &LogBook::default(),
            &journal_path,
            &WindowConfig::default(),
        )
        .unwrap();
        assert_eq!(count, 0);
    }
}
