//! Per-weekday eating-window configuration and checks.
//!
//! Each weekday carries a start hour and an end/cutoff hour; a meal logged
//! at hour `h` violates the window when `h < start || h >= end`. Start and
//! end are stored independently and never cross-validated; configuring
//! `end <= start` makes most of the day read as outside the window, which
//! is the documented behavior of the formula.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Default start hour (08:00)
pub const DEFAULT_START_HOUR: u32 = 8;
/// Default end/cutoff hour (18:00)
pub const DEFAULT_END_HOUR: u32 = 18;

/// Eating-window hours for all seven weekdays
///
/// Hours are indexed Monday-first (`Weekday::num_days_from_monday`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowConfig {
    start_hours: [u32; 7],
    end_hours: [u32; 7],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start_hours: [DEFAULT_START_HOUR; 7],
            end_hours: [DEFAULT_END_HOUR; 7],
        }
    }
}

impl WindowConfig {
    /// Earliest eating hour for a weekday
    pub fn start_hour(&self, weekday: Weekday) -> u32 {
        self.start_hours[weekday.num_days_from_monday() as usize]
    }

    /// Cutoff hour for a weekday
    pub fn end_hour(&self, weekday: Weekday) -> u32 {
        self.end_hours[weekday.num_days_from_monday() as usize]
    }

    /// Set the start hour for a weekday (0-23)
    pub fn set_start_hour(&mut self, weekday: Weekday, hour: u32) -> Result<()> {
        if hour > 23 {
            return Err(Error::Config(format!("start hour {} out of range", hour)));
        }
        self.start_hours[weekday.num_days_from_monday() as usize] = hour;
        Ok(())
    }

    /// Set the end/cutoff hour for a weekday (0-23)
    pub fn set_end_hour(&mut self, weekday: Weekday, hour: u32) -> Result<()> {
        if hour > 23 {
            return Err(Error::Config(format!("end hour {} out of range", hour)));
        }
        self.end_hours[weekday.num_days_from_monday() as usize] = hour;
        Ok(())
    }

    /// Check whether a timestamp falls outside the eating window
    ///
    /// Uses only the local hour of day and the weekday.
    pub fn is_outside_window(&self, at: NaiveDateTime) -> bool {
        let hour = at.hour();
        let weekday = at.date().weekday();
        hour < self.start_hour(weekday) || hour >= self.end_hour(weekday)
    }

    /// Check whether a timestamp is earlier than the window start
    ///
    /// When reporting a violation, this predicate takes precedence over
    /// [`WindowConfig::is_after_end`].
    pub fn is_before_start(&self, at: NaiveDateTime) -> bool {
        at.hour() < self.start_hour(at.date().weekday())
    }

    /// Check whether a timestamp is at or past the cutoff
    pub fn is_after_end(&self, at: NaiveDateTime) -> bool {
        at.hour() >= self.end_hour(at.date().weekday())
    }

    /// Load window configuration from a JSON file
    ///
    /// A missing or unreadable file yields the defaults (08:00-18:00 on
    /// every weekday) rather than an error; a corrupt file does too, with
    /// a warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No window config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open window config {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock window config {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read window config {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }
        file.unlock()?;

        match serde_json::from_str::<WindowConfig>(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Failed to parse window config {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save window configuration atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "window config path missing parent")
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

        tracing::debug!("Saved window config to {:?}", path);
        Ok(())
    }
}

/// Weekdays in display order, Monday first
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
