#![forbid(unsafe_code)]

//! Core domain model and rule engine for the GenkiDo habit tracker.
//!
//! This crate provides:
//! - Domain types (exercise definitions, daily logs, meals)
//! - Completion and eating-window evaluation
//! - Day summaries and streak calculation
//! - Persistence (exercise catalog, log book, meal journal)
//! - CSV history export

pub mod types;
pub mod error;
pub mod completion;
pub mod window;
pub mod summary;
pub mod streak;
pub mod catalog;
pub mod logbook;
pub mod journal;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use window::{WindowConfig, DEFAULT_END_HOUR, DEFAULT_START_HOUR, WEEKDAYS};
pub use summary::{DaySummary, ExerciseStatus};
pub use streak::{current_streak, longest_streak};
pub use catalog::{default_exercises, ExerciseCatalog};
pub use logbook::LogBook;
pub use journal::{MealJournal, MealSink};
pub use export::export_history;
pub use config::Config;
