//! Core domain types for the GenkiDo habit tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise definitions and their completion kinds
//! - Daily exercise logs (one per exercise per day)
//! - Meal logs for time-restricted eating

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// How an exercise's progress is measured
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    /// Count repetitions toward a goal
    Counted,
    /// Count elapsed seconds toward a goal
    Timed,
    /// Simply mark as done
    Binary,
}

impl CompletionKind {
    pub fn unit_name(&self) -> &'static str {
        match self {
            CompletionKind::Counted => "reps",
            CompletionKind::Timed => "sec",
            CompletionKind::Binary => "",
        }
    }
}

/// A user-defined exercise (e.g., "Pushups", goal 50 reps)
///
/// Definitions are soft-deleted via the `active` flag so historical logs
/// stay attributable; inactive definitions are excluded from day evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    pub id: Uuid,
    pub name: String,
    pub kind: CompletionKind,
    /// Goal threshold (reps or seconds). Not meaningful for `Binary`.
    pub goal: i64,
    /// Position among active definitions; stable display ordering.
    pub sort_order: i64,
    pub active: bool,
}

impl ExerciseDefinition {
    pub fn new(name: impl Into<String>, kind: CompletionKind, goal: i64, sort_order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            goal,
            sort_order,
            active: true,
        }
    }
}

/// One day's log for one exercise
///
/// Invariant: at most one log exists per (definition, day) pair. The log
/// book upserts rather than appending duplicates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub definition_id: Uuid,
    /// Reps, seconds, or 0/1 depending on the definition's kind.
    pub count: i64,
    /// Local calendar day bucket (timestamp truncated to midnight).
    pub day: NaiveDate,
}

impl ExerciseLog {
    pub fn new(definition_id: Uuid, count: i64, day: NaiveDate) -> Self {
        Self {
            definition_id,
            count,
            day,
        }
    }
}

// ============================================================================
// Meal Types
// ============================================================================

/// A logged meal with its local wall-clock timestamp
///
/// The timestamp is deliberately not truncated; the eating-window check
/// needs the hour of day. The note payload is opaque to the rule engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MealLog {
    pub id: Uuid,
    pub at: NaiveDateTime,
    pub note: Option<String>,
}

impl MealLog {
    pub fn new(at: NaiveDateTime, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            at,
            note,
        }
    }

    /// Day bucket this meal belongs to
    pub fn day(&self) -> NaiveDate {
        self.at.date()
    }
}
