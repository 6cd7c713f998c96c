//! Per-day completeness verdict.
//!
//! A `DaySummary` is derived on demand, never stored. The caller narrows
//! logs and meals to the relevant calendar day; evaluation only matches
//! day buckets within the already-narrowed inputs.

use crate::{completion, ExerciseDefinition, ExerciseLog, MealLog, WindowConfig};
use chrono::NaiveDate;
use uuid::Uuid;

/// Completion status of one active definition within a day
#[derive(Clone, Debug)]
pub struct ExerciseStatus {
    pub definition_id: Uuid,
    pub name: String,
    pub completed: bool,
    pub count: i64,
    pub goal: i64,
    pub progress: f64,
}

/// The derived verdict of completeness for one calendar day
#[derive(Clone, Debug)]
pub struct DaySummary {
    pub day: NaiveDate,
    pub exercises: Vec<ExerciseStatus>,
    pub meal_count: usize,
    pub has_meal_outside_window: bool,
}

impl DaySummary {
    /// Evaluate one calendar day from already-filtered inputs
    ///
    /// `logs` and `meals` must be pre-filtered to `day` by the caller;
    /// `active_definitions` is the current active catalog slice.
    pub fn evaluate(
        day: NaiveDate,
        active_definitions: &[ExerciseDefinition],
        logs: &[ExerciseLog],
        meals: &[MealLog],
        window: &WindowConfig,
    ) -> Self {
        let exercises = active_definitions
            .iter()
            .map(|definition| {
                let log = logs
                    .iter()
                    .find(|l| l.definition_id == definition.id && l.day == day);

                ExerciseStatus {
                    definition_id: definition.id,
                    name: definition.name.clone(),
                    completed: completion::is_completed(definition, log),
                    count: log.map(|l| l.count).unwrap_or(0),
                    goal: definition.goal,
                    progress: completion::progress(definition, log),
                }
            })
            .collect();

        let has_meal_outside_window = meals.iter().any(|m| window.is_outside_window(m.at));

        Self {
            day,
            exercises,
            meal_count: meals.len(),
            has_meal_outside_window,
        }
    }

    /// True when every active definition is completed
    ///
    /// Vacuously true with zero active definitions.
    pub fn all_exercises_completed(&self) -> bool {
        self.exercises.iter().all(|e| e.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.exercises.iter().filter(|e| e.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.exercises.len()
    }

    /// Day is complete when all exercises are done and no meal fell
    /// outside the eating window
    pub fn is_day_complete(&self) -> bool {
        self.all_exercises_completed() && !self.has_meal_outside_window
    }

    /// Completed share of active definitions; 0 when there are none
    pub fn progress_ratio(&self) -> f64 {
        if self.exercises.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.total_count() as f64
    }
}
