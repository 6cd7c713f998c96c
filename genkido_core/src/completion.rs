//! Exercise completion rules.
//!
//! Pure predicates over one definition and the day's log. Absent logs are
//! not an error; they simply read as incomplete.

use crate::{CompletionKind, ExerciseDefinition, ExerciseLog};

/// Decide whether a definition is completed by the given day log
///
/// - No log → not completed
/// - `Binary` → completed iff any count was recorded
/// - `Counted`/`Timed` → completed iff the count reached the goal
///
/// A goal of 0 (or below) on a counted/timed definition means every count,
/// including 0, satisfies it. Catalog validation flags such goals, but the
/// evaluator accepts them.
pub fn is_completed(definition: &ExerciseDefinition, log: Option<&ExerciseLog>) -> bool {
    let Some(log) = log else {
        return false;
    };

    match definition.kind {
        CompletionKind::Binary => log.count > 0,
        CompletionKind::Counted | CompletionKind::Timed => log.count >= definition.goal,
    }
}

/// Partial-completion ratio in [0.0, 1.0] for progress display
///
/// `min(count / goal, 1.0)` when the goal is positive. A non-positive goal
/// has no meaningful denominator: any recorded count reads as 1.0, nothing
/// recorded reads as 0.0.
pub fn progress(definition: &ExerciseDefinition, log: Option<&ExerciseLog>) -> f64 {
    let count = log.map(|l| l.count).unwrap_or(0);

    if definition.goal > 0 {
        (count as f64 / definition.goal as f64).min(1.0)
    } else if count > 0 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn def(kind: CompletionKind, goal: i64) -> ExerciseDefinition {
        ExerciseDefinition::new("Pushups", kind, goal, 0)
    }

    fn log_with(definition: &ExerciseDefinition, count: i64) -> ExerciseLog {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        ExerciseLog::new(definition.id, count, day)
    }

    #[test]
    fn test_absent_log_is_incomplete() {
        let d = def(CompletionKind::Counted, 50);
        assert!(!is_completed(&d, None));
    }

    #[test]
    fn test_binary_completed_iff_any_count() {
        let d = def(CompletionKind::Binary, 1);
        assert!(!is_completed(&d, Some(&log_with(&d, 0))));
        assert!(is_completed(&d, Some(&log_with(&d, 1))));
        assert!(is_completed(&d, Some(&log_with(&d, 17))));
    }

    #[test]
    fn test_counted_goal_boundary() {
        let d = def(CompletionKind::Counted, 50);
        assert!(!is_completed(&d, Some(&log_with(&d, 49))));
        assert!(is_completed(&d, Some(&log_with(&d, 50))));
        assert!(is_completed(&d, Some(&log_with(&d, 51))));
    }

    #[test]
    fn test_timed_goal_boundary() {
        let d = def(CompletionKind::Timed, 60);
        assert!(!is_completed(&d, Some(&log_with(&d, 59))));
        assert!(is_completed(&d, Some(&log_with(&d, 60))));
    }

    #[test]
    fn test_zero_goal_completes_at_zero_count() {
        let d = def(CompletionKind::Counted, 0);
        assert!(is_completed(&d, Some(&log_with(&d, 0))));
    }

    #[test]
    fn test_progress_halfway() {
        let d = def(CompletionKind::Counted, 50);
        assert_eq!(progress(&d, Some(&log_with(&d, 25))), 0.5);
    }

    #[test]
    fn test_progress_caps_at_one() {
        let d = def(CompletionKind::Counted, 50);
        assert_eq!(progress(&d, Some(&log_with(&d, 100))), 1.0);
    }

    #[test]
    fn test_progress_zero_goal() {
        let d = def(CompletionKind::Counted, 0);
        assert_eq!(progress(&d, Some(&log_with(&d, 0))), 0.0);
        assert_eq!(progress(&d, Some(&log_with(&d, 1))), 1.0);
    }

    #[test]
    fn test_progress_absent_log() {
        let d = def(CompletionKind::Counted, 50);
        assert_eq!(progress(&d, None), 0.0);
    }

    #[test]
    fn test_evaluator_is_idempotent() {
        let d = def(CompletionKind::Counted, 50);
        let l = log_with(&d, 50);
        assert_eq!(is_completed(&d, Some(&l)), is_completed(&d, Some(&l)));
        assert_eq!(progress(&d, Some(&l)), progress(&d, Some(&l)));
    }
}
