//! Consecutive-completion streaks over historical days.
//!
//! Both calculators are pure functions of a day-lookup closure supplied by
//! the caller (backed by the persisted logs) and a horizon bound. Today is
//! deliberately excluded from both walks: it is still in progress, so the
//! scan anchors at yesterday.

use crate::DaySummary;
use chrono::{Duration, NaiveDate};

/// Count complete days walking backward from yesterday
///
/// Stops (without counting) at the first incomplete day. The horizon caps
/// the walk so callers with no recorded data still terminate; a horizon of
/// 0 or below yields 0.
pub fn current_streak<F>(anchor_today: NaiveDate, horizon_days: i64, day_lookup: F) -> u32
where
    F: Fn(NaiveDate) -> DaySummary,
{
    let mut streak = 0;
    let mut date = anchor_today - Duration::days(1);

    for _ in 0..horizon_days.max(0) {
        if !day_lookup(date).is_day_complete() {
            break;
        }
        streak += 1;
        date -= Duration::days(1);
    }

    streak
}

/// Find the best run of consecutive complete days within the horizon
///
/// Unlike [`current_streak`], this does not stop at the first gap: it scans
/// backward from yesterday through the whole horizon, resetting a running
/// counter on incomplete days and tracking the maximum.
pub fn longest_streak<F>(anchor_today: NaiveDate, horizon_days: i64, day_lookup: F) -> u32
where
    F: Fn(NaiveDate) -> DaySummary,
{
    let mut longest = 0;
    let mut run = 0;
    let mut date = anchor_today - Duration::days(1);

    for _ in 0..horizon_days.max(0) {
        if day_lookup(date).is_day_complete() {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
        date -= Duration::days(1);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletionKind, ExerciseDefinition, ExerciseLog, WindowConfig};
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
    }

    /// Lookup where days listed in `complete_offsets` (days before today)
    /// are fully complete and every other day is not.
    fn lookup_from_offsets(complete_offsets: &[i64]) -> impl Fn(NaiveDate) -> DaySummary + '_ {
        let complete: HashSet<NaiveDate> = complete_offsets
            .iter()
            .map(|off| today() - Duration::days(*off))
            .collect();
        let definition = ExerciseDefinition::new("Pushups", CompletionKind::Counted, 50, 0);

        move |date| {
            let count = if complete.contains(&date) { 50 } else { 0 };
            let logs = vec![ExerciseLog::new(definition.id, count, date)];
            DaySummary::evaluate(
                date,
                std::slice::from_ref(&definition),
                &logs,
                &[],
                &WindowConfig::default(),
            )
        }
    }

    #[test]
    fn test_current_streak_stops_at_first_gap() {
        // 3 complete days right before today, gap at -4, 2 more complete
        let lookup = lookup_from_offsets(&[1, 2, 3, 5, 6]);
        assert_eq!(current_streak(today(), 30, &lookup), 3);
        assert_eq!(longest_streak(today(), 30, &lookup), 3);
    }

    #[test]
    fn test_longest_streak_finds_older_run() {
        // Recent run of 3, then an older run of 5 beyond the gap
        let lookup = lookup_from_offsets(&[1, 2, 3, 5, 6, 7, 8, 9]);
        assert_eq!(current_streak(today(), 30, &lookup), 3);
        assert_eq!(longest_streak(today(), 30, &lookup), 5);
    }

    #[test]
    fn test_today_is_excluded() {
        // Only today is complete; the walk starts at yesterday
        let lookup = lookup_from_offsets(&[0]);
        assert_eq!(current_streak(today(), 30, &lookup), 0);
        assert_eq!(longest_streak(today(), 30, &lookup), 0);
    }

    #[test]
    fn test_incomplete_yesterday_yields_zero() {
        let lookup = lookup_from_offsets(&[2, 3]);
        assert_eq!(current_streak(today(), 30, &lookup), 0);
        assert_eq!(longest_streak(today(), 30, &lookup), 2);
    }

    #[test]
    fn test_horizon_caps_the_walk() {
        let lookup = lookup_from_offsets(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(current_streak(today(), 4, &lookup), 4);
        assert_eq!(longest_streak(today(), 4, &lookup), 4);
    }

    #[test]
    fn test_zero_or_negative_horizon() {
        let lookup = lookup_from_offsets(&[1, 2, 3]);
        assert_eq!(current_streak(today(), 0, &lookup), 0);
        assert_eq!(longest_streak(today(), 0, &lookup), 0);
        assert_eq!(current_streak(today(), -5, &lookup), 0);
        assert_eq!(longest_streak(today(), -5, &lookup), 0);
    }

    #[test]
    fn test_vacuous_days_fill_the_horizon() {
        // No active definitions and no meals: every day is vacuously
        // complete, so the streak equals the horizon. Expected behavior of
        // the formulas, not special-cased.
        let lookup =
            |date| DaySummary::evaluate(date, &[], &[], &[], &WindowConfig::default());
        assert_eq!(current_streak(today(), 14, lookup), 14);
        assert_eq!(longest_streak(today(), 14, lookup), 14);
    }

    #[test]
    fn test_streaks_are_deterministic() {
        let lookup = lookup_from_offsets(&[1, 2, 4, 5, 6]);
        let first = (
            current_streak(today(), 30, &lookup),
            longest_streak(today(), 30, &lookup),
        );
        let second = (
            current_streak(today(), 30, &lookup),
            longest_streak(today(), 30, &lookup),
        );
        assert_eq!(first, second);
    }
}
