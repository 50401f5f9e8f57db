//! Per-day totals and daily goal progress.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::session::Session;

/// Length of a day without a daylight-saving change, in milliseconds.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Local midnight of the calendar day the clock is on.
pub fn day_start<C: Clock + ?Sized>(clock: &C) -> DateTime<FixedOffset> {
    clock.start_of_day(clock.now().date_naive())
}

/// `[start, end)` millisecond bounds of local calendar day `date`.
///
/// The window ends at the next local midnight, so it is 23 or 25 hours long
/// on daylight-saving changes.
pub fn day_window<C: Clock + ?Sized>(clock: &C, date: NaiveDate) -> (i64, i64) {
    let start = clock.start_of_day(date).timestamp_millis();
    let end = date
        .succ_opt()
        .map(|next| clock.start_of_day(next).timestamp_millis())
        .unwrap_or(start + DAY_MS);
    (start, end)
}

/// Sum of study minutes whose timestamp falls in `[start_ms, end_ms)`.
pub fn study_minutes_between(sessions: &[Session], start_ms: i64, end_ms: i64) -> u32 {
    sessions
        .iter()
        .filter(|s| s.is_study() && s.timestamp >= start_ms && s.timestamp < end_ms)
        .fold(0u32, |acc, s| acc.saturating_add(s.duration))
}

/// Study minutes logged today.
pub fn today_study_minutes<C: Clock + ?Sized>(sessions: &[Session], clock: &C) -> u32 {
    let (start, end) = day_window(clock, clock.now().date_naive());
    study_minutes_between(sessions, start, end)
}

/// Today's study time measured against the daily goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub minutes: u32,
    pub goal_minutes: u32,
    /// 0.0 ..= 1.0
    pub fraction: f64,
    pub reached: bool,
}

pub fn goal_progress(today_minutes: u32, daily_goal_hours: u32) -> GoalProgress {
    let goal_minutes = daily_goal_hours.saturating_mul(60);
    let fraction = if goal_minutes == 0 {
        1.0
    } else {
        (today_minutes as f64 / goal_minutes as f64).min(1.0)
    };
    GoalProgress {
        minutes: today_minutes,
        goal_minutes,
        fraction,
        reached: today_minutes >= goal_minutes,
    }
}
