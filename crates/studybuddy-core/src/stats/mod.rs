//! Statistics for the study log.
//!
//! Every figure here is derived by scanning the full session list; nothing is
//! cached. Day boundaries are local midnights as reported by the
//! [`Clock`](crate::clock::Clock), so a day window runs from one local
//! midnight to the next.

mod daily;
mod streak;
mod weekly;

pub use daily::{
    day_start, day_window, goal_progress, study_minutes_between, today_study_minutes,
    GoalProgress, DAY_MS,
};
pub use streak::{advance_streak, StreakState};
pub use weekly::{weekly_summary, DayBucket, WeeklySummary, WEEK_DAYS};
