//! Consecutive-day study streak.

use serde::{Deserialize, Serialize};

use super::daily::DAY_MS;
use crate::clock::Clock;

/// Stored streak counters. `last_study_ms == 0` means no study recorded yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current: u32,
    pub last_study_ms: i64,
}

/// Apply one study completion at the clock's current time.
///
/// Same day leaves the count alone, yesterday extends it, anything older
/// starts over at 1. The last-study time always moves to now.
pub fn advance_streak<C: Clock + ?Sized>(state: StreakState, clock: &C) -> StreakState {
    let now = clock.now();
    let date = now.date_naive();
    let today = clock.start_of_day(date).timestamp_millis();
    let yesterday = date
        .pred_opt()
        .map(|d| clock.start_of_day(d).timestamp_millis())
        .unwrap_or(today - DAY_MS);

    let current = if state.last_study_ms >= today {
        state.current
    } else if state.last_study_ms >= yesterday {
        state.current.saturating_add(1)
    } else {
        1
    };

    StreakState {
        current,
        last_study_ms: now.timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{EasternSpring2025, ManualClock};
    use chrono::{DateTime, Duration, FixedOffset};
    use proptest::prelude::*;

    fn at(now: DateTime<FixedOffset>) -> ManualClock {
        ManualClock::new(now)
    }

    fn noon(day: u32) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(&format!("2025-05-{day:02}T12:00:00-04:00")).unwrap()
    }

    #[test]
    fn first_study_starts_at_one() {
        let next = advance_streak(StreakState::default(), &at(noon(10)));
        assert_eq!(next.current, 1);
        assert_eq!(next.last_study_ms, noon(10).timestamp_millis());
    }

    #[test]
    fn same_day_keeps_count() {
        let state = advance_streak(StreakState { current: 3, last_study_ms: 0 }, &at(noon(10)));
        let again = advance_streak(
            StreakState { current: 3, ..state },
            &at(noon(10) + Duration::hours(5)),
        );
        assert_eq!(again.current, 3);
    }

    #[test]
    fn late_yesterday_to_early_today_extends() {
        let late = DateTime::parse_from_rfc3339("2025-05-09T23:59:00-04:00").unwrap();
        let early = DateTime::parse_from_rfc3339("2025-05-10T00:01:00-04:00").unwrap();
        let state = StreakState {
            current: 2,
            last_study_ms: late.timestamp_millis(),
        };
        assert_eq!(advance_streak(state, &at(early)).current, 3);
    }

    #[test]
    fn yesterday_follows_offset_change() {
        // Saturday 23:30 EST, then Monday 00:30 EDT: Sunday was skipped.
        let saturday = DateTime::parse_from_rfc3339("2025-03-08T23:30:00-05:00").unwrap();
        let state = StreakState {
            current: 4,
            last_study_ms: saturday.timestamp_millis(),
        };
        let monday = EasternSpring2025 {
            now: DateTime::parse_from_rfc3339("2025-03-10T00:30:00-04:00").unwrap(),
        };
        assert_eq!(advance_streak(state, &monday).current, 1);

        let sunday = EasternSpring2025 {
            now: DateTime::parse_from_rfc3339("2025-03-09T23:30:00-04:00").unwrap(),
        };
        assert_eq!(advance_streak(state, &sunday).current, 5);
    }

    proptest! {
        #[test]
        fn streak_law(current in 1u32..1000, gap_days in 0u32..10, hour in 0i64..24) {
            let last = noon(1);
            let now = noon(1 + gap_days) - Duration::hours(12) + Duration::hours(hour);
            let state = StreakState { current, last_study_ms: last.timestamp_millis() };
            let next = advance_streak(state, &at(now));
            let expected = match gap_days {
                0 => current,
                1 => current + 1,
                _ => 1,
            };
            prop_assert_eq!(next.current, expected);
            prop_assert_eq!(next.last_study_ms, now.timestamp_millis());
        }
    }
}
