//! Trailing seven-day study buckets.

use chrono::{Days, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::daily::{day_window, study_minutes_between};
use crate::clock::Clock;
use crate::session::Session;

/// Number of buckets in a weekly summary.
pub const WEEK_DAYS: u64 = 7;

/// One calendar day's study minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    /// Abbreviated weekday name ("Mon").
    pub label: String,
    pub date: NaiveDate,
    pub minutes: u32,
}

/// Study minutes for today and the six days before it, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub buckets: Vec<DayBucket>,
}

impl WeeklySummary {
    pub fn total_minutes(&self) -> u32 {
        self.buckets
            .iter()
            .fold(0u32, |acc, b| acc.saturating_add(b.minutes))
    }

    /// Integer average over all buckets, empty days included.
    pub fn daily_average_minutes(&self) -> u32 {
        if self.buckets.is_empty() {
            return 0;
        }
        self.total_minutes() / self.buckets.len() as u32
    }

    /// Ordered label -> minutes view.
    pub fn as_map(&self) -> IndexMap<String, u32> {
        self.buckets
            .iter()
            .map(|b| (b.label.clone(), b.minutes))
            .collect()
    }

    pub fn today(&self) -> Option<&DayBucket> {
        self.buckets.last()
    }
}

/// Build the trailing week ending on the clock's current calendar day.
///
/// Each bucket rescans the whole session list over its own local day.
pub fn weekly_summary<C: Clock + ?Sized>(sessions: &[Session], clock: &C) -> WeeklySummary {
    let today = clock.now().date_naive();
    let buckets = (0..WEEK_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let (start, end) = day_window(clock, date);
            DayBucket {
                label: date.format("%a").to_string(),
                date,
                minutes: study_minutes_between(sessions, start, end),
            }
        })
        .collect();

    WeeklySummary { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{EasternSpring2025, ManualClock};
    use crate::session::SessionType;
    use chrono::{DateTime, Duration, FixedOffset};
    use proptest::prelude::*;

    fn now() -> DateTime<FixedOffset> {
        // A Wednesday.
        DateTime::parse_from_rfc3339("2025-06-11T18:00:00+01:00").unwrap()
    }

    fn clock() -> ManualClock {
        ManualClock::new(now())
    }

    #[test]
    fn seven_buckets_ending_today() {
        let summary = weekly_summary(&[], &clock());
        assert_eq!(summary.buckets.len(), 7);
        let labels: Vec<_> = summary.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"]);
        assert_eq!(
            summary.today().map(|b| b.date),
            NaiveDate::from_ymd_opt(2025, 6, 11)
        );
    }

    #[test]
    fn buckets_sum_study_only_and_skip_out_of_range() {
        let sessions = vec![
            Session::new(SessionType::Study, 25, &now()),
            Session::new(SessionType::Study, 25, &(now() - Duration::hours(2))),
            Session::new(SessionType::LongBreak, 15, &now()),
            Session::new(SessionType::Study, 50, &(now() - Duration::days(1))),
            Session::new(SessionType::Study, 45, &(now() - Duration::days(6))),
            Session::new(SessionType::Study, 99, &(now() - Duration::days(7))),
        ];
        let summary = weekly_summary(&sessions, &clock());
        let minutes: Vec<u32> = summary.buckets.iter().map(|b| b.minutes).collect();
        assert_eq!(minutes, [45, 0, 0, 0, 0, 50, 50]);
        assert_eq!(summary.total_minutes(), 145);
        assert_eq!(summary.daily_average_minutes(), 20);
    }

    #[test]
    fn map_view_keeps_order() {
        let summary = weekly_summary(&[], &clock());
        let keys: Vec<_> = summary.as_map().keys().cloned().collect();
        assert_eq!(keys.first().map(String::as_str), Some("Thu"));
        assert_eq!(keys.last().map(String::as_str), Some("Wed"));
    }

    #[test]
    fn buckets_follow_local_days_across_offset_change() {
        let clock = EasternSpring2025 {
            now: DateTime::parse_from_rfc3339("2025-03-12T12:00:00-04:00").unwrap(),
        };
        let late_friday = DateTime::parse_from_rfc3339("2025-03-07T23:30:00-05:00").unwrap();
        let early_monday = DateTime::parse_from_rfc3339("2025-03-10T00:30:00-04:00").unwrap();
        let sessions = vec![
            Session::new(SessionType::Study, 25, &late_friday),
            Session::new(SessionType::Study, 40, &early_monday),
        ];

        let summary = weekly_summary(&sessions, &clock);
        let by_label = summary.as_map();
        assert_eq!(by_label["Fri"], 25);
        assert_eq!(by_label["Sat"], 0);
        assert_eq!(by_label["Sun"], 0);
        assert_eq!(by_label["Mon"], 40);
        assert_eq!(summary.total_minutes(), 65);
    }

    proptest! {
        #[test]
        fn every_bucket_matches_its_window(offsets in prop::collection::vec((0i64..10 * 24 * 60, 1u32..120), 0..40)) {
            let sessions: Vec<Session> = offsets
                .iter()
                .map(|(mins_ago, duration)| {
                    Session::new(SessionType::Study, *duration, &(now() - Duration::minutes(*mins_ago)))
                })
                .collect();
            let summary = weekly_summary(&sessions, &clock());
            prop_assert_eq!(summary.buckets.len(), 7);
            for bucket in &summary.buckets {
                let expected: u32 = sessions
                    .iter()
                    .filter(|s| {
                        s.started_at(now().offset()).map(|t| t.date_naive()) == Some(bucket.date)
                    })
                    .map(|s| s.duration)
                    .sum();
                prop_assert_eq!(bucket.minutes, expected);
            }
        }
    }
}
