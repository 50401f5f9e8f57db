//! Wall-clock source for day boundaries and session timestamps.

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};

pub trait Clock: Send + Sync {
    /// Current time in the user's local offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Instant at which local calendar day `date` begins.
    ///
    /// The offset is the one in force on `date`, which differs from the
    /// offset of [`Clock::now`] across a daylight-saving change.
    fn start_of_day(&self, date: NaiveDate) -> DateTime<FixedOffset>;
}

/// First instant of `date` in `tz`.
///
/// When midnight falls inside a daylight-saving gap the day starts an hour
/// later.
pub fn midnight_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<FixedOffset> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|t| t.fixed_offset())
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight).fixed_offset())
}

/// Reads the system clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<FixedOffset> {
        midnight_in(&Local, date)
    }
}

/// A clock that only moves when told to. Days start at midnight in the
/// offset it was created with.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<FixedOffset> {
        midnight_in(&self.now().timezone(), date)
    }
}

/// US Eastern time for 2025: EST (-05:00) until 2025-03-09 02:00 local,
/// EDT (-04:00) after.
#[cfg(test)]
pub(crate) struct EasternSpring2025 {
    pub now: DateTime<FixedOffset>,
}

#[cfg(test)]
impl Clock for EasternSpring2025 {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<FixedOffset> {
        let change = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let hours = if date > change { -4 } else { -5 };
        midnight_in(&FixedOffset::east_opt(hours * 3600).unwrap(), date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_only_on_request() {
        let start = DateTime::parse_from_rfc3339("2025-03-10T09:00:00+02:00").unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(Duration::hours(26));
        assert_eq!(
            clock.now(),
            DateTime::parse_from_rfc3339("2025-03-11T11:00:00+02:00").unwrap()
        );
    }

    #[test]
    fn manual_clock_days_start_in_its_offset() {
        let clock = ManualClock::new(
            DateTime::parse_from_rfc3339("2025-03-10T09:00:00+02:00").unwrap(),
        );
        let date = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert_eq!(
            clock.start_of_day(date),
            DateTime::parse_from_rfc3339("2025-03-08T00:00:00+02:00").unwrap()
        );
    }

    #[test]
    fn day_start_tracks_offset_change() {
        let clock = EasternSpring2025 {
            now: DateTime::parse_from_rfc3339("2025-03-12T12:00:00-04:00").unwrap(),
        };
        let before = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            clock.start_of_day(before),
            DateTime::parse_from_rfc3339("2025-03-07T00:00:00-05:00").unwrap()
        );
        assert_eq!(
            clock.start_of_day(after),
            DateTime::parse_from_rfc3339("2025-03-10T00:00:00-04:00").unwrap()
        );
    }
}
