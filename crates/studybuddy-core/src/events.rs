use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::session::SessionType;

/// Lifecycle events published by the timer controller.
/// Per-second ticks are not events; they go out on the state channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        total_seconds: u32,
        at: DateTime<FixedOffset>,
    },
    TimerPaused {
        session_type: SessionType,
        seconds_remaining: u32,
        at: DateTime<FixedOffset>,
    },
    TimerResumed {
        session_type: SessionType,
        seconds_remaining: u32,
        at: DateTime<FixedOffset>,
    },
    TimerCompleted {
        session_type: SessionType,
        at: DateTime<FixedOffset>,
    },
    SessionRecorded {
        session_id: i64,
        duration_min: u32,
        at: DateTime<FixedOffset>,
    },
    /// The next session will auto-start after `delay_ms`.
    NextSessionScheduled {
        completed: SessionType,
        next: SessionType,
        delay_ms: u64,
        at: DateTime<FixedOffset>,
    },
    TimerReset {
        at: DateTime<FixedOffset>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_snake_case_json() {
        let at = DateTime::parse_from_rfc3339("2025-02-01T08:00:00+00:00").unwrap();
        let json = serde_json::to_value(Event::NextSessionScheduled {
            completed: SessionType::Study,
            next: SessionType::LongBreak,
            delay_ms: 2000,
            at,
        })
        .unwrap();
        assert_eq!(json["type"], "next_session_scheduled");
        assert_eq!(json["next"], "LONG_BREAK");
        assert_eq!(json["delay_ms"], 2000);
    }
}
