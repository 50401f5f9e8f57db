//! Snapshot of the single in-flight countdown.

use serde::{Deserialize, Serialize};

use crate::session::SessionType;

/// Coarse controller state derived from the optional [`TimerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

impl TimerStatus {
    pub fn of(state: Option<&TimerState>) -> Self {
        match state {
            None => TimerStatus::Idle,
            Some(s) if s.is_running => TimerStatus::Running,
            Some(_) => TimerStatus::Paused,
        }
    }
}

/// The running or paused countdown. `seconds_remaining <= total_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub total_seconds: u32,
    pub seconds_remaining: u32,
    pub is_running: bool,
    pub session_type: SessionType,
}

impl TimerState {
    /// A fresh, running countdown of `total_seconds`.
    pub fn start(session_type: SessionType, total_seconds: u32) -> Self {
        Self {
            total_seconds,
            seconds_remaining: total_seconds,
            is_running: true,
            session_type,
        }
    }

    /// Clamp a decoded snapshot back inside its invariant.
    pub fn normalized(mut self) -> Self {
        self.seconds_remaining = self.seconds_remaining.min(self.total_seconds);
        self
    }

    pub fn paused(&self) -> Self {
        Self {
            is_running: false,
            ..self.clone()
        }
    }

    pub fn resumed(&self) -> Self {
        Self {
            is_running: true,
            ..self.clone()
        }
    }

    /// Count down one second. Returns true once nothing is left.
    pub fn tick(&mut self) -> bool {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.seconds_remaining == 0
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.total_seconds.saturating_sub(self.seconds_remaining)
    }

    /// 0.0 .. 1.0 fraction of the countdown already elapsed.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        1.0 - (self.seconds_remaining as f64 / self.total_seconds as f64)
    }

    /// Whole minutes this countdown represents when logged as a session.
    pub fn duration_minutes(&self) -> u32 {
        self.total_seconds / 60
    }

    /// A persisted snapshot worth resuming after a restart.
    pub fn is_resumable(&self) -> bool {
        self.is_running && self.seconds_remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_counts_down_to_zero() {
        let mut state = TimerState::start(SessionType::ShortBreak, 2);
        assert!(!state.tick());
        assert_eq!(state.seconds_remaining, 1);
        assert!(state.tick());
        assert!(state.tick());
        assert_eq!(state.seconds_remaining, 0);
    }

    #[test]
    fn progress_and_elapsed() {
        let mut state = TimerState::start(SessionType::Study, 100);
        assert_eq!(state.progress(), 0.0);
        state.seconds_remaining = 25;
        assert!((state.progress() - 0.75).abs() < f64::EPSILON);
        assert_eq!(state.elapsed_seconds(), 75);
    }

    #[test]
    fn status_follows_running_flag() {
        let state = TimerState::start(SessionType::Study, 60);
        assert_eq!(TimerStatus::of(None), TimerStatus::Idle);
        assert_eq!(TimerStatus::of(Some(&state)), TimerStatus::Running);
        assert_eq!(TimerStatus::of(Some(&state.paused())), TimerStatus::Paused);
    }

    #[test]
    fn normalized_clamps_remaining() {
        let state = TimerState {
            total_seconds: 60,
            seconds_remaining: 90,
            is_running: true,
            session_type: SessionType::Study,
        }
        .normalized();
        assert_eq!(state.seconds_remaining, 60);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(TimerState::start(SessionType::LongBreak, 900)).unwrap();
        assert_eq!(json["totalSeconds"], 900);
        assert_eq!(json["secondsRemaining"], 900);
        assert_eq!(json["isRunning"], true);
        assert_eq!(json["sessionType"], "LONG_BREAK");
    }

    #[test]
    fn only_running_with_time_left_is_resumable() {
        let running = TimerState::start(SessionType::Study, 10);
        assert!(running.is_resumable());
        assert!(!running.paused().is_resumable());
        let mut done = running.clone();
        done.seconds_remaining = 0;
        assert!(!done.is_resumable());
    }
}
