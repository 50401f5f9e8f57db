//! Maps domain records onto the key-value store.
//!
//! Reads are best-effort: a missing or undecodable value comes back as an
//! empty list, default settings, no timer, or zero, and a warning is logged.
//! Writes propagate store errors to the caller.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::kv::KvStore;
use super::settings::Settings;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::session::Session;
use crate::stats::{self, GoalProgress, StreakState, WeeklySummary};
use crate::timer::TimerState;

/// Persisted keys.
pub mod keys {
    pub const SESSIONS: &str = "sessions";
    pub const SETTINGS: &str = "settings";
    pub const TIMER_STATE: &str = "timer_state";
    pub const CURRENT_STREAK: &str = "current_streak";
    pub const LAST_STUDY_DATE: &str = "last_study_date";
}

/// Handle to the study log and preferences. Cheap to clone.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    sessions_tx: Arc<watch::Sender<Vec<Session>>>,
}

impl Repository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        let (sessions_tx, _) = watch::channel(Vec::new());
        let repo = Self {
            store,
            clock,
            sessions_tx: Arc::new(sessions_tx),
        };
        repo.sessions_tx.send_replace(repo.get_all_sessions());
        repo
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Latest session list, newest first.
    pub fn sessions_stream(&self) -> watch::Receiver<Vec<Session>> {
        self.sessions_tx.subscribe()
    }

    /// Every logged session, newest first.
    pub fn get_all_sessions(&self) -> Vec<Session> {
        self.read_json(keys::SESSIONS).unwrap_or_default()
    }

    /// Replace the whole session list.
    pub fn save_sessions(&self, sessions: &[Session]) -> Result<()> {
        let json = serde_json::to_string(sessions)?;
        self.store.put(keys::SESSIONS, &json)?;
        self.sessions_tx.send_replace(sessions.to_vec());
        Ok(())
    }

    /// Prepend `session` to the log, then update the streak if it was study.
    pub fn add_session(&self, session: Session) -> Result<()> {
        let is_study = session.is_study();
        let mut sessions = self.get_all_sessions();
        sessions.insert(0, session);
        self.save_sessions(&sessions)?;
        debug!(count = sessions.len(), "session added");

        if is_study {
            self.update_streak()?;
        }
        Ok(())
    }

    /// Attach a note photo reference to the session with `id`.
    ///
    /// Returns false if no such session exists.
    pub fn attach_note_photo(&self, id: i64, path: &str) -> Result<bool> {
        let mut sessions = self.get_all_sessions();
        let Some(session) = sessions.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        session.note_photo_path = Some(path.to_string());
        self.save_sessions(&sessions)?;
        Ok(true)
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn get_settings(&self) -> Settings {
        self.read_json(keys::SETTINGS).unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        let json = serde_json::to_string(settings)?;
        self.store.put(keys::SETTINGS, &json)?;
        info!(?settings, "settings saved");
        Ok(())
    }

    // ── Timer state ──────────────────────────────────────────────────

    pub fn get_timer_state(&self) -> Option<TimerState> {
        self.read_json::<TimerState>(keys::TIMER_STATE)
            .map(TimerState::normalized)
    }

    /// Overwrite the persisted countdown; `None` clears it.
    pub fn save_timer_state(&self, state: Option<&TimerState>) -> Result<()> {
        match state {
            Some(state) => {
                let json = serde_json::to_string(state)?;
                self.store.put(keys::TIMER_STATE, &json)?;
            }
            None => self.store.remove(keys::TIMER_STATE)?,
        }
        Ok(())
    }

    // ── Statistics ───────────────────────────────────────────────────

    /// Study minutes logged since local midnight.
    pub fn get_today_study_time(&self) -> u32 {
        stats::today_study_minutes(&self.get_all_sessions(), self.clock.as_ref())
    }

    /// Study minutes per day for the trailing week, oldest first.
    pub fn get_weekly_study_time(&self) -> WeeklySummary {
        stats::weekly_summary(&self.get_all_sessions(), self.clock.as_ref())
    }

    pub fn get_daily_goal_progress(&self) -> GoalProgress {
        stats::goal_progress(self.get_today_study_time(), self.get_settings().daily_goal_hours)
    }

    pub fn get_current_streak(&self) -> u32 {
        self.read_number::<u32>(keys::CURRENT_STREAK).unwrap_or(0)
    }

    pub fn get_last_study_date(&self) -> Option<DateTime<FixedOffset>> {
        let millis = self.read_number::<i64>(keys::LAST_STUDY_DATE)?;
        if millis == 0 {
            return None;
        }
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|t| t.with_timezone(self.now().offset()))
    }

    fn update_streak(&self) -> Result<()> {
        let before = StreakState {
            current: self.get_current_streak(),
            last_study_ms: self.read_number::<i64>(keys::LAST_STUDY_DATE).unwrap_or(0),
        };
        let after = stats::advance_streak(before, self.clock.as_ref());

        self.store
            .put(keys::CURRENT_STREAK, &after.current.to_string())?;
        self.store
            .put(keys::LAST_STUDY_DATE, &after.last_study_ms.to_string())?;

        if after.current != before.current {
            info!(from = before.current, to = after.current, "streak updated");
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "store read failed, using default");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored value is corrupt, using default");
                None
            }
        }
    }

    fn read_number<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        let parsed = raw.trim().parse().ok();
        if parsed.is_none() {
            warn!(key, "stored number is corrupt, using default");
        }
        parsed
    }
}
