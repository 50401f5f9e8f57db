//! Timer controller.
//!
//! Owns the single in-flight countdown and drives the study/break cycle.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start_new_session--> Running --toggle--> Paused --toggle--> Running
//! Running|Paused --reset--> Idle
//! Running --(reaches zero)--> record, alert, wait --> Running (next kind)
//! ```
//!
//! Every transition aborts the previous countdown task and bumps a
//! generation counter; a task that wakes up with a stale generation exits
//! without touching state. The countdown task also carries completion
//! handling and the delayed auto-start, so cancelling it cancels both.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use super::alert::{Alerter, CompletionAlert};
use super::cycle::next_session_type;
use super::state::{TimerState, TimerStatus};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::session::{Session, SessionType};
use crate::storage::{Repository, Settings, TimerConfig};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerOptions {
    pub tick_interval: Duration,
    /// Pause between a completion and the next session starting.
    pub auto_start_delay: Duration,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            auto_start_delay: Duration::from_secs(2),
        }
    }
}

impl From<&TimerConfig> for TimerOptions {
    fn from(config: &TimerConfig) -> Self {
        Self {
            tick_interval: config.tick_interval(),
            auto_start_delay: config.auto_start_delay(),
        }
    }
}

/// Figures refreshed after every completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyStats {
    pub today_minutes: u32,
    pub current_streak: u32,
    /// Study sessions finished since this controller was created.
    pub completed_sessions: u32,
}

struct Inner {
    generation: u64,
    ticker: Option<JoinHandle<()>>,
    completed_study: u32,
    /// Kind waiting to auto-start after a completion.
    pending_next: Option<SessionType>,
}

struct Shared {
    repository: Repository,
    alerter: Arc<dyn Alerter>,
    options: TimerOptions,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<Option<TimerState>>,
    stats_tx: watch::Sender<StudyStats>,
    events_tx: broadcast::Sender<Event>,
}

/// Handle to the study timer. Clones share the same countdown.
///
/// Methods that start a countdown spawn onto the current Tokio runtime.
#[derive(Clone)]
pub struct TimerController {
    shared: Arc<Shared>,
}

impl TimerController {
    pub fn new(repository: Repository, alerter: Arc<dyn Alerter>, options: TimerOptions) -> Self {
        let stats = StudyStats {
            today_minutes: repository.get_today_study_time(),
            current_streak: repository.get_current_streak(),
            completed_sessions: 0,
        };
        let (state_tx, _) = watch::channel(None);
        let (stats_tx, _) = watch::channel(stats);
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            shared: Arc::new(Shared {
                repository,
                alerter,
                options,
                inner: Mutex::new(Inner {
                    generation: 0,
                    ticker: None,
                    completed_study: 0,
                    pending_next: None,
                }),
                state_tx,
                stats_tx,
                events_tx,
            }),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> Option<TimerState> {
        self.shared.state_tx.borrow().clone()
    }

    pub fn status(&self) -> TimerStatus {
        TimerStatus::of(self.shared.state_tx.borrow().as_ref())
    }

    /// Latest countdown snapshot; updated every tick.
    pub fn subscribe(&self) -> watch::Receiver<Option<TimerState>> {
        self.shared.state_tx.subscribe()
    }

    pub fn stats(&self) -> StudyStats {
        self.shared.stats_tx.borrow().clone()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<StudyStats> {
        self.shared.stats_tx.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.shared.events_tx.subscribe()
    }

    pub fn completed_study_sessions(&self) -> u32 {
        self.shared.lock().completed_study
    }

    pub fn repository(&self) -> &Repository {
        &self.shared.repository
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Pick up a countdown persisted by an earlier process.
    ///
    /// A running snapshot with time left resumes ticking from where it was
    /// last saved; time spent while the process was down is not deducted.
    /// A paused snapshot is restored as paused. Anything else is ignored.
    pub fn restore(&self) -> Option<TimerState> {
        let state = self.shared.repository.get_timer_state()?;
        if state.is_resumable() {
            info!(
                kind = state.session_type.label(),
                remaining = state.seconds_remaining,
                "resuming persisted countdown"
            );
            let event = self.shared.resumed_event(&state);
            self.shared.launch(state.clone(), event);
            Some(state)
        } else if state.seconds_remaining > 0 {
            info!(remaining = state.seconds_remaining, "restoring paused countdown");
            let _inner = self.shared.lock();
            self.shared.publish(Some(&state));
            Some(state)
        } else {
            None
        }
    }

    /// Start a fresh countdown of `kind` using the configured duration,
    /// replacing whatever was running.
    pub fn start_new_session(&self, kind: SessionType) -> Result<TimerState> {
        let state = self.shared.fresh_state(kind)?;
        info!(kind = kind.label(), "starting session");
        let event = self.shared.started_event(&state);
        self.shared.launch(state.clone(), event);
        Ok(state)
    }

    /// Pause when running, resume when paused, start studying when idle.
    ///
    /// During the pause between a completion and the next auto-start this
    /// starts the pending session right away. A countdown that has reached
    /// zero but not yet been recorded is left alone.
    ///
    /// # Errors
    /// Returns a validation error if the configured duration is zero, or if
    /// the paused countdown has no time left to resume.
    pub fn toggle(&self) -> Result<TimerState> {
        let shared = &self.shared;
        let mut inner = shared.lock();

        if let Some(next) = inner.pending_next {
            let state = shared.fresh_state(next)?;
            info!(kind = next.label(), "starting pending session early");
            shared.launch_locked(&mut inner, state.clone(), shared.started_event(&state));
            return Ok(state);
        }

        let current = shared.state_tx.borrow().clone();
        match current {
            None => {
                let state = shared.fresh_state(SessionType::Study)?;
                info!("starting study session");
                shared.launch_locked(&mut inner, state.clone(), shared.started_event(&state));
                Ok(state)
            }
            Some(state) if state.is_running && state.is_finished() => {
                debug!("countdown finished, completion pending");
                Ok(state)
            }
            Some(state) if state.is_running => Ok(shared.pause_locked(&mut inner, &state)),
            Some(state) if state.is_finished() => Err(ValidationError::InvalidValue {
                field: "secondsRemaining".into(),
                message: "paused countdown has no time left".into(),
            }
            .into()),
            Some(state) => {
                let resumed = state.resumed();
                info!(remaining = resumed.seconds_remaining, "resuming countdown");
                let event = shared.resumed_event(&resumed);
                shared.launch_locked(&mut inner, resumed.clone(), event);
                Ok(resumed)
            }
        }
    }

    /// Cancel everything and forget the persisted countdown. Nothing is
    /// recorded.
    pub fn reset(&self) {
        let mut inner = self.shared.lock();
        inner.cancel();
        inner.pending_next = None;
        self.shared.publish(None);
        self.shared.emit(Event::TimerReset {
            at: self.shared.repository.now(),
        });
        info!("timer reset");
    }

    /// Replace the user's settings. Takes effect at the next session start.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.shared.repository.save_settings(settings)
    }

    /// Stop the countdown task but keep the persisted snapshot, so the
    /// next process can resume it.
    pub fn shutdown(&self) {
        self.shared.lock().cancel();
        debug!("countdown task stopped for shutdown");
    }
}

impl Inner {
    /// Invalidate the running task, if any.
    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Persist and broadcast the countdown snapshot. Callers hold the lock.
    fn publish(&self, state: Option<&TimerState>) {
        if let Err(e) = self.repository.save_timer_state(state) {
            warn!(error = %e, "failed to persist timer state");
        }
        self.state_tx.send_replace(state.cloned());
    }

    fn emit(&self, event: Event) {
        // No subscribers is fine.
        let _ = self.events_tx.send(event);
    }

    fn started_event(&self, state: &TimerState) -> Event {
        Event::TimerStarted {
            session_type: state.session_type,
            total_seconds: state.total_seconds,
            at: self.repository.now(),
        }
    }

    fn resumed_event(&self, state: &TimerState) -> Event {
        Event::TimerResumed {
            session_type: state.session_type,
            seconds_remaining: state.seconds_remaining,
            at: self.repository.now(),
        }
    }

    /// A full-length running countdown of `kind` from the current settings.
    fn fresh_state(&self, kind: SessionType) -> Result<TimerState> {
        let minutes = self.repository.get_settings().duration_minutes(kind);
        if minutes == 0 {
            return Err(ValidationError::TooSmall {
                field: format!("{} duration", kind.label()),
                min: 1,
                value: 0,
            }
            .into());
        }
        Ok(TimerState::start(kind, minutes.saturating_mul(60)))
    }

    /// Replace any running task with a countdown seeded at `state`.
    fn launch(self: &Arc<Self>, state: TimerState, event: Event) {
        let mut inner = self.lock();
        self.launch_locked(&mut inner, state, event);
    }

    fn launch_locked(self: &Arc<Self>, inner: &mut Inner, state: TimerState, event: Event) {
        inner.cancel();
        inner.pending_next = None;
        let generation = inner.generation;

        self.publish(Some(&state));
        self.emit(event);

        let shared = Arc::clone(self);
        inner.ticker = Some(tokio::spawn(shared.run_countdown(generation, state)));
    }

    fn pause_locked(&self, inner: &mut Inner, state: &TimerState) -> TimerState {
        inner.cancel();
        inner.pending_next = None;
        let paused = state.paused();
        self.publish(Some(&paused));
        self.emit(Event::TimerPaused {
            session_type: paused.session_type,
            seconds_remaining: paused.seconds_remaining,
            at: self.repository.now(),
        });
        info!(remaining = paused.seconds_remaining, "countdown paused");
        paused
    }

    async fn run_countdown(self: Arc<Self>, generation: u64, mut state: TimerState) {
        loop {
            let period = self.options.tick_interval;
            let mut interval = time::interval_at(Instant::now() + period, period);

            while !state.is_finished() {
                interval.tick().await;
                state.tick();
                if !self.apply_tick(generation, &state) {
                    return;
                }
            }

            let Some(next) = self.complete(generation, &state) else {
                return;
            };
            time::sleep(self.options.auto_start_delay).await;
            match self.begin_next(generation, next) {
                Some(started) => state = started,
                None => return,
            }
        }
    }

    fn apply_tick(&self, generation: u64, state: &TimerState) -> bool {
        let inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        debug!(remaining = state.seconds_remaining, "tick");
        self.publish(Some(state));
        true
    }

    /// Record, refresh statistics, pick the next kind, then alert.
    ///
    /// The alert fires after the lock is released so an [`Alerter`] may
    /// call back into the controller.
    fn complete(&self, generation: u64, finished: &TimerState) -> Option<SessionType> {
        let mut inner = self.lock();
        if inner.generation != generation {
            return None;
        }

        let kind = finished.session_type;
        let settings = self.repository.get_settings();
        let now = self.repository.now();
        self.emit(Event::TimerCompleted {
            session_type: kind,
            at: now,
        });

        if kind == SessionType::Study {
            let session = Session::new(kind, finished.duration_minutes(), &now);
            let (session_id, duration_min) = (session.id, session.duration);
            match self.repository.add_session(session) {
                Ok(()) => self.emit(Event::SessionRecorded {
                    session_id,
                    duration_min,
                    at: now,
                }),
                Err(e) => warn!(error = %e, "failed to record session"),
            }
            inner.completed_study = inner.completed_study.saturating_add(1);
        }

        self.stats_tx.send_replace(StudyStats {
            today_minutes: self.repository.get_today_study_time(),
            current_streak: self.repository.get_current_streak(),
            completed_sessions: inner.completed_study,
        });

        let next = next_session_type(kind, inner.completed_study, settings.sessions_until_long_break);
        inner.pending_next = Some(next);
        info!(
            completed = kind.label(),
            next = next.label(),
            study_count = inner.completed_study,
            "session completed"
        );
        self.emit(Event::NextSessionScheduled {
            completed: kind,
            next,
            delay_ms: u64::try_from(self.options.auto_start_delay.as_millis())
                .unwrap_or(u64::MAX),
            at: now,
        });
        drop(inner);

        self.alerter
            .alert(CompletionAlert::for_settings(kind, &settings));
        Some(next)
    }

    fn begin_next(&self, generation: u64, kind: SessionType) -> Option<TimerState> {
        let mut inner = self.lock();
        if inner.generation != generation {
            return None;
        }
        inner.pending_next = None;

        let state = match self.fresh_state(kind) {
            Ok(state) => state,
            Err(e) => {
                warn!(kind = kind.label(), error = %e, "cannot auto-start, stopping");
                self.publish(None);
                return None;
            }
        };
        self.publish(Some(&state));
        self.emit(self.started_event(&state));
        info!(kind = kind.label(), seconds = state.total_seconds, "auto-started next session");
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::timer::LogAlerter;

    fn controller() -> TimerController {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        TimerController::new(repo, Arc::new(LogAlerter), TimerOptions::default())
    }

    #[tokio::test(start_paused = true)]
    async fn start_publishes_and_persists_full_duration() {
        let controller = controller();
        let state = controller.start_new_session(SessionType::Study).unwrap();
        assert_eq!(state.total_seconds, 25 * 60);
        assert_eq!(controller.status(), TimerStatus::Running);
        assert_eq!(controller.repository().get_timer_state(), Some(state));
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_from_idle_starts_study() {
        let controller = controller();
        let state = controller.toggle().unwrap();
        assert_eq!(state.session_type, SessionType::Study);
        assert!(state.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        crate::storage::KvStore::put(
            store.as_ref(),
            crate::storage::keys::SETTINGS,
            r#"{"shortBreakDuration": 0}"#,
        )
        .unwrap();
        let controller = TimerController::new(
            Repository::new(store),
            Arc::new(LogAlerter),
            TimerOptions::default(),
        );
        assert!(controller.start_new_session(SessionType::ShortBreak).is_err());
        assert_eq!(controller.status(), TimerStatus::Idle);
    }

    fn seed(controller: &TimerController, state: &TimerState) {
        let _inner = controller.shared.lock();
        controller.shared.publish(Some(state));
    }

    #[tokio::test(start_paused = true)]
    async fn paused_countdown_without_time_left_is_not_resumed() {
        let controller = controller();
        let finished = TimerState {
            total_seconds: 60,
            seconds_remaining: 0,
            is_running: false,
            session_type: SessionType::Study,
        };
        seed(&controller, &finished);

        assert!(controller.toggle().is_err());
        time::sleep(Duration::from_secs(10)).await;

        assert!(controller.repository().get_all_sessions().is_empty());
        assert_eq!(controller.completed_study_sessions(), 0);
        assert_eq!(controller.state(), Some(finished));
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_does_not_pause_a_countdown_awaiting_completion() {
        let controller = controller();
        let mut events = controller.events();
        let finished = TimerState {
            total_seconds: 60,
            seconds_remaining: 0,
            is_running: true,
            session_type: SessionType::Study,
        };
        seed(&controller, &finished);

        assert_eq!(controller.toggle().unwrap(), finished);
        assert_eq!(controller.status(), TimerStatus::Running);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn options_follow_config() {
        let config = TimerConfig {
            tick_interval_ms: 250,
            auto_start_delay_secs: 5,
        };
        let options = TimerOptions::from(&config);
        assert_eq!(options.tick_interval, Duration::from_millis(250));
        assert_eq!(options.auto_start_delay, Duration::from_secs(5));
    }
}
