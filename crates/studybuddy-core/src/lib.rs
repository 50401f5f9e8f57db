//! # StudyBuddy Core Library
//!
//! Core logic for the StudyBuddy study timer. Every operation is reachable
//! from the standalone `studybuddy` CLI; any other front end is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: an opaque key-value store ([`KvStore`]) with in-memory and
//!   SQLite backends, plus TOML application configuration
//! - **Repository**: typed access to sessions, settings, the persisted
//!   countdown and the study streak
//! - **Stats**: pure functions over the session log (today, week, goal, streak)
//! - **Timer**: an async countdown controller that records study sessions
//!   and rotates through short and long breaks
//!
//! ## Key Components
//!
//! - [`TimerController`]: countdown state machine
//! - [`Repository`]: persistence of sessions and settings
//! - [`Database`]: SQLite-backed [`KvStore`]
//! - [`AppConfig`]: application configuration

pub mod clock;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, StoreError, ValidationError};
pub use events::Event;
pub use session::{Session, SessionType, DEFAULT_SUBJECT};
pub use stats::{GoalProgress, WeeklySummary};
pub use storage::{AppConfig, Database, KvStore, MemoryStore, Repository, Settings};
pub use timer::{
    Alerter, CompletionAlert, LogAlerter, StudyStats, TimerController, TimerOptions, TimerState,
    TimerStatus,
};
