//! Countdown state, study/break rotation and the async controller.

mod alert;
mod controller;
mod cycle;
mod state;

pub use alert::{Alerter, CompletionAlert, LogAlerter};
pub use controller::{StudyStats, TimerController, TimerOptions};
pub use cycle::next_session_type;
pub use state::{TimerState, TimerStatus};
