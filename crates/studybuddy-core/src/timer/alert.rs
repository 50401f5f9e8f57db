//! Completion alert seam.
//!
//! The controller fires exactly one alert per finished countdown. Platforms
//! decide how to render it (bell, vibration motor, notification).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::session::SessionType;
use crate::storage::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionAlert {
    pub completed: SessionType,
    pub sound: bool,
    pub vibration: bool,
}

impl CompletionAlert {
    pub fn for_settings(completed: SessionType, settings: &Settings) -> Self {
        Self {
            completed,
            sound: settings.sound_enabled,
            vibration: settings.vibration_enabled,
        }
    }

    pub fn is_silent(&self) -> bool {
        !self.sound && !self.vibration
    }
}

pub trait Alerter: Send + Sync {
    fn alert(&self, alert: CompletionAlert);
}

/// Writes the alert to the log and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlerter;

impl Alerter for LogAlerter {
    fn alert(&self, alert: CompletionAlert) {
        if alert.is_silent() {
            debug!(completed = alert.completed.label(), "countdown finished quietly");
            return;
        }
        info!(
            completed = alert.completed.label(),
            sound = alert.sound,
            vibration = alert.vibration,
            "countdown finished"
        );
    }
}
