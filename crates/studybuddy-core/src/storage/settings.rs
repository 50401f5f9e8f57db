//! User-facing timer preferences.
//!
//! Stored as one JSON object under the `settings` key and always replaced as
//! a whole. Durations are minutes.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::session::SessionType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_study_duration")]
    pub study_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break_duration: u32,
    #[serde(default = "default_long_break")]
    pub long_break_duration: u32,
    #[serde(default = "default_sessions_until_long_break")]
    pub sessions_until_long_break: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub vibration_enabled: bool,
    #[serde(default = "default_daily_goal_hours")]
    pub daily_goal_hours: u32,
}

fn default_study_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_sessions_until_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_daily_goal_hours() -> u32 {
    4
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            study_duration: default_study_duration(),
            short_break_duration: default_short_break(),
            long_break_duration: default_long_break(),
            sessions_until_long_break: default_sessions_until_long_break(),
            sound_enabled: true,
            vibration_enabled: true,
            daily_goal_hours: default_daily_goal_hours(),
        }
    }
}

impl Settings {
    /// Configured length of a session of `kind`, in minutes.
    pub fn duration_minutes(&self, kind: SessionType) -> u32 {
        match kind {
            SessionType::Study => self.study_duration,
            SessionType::ShortBreak => self.short_break_duration,
            SessionType::LongBreak => self.long_break_duration,
        }
    }

    /// Every count and duration must be at least 1.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("studyDuration", self.study_duration),
            ("shortBreakDuration", self.short_break_duration),
            ("longBreakDuration", self.long_break_duration),
            ("sessionsUntilLongBreak", self.sessions_until_long_break),
            ("dailyGoalHours", self.daily_goal_hours),
        ];
        for (field, value) in fields {
            if value < 1 {
                return Err(ValidationError::TooSmall {
                    field: field.into(),
                    min: 1,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Get a value as string by its serialized key (e.g. `studyDuration`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Return a copy with `key` set to `value`, parsed according to the
    /// existing field's type. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the updated settings fail validation.
    pub fn with_value(&self, key: &str, value: &str) -> Result<Self, ConfigError> {
        let mut json = serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;

        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.into(),
            message,
        };
        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u32>()
                    .map_err(|e| invalid(format!("cannot parse '{value}' as number: {e}")))?
                    .into(),
            ),
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(key.to_string(), new_value);

        let updated: Settings =
            serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate().map_err(|e| invalid(e.to_string()))?;
        Ok(updated)
    }
}
