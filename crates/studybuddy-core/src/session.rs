//! Logged study and break sessions.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Subject attached to sessions recorded by the timer.
pub const DEFAULT_SUBJECT: &str = "General Study";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    Study,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Study => "Study",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionType::Study)
    }
}

impl Default for SessionType {
    fn default() -> Self {
        SessionType::Study
    }
}

/// One logged interval of study or break activity.
///
/// Sessions are only ever prepended to the log; the single mutation path is
/// attaching a note photo after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Creation time in epoch milliseconds, doubling as the identifier.
    pub id: i64,
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Duration in minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(rename = "type", default)]
    pub kind: SessionType,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub note_photo_path: Option<String>,
    #[serde(default = "default_true")]
    pub completed: bool,
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.into()
}

fn default_true() -> bool {
    true
}

impl Session {
    /// A completed session created at `at`.
    pub fn new<Tz: TimeZone>(kind: SessionType, duration: u32, at: &DateTime<Tz>) -> Self {
        let millis = at.timestamp_millis();
        Self {
            id: millis,
            subject: default_subject(),
            duration,
            kind,
            timestamp: millis,
            note_photo_path: None,
            completed: true,
        }
    }

    pub fn is_study(&self) -> bool {
        self.kind == SessionType::Study
    }

    /// Creation time in the given offset.
    pub fn started_at(&self, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp).map(|t| t.with_timezone(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&SessionType::ShortBreak).unwrap();
        assert_eq!(json, "\"SHORT_BREAK\"");
        let parsed: SessionType = serde_json::from_str("\"LONG_BREAK\"").unwrap();
        assert_eq!(parsed, SessionType::LongBreak);
    }

    #[test]
    fn session_uses_camel_case_and_type_key() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let session = Session::new(SessionType::Study, 25, &at);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["type"], "STUDY");
        assert_eq!(json["notePhotoPath"], serde_json::Value::Null);
        assert_eq!(json["id"], 1_700_000_000_000i64);
        assert_eq!(json["subject"], DEFAULT_SUBJECT);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let session: Session =
            serde_json::from_str(r#"{"id": 5, "duration": 25, "type": "STUDY"}"#).unwrap();
        assert_eq!(session.subject, DEFAULT_SUBJECT);
        assert!(session.completed);
        assert!(session.note_photo_path.is_none());
    }

    #[test]
    fn labels_and_break_flag() {
        assert_eq!(SessionType::LongBreak.label(), "Long Break");
        assert!(SessionType::ShortBreak.is_break());
        assert!(!SessionType::Study.is_break());
    }
}
