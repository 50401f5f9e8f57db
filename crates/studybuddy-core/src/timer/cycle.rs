//! Study / break rotation.

use crate::session::SessionType;

/// Kind that follows a completed `kind`.
///
/// `completed_study` is the number of study sessions finished so far in this
/// process, including the one that just ended. Every `sessions_until_long_break`-th
/// study earns a long break; a zero interval never does.
pub fn next_session_type(
    kind: SessionType,
    completed_study: u32,
    sessions_until_long_break: u32,
) -> SessionType {
    match kind {
        SessionType::Study => {
            let long = completed_study > 0
                && completed_study
                    .checked_rem(sessions_until_long_break)
                    .is_some_and(|r| r == 0);
            if long {
                SessionType::LongBreak
            } else {
                SessionType::ShortBreak
            }
        }
        SessionType::ShortBreak | SessionType::LongBreak => SessionType::Study,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_return_to_study() {
        assert_eq!(next_session_type(SessionType::ShortBreak, 3, 4), SessionType::Study);
        assert_eq!(next_session_type(SessionType::LongBreak, 4, 4), SessionType::Study);
    }

    #[test]
    fn every_fourth_study_earns_long_break() {
        let kinds: Vec<_> = (1..=8)
            .map(|n| next_session_type(SessionType::Study, n, 4))
            .collect();
        assert_eq!(
            kinds,
            [
                SessionType::ShortBreak,
                SessionType::ShortBreak,
                SessionType::ShortBreak,
                SessionType::LongBreak,
                SessionType::ShortBreak,
                SessionType::ShortBreak,
                SessionType::ShortBreak,
                SessionType::LongBreak,
            ]
        );
    }

    #[test]
    fn zero_count_and_zero_interval_stay_short() {
        assert_eq!(next_session_type(SessionType::Study, 0, 4), SessionType::ShortBreak);
        assert_eq!(next_session_type(SessionType::Study, 4, 0), SessionType::ShortBreak);
    }
}
