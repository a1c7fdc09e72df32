//! Configuration types.
//!
//! Every tunable the workflow relies on lives here with an enumerated,
//! documented default — nothing is hard-coded at call sites.

use crate::error::ConfigError;
use crate::workflow::reminders::ReminderWindow;

/// Workflow configuration with enumerated defaults.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Maximum unread messages fetched per run.
    pub max_emails: u32,
    /// Forward span (hours) within which calendar events are fetched.
    pub lookahead_hours: i64,
    /// Lower bound of the pre-meeting reminder window, in minutes.
    pub reminder_window_min: i64,
    /// Upper bound of the pre-meeting reminder window, in minutes.
    pub reminder_window_max: i64,
    /// Prompt truncation applied by the gateway before submission, in chars.
    pub prompt_char_limit: usize,
    /// Truncation for the degraded email-summary fallback, in chars.
    pub email_fallback_chars: usize,
    /// Truncation for the degraded meeting-note fallback, in chars.
    pub notes_fallback_chars: usize,
    /// How many meetings the digest previews by title.
    pub digest_meeting_preview: usize,
    /// Chat channel used when a notification names none.
    pub default_channel: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_emails: 10,
            lookahead_hours: 24,
            reminder_window_min: 15,
            reminder_window_max: 30,
            prompt_char_limit: 2000,
            email_fallback_chars: 200,
            notes_fallback_chars: 500,
            digest_meeting_preview: 3,
            default_channel: "#general".to_string(),
        }
    }
}

impl WorkflowConfig {
    /// Build from `DAYBRIEF_*` environment variables, falling back to the
    /// documented defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_emails: env_parse("DAYBRIEF_MAX_EMAILS", defaults.max_emails),
            lookahead_hours: env_parse("DAYBRIEF_LOOKAHEAD_HOURS", defaults.lookahead_hours),
            reminder_window_min: env_parse(
                "DAYBRIEF_REMINDER_WINDOW_MIN",
                defaults.reminder_window_min,
            ),
            reminder_window_max: env_parse(
                "DAYBRIEF_REMINDER_WINDOW_MAX",
                defaults.reminder_window_max,
            ),
            prompt_char_limit: env_parse("DAYBRIEF_PROMPT_CHAR_LIMIT", defaults.prompt_char_limit),
            email_fallback_chars: defaults.email_fallback_chars,
            notes_fallback_chars: defaults.notes_fallback_chars,
            digest_meeting_preview: defaults.digest_meeting_preview,
            default_channel: std::env::var("DAYBRIEF_SLACK_CHANNEL")
                .unwrap_or(defaults.default_channel),
        }
    }

    /// Validate invariants the workflow depends on.
    ///
    /// Called during orchestrator initialization — violations are fatal.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.reminder_window_min > self.reminder_window_max {
            return Err(ConfigError::InvalidValue {
                key: "DAYBRIEF_REMINDER_WINDOW_MIN".to_string(),
                message: format!(
                    "window lower bound {} exceeds upper bound {}",
                    self.reminder_window_min, self.reminder_window_max
                ),
            });
        }
        if self.prompt_char_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DAYBRIEF_PROMPT_CHAR_LIMIT".to_string(),
                message: "prompt truncation limit must be positive".to_string(),
            });
        }
        if self.lookahead_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "DAYBRIEF_LOOKAHEAD_HOURS".to_string(),
                message: "lookahead must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// The reminder window as used by the evaluator.
    pub fn reminder_window(&self) -> ReminderWindow {
        ReminderWindow {
            min_minutes: self.reminder_window_min,
            max_minutes: self.reminder_window_max,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = WorkflowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_emails, 10);
        assert_eq!(config.lookahead_hours, 24);
        assert_eq!(config.reminder_window_min, 15);
        assert_eq!(config.reminder_window_max, 30);
        assert_eq!(config.prompt_char_limit, 2000);
        assert_eq!(config.default_channel, "#general");
    }

    #[test]
    fn inverted_reminder_window_rejected() {
        let config = WorkflowConfig {
            reminder_window_min: 45,
            reminder_window_max: 30,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_prompt_limit_rejected() {
        let config = WorkflowConfig {
            prompt_char_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_lookahead_rejected() {
        let config = WorkflowConfig {
            lookahead_hours: -1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn reminder_window_matches_bounds() {
        let config = WorkflowConfig::default();
        let window = config.reminder_window();
        assert_eq!(window.min_minutes, 15);
        assert_eq!(window.max_minutes, 30);
    }
}
