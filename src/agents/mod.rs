//! Capability agents and their registry.
//!
//! Each agent wraps one external capability, optionally asks the gateway
//! to structure what it fetched, and returns typed records. The shared
//! resilience contract: a bad item is logged and skipped, a failed fetch
//! yields an empty result, and unparseable gateway output degrades to the
//! documented fallback record — never an error past the agent boundary.

pub mod calendar;
pub mod email;
pub mod notes;
pub mod notification;
pub mod types;

pub use calendar::CalendarAgent;
pub use email::EmailAgent;
pub use notes::NotesAgent;
pub use notification::NotificationAgent;
pub use types::{AnalysisSource, EmailSummary, MeetingNote, MeetingRecord, Priority};

/// Shared behavior across the capability set.
pub trait Agent {
    /// Capability name used in logs and the registry.
    fn name(&self) -> &'static str;
}

/// The four capabilities the workflow coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Email,
    Calendar,
    Notes,
    Notification,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::Email,
        Capability::Calendar,
        Capability::Notes,
        Capability::Notification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Calendar => "calendar",
            Self::Notes => "notes",
            Self::Notification => "notification",
        }
    }
}

/// Registry of agent instances, one per capability.
///
/// Built once during initialization and read-only afterward.
pub struct AgentRegistry {
    email: EmailAgent,
    calendar: CalendarAgent,
    notes: NotesAgent,
    notification: NotificationAgent,
}

impl AgentRegistry {
    pub fn new(
        email: EmailAgent,
        calendar: CalendarAgent,
        notes: NotesAgent,
        notification: NotificationAgent,
    ) -> Self {
        Self {
            email,
            calendar,
            notes,
            notification,
        }
    }

    pub fn email(&self) -> &EmailAgent {
        &self.email
    }

    pub fn calendar(&self) -> &CalendarAgent {
        &self.calendar
    }

    pub fn notes(&self) -> &NotesAgent {
        &self.notes
    }

    pub fn notification(&self) -> &NotificationAgent {
        &self.notification
    }

    /// Registered name for a capability.
    pub fn agent_name(&self, capability: Capability) -> &'static str {
        match capability {
            Capability::Email => self.email.name(),
            Capability::Calendar => self.calendar.name(),
            Capability::Notes => self.notes.name(),
            Capability::Notification => self.notification.name(),
        }
    }
}

/// Pull a JSON object out of gateway output.
///
/// Models wrap JSON in markdown fences or surrounding prose often enough
/// that every structured-parse path goes through this first.
pub(crate) fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    // Fenced code block, with or without a language tag.
    for fence in ["```json", "```"] {
        if let Some(start) = trimmed.find(fence) {
            let inner = &trimmed[start + fence.len()..];
            if let Some(end) = inner.find("```") {
                let candidate = inner[..end].trim();
                if candidate.starts_with('{') {
                    return Some(candidate);
                }
            }
        }
    }

    // Last resort: widest brace span.
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_names_are_stable() {
        let names: Vec<&str> = Capability::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, ["email", "calendar", "notes", "notification"]);
    }

    #[test]
    fn extract_bare_object() {
        let raw = r#"{"summary": "hi"}"#;
        assert_eq!(extract_json_object(raw), Some(raw));
    }

    #[test]
    fn extract_from_fenced_block() {
        let raw = "Here you go:\n```json\n{\"priority\": \"High\"}\n```";
        assert_eq!(extract_json_object(raw), Some(r#"{"priority": "High"}"#));
    }

    #[test]
    fn extract_from_untagged_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(raw), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn extract_from_surrounding_prose() {
        let raw = "My assessment: {\"priority\": \"Low\"} hope that helps.";
        assert_eq!(extract_json_object(raw), Some(r#"{"priority": "Low"}"#));
    }

    #[test]
    fn extract_rejects_braceless_text() {
        assert_eq!(extract_json_object("no structure here"), None);
        assert_eq!(extract_json_object(""), None);
    }
}
