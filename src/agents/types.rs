//! Typed records produced by the capability agents.
//!
//! Every record is either fully populated with best-effort values or not
//! produced at all — agents return "no result" rather than half-filled
//! structs, and each gateway-derived record is tagged with whether it came
//! from structured output or the heuristic fallback.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Email priority classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Case-insensitive parse of a classification label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(label)
    }
}

/// Where a record's analysis came from.
///
/// `Fallback` marks records built heuristically after the gateway's output
/// failed structured parsing — callers and tests can tell the two apart
/// instead of guessing from field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisSource {
    Structured,
    Fallback,
}

/// Summary of one unread email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSummary {
    pub sender: String,
    pub subject: String,
    pub summary: String,
    pub priority: Priority,
    pub action_required: bool,
    /// Structured meeting details when the email mentions one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_info: Option<serde_json::Value>,
    pub source: AnalysisSource,
}

/// One upcoming calendar event within the lookahead window.
///
/// Recreated every run; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: String,
    pub title: String,
    /// Start in the event's own zone, preserved from the source.
    pub start_time: DateTime<FixedOffset>,
    /// Attendee addresses in provider order.
    pub attendees: Vec<String>,
    pub description: String,
    /// Free-form gateway assessment; stored opaquely, never re-parsed.
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meet_link: Option<String>,
}

/// Structured notes for one processed meeting transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingNote {
    pub meeting_id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub participants: Vec<String>,
    pub summary: String,
    pub action_items: Vec<String>,
    pub key_decisions: Vec<String>,
    pub important_topics: Vec<String>,
    pub next_steps: Vec<String>,
    pub source: AnalysisSource,
}
