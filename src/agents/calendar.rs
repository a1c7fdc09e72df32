//! Calendar agent — surfaces upcoming meetings and annotates them.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use tracing::{info, warn};

use crate::agents::Agent;
use crate::agents::types::MeetingRecord;
use crate::gateway::Gateway;
use crate::providers::calendar::{CalendarProvider, ConferenceData, EventResource, EventTime};

const ANALYZE_SYSTEM_PROMPT: &str = "\
Analyze meeting importance and respond with ONLY a JSON object with:\n\
- importance: High/Medium/Low\n\
- reminder_minutes: suggested reminder lead times, e.g. [15, 60, 1440]\n\
- preparation_needed: boolean\n\
- meeting_type: one-on-one/team/presentation/other";

/// Surfaces upcoming meetings within the lookahead window.
pub struct CalendarAgent {
    gateway: Arc<Gateway>,
    calendar: Arc<dyn CalendarProvider>,
}

impl Agent for CalendarAgent {
    fn name(&self) -> &'static str {
        "calendar"
    }
}

impl CalendarAgent {
    pub fn new(gateway: Arc<Gateway>, calendar: Arc<dyn CalendarProvider>) -> Self {
        Self { gateway, calendar }
    }

    /// Meetings starting between now and `now + hours_ahead`, ascending by
    /// start time (provider order preserved).
    pub async fn execute(&self, hours_ahead: i64) -> Vec<MeetingRecord> {
        let now = Utc::now();
        let events = match self
            .calendar
            .list_events(now, now + Duration::hours(hours_ahead))
            .await
        {
            Ok(events) => events,
            Err(e) => {
                warn!(agent = self.name(), error = %e, "event listing failed");
                return Vec::new();
            }
        };

        let fetched = events.len();
        let mut meetings = Vec::with_capacity(fetched);
        for event in events {
            if let Some(meeting) = self.analyze_event(event).await {
                meetings.push(meeting);
            }
        }

        info!(
            agent = self.name(),
            fetched,
            surfaced = meetings.len(),
            "calendar processing complete"
        );
        meetings
    }

    async fn analyze_event(&self, event: EventResource) -> Option<MeetingRecord> {
        let Some(start_time) = parse_event_start(&event.start) else {
            warn!(event_id = %event.id, "skipping event with unparseable start time");
            return None;
        };

        let title = if event.summary.is_empty() {
            "No title".to_string()
        } else {
            event.summary.clone()
        };

        let prompt = format!(
            "Meeting: {title}\nDescription: {}\nAttendees: {} people\n\n\
             Analyze this meeting's importance and suggest reminder timing.",
            event.description,
            event.attendees.len()
        );
        // Stored opaquely — the orchestrator never re-parses this.
        let analysis = self.gateway.complete(&prompt, ANALYZE_SYSTEM_PROMPT).await;

        Some(MeetingRecord {
            id: event.id,
            title,
            start_time,
            attendees: event.attendees.into_iter().map(|a| a.email).collect(),
            description: event.description,
            analysis,
            meet_link: extract_meet_link(event.conference_data.as_ref()),
        })
    }
}

/// Parse an event start, preserving the source offset.
///
/// All-day events (date only) resolve to midnight UTC.
fn parse_event_start(start: &EventTime) -> Option<DateTime<FixedOffset>> {
    if let Some(date_time) = &start.date_time {
        return DateTime::parse_from_rfc3339(date_time).ok();
    }
    let date = NaiveDate::parse_from_str(start.date.as_deref()?, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset())
}

/// First "video" entry point, if the event carries conference data.
fn extract_meet_link(conference: Option<&ConferenceData>) -> Option<String> {
    conference?
        .entry_points
        .iter()
        .find(|entry| entry.entry_point_type == "video")
        .map(|entry| entry.uri.clone())
}
