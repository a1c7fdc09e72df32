//! Reminder-window evaluation.
//!
//! Pure functions over (meetings, now, window) so the temporal logic is
//! testable with a pinned clock. Evaluated once per orchestrator run —
//! periodic invocation comes from the external schedule, and there is no
//! "already reminded" store: re-running inside the same window re-emits.

use chrono::{DateTime, Duration, Utc};

use crate::agents::types::MeetingRecord;

/// Inclusive pre-meeting interval in which a reminder is eligible.
#[derive(Debug, Clone, Copy)]
pub struct ReminderWindow {
    pub min_minutes: i64,
    pub max_minutes: i64,
}

/// One reminder due for delivery.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub meeting_id: String,
    pub message: String,
}

/// Reminders due at `now` for the given meetings.
///
/// A meeting qualifies when `window.min <= start - now <= window.max`.
/// Offsets are respected: the subtraction is over absolute instants, so a
/// meeting stored in another zone still triggers at the right moment.
pub fn due_reminders(
    meetings: &[MeetingRecord],
    now: DateTime<Utc>,
    window: ReminderWindow,
) -> Vec<Reminder> {
    let min = Duration::minutes(window.min_minutes);
    let max = Duration::minutes(window.max_minutes);

    meetings
        .iter()
        .filter_map(|meeting| {
            let delta = meeting.start_time.signed_duration_since(now);
            (delta >= min && delta <= max).then(|| Reminder {
                meeting_id: meeting.id.clone(),
                message: format_reminder(meeting, delta.num_minutes()),
            })
        })
        .collect()
}

/// Reminder text: title, whole minutes remaining, join link when present.
fn format_reminder(meeting: &MeetingRecord, minutes: i64) -> String {
    let mut message = format!(
        "🔔 Reminder: '{}' starts in {} minutes",
        meeting.title, minutes
    );
    if let Some(link) = &meeting.meet_link {
        message.push_str(&format!("\nJoin: {link}"));
    }
    message
}
