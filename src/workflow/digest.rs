//! Daily digest construction.

use crate::agents::types::{EmailSummary, MeetingRecord, Priority};

/// Assemble the daily summary message.
///
/// Always produces a full digest — all three count lines are present even
/// when both inputs are empty — plus the titles and start times of up to
/// the first `meeting_preview` meetings in order.
pub fn build_digest(
    emails: &[EmailSummary],
    meetings: &[MeetingRecord],
    meeting_preview: usize,
) -> String {
    let high_priority = emails
        .iter()
        .filter(|e| e.priority == Priority::High)
        .count();

    let mut lines = vec![
        "📋 Daily Summary".to_string(),
        format!("📧 Emails processed: {}", emails.len()),
        format!("⚠️ High priority emails: {high_priority}"),
        format!("📅 Upcoming meetings: {}", meetings.len()),
    ];

    for meeting in meetings.iter().take(meeting_preview) {
        lines.push(format!(
            "• {} - {}",
            meeting.title,
            meeting.start_time.to_rfc3339()
        ));
    }

    lines.join("\n")
}
