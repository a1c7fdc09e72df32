//! Email agent — fetches unread mail and classifies it via the gateway.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use serde_json::Value;
use tracing::{info, warn};

use crate::agents::types::{AnalysisSource, EmailSummary, Priority};
use crate::agents::{Agent, extract_json_object};
use crate::gateway::{Gateway, truncate_chars};
use crate::providers::mail::{MailProvider, MessagePart};

const CLASSIFY_SYSTEM_PROMPT: &str = "\
You are an email analysis assistant. For each email, provide:\n\
1. A brief summary (2-3 sentences)\n\
2. Priority level (High/Medium/Low)\n\
3. Whether action is required (true/false)\n\
4. If it mentions meetings, extract meeting details\n\n\
Respond with ONLY a JSON object with keys: summary, priority, action_required, meeting_info";

/// Processes and summarizes unread email.
pub struct EmailAgent {
    gateway: Arc<Gateway>,
    mail: Arc<dyn MailProvider>,
    /// Truncation applied to the fallback summary, in chars.
    fallback_chars: usize,
}

impl Agent for EmailAgent {
    fn name(&self) -> &'static str {
        "email"
    }
}

impl EmailAgent {
    pub fn new(gateway: Arc<Gateway>, mail: Arc<dyn MailProvider>, fallback_chars: usize) -> Self {
        Self {
            gateway,
            mail,
            fallback_chars,
        }
    }

    /// Summarize up to `max_items` unread messages, provider order preserved.
    ///
    /// A failed listing yields an empty result; a failed item is skipped.
    pub async fn execute(&self, max_items: u32) -> Vec<EmailSummary> {
        let ids = match self.mail.list_unread(max_items).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(agent = self.name(), error = %e, "unread listing failed");
                return Vec::new();
            }
        };

        let mut summaries = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(summary) = self.process_message(id).await {
                summaries.push(summary);
            }
        }

        info!(
            agent = self.name(),
            fetched = ids.len(),
            summarized = summaries.len(),
            "email processing complete"
        );
        summaries
    }

    async fn process_message(&self, id: &str) -> Option<EmailSummary> {
        let message = match self.mail.fetch_message(id).await {
            Ok(message) => message,
            Err(e) => {
                warn!(message_id = id, error = %e, "skipping message, fetch failed");
                return None;
            }
        };

        let subject = message.header("Subject").to_string();
        let sender = message.header("From").to_string();
        let body = extract_plain_text(&message.payload);

        let prompt = format!("Subject: {subject}\nFrom: {sender}\nContent: {body}\n\nPlease provide a concise summary and analysis.");
        let response = self.gateway.complete(&prompt, CLASSIFY_SYSTEM_PROMPT).await;

        let summary = match parse_classification(&response) {
            Some(classification) => EmailSummary {
                sender,
                subject,
                summary: classification.summary,
                priority: classification.priority,
                action_required: classification.action_required,
                meeting_info: classification.meeting_info,
                source: AnalysisSource::Structured,
            },
            None => {
                warn!(message_id = id, "classification unparseable, using fallback");
                let raw = if response.is_empty() { &body } else { &response };
                EmailSummary {
                    sender,
                    subject,
                    summary: truncate_chars(raw, self.fallback_chars),
                    priority: Priority::Medium,
                    action_required: true,
                    meeting_info: None,
                    source: AnalysisSource::Fallback,
                }
            }
        };
        Some(summary)
    }
}

/// Parsed gateway classification.
struct Classification {
    summary: String,
    priority: Priority,
    action_required: bool,
    meeting_info: Option<Value>,
}

/// Parse the gateway's classification JSON, tolerating loose field types.
fn parse_classification(raw: &str) -> Option<Classification> {
    let object = extract_json_object(raw)?;
    let value: Value = serde_json::from_str(object).ok()?;
    let fields = value.as_object()?;

    Some(Classification {
        summary: fields
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        priority: fields
            .get("priority")
            .and_then(Value::as_str)
            .and_then(Priority::parse)
            .unwrap_or(Priority::Low),
        action_required: fields.get("action_required").is_some_and(truthy),
        meeting_info: fields
            .get("meeting_info")
            .filter(|v| !v.is_null())
            .cloned(),
    })
}

/// Models answer booleans as true/false or "Yes"/"No" interchangeably.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "yes" | "true" | "y" | "1"
        ),
        _ => false,
    }
}

/// Extract the first `text/plain` part from the (possibly nested) MIME
/// tree and decode its base64url payload.
fn extract_plain_text(payload: &MessagePart) -> String {
    fn find_plain(part: &MessagePart) -> Option<&str> {
        if part.mime_type.eq_ignore_ascii_case("text/plain") {
            if let Some(data) = part.body.data.as_deref() {
                return Some(data);
            }
        }
        part.parts.iter().find_map(find_plain)
    }

    find_plain(payload).map(decode_base64url).unwrap_or_default()
}

fn decode_base64url(data: &str) -> String {
    let bytes = URL_SAFE
        .decode(data)
        .or_else(|_| URL_SAFE_NO_PAD.decode(data))
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}
