//! Notes agent — turns a meeting transcript into structured notes and
//! persists them as a document.
//!
//! Note production and note persistence are deliberately decoupled: a note
//! that fails to save is still returned to the caller, with the failure
//! visible only in logs.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use crate::agents::types::{AnalysisSource, MeetingNote, MeetingRecord};
use crate::agents::{Agent, extract_json_object};
use crate::error::ProviderError;
use crate::gateway::{Gateway, truncate_chars};
use crate::providers::docs::DocumentStore;

const NOTES_SYSTEM_PROMPT: &str = "\
Create structured meeting notes. Respond with ONLY a JSON object with:\n\
- summary: Brief overview of the meeting\n\
- key_decisions: List of decisions made\n\
- action_items: List of action items with owners if mentioned\n\
- important_topics: Main topics discussed\n\
- next_steps: What happens next";

/// Produces and persists structured meeting notes.
pub struct NotesAgent {
    gateway: Arc<Gateway>,
    docs: Arc<dyn DocumentStore>,
    /// Truncation applied to the fallback summary, in chars.
    fallback_chars: usize,
}

impl Agent for NotesAgent {
    fn name(&self) -> &'static str {
        "notes"
    }
}

impl NotesAgent {
    pub fn new(gateway: Arc<Gateway>, docs: Arc<dyn DocumentStore>, fallback_chars: usize) -> Self {
        Self {
            gateway,
            docs,
            fallback_chars,
        }
    }

    /// Analyze a transcript into a `MeetingNote` and persist it.
    ///
    /// Returns `None` only when no analysis is available at all (empty
    /// gateway response). Persistence failure does not invalidate the
    /// returned note.
    pub async fn execute(
        &self,
        transcript: &str,
        meeting: &MeetingRecord,
    ) -> Option<MeetingNote> {
        let prompt = format!(
            "Meeting: {}\nTranscript: {transcript}\n\n\
             Please analyze this meeting and provide structured notes.",
            meeting.title
        );
        let response = self.gateway.complete(&prompt, NOTES_SYSTEM_PROMPT).await;
        if response.is_empty() {
            warn!(
                agent = self.name(),
                meeting_id = %meeting.id,
                "no analysis available, skipping note"
            );
            return None;
        }

        let (data, source) = match parse_notes_response(&response) {
            Some(data) => (data, AnalysisSource::Structured),
            None => {
                warn!(
                    agent = self.name(),
                    meeting_id = %meeting.id,
                    "notes response unparseable, using fallback"
                );
                (
                    NotesData {
                        summary: truncate_chars(&response, self.fallback_chars),
                        ..Default::default()
                    },
                    AnalysisSource::Fallback,
                )
            }
        };

        let note = MeetingNote {
            meeting_id: meeting.id.clone(),
            title: meeting.title.clone(),
            date: Utc::now(),
            participants: meeting.attendees.clone(),
            summary: data.summary,
            action_items: data.action_items,
            key_decisions: data.key_decisions,
            important_topics: data.important_topics,
            next_steps: data.next_steps,
            source,
        };

        if let Err(e) = self.save_document(&note).await {
            warn!(
                agent = self.name(),
                meeting_id = %note.meeting_id,
                error = %e,
                "note produced but not persisted"
            );
        }

        Some(note)
    }

    async fn save_document(&self, note: &MeetingNote) -> Result<(), ProviderError> {
        let title = format!(
            "Meeting Notes - {} - {}",
            note.title,
            note.date.format("%Y-%m-%d")
        );
        let document_id = self.docs.create_document(&title).await?;
        self.docs
            .append_text(&document_id, &render_document(note))
            .await?;
        info!(document_id = %document_id, "meeting notes saved");
        Ok(())
    }
}

/// Structured fields of a notes analysis.
#[derive(Debug, Default)]
struct NotesData {
    summary: String,
    key_decisions: Vec<String>,
    action_items: Vec<String>,
    important_topics: Vec<String>,
    next_steps: Vec<String>,
}

/// Parse the gateway's notes JSON, tolerating non-string list entries.
fn parse_notes_response(raw: &str) -> Option<NotesData> {
    let object = extract_json_object(raw)?;
    let value: Value = serde_json::from_str(object).ok()?;
    let fields = value.as_object()?;

    Some(NotesData {
        summary: fields
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        key_decisions: string_list(fields.get("key_decisions")),
        action_items: string_list(fields.get("action_items")),
        important_topics: string_list(fields.get("important_topics")),
        next_steps: string_list(fields.get("next_steps")),
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Render a note into the persisted document layout.
fn render_document(note: &MeetingNote) -> String {
    fn bullets(items: &[String]) -> String {
        items
            .iter()
            .map(|item| format!("• {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    format!(
        "MEETING NOTES\n\n\
         Meeting: {}\n\
         Date: {}\n\
         Participants: {}\n\n\
         SUMMARY\n{}\n\n\
         KEY DECISIONS\n{}\n\n\
         ACTION ITEMS\n{}\n\n\
         IMPORTANT TOPICS\n{}\n\n\
         NEXT STEPS\n{}\n",
        note.title,
        note.date.format("%Y-%m-%d %H:%M"),
        note.participants.join(", "),
        note.summary,
        bullets(&note.key_decisions),
        bullets(&note.action_items),
        bullets(&note.important_topics),
        bullets(&note.next_steps),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::DateTime;

    use crate::error::GatewayError;
    use crate::gateway::{CompletionRequest, CompletionResponse, LlmProvider};

    struct FixedLlm {
        response: String,
    }

    #[async_trait]
    impl LlmProvider for FixedLlm {
        fn model_name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, GatewayError> {
            Ok(CompletionResponse {
                content: self.response.clone(),
                input_tokens: 1,
                output_tokens: 1,
            })
        }
    }

    /// Records create/append calls; optionally fails creation.
    struct RecordingDocs {
        creates: Mutex<Vec<String>>,
        appends: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingDocs {
        fn new(fail: bool) -> Self {
            Self {
                creates: Mutex::new(Vec::new()),
                appends: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl DocumentStore for RecordingDocs {
        async fn create_document(&self, title: &str) -> Result<String, ProviderError> {
            if self.fail {
                return Err(ProviderError::Api {
                    status: 503,
                    message: "backend unavailable".to_string(),
                });
            }
            self.creates.lock().unwrap().push(title.to_string());
            Ok("doc-1".to_string())
        }

        async fn append_text(
            &self,
            document_id: &str,
            content: &str,
        ) -> Result<(), ProviderError> {
            self.appends
                .lock()
                .unwrap()
                .push((document_id.to_string(), content.to_string()));
            Ok(())
        }
    }

    fn meeting() -> MeetingRecord {
        MeetingRecord {
            id: "evt-42".to_string(),
            title: "Project Review".to_string(),
            start_time: DateTime::parse_from_rfc3339("2026-03-02T14:00:00+01:00").unwrap(),
            attendees: vec!["john@company.com".to_string(), "sarah@company.com".to_string()],
            description: String::new(),
            analysis: String::new(),
            meet_link: None,
        }
    }

    fn agent(response: &str, docs: Arc<RecordingDocs>) -> NotesAgent {
        let llm = Arc::new(FixedLlm {
            response: response.to_string(),
        });
        NotesAgent::new(Arc::new(Gateway::new(llm, 2000)), docs, 500)
    }

    const STRUCTURED: &str = r#"{
        "summary": "Reviewed the MVP timeline",
        "key_decisions": ["Ship MVP next Friday"],
        "action_items": ["Mike handles backend integration", "Set follow-up for Thursday"],
        "important_topics": ["timeline"],
        "next_steps": ["Follow-up meeting Thursday"]
    }"#;

    #[tokio::test]
    async fn structured_response_creates_and_appends_document() {
        let docs = Arc::new(RecordingDocs::new(false));
        let note = agent(STRUCTURED, docs.clone())
            .execute("John: timeline. Sarah: MVP Friday.", &meeting())
            .await
            .unwrap();

        assert_eq!(note.action_items.len(), 2);
        assert_eq!(note.key_decisions, vec!["Ship MVP next Friday"]);
        assert_eq!(note.source, AnalysisSource::Structured);
        assert_eq!(note.participants.len(), 2);

        let creates = docs.creates.lock().unwrap();
        assert_eq!(creates.len(), 1);
        assert!(creates[0].starts_with("Meeting Notes - Project Review - "));

        let appends = docs.appends.lock().unwrap();
        assert_eq!(appends.len(), 1);
        assert_eq!(appends[0].0, "doc-1");
        assert!(appends[0].1.contains("MEETING NOTES"));
        assert!(appends[0].1.contains("• Mike handles backend integration"));
    }

    #[tokio::test]
    async fn malformed_response_degrades_to_fallback() {
        let docs = Arc::new(RecordingDocs::new(false));
        let note = agent("The meeting went fine, nothing structured here.", docs)
            .execute("transcript", &meeting())
            .await
            .unwrap();

        assert_eq!(note.source, AnalysisSource::Fallback);
        assert!(note.summary.starts_with("The meeting went fine"));
        assert!(note.action_items.is_empty());
        assert!(note.key_decisions.is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_still_returns_note() {
        let docs = Arc::new(RecordingDocs::new(true));
        let note = agent(STRUCTURED, docs.clone())
            .execute("transcript", &meeting())
            .await;

        let note = note.expect("note survives persistence failure");
        assert_eq!(note.source, AnalysisSource::Structured);
        assert!(docs.appends.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_gateway_response_yields_no_note() {
        let docs = Arc::new(RecordingDocs::new(false));
        assert!(agent("", docs).execute("transcript", &meeting()).await.is_none());
    }

    #[test]
    fn string_list_tolerates_object_entries() {
        let value: Value = serde_json::from_str(
            r#"["plain item", {"owner": "Mike", "task": "backend"}]"#,
        )
        .unwrap();
        let list = string_list(Some(&value));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], "plain item");
        assert!(list[1].contains("Mike"));
    }

    #[test]
    fn render_document_includes_all_sections() {
        let note = MeetingNote {
            meeting_id: "m".into(),
            title: "Sync".into(),
            date: Utc::now(),
            participants: vec!["a@x.com".into()],
            summary: "Short sync".into(),
            action_items: vec!["Do the thing".into()],
            key_decisions: vec![],
            important_topics: vec!["roadmap".into()],
            next_steps: vec![],
            source: AnalysisSource::Structured,
        };
        let rendered = render_document(&note);
        for section in ["SUMMARY", "KEY DECISIONS", "ACTION ITEMS", "IMPORTANT TOPICS", "NEXT STEPS"] {
            assert!(rendered.contains(section), "missing {section}");
        }
        assert!(rendered.contains("• Do the thing"));
    }
}
