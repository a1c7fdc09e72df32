//! Calendar collaborator — time-ranged event listing.
//!
//! Wire types follow the Google Calendar REST shape. Recurring events are
//! requested expanded (`singleEvents=true`) and ordered by start time, so
//! the agent never re-sorts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::providers::error_for_status;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Read access to the primary calendar.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Expanded single events starting in `[from, to]`, ordered by start
    /// time ascending.
    async fn list_events(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EventResource>, ProviderError>;
}

// ── Wire types ──────────────────────────────────────────────────────

/// One calendar event as returned by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventResource {
    pub id: String,
    /// Event title.
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub attendees: Vec<EventAttendee>,
    pub conference_data: Option<ConferenceData>,
}

/// Event start: timed events carry `date_time` (RFC 3339, source zone),
/// all-day events carry `date` only.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventAttendee {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConferenceData {
    pub entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryPoint {
    pub entry_point_type: String,
    pub uri: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EventListResponse {
    items: Vec<EventResource>,
}

// ── REST client ─────────────────────────────────────────────────────

/// Google Calendar REST client.
pub struct CalendarClient {
    client: Client,
    token: SecretString,
    base_url: String,
}

impl CalendarClient {
    pub fn new(token: SecretString) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl CalendarProvider for CalendarClient {
    async fn list_events(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EventResource>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/calendars/primary/events", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .query(&[
                ("timeMin", from.to_rfc3339().as_str()),
                ("timeMax", to.to_rfc3339().as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await?;
        let response = error_for_status(response).await?;

        let list: EventListResponse = response.json().await?;
        Ok(list.items)
    }
}
