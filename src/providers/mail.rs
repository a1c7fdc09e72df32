//! Mail collaborator — unread-message listing and per-message fetch.
//!
//! The wire types follow the Gmail REST shape: a message carries headers
//! plus a nested MIME part tree whose leaf bodies are base64url-encoded.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::providers::error_for_status;

const DEFAULT_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// Read access to a mailbox.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Identifiers of unread messages, provider order, bounded count.
    async fn list_unread(&self, max_results: u32) -> Result<Vec<String>, ProviderError>;

    /// Fetch one message with headers and full body structure.
    async fn fetch_message(&self, id: &str) -> Result<MailMessage, ProviderError>;
}

// ── Wire types ──────────────────────────────────────────────────────

/// A fetched mail message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MailMessage {
    pub id: String,
    pub payload: MessagePart,
}

impl MailMessage {
    /// First header matching `name` (case-insensitive), or empty.
    pub fn header(&self, name: &str) -> &str {
        self.payload
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
            .unwrap_or_default()
    }
}

/// One node of the MIME part tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagePart {
    pub mime_type: String,
    pub headers: Vec<MessageHeader>,
    pub body: PartBody,
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageHeader {
    pub name: String,
    pub value: String,
}

/// Leaf body payload, base64url-encoded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartBody {
    pub data: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct MessageListResponse {
    messages: Vec<MessageStub>,
}

#[derive(Debug, Deserialize)]
struct MessageStub {
    id: String,
}

// ── REST client ─────────────────────────────────────────────────────

/// Gmail REST client.
pub struct GmailClient {
    client: Client,
    token: SecretString,
    base_url: String,
}

impl GmailClient {
    pub fn new(token: SecretString) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl MailProvider for GmailClient {
    async fn list_unread(&self, max_results: u32) -> Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/users/me/messages", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .query(&[
                ("q", "is:unread"),
                ("maxResults", &max_results.to_string()),
            ])
            .send()
            .await?;
        let response = error_for_status(response).await?;

        let list: MessageListResponse = response.json().await?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    async fn fetch_message(&self, id: &str) -> Result<MailMessage, ProviderError> {
        let response = self
            .client
            .get(format!("{}/users/me/messages/{id}", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .query(&[("format", "full")])
            .send()
            .await?;
        let response = error_for_status(response).await?;

        Ok(response.json().await?)
    }
}
