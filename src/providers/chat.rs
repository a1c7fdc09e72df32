//! Chat-notification collaborator — post a message to a named channel.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::providers::error_for_status;

const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Delivery of text messages to a chat channel.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Post `text` to `channel`, returning the delivery timestamp.
    async fn post_message(&self, channel: &str, text: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    username: &'a str,
}

/// Slack wraps failures in a 200 response with `ok: false`.
#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Slack Web API client.
pub struct SlackClient {
    client: Client,
    token: SecretString,
    base_url: String,
}

impl SlackClient {
    pub fn new(token: SecretString) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl ChatNotifier for SlackClient {
    async fn post_message(&self, channel: &str, text: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .json(&PostMessageRequest {
                channel,
                text,
                username: "Daybrief",
            })
            .send()
            .await?;
        let response = error_for_status(response).await?;

        let posted: PostMessageResponse = response.json().await?;
        if !posted.ok {
            return Err(ProviderError::Api {
                status: 200,
                message: posted.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(posted.ts.unwrap_or_default())
    }
}
