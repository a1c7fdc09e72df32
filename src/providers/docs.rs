//! Document-storage collaborator — create a document, append text.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ProviderError;
use crate::providers::error_for_status;

const DEFAULT_BASE_URL: &str = "https://docs.googleapis.com/v1";

/// Write access to document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create an empty document, returning its id.
    async fn create_document(&self, title: &str) -> Result<String, ProviderError>;

    /// Append text content to an existing document.
    async fn append_text(&self, document_id: &str, content: &str) -> Result<(), ProviderError>;
}

#[derive(Debug, Serialize)]
struct CreateDocumentRequest<'a> {
    title: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentResponse {
    document_id: String,
}

/// Google Docs REST client.
pub struct DocsClient {
    client: Client,
    token: SecretString,
    base_url: String,
}

impl DocsClient {
    pub fn new(token: SecretString) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for DocsClient {
    async fn create_document(&self, title: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/documents", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .json(&CreateDocumentRequest { title })
            .send()
            .await?;
        let response = error_for_status(response).await?;

        let created: CreateDocumentResponse = response.json().await?;
        Ok(created.document_id)
    }

    async fn append_text(&self, document_id: &str, content: &str) -> Result<(), ProviderError> {
        let body = json!({
            "requests": [{
                "insertText": {
                    "location": {"index": 1},
                    "text": content,
                }
            }]
        });

        let response = self
            .client
            .post(format!(
                "{}/documents/{document_id}:batchUpdate",
                self.base_url
            ))
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(())
    }
}
