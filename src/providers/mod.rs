//! External collaborators.
//!
//! One trait per capability the core consumes — mail, calendar, document
//! storage, chat notification — each with a thin reqwest-backed client.
//! Pure I/O: no analysis or business logic lives here.

pub mod calendar;
pub mod chat;
pub mod docs;
pub mod mail;

pub use calendar::{CalendarClient, CalendarProvider, EventResource};
pub use chat::{ChatNotifier, SlackClient};
pub use docs::{DocsClient, DocumentStore};
pub use mail::{GmailClient, MailMessage, MailProvider, MessagePart};

use crate::error::ProviderError;

/// Map a non-success HTTP response to a `ProviderError`.
///
/// 401 is singled out so callers can distinguish expired credentials from
/// other API failures.
pub(crate) async fn error_for_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::AuthExpired);
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}
