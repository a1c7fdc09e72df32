//! Notification agent — fire-and-forget delivery to the chat channel.

use std::sync::Arc;

use tracing::{error, info};

use crate::agents::Agent;
use crate::providers::chat::ChatNotifier;

const URGENT_PREFIX: &str = "🚨 URGENT: ";

/// Sends chat notifications; delivery failures never propagate.
pub struct NotificationAgent {
    chat: Arc<dyn ChatNotifier>,
    default_channel: String,
}

impl Agent for NotificationAgent {
    fn name(&self) -> &'static str {
        "notification"
    }
}

impl NotificationAgent {
    pub fn new(chat: Arc<dyn ChatNotifier>, default_channel: impl Into<String>) -> Self {
        Self {
            chat,
            default_channel: default_channel.into(),
        }
    }

    /// Post `message`, marked urgent when requested, to `channel` or the
    /// configured default. Send errors are logged and swallowed.
    pub async fn execute(&self, message: &str, channel: Option<&str>, urgent: bool) {
        let text = if urgent {
            format!("{URGENT_PREFIX}{message}")
        } else {
            message.to_string()
        };
        let channel = channel.unwrap_or(&self.default_channel);

        match self.chat.post_message(channel, &text).await {
            Ok(ts) => info!(agent = self.name(), channel, ts, "notification sent"),
            Err(e) => error!(agent = self.name(), channel, error = %e, "notification failed"),
        }
    }
}
