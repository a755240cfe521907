//! Inbound message shape consumed by the engine.

use serde::{Deserialize, Serialize};

/// Name used when the sender has none.
pub const DEFAULT_DISPLAY_NAME: &str = "друг";

/// Max chars of message text written to logs.
const LOG_PREVIEW_CHARS: usize = 50;

/// A text message from a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub chat_id: i64,
    /// Sender's first name, if Telegram provided one.
    pub sender_name: Option<String>,
    pub text: String,
}

impl IncomingMessage {
    pub fn new(chat_id: i64, sender_name: Option<&str>, text: &str) -> Self {
        Self {
            chat_id,
            sender_name: sender_name.map(str::to_string),
            text: text.to_string(),
        }
    }

    /// Sender name, falling back to `default` when missing or blank.
    pub fn display_name<'a>(&'a self, default: &'a str) -> &'a str {
        self.sender_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(default)
    }

    /// Short single-line preview for logs.
    pub fn preview(&self) -> String {
        self.text
            .chars()
            .take(LOG_PREVIEW_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect()
    }
}
