//! Telegram delivery using teloxide.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use crate::tutor::classify::Command;
use crate::tutor::replies::Payload;

/// Max chars Telegram accepts in one message.
const MAX_MESSAGE_CHARS: usize = 4096;

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
    dry_run: bool,
}

impl TelegramClient {
    pub fn new(bot: Bot, dry_run: bool) -> Self {
        Self { bot, dry_run }
    }

    /// Bot username without `@`, if Telegram answers.
    pub async fn bot_username(&self) -> Option<String> {
        match self.bot.get_me().await {
            Ok(me) => {
                info!("Bot user ID: {}, username: @{}", me.id, me.username());
                Some(me.username().to_string())
            }
            Err(e) => {
                warn!("Failed to get bot info: {e}");
                None
            }
        }
    }

    /// Register the command menu shown by Telegram clients.
    pub async fn register_commands(&self) {
        if self.dry_run {
            info!("[DRY RUN] Would register {} commands", Command::bot_commands().len());
            return;
        }
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!("Failed to register commands: {e}");
        }
    }

    /// Send one payload. Rich payloads use HTML parse mode.
    pub async fn send_payload(&self, chat_id: i64, payload: &Payload) -> Result<i64, String> {
        let text = truncate_chars(&payload.text, MAX_MESSAGE_CHARS);

        if self.dry_run {
            info!("[DRY RUN] Would send to {}: {}", chat_id, text);
            return Ok(0);
        }

        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if payload.rich {
            request = request.parse_mode(ParseMode::Html);
        }

        request.await.map(|msg| msg.id.0 as i64).map_err(|e| {
            let msg = format!("Failed to send: {e}");
            warn!("{}", msg);
            msg
        })
    }

    /// Send payloads in order. A failed send is logged and does not stop the rest.
    pub async fn deliver(&self, chat_id: i64, payloads: &[Payload]) -> usize {
        let mut delivered = 0;
        for payload in payloads {
            if self.send_payload(chat_id, payload).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}
