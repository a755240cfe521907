use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use teloxide::types::ChatId;

use crate::tutor::message::DEFAULT_DISPLAY_NAME;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    telegram_bot_token: String,
    /// JSON file with vocabulary and phrases. Built-in content when unset.
    content_path: Option<String>,
    /// Directory for state files (logs). Defaults to current directory.
    data_dir: Option<String>,
    /// Chat that receives relayed WARN/ERROR logs.
    log_chat_id: Option<i64>,
    /// Also relay INFO logs (batched) to `log_chat_id`.
    #[serde(default)]
    log_chat_verbose: bool,
    #[serde(default = "default_display_name")]
    default_display_name: String,
    #[serde(default)]
    dry_run: bool,
}

fn default_display_name() -> String {
    DEFAULT_DISPLAY_NAME.to_string()
}

pub struct Config {
    pub telegram_bot_token: String,
    pub content_path: Option<PathBuf>,
    /// Directory for state files (logs).
    pub data_dir: PathBuf,
    pub log_chat_id: Option<ChatId>,
    pub log_chat_verbose: bool,
    /// Name used to greet senders without a first name.
    pub default_display_name: String,
    /// Log replies instead of sending them.
    pub dry_run: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile {
                path: config_path.clone(),
                source: e,
            })?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson {
                path: config_path.clone(),
                source: e,
            })?;

        if file.telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation("telegram_bot_token is required".into()));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = file.telegram_bot_token.split(':').collect();
        if token_parts.len() != 2
            || token_parts[0].parse::<u64>().is_err()
            || token_parts[1].is_empty()
        {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)"
                    .into(),
            ));
        }
        if file.default_display_name.trim().is_empty() {
            return Err(ConfigError::Validation("default_display_name must not be blank".into()));
        }

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            telegram_bot_token: file.telegram_bot_token,
            content_path: file.content_path.map(PathBuf::from),
            data_dir,
            log_chat_id: file.log_chat_id.map(ChatId),
            log_chat_verbose: file.log_chat_verbose,
            default_display_name: file.default_display_name,
            dry_run: file.dry_run,
        })
    }
}
