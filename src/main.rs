use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;

use medzubot::config::Config;
use medzubot::telegram_log::TelegramLogLayer;
use medzubot::tutor::{
    ContentError, ContentStore, IncomingMessage, SessionStore, TelegramClient, ThreadRandom,
    TutorConfig, TutorEngine,
};

struct BotState {
    engine: TutorEngine,
    telegram: TelegramClient,
}

fn load_content(config: &Config) -> Result<ContentStore, ContentError> {
    match config.content_path {
        Some(ref path) => ContentStore::load(path),
        None => {
            let content = ContentStore::builtin();
            content.validate()?;
            Ok(content)
        }
    }
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "medzubot.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.telegram_bot_token);

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("medzubot.log"))
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file in {}: {e}", log_dir.display());
            std::process::exit(1);
        }
    };
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            config.log_chat_id.map(|chat_id| {
                TelegramLogLayer::new(bot.clone(), chat_id, config.log_chat_verbose)
            }),
        )
        .init();

    info!("🚀 Starting medzubot...");
    info!("Loaded config from {config_path}");
    if config.dry_run {
        info!("DRY RUN mode enabled");
    }

    let content = match load_content(&config) {
        Ok(content) => content,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    info!(
        "📚 Content: {} words, {} phrases",
        content.vocabulary().len(),
        content.phrases().len()
    );

    let telegram = TelegramClient::new(bot.clone(), config.dry_run);
    let bot_username = telegram.bot_username().await;
    telegram.register_commands().await;

    let engine = TutorEngine::new(
        TutorConfig {
            bot_username,
            default_display_name: config.default_display_name.clone(),
        },
        Arc::new(content),
        Arc::new(SessionStore::new()),
        Arc::new(ThreadRandom),
    );
    let state = Arc::new(BotState { engine, telegram });

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let text = match msg.text() {
        Some(t) => t,
        None => return Ok(()),
    };

    let sender = msg.from.as_ref().map(|u| u.first_name.as_str());
    let incoming = IncomingMessage::new(msg.chat.id.0, sender, text);

    let payloads = state.engine.handle(&incoming);
    let delivered = state.telegram.deliver(incoming.chat_id, &payloads).await;
    if delivered < payloads.len() {
        warn!(
            "Delivered {}/{} replies to chat {}",
            delivered,
            payloads.len(),
            incoming.chat_id
        );
    }

    Ok(())
}
