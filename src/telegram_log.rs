//! Tracing layer that relays bot logs to an operator chat.
//!
//! WARN and ERROR go out as soon as they happen. INFO lines are only relayed in
//! verbose mode, batched every few seconds.

use std::future::Future;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

const FLUSH_INTERVAL: Duration = Duration::from_secs(5);
const MAX_BATCH_LINES: usize = 50;
const MAX_LOG_CHARS: usize = 4000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum LogLine {
    Urgent(String),
    Info(String),
}

pub struct TelegramLogLayer {
    tx: mpsc::UnboundedSender<LogLine>,
    verbose: bool,
}

impl TelegramLogLayer {
    /// Spawn the relay task. Must be called inside a tokio runtime.
    pub fn new(bot: Bot, chat_id: ChatId, verbose: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(relay(rx, FLUSH_INTERVAL, move |text| {
            let bot = bot.clone();
            async move {
                if let Err(e) = bot.send_message(chat_id, clip(&text)).await {
                    eprintln!("Failed to relay log to Telegram: {e}");
                }
            }
        }));

        Self::from_channel(tx, verbose)
    }

    fn from_channel(tx: mpsc::UnboundedSender<LogLine>, verbose: bool) -> Self {
        Self { tx, verbose }
    }
}

fn clip(text: &str) -> String {
    if text.chars().count() > MAX_LOG_CHARS {
        let truncated: String = text.chars().take(MAX_LOG_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

/// Forward log lines through `send` until the channel closes.
async fn relay<F, Fut>(mut rx: mpsc::UnboundedReceiver<LogLine>, flush_every: Duration, send: F)
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut batch: Vec<String> = Vec::new();
    let mut interval = tokio::time::interval(flush_every);

    loop {
        tokio::select! {
            biased;

            line = rx.recv() => match line {
                Some(LogLine::Urgent(text)) => send(text).await,
                Some(LogLine::Info(text)) => {
                    batch.push(text);
                    if batch.len() >= MAX_BATCH_LINES {
                        send(std::mem::take(&mut batch).join("\n")).await;
                    }
                }
                None => break,
            },
            _ = interval.tick() => {
                if !batch.is_empty() {
                    send(std::mem::take(&mut batch).join("\n")).await;
                }
            }
        }
    }

    if !batch.is_empty() {
        send(batch.join("\n")).await;
    }
}

/// Renders an event as `message, key = value, ...`.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<String>,
}

impl LineVisitor {
    fn into_line(self) -> String {
        std::iter::once(self.message)
            .filter(|m| !m.is_empty())
            .chain(self.fields)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{} = {:?}", field.name(), value));
        }
    }
}

impl<S: Subscriber> Layer<S> for TelegramLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level > Level::INFO || (level == Level::INFO && !self.verbose) {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let text = visitor.into_line();
        let line = match level {
            Level::ERROR => LogLine::Urgent(format!("❌ {}", text)),
            Level::WARN => LogLine::Urgent(format!("⚠️ {}", text)),
            _ => LogLine::Info(text),
        };

        if self.tx.send(line).is_err() {
            eprintln!("Log relay closed, line dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::prelude::*;

    fn capture() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) -> std::future::Ready<()>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let sink = sent.clone();
        let send = move |text: String| {
            sink.lock().unwrap().push(text);
            std::future::ready(())
        };
        (sent, send)
    }

    #[tokio::test]
    async fn test_urgent_sent_and_info_batched() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (sent, send) = capture();

        tx.send(LogLine::Info("quiz graded".into())).unwrap();
        tx.send(LogLine::Info("training started".into())).unwrap();
        tx.send(LogLine::Urgent("send failed".into())).unwrap();
        drop(tx);

        relay(rx, Duration::from_secs(60), send).await;

        let sent = sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec!["send failed".to_string(), "quiz graded\ntraining started".to_string()]
        );
    }

    #[tokio::test]
    async fn test_batch_flushes_at_limit() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (sent, send) = capture();

        for i in 0..MAX_BATCH_LINES + 1 {
            tx.send(LogLine::Info(format!("line {i}"))).unwrap();
        }
        drop(tx);

        relay(rx, Duration::from_secs(60), send).await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].lines().count(), MAX_BATCH_LINES);
        assert_eq!(sent[1], format!("line {}", MAX_BATCH_LINES));
    }

    #[tokio::test]
    async fn test_batch_flushes_on_interval() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (sent, send) = capture();
        let task = tokio::spawn(relay(rx, Duration::from_millis(20), send));

        tx.send(LogLine::Info("hello".into())).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*sent.lock().unwrap(), vec!["hello".to_string()]);

        drop(tx);
        task.await.unwrap();
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_layer_filters_by_level() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscriber =
            tracing_subscriber::registry().with(TelegramLogLayer::from_channel(tx, false));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("📨 hello");
            tracing::warn!(chat = 7, "Failed to send");
            tracing::debug!("noise");
        });

        assert_eq!(
            rx.try_recv().unwrap(),
            LogLine::Urgent("⚠️ Failed to send, chat = 7".into())
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_verbose_layer_relays_info() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscriber =
            tracing_subscriber::registry().with(TelegramLogLayer::from_channel(tx, true));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("📨 hello");
            tracing::error!("boom");
        });

        assert_eq!(rx.try_recv().unwrap(), LogLine::Info("📨 hello".into()));
        assert_eq!(rx.try_recv().unwrap(), LogLine::Urgent("❌ boom".into()));
    }

    #[test]
    fn test_clip_long_text() {
        let long = "ж".repeat(MAX_LOG_CHARS + 10);
        let clipped = clip(&long);
        assert!(clipped.ends_with("..."));
        assert_eq!(clipped.chars().count(), MAX_LOG_CHARS + 3);
    }
}
