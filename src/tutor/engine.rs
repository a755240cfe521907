//! Dialogue engine - classifies incoming text and drives quiz and training state.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::tutor::classify::{Classification, Command, classify};
use crate::tutor::content::{ContentStore, QUIZ_SIZE};
use crate::tutor::grading::{grade_quiz, grade_training};
use crate::tutor::message::{DEFAULT_DISPLAY_NAME, IncomingMessage};
use crate::tutor::random::RandomSource;
use crate::tutor::replies::{self, Payload};
use crate::tutor::session::{ActiveQuiz, SessionSlot, SessionStore};

/// Errors recovered inside the engine and turned into replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TutorError {
    /// Not enough vocabulary to build a quiz.
    InsufficientData { required: usize, available: usize },
    /// Text started with `/` but named no known command.
    UnknownCommand(String),
}

impl fmt::Display for TutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData { required, available } => {
                write!(f, "quiz needs {} words, only {} available", required, available)
            }
            Self::UnknownCommand(token) => write!(f, "unknown command '/{}'", token),
        }
    }
}

impl std::error::Error for TutorError {}

impl TutorError {
    fn reply(&self) -> Payload {
        match self {
            Self::InsufficientData { required, available } => {
                replies::not_enough_words(*required, *available)
            }
            Self::UnknownCommand(_) => replies::unknown_command(),
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Bot username without `@`, used to accept `/cmd@bot` in groups.
    pub bot_username: Option<String>,
    pub default_display_name: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            bot_username: None,
            default_display_name: DEFAULT_DISPLAY_NAME.to_string(),
        }
    }
}

/// The tutor engine.
pub struct TutorEngine {
    config: TutorConfig,
    content: Arc<ContentStore>,
    sessions: Arc<SessionStore>,
    random: Arc<dyn RandomSource>,
}

impl TutorEngine {
    pub fn new(
        config: TutorConfig,
        content: Arc<ContentStore>,
        sessions: Arc<SessionStore>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            config,
            content,
            sessions,
            random,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one incoming message and return the replies in send order.
    ///
    /// The chat's session stays locked for the whole call.
    pub fn handle(&self, msg: &IncomingMessage) -> Vec<Payload> {
        let name = msg.display_name(&self.config.default_display_name);
        info!("📨 {} ({}): \"{}\"", name, msg.chat_id, msg.preview());

        self.sessions.with_chat(msg.chat_id, |slot| {
            let classification = classify(
                &msg.text,
                self.config.bot_username.as_deref(),
                slot.has_training_word(),
            );
            debug!("Chat {} → {:?}", msg.chat_id, classification);

            match classification {
                Classification::Command(command) => {
                    vec![self.run_command(command, name, msg.chat_id, slot)]
                }
                Classification::UnknownCommand(token) => {
                    let err = TutorError::UnknownCommand(token);
                    info!("Chat {}: {}", msg.chat_id, err);
                    vec![err.reply()]
                }
                Classification::QuizAnswer => vec![self.check_quiz(slot, &msg.text)],
                Classification::TrainingAnswer => {
                    vec![self.check_training(slot, name, &msg.text)]
                }
                Classification::Chat => vec![replies::fallback(name)],
            }
        })
    }

    fn run_command(
        &self,
        command: Command,
        name: &str,
        chat_id: i64,
        slot: &mut SessionSlot<'_>,
    ) -> Payload {
        match command {
            Command::Start => replies::start(name),
            Command::Help => replies::help(),
            Command::About => replies::about(),
            Command::Word => match self.content.random_word(self.random.as_ref()) {
                Some(entry) => replies::word(entry),
                None => replies::no_content(),
            },
            Command::Phrase => match self.content.random_phrase(self.random.as_ref()) {
                Some(entry) => replies::phrase(entry),
                None => replies::no_content(),
            },
            Command::Quiz => self.start_quiz(slot).unwrap_or_else(|err| {
                warn!("Chat {}: {}", chat_id, err);
                err.reply()
            }),
            Command::Train => self.start_training(slot),
            Command::Progress => self.progress(slot),
        }
    }

    fn start_quiz(&self, slot: &mut SessionSlot<'_>) -> Result<Payload, TutorError> {
        let items = self
            .content
            .sample_words(self.random.as_ref(), QUIZ_SIZE)
            .ok_or(TutorError::InsufficientData {
                required: QUIZ_SIZE,
                available: self.content.vocabulary().len(),
            })?;

        let payload = replies::quiz_started(&items);
        slot.get_or_create().active_quiz = Some(ActiveQuiz::from_items(items));
        Ok(payload)
    }

    fn start_training(&self, slot: &mut SessionSlot<'_>) -> Payload {
        let Some(entry) = self.content.random_word(self.random.as_ref()) else {
            return replies::no_content();
        };
        let payload = replies::training_started(entry);
        slot.get_or_create().current_training_word = Some(entry.clone());
        payload
    }

    fn progress(&self, slot: &SessionSlot<'_>) -> Payload {
        let quizzes = slot.quizzes_completed();
        let vocabulary_size = self.content.vocabulary().len();
        // No per-word tracking: assume each finished quiz showed a full set of words.
        let words_seen = (quizzes as usize).saturating_mul(QUIZ_SIZE).min(vocabulary_size);
        replies::progress(quizzes, words_seen, vocabulary_size)
    }

    /// Grades against the last quiz started; a graded quiz is kept and can be
    /// graded again.
    fn check_quiz(&self, slot: &mut SessionSlot<'_>, text: &str) -> Payload {
        let report = match slot.get().and_then(|s| s.active_quiz.as_ref()) {
            Some(quiz) => grade_quiz(quiz, text),
            None => return replies::quiz_not_started(),
        };

        let session = slot.get_or_create();
        session.quizzes_completed += 1;
        info!(
            "🧩 Quiz graded: {}/{} ({} answered, {} total)",
            report.score,
            report.out_of(),
            report.lines.len(),
            session.quizzes_completed
        );
        replies::quiz_result(&report)
    }

    /// Classification only routes here with a pending word; without one the
    /// sender gets the regular fallback.
    fn check_training(&self, slot: &mut SessionSlot<'_>, name: &str, text: &str) -> Payload {
        let Some(word) = slot.get_mut().and_then(|s| s.current_training_word.take()) else {
            return replies::fallback(name);
        };

        let result = grade_training(&word, text);
        let verdict = if result.correct { "correct" } else { "wrong" };
        info!("🏋️ Training '{}': {}", word.source_word, verdict);
        replies::training_result(&result)
    }
}
