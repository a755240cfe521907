//! Incoming text classification.
//!
//! Order matters: commands first, then the quiz-answer heuristic, then the
//! pending training word, then plain chat.

use teloxide::utils::command::BotCommands;

/// Commands the bot understands. Descriptions feed the Telegram command menu.
#[derive(BotCommands, Debug, Clone, Copy, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды бота:")]
pub enum Command {
    #[command(description = "начать работу")]
    Start,
    #[command(description = "помощь")]
    Help,
    #[command(description = "случайное слово")]
    Word,
    #[command(description = "полезная фраза")]
    Phrase,
    #[command(description = "викторина (5 вопросов)")]
    Quiz,
    #[command(description = "режим тренировки")]
    Train,
    #[command(description = "мой прогресс")]
    Progress,
    #[command(description = "о языке")]
    About,
}

impl Command {
    /// Case-sensitive lookup of a command name without the leading `/`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "word" => Some(Self::Word),
            "phrase" => Some(Self::Phrase),
            "quiz" => Some(Self::Quiz),
            "train" => Some(Self::Train),
            "progress" => Some(Self::Progress),
            "about" => Some(Self::About),
            _ => None,
        }
    }
}

/// What an incoming text is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Command(Command),
    /// Starts with `/` but names no known command. Holds the raw token.
    UnknownCommand(String),
    QuizAnswer,
    TrainingAnswer,
    Chat,
}

/// Parse the command token of a `/`-prefixed text.
///
/// `/quiz@SomeBot` is accepted when the mention names this bot. With no known
/// bot username, any mention is stripped.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Result<Command, String> {
    let token = text
        .strip_prefix('/')
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or("");

    let name = match token.split_once('@') {
        Some((name, mention)) => match bot_username {
            Some(bot) if !mention.eq_ignore_ascii_case(bot.trim_start_matches('@')) => {
                return Err(token.to_string());
            }
            _ => name,
        },
        None => token,
    };

    Command::from_name(name).ok_or_else(|| token.to_string())
}

/// Heuristic for a comma-separated quiz submission like `1. дом, 2. вода`.
///
/// Needs a digit, a literal `.`, and at least two non-blank comma segments.
pub fn looks_like_quiz_answer(text: &str) -> bool {
    !text.starts_with('/')
        && text.chars().any(char::is_numeric)
        && text.contains('.')
        && text.split(',').filter(|segment| !segment.trim().is_empty()).count() >= 2
}

/// Classify trimmed incoming text for a chat.
pub fn classify(text: &str, bot_username: Option<&str>, has_training_word: bool) -> Classification {
    let text = text.trim();

    if text.starts_with('/') {
        return match parse_command(text, bot_username) {
            Ok(command) => Classification::Command(command),
            Err(token) => Classification::UnknownCommand(token),
        };
    }

    if looks_like_quiz_answer(text) {
        return Classification::QuizAnswer;
    }

    if has_training_word {
        return Classification::TrainingAnswer;
    }

    Classification::Chat
}
