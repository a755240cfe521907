//! Tutor module - Interslavic lessons, quizzes and training rounds over chat.

pub mod classify;
pub mod content;
pub mod engine;
pub mod grading;
pub mod message;
pub mod random;
pub mod replies;
pub mod session;
pub mod telegram;


pub use classify::Command;
pub use content::{ContentError, ContentStore, PhraseEntry, VocabularyEntry};
pub use engine::{TutorConfig, TutorEngine, TutorError};
pub use message::IncomingMessage;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use replies::Payload;
pub use session::{ActiveQuiz, Session, SessionStore};
pub use telegram::TelegramClient;
