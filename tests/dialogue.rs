//! End-to-end dialogue through the public library API.
//!
//! Run with: cargo test --test dialogue

use std::sync::Arc;

use medzubot::tutor::{
    ContentStore, IncomingMessage, Payload, SeededRandom, SessionStore, TutorConfig, TutorEngine,
};

fn engine(sessions: Arc<SessionStore>) -> TutorEngine {
    TutorEngine::new(
        TutorConfig::default(),
        Arc::new(ContentStore::builtin()),
        sessions,
        Arc::new(SeededRandom::new(99)),
    )
}

fn say(engine: &TutorEngine, chat_id: i64, text: &str) -> Vec<Payload> {
    engine.handle(&IncomingMessage::new(chat_id, Some("Olga"), text))
}

#[test]
fn test_full_lesson() {
    let sessions = Arc::new(SessionStore::new());
    let engine = engine(sessions.clone());
    let chat = 1001;

    let welcome = say(&engine, chat, "/start");
    assert!(welcome[0].text.contains("Olga"));

    // quiz: bare upper-cased translations; the extra "6." segment is not graded
    say(&engine, chat, "/quiz");
    let quiz = sessions.snapshot(chat).unwrap().active_quiz.unwrap();
    let answers: Vec<String> = quiz.expected_answers.iter().map(|a| a.to_uppercase()).collect();
    let result = say(&engine, chat, &format!("{}, 6.", answers.join(", ")));
    assert_eq!(result.len(), 1);
    assert!(result[0].text.contains("5/5"));

    // training: answer with the expected word, padded and upper-cased
    say(&engine, chat, "/train");
    let word = sessions.snapshot(chat).unwrap().current_training_word.unwrap();
    let reply = say(&engine, chat, &format!("  {}  ", word.source_word.to_uppercase()));
    assert!(reply[0].text.contains("Правильно!"));
    assert!(sessions.snapshot(chat).unwrap().current_training_word.is_none());

    let progress = say(&engine, chat, "/progress");
    assert!(progress[0].text.contains("Пройдено викторин: 1"));
    assert!(progress[0].text.contains("Изучено слов: 5/20"));
}

#[test]
fn test_payload_formatting_flags() {
    let engine = engine(Arc::new(SessionStore::new()));
    assert!(say(&engine, 1, "/help")[0].rich);
    assert!(!say(&engine, 1, "/nope")[0].rich);
    assert!(!say(&engine, 1, "1. a, 2. b")[0].rich);
}

#[test]
fn test_user_text_is_escaped() {
    let sessions = Arc::new(SessionStore::new());
    let engine = engine(sessions.clone());
    say(&engine, 1, "/quiz");
    let reply = say(&engine, 1, "1. <b>x</b>, 2. y & z");
    assert!(reply[0].text.contains("&lt;b&gt;x&lt;/b&gt;"));
    assert!(reply[0].text.contains("y &amp; z"));
}
