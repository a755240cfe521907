//! Per-chat learning state.
//!
//! Each chat gets its own lock. The map lock is held only to look up, insert or
//! drop a chat's slot, so handling in one chat never waits on another chat.
//! A slot is not a session: the session inside it stays `None` until a quiz or
//! training round first writes to it, and a slot left empty is dropped again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::tutor::content::VocabularyEntry;

/// A quiz waiting for answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuiz {
    /// Translations, in the order the words were asked.
    pub expected_answers: Vec<String>,
    pub quiz_items: Vec<VocabularyEntry>,
}

impl ActiveQuiz {
    pub fn from_items(quiz_items: Vec<VocabularyEntry>) -> Self {
        let expected_answers = quiz_items.iter().map(|w| w.translation.clone()).collect();
        Self {
            expected_answers,
            quiz_items,
        }
    }
}

/// Learning state for one chat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Stays in place after grading; only the next `/quiz` replaces it.
    pub active_quiz: Option<ActiveQuiz>,
    pub current_training_word: Option<VocabularyEntry>,
    pub quizzes_completed: u32,
}

/// Exclusive view of one chat's session while its lock is held.
pub struct SessionSlot<'a> {
    session: &'a mut Option<Session>,
}

impl SessionSlot<'_> {
    pub fn get(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Session for writing, created empty on first use.
    pub fn get_or_create(&mut self) -> &mut Session {
        self.session.get_or_insert_with(Session::default)
    }

    pub fn quizzes_completed(&self) -> u32 {
        self.get().map(|s| s.quizzes_completed).unwrap_or(0)
    }

    pub fn has_training_word(&self) -> bool {
        self.get().is_some_and(|s| s.current_training_word.is_some())
    }
}

type Slot = Arc<Mutex<Option<Session>>>;

/// Process-lifetime store of sessions keyed by chat id.
#[derive(Default)]
pub struct SessionStore {
    slots: Mutex<HashMap<i64, Slot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, chat_id: i64) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(chat_id).or_default().clone()
    }

    /// Run `f` with exclusive access to the chat's session.
    pub fn with_chat<R>(&self, chat_id: i64, f: impl FnOnce(&mut SessionSlot<'_>) -> R) -> R {
        let slot = self.slot(chat_id);
        let result = {
            let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            let mut view = SessionSlot {
                session: &mut *guard,
            };
            f(&mut view)
        };
        self.release(chat_id, slot);
        result
    }

    /// Drop the chat's slot if it holds no session and no other caller has it.
    fn release(&self, chat_id: i64, slot: Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one here. Anyone else holding the chat lock
        // also holds a clone, so at two the chat lock is free.
        if Arc::strong_count(&slot) == 2
            && slot.lock().unwrap_or_else(PoisonError::into_inner).is_none()
        {
            slots.remove(&chat_id);
        }
    }

    /// Copy of the chat's session, if one has been created.
    pub fn snapshot(&self, chat_id: i64) -> Option<Session> {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.get(&chat_id)?.clone()
        };
        let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Number of chats that have a session.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.values().cloned().collect()
        };
        slots
            .iter()
            .filter(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of chat slots in the map, empty or not.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
