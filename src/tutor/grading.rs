//! Answer scoring for quizzes and training rounds.
//!
//! Both graders are total: any input text produces a result, mismatches only
//! lower the score.

use crate::tutor::content::{QUIZ_SIZE, VocabularyEntry};
use crate::tutor::session::ActiveQuiz;

/// One graded quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizLine {
    /// 1-based question number.
    pub position: usize,
    pub source_word: String,
    pub expected: String,
    /// The submitted segment, trimmed but otherwise as typed.
    pub given: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Perfect,
    Good,
    KeepPracticing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    pub lines: Vec<QuizLine>,
    pub score: usize,
}

impl QuizReport {
    /// Denominator shown to the user, regardless of how many lines were graded.
    pub fn out_of(&self) -> usize {
        QUIZ_SIZE
    }

    pub fn tier(&self) -> ScoreTier {
        if self.score == QUIZ_SIZE {
            ScoreTier::Perfect
        } else if self.score >= 3 {
            ScoreTier::Good
        } else {
            ScoreTier::KeepPracticing
        }
    }
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Grade a comma-separated submission against a quiz.
///
/// Only the overlapping prefix of answers and questions is graded. Each answer
/// must equal its translation exactly, ignoring case and surrounding whitespace,
/// so `1. дом` does not match `дом`.
pub fn grade_quiz(quiz: &ActiveQuiz, submission: &str) -> QuizReport {
    let user_answers: Vec<&str> = submission.split(',').map(str::trim).collect();

    let lines: Vec<QuizLine> = user_answers
        .iter()
        .zip(quiz.expected_answers.iter())
        .zip(quiz.quiz_items.iter())
        .enumerate()
        .map(|(i, ((given, expected), item))| QuizLine {
            position: i + 1,
            source_word: item.source_word.clone(),
            expected: expected.clone(),
            given: given.to_string(),
            correct: fold(given) == fold(expected),
        })
        .collect();

    let score = lines.iter().filter(|line| line.correct).count();
    QuizReport { lines, score }
}

/// Outcome of a training round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingResult {
    pub word: VocabularyEntry,
    /// The answer exactly as received.
    pub answer: String,
    pub correct: bool,
}

/// Compare a submitted word with the expected source word, ignoring case and
/// surrounding whitespace.
pub fn grade_training(word: &VocabularyEntry, submission: &str) -> TrainingResult {
    TrainingResult {
        word: word.clone(),
        answer: submission.to_string(),
        correct: fold(submission) == fold(&word.source_word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz() -> ActiveQuiz {
        ActiveQuiz::from_items(vec![
            VocabularyEntry::new("dom", "дом", "Moj dom jest tu."),
            VocabularyEntry::new("voda", "вода", "Ja pijem vodu."),
            VocabularyEntry::new("ogň", "огонь", "Ogň jest goriačij."),
            VocabularyEntry::new("brat", "брат", "Moj brat jest tu."),
            VocabularyEntry::new("kniga", "книга", "Ja čitam knigu."),
        ])
    }

    #[test]
    fn test_perfect_score() {
        let report = grade_quiz(&quiz(), "дом, вода, огонь, брат, книга");
        assert_eq!(report.score, 5);
        assert_eq!(report.tier(), ScoreTier::Perfect);
        assert!(report.lines.iter().all(|l| l.correct));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let report = grade_quiz(&quiz(), "  ДОМ ,Вода,  огонь  , брат , КНИГА");
        assert_eq!(report.score, 5);
    }

    #[test]
    fn test_numbered_answers_do_not_match() {
        let report = grade_quiz(&quiz(), "1. дом, 2. вода");
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.score, 0);
        assert_eq!(report.lines[0].given, "1. дом");
        assert!(!report.lines[0].correct);
        assert!(!report.lines[1].correct);
    }

    #[test]
    fn test_truncated_submission() {
        let report = grade_quiz(&quiz(), "дом, нет, огонь");
        assert_eq!(report.lines.len(), 3);
        assert_eq!(report.score, 2);
        assert_eq!(report.out_of(), 5);
        assert_eq!(report.tier(), ScoreTier::KeepPracticing);
        assert_eq!(report.lines[1].given, "нет");
        assert!(!report.lines[1].correct);
    }

    #[test]
    fn test_long_submission_ignores_extra() {
        let report = grade_quiz(&quiz(), "дом, вода, огонь, брат, книга, лишнее, ещё");
        assert_eq!(report.lines.len(), 5);
        assert_eq!(report.score, 5);
    }

    #[test]
    fn test_empty_segments_just_miss() {
        let report = grade_quiz(&quiz(), ",,, брат.");
        assert_eq!(report.lines.len(), 4);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_middle_tier() {
        let report = grade_quiz(&quiz(), "дом, вода, огонь, x, y");
        assert_eq!(report.score, 3);
        assert_eq!(report.tier(), ScoreTier::Good);
    }

    #[test]
    fn test_training_match_ignores_case_and_spaces() {
        let word = VocabularyEntry::new("dom", "дом", "Moj dom jest tu.");
        let result = grade_training(&word, " DOM ");
        assert!(result.correct);
        assert_eq!(result.answer, " DOM ");
    }

    #[test]
    fn test_training_miss_keeps_literal_answer() {
        let word = VocabularyEntry::new("ogň", "огонь", "Ogň jest goriačij.");
        let result = grade_training(&word, " ogon ");
        assert!(!result.correct);
        assert_eq!(result.answer, " ogon ");
    }

    #[test]
    fn test_training_non_ascii_case_fold() {
        let word = VocabularyEntry::new("člověk", "человек", "Dobry děň, člověče!");
        assert!(grade_training(&word, "ČLOVĚK").correct);
    }
}
