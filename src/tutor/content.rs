//! Vocabulary and phrase tables.
//!
//! The tables are immutable once built. Handlers borrow entries from the store
//! and clone them into sessions when a quiz or training round needs to keep one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::tutor::random::RandomSource;

/// Number of words asked in one quiz.
pub const QUIZ_SIZE: usize = 5;

/// A single word of Interslavic with its Russian translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    #[serde(rename = "interslavic")]
    pub source_word: String,
    pub translation: String,
    pub example: String,
}

impl VocabularyEntry {
    pub fn new(source_word: &str, translation: &str, example: &str) -> Self {
        Self {
            source_word: source_word.to_string(),
            translation: translation.to_string(),
            example: example.to_string(),
        }
    }
}

/// A ready-made phrase with its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseEntry {
    #[serde(rename = "interslavic")]
    pub phrase: String,
    pub translation: String,
}

impl PhraseEntry {
    pub fn new(phrase: &str, translation: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            translation: translation.to_string(),
        }
    }
}

/// Errors raised while loading or validating content.
#[derive(Debug)]
pub enum ContentError {
    /// Failed to read the content file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Content is structurally fine but unusable.
    Validation(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read content file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse content file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "content validation error: {}", msg),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ContentFile {
    vocabulary: Vec<VocabularyEntry>,
    #[serde(default)]
    phrases: Vec<PhraseEntry>,
}

/// Immutable lookup tables for words and phrases.
#[derive(Debug, Clone)]
pub struct ContentStore {
    vocabulary: Vec<VocabularyEntry>,
    phrases: Vec<PhraseEntry>,
}

impl ContentStore {
    /// Build a store without validation.
    ///
    /// Small tables are allowed here; quiz generation reports them per request.
    pub fn new(vocabulary: Vec<VocabularyEntry>, phrases: Vec<PhraseEntry>) -> Self {
        Self {
            vocabulary,
            phrases,
        }
    }

    /// Load a store from a JSON content file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ContentError::ReadFile {
                path: path.clone(),
                source: e,
            })?;
        let file: ContentFile = serde_json::from_str(&content)
            .map_err(|e| ContentError::ParseJson {
                path: path.clone(),
                source: e,
            })?;

        let store = Self::new(file.vocabulary, file.phrases);
        store.validate()?;
        Ok(store)
    }

    /// Startup integrity check: enough words for a quiz, at least one phrase,
    /// no blank fields.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.vocabulary.len() < QUIZ_SIZE {
            return Err(ContentError::Validation(format!(
                "vocabulary needs at least {} entries, found {}",
                QUIZ_SIZE,
                self.vocabulary.len()
            )));
        }
        if self.phrases.is_empty() {
            return Err(ContentError::Validation("phrases must contain at least one entry".into()));
        }
        for (i, entry) in self.vocabulary.iter().enumerate() {
            if [&entry.source_word, &entry.translation, &entry.example]
                .iter()
                .any(|field| field.trim().is_empty())
            {
                return Err(ContentError::Validation(format!(
                    "vocabulary entry {} has a blank field",
                    i
                )));
            }
        }
        for (i, phrase) in self.phrases.iter().enumerate() {
            if phrase.phrase.trim().is_empty() || phrase.translation.trim().is_empty() {
                return Err(ContentError::Validation(format!("phrase {} has a blank field", i)));
            }
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> &[VocabularyEntry] {
        &self.vocabulary
    }

    pub fn phrases(&self) -> &[PhraseEntry] {
        &self.phrases
    }

    /// One word chosen uniformly, or `None` for an empty table.
    pub fn random_word(&self, random: &dyn RandomSource) -> Option<&VocabularyEntry> {
        if self.vocabulary.is_empty() {
            return None;
        }
        self.vocabulary.get(random.index(self.vocabulary.len()))
    }

    /// One phrase chosen uniformly, or `None` for an empty table.
    pub fn random_phrase(&self, random: &dyn RandomSource) -> Option<&PhraseEntry> {
        if self.phrases.is_empty() {
            return None;
        }
        self.phrases.get(random.index(self.phrases.len()))
    }

    /// Draw `amount` distinct words without replacement, in draw order.
    ///
    /// Returns `None` when the table holds fewer than `amount` words.
    pub fn sample_words(
        &self,
        random: &dyn RandomSource,
        amount: usize,
    ) -> Option<Vec<VocabularyEntry>> {
        if self.vocabulary.len() < amount {
            return None;
        }
        let picked = random
            .distinct_indices(self.vocabulary.len(), amount)
            .into_iter()
            .filter_map(|i| self.vocabulary.get(i).cloned())
            .collect();
        Some(picked)
    }

    /// The dataset shipped with the bot.
    pub fn builtin() -> Self {
        let vocabulary = vec![
            VocabularyEntry::new("člověk", "человек", "Dobry děň, člověče!"),
            VocabularyEntry::new("dom", "дом", "Moj dom jest tu."),
            VocabularyEntry::new("voda", "вода", "Ja pijem vodu."),
            VocabularyEntry::new("ogň", "огонь", "Ogň jest goriačij."),
            VocabularyEntry::new("zemja", "земля", "Zemja jest zelena."),
            VocabularyEntry::new("brat", "брат", "Moj brat jest tu."),
            VocabularyEntry::new("sestra", "сестра", "Moja sestra čita knigu."),
            VocabularyEntry::new("matka", "мать", "Moja matka dobra jest."),
            VocabularyEntry::new("otčim", "отец", "Moj otčim rabotaet."),
            VocabularyEntry::new("kniga", "книга", "Ja čitam knigu."),
            VocabularyEntry::new("stol", "стол", "Na stole jest kniga."),
            VocabularyEntry::new("stul", "стул", "Sědite na stule."),
            VocabularyEntry::new("okno", "окно", "Okno jest otvoreno."),
            VocabularyEntry::new("dver", "дверь", "Dver jest zakrita."),
            VocabularyEntry::new("jabluko", "яблоко", "Jabluko jest crveno."),
            VocabularyEntry::new("mesjac", "месяц", "Mesjac svetit na nebe."),
            VocabularyEntry::new("slonce", "солнце", "Slunce svetit jasno."),
            VocabularyEntry::new("den", "день", "Dobry den!"),
            VocabularyEntry::new("noč", "ночь", "Dobra noč!"),
            VocabularyEntry::new("godina", "год", "Dobra godina!"),
        ];

        let phrases = vec![
            PhraseEntry::new("Dobry den!", "Добрый день!"),
            PhraseEntry::new("Kako si?", "Как дела?"),
            PhraseEntry::new("Dobro, hvala.", "Хорошо, спасибо."),
            PhraseEntry::new("Ja tebe ljublju.", "Я тебя люблю."),
            PhraseEntry::new("Kolko stoit?", "Сколько стоит?"),
            PhraseEntry::new("Gde jest...?", "Где находится...?"),
            PhraseEntry::new("Ja ne razuměm.", "Я не понимаю."),
            PhraseEntry::new("Moj imě jest...", "Меня зовут..."),
            PhraseEntry::new("Izvinite.", "Извините."),
            PhraseEntry::new("Da i ne.", "Да и нет."),
        ];

        Self::new(vocabulary, phrases)
    }
}
