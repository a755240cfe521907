//! Outbound payload text.
//!
//! Rich payloads are Telegram HTML. Anything typed by a user is escaped before
//! it lands in one.

use crate::tutor::content::{PhraseEntry, VocabularyEntry};
use crate::tutor::grading::{QuizReport, ScoreTier, TrainingResult};

/// One message for the transport to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub text: String,
    /// Send with HTML parse mode.
    pub rich: bool,
}

impl Payload {
    pub fn rich(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rich: true,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rich: false,
        }
    }
}

/// Escape text for Telegram HTML.
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

pub fn start(name: &str) -> Payload {
    Payload::rich(format!(
        "<b>🇷🇺🇺🇦🇵🇱 Dobrodošli! Добро пожаловать, {}!</b>\n\n\
         Я бот для изучения межславянского языка (Medžuslovjansky)!\n\n\
         <b>📚 Доступные команды:</b>\n\
         /start - Начать работу\n\
         /word - Случайное слово\n\
         /phrase - Полезная фраза\n\
         /quiz - Викторина (5 вопросов)\n\
         /train - Режим тренировки\n\
         /progress - Мой прогресс\n\
         /help - Помощь\n\
         /about - О языке\n\n\
         <b>🌍 Межславянский язык</b> - это язык, понятный носителям всех славянских языков без перевода! 🎯",
        html_escape(name)
    ))
}

pub fn help() -> Payload {
    Payload::rich(
        "<b>📖 Помощь по командам:</b>\n\n\
         /word - Случайное слово с переводом и примером\n\
         /phrase - Полезная фраза для общения\n\
         /quiz - Викторина из 5 вопросов для проверки знаний\n\
         /train - Режим тренировки: переводите слова\n\
         /progress - Показывает ваш прогресс в изучении\n\
         /about - Узнать о межславянском языке\n\n\
         <b>💡 Совет:</b> Регулярно занимайтесь по 5-10 минут в день для лучшего результата! 🚀",
    )
}

pub fn about() -> Payload {
    Payload::rich(
        "<b>🌍 О межславянском языке</b>\n\n\
         Межславянский язык (Medžuslovjansky) - это современный международный язык, \
         созданный для общения между носителями разных славянских языков.\n\n\
         <b>🎯 Преимущества:</b>\n\
         • Понятен без перевода русским, украинцам, полякам, чехам и другим славянам\n\
         • Упрощенная грамматика по сравнению с естественными языками\n\
         • Основан на общих славянских корнях и этимологии\n\n\
         <b>💬 Примеры:</b>\n\
         <code>Dobry den!</code> - Добрый день! (понятно русским, украинцам, полякам)\n\
         <code>Ja govorim po-medžuslovjansky</code> - Я говорю по-межславянски\n\n\
         <b>🚀 Начните изучать прямо сейчас с командой /word !</b>",
    )
}

pub fn word(entry: &VocabularyEntry) -> Payload {
    Payload::rich(format!(
        "<b>📚 Слово дня</b>\n\n\
         <code>{}</code> - <b>{}</b>\n\n\
         <i>{}</i>\n\n\
         💡 <b>Совет:</b> Попробуйте использовать это слово в предложении!",
        html_escape(&entry.source_word),
        html_escape(&entry.translation),
        html_escape(&entry.example)
    ))
}

pub fn phrase(entry: &PhraseEntry) -> Payload {
    Payload::rich(format!(
        "<b>💬 Полезная фраза</b>\n\n\
         <code>{}</code> - <b>{}</b>\n\n\
         🎯 <b>Использование:</b> Попробуйте сказать эту фразу вслух!",
        html_escape(&entry.phrase),
        html_escape(&entry.translation)
    ))
}

pub fn quiz_started(items: &[VocabularyEntry]) -> Payload {
    let mut text = String::from("<b>🧩 Викторина началась!</b>\n\n");
    text.push_str(&format!("Ответьте на {} вопросов:\n\n", items.len()));
    for (i, item) in items.iter().enumerate() {
        text.push_str(&format!(
            "{}. Как переводится <code>{}</code>?\n",
            i + 1,
            html_escape(&item.source_word)
        ));
    }
    text.push_str("\nНапишите ответы в формате: <code>1. перевод, 2. перевод, ...</code>");
    Payload::rich(text)
}

pub fn quiz_result(report: &QuizReport) -> Payload {
    let mut text = String::from("<b>🧩 Результаты викторины:</b>\n\n");
    for line in &report.lines {
        if line.correct {
            text.push_str(&format!(
                "✅ {}. <code>{}</code> - {}\n",
                line.position,
                html_escape(&line.source_word),
                html_escape(&line.expected)
            ));
        } else {
            text.push_str(&format!(
                "❌ {}. <code>{}</code> - {} (вы: {})\n",
                line.position,
                html_escape(&line.source_word),
                html_escape(&line.expected),
                html_escape(&line.given)
            ));
        }
    }

    text.push_str(&format!("\n<b>Результат: {}/{}</b>\n", report.score, report.out_of()));
    text.push_str(match report.tier() {
        ScoreTier::Perfect => "🎉 Отлично! Вы настоящий знаток!",
        ScoreTier::Good => "👍 Хорошо! Продолжайте в том же духе!",
        ScoreTier::KeepPracticing => "📚 Есть куда расти! Попробуйте еще раз!",
    });
    Payload::rich(text)
}

pub fn quiz_not_started() -> Payload {
    Payload::plain("Сначала начните викторину командой /quiz")
}

pub fn not_enough_words(required: usize, available: usize) -> Payload {
    Payload::plain(format!(
        "Недостаточно слов для викторины: нужно {}, доступно {}. Попробуйте /word или /train.",
        required, available
    ))
}

pub fn no_content() -> Payload {
    Payload::plain("Словарь пуст. Загляните позже!")
}

pub fn training_started(entry: &VocabularyEntry) -> Payload {
    Payload::rich(format!(
        "<b>🏋️ Режим тренировки</b>\n\n\
         Переведите слово на межславянский:\n\n\
         <b>{}</b>\n\n\
         Напишите ваш ответ в чат!\n\n\
         💡 <i>Пример: если видите \"дом\", напишите \"dom\"</i>",
        html_escape(&entry.translation)
    ))
}

pub fn training_result(result: &TrainingResult) -> Payload {
    let word = &result.word;
    let mut text = if result.correct {
        format!(
            "✅ <b>Правильно!</b>\n<code>{}</code> - {}\n\n<i>{}</i>",
            html_escape(&word.source_word),
            html_escape(&word.translation),
            html_escape(&word.example)
        )
    } else {
        format!(
            "❌ <b>Почти правильно!</b>\nПравильный ответ: <code>{}</code> - {}\nВаш ответ: {}\n\n<i>{}</i>",
            html_escape(&word.source_word),
            html_escape(&word.translation),
            html_escape(&result.answer),
            html_escape(&word.example)
        )
    };
    text.push_str("\n\n🎯 Хотите продолжить? Используйте /train");
    Payload::rich(text)
}

pub fn progress(quizzes_completed: u32, words_seen: usize, vocabulary_size: usize) -> Payload {
    let activity = if words_seen > 10 {
        "🔥 Очень активен"
    } else {
        "📈 Начинающий"
    };
    Payload::rich(format!(
        "<b>📊 Ваш прогресс</b>\n\n\
         📚 Изучено слов: {}/{}\n\
         🧩 Пройдено викторин: {}\n\
         🎯 Активность: {}\n\n\
         Продолжайте в том же духе! 🚀",
        words_seen, vocabulary_size, quizzes_completed, activity
    ))
}

pub fn unknown_command() -> Payload {
    Payload::plain("Неизвестная команда. Используйте /help для списка команд.")
}

pub fn fallback(name: &str) -> Payload {
    Payload::rich(format!(
        "Привет, {}! 👋 Используйте команды:\n\
         /word - изучить слово\n\
         /help - список команд\n\
         /about - о языке",
        html_escape(name)
    ))
}
