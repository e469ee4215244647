//! Lead heuristic: keyword and length rules over a rendered transcript.
//!
//! Matching is unanchored substring search on the lower-cased text, so a keyword inside a
//! longer word still counts.

use crate::domain::{Label, RawMessage};
use std::collections::BTreeSet;

/// Phrases that mark a chat as interesting to a seller.
pub const DEFAULT_INCLUSION_KEYWORDS: &[&str] = &[
    "цена",
    "стоимость",
    "интересует",
    "хочу",
    "можно",
    "делаете",
    "заказать",
    "срок",
    "возможно",
    "оформить",
    "услуга",
    "помощь",
    "прайс",
    "нужно",
    "подскажите",
    "сделать",
    "звонок",
    "созвон",
    "номер",
    "контакт",
    "свяжитесь",
    "написать",
    "позвонить",
    "рассчитать",
    "расчет",
    "маркировка",
    "помогите",
    "оформление",
    "отправить",
    "скинуть",
    "код",
    "киз",
    "честный знак",
    "делаете ли вы",
    "итого к оплате",
    "тг",
    "вотсап",
    "телефон",
    "звонить",
    "+7",
    // All-Cyrillic; the original list had a Latin "c" here and never matched.
    "сумма",
    "руб",
    "оплату произвел",
    "оплатил",
];

/// Phrases that rule a chat out (job applications, refusals).
pub const DEFAULT_EXCLUSION_PHRASES: &[&str] =
    &["резюме", "кандидат проходит интервью", "не можем"];

pub const MIN_KEYWORD_MATCHES: usize = 2;
pub const MIN_TEXT_LENGTH: usize = 80;
pub const MIN_MESSAGE_COUNT: usize = 3;
pub const MIN_CLIENT_MESSAGES: usize = 2;

/// Keyword sets and thresholds. Immutable once handed to a [`Classifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub inclusion_keywords: Vec<String>,
    pub exclusion_phrases: Vec<String>,
    /// Distinct inclusion keywords needed for the keyword rule.
    pub min_keyword_matches: usize,
    /// Transcript must be strictly longer than this (in characters).
    pub min_text_length: usize,
    /// Message count must be strictly greater than this for the volume rule.
    pub min_message_count: usize,
    /// Fewer texted counterpart messages than this always yields `Ambiguous`.
    pub min_client_messages: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            inclusion_keywords: DEFAULT_INCLUSION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            exclusion_phrases: DEFAULT_EXCLUSION_PHRASES.iter().map(|s| s.to_string()).collect(),
            min_keyword_matches: MIN_KEYWORD_MATCHES,
            min_text_length: MIN_TEXT_LENGTH,
            min_message_count: MIN_MESSAGE_COUNT,
            min_client_messages: MIN_CLIENT_MESSAGES,
        }
    }
}

/// Pure decision function over one transcript.
#[derive(Debug, Clone)]
pub struct Classifier {
    inclusion: BTreeSet<String>,
    exclusion: Vec<String>,
    config: ClassifierConfig,
}

impl Classifier {
    /// Keywords are lower-cased and de-duplicated here; empty entries are ignored.
    pub fn new(config: ClassifierConfig) -> Self {
        let inclusion = normalize(&config.inclusion_keywords).into_iter().collect();
        let exclusion = normalize(&config.exclusion_phrases);
        Self {
            inclusion,
            exclusion,
            config,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Label a transcript. `messages` are the chat's messages (all of them, texted or not);
    /// `seller_id` identifies the account owner.
    pub fn classify(&self, transcript: &str, messages: &[RawMessage], seller_id: i64) -> Label {
        let lowered = transcript.to_lowercase();
        let length = lowered.chars().count();
        let long_enough = length > self.config.min_text_length;
        let excluded = self.exclusion.iter().any(|p| lowered.contains(p.as_str()));

        let busy = messages.len() > self.config.min_message_count;
        let keyword_hits = self
            .inclusion
            .iter()
            .filter(|k| lowered.contains(k.as_str()))
            .count();
        let keyworded = keyword_hits >= self.config.min_keyword_matches;

        let mut label = if !excluded && long_enough && (busy || keyworded) {
            Label::Target
        } else if excluded {
            Label::NonTarget
        } else {
            Label::Ambiguous
        };

        if client_message_count(messages, seller_id) < self.config.min_client_messages {
            label = Label::Ambiguous;
        }
        label
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Messages with text written by anyone other than the account owner.
pub fn client_message_count(messages: &[RawMessage], seller_id: i64) -> usize {
    messages
        .iter()
        .filter(|m| m.author_id != Some(seller_id) && m.text().is_some())
        .count()
}

fn normalize(phrases: &[String]) -> Vec<String> {
    phrases
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}
