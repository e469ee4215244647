//! Renders a chat's messages into a single plain-text transcript.
//!
//! Pure: the same messages (in any input order) always produce the same text.

use crate::domain::{RawChat, RawMessage};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

/// Author label for messages written by the account owner.
pub const OWNER_LABEL: &str = "🏢 Менеджер";
/// Prefix for every other participant.
pub const COUNTERPART_MARKER: &str = "👤";

/// Seller id used when the chat metadata does not name one. Matches no author.
pub const UNKNOWN_SELLER_ID: i64 = -1;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rendered transcript plus the chronologically sorted messages it was built from.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub messages: Vec<RawMessage>,
}

/// Stable sort by `created`; undated messages come first in their original relative order.
pub fn sort_chronologically(messages: &[RawMessage]) -> Vec<RawMessage> {
    let mut sorted = messages.to_vec();
    sorted.sort_by_key(RawMessage::created_or_epoch);
    sorted
}

/// Build the transcript for `chat`, rendering timestamps in local time.
pub fn build_transcript(chat: &RawChat, messages: &[RawMessage], seller_id: i64) -> Transcript {
    build_transcript_in(chat, messages, seller_id, &Local)
}

/// Build the transcript for `chat`, rendering timestamps in `tz`.
pub fn build_transcript_in<Tz>(
    chat: &RawChat,
    messages: &[RawMessage],
    seller_id: i64,
    tz: &Tz,
) -> Transcript
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let sorted = sort_chronologically(messages);
    let mut text = String::new();
    for msg in &sorted {
        let Some(body) = msg.text() else {
            continue;
        };
        text.push_str(&format!(
            "[{}] {}: {}\n",
            format_timestamp(msg.created, tz),
            author_label(chat, msg.author_id, seller_id),
            body
        ));
    }
    text.truncate(text.trim_end().len());
    Transcript {
        text,
        messages: sorted,
    }
}

fn author_label(chat: &RawChat, author_id: Option<i64>, seller_id: i64) -> String {
    match author_id {
        Some(id) if id == seller_id => OWNER_LABEL.to_string(),
        Some(id) => match chat.user_name(id) {
            Some(name) => format!("{} {}", COUNTERPART_MARKER, name),
            None => format!("{} User_{}", COUNTERPART_MARKER, id),
        },
        None => format!("{} User_unknown", COUNTERPART_MARKER),
    }
}

/// Missing and zero timestamps render as an empty string.
fn format_timestamp<Tz>(created: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    created
        .filter(|&ts| ts != 0)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}
