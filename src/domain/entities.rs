//! Domain entities. Pure data structures for the core business.
//!
//! Chats and messages mirror the Avito messenger payloads: the fields the core reads are
//! typed, everything else is kept verbatim in `extra` so persisted metadata round-trips.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Author id the API uses for system/bot entries.
pub const SYSTEM_AUTHOR_ID: i64 = 0;

/// A chat (dialog) as returned by the chat-list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChat {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<ChatUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ChatContext>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawChat {
    /// Account owner of this chat (`context.value.user_id`), if the API supplied one.
    pub fn seller_id(&self) -> Option<i64> {
        self.context
            .as_ref()
            .and_then(|c| c.value.as_ref())
            .and_then(|v| v.user_id)
    }

    /// Display name of a participant from the chat's roster.
    pub fn user_name(&self, user_id: i64) -> Option<&str> {
        self.users
            .iter()
            .find(|u| u.id == Some(user_id))
            .and_then(|u| u.name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

/// Participant entry of a chat's `users` roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What the chat is about (usually an item listing).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ContextValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextValue {
    /// Owner of the listing, i.e. the seller account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single message from a chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawMessage {
    /// Text body; `None` for non-text types and for empty strings.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|c| c.text.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// Timestamp used for ordering; undated messages sort as epoch 0.
    pub fn created_or_epoch(&self) -> i64 {
        self.created.unwrap_or(0)
    }

    pub fn is_system(&self) -> bool {
        self.author_id == Some(SYSTEM_AUTHOR_ID)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One ingested chat: metadata plus the messages that fell inside the reporting window.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRecord {
    pub dialog_id: String,
    pub dialog: RawChat,
    pub messages: Vec<RawMessage>,
}

impl ChatRecord {
    pub fn has_system_messages(&self) -> bool {
        self.messages.iter().any(RawMessage::is_system)
    }
}

/// Ingestion output keyed by chat id. Inserting an existing id overwrites it.
pub type ChatStore = BTreeMap<String, ChatRecord>;

/// Classification outcome for one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Target,
    NonTarget,
    Ambiguous,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Target, Label::NonTarget, Label::Ambiguous];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Target => "target",
            Label::NonTarget => "non_target",
            Label::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled chat, ready to be written to the results files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedChat {
    pub dialog_id: String,
    pub dialog: RawChat,
    pub text_sample: String,
    pub label: Label,
}

/// Whether a paginated resource was read to its natural end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchStatus {
    Complete,
    /// Pagination stopped early on an error; the items gathered so far are kept.
    Partial { reason: String },
}

impl FetchStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, FetchStatus::Complete)
    }
}
