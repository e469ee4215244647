//! Implements ChatStorePort with one JSON file.
//!
//! Layout: `{chat_id: {"chat_meta": {...}, "messages": [...]}}`. This file is the hand-off
//! between `fetch` and `classify`, which may run as separate processes.

use crate::adapters::persistence::atomic::write_atomic;
use crate::domain::{ChatRecord, ChatStore, DomainError, RawChat, RawMessage};
use crate::ports::{ChatStorePort, LoadedStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Default file name inside the data directory.
pub const CHAT_STORE_FILE: &str = "avito_chats.json";

#[derive(Serialize)]
struct StoredChatRef<'a> {
    chat_meta: &'a RawChat,
    messages: &'a [RawMessage],
}

#[derive(Deserialize)]
struct StoredChat {
    #[serde(default)]
    chat_meta: Option<RawChat>,
    messages: Vec<RawMessage>,
}

/// JSON file-based chat store.
pub struct JsonChatStore {
    path: PathBuf,
}

impl JsonChatStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store at `<data_dir>/avito_chats.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(CHAT_STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Decode one entry. A missing `chat_meta` falls back to a bare chat with the key as id.
fn decode_record(chat_id: String, value: Value) -> Result<ChatRecord, DomainError> {
    let stored: StoredChat =
        serde_json::from_value(value).map_err(|e| DomainError::MalformedChatShape {
            chat_id: chat_id.clone(),
            reason: e.to_string(),
        })?;
    let dialog = stored.chat_meta.unwrap_or_else(|| RawChat {
        id: chat_id.clone(),
        ..Default::default()
    });
    Ok(ChatRecord {
        dialog_id: chat_id,
        dialog,
        messages: stored.messages,
    })
}

#[async_trait::async_trait]
impl ChatStorePort for JsonChatStore {
    async fn save_store(&self, store: &ChatStore) -> Result<(), DomainError> {
        let view: BTreeMap<&str, StoredChatRef<'_>> = store
            .iter()
            .map(|(id, record)| {
                (
                    id.as_str(),
                    StoredChatRef {
                        chat_meta: &record.dialog,
                        messages: &record.messages,
                    },
                )
            })
            .collect();
        let json = serde_json::to_string_pretty(&view)
            .map_err(|e| DomainError::Persistence(e.to_string()))?;
        write_atomic(&self.path, json.as_bytes()).await?;
        info!(path = %self.path.display(), dialogs = store.len(), "chat store written");
        Ok(())
    }

    async fn load_store(&self) -> Result<LoadedStore, DomainError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DomainError::Persistence(format!(
                    "{} not found (run `fetch` first)",
                    self.path.display()
                )));
            }
            Err(e) => return Err(DomainError::Persistence(e.to_string())),
        };
        let entries: Map<String, Value> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::Persistence(format!("{} is not a chat map: {}", self.path.display(), e))
        })?;

        let mut loaded = LoadedStore::default();
        for (chat_id, value) in entries {
            match decode_record(chat_id, value) {
                Ok(record) => loaded.records.push(record),
                Err(e) => {
                    warn!(error = %e, "skipping chat record");
                    loaded.rejected.push(e);
                }
            }
        }
        info!(
            path = %self.path.display(),
            records = loaded.records.len(),
            rejected = loaded.rejected.len(),
            "chat store loaded"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageContent;

    fn record(id: &str, texts: &[&str]) -> ChatRecord {
        ChatRecord {
            dialog_id: id.to_string(),
            dialog: RawChat {
                id: id.to_string(),
                created: Some(1704067200),
                ..Default::default()
            },
            messages: texts
                .iter()
                .map(|t| RawMessage {
                    author_id: Some(3),
                    created: Some(1704067300),
                    content: Some(MessageContent {
                        text: Some(t.to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonChatStore::in_dir(dir.path());
        let mut store = ChatStore::new();
        store.insert("b".into(), record("b", &["привет"]));
        store.insert("a".into(), record("a", &["one", "two"]));

        repo.save_store(&store).await.unwrap();
        let loaded = repo.load_store().await.unwrap();

        assert!(loaded.rejected.is_empty());
        let ids: Vec<&str> = loaded.records.iter().map(|r| r.dialog_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(loaded.records[0], store["a"]);
        assert_eq!(loaded.records[1], store["b"]);
    }

    #[tokio::test]
    async fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonChatStore::in_dir(dir.path());
        let mut store = ChatStore::new();
        store.insert("c1".into(), record("c1", &["hi"]));
        repo.save_store(&store).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join(CHAT_STORE_FILE)).unwrap();
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["c1"]["chat_meta"]["id"], "c1");
        assert_eq!(json["c1"]["messages"][0]["content"]["text"], "hi");
    }

    #[tokio::test]
    async fn test_malformed_records_are_rejected_individually() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chats.json");
        std::fs::write(
            &path,
            r#"{
                "ok": {"chat_meta": {"id": "ok"}, "messages": [{"author_id": 1}]},
                "no_meta": {"messages": []},
                "no_messages": {"chat_meta": {"id": "no_messages"}},
                "wrong_type": {"chat_meta": {"id": "wrong_type"}, "messages": "nope"}
            }"#,
        )
        .unwrap();

        let loaded = JsonChatStore::new(&path).load_store().await.unwrap();
        let mut ids: Vec<&str> = loaded.records.iter().map(|r| r.dialog_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["no_meta", "ok"]);
        let no_meta = loaded.records.iter().find(|r| r.dialog_id == "no_meta").unwrap();
        assert_eq!(no_meta.dialog.id, "no_meta");
        assert!(no_meta.messages.is_empty());
        assert_eq!(loaded.rejected.len(), 2);
        assert!(loaded
            .rejected
            .iter()
            .all(|e| matches!(e, DomainError::MalformedChatShape { .. })));
    }

    #[tokio::test]
    async fn test_missing_or_invalid_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = JsonChatStore::in_dir(dir.path()).load_store().await;
        assert!(matches!(missing, Err(DomainError::Persistence(_))));

        let path = dir.path().join("list.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let invalid = JsonChatStore::new(&path).load_store().await;
        assert!(matches!(invalid, Err(DomainError::Persistence(_))));
    }
}
