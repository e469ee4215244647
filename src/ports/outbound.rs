//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{AnalyzedChat, ChatRecord, ChatStore, DomainError, RawChat, RawMessage};

/// Messenger API gateway. Account lookup and one page of chats/messages per call.
///
/// Page calls make exactly one request; pagination and error tolerance live in the use case.
#[async_trait::async_trait]
pub trait MessengerGateway: Send + Sync {
    /// Id of the account the credentials belong to.
    async fn get_account_id(&self) -> Result<i64, DomainError>;

    /// One page of the account's chats.
    async fn list_chats(
        &self,
        account_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawChat>, DomainError>;

    /// One page of a chat's messages.
    async fn list_messages(
        &self,
        account_id: i64,
        chat_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawMessage>, DomainError>;
}

/// Chat store as read back from disk. Records that fail to decode are reported separately.
#[derive(Debug, Default)]
pub struct LoadedStore {
    pub records: Vec<ChatRecord>,
    pub rejected: Vec<DomainError>,
}

/// Persistence of the ingestion output (`{chat_id: {chat_meta, messages}}`).
#[async_trait::async_trait]
pub trait ChatStorePort: Send + Sync {
    async fn save_store(&self, store: &ChatStore) -> Result<(), DomainError>;

    async fn load_store(&self) -> Result<LoadedStore, DomainError>;
}

/// Persistence of classification results (structured and tabular).
#[async_trait::async_trait]
pub trait ResultsPort: Send + Sync {
    async fn save_results(&self, results: &[AnalyzedChat]) -> Result<(), DomainError>;
}

/// Progress reporting while chats are fetched. Called from the collector only.
pub trait FetchProgress: Send + Sync {
    fn start(&self, total_chats: usize);

    fn chat_done(&self, chat_id: &str, kept_messages: usize);

    fn finish(&self);
}
