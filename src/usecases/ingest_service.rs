//! Chat ingestion: list chats -> keep those created in the window -> fetch every chat's
//! messages concurrently -> keep messages in the window -> save.
//!
//! - Bounded pool (`JoinSet` + `Semaphore`); submission follows chat-list order
//! - Each worker returns its chat's result; only the collector touches the store
//! - A worker sleeps the pacing delay after its chat, still holding its pool slot
//! - A failing chat never aborts the batch: it keeps whatever pages it got

use crate::domain::{
    ChatRecord, ChatStore, DomainError, FetchStatus, RawChat, RawMessage, TimeWindow,
};
use crate::ports::{ChatStorePort, FetchProgress, MessengerGateway};
use crate::usecases::pagination::{PagePolicy, fetch_all_pages};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Concurrent message fetches.
pub const DEFAULT_CONCURRENCY: usize = 10;
/// Per-worker pause after each chat (remote rate limit).
pub const DEFAULT_PACING_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub concurrency: usize,
    pub pacing: Duration,
    pub chat_policy: PagePolicy,
    pub message_policy: PagePolicy,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            pacing: Duration::from_millis(DEFAULT_PACING_MS),
            chat_policy: PagePolicy::chats(),
            message_policy: PagePolicy::messages(),
        }
    }
}

/// Outcome of one chat's message fetch.
#[derive(Debug, Clone)]
pub struct ChatFetchReport {
    pub chat_id: String,
    /// Messages returned by the API, before window filtering.
    pub fetched: usize,
    /// Messages inside the window. Zero means the chat was not stored.
    pub kept: usize,
    pub status: FetchStatus,
}

impl ChatFetchReport {
    pub fn stored(&self) -> bool {
        self.kept > 0
    }
}

/// Result of an ingestion pass.
#[derive(Debug)]
pub struct IngestReport {
    pub account_id: i64,
    /// Chats returned by the chat listing.
    pub chats_listed: usize,
    /// Chats whose `created` falls in the window.
    pub chats_in_window: usize,
    pub chat_list_status: FetchStatus,
    /// One entry per chat in the window, in completion order.
    pub chats: Vec<ChatFetchReport>,
    pub store: ChatStore,
}

impl IngestReport {
    pub fn partial_chats(&self) -> usize {
        self.chats.iter().filter(|c| !c.status.is_complete()).count()
    }
}

/// Worker output for one chat.
struct ChatFetch {
    chat: RawChat,
    fetched: usize,
    messages: Vec<RawMessage>,
    status: FetchStatus,
}

/// Ingestion coordinator.
pub struct IngestService {
    gateway: Arc<dyn MessengerGateway>,
    store: Arc<dyn ChatStorePort>,
    settings: IngestSettings,
    progress: Option<Arc<dyn FetchProgress>>,
}

impl IngestService {
    pub fn new(
        gateway: Arc<dyn MessengerGateway>,
        store: Arc<dyn ChatStorePort>,
        settings: IngestSettings,
    ) -> Self {
        Self {
            gateway,
            store,
            settings,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn FetchProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run one ingestion pass for `window`. Saves the store, then returns it with per-chat status.
    ///
    /// Fails only when the account lookup or the final save fails.
    pub async fn ingest(&self, window: &TimeWindow) -> Result<IngestReport, DomainError> {
        let account_id = self.gateway.get_account_id().await?;
        info!(account_id, "resolved account");

        let gateway = &self.gateway;
        let listed = fetch_all_pages(self.settings.chat_policy, "chats", |limit, offset| {
            gateway.list_chats(account_id, limit, offset)
        })
        .await;
        let chats_listed = listed.items.len();
        let chats: Vec<RawChat> = listed
            .items
            .into_iter()
            .filter(|c| window.contains_opt(c.created))
            .collect();
        info!(
            listed = chats_listed,
            pages = listed.pages,
            in_window = chats.len(),
            start_ts = window.start_ts(),
            end_ts = window.end_ts(),
            "found {} chats in period",
            chats.len()
        );
        let chats_in_window = chats.len();

        let (store, reports) = self.fetch_messages(account_id, chats, *window).await;

        self.store.save_store(&store).await?;
        info!(dialogs = store.len(), "saved dialogs");

        Ok(IngestReport {
            account_id,
            chats_listed,
            chats_in_window,
            chat_list_status: listed.status,
            chats: reports,
            store,
        })
    }

    async fn fetch_messages(
        &self,
        account_id: i64,
        chats: Vec<RawChat>,
        window: TimeWindow,
    ) -> (ChatStore, Vec<ChatFetchReport>) {
        let permits = self.settings.concurrency.clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut set = JoinSet::new();

        if let Some(p) = &self.progress {
            p.start(chats.len());
        }

        for chat in chats {
            let gateway = Arc::clone(&self.gateway);
            let sem = Arc::clone(&semaphore);
            let policy = self.settings.message_policy;
            let pacing = self.settings.pacing;
            set.spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                let fetch = fetch_chat(&*gateway, account_id, chat, policy, &window).await;
                if !pacing.is_zero() {
                    tokio::time::sleep(pacing).await;
                }
                fetch
            });
        }

        let mut store = ChatStore::new();
        let mut reports = Vec::new();
        while let Some(joined) = set.join_next().await {
            let fetch = match joined {
                Ok(fetch) => fetch,
                Err(e) => {
                    error!(error = %e, "chat fetch task failed");
                    continue;
                }
            };
            let chat_id = fetch.chat.id.clone();
            let kept = fetch.messages.len();

            if let FetchStatus::Partial { reason } = &fetch.status {
                warn!(
                    chat_id = %chat_id,
                    fetched = fetch.fetched,
                    reason = %reason,
                    "messages incomplete"
                );
            }
            if kept > 0 {
                info!(chat_id = %chat_id, kept, "chat {}: {} messages in period", chat_id, kept);
                store.insert(
                    chat_id.clone(),
                    ChatRecord {
                        dialog_id: chat_id.clone(),
                        dialog: fetch.chat,
                        messages: fetch.messages,
                    },
                );
            } else {
                info!(
                    chat_id = %chat_id,
                    fetched = fetch.fetched,
                    "chat {}: no messages in period, skipped",
                    chat_id
                );
            }
            if let Some(p) = &self.progress {
                p.chat_done(&chat_id, kept);
            }
            reports.push(ChatFetchReport {
                chat_id,
                fetched: fetch.fetched,
                kept,
                status: fetch.status,
            });
        }

        if let Some(p) = &self.progress {
            p.finish();
        }
        (store, reports)
    }
}

/// Fetch all of one chat's messages and keep those dated inside `window`.
async fn fetch_chat(
    gateway: &dyn MessengerGateway,
    account_id: i64,
    chat: RawChat,
    policy: PagePolicy,
    window: &TimeWindow,
) -> ChatFetch {
    let chat_id = chat.id.as_str();
    let paged = fetch_all_pages(policy, "messages", |limit, offset| {
        gateway.list_messages(account_id, chat_id, limit, offset)
    })
    .await;
    let fetched = paged.items.len();
    debug!(chat_id, fetched, pages = paged.pages, "messages fetched");
    let messages: Vec<RawMessage> = paged
        .items
        .into_iter()
        .filter(|m| window.contains_opt(m.created))
        .collect();
    ChatFetch {
        chat,
        fetched,
        messages,
        status: paged.status,
    }
}
