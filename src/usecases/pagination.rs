//! Offset/limit pagination with partial-result semantics.
//!
//! - Pages are requested strictly in sequence, starting at offset 0
//! - An empty page ends the collection; optionally a short page does too
//! - `400 Bad Request` counts as "no more pages"
//! - Any other error stops and keeps what was gathered (`FetchStatus::Partial`)
//! - One attempt per page, no retries

use crate::domain::{DomainError, FetchStatus};
use std::future::Future;
use tracing::{debug, warn};

/// Chat listing: 50 per page, offsets up to and including 1000.
pub const CHAT_PAGE_SIZE: u32 = 50;
pub const CHAT_MAX_OFFSET: u32 = 1000;

/// Message listing: 100 per page, stops on the first short page.
pub const MESSAGE_PAGE_SIZE: u32 = 100;

/// How one collection is paged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    pub limit: u32,
    /// Last offset that may be requested. `None` = unbounded.
    pub max_offset: Option<u32>,
    /// Treat a page shorter than `limit` as the final one.
    pub stop_on_short_page: bool,
}

impl PagePolicy {
    pub fn chats() -> Self {
        Self {
            limit: CHAT_PAGE_SIZE,
            max_offset: Some(CHAT_MAX_OFFSET),
            stop_on_short_page: false,
        }
    }

    pub fn messages() -> Self {
        Self {
            limit: MESSAGE_PAGE_SIZE,
            max_offset: None,
            stop_on_short_page: true,
        }
    }
}

/// Everything collected, and whether the collection ran to its end.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub status: FetchStatus,
    pub pages: usize,
}

/// Collect all pages. `fetch_page(limit, offset)` performs one request.
///
/// `resource` names the collection in log lines.
pub async fn fetch_all_pages<T, F, Fut>(
    policy: PagePolicy,
    resource: &str,
    mut fetch_page: F,
) -> Paged<T>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, DomainError>>,
{
    let limit = policy.limit.max(1);
    let mut items = Vec::new();
    let mut offset = 0u32;
    let mut pages = 0usize;

    let status = loop {
        if policy.max_offset.is_some_and(|max| offset > max) {
            debug!(resource, offset, "offset cap reached");
            break FetchStatus::Complete;
        }

        let batch = match fetch_page(limit, offset).await {
            Ok(batch) => batch,
            Err(e) if e.is_end_of_pages() => {
                debug!(resource, offset, "bad request, treating as last page");
                break FetchStatus::Complete;
            }
            Err(e) => {
                warn!(
                    resource,
                    offset,
                    collected = items.len(),
                    error = %e,
                    "pagination stopped early"
                );
                break FetchStatus::Partial {
                    reason: e.to_string(),
                };
            }
        };

        if batch.is_empty() {
            break FetchStatus::Complete;
        }
        pages += 1;
        let short = batch.len() < limit as usize;
        items.extend(batch);

        if policy.stop_on_short_page && short {
            break FetchStatus::Complete;
        }
        offset = match offset.checked_add(limit) {
            Some(next) => next,
            None => break FetchStatus::Complete,
        };
    };

    Paged {
        items,
        status,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn transient(status: u16) -> DomainError {
        DomainError::TransientFetch {
            status: Some(status),
            message: "boom".into(),
        }
    }

    /// Serves `total` numbered items; records requested offsets.
    fn source(total: u32) -> (RefCell<Vec<u32>>, impl Fn(u32, u32) -> Vec<u32>) {
        let calls = RefCell::new(Vec::new());
        let serve = move |limit: u32, offset: u32| (offset..total.min(offset + limit)).collect();
        (calls, serve)
    }

    #[tokio::test]
    async fn test_messages_stop_on_short_page() {
        let (calls, serve) = source(250);
        let paged = fetch_all_pages(PagePolicy::messages(), "messages", |limit, offset| {
            calls.borrow_mut().push(offset);
            let page = serve(limit, offset);
            async move { Ok(page) }
        })
        .await;
        assert_eq!(paged.items.len(), 250);
        assert_eq!(paged.status, FetchStatus::Complete);
        assert_eq!(*calls.borrow(), vec![0, 100, 200]);
        assert_eq!(paged.pages, 3);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_empty_page() {
        let (calls, serve) = source(200);
        let paged = fetch_all_pages(PagePolicy::messages(), "messages", |limit, offset| {
            calls.borrow_mut().push(offset);
            let page = serve(limit, offset);
            async move { Ok(page) }
        })
        .await;
        assert_eq!(paged.items.len(), 200);
        assert_eq!(*calls.borrow(), vec![0, 100, 200]);
    }

    #[tokio::test]
    async fn test_chats_ignore_short_pages() {
        // Short pages in the middle do not end chat listing; only an empty page does.
        let pages: Vec<Vec<u32>> = vec![vec![1; 50], vec![2; 10], vec![3; 50], vec![]];
        let calls = RefCell::new(Vec::new());
        let paged = fetch_all_pages(PagePolicy::chats(), "chats", |_, offset| {
            calls.borrow_mut().push(offset);
            let page = pages.get((offset / 50) as usize).cloned().unwrap_or_default();
            async move { Ok(page) }
        })
        .await;
        assert_eq!(paged.items.len(), 110);
        assert_eq!(*calls.borrow(), vec![0, 50, 100, 150]);
    }

    #[tokio::test]
    async fn test_chat_offset_cap() {
        let calls = RefCell::new(Vec::new());
        let paged = fetch_all_pages(PagePolicy::chats(), "chats", |limit, offset| {
            calls.borrow_mut().push(offset);
            async move { Ok(vec![offset; limit as usize]) }
        })
        .await;
        let calls = calls.into_inner();
        assert_eq!(calls.first(), Some(&0));
        assert_eq!(calls.last(), Some(&1000));
        assert_eq!(calls.len(), 21);
        assert_eq!(paged.items.len(), 21 * 50);
        assert!(paged.status.is_complete());
    }

    #[tokio::test]
    async fn test_error_keeps_partial_result() {
        let paged = fetch_all_pages(PagePolicy::messages(), "messages", |limit, offset| async move {
            if offset == 0 {
                Ok(vec![0u8; limit as usize])
            } else {
                Err(transient(503))
            }
        })
        .await;
        assert_eq!(paged.items.len(), 100);
        match paged.status {
            FetchStatus::Partial { reason } => assert!(reason.contains("503")),
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_request_is_end_of_pages() {
        let paged = fetch_all_pages(PagePolicy::chats(), "chats", |limit, offset| async move {
            if offset < 100 {
                Ok(vec![1u8; limit as usize])
            } else {
                Err(transient(400))
            }
        })
        .await;
        assert_eq!(paged.items.len(), 100);
        assert_eq!(paged.status, FetchStatus::Complete);
    }

    #[tokio::test]
    async fn test_first_page_failure_is_empty_partial() {
        let paged: Paged<u8> = fetch_all_pages(PagePolicy::messages(), "messages", |_, _| async {
            Err(DomainError::TransientFetch {
                status: None,
                message: "timeout".into(),
            })
        })
        .await;
        assert!(paged.items.is_empty());
        assert!(!paged.status.is_complete());
        assert_eq!(paged.pages, 0);
    }
}
