//! Implements MessengerGateway over the Avito REST API.
//!
//! Each call is a single GET. Non-2xx responses become `TransientFetch` carrying the HTTP
//! status so the pagination loop can tell an end-of-pages 400 from a real failure.

use crate::adapters::avito::auth::{Credentials, fetch_access_token};
use crate::domain::{DomainError, RawChat, RawMessage};
use crate::ports::MessengerGateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.avito.ru";

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    id: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ChatsResponse {
    #[serde(default)]
    chats: Vec<RawChat>,
}

#[derive(Debug, Default, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<RawMessage>,
}

/// Authenticated Avito messenger client.
pub struct AvitoClient {
    client: Client,
    base_url: String,
    token: String,
}

impl AvitoClient {
    /// Client with an already issued token.
    pub fn new(base_url: impl Into<String>, token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Exchange credentials for a token and build the client.
    pub async fn connect(base_url: &str, credentials: &Credentials) -> Result<Self, DomainError> {
        let client = Client::new();
        let token = fetch_access_token(&client, base_url, credentials).await?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn profile_url(&self) -> String {
        format!("{}/core/v1/accounts/self", self.base_url)
    }

    fn chats_url(&self, account_id: i64) -> String {
        format!("{}/messenger/v2/accounts/{}/chats", self.base_url, account_id)
    }

    fn messages_url(&self, account_id: i64, chat_id: &str) -> String {
        format!(
            "{}/messenger/v3/accounts/{}/chats/{}/messages",
            self.base_url, account_id, chat_id
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, u32)],
    ) -> Result<T, DomainError> {
        debug!(url, ?query, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| DomainError::TransientFetch {
                status: None,
                message: format!("HTTP request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if status.as_u16() != 400 {
                warn!(status = %status, url, "messenger API returned error");
            }
            return Err(DomainError::TransientFetch {
                status: Some(status.as_u16()),
                message: text.chars().take(200).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::TransientFetch {
                status: None,
                message: format!("Failed to parse API response: {}", e),
            })
    }
}

#[async_trait]
impl MessengerGateway for AvitoClient {
    async fn get_account_id(&self) -> Result<i64, DomainError> {
        let profile: ProfileResponse = self
            .get_json(&self.profile_url(), &[])
            .await
            .map_err(|e| DomainError::Auth(format!("Profile lookup failed: {}", e)))?;
        Ok(profile.id)
    }

    async fn list_chats(
        &self,
        account_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawChat>, DomainError> {
        let page: ChatsResponse = self
            .get_json(
                &self.chats_url(account_id),
                &[("limit", limit), ("offset", offset)],
            )
            .await?;
        Ok(page.chats)
    }

    async fn list_messages(
        &self,
        account_id: i64,
        chat_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawMessage>, DomainError> {
        let page: MessagesResponse = self
            .get_json(
                &self.messages_url(account_id, chat_id),
                &[("limit", limit), ("offset", offset)],
            )
            .await?;
        Ok(page.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let client = AvitoClient::new("https://api.avito.ru/", "t".into());
        assert_eq!(client.profile_url(), "https://api.avito.ru/core/v1/accounts/self");
        assert_eq!(
            client.chats_url(42),
            "https://api.avito.ru/messenger/v2/accounts/42/chats"
        );
        assert_eq!(
            client.messages_url(42, "u2i-abc"),
            "https://api.avito.ru/messenger/v3/accounts/42/chats/u2i-abc/messages"
        );
    }

    #[test]
    fn test_chats_page_decoding() {
        let page: ChatsResponse = serde_json::from_str(
            r#"{"chats": [{"id": "c1", "created": 1704067200, "users": [{"id": 5, "name": "Иван"}],
                "context": {"type": "item", "value": {"user_id": 5, "title": "Маркировка"}}}],
                "meta": {"has_more": true}}"#,
        )
        .unwrap();
        assert_eq!(page.chats.len(), 1);
        assert_eq!(page.chats[0].id, "c1");
        assert_eq!(page.chats[0].seller_id(), Some(5));
        assert_eq!(page.chats[0].user_name(5), Some("Иван"));
    }

    #[test]
    fn test_missing_list_key_is_empty_page() {
        let chats: ChatsResponse = serde_json::from_str("{}").unwrap();
        assert!(chats.chats.is_empty());
        let messages: MessagesResponse = serde_json::from_str(r#"{"meta": {}}"#).unwrap();
        assert!(messages.messages.is_empty());
    }

    #[test]
    fn test_messages_page_decoding() {
        let page: MessagesResponse = serde_json::from_str(
            r#"{"messages": [
                {"id": "m1", "author_id": 5, "created": 1704067300, "type": "text",
                 "content": {"text": "Здравствуйте"}},
                {"id": "m2", "author_id": 0, "created": 1704067400, "type": "system",
                 "content": {}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(page.messages.len(), 2);
        assert_eq!(page.messages[0].text(), Some("Здравствуйте"));
        assert!(page.messages[1].is_system());
        assert_eq!(page.messages[1].text(), None);
    }
}
