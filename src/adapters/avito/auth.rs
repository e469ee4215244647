//! Client-credentials token exchange.

use crate::domain::DomainError;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Application credentials issued in the Avito developer cabinet.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

pub(crate) fn token_url(base_url: &str) -> String {
    format!("{}/token/", base_url.trim_end_matches('/'))
}

/// Exchange credentials for a bearer token. Any failure is fatal for the run.
pub async fn fetch_access_token(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<String, DomainError> {
    let response = client
        .post(token_url(base_url))
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ])
        .send()
        .await
        .map_err(|e| DomainError::Auth(format!("Token request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        warn!(status = %status, "token endpoint returned error");
        return Err(DomainError::Auth(format!(
            "Token endpoint error {}: {}",
            status,
            text.chars().take(200).collect::<String>()
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| DomainError::Auth(format!("Failed to parse token response: {}", e)))?;
    if token.access_token.is_empty() {
        return Err(DomainError::Auth("Token endpoint returned an empty token".into()));
    }
    info!("access token obtained");
    Ok(token.access_token)
}
