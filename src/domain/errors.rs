//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    /// A page request failed. Pagination stops and keeps what it already has.
    #[error("Fetch failed{}: {message}", http_status_suffix(.status))]
    TransientFetch {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed chat '{chat_id}': {reason}")]
    MalformedChatShape { chat_id: String, reason: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn http_status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl DomainError {
    /// Some endpoints answer an out-of-range offset with 400 instead of an empty page.
    pub fn is_end_of_pages(&self) -> bool {
        matches!(self, DomainError::TransientFetch { status: Some(400), .. })
    }
}
