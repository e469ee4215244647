//! Avito messenger API: token exchange and the paged chat/message endpoints.

pub mod auth;
pub mod client;

pub use auth::Credentials;
pub use client::{AvitoClient, DEFAULT_API_URL};
