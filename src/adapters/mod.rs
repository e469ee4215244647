//! Infrastructure adapters. Implement outbound ports.
//!
//! Avito HTTP API, filesystem, terminal. Map errors to DomainError.

pub mod avito;
pub mod persistence;
pub mod ui;
