//! Port traits. API boundaries for the hexagon.
//!
//! Outbound only: the application calls into the messenger API, the filesystem and the
//! terminal through these traits.

pub mod outbound;

pub use outbound::{ChatStorePort, FetchProgress, LoadedStore, MessengerGateway, ResultsPort};
