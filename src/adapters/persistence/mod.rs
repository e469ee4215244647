//! File persistence: the ingested chat store and the classification results.

pub mod atomic;
pub mod chat_store;
pub mod results;

pub use chat_store::JsonChatStore;
pub use results::FileResultsRepo;
