//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here: the reporting window, transcript rendering
//! and the lead classifier. Dependencies flow inward.

pub mod classifier;
pub mod entities;
pub mod errors;
pub mod time_window;
pub mod transcript;

pub use classifier::{Classifier, ClassifierConfig};
pub use entities::{
    AnalyzedChat, ChatContext, ChatRecord, ChatStore, ChatUser, ContextValue, FetchStatus, Label,
    MessageContent, RawChat, RawMessage, SYSTEM_AUTHOR_ID,
};
pub use errors::DomainError;
pub use time_window::TimeWindow;
pub use transcript::{Transcript, build_transcript, build_transcript_in};
