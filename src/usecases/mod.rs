//! Application use cases. Orchestrate domain logic via ports.

pub mod analysis_service;
pub mod ingest_service;
pub mod pagination;

pub use analysis_service::{AnalysisOutcome, AnalysisService, RunSummary};
pub use ingest_service::{ChatFetchReport, IngestReport, IngestService, IngestSettings};
pub use pagination::{PagePolicy, Paged, fetch_all_pages};
