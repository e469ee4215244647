//! Analysis service. Turns ingested chats into labeled leads.
//!
//! Coordinates between the chat store (input), the classifier (decision) and the results
//! writer (output).

use crate::domain::transcript::UNKNOWN_SELLER_ID;
use crate::domain::{AnalyzedChat, ChatRecord, Classifier, DomainError, Label, build_transcript};
use crate::ports::{ChatStorePort, LoadedStore, ResultsPort};
use std::sync::Arc;
use tracing::{debug, info};

/// Counts for the end-of-run report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub target: usize,
    pub non_target: usize,
    pub ambiguous: usize,
    /// Chats skipped because they contain system (author 0) messages.
    pub excluded_system: usize,
    /// Stored records that could not be decoded.
    pub rejected: usize,
}

impl RunSummary {
    pub fn count(&self, label: Label) -> usize {
        match label {
            Label::Target => self.target,
            Label::NonTarget => self.non_target,
            Label::Ambiguous => self.ambiguous,
        }
    }

    pub fn labeled(&self) -> usize {
        self.target + self.non_target + self.ambiguous
    }

    fn record(&mut self, label: Label) {
        match label {
            Label::Target => self.target += 1,
            Label::NonTarget => self.non_target += 1,
            Label::Ambiguous => self.ambiguous += 1,
        }
    }
}

/// Labeled chats in input order, plus their counts.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutcome {
    pub analyzed: Vec<AnalyzedChat>,
    pub summary: RunSummary,
}

/// Service for heuristic lead classification.
///
/// Orchestrates the flow:
/// 1. Load ingested chats
/// 2. Drop chats with system messages
/// 3. Render each transcript and classify it
/// 4. Save structured and tabular results
///
/// The summary is available between steps 3 and 4, so it is reported even when the write fails.
pub struct AnalysisService {
    classifier: Classifier,
    store: Arc<dyn ChatStorePort>,
    results: Arc<dyn ResultsPort>,
}

impl AnalysisService {
    pub fn new(
        classifier: Classifier,
        store: Arc<dyn ChatStorePort>,
        results: Arc<dyn ResultsPort>,
    ) -> Self {
        Self {
            classifier,
            store,
            results,
        }
    }

    /// Read the ingested chats. Undecodable records come back in `rejected`.
    pub async fn load(&self) -> Result<LoadedStore, DomainError> {
        self.store.load_store().await
    }

    /// Label one chat. `None` when the chat contains system messages.
    pub fn analyze_record(&self, record: &ChatRecord) -> Option<AnalyzedChat> {
        if record.has_system_messages() {
            debug!(dialog_id = %record.dialog_id, "system messages present, excluded");
            return None;
        }
        let seller_id = record.dialog.seller_id().unwrap_or(UNKNOWN_SELLER_ID);
        let transcript = build_transcript(&record.dialog, &record.messages, seller_id);
        let label = self
            .classifier
            .classify(&transcript.text, &transcript.messages, seller_id);
        Some(AnalyzedChat {
            dialog_id: record.dialog_id.clone(),
            dialog: record.dialog.clone(),
            text_sample: transcript.text,
            label,
        })
    }

    /// Label every chat, preserving input order.
    pub fn analyze_records(&self, records: &[ChatRecord]) -> AnalysisOutcome {
        let mut outcome = AnalysisOutcome::default();
        for record in records {
            match self.analyze_record(record) {
                Some(analyzed) => {
                    outcome.summary.record(analyzed.label);
                    outcome.analyzed.push(analyzed);
                }
                None => outcome.summary.excluded_system += 1,
            }
        }
        outcome
    }

    /// Write results (JSON + CSV).
    pub async fn save(&self, outcome: &AnalysisOutcome) -> Result<(), DomainError> {
        self.results.save_results(&outcome.analyzed).await
    }

    /// Load the chat store and label it. Nothing is written; call [`Self::save`] after
    /// reporting the summary.
    pub async fn classify_stored(&self) -> Result<AnalysisOutcome, DomainError> {
        let loaded = self.load().await?;
        let mut outcome = self.analyze_records(&loaded.records);
        outcome.summary.rejected = loaded.rejected.len();
        log_summary(&outcome.summary);
        Ok(outcome)
    }
}

fn log_summary(summary: &RunSummary) {
    info!(
        target_chats = summary.target,
        non_target = summary.non_target,
        ambiguous = summary.ambiguous,
        excluded_system = summary.excluded_system,
        rejected = summary.rejected,
        "classification complete"
    );
}
