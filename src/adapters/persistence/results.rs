//! Implements ResultsPort. Writes classification results twice:
//! `chat_targets.json` (every field) and `chat_targets.csv` (`dialog_id,label,text_sample`).
//!
//! Both files list the records in the same order.

use crate::adapters::persistence::atomic::write_atomic;
use crate::domain::{AnalyzedChat, DomainError, Label};
use crate::ports::ResultsPort;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const RESULTS_JSON_FILE: &str = "chat_targets.json";
pub const RESULTS_CSV_FILE: &str = "chat_targets.csv";

/// One row of the tabular output. Field order defines the CSV header.
#[derive(Debug, Serialize)]
pub struct CsvRow<'a> {
    pub dialog_id: &'a str,
    pub label: Label,
    pub text_sample: &'a str,
}

/// Render results as CSV (comma-delimited, header row, multi-line samples quoted).
pub fn results_to_csv(results: &[AnalyzedChat]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    for r in results {
        wtr.serialize(CsvRow {
            dialog_id: &r.dialog_id,
            label: r.label,
            text_sample: &r.text_sample,
        })?;
    }
    if results.is_empty() {
        wtr.write_record(["dialog_id", "label", "text_sample"])?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

/// Results writer for a data directory.
pub struct FileResultsRepo {
    dir: PathBuf,
}

impl FileResultsRepo {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join(RESULTS_JSON_FILE)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(RESULTS_CSV_FILE)
    }
}

#[async_trait::async_trait]
impl ResultsPort for FileResultsRepo {
    async fn save_results(&self, results: &[AnalyzedChat]) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(results)
            .map_err(|e| DomainError::Persistence(format!("serialize results: {}", e)))?;
        let csv = results_to_csv(results)
            .map_err(|e| DomainError::Persistence(format!("serialize CSV: {}", e)))?;

        let json_path = self.json_path();
        let csv_path = self.csv_path();
        write_atomic(&json_path, json.as_bytes()).await?;
        write_atomic(&csv_path, csv.as_bytes()).await?;

        info!(
            json = %json_path.display(),
            csv = %csv_path.display(),
            records = results.len(),
            "results saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawChat;

    fn analyzed(id: &str, label: Label, sample: &str) -> AnalyzedChat {
        AnalyzedChat {
            dialog_id: id.to_string(),
            dialog: RawChat {
                id: id.to_string(),
                ..Default::default()
            },
            text_sample: sample.to_string(),
            label,
        }
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let results = vec![analyzed(
            "c1",
            Label::NonTarget,
            "[2024-01-01 10:00:00] 👤 Анна: привет, \"друг\"\n[] 🏢 Менеджер: ok",
        )];
        let csv = results_to_csv(&results).unwrap();
        assert!(csv.starts_with("dialog_id,label,text_sample\n"));
        assert!(csv.contains("c1,non_target,\""));
        assert!(csv.contains("\"\"друг\"\""));
    }

    #[test]
    fn test_empty_results_still_have_header() {
        assert_eq!(results_to_csv(&[]).unwrap(), "dialog_id,label,text_sample\n");
    }

    #[tokio::test]
    async fn test_csv_matches_json_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileResultsRepo::new(dir.path());
        let results = vec![
            analyzed("z", Label::Target, "line one\nline two"),
            analyzed("a", Label::Ambiguous, ""),
            analyzed("m", Label::NonTarget, "резюме, отправил"),
        ];
        repo.save_results(&results).await.unwrap();

        let json: Vec<AnalyzedChat> =
            serde_json::from_str(&std::fs::read_to_string(repo.json_path()).unwrap()).unwrap();
        assert_eq!(json, results);

        let mut rdr = csv::Reader::from_path(repo.csv_path()).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["dialog_id", "label", "text_sample"]);

        let rows: Vec<(String, String, String)> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[1].to_string(), r[2].to_string())
            })
            .collect();
        assert_eq!(rows.len(), json.len());
        for (row, record) in rows.iter().zip(&json) {
            assert_eq!(row.0, record.dialog_id);
            assert_eq!(row.1, record.label.as_str());
            assert_eq!(row.2, record.text_sample);
        }
    }
}
