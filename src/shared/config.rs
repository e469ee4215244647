//! Application configuration. API credentials, reporting period, paths, throttling.

use crate::adapters::avito::{Credentials, DEFAULT_API_URL};
use crate::domain::ClassifierConfig;
use crate::usecases::ingest_service::{DEFAULT_CONCURRENCY, DEFAULT_PACING_MS};
use serde::Deserialize;

pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Avito application id. Read from AVITO_CLIENT_ID.
    pub client_id: Option<String>,
    /// Avito application secret. Read from AVITO_CLIENT_SECRET.
    pub client_secret: Option<String>,
    /// API base URL. Read from AVITO_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// First day of the period (`YYYY-MM-DD`). Read from AVITO_DATE_FROM.
    #[serde(default)]
    pub date_from: Option<String>,
    /// Last day of the period, inclusive. Read from AVITO_DATE_TO.
    #[serde(default)]
    pub date_to: Option<String>,

    /// Directory for `avito_chats.json` and the result files. Read from AVITO_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Chats fetched in parallel. Read from AVITO_CONCURRENCY.
    #[serde(default)]
    pub concurrency: Option<usize>,
    /// Pause in ms each worker takes after finishing a chat. Read from AVITO_PACING_MS.
    #[serde(default)]
    pub pacing_ms: Option<u64>,

    // Config-file only.
    #[serde(default)]
    pub inclusion_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub exclusion_phrases: Option<Vec<String>>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        // File first so the environment wins.
        if let Ok(path) = std::env::var("AVITO_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::with_prefix("AVITO"));
        c.build()?.try_deserialize()
    }

    /// Both credentials, or `None` if either is missing.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some(Credentials {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            _ => None,
        }
    }

    pub fn api_url_or_default(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
    }

    /// Defaults to 10; zero is treated as unset.
    pub fn concurrency_or_default(&self) -> usize {
        self.concurrency
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_CONCURRENCY)
    }

    pub fn pacing_ms_or_default(&self) -> u64 {
        self.pacing_ms.unwrap_or(DEFAULT_PACING_MS)
    }

    /// Classifier settings: built-in thresholds, keyword lists overridable from the config file.
    pub fn classifier_config(&self) -> ClassifierConfig {
        let mut cfg = ClassifierConfig::default();
        if let Some(words) = &self.inclusion_keywords {
            cfg.inclusion_keywords = words.clone();
        }
        if let Some(phrases) = &self.exclusion_phrases {
            cfg.exclusion_phrases = phrases.clone();
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api_url_or_default(), "https://api.avito.ru");
        assert_eq!(cfg.data_dir_or_default(), "./data");
        assert_eq!(cfg.concurrency_or_default(), 10);
        assert_eq!(cfg.pacing_ms_or_default(), 100);
        assert_eq!(cfg.classifier_config(), ClassifierConfig::default());
        assert!(cfg.credentials().is_none());
    }

    #[test]
    fn test_zero_concurrency_falls_back() {
        let cfg = AppConfig {
            concurrency: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.concurrency_or_default(), 10);
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let cfg = AppConfig {
            client_id: Some("id".into()),
            client_secret: Some(String::new()),
            ..Default::default()
        };
        assert!(cfg.credentials().is_none());

        let cfg = AppConfig {
            client_secret: Some("secret".into()),
            ..cfg
        };
        let creds = cfg.credentials().unwrap();
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "secret");
    }

    #[test]
    fn test_file_overrides_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avito.toml");
        std::fs::write(
            &path,
            "date_from = \"2024-01-01\"\ninclusion_keywords = [\"доставка\", \"опт\"]\n",
        )
        .unwrap();

        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from(path.as_path()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.date_from.as_deref(), Some("2024-01-01"));
        let classifier = cfg.classifier_config();
        assert_eq!(classifier.inclusion_keywords, vec!["доставка", "опт"]);
        assert_eq!(
            classifier.exclusion_phrases,
            ClassifierConfig::default().exclusion_phrases
        );
    }
}
