//! Wiring & DI. Entry point: parse the CLI, bootstrap adapters, inject into services.
//! No business logic here.

mod cli;

use anyhow::Context;
use avito_leads::adapters::avito::AvitoClient;
use avito_leads::adapters::persistence::{FileResultsRepo, JsonChatStore};
use avito_leads::adapters::ui::{
    BarProgress, print_chats, print_ingest_summary, print_label_summary, prompt_missing_dates,
};
use avito_leads::domain::time_window::parse_date;
use avito_leads::domain::{Classifier, TimeWindow};
use avito_leads::ports::{ChatStorePort, MessengerGateway};
use avito_leads::shared::config::AppConfig;
use avito_leads::usecases::{AnalysisService, IngestService, IngestSettings};
use clap::Parser;
use cli::{ClassifyArgs, Cli, Commands, PeriodArgs};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cli = Cli::parse();
    let cfg =
        AppConfig::load().context("invalid configuration (AVITO_* env or AVITO_CONFIG file)")?;

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    info!(path = %data_path.display(), "data directory");

    match cli.command {
        Commands::Fetch(period) => {
            let window = resolve_window(&period, &cfg)?;
            fetch(&cfg, &data_path, &window).await?;
        }
        Commands::Classify(args) => classify(&cfg, &data_path, &args).await?,
        Commands::Run(args) => {
            let window = resolve_window(&args.period, &cfg)?;
            fetch(&cfg, &data_path, &window).await?;
            classify(&cfg, &data_path, &args.classify).await?;
        }
    }

    Ok(())
}

/// CLI dates win over config; anything still missing is prompted for.
/// Runs before any network call.
fn resolve_window(period: &PeriodArgs, cfg: &AppConfig) -> anyhow::Result<TimeWindow> {
    let from = period.from.clone().or_else(|| cfg.date_from.clone());
    let to = period.to.clone().or_else(|| cfg.date_to.clone());
    let from = from.as_deref().map(parse_date).transpose()?;
    let to = to.as_deref().map(parse_date).transpose()?;
    let (start, end) = prompt_missing_dates(from, to)?;

    let window = TimeWindow::from_dates(&start.to_string(), &end.to_string())?;
    info!(
        from = %start,
        to = %end,
        start_ts = window.start_ts(),
        end_ts = window.end_ts(),
        "reporting period"
    );
    Ok(window)
}

async fn fetch(cfg: &AppConfig, data_path: &Path, window: &TimeWindow) -> anyhow::Result<()> {
    let credentials = cfg.credentials().ok_or_else(|| {
        anyhow::anyhow!("Set AVITO_CLIENT_ID and AVITO_CLIENT_SECRET (env or .env)")
    })?;
    let api_url = cfg.api_url_or_default();
    info!(url = %api_url, "connecting to Avito API");
    let gateway: Arc<dyn MessengerGateway> =
        Arc::new(AvitoClient::connect(&api_url, &credentials).await?);

    let chat_store = Arc::new(JsonChatStore::in_dir(data_path));
    let store_path = chat_store.path().display().to_string();
    let store: Arc<dyn ChatStorePort> = chat_store;

    let settings = IngestSettings {
        concurrency: cfg.concurrency_or_default(),
        pacing: Duration::from_millis(cfg.pacing_ms_or_default()),
        ..Default::default()
    };
    info!(
        concurrency = settings.concurrency,
        pacing_ms = cfg.pacing_ms_or_default(),
        "ingest settings"
    );

    let service =
        IngestService::new(gateway, store, settings).with_progress(Arc::new(BarProgress::new()));
    let report = service.ingest(window).await?;
    print_ingest_summary(&report, &store_path)?;
    Ok(())
}

async fn classify(cfg: &AppConfig, data_path: &Path, args: &ClassifyArgs) -> anyhow::Result<()> {
    let classifier = Classifier::new(cfg.classifier_config());
    let service = AnalysisService::new(
        classifier,
        Arc::new(JsonChatStore::in_dir(data_path)),
        Arc::new(FileResultsRepo::new(data_path)),
    );

    let outcome = service.classify_stored().await?;
    print_label_summary(&outcome.summary)?;
    if args.show_chats {
        print_chats(&outcome.analyzed)?;
    }
    service
        .save(&outcome)
        .await
        .context("failed to write result files")?;
    Ok(())
}
