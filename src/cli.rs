//! CLI argument definitions for the avito-leads binary.

use clap::{Args, Parser, Subcommand};

/// Avito messenger export and lead classification
#[derive(Parser, Debug)]
#[command(name = "avito-leads")]
#[command(about = "Export Avito chats for a period and sort them into target / non-target leads")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download chats and messages for the period into the chat store
    Fetch(PeriodArgs),
    /// Label the chats in the chat store and write the result files
    Classify(ClassifyArgs),
    /// Fetch, then classify
    Run(RunArgs),
}

/// Reporting period. Falls back to AVITO_DATE_FROM / AVITO_DATE_TO, then to a prompt.
#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,

    /// Last day (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ClassifyArgs {
    /// Print every transcript with its label
    #[arg(long)]
    pub show_chats: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    #[command(flatten)]
    pub classify: ClassifyArgs,
}
