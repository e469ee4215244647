//! Console reports: ingestion totals, label counts and the transcript dump.

use crate::domain::{AnalyzedChat, Label};
use crate::usecases::{IngestReport, RunSummary};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::{ExecutableCommand, QueueableCommand};
use std::io::{Write, stdout};

const RULE_WIDTH: usize = 80;

fn label_color(label: Label) -> Color {
    match label {
        Label::Target => Color::Green,
        Label::NonTarget => Color::Red,
        Label::Ambiguous => Color::Yellow,
    }
}

/// Header line for one chat in the transcript dump.
pub fn chat_header(chat: &AnalyzedChat) -> String {
    format!(
        "📌 Dialog: {} | {}",
        chat.dialog_id,
        chat.label.as_str().to_uppercase()
    )
}

fn colored_line(out: &mut impl Write, color: Color, text: &str) -> std::io::Result<()> {
    out.queue(SetForegroundColor(color))?;
    out.queue(Print(text))?;
    out.queue(ResetColor)?;
    out.queue(Print("\n"))?;
    Ok(())
}

/// Prints what `fetch` did. `store_path` is where the chats were written.
pub fn print_ingest_summary(report: &IngestReport, store_path: &str) -> std::io::Result<()> {
    let mut out = stdout();
    writeln!(out)?;
    colored_line(
        &mut out,
        Color::Cyan,
        &format!(
            "🔎 {} chats listed, {} in period",
            report.chats_listed, report.chats_in_window
        ),
    )?;
    colored_line(
        &mut out,
        Color::Green,
        &format!("✅ Saved {} dialogs to {}", report.store.len(), store_path),
    )?;
    if !report.chat_list_status.is_complete() {
        colored_line(
            &mut out,
            Color::Yellow,
            "⚠️ Chat list is incomplete (listing failed midway)",
        )?;
    }
    let partial = report.partial_chats();
    if partial > 0 {
        colored_line(
            &mut out,
            Color::Yellow,
            &format!("⚠️ {} chats have incomplete message history", partial),
        )?;
    }
    out.flush()
}

/// Prints label counts plus excluded/rejected chats.
pub fn print_label_summary(summary: &RunSummary) -> std::io::Result<()> {
    let mut out = stdout();
    writeln!(out, "\n📊 Summary:")?;
    for label in Label::ALL {
        colored_line(
            &mut out,
            label_color(label),
            &format!("{:<11} {}", label.as_str(), summary.count(label)),
        )?;
    }
    if summary.excluded_system > 0 {
        writeln!(out, "{:<11} {}", "excluded", summary.excluded_system)?;
    }
    if summary.rejected > 0 {
        colored_line(
            &mut out,
            Color::Red,
            &format!("{:<11} {}", "rejected", summary.rejected),
        )?;
    }
    out.flush()
}

/// Prints every analyzed chat: a rule, the colored header, the transcript.
pub fn print_chats(chats: &[AnalyzedChat]) -> std::io::Result<()> {
    let mut out = stdout();
    writeln!(out, "\n🗂 All chats:")?;
    for chat in chats {
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        out.execute(SetForegroundColor(label_color(chat.label)))?;
        out.execute(Print(chat_header(chat)))?;
        out.execute(ResetColor)?;
        writeln!(out)?;
        writeln!(out, "{}\n", chat.text_sample)?;
    }
    out.flush()
}
