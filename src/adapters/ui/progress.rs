//! Implements FetchProgress with an indicatif bar on stderr.

use crate::ports::FetchProgress;
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// One bar per ingestion run; hidden until `start`.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchProgress for BarProgress {
    fn start(&self, total_chats: usize) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_length(total_chats as u64);
        self.bar.set_position(0);
        self.bar.set_message("fetching messages…");
    }

    fn chat_done(&self, chat_id: &str, _kept_messages: usize) {
        self.bar.set_message(chat_id.to_string());
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_tracks_chats() {
        let progress = BarProgress::new();
        progress.start(3);
        progress.chat_done("a", 2);
        progress.chat_done("b", 0);
        assert_eq!(progress.bar.position(), 2);
        assert_eq!(progress.bar.length(), Some(3));
        progress.finish();
        assert!(progress.bar.is_finished());
    }
}
