pub mod progress;
pub mod prompt;
pub mod summary;

pub use progress::BarProgress;
pub use prompt::prompt_missing_dates;
pub use summary::{print_chats, print_ingest_summary, print_label_summary};
