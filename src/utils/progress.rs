//! Row progress bar for materialization

use indicatif::{ProgressBar, ProgressStyle};

pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({eta}) {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(description.to_string());

        ProgressTracker { bar }
    }

    /// Moves the bar to `rows` decoded rows
    pub fn set_rows(&self, rows: u32) {
        self.bar.set_position(rows as u64);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }

    /// Stops the bar without marking it complete
    pub fn abandon(&self, msg: &str) {
        self.bar.abandon_with_message(msg.to_string());
    }
}
