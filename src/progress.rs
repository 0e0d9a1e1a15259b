//! Terminal progress bar for the conversion loop.

use gemgrind_core::progress::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.cyan} Grinding gems... [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}";

pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn begin(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn set_completed(&self, completed: u64) {
        self.bar.set_position(completed);
    }

    fn finish(&self, completed: u64) {
        self.bar.set_position(completed);
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_completed_count() {
        let progress = BarProgress::hidden();
        progress.begin(3);
        progress.set_completed(2);
        assert_eq!(progress.bar.length(), Some(3));
        assert_eq!(progress.bar.position(), 2);
        progress.finish(2);
        assert!(progress.bar.is_finished());
    }
}
