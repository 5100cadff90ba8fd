use indicatif::{ProgressBar, ProgressStyle};
use isoprof_core::fit::{FitStage, ProgressReporter};

/// Drives an indicatif bar from fit progress callbacks.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::new(0),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: FitStage, total_items: Option<usize>) {
        let style = match total_items {
            Some(total) => {
                self.bar.set_length(total as u64);
                self.bar.set_position(0);
                ProgressStyle::default_bar()
                    .template("{msg:20} [{bar:40}] {pos}/{len}")
                    .map(|s| s.progress_chars("=> "))
            }
            None => ProgressStyle::default_spinner().template("{msg:20} {spinner}"),
        };
        if let Ok(style) = style {
            self.bar.set_style(style);
        }
        self.bar.set_message(stage.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        self.bar.tick();
    }
}
