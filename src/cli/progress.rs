use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while an external command (analyzer, build, tests) runs.
pub struct StepProgress {
    bar: Option<ProgressBar>,
}

impl StepProgress {
    pub fn new() -> Self {
        Self { bar: None }
    }

    pub fn start(&mut self, message: impl Into<String>) {
        self.finish();
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.into());
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        self.bar = Some(bar);
    }

    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for StepProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StepProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
