//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinners for the stages of a reconciliation job
#[derive(Debug)]
pub struct ProgressReporter {
    pub load_pb: Option<ProgressBar>,
    pub reconcile_pb: Option<ProgressBar>,
    pub render_pb: Option<ProgressBar>,
    show_progress: bool,
}

impl ProgressReporter {
    /// Create progress reporter for a reconciliation job
    pub fn new_for_job() -> Self {
        Self {
            load_pb: Some(create_spinner("Loading sources...")),
            reconcile_pb: None,
            render_pb: None,
            show_progress: true,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            load_pb: None,
            reconcile_pb: None,
            render_pb: None,
            show_progress: false,
        }
    }

    /// Finish loading and start the reconciliation spinner
    pub fn finish_load(&mut self, message: &str) {
        if let Some(pb) = self.load_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        if self.show_progress && self.reconcile_pb.is_none() {
            self.reconcile_pb = Some(create_spinner("Reconciling categories..."));
        }
    }

    /// Finish reconciliation and start the report spinner
    pub fn finish_reconcile(&mut self, message: &str) {
        if let Some(pb) = self.reconcile_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        if self.show_progress && self.render_pb.is_none() {
            self.render_pb = Some(create_spinner("Writing reports..."));
        }
    }

    /// Update report progress message without finishing
    pub fn update_render(&mut self, message: &str) {
        if let Some(pb) = &self.render_pb {
            pb.set_message(message.to_string());
        }
    }

    pub fn finish_render(&mut self, message: &str) {
        if let Some(pb) = self.render_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        for pb in [self.load_pb.take(), self.reconcile_pb.take(), self.render_pb.take()]
            .into_iter()
            .flatten()
        {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
