//! Progress reporting for dataset generation runs

use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressStyle};

static DATASET_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar spanning every image of a generation run
///
/// The bar length is the total image count across all splits; the message
/// names the split and mosaic currently being sampled.
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a progress bar sized for the whole run
    pub fn new(total_images: usize) -> Self {
        let bar = ProgressBar::new(total_images as u64);
        bar.set_style(DATASET_STYLE.clone());
        Self { bar }
    }

    /// Announce the split and mosaic now being sampled
    pub fn start_stage(&self, split: &str, mosaic_stem: &str) {
        self.bar.set_message(format!("{split}: {mosaic_stem}"));
    }

    /// Record one emitted image
    pub fn advance(&self) {
        self.bar.inc(1);
    }

    /// Complete the bar
    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}
