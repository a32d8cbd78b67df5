//! Command-line interface for dataset generation from labeled mosaics
//!
//! Drives the outer loop the library itself stays out of: which mosaics to
//! load, how many tiles each split receives, and where the image/label/
//! preview files land.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::io::configuration::{
    DEFAULT_BRIGHT_SCALE, DEFAULT_IMAGE_COUNT, DEFAULT_MAX_SEARCH_ITERATIONS,
    DEFAULT_MIN_AREA_RATIO, DEFAULT_MIN_LABELS, DEFAULT_TEST_RATIO, DEFAULT_TILE_HEIGHT,
    DEFAULT_TILE_WIDTH, DEFAULT_TRAIN_RATIO, DEFAULT_VALIDATION_RATIO, FILE_STEM_PREFIX,
    IMAGE_EXTENSION, LABEL_EXTENSION,
};
use crate::io::error::{DatasetError, Result, file_system_error, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::io::{image, labels as label_io, preview};
use crate::labels::LabelFormat;
use crate::sampling::{Mosaic, RegionRatios, SamplerConfig, TileSampler};

#[derive(Parser)]
#[command(name = "mosaictile")]
#[command(
    author,
    version,
    about = "Build object detection datasets by sampling labeled tiles from mosaics"
)]
/// Command-line arguments for the dataset generation tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Mosaic image files feeding the train and validation splits; each must
    /// have a label file next to it with the same stem and a .txt extension
    #[arg(value_name = "MOSAIC")]
    pub mosaics: Vec<PathBuf>,

    /// Mosaic image files feeding the test split
    #[arg(long = "test", value_name = "MOSAIC")]
    pub test_mosaics: Vec<PathBuf>,

    /// Output dataset directory
    #[arg(short, long)]
    pub output: PathBuf,

    /// Total number of images across all splits
    #[arg(short = 'n', long, default_value_t = DEFAULT_IMAGE_COUNT)]
    pub count: usize,

    /// Fraction of images (and of each train mosaic's height) for training
    #[arg(long, default_value_t = DEFAULT_TRAIN_RATIO)]
    pub train_ratio: f64,

    /// Fraction of images for validation, sampled below the train band
    #[arg(long, default_value_t = DEFAULT_VALIDATION_RATIO)]
    pub validation_ratio: f64,

    /// Fraction of images for the test split
    #[arg(long, default_value_t = DEFAULT_TEST_RATIO)]
    pub test_ratio: f64,

    /// Output tile width in pixels
    #[arg(short = 'W', long, default_value_t = DEFAULT_TILE_WIDTH)]
    pub width: usize,

    /// Output tile height in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_TILE_HEIGHT)]
    pub height: usize,

    /// Minimum number of labels per tile before search stops early
    #[arg(long, default_value_t = DEFAULT_MIN_LABELS)]
    pub min_labels: usize,

    /// Minimum retained fraction of a clipped label's area
    #[arg(long, default_value_t = DEFAULT_MIN_AREA_RATIO)]
    pub min_area: f64,

    /// Maximum search iterations per tile
    #[arg(short = 'i', long, default_value_t = DEFAULT_MAX_SEARCH_ITERATIONS)]
    pub iterations: usize,

    /// Redraw rectangles that cut through a label
    #[arg(long)]
    pub reject_partial: bool,

    /// Maximum brighten/darken magnitude of the augmentation
    #[arg(long, default_value_t = DEFAULT_BRIGHT_SCALE)]
    pub bright_scale: f64,

    /// Random seed for reproducible generation
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Reuse output directories even when they already hold files
    #[arg(long)]
    pub overwrite: bool,

    /// Also write preview images with label boxes burned in
    #[arg(short, long)]
    pub preview: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Images each mosaic contributes to each split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SplitPlan {
    train_per_mosaic: usize,
    validation_per_mosaic: usize,
    test_per_mosaic: usize,
    total: usize,
}

/// Orchestrates dataset generation across mosaics and splits
pub struct DatasetGenerator {
    cli: Cli,
    progress: Option<ProgressManager>,
}

impl DatasetGenerator {
    /// Create a generator from parsed CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self {
            cli,
            progress: None,
        }
    }

    /// Generate the whole dataset
    ///
    /// # Errors
    ///
    /// Returns an error on invalid parameters, non-empty output directories
    /// without `--overwrite`, unreadable mosaics or label files, or a failed
    /// tile search under partial rejection.
    pub fn run(&mut self) -> Result<()> {
        self.validate()?;
        let plan = self.plan();
        self.prepare_directories()?;

        if self.cli.should_show_progress() {
            self.progress = Some(ProgressManager::new(plan.total));
        }

        let config = self.sampler_config();

        let mut train_index = 0;
        let mut validation_index = 0;
        for path in &self.cli.mosaics {
            let mosaic = Mosaic::from_files(path, path.with_extension(LABEL_EXTENSION))?;

            if plan.train_per_mosaic > 0 {
                let train_band = RegionRatios::horizontal_band(0.0, self.cli.train_ratio);
                let mut sampler = TileSampler::new(&mosaic, &train_band, config)?;
                self.emit_split(
                    "train",
                    path,
                    plan.train_per_mosaic,
                    &mut train_index,
                    &mut sampler,
                )?;

                if plan.validation_per_mosaic > 0 {
                    // Re-aim the same sampler at the remaining band; the
                    // mosaic stays loaded.
                    sampler
                        .set_region(&RegionRatios::horizontal_band(self.cli.train_ratio, 1.0))?;
                    self.emit_split(
                        "validation",
                        path,
                        plan.validation_per_mosaic,
                        &mut validation_index,
                        &mut sampler,
                    )?;
                }
            } else if plan.validation_per_mosaic > 0 {
                let band = RegionRatios::horizontal_band(self.cli.train_ratio, 1.0);
                let mut sampler = TileSampler::new(&mosaic, &band, config)?;
                self.emit_split(
                    "validation",
                    path,
                    plan.validation_per_mosaic,
                    &mut validation_index,
                    &mut sampler,
                )?;
            }
        }

        let mut test_index = 0;
        if plan.test_per_mosaic > 0 {
            for path in &self.cli.test_mosaics {
                let mosaic = Mosaic::from_files(path, path.with_extension(LABEL_EXTENSION))?;
                let mut sampler = TileSampler::new(&mosaic, &RegionRatios::FULL, config)?;
                self.emit_split(
                    "test",
                    path,
                    plan.test_per_mosaic,
                    &mut test_index,
                    &mut sampler,
                )?;
            }
        }

        if let Some(ref progress) = self.progress {
            progress.finish();
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("train_ratio", self.cli.train_ratio),
            ("validation_ratio", self.cli.validation_ratio),
            ("test_ratio", self.cli.test_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid_parameter(name, &value, &"must be within [0, 1]"));
            }
        }
        if self.cli.train_ratio + self.cli.validation_ratio > 1.0 {
            return Err(invalid_parameter(
                "validation_ratio",
                &self.cli.validation_ratio,
                &"train and validation bands together exceed the mosaic height",
            ));
        }

        let train_demand = per_mosaic_count(
            self.cli.count,
            self.cli.train_ratio + self.cli.validation_ratio,
            1,
        );
        if train_demand > 0 && self.cli.mosaics.is_empty() {
            return Err(invalid_parameter(
                "mosaics",
                &"<none>",
                &"train/validation images requested but no mosaic was given",
            ));
        }
        let test_demand = per_mosaic_count(self.cli.count, self.cli.test_ratio, 1);
        if test_demand > 0 && self.cli.test_mosaics.is_empty() {
            return Err(invalid_parameter(
                "test",
                &"<none>",
                &"test images requested but no test mosaic was given",
            ));
        }

        Ok(())
    }

    fn plan(&self) -> SplitPlan {
        let train_per_mosaic =
            per_mosaic_count(self.cli.count, self.cli.train_ratio, self.cli.mosaics.len());
        let validation_per_mosaic = per_mosaic_count(
            self.cli.count,
            self.cli.validation_ratio,
            self.cli.mosaics.len(),
        );
        let test_per_mosaic = per_mosaic_count(
            self.cli.count,
            self.cli.test_ratio,
            self.cli.test_mosaics.len(),
        );

        SplitPlan {
            train_per_mosaic,
            validation_per_mosaic,
            test_per_mosaic,
            total: (train_per_mosaic + validation_per_mosaic) * self.cli.mosaics.len()
                + test_per_mosaic * self.cli.test_mosaics.len(),
        }
    }

    fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            tile_width: self.cli.width,
            tile_height: self.cli.height,
            min_labels: self.cli.min_labels,
            min_area_ratio: self.cli.min_area,
            max_search_iterations: self.cli.iterations,
            reject_partial: self.cli.reject_partial,
            bright_scale: self.cli.bright_scale,
            seed: self.cli.seed,
            ..SamplerConfig::default()
        }
    }

    fn prepare_directories(&self) -> Result<()> {
        let mut areas = vec!["images", "labels"];
        if self.cli.preview {
            areas.push("preview");
        }

        for area in areas {
            for split in ["train", "validation", "test"] {
                create_output_directory(&self.cli.output.join(area).join(split), self.cli.overwrite)?;
            }
        }
        Ok(())
    }

    fn emit_split(
        &self,
        split: &str,
        mosaic_path: &Path,
        count: usize,
        next_index: &mut usize,
        sampler: &mut TileSampler<'_>,
    ) -> Result<()> {
        let mosaic_stem = mosaic_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if let Some(ref progress) = self.progress {
            progress.start_stage(split, &mosaic_stem);
        }

        for _ in 0..count {
            let tile = sampler.sample(LabelFormat::Normalized)?;
            let stem = format!("{FILE_STEM_PREFIX}{:05}", *next_index);
            *next_index += 1;

            let image_path = self
                .cli
                .output
                .join("images")
                .join(split)
                .join(format!("{stem}.{IMAGE_EXTENSION}"));
            image::save_image(&image_path, &tile.pixels)?;

            let normalized = tile.labels.normalized(self.cli.width, self.cli.height);
            let label_path = self
                .cli
                .output
                .join("labels")
                .join(split)
                .join(format!("{stem}.{LABEL_EXTENSION}"));
            label_io::write_labels(&label_path, &normalized)?;

            if self.cli.preview {
                let burned = preview::burn_labels(&tile.pixels, &tile.labels);
                let preview_path = self
                    .cli
                    .output
                    .join("preview")
                    .join(split)
                    .join(format!("{stem}.{IMAGE_EXTENSION}"));
                image::save_image(&preview_path, &burned)?;
            }

            if let Some(ref progress) = self.progress {
                progress.advance();
            }
        }

        Ok(())
    }
}

/// Images one mosaic contributes to a split
fn per_mosaic_count(total_images: usize, split_ratio: f64, mosaic_count: usize) -> usize {
    if mosaic_count == 0 {
        return 0;
    }
    (total_images as f64 * split_ratio / mosaic_count as f64).round() as usize
}

/// Create a directory, refusing a non-empty existing one unless allowed
fn create_output_directory(path: &Path, allow_non_empty: bool) -> Result<()> {
    if !path.exists() {
        return fs::create_dir_all(path).map_err(|e| file_system_error(path, "create directory", e));
    }
    if allow_non_empty {
        return Ok(());
    }

    let mut entries =
        fs::read_dir(path).map_err(|e| file_system_error(path, "inspect directory", e))?;
    if entries.next().is_some() {
        return Err(DatasetError::TargetDirectoryNotEmpty {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
