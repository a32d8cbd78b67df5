//! Rectangle search and tile production
//!
//! The sampler repeatedly proposes random tile rectangles inside its region,
//! clips the mosaic labels against each proposal, and accepts the first
//! rectangle holding enough labels. When the search budget runs out the best
//! rectangle seen so far is used instead, so sampling never fails for lack
//! of labels.

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::io::configuration::{
    DEFAULT_BRIGHT_SCALE, DEFAULT_MAX_SEARCH_ITERATIONS, DEFAULT_MIN_AREA_RATIO,
    DEFAULT_MIN_LABELS, DEFAULT_PARTIAL_RETRY_LIMIT, DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH,
    DEFAULT_VIGNETTE_CENTER_MAX, DEFAULT_VIGNETTE_CENTER_MIN, DEFAULT_VIGNETTE_SIGMA_MAX,
    DEFAULT_VIGNETTE_SIGMA_MIN,
};
use crate::io::error::{DatasetError, Result, invalid_parameter};
use crate::labels::{AbsoluteLabel, LabelFormat, LabelSet, PixelRect, clip, convert};
use crate::sampling::mosaic::Mosaic;
use crate::sampling::region::{RegionRatios, SamplingRegion};
use crate::transform::{TransformParams, transform_tile};

/// How a sampled tile satisfied the acceptance criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    /// A trial met the minimum label count and was taken immediately
    Accepted,
    /// The search budget ran out; the densest rectangle seen was used
    BestEffort,
}

/// One extracted, transformed tile with its labels
#[derive(Debug, Clone)]
pub struct Tile {
    /// Tile pixel data, `(height, width, 3)` floats in `[0, 1]`
    pub pixels: Array3<f64>,
    /// Labels in the format requested from [`TileSampler::sample`]
    pub labels: LabelSet,
    /// Acceptance outcome of the rectangle search
    pub status: SampleStatus,
}

/// Sampling and augmentation parameters
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    /// Output tile width in pixels
    pub tile_width: usize,
    /// Output tile height in pixels
    pub tile_height: usize,
    /// Minimum label count for immediate acceptance
    pub min_labels: usize,
    /// Minimum retained fraction of a clipped label's original area
    pub min_area_ratio: f64,
    /// Outer search budget before settling for the best rectangle seen
    pub max_search_iterations: usize,
    /// Redraw budget per trial when rejecting partially cut labels
    pub max_partial_retries: usize,
    /// Whether rectangles cutting through a label are redrawn
    pub reject_partial: bool,
    /// Maximum brighten/darken magnitude
    pub bright_scale: f64,
    /// Vignette sigma multiplier range, `(min, max)` with positive min
    pub vignette_sigma: (f64, f64),
    /// Relative vignette center column range, `(min, max)` within `[0, 1]`
    pub vignette_x: (f64, f64),
    /// Relative vignette center row range, `(min, max)` within `[0, 1]`
    pub vignette_y: (f64, f64),
    /// Deterministic seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            min_labels: DEFAULT_MIN_LABELS,
            min_area_ratio: DEFAULT_MIN_AREA_RATIO,
            max_search_iterations: DEFAULT_MAX_SEARCH_ITERATIONS,
            max_partial_retries: DEFAULT_PARTIAL_RETRY_LIMIT,
            reject_partial: false,
            bright_scale: DEFAULT_BRIGHT_SCALE,
            vignette_sigma: (DEFAULT_VIGNETTE_SIGMA_MIN, DEFAULT_VIGNETTE_SIGMA_MAX),
            vignette_x: (DEFAULT_VIGNETTE_CENTER_MIN, DEFAULT_VIGNETTE_CENTER_MAX),
            vignette_y: (DEFAULT_VIGNETTE_CENTER_MIN, DEFAULT_VIGNETTE_CENTER_MAX),
            seed: None,
        }
    }
}

impl SamplerConfig {
    /// Validate all parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.tile_width < 2 || self.tile_height < 2 {
            return Err(invalid_parameter(
                "tile dimensions",
                &format!("{}x{}", self.tile_width, self.tile_height),
                &"tiles must span at least 2 pixels per axis",
            ));
        }
        if self.max_search_iterations == 0 {
            return Err(invalid_parameter(
                "max_search_iterations",
                &self.max_search_iterations,
                &"at least one search iteration is required",
            ));
        }
        if self.max_partial_retries == 0 {
            return Err(invalid_parameter(
                "max_partial_retries",
                &self.max_partial_retries,
                &"at least one redraw attempt is required",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_area_ratio) {
            return Err(invalid_parameter(
                "min_area_ratio",
                &self.min_area_ratio,
                &"must be within [0, 1]",
            ));
        }
        if self.bright_scale < 0.0 {
            return Err(invalid_parameter(
                "bright_scale",
                &self.bright_scale,
                &"must be non-negative",
            ));
        }
        if self.vignette_sigma.0 <= 0.0 || self.vignette_sigma.0 > self.vignette_sigma.1 {
            return Err(invalid_parameter(
                "vignette_sigma",
                &format!("{:?}", self.vignette_sigma),
                &"requires 0 < min <= max",
            ));
        }
        for (name, range) in [("vignette_x", self.vignette_x), ("vignette_y", self.vignette_y)] {
            if range.0 < 0.0 || range.0 > range.1 || range.1 > 1.0 {
                return Err(invalid_parameter(
                    name,
                    &format!("{range:?}"),
                    &"requires 0 <= min <= max <= 1",
                ));
            }
        }
        Ok(())
    }
}

/// Random tile sampler over one mosaic region
///
/// Borrows the mosaic immutably; create several samplers, or re-aim one with
/// [`TileSampler::set_region`], to cut multiple datasets from the same
/// loaded mosaic. Instances are single-threaded: region changes and sampling
/// calls must not interleave across threads.
pub struct TileSampler<'a> {
    mosaic: &'a Mosaic,
    region: SamplingRegion,
    config: SamplerConfig,
    rng: StdRng,
}

impl<'a> TileSampler<'a> {
    /// Create a sampler over a region of a mosaic
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or region ratios are invalid, or
    /// if the region cannot fit a single tile.
    pub fn new(mosaic: &'a Mosaic, ratios: &RegionRatios, config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        let region = Self::resolve_region(mosaic, ratios, &config)?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        Ok(Self {
            mosaic,
            region,
            config,
            rng,
        })
    }

    /// Re-aim the sampler at a different region of the same mosaic
    ///
    /// Cheap: no pixel data moves. The random number generator keeps its
    /// state, so a seeded sampler stays reproducible across region changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the ratios are invalid or the new region cannot
    /// fit a single tile.
    pub fn set_region(&mut self, ratios: &RegionRatios) -> Result<()> {
        self.region = Self::resolve_region(self.mosaic, ratios, &self.config)?;
        Ok(())
    }

    fn resolve_region(
        mosaic: &Mosaic,
        ratios: &RegionRatios,
        config: &SamplerConfig,
    ) -> Result<SamplingRegion> {
        ratios.validate()?;
        let region = SamplingRegion::from_ratios(ratios, mosaic.width(), mosaic.height());

        // The draw interval [min, max - tile) must be non-empty on both axes.
        let fits_x = region.x_max - config.tile_width as i64 > region.x_min;
        let fits_y = region.y_max - config.tile_height as i64 > region.y_min;
        if !fits_x || !fits_y {
            return Err(DatasetError::RegionTooSmall {
                region_width: region.width(),
                region_height: region.height(),
                tile_width: config.tile_width,
                tile_height: config.tile_height,
            });
        }

        Ok(region)
    }

    /// Current pixel-space sampling region
    pub const fn region(&self) -> &SamplingRegion {
        &self.region
    }

    /// Sample one tile
    ///
    /// Runs up to `max_search_iterations` trials, keeping the rectangle with
    /// the most surviving labels, and stops early once a trial reaches
    /// `min_labels`. The winning rectangle's pixels are extracted, passed
    /// through the random flip/brightness/vignette transform, and its labels
    /// are returned in the requested format with coordinates relative to the
    /// tile origin.
    ///
    /// # Errors
    ///
    /// Returns `PartialSearchExhausted` when partial rejection is active and
    /// the redraw budget of a trial runs out without an uncut rectangle.
    pub fn sample(&mut self, format: LabelFormat) -> Result<Tile> {
        let mut best: Option<(PixelRect, Vec<AbsoluteLabel>)> = None;
        let mut best_count = 0_usize;
        let mut status = SampleStatus::BestEffort;

        for _ in 0..self.config.max_search_iterations {
            let (rect, rect_labels) = self.draw_uncut_rectangle()?;
            let count = rect_labels.len();

            // A denser rectangle always wins; while the best is still empty
            // the latest rectangle is kept so a winner always exists.
            if count > best_count || best_count == 0 {
                best_count = count;
                best = Some((rect, rect_labels));
            }

            if count >= self.config.min_labels {
                status = SampleStatus::Accepted;
                break;
            }
        }

        let (rect, tile_labels) = best.ok_or_else(|| {
            invalid_parameter(
                "max_search_iterations",
                &self.config.max_search_iterations,
                &"no trial was run",
            )
        })?;

        let pixels = self.mosaic.extract(&rect);
        let params = self.draw_transform_params();
        let (pixels, tile_labels) = transform_tile(pixels, tile_labels, &params);

        let labels = match format {
            LabelFormat::Absolute => LabelSet::Absolute(tile_labels),
            LabelFormat::Normalized => LabelSet::Normalized(convert::to_normalized(
                &tile_labels,
                self.config.tile_width,
                self.config.tile_height,
            )),
        };

        Ok(Tile {
            pixels,
            labels,
            status,
        })
    }

    /// Draw rectangles until one passes the partial-label filter
    fn draw_uncut_rectangle(&mut self) -> Result<(PixelRect, Vec<AbsoluteLabel>)> {
        let x_high = self.region.x_max - self.config.tile_width as i64;
        let y_high = self.region.y_max - self.config.tile_height as i64;

        for _ in 0..self.config.max_partial_retries {
            let x_left = self.rng.random_range(self.region.x_min..x_high);
            let y_top = self.rng.random_range(self.region.y_min..y_high);
            let rect = PixelRect::new(
                x_left,
                y_top,
                x_left + self.config.tile_width as i64,
                y_top + self.config.tile_height as i64,
            );

            let outcome = clip::labels_in_rect(
                self.mosaic.labels(),
                &rect,
                self.config.min_area_ratio,
                self.config.reject_partial,
            );

            if self.config.reject_partial && outcome.is_partial {
                continue;
            }
            return Ok((rect, outcome.labels));
        }

        Err(DatasetError::PartialSearchExhausted {
            attempts: self.config.max_partial_retries,
        })
    }

    fn draw_transform_params(&mut self) -> TransformParams {
        TransformParams {
            flip_bits: self.rng.random_range(0..4_u8),
            bright_value: self.rng.random::<f64>(),
            bright_scale: self.config.bright_scale,
            vignette_sigma_multiplier: self.draw_in_range(self.config.vignette_sigma),
            vignette_x_rel: self.draw_in_range(self.config.vignette_x),
            vignette_y_rel: self.draw_in_range(self.config.vignette_y),
        }
    }

    fn draw_in_range(&mut self, (low, high): (f64, f64)) -> f64 {
        self.rng.random::<f64>() * (high - low) + low
    }
}

#[cfg(test)]
mod tests {
    use super::{SampleStatus, SamplerConfig, TileSampler};
    use crate::labels::{AbsoluteLabel, LabelFormat, LabelSet};
    use crate::sampling::mosaic::Mosaic;
    use crate::sampling::region::RegionRatios;
    use ndarray::Array3;

    fn small_config() -> SamplerConfig {
        SamplerConfig {
            tile_width: 32,
            tile_height: 24,
            min_labels: 1,
            seed: Some(7),
            ..SamplerConfig::default()
        }
    }

    fn plain_mosaic(labels: Vec<AbsoluteLabel>) -> Mosaic {
        Mosaic::new(Array3::from_elem((200, 300, 3), 0.5), labels)
    }

    fn centered_label() -> AbsoluteLabel {
        AbsoluteLabel {
            class_id: 2,
            x_left: 140,
            y_top: 90,
            x_right: 150,
            y_bottom: 100,
            area: 100,
        }
    }

    #[test]
    fn test_zero_min_labels_accepts_first_trial() {
        let mosaic = plain_mosaic(Vec::new());
        let mut config = small_config();
        config.min_labels = 0;

        let mut sampler = match TileSampler::new(&mosaic, &RegionRatios::FULL, config) {
            Ok(sampler) => sampler,
            Err(e) => unreachable!("sampler construction must succeed: {e}"),
        };

        match sampler.sample(LabelFormat::Absolute) {
            Ok(tile) => {
                assert_eq!(tile.status, SampleStatus::Accepted);
                assert_eq!(tile.pixels.dim(), (24, 32, 3));
            }
            Err(e) => unreachable!("sampling must succeed: {e}"),
        }
    }

    #[test]
    fn test_unreachable_min_labels_degrades_to_best_effort() {
        let mosaic = plain_mosaic(Vec::new());
        let mut config = small_config();
        config.min_labels = 3;
        config.max_search_iterations = 25;

        let mut sampler = match TileSampler::new(&mosaic, &RegionRatios::FULL, config) {
            Ok(sampler) => sampler,
            Err(e) => unreachable!("sampler construction must succeed: {e}"),
        };

        match sampler.sample(LabelFormat::Absolute) {
            Ok(tile) => {
                assert_eq!(tile.status, SampleStatus::BestEffort);
                assert!(tile.labels.is_empty());
            }
            Err(e) => unreachable!("sampling must degrade, not fail: {e}"),
        }
    }

    #[test]
    fn test_same_seed_reproduces_the_sequence() {
        let mosaic = plain_mosaic(vec![centered_label()]);

        let sample_twice = || {
            let mut sampler = match TileSampler::new(&mosaic, &RegionRatios::FULL, small_config())
            {
                Ok(sampler) => sampler,
                Err(e) => unreachable!("sampler construction must succeed: {e}"),
            };
            let first = sampler.sample(LabelFormat::Normalized);
            let second = sampler.sample(LabelFormat::Normalized);
            (first, second)
        };

        match (sample_twice(), sample_twice()) {
            ((Ok(a1), Ok(a2)), (Ok(b1), Ok(b2))) => {
                assert_eq!(a1.labels, b1.labels);
                assert_eq!(a2.labels, b2.labels);
                assert_eq!(a1.pixels, b1.pixels);
                assert_eq!(a2.pixels, b2.pixels);
            }
            _ => unreachable!("seeded sampling must succeed"),
        }
    }

    #[test]
    fn test_surviving_label_keeps_its_extent() {
        let mosaic = plain_mosaic(vec![centered_label()]);
        let mut config = small_config();
        config.max_search_iterations = 2000;
        // Only a fully contained label survives, so its extent is preserved.
        config.min_area_ratio = 1.0;

        let mut sampler = match TileSampler::new(&mosaic, &RegionRatios::FULL, config) {
            Ok(sampler) => sampler,
            Err(e) => unreachable!("sampler construction must succeed: {e}"),
        };

        match sampler.sample(LabelFormat::Absolute) {
            Ok(tile) => match tile.labels {
                LabelSet::Absolute(labels) => {
                    assert_eq!(tile.status, SampleStatus::Accepted);
                    assert_eq!(labels.len(), 1);
                    for label in labels {
                        assert_eq!(label.class_id, 2);
                        assert_eq!(label.x_right - label.x_left, 10);
                        assert_eq!(label.y_bottom - label.y_top, 10);
                        assert_eq!(label.area, 100);
                        assert!(label.x_right <= 32);
                        assert!(label.y_bottom <= 24);
                    }
                }
                LabelSet::Normalized(_) => unreachable!("absolute labels were requested"),
            },
            Err(e) => unreachable!("sampling must succeed: {e}"),
        }
    }

    #[test]
    fn test_region_too_small_fails_fast() {
        let mosaic = plain_mosaic(Vec::new());
        let mut config = small_config();
        config.tile_width = 400;

        assert!(TileSampler::new(&mosaic, &RegionRatios::FULL, config).is_err());
    }

    #[test]
    fn test_partial_rejection_budget_is_fatal_when_exhausted() {
        // One giant label covers everything, so every rectangle cuts it.
        let wall = AbsoluteLabel {
            class_id: 0,
            x_left: 0,
            y_top: 0,
            x_right: 299,
            y_bottom: 199,
            area: 299 * 199,
        };
        let mosaic = plain_mosaic(vec![wall]);
        let mut config = small_config();
        config.reject_partial = true;
        config.max_partial_retries = 50;

        let mut sampler = match TileSampler::new(&mosaic, &RegionRatios::FULL, config) {
            Ok(sampler) => sampler,
            Err(e) => unreachable!("sampler construction must succeed: {e}"),
        };

        assert!(sampler.sample(LabelFormat::Absolute).is_err());
    }

    #[test]
    fn test_set_region_constrains_draws() {
        let mosaic = plain_mosaic(Vec::new());
        let mut config = small_config();
        config.min_labels = 0;

        let mut sampler = match TileSampler::new(&mosaic, &RegionRatios::FULL, config) {
            Ok(sampler) => sampler,
            Err(e) => unreachable!("sampler construction must succeed: {e}"),
        };

        match sampler.set_region(&RegionRatios::horizontal_band(0.5, 1.0)) {
            Ok(()) => {}
            Err(e) => unreachable!("band region must be accepted: {e}"),
        }
        assert_eq!(sampler.region().y_min, 100);
        assert_eq!(sampler.region().y_max, 200);

        // A band too thin for the tile is refused and leaves the old region.
        assert!(sampler.set_region(&RegionRatios::horizontal_band(0.5, 0.55)).is_err());
    }
}
