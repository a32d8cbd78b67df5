//! Dataset generation constants and runtime configuration defaults

// Tile geometry defaults
/// Default output tile width in pixels
pub const DEFAULT_TILE_WIDTH: usize = 640;
/// Default output tile height in pixels
pub const DEFAULT_TILE_HEIGHT: usize = 480;

// Sampling acceptance defaults
/// Default minimum number of labels per accepted tile
pub const DEFAULT_MIN_LABELS: usize = 1;
/// Default minimum retained fraction of a clipped label's area
pub const DEFAULT_MIN_AREA_RATIO: f64 = 0.5;
/// Default maximum outer search iterations before settling for best effort
pub const DEFAULT_MAX_SEARCH_ITERATIONS: usize = 1000;

// Bounds the redraw loop that skips rectangles with partially cut labels
/// Default rectangle redraw budget under partial rejection
pub const DEFAULT_PARTIAL_RETRY_LIMIT: usize = 10_000;

// Augmentation defaults
/// Default maximum brighten/darken magnitude
pub const DEFAULT_BRIGHT_SCALE: f64 = 0.1;
/// Default lower bound of the vignette sigma multiplier
pub const DEFAULT_VIGNETTE_SIGMA_MIN: f64 = 0.5;
/// Default upper bound of the vignette sigma multiplier
pub const DEFAULT_VIGNETTE_SIGMA_MAX: f64 = 1.25;
/// Default lower bound of the relative vignette center, both axes
pub const DEFAULT_VIGNETTE_CENTER_MIN: f64 = 0.4;
/// Default upper bound of the relative vignette center, both axes
pub const DEFAULT_VIGNETTE_CENTER_MAX: f64 = 0.6;

// Dataset layout defaults
/// Default total number of generated images across all splits
pub const DEFAULT_IMAGE_COUNT: usize = 5000;
/// Default fraction of images assigned to the train split
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;
/// Default fraction of images assigned to the validation split
pub const DEFAULT_VALIDATION_RATIO: f64 = 0.1;
/// Default fraction of images assigned to the test split
pub const DEFAULT_TEST_RATIO: f64 = 0.1;

// Output settings
/// File extension for emitted tile and preview images
pub const IMAGE_EXTENSION: &str = "png";
/// File extension for emitted label files
pub const LABEL_EXTENSION: &str = "txt";
/// Prefix of generated dataset item file stems
pub const FILE_STEM_PREFIX: &str = "IMG_";
