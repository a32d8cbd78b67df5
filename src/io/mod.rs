//! Input/output operations and error handling

/// Command-line interface and dataset generation orchestration
pub mod cli;
/// Dataset constants and runtime configuration defaults
pub mod configuration;
/// Error types for dataset operations
pub mod error;
/// Raster image loading and 8-bit export
pub mod image;
/// YOLO-formatted label file reading and writing
pub mod labels;
/// Preview rendering with burned-in label boxes
pub mod preview;
/// Progress reporting for generation runs
pub mod progress;
