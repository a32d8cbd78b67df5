//! Random tile sampling from annotated mosaics
//!
//! A loaded [`Mosaic`] is an immutable resource; [`TileSampler`] borrows it
//! together with a region handle describing the band of the mosaic it may
//! draw from, so one mosaic can back several logical datasets without being
//! reloaded.

/// Loaded mosaic image with its full-extent labels
pub mod mosaic;
/// Sampling region handles in ratio and pixel space
pub mod region;
/// The rectangle search state machine
pub mod sampler;

pub use mosaic::Mosaic;
pub use region::{RegionRatios, SamplingRegion};
pub use sampler::{SampleStatus, SamplerConfig, Tile, TileSampler};
