//! Mathematical utilities for tile augmentation

/// Gaussian falloff masks for synthetic vignetting
pub mod falloff;
