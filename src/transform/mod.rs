//! Tile and label augmentation transforms

/// Flip, brightness and vignette application
pub mod augment;

pub use augment::{FLIP_HORIZONTAL, FLIP_VERTICAL, TransformParams, transform_tile};
