//! Random labeled tile sampling from annotated mosaic images
//!
//! The system extracts fixed-size tiles at random positions from large
//! annotated source images, clips the object detection labels to each tile,
//! applies flip/brightness/vignette augmentation, and emits train, validation
//! and test datasets in YOLO label format.

#![deny(unsafe_code)]

/// Input/output operations, CLI orchestration and error handling
pub mod io;
/// Label formats, conversion and rectangle clipping
pub mod labels;
/// Mathematical utilities for tile augmentation
pub mod math;
/// Mosaic resources, region handles and the tile sampler
pub mod sampling;
/// Tile and label augmentation transforms
pub mod transform;

pub use io::error::{DatasetError, Result};
