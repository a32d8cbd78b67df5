//! Loaded mosaic resource
//!
//! A mosaic pairs a large floating-point image with absolute labels covering
//! its whole extent. It is loaded once and treated as immutable; samplers
//! borrow it and extract ephemeral tiles.

use std::path::Path;

use ndarray::{Array3, s};

use crate::io::error::Result;
use crate::io::{image, labels as label_io};
use crate::labels::{AbsoluteLabel, PixelRect, convert};

/// Annotated source image from which tiles are sampled
#[derive(Debug, Clone)]
pub struct Mosaic {
    pixels: Array3<f64>,
    labels: Vec<AbsoluteLabel>,
    width: usize,
    height: usize,
}

impl Mosaic {
    /// Create a mosaic from in-memory pixel data and absolute labels
    ///
    /// Pixels are `(height, width, channels)` floats in `[0, 1]`; label
    /// coordinates are relative to the mosaic origin with area fields
    /// consistent with their extent.
    pub fn new(pixels: Array3<f64>, labels: Vec<AbsoluteLabel>) -> Self {
        let (height, width, _channels) = pixels.dim();
        Self {
            pixels,
            labels,
            width,
            height,
        }
    }

    /// Load a mosaic from an image file and its YOLO label file
    ///
    /// Normalized labels are converted to absolute pixel coordinates against
    /// the mosaic dimensions at load time, so every later rectangle query
    /// works in integer pixel space.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be decoded or the label file
    /// cannot be read and parsed.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        image_path: P,
        labels_path: Q,
    ) -> Result<Self> {
        let pixels = image::load_image(image_path)?;
        let (height, width, _channels) = pixels.dim();
        let normalized = label_io::read_labels(labels_path)?;
        let labels = convert::to_absolute(&normalized, width, height);
        Ok(Self::new(pixels, labels))
    }

    /// Mosaic width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Mosaic height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Labels covering the full mosaic extent
    pub fn labels(&self) -> &[AbsoluteLabel] {
        &self.labels
    }

    /// Full mosaic pixel data
    pub const fn pixels(&self) -> &Array3<f64> {
        &self.pixels
    }

    /// Copy the pixel data under a rectangle
    ///
    /// The rectangle is expected to lie within the mosaic bounds; samplers
    /// guarantee this by construction of the sampling region.
    pub fn extract(&self, rect: &PixelRect) -> Array3<f64> {
        self.pixels
            .slice(s![
                rect.y_top as usize..rect.y_bottom as usize,
                rect.x_left as usize..rect.x_right as usize,
                ..
            ])
            .to_owned()
    }
}
