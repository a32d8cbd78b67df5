//! Random augmentation of extracted tiles
//!
//! Applies flips, a brightness shift and a synthetic vignette to a tile.
//! Flips remap label geometry; brightness and vignette touch pixels only.

use ndarray::{Array3, Axis};

use crate::labels::AbsoluteLabel;
use crate::math::falloff::gaussian_falloff_mask;

/// Flip bit selecting a left-right mirror
pub const FLIP_HORIZONTAL: u8 = 0b01;
/// Flip bit selecting a top-bottom mirror
pub const FLIP_VERTICAL: u8 = 0b10;

/// Parameters for one tile transformation
///
/// The two flip bits act on orthogonal axes, so setting both is equivalent
/// regardless of application order. `bright_value` of 0.5 leaves pixel values
/// unchanged; 0 darkens and 1 lightens by `bright_scale`.
#[derive(Debug, Clone, Copy)]
pub struct TransformParams {
    /// Flip selection, combination of [`FLIP_HORIZONTAL`] and [`FLIP_VERTICAL`]
    pub flip_bits: u8,
    /// Brightness draw in `[0, 1]`
    pub bright_value: f64,
    /// Maximum brighten/darken magnitude
    pub bright_scale: f64,
    /// Vignette sigma as a multiple of half the larger tile dimension, positive
    pub vignette_sigma_multiplier: f64,
    /// Vignette center column as a fraction of the tile width
    pub vignette_x_rel: f64,
    /// Vignette center row as a fraction of the tile height
    pub vignette_y_rel: f64,
}

/// Transform a tile and its labels
///
/// Pixel values are expected in `[0, 1]` and stay there: the brightness shift
/// is clamped and the vignette only attenuates. Labels use coordinates
/// relative to the tile origin and are remapped by the flips alone.
pub fn transform_tile(
    mut tile: Array3<f64>,
    mut labels: Vec<AbsoluteLabel>,
    params: &TransformParams,
) -> (Array3<f64>, Vec<AbsoluteLabel>) {
    let (height, width, _channels) = tile.dim();

    if params.flip_bits & FLIP_HORIZONTAL != 0 {
        tile.invert_axis(Axis(1));
        let mirror = width as i64 - 1;
        labels = labels
            .iter()
            .map(|label| AbsoluteLabel {
                class_id: label.class_id,
                x_left: mirror - label.x_right,
                y_top: label.y_top,
                x_right: mirror - label.x_left,
                y_bottom: label.y_bottom,
                area: label.area,
            })
            .collect();
    }

    if params.flip_bits & FLIP_VERTICAL != 0 {
        tile.invert_axis(Axis(0));
        let mirror = height as i64 - 1;
        labels = labels
            .iter()
            .map(|label| AbsoluteLabel {
                class_id: label.class_id,
                x_left: label.x_left,
                y_top: mirror - label.y_bottom,
                x_right: label.x_right,
                y_bottom: mirror - label.y_top,
                area: label.area,
            })
            .collect();
    }

    let delta = params.bright_value * params.bright_scale * 2.0 - params.bright_scale;
    tile.mapv_inplace(|value| (value + delta).clamp(0.0, 1.0));

    let sigma = params.vignette_sigma_multiplier * width.max(height) as f64 / 2.0;
    let x_center = (width as f64 * params.vignette_x_rel) as i64;
    let y_center = (height as f64 * params.vignette_y_rel) as i64;
    let mask = gaussian_falloff_mask(height, width, sigma, x_center, y_center);
    for ((row, col, _channel), value) in tile.indexed_iter_mut() {
        *value *= mask[(row, col)];
    }

    (tile, labels)
}
