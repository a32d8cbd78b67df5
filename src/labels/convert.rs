//! Conversion between normalized and absolute label formats
//!
//! Both directions use `dimension - 1` as the scale factor (pixel-center
//! convention). The absolute form rounds to integer pixels, so a round-trip
//! reproduces the normalized input only up to one pixel of quantization.

use crate::labels::{AbsoluteLabel, NormalizedLabel};

/// Convert normalized labels to absolute pixel coordinates
///
/// The precomputed area is derived from the normalized extent scaled by the
/// full image dimensions, not from the rounded corner coordinates, and is
/// rounded independently of them.
pub fn to_absolute(
    labels: &[NormalizedLabel],
    img_width: usize,
    img_height: usize,
) -> Vec<AbsoluteLabel> {
    let x_scale = (img_width - 1) as f64;
    let y_scale = (img_height - 1) as f64;

    labels
        .iter()
        .map(|label| AbsoluteLabel {
            class_id: label.class_id,
            x_left: ((label.x_center - label.width / 2.0) * x_scale).round() as i64,
            y_top: ((label.y_center - label.height / 2.0) * y_scale).round() as i64,
            x_right: ((label.x_center + label.width / 2.0) * x_scale).round() as i64,
            y_bottom: ((label.y_center + label.height / 2.0) * y_scale).round() as i64,
            area: (label.width * img_width as f64 * label.height * img_height as f64).round()
                as i64,
        })
        .collect()
}

/// Convert absolute labels to normalized center/size form
///
/// The area field is dropped; it is not part of the normalized
/// representation.
pub fn to_normalized(
    labels: &[AbsoluteLabel],
    img_width: usize,
    img_height: usize,
) -> Vec<NormalizedLabel> {
    let x_scale = (img_width - 1) as f64;
    let y_scale = (img_height - 1) as f64;

    labels
        .iter()
        .map(|label| NormalizedLabel {
            class_id: label.class_id,
            x_center: ((label.x_left + label.x_right) as f64 / 2.0) / x_scale,
            y_center: ((label.y_top + label.y_bottom) as f64 / 2.0) / y_scale,
            width: (label.x_right - label.x_left) as f64 / x_scale,
            height: (label.y_bottom - label.y_top) as f64 / y_scale,
        })
        .collect()
}
