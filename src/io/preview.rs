//! Human-inspection previews of labeled tiles
//!
//! Burns each label's bounding-box perimeter into a copy of the tile so a
//! generated dataset can be spot-checked visually without tooling.

use ndarray::Array3;

use crate::labels::{AbsoluteLabel, LabelSet, convert};

/// Copy a tile with its label boxes drawn in white
///
/// Normalized labels are mapped to pixel coordinates against the tile
/// dimensions first. Perimeter pixels falling outside the tile are clipped
/// away rather than wrapped.
pub fn burn_labels(tile: &Array3<f64>, labels: &LabelSet) -> Array3<f64> {
    let (height, width, _channels) = tile.dim();
    let absolute: Vec<AbsoluteLabel> = match labels {
        LabelSet::Absolute(list) => list.clone(),
        LabelSet::Normalized(list) => convert::to_absolute(list, width, height),
    };

    let mut preview = tile.clone();
    for label in &absolute {
        for col in label.x_left..=label.x_right {
            paint_white(&mut preview, label.y_top, col);
            paint_white(&mut preview, label.y_bottom, col);
        }
        for row in label.y_top..=label.y_bottom {
            paint_white(&mut preview, row, label.x_left);
            paint_white(&mut preview, row, label.x_right);
        }
    }

    preview
}

fn paint_white(pixels: &mut Array3<f64>, row: i64, col: i64) {
    let (height, width, channels) = pixels.dim();
    if row < 0 || col < 0 || row >= height as i64 || col >= width as i64 {
        return;
    }
    for channel in 0..channels {
        pixels[(row as usize, col as usize, channel)] = 1.0;
    }
}
