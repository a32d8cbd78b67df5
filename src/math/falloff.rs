//! Gaussian falloff mask construction
//!
//! Builds the radial attenuation mask used to simulate lens vignetting. The
//! mask is renormalized by its own maximum so it only ever attenuates,
//! regardless of where the center lands relative to the image.

use ndarray::Array2;

/// Build a 2D Gaussian falloff mask
///
/// The mask value at `(row, col)` is
/// `exp(-(dx² + dy²) / (2 σ²))` measured from `(x_center, y_center)`,
/// divided by the mask maximum so the peak is exactly 1. The center may lie
/// outside the mask bounds; the peak then sits on the nearest edge. `sigma`
/// must be positive.
pub fn gaussian_falloff_mask(
    height: usize,
    width: usize,
    sigma: f64,
    x_center: i64,
    y_center: i64,
) -> Array2<f64> {
    let denominator = 2.0 * sigma * sigma;

    let mut mask = Array2::from_shape_fn((height, width), |(row, col)| {
        let dx = (col as i64 - x_center) as f64;
        let dy = (row as i64 - y_center) as f64;
        (-(dx * dx + dy * dy) / denominator).exp()
    });

    // exp() is strictly positive, so the fold can start at 0 and the
    // division below never sees a zero peak.
    let peak = mask.iter().fold(0.0_f64, |acc, &value| acc.max(value));
    mask.mapv_inplace(|value| value / peak);

    mask
}

#[cfg(test)]
mod tests {
    use super::gaussian_falloff_mask;

    #[test]
    fn test_peak_is_one_at_center() {
        let mask = gaussian_falloff_mask(10, 10, 4.0, 5, 5);

        assert!((mask[(5, 5)] - 1.0).abs() < f64::EPSILON);
        for value in &mask {
            assert!(*value <= 1.0);
            assert!(*value > 0.0);
        }
    }

    #[test]
    fn test_peak_is_one_with_center_outside_bounds() {
        let mask = gaussian_falloff_mask(8, 8, 3.0, -4, -4);

        let peak = mask.iter().fold(0.0_f64, |acc, &value| acc.max(value));
        assert!((peak - 1.0).abs() < f64::EPSILON);
        // Nearest corner to the outside center carries the peak.
        assert!((mask[(0, 0)] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_falloff_is_monotonic_from_center() {
        let mask = gaussian_falloff_mask(9, 9, 2.0, 4, 4);

        assert!(mask[(4, 4)] > mask[(4, 6)]);
        assert!(mask[(4, 6)] > mask[(4, 8)]);
        assert!(mask[(4, 4)] > mask[(0, 0)]);
    }
}
