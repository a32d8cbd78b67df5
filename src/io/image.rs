//! Raster image loading and 8-bit export
//!
//! Mosaics and tiles are held as `(height, width, 3)` arrays of `[0, 1]`
//! floats. Quantization to 8 bits happens only at the export boundary and
//! never touches label geometry.

use std::path::Path;

use image::{ImageBuffer, Rgb};
use ndarray::Array3;

use crate::io::error::{DatasetError, Result};

/// Load a raster image as floating-point RGB data
///
/// Any format the `image` crate decodes is accepted; the result is converted
/// to RGB with channel values scaled to `[0, 1]`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a decodable image.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Array3<f64>> {
    let path_buf = path.as_ref().to_path_buf();
    let img = image::open(&path_buf).map_err(|e| DatasetError::ImageLoad {
        path: path_buf,
        source: e,
    })?;
    let rgb_img = img.to_rgb8();

    let (width, height) = (rgb_img.width() as usize, rgb_img.height() as usize);
    let mut pixels = Array3::zeros((height, width, 3));

    for (x, y, pixel) in rgb_img.enumerate_pixels() {
        let channels = pixel.0;
        for c in 0..3 {
            let value = channels.get(c).copied().unwrap_or(0);
            if let Some(cell) = pixels.get_mut((y as usize, x as usize, c)) {
                *cell = f64::from(value) / 255.0;
            }
        }
    }

    Ok(pixels)
}

/// Save floating-point RGB data as an 8-bit image
///
/// Channel values are clamped to `[0, 1]` and scaled to `0..=255` with
/// rounding. The encoding format follows the path extension.
///
/// # Errors
///
/// Returns an error if the image cannot be encoded or written.
pub fn save_image<P: AsRef<Path>>(path: P, pixels: &Array3<f64>) -> Result<()> {
    let (height, width, _channels) = pixels.dim();
    let mut img = ImageBuffer::new(width as u32, height as u32);

    for row in 0..height {
        for col in 0..width {
            let quantized = [
                quantize(pixels[(row, col, 0)]),
                quantize(pixels[(row, col, 1)]),
                quantize(pixels[(row, col, 2)]),
            ];
            img.put_pixel(col as u32, row as u32, Rgb(quantized));
        }
    }

    img.save(path.as_ref()).map_err(|e| DatasetError::ImageExport {
        path: path.as_ref().to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn quantize(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
