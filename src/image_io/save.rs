//! Image saving utilities.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::degradation::Image;
use crate::error::{Error, Result};

use super::RGB_CHANNELS;

/// Save a tensor as an image file (format inferred from extension)
///
/// Values are clamped to [0, 1] before quantization, so unclipped noise
/// saturates instead of wrapping.
///
/// # Errors
///
/// Returns an error if the tensor has an unsupported channel count or the
/// file cannot be written.
pub fn save_image<P: AsRef<Path>>(path: P, tensor: &Image) -> Result<()> {
    let path = path.as_ref();

    to_rgb(tensor)?
        .save(path)
        .map_err(|source| Error::ImageSave {
            path: path.to_path_buf(),
            source,
        })
}

/// Convert an HWC tensor with 1 or 3 channels to an RGB image.
pub fn to_rgb(tensor: &Image) -> Result<RgbImage> {
    let (height, width, channels) = tensor.dim();
    if channels != 1 && channels != RGB_CHANNELS {
        return Err(Error::ShapeMismatch {
            expected: "1 or 3 channels".to_string(),
            actual: format!("{channels} channels"),
        });
    }

    let pick = |x: u32, y: u32, c: usize| {
        let c = if channels == 1 { 0 } else { c };
        quantize(tensor[[y as usize, x as usize, c]])
    };

    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        Rgb([pick(x, y, 0), pick(x, y, 1), pick(x, y, 2)])
    }))
}

/// Map [0, 1] to [0, 255] with clamping and rounding.
#[inline]
fn quantize(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
