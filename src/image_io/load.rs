//! Image loading utilities.

use std::path::Path;

use image::DynamicImage;

use crate::degradation::Image;
use crate::error::{Error, Result};

use super::RGB_CHANNELS;

/// Load an image from disk as an RGB tensor
///
/// The image is converted to RGB, laid out as (height, width, 3)
/// and normalized to [0, 1].
///
/// # Errors
///
/// Returns an error if the image cannot be opened or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(to_tensor(&img))
}

/// Convert a `DynamicImage` to a normalized HWC tensor.
pub fn to_tensor(img: &DynamicImage) -> Image {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut tensor = Image::zeros((height as usize, width as usize, RGB_CHANNELS));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..RGB_CHANNELS {
            // Normalize to [0, 1]
            tensor[[y as usize, x as usize, c]] = f32::from(pixel[c]) / 255.0;
        }
    }

    tensor
}
