//! Conversions between image files and HWC tensors.

mod load;
mod save;

pub use load::{load_image, to_tensor};
pub use save::{save_image, to_rgb};

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;
