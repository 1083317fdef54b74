//! # degrade
//!
//! Synthesizes corrupted copies of clean images for training image-restoration
//! networks. Three independent operators are provided:
//!
//! - [`add_sampling`]: multiplies the image by a binary keep/drop mask
//!   (regular grid, i.i.d. random, or Gaussian-weighted random)
//! - [`add_noise`]: additive Gaussian or Poisson shot noise
//! - [`add_blur`]: integer downsampling with spline interpolation of order 0-5,
//!   optionally upsampled back to the input resolution
//!
//! Every operator returns a new array and draws randomness only from the RNG
//! passed in, so a seeded generator reproduces its output exactly.
//!
//! ## Example
//!
//! ```no_run
//! use degrade::{add_blur, add_sampling, Blur, Image, Interpolation, Sampling};
//! use rand::SeedableRng;
//!
//! # fn main() -> degrade::Result<()> {
//! let clean = Image::ones((64, 64, 3));
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! let masked = add_sampling(clean.view(), &"random:0.5".parse::<Sampling>()?, &mut rng)?;
//! let blurred = add_blur(masked.view(), &Blur::new(Interpolation::Bicubic, 4))?;
//! assert_eq!(blurred.dim(), (64, 64, 3));
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod degradation;
pub mod error;
pub mod image_io;
pub mod output;
pub mod source;

pub use degradation::{
    add_blur, add_noise, add_sampling, resize, Blur, Degradation, Degrade, Image, ImageView,
    Interpolation, MaskChannels, Noise, Pipeline, Sampling, TrainingPair,
};
pub use error::{Error, Result};
