mod blur;
mod noise;
mod pipeline;
mod resize;
mod sampling;
pub mod types;

pub use blur::{add_blur, Blur, Interpolation};
pub use noise::{add_noise, Noise, INTENSITY_SCALE};
pub use pipeline::{Degradation, Pipeline, TrainingPair};
pub use resize::resize;
pub use sampling::{add_sampling, MaskChannels, Sampling};
pub use types::{Degrade, Image, ImageView};
