use super::types::{positive_int, require_arity, split_spec, Degrade, Image, ImageView};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Array3};
use rand::{Rng, RngCore};
use std::str::FromStr;

/// How random masks are drawn across the channel axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaskChannels {
    /// One independent draw per pixel and channel
    #[default]
    PerChannel,
    /// One draw per pixel, repeated on every channel
    Shared,
}

/// Subsampling policy
///
/// `Random` and `Gaussian` use opposite conventions on purpose:
/// `prob` is the probability of *dropping* a sample, while the Gaussian
/// surface is the probability of *keeping* one.
#[derive(Debug, Clone, PartialEq)]
pub enum Sampling {
    /// Keep rows that are multiples of `stride_y` and columns that are multiples of `stride_x`
    Uniform { stride_y: usize, stride_x: usize },

    /// Keep a sample iff its uniform draw exceeds `prob`
    Random { prob: f64, channels: MaskChannels },

    /// Keep a sample iff its uniform draw is below
    /// `amplitude * exp(-((x - x0)^2 / 2 sigma_x^2 + (y - y0)^2 / 2 sigma_y^2))`,
    /// where `x` and `y` span [-1, 1] across the width and height.
    ///
    /// `amplitude` is not clamped. Values above 1 keep everything near the peak
    /// and values at or below 0 drop everything.
    Gaussian {
        x0: f64,
        y0: f64,
        sigma_x: f64,
        sigma_y: f64,
        amplitude: f64,
        channels: MaskChannels,
    },
}

impl Sampling {
    /// Build a policy from a kind tag and its positional parameters
    ///
    /// * `uniform` - `(stride_y, stride_x)`, truncated to integers
    /// * `random` - `(prob,)`
    /// * `gaussian` - `(x0, y0, sigma_x, sigma_y, amplitude)`
    pub fn from_params(kind: &str, params: &[f64]) -> Result<Self> {
        match kind {
            "uniform" => {
                require_arity(kind, params, 2)?;
                Ok(Self::Uniform {
                    stride_y: positive_int("stride_y", params[0])?,
                    stride_x: positive_int("stride_x", params[1])?,
                })
            }
            "random" => {
                require_arity(kind, params, 1)?;
                Ok(Self::Random {
                    prob: params[0],
                    channels: MaskChannels::default(),
                })
            }
            "gaussian" => {
                require_arity(kind, params, 5)?;
                Ok(Self::Gaussian {
                    x0: params[0],
                    y0: params[1],
                    sigma_x: params[2],
                    sigma_y: params[3],
                    amplitude: params[4],
                    channels: MaskChannels::default(),
                })
            }
            other => Err(Error::UnknownKind {
                family: "sampling",
                kind: other.to_string(),
            }),
        }
    }

    /// Replace the channel policy of the random variants; `Uniform` is unaffected
    pub fn with_channels(mut self, mode: MaskChannels) -> Self {
        match &mut self {
            Self::Random { channels, .. } | Self::Gaussian { channels, .. } => *channels = mode,
            Self::Uniform { .. } => {}
        }
        self
    }

    /// Build a fresh {0, 1} mask of the given (height, width, channels) shape
    pub fn mask<R: Rng + ?Sized>(
        &self,
        shape: (usize, usize, usize),
        rng: &mut R,
    ) -> Result<Array3<f32>> {
        let (height, width, _) = shape;

        let mask = match *self {
            Self::Uniform { stride_y, stride_x } => {
                if stride_y == 0 || stride_x == 0 {
                    return Err(Error::invalid("stride", "must be at least 1"));
                }
                Array3::from_shape_fn(shape, |(y, x, _)| {
                    indicator(y % stride_y == 0 && x % stride_x == 0)
                })
            }
            Self::Random { prob, channels } => {
                draw_mask(shape, channels, rng, |_, _, draw| draw > prob)
            }
            Self::Gaussian {
                x0,
                y0,
                sigma_x,
                sigma_y,
                amplitude,
                channels,
            } => {
                let gauss = gaussian_surface(height, width, x0, y0, sigma_x, sigma_y, amplitude);
                draw_mask(shape, channels, rng, |y, x, draw| draw < gauss[[y, x]])
            }
        };

        Ok(mask)
    }
}

impl FromStr for Sampling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, params) = split_spec(s)?;
        Self::from_params(kind, &params)
    }
}

impl Degrade for Sampling {
    fn degrade(&self, image: ImageView<'_>, rng: &mut dyn RngCore) -> Result<Image> {
        add_sampling(image, self, rng)
    }

    fn name(&self) -> &'static str {
        "sampling"
    }
}

/// Multiply `image` by a freshly drawn mask
///
/// Kept samples carry their original value, dropped samples become 0.
pub fn add_sampling<R: Rng + ?Sized>(
    image: ImageView<'_>,
    sampling: &Sampling,
    rng: &mut R,
) -> Result<Image> {
    let _span = tracing::debug_span!("add_sampling").entered();

    let mask = sampling.mask(image.dim(), rng)?;
    let mut out = image.to_owned();
    out *= &mask;
    Ok(out)
}

fn indicator(keep: bool) -> f32 {
    if keep {
        1.0
    } else {
        0.0
    }
}

/// Draw one uniform [0, 1) value per sample (or per pixel when shared)
/// and keep the sample iff `keep(y, x, draw)`.
fn draw_mask<R, F>(
    shape: (usize, usize, usize),
    channels: MaskChannels,
    rng: &mut R,
    keep: F,
) -> Array3<f32>
where
    R: Rng + ?Sized,
    F: Fn(usize, usize, f64) -> bool,
{
    match channels {
        MaskChannels::PerChannel => Array3::from_shape_fn(shape, |(y, x, _)| {
            indicator(keep(y, x, rng.gen::<f64>()))
        }),
        MaskChannels::Shared => {
            let (height, width, _) = shape;
            let plane = Array2::from_shape_fn((height, width), |(y, x)| {
                indicator(keep(y, x, rng.gen::<f64>()))
            });
            Array3::from_shape_fn(shape, |(y, x, _)| plane[[y, x]])
        }
    }
}

fn gaussian_surface(
    height: usize,
    width: usize,
    x0: f64,
    y0: f64,
    sigma_x: f64,
    sigma_y: f64,
    amplitude: f64,
) -> Array2<f64> {
    let ly = Array1::linspace(-1.0, 1.0, height);
    let lx = Array1::linspace(-1.0, 1.0, width);

    Array2::from_shape_fn((height, width), |(y, x)| {
        let dx = lx[x] - x0;
        let dy = ly[y] - y0;
        amplitude * (-(dx * dx / (2.0 * sigma_x * sigma_x) + dy * dy / (2.0 * sigma_y * sigma_y))).exp()
    })
}
