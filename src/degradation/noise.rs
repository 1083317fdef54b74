//! Noise injection for normalized images.
//!
//! Two sensor models are supported:
//! - additive Gaussian noise with sigma given on the 0-255 intensity scale
//! - Poisson shot noise, which quantizes each sample to a photon count
//!   on the 0-255 scale before mapping back to [0, 1]
//!
//! Outputs are never clipped; callers clamp downstream if they need to.

use super::types::{require_arity, split_spec, Degrade, Image, ImageView};
use crate::error::{Error, Result};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Poisson, StandardNormal};
use std::str::FromStr;

/// Full-scale intensity the noise parameters refer to.
pub const INTENSITY_SCALE: f64 = 255.0;

/// Noise model
#[derive(Debug, Clone, PartialEq)]
pub enum Noise {
    /// `image + sigma / 255 * N(0, 1)`, one draw per sample
    Gaussian { sigma: f64 },
    /// `Poisson(255 * image) / 255`, one draw per sample
    Poisson,
}

impl Noise {
    /// Build a noise model from a kind tag and its positional parameters
    ///
    /// * `gaussian` (alias `random`) - `(sigma,)` on the 0-255 scale
    /// * `poisson` - no parameters
    pub fn from_params(kind: &str, params: &[f64]) -> Result<Self> {
        match kind {
            "gaussian" | "random" => {
                require_arity(kind, params, 1)?;
                Ok(Self::Gaussian { sigma: params[0] })
            }
            "poisson" => Ok(Self::Poisson),
            other => Err(Error::UnknownKind {
                family: "noise",
                kind: other.to_string(),
            }),
        }
    }
}

impl FromStr for Noise {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, params) = split_spec(s)?;
        Self::from_params(kind, &params)
    }
}

impl Degrade for Noise {
    fn degrade(&self, image: ImageView<'_>, rng: &mut dyn RngCore) -> Result<Image> {
        add_noise(image, self, rng)
    }

    fn name(&self) -> &'static str {
        "noise"
    }
}

/// Apply `noise` to a copy of `image`
///
/// # Errors
/// Poisson noise fails with `InvalidParameter` on a negative or non-finite sample,
/// since no distribution exists for that rate. Gaussian noise never fails and
/// accepts any sigma, including negative values.
pub fn add_noise<R: Rng + ?Sized>(image: ImageView<'_>, noise: &Noise, rng: &mut R) -> Result<Image> {
    let _span = tracing::debug_span!("add_noise").entered();

    match *noise {
        Noise::Gaussian { sigma } => {
            let scale = sigma / INTENSITY_SCALE;
            Ok(image.mapv(|v| {
                let draw: f64 = StandardNormal.sample(rng);
                v + (scale * draw) as f32
            }))
        }
        Noise::Poisson => {
            let mut out = Image::zeros(image.raw_dim());
            for (dst, &v) in out.iter_mut().zip(image.iter()) {
                *dst = (shot_count(f64::from(v) * INTENSITY_SCALE, rng)? / INTENSITY_SCALE) as f32;
            }
            Ok(out)
        }
    }
}

/// Draw a photon count with mean `rate`
fn shot_count<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> Result<f64> {
    if rate == 0.0 {
        return Ok(0.0);
    }
    if !rate.is_finite() {
        return Err(Error::invalid("poisson rate", format!("{rate} is not finite")));
    }

    let poisson = Poisson::new(rate).map_err(|e| {
        Error::invalid("poisson rate", format!("{rate} has no Poisson distribution: {e}"))
    })?;
    Ok(poisson.sample(rng))
}
