use super::resize::resize;
use super::types::{positive_int, require_arity, split_spec, Degrade, Image, ImageView};
use crate::error::{Error, Result};
use rand::RngCore;
use std::fmt;
use std::str::FromStr;

/// Resampling kernel, named after the spline order it uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpolation {
    Nearest,
    Bilinear,
    Biquadratic,
    Bicubic,
    Biquartic,
    Biquintic,
}

impl Interpolation {
    /// Spline order, 0 (nearest) through 5 (biquintic)
    pub fn order(self) -> usize {
        match self {
            Self::Nearest => 0,
            Self::Bilinear => 1,
            Self::Biquadratic => 2,
            Self::Bicubic => 3,
            Self::Biquartic => 4,
            Self::Biquintic => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Biquadratic => "biquadratic",
            Self::Bicubic => "bicubic",
            Self::Biquartic => "biquartic",
            Self::Biquintic => "biquintic",
        }
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nearest" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            "biquadratic" => Ok(Self::Biquadratic),
            "bicubic" => Ok(Self::Bicubic),
            "biquartic" => Ok(Self::Biquartic),
            "biquintic" => Ok(Self::Biquintic),
            other => Err(Error::UnknownKind {
                family: "interpolation",
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Downsample-then-upsample blur
#[derive(Debug, Clone, PartialEq)]
pub struct Blur {
    pub interpolation: Interpolation,
    /// Integer downsampling factor applied to height and width
    pub factor: usize,
    /// Resize back to the input resolution after downsampling
    pub keep_size: bool,
}

impl Blur {
    pub fn new(interpolation: Interpolation, factor: usize) -> Self {
        Self {
            interpolation,
            factor,
            keep_size: true,
        }
    }

    pub fn keep_size(mut self, keep_size: bool) -> Self {
        self.keep_size = keep_size;
        self
    }

    /// Build a blur from an interpolation tag and `(factor)` or `(factor, keep_size)`
    ///
    /// The factor is truncated to an integer; a non-zero `keep_size` means true.
    pub fn from_params(kind: &str, params: &[f64]) -> Result<Self> {
        let interpolation = kind.parse::<Interpolation>()?;
        require_arity(kind, params, 1)?;

        let factor = positive_int("factor", params[0])?;
        let keep_size = params.get(1).map_or(true, |&v| v != 0.0);

        Ok(Self::new(interpolation, factor).keep_size(keep_size))
    }

    /// Shape produced for an `(height, width, channels)` input
    pub fn output_shape(&self, (height, width, channels): (usize, usize, usize)) -> Result<(usize, usize, usize)> {
        let (small_h, small_w) = self.downsampled((height, width))?;
        if self.keep_size {
            Ok((height, width, channels))
        } else {
            Ok((small_h, small_w, channels))
        }
    }

    fn downsampled(&self, (height, width): (usize, usize)) -> Result<(usize, usize)> {
        if self.factor == 0 {
            return Err(Error::invalid("factor", "must be at least 1"));
        }

        let (small_h, small_w) = (height / self.factor, width / self.factor);
        if small_h == 0 || small_w == 0 {
            return Err(Error::DegenerateShape {
                height,
                width,
                factor: self.factor,
            });
        }
        Ok((small_h, small_w))
    }
}

impl FromStr for Blur {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, params) = split_spec(s)?;
        Self::from_params(kind, &params)
    }
}

impl Degrade for Blur {
    fn degrade(&self, image: ImageView<'_>, _rng: &mut dyn RngCore) -> Result<Image> {
        add_blur(image, self)
    }

    fn name(&self) -> &'static str {
        "blur"
    }
}

/// Downsample `image` by `blur.factor` and optionally bring it back to full size
///
/// The reduced shape is pinned to `(H / factor, W / factor)` with integer
/// division. Both resizes use the same interpolation order.
///
/// # Errors
/// `DegenerateShape` when the factor exceeds the height or the width.
pub fn add_blur(image: ImageView<'_>, blur: &Blur) -> Result<Image> {
    let _span = tracing::debug_span!("add_blur", interpolation = %blur.interpolation, factor = blur.factor)
        .entered();

    let (height, width, _) = image.dim();
    let small_shape = blur.downsampled((height, width))?;

    let small = resize(image, small_shape, blur.interpolation)?;
    if blur.keep_size {
        resize(small.view(), (height, width), blur.interpolation)
    } else {
        Ok(small)
    }
}
