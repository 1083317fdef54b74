use super::blur::{Blur, Interpolation};
use super::noise::Noise;
use super::sampling::Sampling;
use super::types::{split_spec, Degrade, Image, ImageView};
use crate::error::{Error, Result};
use rand::RngCore;
use std::str::FromStr;

/// One stage of a degradation pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Degradation {
    Sampling(Sampling),
    Noise(Noise),
    Blur(Blur),
}

impl Degradation {
    /// Build a stage from a kind tag, inferring the family from the tag
    ///
    /// `gaussian` and `random` name both a sampling mask and a noise model,
    /// so they are rejected here; parse them as [`Sampling`] or [`Noise`] instead.
    pub fn from_params(kind: &str, params: &[f64]) -> Result<Self> {
        match kind {
            "gaussian" | "random" => Err(Error::invalid(
                "kind",
                format!("'{kind}' is both a sampling and a noise kind"),
            )),
            "uniform" => Sampling::from_params(kind, params).map(Self::Sampling),
            "poisson" => Noise::from_params(kind, params).map(Self::Noise),
            _ if kind.parse::<Interpolation>().is_ok() => {
                Blur::from_params(kind, params).map(Self::Blur)
            }
            other => Err(Error::UnknownKind {
                family: "degradation",
                kind: other.to_string(),
            }),
        }
    }

    fn as_degrade(&self) -> &dyn Degrade {
        match self {
            Self::Sampling(s) => s,
            Self::Noise(n) => n,
            Self::Blur(b) => b,
        }
    }
}

impl Degrade for Degradation {
    fn degrade(&self, image: ImageView<'_>, rng: &mut dyn RngCore) -> Result<Image> {
        self.as_degrade().degrade(image, rng)
    }

    fn name(&self) -> &'static str {
        self.as_degrade().name()
    }
}

impl FromStr for Degradation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, params) = split_spec(s)?;
        Self::from_params(kind, &params)
    }
}

impl From<Sampling> for Degradation {
    fn from(value: Sampling) -> Self {
        Self::Sampling(value)
    }
}

impl From<Noise> for Degradation {
    fn from(value: Noise) -> Self {
        Self::Noise(value)
    }
}

impl From<Blur> for Degradation {
    fn from(value: Blur) -> Self {
        Self::Blur(value)
    }
}

/// Degraded network input together with the clean target it came from
#[derive(Debug, Clone)]
pub struct TrainingPair {
    pub input: Image,
    pub label: Image,
}

/// Ordered list of degradation stages
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Degradation>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage, builder style
    pub fn with(mut self, stage: impl Into<Degradation>) -> Self {
        self.push(stage);
        self
    }

    pub fn push(&mut self, stage: impl Into<Degradation>) {
        self.stages.push(stage.into());
    }

    pub fn stages(&self) -> &[Degradation] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order, feeding each the previous output
    ///
    /// Stops at the first failing stage; no partial result is returned.
    pub fn apply(&self, image: ImageView<'_>, rng: &mut dyn RngCore) -> Result<Image> {
        let mut current = image.to_owned();
        for stage in &self.stages {
            let _span = tracing::debug_span!("stage", name = stage.name()).entered();
            current = stage.degrade(current.view(), rng)?;
        }
        Ok(current)
    }

    /// Degrade `clean` and pair it with an untouched copy as the label
    pub fn pair(&self, clean: ImageView<'_>, rng: &mut dyn RngCore) -> Result<TrainingPair> {
        Ok(TrainingPair {
            input: self.apply(clean, rng)?,
            label: clean.to_owned(),
        })
    }
}
