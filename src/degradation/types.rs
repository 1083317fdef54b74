use crate::error::{Error, Result};
use ndarray::{Array3, ArrayView3};
use rand::RngCore;

/// Image tensor in HWC layout (height, width, channels).
/// Values are nominally in [0, 1] but operators never enforce it.
pub type Image = Array3<f32>;

/// Borrowed view of an [`Image`].
pub type ImageView<'a> = ArrayView3<'a, f32>;

/// Trait for degradation operators
/// Lets a pipeline hold sampling, noise and blur stages behind one interface
pub trait Degrade {
    /// Produce a degraded copy of `image`
    ///
    /// # Arguments
    /// * `image` - Input HWC tensor, left untouched
    /// * `rng` - Random source for every draw made by this call
    fn degrade(&self, image: ImageView<'_>, rng: &mut dyn RngCore) -> Result<Image>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Split a stage spec of the form `kind` or `kind:p1,p2,...`.
///
/// `true`/`false` are accepted as 1 and 0 so flags read naturally on the command line.
pub fn split_spec(spec: &str) -> Result<(&str, Vec<f64>)> {
    let (kind, rest) = match spec.split_once(':') {
        Some((kind, rest)) => (kind.trim(), rest.trim()),
        None => (spec.trim(), ""),
    };

    if kind.is_empty() {
        return Err(Error::invalid("spec", format!("missing kind in '{spec}'")));
    }

    let params = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',')
            .map(|p| parse_param(p.trim()))
            .collect::<Result<Vec<_>>>()?
    };

    Ok((kind, params))
}

fn parse_param(p: &str) -> Result<f64> {
    match p.to_ascii_lowercase().as_str() {
        "true" => Ok(1.0),
        "false" => Ok(0.0),
        _ => p
            .parse::<f64>()
            .map_err(|_| Error::invalid("spec", format!("'{p}' is not a number"))),
    }
}

/// Fail with `InvalidParameterArity` unless `params` holds at least `expected` values.
pub(crate) fn require_arity(kind: &str, params: &[f64], expected: usize) -> Result<()> {
    if params.len() < expected {
        return Err(Error::InvalidParameterArity {
            kind: kind.to_string(),
            expected,
            actual: params.len(),
        });
    }
    Ok(())
}

/// Truncate a positional parameter toward zero and require a positive integer.
pub(crate) fn positive_int(name: &str, value: f64) -> Result<usize> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < 1.0 {
        return Err(Error::invalid(
            name,
            format!("must truncate to a positive integer, got {value}"),
        ));
    }
    Ok(truncated as usize)
}
