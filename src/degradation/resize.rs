//! Spline resampling of HWC images to an exact output shape.
//!
//! Resizing runs in four steps:
//! 1. Gaussian anti-aliasing along every axis that shrinks,
//!    with `sigma = (in / out - 1) / 2`
//! 2. Pixel-centred mapping: `src = (dst + 0.5) * in / out - 0.5`
//! 3. Separable B-spline interpolation of order 0..=5, rows then columns.
//!    Orders 2 and up are prefiltered so the spline passes through the samples.
//! 4. Clipping to the value range of the input
//!
//! Every boundary uses mirror extension (`... 2 1 | 0 1 2 ... n-1 | n-2 ...`).

use super::blur::Interpolation;
use super::types::{Image, ImageView};
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Zip};

/// Gaussian kernel radius in units of sigma.
const TRUNCATE: f64 = 4.0;

/// Resize `image` to `(out_height, out_width)` keeping the channel count
pub fn resize(
    image: ImageView<'_>,
    (out_height, out_width): (usize, usize),
    interpolation: Interpolation,
) -> Result<Image> {
    let (height, width, channels) = image.dim();
    let _span = tracing::debug_span!(
        "resize",
        from = ?(height, width),
        to = ?(out_height, out_width),
        order = interpolation.order()
    )
    .entered();

    if height == 0 || width == 0 {
        return Err(Error::ShapeMismatch {
            expected: "non-empty image".to_string(),
            actual: format!("{height}x{width}x{channels}"),
        });
    }
    if out_height == 0 || out_width == 0 {
        return Err(Error::invalid(
            "output_shape",
            format!("{out_height}x{out_width} has a zero dimension"),
        ));
    }

    let (lo, hi) = value_range(image);
    let order = interpolation.order();
    let mut out = Image::zeros((out_height, out_width, channels));

    for (plane, mut dst) in image.axis_iter(Axis(2)).zip(out.axis_iter_mut(Axis(2))) {
        let mut plane = plane.mapv(f64::from);

        anti_alias(&mut plane, Axis(0), height, out_height);
        anti_alias(&mut plane, Axis(1), width, out_width);

        let rows = resample_axis(&plane, Axis(0), out_height, order);
        let resized = resample_axis(&rows, Axis(1), out_width, order);

        Zip::from(&mut dst)
            .and(&resized)
            .for_each(|d, &v| *d = v.max(lo).min(hi) as f32);
    }

    Ok(out)
}

fn value_range(image: ImageView<'_>) -> (f64, f64) {
    image.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        let v = f64::from(v);
        (lo.min(v), hi.max(v))
    })
}

/// Map any integer index onto `0..len` by mirror reflection
fn mirror(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let i = index.rem_euclid(period);
    if i >= len as isize {
        (period - i) as usize
    } else {
        i as usize
    }
}

// ============================================================================
// Anti-aliasing
// ============================================================================

fn anti_alias(plane: &mut Array2<f64>, axis: Axis, len_in: usize, len_out: usize) {
    if len_out >= len_in {
        return;
    }
    let sigma = ((len_in as f64 / len_out as f64) - 1.0) / 2.0;
    if sigma <= 0.0 {
        return;
    }

    let kernel = gaussian_kernel(sigma);
    let mut scratch = vec![0.0; len_in];
    for mut lane in plane.lanes_mut(axis) {
        convolve_mirror(lane.view(), &kernel, &mut scratch);
        lane.iter_mut().zip(&scratch).for_each(|(d, &s)| *d = s);
    }
}

/// Normalized Gaussian weights for offsets `-radius..=radius`
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

fn convolve_mirror(src: ArrayView1<'_, f64>, kernel: &[f64], dst: &mut [f64]) {
    let len = src.len();
    let radius = (kernel.len() / 2) as isize;
    for (i, d) in dst.iter_mut().enumerate() {
        *d = kernel
            .iter()
            .enumerate()
            .map(|(k, w)| w * src[mirror(i as isize + k as isize - radius, len)])
            .sum();
    }
}

// ============================================================================
// B-spline interpolation
// ============================================================================

fn resample_axis(plane: &Array2<f64>, axis: Axis, len_out: usize, order: usize) -> Array2<f64> {
    let mut shape = plane.raw_dim();
    let len_in = shape[axis.index()];
    shape[axis.index()] = len_out;

    let mut out = Array2::zeros(shape);
    if len_in == len_out && order <= 1 {
        out.assign(plane);
        return out;
    }

    let scale = len_in as f64 / len_out as f64;
    let mut coeffs = vec![0.0; len_in];

    Zip::from(out.lanes_mut(axis))
        .and(plane.lanes(axis))
        .for_each(|dst, src| {
            coeffs
                .iter_mut()
                .zip(src.iter())
                .for_each(|(c, &s)| *c = s);
            prefilter(&mut coeffs, order);
            resample_line(&coeffs, dst, scale, order);
        });

    out
}

fn resample_line(coeffs: &[f64], mut dst: ArrayViewMut1<'_, f64>, scale: f64, order: usize) {
    let len = coeffs.len();
    let half = (order / 2) as isize;

    for (i, d) in dst.iter_mut().enumerate() {
        let s = (i as f64 + 0.5) * scale - 0.5;

        if order == 0 {
            *d = coeffs[mirror((s + 0.5).floor() as isize, len)];
            continue;
        }

        let start = if order % 2 == 1 {
            s.floor() as isize - half
        } else {
            (s + 0.5).floor() as isize - half
        };

        *d = (start..=start + order as isize)
            .map(|k| bspline(order, s - k as f64) * coeffs[mirror(k, len)])
            .sum();
    }
}

/// Centred B-spline basis of the given order
///
/// Uses the truncated-power form
/// `B(x) = 1/n! * sum_k (-1)^k C(n+1, k) max(0, x + (n+1)/2 - k)^n`.
fn bspline(order: usize, x: f64) -> f64 {
    let half = (order + 1) as f64 / 2.0;
    if x.abs() >= half {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut binom = 1.0;
    for k in 0..=order + 1 {
        let t = x + half - k as f64;
        if t > 0.0 {
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            sum += sign * binom * t.powi(order as i32);
        }
        binom = binom * (order + 1 - k) as f64 / (k + 1) as f64;
    }

    sum / (1..=order).map(|v| v as f64).product::<f64>()
}

/// Poles of the recursive interpolation prefilter
fn poles(order: usize) -> Vec<f64> {
    match order {
        2 => vec![8f64.sqrt() - 3.0],
        3 => vec![3f64.sqrt() - 2.0],
        4 => vec![
            (664.0 - 438976f64.sqrt()).sqrt() + 304f64.sqrt() - 19.0,
            (664.0 + 438976f64.sqrt()).sqrt() - 304f64.sqrt() - 19.0,
        ],
        5 => vec![
            (67.5 - 4436.25f64.sqrt()).sqrt() + 26.25f64.sqrt() - 6.5,
            (67.5 + 4436.25f64.sqrt()).sqrt() - 26.25f64.sqrt() - 6.5,
        ],
        _ => Vec::new(),
    }
}

/// Turn samples into B-spline coefficients in place
fn prefilter(c: &mut [f64], order: usize) {
    let n = c.len();
    if n < 2 || order < 2 {
        return;
    }

    let poles = poles(order);
    let gain: f64 = poles.iter().map(|&z| (1.0 - z) * (1.0 - 1.0 / z)).product();
    c.iter_mut().for_each(|v| *v *= gain);

    for &z in &poles {
        c[0] = causal_init(c, z);
        for i in 1..n {
            c[i] += z * c[i - 1];
        }

        c[n - 1] = (z / (z * z - 1.0)) * (z * c[n - 2] + c[n - 1]);
        for i in (0..n - 1).rev() {
            c[i] = z * (c[i + 1] - c[i]);
        }
    }
}

/// Exact initial value of the causal pass for a mirror-extended signal
fn causal_init(c: &[f64], z: f64) -> f64 {
    let n = c.len();
    let z_n1 = z.powi(n as i32 - 1);

    let mut acc = c[0] + z_n1 * c[n - 1];
    let mut zi = z;
    for i in 1..n - 1 {
        acc += zi * (c[i] + z_n1 * c[n - 1 - i]);
        zi *= z;
    }
    acc / (1.0 - z_n1 * z_n1)
}
