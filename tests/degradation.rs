mod common;

use common::synthetic_image::{checkerboard, gradient};
use degrade::{
    add_blur, add_noise, add_sampling, Blur, Error, Image, Interpolation, Noise, Sampling,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn unit_stride_grid_is_identity() {
    let image = gradient(23, 31, 3);
    let sampling: Sampling = "uniform:1,1".parse().unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    let out = add_sampling(image.view(), &sampling, &mut rng).unwrap();
    assert_eq!(out, image);
}

#[test]
fn grid_stride_two_on_ones_image() {
    let image = Image::ones((100, 100, 3));
    let sampling = Sampling::from_params("uniform", &[2.0, 2.0]).unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    let out = add_sampling(image.view(), &sampling, &mut rng).unwrap();
    assert_eq!(out.dim(), (100, 100, 3));

    for y in (0..100).step_by(2) {
        for x in (0..100).step_by(2) {
            for c in 0..3 {
                assert_eq!(out[[y, x, c]], 1.0);
                assert_eq!(out[[y, x + 1, c]], 0.0);
                assert_eq!(out[[y + 1, x, c]], 0.0);
                assert_eq!(out[[y + 1, x + 1, c]], 0.0);
            }
        }
    }
}

#[test]
fn random_mask_probability_extremes() {
    let image = gradient(40, 40, 3);
    let mut rng = StdRng::seed_from_u64(17);

    let out = add_sampling(image.view(), &"random:0".parse().unwrap(), &mut rng).unwrap();
    assert_eq!(out, image);

    let out = add_sampling(image.view(), &"random:1".parse().unwrap(), &mut rng).unwrap();
    assert!(out.iter().all(|&v| v == 0.0));
}

#[test]
fn gaussian_mask_zero_amplitude_drops_all() {
    let image = gradient(40, 30, 3);
    let sampling: Sampling = "gaussian:0.2,-0.3,0.5,0.4,0".parse().unwrap();
    let mut rng = StdRng::seed_from_u64(17);

    let out = add_sampling(image.view(), &sampling, &mut rng).unwrap();
    assert!(out.iter().all(|&v| v == 0.0));
}

#[test]
fn gaussian_mask_missing_amplitude_is_arity_error() {
    let err = "gaussian:0,0,0.5,0.5".parse::<Sampling>().unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidParameterArity {
            expected: 5,
            actual: 4,
            ..
        }
    ));
}

#[test]
fn same_seed_reproduces_random_masks() {
    let image = gradient(32, 32, 3);
    let sampling: Sampling = "gaussian:0,0,0.4,0.4,0.9".parse().unwrap();

    let a = add_sampling(image.view(), &sampling, &mut StdRng::seed_from_u64(5)).unwrap();
    let b = add_sampling(image.view(), &sampling, &mut StdRng::seed_from_u64(5)).unwrap();
    let c = add_sampling(image.view(), &sampling, &mut StdRng::seed_from_u64(6)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn zero_sigma_gaussian_noise_is_identity() {
    let image = gradient(20, 20, 3);
    let mut rng = StdRng::seed_from_u64(3);

    let out = add_noise(image.view(), &"gaussian:0".parse().unwrap(), &mut rng).unwrap();
    assert_eq!(out, image);
}

#[test]
fn poisson_noise_is_finite_and_non_negative() {
    let image = gradient(48, 40, 3);
    let mut rng = StdRng::seed_from_u64(3);

    let out = add_noise(image.view(), &Noise::Poisson, &mut rng).unwrap();
    assert_eq!(out.dim(), image.dim());
    assert!(out.iter().all(|v| v.is_finite() && *v >= 0.0));
}

#[test]
fn nearest_factor_one_returns_input() {
    let image = gradient(21, 17, 3);
    let out = add_blur(image.view(), &"nearest:1,1".parse().unwrap()).unwrap();
    assert_eq!(out, image);
}

#[test]
fn factor_one_keeps_shape() {
    let image = gradient(21, 17, 3);
    for kind in ["bilinear", "biquadratic", "bicubic", "biquartic", "biquintic"] {
        let blur = Blur::from_params(kind, &[1.0, 1.0]).unwrap();
        let out = add_blur(image.view(), &blur).unwrap();
        assert_eq!(out.dim(), image.dim(), "{kind}");
    }
}

#[test]
fn factor_two_without_keep_size_halves_resolution() {
    let image = gradient(64, 64, 3);
    let blur: Blur = "bilinear:2,0".parse().unwrap();

    let out = add_blur(image.view(), &blur).unwrap();
    assert_eq!(out.dim(), (32, 32, 3));
}

#[test]
fn factor_larger_than_image_is_degenerate() {
    let image = gradient(12, 40, 3);
    let blur = Blur::new(Interpolation::Bicubic, 13);

    let err = add_blur(image.view(), &blur).unwrap_err();
    assert!(matches!(err, Error::DegenerateShape { .. }));
}

#[test]
fn unknown_interpolation_is_rejected() {
    assert!(matches!(
        "lanczos3:2".parse::<Blur>(),
        Err(Error::UnknownKind { .. })
    ));
}

#[test]
fn blur_keeps_values_in_input_range() {
    let image = checkerboard(48, 48, 3, 6);
    for kind in ["nearest", "bilinear", "biquadratic", "bicubic", "biquartic", "biquintic"] {
        let blur = Blur::from_params(kind, &[3.0]).unwrap();
        let out = add_blur(image.view(), &blur).unwrap();
        assert_eq!(out.dim(), image.dim());
        assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)), "{kind}");
    }
}

#[test]
fn blur_removes_fine_detail() {
    // Single-pixel checkerboard averages out to mid grey after a 4x round trip
    let image = checkerboard(32, 32, 1, 1);
    let out = add_blur(image.view(), &Blur::new(Interpolation::Bicubic, 4)).unwrap();
    assert!(out.iter().all(|&v| (v - 0.5).abs() < 0.05));
}
