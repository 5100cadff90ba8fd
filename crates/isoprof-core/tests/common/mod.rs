#![allow(dead_code)]

use isoprof_core::fit::IsophoteGuess;
use isoprof_core::frame::{Center, EllipseGeometry, Frame};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Exponential disc `amplitude * exp(-r / scale_length)`, with `r` the
/// elliptical radius under `(ellipticity, position_angle)`.
pub fn exponential_galaxy(
    width: usize,
    height: usize,
    center: Center,
    amplitude: f64,
    scale_length: f64,
    ellipticity: f64,
    position_angle: f64,
) -> Array2<f32> {
    let shape = EllipseGeometry::new(center, 1.0, ellipticity, position_angle);
    Array2::from_shape_fn((height, width), |(row, col)| {
        let r = shape.elliptical_radius(col as f64, row as f64);
        (amplitude * (-r / scale_length).exp()) as f32
    })
}

/// Add seeded Gaussian noise of standard deviation `sigma`.
pub fn add_noise(data: &mut Array2<f32>, sigma: f64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).unwrap();
    data.mapv_inplace(|v| v + normal.sample(&mut rng) as f32);
}

/// Parameters of the reference galaxy used across the fit tests.
pub const GALAXY_SIZE: usize = 101;
pub const GALAXY_CENTER: f64 = 50.0;
pub const GALAXY_ELLIPTICITY: f64 = 0.3;
pub const GALAXY_PA: f64 = 0.5;
pub const GALAXY_NOISE: f64 = 0.01;
pub const GALAXY_PSF: f64 = 3.0;

/// A noisy exponential galaxy with known shape.
pub fn reference_galaxy() -> Frame {
    let center = Center::new(GALAXY_CENTER, GALAXY_CENTER);
    let mut data = exponential_galaxy(
        GALAXY_SIZE,
        GALAXY_SIZE,
        center,
        10.0,
        15.0,
        GALAXY_ELLIPTICITY,
        GALAXY_PA,
    );
    add_noise(&mut data, GALAXY_NOISE, 7);
    Frame::new(data).unwrap()
}

/// A guess close to, but not at, the reference galaxy's shape.
pub fn reference_guess() -> IsophoteGuess {
    IsophoteGuess {
        center: Center::new(GALAXY_CENTER, GALAXY_CENTER),
        ellipticity: 0.25,
        position_angle: 0.6,
        background_noise: GALAXY_NOISE,
        psf_fwhm: GALAXY_PSF,
    }
}

/// Difference of two position angles on the period-π circle.
pub fn pa_distance(a: f64, b: f64) -> f64 {
    isoprof_core::stats::angle_diff(2.0 * a, 2.0 * b).abs() / 2.0
}
