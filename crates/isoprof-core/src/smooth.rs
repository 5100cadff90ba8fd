//! Robust polynomial trends of ellipticity and position angle against
//! log-radius.
//!
//! The regression is a Huber-weighted least-squares polynomial solved by
//! iteratively reweighted normal equations, so a few badly fitted radii do not
//! drag the trend.

use std::f64::consts::TAU;

use nalgebra::{DMatrix, DVector};
use tracing::warn;

use crate::consts::{
    ELLIPTICITY_HUBER_EPSILON, EPSILON, MAD_TO_SIGMA, POSITION_ANGLE_HUBER_EPSILON,
    SMOOTHING_MAX_ITERATIONS,
};
use crate::stats::robust::median_absolute_deviation;
use crate::stats::{inv_to_eps, to_eps};

#[inline]
fn huber_weight(abs_r: f64, delta: f64) -> f64 {
    if abs_r <= delta {
        1.0
    } else {
        delta / abs_r
    }
}

/// Robust polynomial fit of `y` against `x`, evaluated back at `x`.
///
/// The degree is reduced when there are not enough points. Returns `None`
/// if the inputs differ in length, are empty, or the system is singular.
pub fn huber_polyfit(x: &[f64], y: &[f64], degree: usize, epsilon: f64) -> Option<Vec<f64>> {
    let n = x.len();
    if n == 0 || n != y.len() {
        return None;
    }
    let degree = degree.min(n - 1);

    // Centre and scale the abscissa onto [-1, 1] to keep the Vandermonde
    // matrix well conditioned.
    let (lo, hi) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let mid = (lo + hi) / 2.0;
    let half = ((hi - lo) / 2.0).max(EPSILON);
    let design = DMatrix::from_fn(n, degree + 1, |r, c| ((x[r] - mid) / half).powi(c as i32));
    let target = DVector::from_column_slice(y);

    let mut weights = DVector::from_element(n, 1.0);
    let mut coefs = solve_weighted(&design, &target, &weights)?;

    for _ in 0..SMOOTHING_MAX_ITERATIONS {
        let residuals = &target - &design * &coefs;
        let abs: Vec<f64> = residuals.iter().map(|r| r.abs()).collect();
        let scale = (MAD_TO_SIGMA * median_absolute_deviation(residuals.as_slice())?).max(EPSILON);
        let delta = epsilon * scale;
        for (w, r) in weights.iter_mut().zip(&abs) {
            *w = huber_weight(*r, delta);
        }

        let next = solve_weighted(&design, &target, &weights)?;
        let step = (&next - &coefs).amax();
        coefs = next;
        if step < 1e-10 {
            break;
        }
    }

    let fitted = &design * &coefs;
    Some(fitted.iter().copied().collect())
}

fn solve_weighted(design: &DMatrix<f64>, target: &DVector<f64>, weights: &DVector<f64>) -> Option<DVector<f64>> {
    let k = design.ncols();
    let mut normal = DMatrix::<f64>::zeros(k, k);
    let mut rhs = DVector::<f64>::zeros(k);
    for (r, &w) in weights.iter().enumerate() {
        let row = design.row(r);
        normal += w * row.transpose() * row;
        rhs += w * target[r] * row.transpose();
    }
    // Light damping for near-degenerate designs.
    normal += DMatrix::<f64>::identity(k, k) * 1e-12;

    let coefs = normal.lu().solve(&rhs)?;
    coefs.iter().all(|c| c.is_finite()).then_some(coefs)
}

fn log_radii(radii: &[f64]) -> Vec<f64> {
    radii.iter().map(|r| r.max(EPSILON).log10()).collect()
}

/// Smooth ellipticity trend, fitted in the transformed search space.
///
/// Falls back to the raw values if the regression cannot be solved.
pub fn smooth_ellipticity(radii: &[f64], ellipticity: &[f64], degree: usize) -> Vec<f64> {
    let x = log_radii(radii);
    let y: Vec<f64> = ellipticity.iter().map(|&e| inv_to_eps(e)).collect();
    match huber_polyfit(&x, &y, degree, ELLIPTICITY_HUBER_EPSILON) {
        Some(fit) => fit.into_iter().map(to_eps).collect(),
        None => {
            warn!("Ellipticity smoothing failed, using raw profile");
            ellipticity.to_vec()
        }
    }
}

/// Smooth position-angle trend in `[0, π)`.
///
/// `cos 2pa` and `sin 2pa` are regressed separately and recombined, so the
/// trend is continuous across the 0/π wrap.
pub fn smooth_position_angle(radii: &[f64], position_angle: &[f64], degree: usize) -> Vec<f64> {
    let x = log_radii(radii);
    let cos2: Vec<f64> = position_angle.iter().map(|&a| (2.0 * a).cos()).collect();
    let sin2: Vec<f64> = position_angle.iter().map(|&a| (2.0 * a).sin()).collect();

    let fits = huber_polyfit(&x, &cos2, degree, POSITION_ANGLE_HUBER_EPSILON)
        .zip(huber_polyfit(&x, &sin2, degree, POSITION_ANGLE_HUBER_EPSILON));
    let Some((pred_c, pred_s)) = fits else {
        warn!("Position angle smoothing failed, using raw profile");
        return position_angle.to_vec();
    };

    pred_c
        .iter()
        .zip(&pred_s)
        .map(|(&c, &s)| {
            let c = c.clamp(-1.0, 1.0);
            let s = s.clamp(-1.0, 1.0);
            s.atan2(c).rem_euclid(TAU) / 2.0
        })
        .collect()
}
