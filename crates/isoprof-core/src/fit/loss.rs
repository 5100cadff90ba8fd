use num_complex::Complex;
use rustfft::FftPlanner;
use tracing::warn;

use crate::consts::{ROBUST_CLIP_QUANTILE, ROBUST_CLIP_QUANTILE_MASKED};
use crate::frame::{Center, EllipseGeometry, Frame};
use crate::sample::{sample_ellipse, SampleOptions};
use crate::stats::{angle_diff, quantile};

use super::config::LossVariant;

/// Loss assigned to a configuration that cannot be evaluated.
pub const INVALID_LOSS: f64 = f64::INFINITY;

/// Magnitude of the m = 2 DFT coefficient of `values`.
///
/// Needs at least three samples; shorter input yields `None`.
pub fn second_harmonic(planner: &mut FftPlanner<f64>, values: &[f64]) -> Option<f64> {
    if values.len() < 3 {
        return None;
    }
    let fft = planner.plan_fft_forward(values.len());
    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut buffer);
    Some(buffer[2].norm())
}

/// Penalty on parameter jumps between radius `i` and its neighbours.
///
/// Ellipticity differences are relative to the neighbour's axis ratio;
/// position-angle differences are taken on the doubled-angle circle and
/// divided by `pa_bandwidth`.
pub fn regularization(ellipticity: &[f64], position_angle: &[f64], i: usize, pa_bandwidth: f64) -> f64 {
    let n = ellipticity.len();
    let mut reg = 0.0;
    let mut add = |j: usize| {
        reg += ((ellipticity[i] - ellipticity[j]) / (1.0 - ellipticity[j])).abs();
        reg += angle_diff(2.0 * position_angle[i], 2.0 * position_angle[j]).abs() / pa_bandwidth;
    };
    if i + 1 < n {
        add(i + 1);
    }
    if i > 0 {
        add(i - 1);
    }
    reg
}

/// Fourier asymmetry loss bound to one image and centre.
///
/// Holds an FFT planner so that rings of a repeated length reuse their plan.
pub struct FourierLoss<'a> {
    frame: &'a Frame,
    center: Center,
    noise: f64,
    variant: LossVariant,
    options: SampleOptions,
    planner: FftPlanner<f64>,
}

impl<'a> FourierLoss<'a> {
    pub fn new(
        frame: &'a Frame,
        center: Center,
        noise: f64,
        variant: LossVariant,
        interpolation_radius: f64,
    ) -> Self {
        Self {
            frame,
            center,
            noise,
            variant,
            options: SampleOptions {
                interpolation_radius,
                interpolate_mask: frame.has_mask(),
            },
            planner: FftPlanner::new(),
        }
    }

    /// Normalised second-harmonic amplitude of one ring of samples.
    pub fn ring_loss(&mut self, values: &[f64]) -> f64 {
        let (coef, central) = match self.variant {
            LossVariant::Robust => {
                let q = if self.frame.has_mask() {
                    ROBUST_CLIP_QUANTILE_MASKED
                } else {
                    ROBUST_CLIP_QUANTILE
                };
                let Some(ceiling) = quantile(values, q) else {
                    return INVALID_LOSS;
                };
                let clipped: Vec<f64> = values.iter().map(|&v| v.min(ceiling)).collect();
                (
                    second_harmonic(&mut self.planner, &clipped),
                    self.variant.central_flux(values),
                )
            }
            LossVariant::Mean => {
                if values.iter().any(|v| !v.is_finite()) {
                    warn!("Failed to evaluate isophotal flux values, skipping this ellip/pa combination");
                    return INVALID_LOSS;
                }
                (
                    second_harmonic(&mut self.planner, values),
                    self.variant.central_flux(values),
                )
            }
        };
        let (Some(coef), Some(central)) = (coef, central) else {
            return INVALID_LOSS;
        };

        let norm = values.len() as f64 * (central.max(0.0) + self.noise);
        let loss = coef / norm;
        if norm > 0.0 && loss.is_finite() {
            loss
        } else {
            INVALID_LOSS
        }
    }

    /// Full loss for radius index `i` given the whole parameter arrays.
    pub fn evaluate(
        &mut self,
        radii: &[f64],
        ellipticity: &[f64],
        position_angle: &[f64],
        i: usize,
        reg_scale: f64,
    ) -> f64 {
        let geometry = EllipseGeometry::new(self.center, radii[i], ellipticity[i], position_angle[i]);
        let Some(ring) = sample_ellipse(self.frame, &geometry, &self.options) else {
            return INVALID_LOSS;
        };
        let f2 = self.ring_loss(&ring.values);
        if f2 == INVALID_LOSS {
            return INVALID_LOSS;
        }
        let reg = if reg_scale > 0.0 {
            regularization(ellipticity, position_angle, i, self.variant.pa_bandwidth())
        } else {
            0.0
        };
        f2 * (1.0 + reg * reg_scale)
    }
}
