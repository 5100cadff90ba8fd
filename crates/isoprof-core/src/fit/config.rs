use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ELLIPTICITY_STEP, DEFAULT_INTERPOLATION_RADIUS, DEFAULT_MAX_ITERATIONS,
    DEFAULT_PERTURBATION_COUNT, DEFAULT_POSITION_ANGLE_STEP, DEFAULT_RADIUS_SCALE,
    DEFAULT_REGULARIZE_AFTER, DEFAULT_REGULARIZE_SCALE, DEFAULT_SMOOTHING_DEGREE,
    MAX_RELAXATION_ATTEMPTS, MEAN_FIT_LIMIT, MEAN_PA_BANDWIDTH, ROBUST_FIT_LIMIT, ROBUST_PA_BANDWIDTH,
};
use crate::error::{IsoprofError, Result};
use crate::stats::{mean, median};

/// Which flavour of the Fourier asymmetry loss drives the fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossVariant {
    /// Quantile-clipped samples normalised by their median.
    #[default]
    Robust,
    /// Raw samples normalised by their mean; non-finite rings are rejected.
    Mean,
}

impl LossVariant {
    /// Noise multiple that ends radius growth when `FitConfig::fit_limit` is unset.
    pub fn default_fit_limit(self) -> f64 {
        match self {
            Self::Robust => ROBUST_FIT_LIMIT,
            Self::Mean => MEAN_FIT_LIMIT,
        }
    }

    /// Position-angle bandwidth of the regularization term.
    pub fn pa_bandwidth(self) -> f64 {
        match self {
            Self::Robust => ROBUST_PA_BANDWIDTH,
            Self::Mean => MEAN_PA_BANDWIDTH,
        }
    }

    /// Central flux of a ring: median or mean depending on the variant.
    pub fn central_flux(self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Robust => median(values),
            Self::Mean => mean(values),
        }
    }
}

impl std::fmt::Display for LossVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Robust => write!(f, "Robust (clipped median)"),
            Self::Mean => write!(f, "Mean"),
        }
    }
}

/// Random step sizes of the local search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerturbationConfig {
    /// Gaussian sigma of ellipticity steps, in the transformed space (default: 0.03).
    #[serde(default = "default_ellipticity_step")]
    pub ellipticity_step: f64,
    /// Gaussian sigma of position-angle steps, in radians (default: 0.06).
    #[serde(default = "default_position_angle_step")]
    pub position_angle_step: f64,
    /// Perturbed candidates per radius update (default: 5).
    #[serde(default = "default_perturbation_count")]
    pub count: usize,
}

fn default_ellipticity_step() -> f64 {
    DEFAULT_ELLIPTICITY_STEP
}
fn default_position_angle_step() -> f64 {
    DEFAULT_POSITION_ANGLE_STEP
}
fn default_perturbation_count() -> usize {
    DEFAULT_PERTURBATION_COUNT
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            ellipticity_step: DEFAULT_ELLIPTICITY_STEP,
            position_angle_step: DEFAULT_POSITION_ANGLE_STEP,
            count: DEFAULT_PERTURBATION_COUNT,
        }
    }
}

/// Configuration of an isophote fit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Geometric growth rate between sample radii (default: 0.2).
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Noise multiple where radius growth stops. `None` uses the loss
    /// variant's default (2 for robust, 1 for mean).
    #[serde(default)]
    pub fit_limit: Option<f64>,
    /// Weight of the inter-radius regularization (default: 1.0).
    #[serde(default = "default_regularize_scale")]
    pub regularize_scale: f64,
    /// Regularization stays off up to and including this iteration (default: 4).
    #[serde(default = "default_regularize_after")]
    pub regularize_after: usize,
    #[serde(default)]
    pub loss: LossVariant,
    #[serde(default)]
    pub perturbation: PerturbationConfig,
    /// Cap on global search iterations (default: 300).
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Polynomial degree of the profile smoother (default: 5).
    #[serde(default = "default_smoothing_degree")]
    pub smoothing_degree: usize,
    /// Rings below this semi-major axis are bilinearly interpolated (default: 30 px).
    #[serde(default = "default_interpolation_radius")]
    pub interpolation_radius: f64,
    /// Seed for the search RNG. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_scale() -> f64 {
    DEFAULT_RADIUS_SCALE
}
fn default_regularize_scale() -> f64 {
    DEFAULT_REGULARIZE_SCALE
}
fn default_regularize_after() -> usize {
    DEFAULT_REGULARIZE_AFTER
}
fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}
fn default_smoothing_degree() -> usize {
    DEFAULT_SMOOTHING_DEGREE
}
fn default_interpolation_radius() -> f64 {
    DEFAULT_INTERPOLATION_RADIUS
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_RADIUS_SCALE,
            fit_limit: None,
            regularize_scale: DEFAULT_REGULARIZE_SCALE,
            regularize_after: DEFAULT_REGULARIZE_AFTER,
            loss: LossVariant::default(),
            perturbation: PerturbationConfig::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            smoothing_degree: DEFAULT_SMOOTHING_DEGREE,
            interpolation_radius: DEFAULT_INTERPOLATION_RADIUS,
            seed: None,
        }
    }
}

impl FitConfig {
    /// Effective noise multiple for radius growth.
    pub fn fit_limit(&self) -> f64 {
        self.fit_limit
            .unwrap_or_else(|| self.loss.default_fit_limit())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(IsoprofError::InvalidParameter(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        // The most relaxed attempt divides the scale by the attempt count.
        if 1.0 + self.scale / MAX_RELAXATION_ATTEMPTS as f64 <= 1.0 {
            return Err(IsoprofError::InvalidParameter(format!(
                "scale {} is too small to grow the sample radii",
                self.scale
            )));
        }
        if !self.fit_limit().is_finite() {
            return Err(IsoprofError::InvalidParameter(
                "fit_limit must be finite".into(),
            ));
        }
        if !(self.regularize_scale.is_finite() && self.regularize_scale >= 0.0) {
            return Err(IsoprofError::InvalidParameter(format!(
                "regularize_scale must be non-negative, got {}",
                self.regularize_scale
            )));
        }
        let p = &self.perturbation;
        if !(p.ellipticity_step.is_finite() && p.ellipticity_step >= 0.0)
            || !(p.position_angle_step.is_finite() && p.position_angle_step >= 0.0)
        {
            return Err(IsoprofError::InvalidParameter(
                "perturbation steps must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
