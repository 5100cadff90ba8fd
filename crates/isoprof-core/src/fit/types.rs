use crate::error::{IsoprofError, Result};
use crate::frame::Center;
use crate::stats::{angle_median, median};

/// Starting point of a fit, supplied by the centre/PSF/background collaborators.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IsophoteGuess {
    pub center: Center,
    /// Initial ellipticity in `[0, 1)`.
    pub ellipticity: f64,
    /// Initial position angle in radians (period π).
    pub position_angle: f64,
    /// Background noise level, flux units.
    pub background_noise: f64,
    /// PSF full width at half maximum, pixels.
    pub psf_fwhm: f64,
}

impl IsophoteGuess {
    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() {
            return Err(IsoprofError::InvalidParameter(format!(
                "center must be finite, got ({}, {})",
                self.center.x, self.center.y
            )));
        }
        if !(0.0..1.0).contains(&self.ellipticity) {
            return Err(IsoprofError::InvalidParameter(format!(
                "ellipticity must lie in [0, 1), got {}",
                self.ellipticity
            )));
        }
        if !self.position_angle.is_finite() {
            return Err(IsoprofError::InvalidParameter(
                "position angle must be finite".into(),
            ));
        }
        if !(self.background_noise.is_finite() && self.background_noise >= 0.0) {
            return Err(IsoprofError::InvalidParameter(format!(
                "background noise must be non-negative, got {}",
                self.background_noise
            )));
        }
        if !(self.psf_fwhm.is_finite() && self.psf_fwhm > 0.0) {
            return Err(IsoprofError::InvalidParameter(format!(
                "PSF FWHM must be positive, got {}",
                self.psf_fwhm
            )));
        }
        Ok(())
    }
}

/// Fit stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitStage {
    SampleRadii,
    Optimizing,
    Smoothing,
    Uncertainty,
}

impl std::fmt::Display for FitStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SampleRadii => write!(f, "Choosing sample radii"),
            Self::Optimizing => write!(f, "Fitting isophotes"),
            Self::Smoothing => write!(f, "Smoothing profile"),
            Self::Uncertainty => write!(f, "Estimating errors"),
        }
    }
}

/// Progress reporting for a fit.
///
/// Implementors can use this to drive progress bars or logging.
/// All methods have default no-op implementations.
pub trait ProgressReporter {
    /// A new stage has started. `total_items` is the number of work items in
    /// this stage (e.g. the iteration cap), if known.
    fn begin_stage(&self, _stage: FitStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when the caller does not ask for progress.
pub(crate) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// The fitted isophote profile, handed off to extraction and plotting
/// collaborators.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FittedProfile {
    /// Semi-major axis of each isophote, pixels, strictly increasing.
    pub radii: Vec<f64>,
    pub ellipticity: Vec<f64>,
    /// Position angle in `[0, π)`.
    pub position_angle: Vec<f64>,
    pub ellipticity_error: Vec<f64>,
    pub position_angle_error: Vec<f64>,
    /// Robust polynomial trend of the ellipticity.
    pub smooth_ellipticity: Vec<f64>,
    /// Robust polynomial trend of the position angle.
    pub smooth_position_angle: Vec<f64>,
    /// e.g. `"fit limit semi-major axis: 57.71 pix"`.
    pub fit_limit_annotation: String,
    /// Global iterations performed by the search.
    pub iterations: usize,
    /// `false` when the iteration cap, not the no-change criterion, ended the search.
    pub converged: bool,
}

impl FittedProfile {
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Outermost fitted semi-major axis.
    pub fn fit_limit(&self) -> Option<f64> {
        self.radii.last().copied()
    }

    pub fn median_ellipticity(&self) -> Option<f64> {
        median(&self.ellipticity)
    }

    pub fn median_position_angle(&self) -> Option<f64> {
        angle_median(&self.position_angle)
    }
}

pub(crate) fn fit_limit_annotation(radii: &[f64]) -> String {
    format!(
        "fit limit semi-major axis: {:.2} pix",
        radii.last().copied().unwrap_or(0.0)
    )
}
