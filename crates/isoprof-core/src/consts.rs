/// Minimum number of samples drawn around any isophote.
pub const MIN_RING_SAMPLES: usize = 15;

/// Samples per pixel of circumference along an isophote.
pub const RING_SAMPLE_DENSITY: f64 = 0.9;

/// Rings with a semi-major axis below this (pixels) are sampled with bilinear
/// interpolation; larger rings use nearest-pixel lookup.
pub const DEFAULT_INTERPOLATION_RADIUS: f64 = 30.0;

/// The innermost sample radius, in units of the PSF FWHM.
pub const SEED_RADIUS_PSF_FACTOR: f64 = 1.5;

/// Default geometric growth rate between adjacent sample radii.
pub const DEFAULT_RADIUS_SCALE: f64 = 0.2;

/// Fewest sample radii a fit may start with.
pub const MIN_SAMPLE_RADII: usize = 15;

/// Number of times the growth rate is relaxed before initialization gives up.
pub const MAX_RELAXATION_ATTEMPTS: usize = 5;

/// Hard cap on global iterations of the local search.
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// The search stops after this many consecutive non-improving radius updates,
/// per sample radius.
pub const NO_CHANGE_FACTOR: usize = 3;

/// Perturbed candidates evaluated per radius update.
pub const DEFAULT_PERTURBATION_COUNT: usize = 5;

/// Gaussian step size for ellipticity, in the transformed space.
pub const DEFAULT_ELLIPTICITY_STEP: f64 = 0.03;

/// Gaussian step size for position angle, in radians.
pub const DEFAULT_POSITION_ANGLE_STEP: f64 = 0.06;

/// Regularization is off up to and including this global iteration.
pub const DEFAULT_REGULARIZE_AFTER: usize = 4;

/// Default weight of the inter-radius regularization term.
pub const DEFAULT_REGULARIZE_SCALE: f64 = 1.0;

/// Position-angle bandwidth of the regularization term, robust loss.
pub const ROBUST_PA_BANDWIDTH: f64 = 0.4;

/// Position-angle bandwidth of the regularization term, mean loss.
pub const MEAN_PA_BANDWIDTH: f64 = 0.6;

/// Upper clipping quantile for the robust loss without a mask.
pub const ROBUST_CLIP_QUANTILE: f64 = 0.85;

/// Upper clipping quantile for the robust loss when masked pixels are
/// interpolated over.
pub const ROBUST_CLIP_QUANTILE_MASKED: f64 = 0.9;

/// Default noise multiple below which radius growth stops, robust loss.
pub const ROBUST_FIT_LIMIT: f64 = 2.0;

/// Default noise multiple below which radius growth stops, mean loss.
pub const MEAN_FIT_LIMIT: f64 = 1.0;

/// Inner radii inspected for a collapsed (spuriously elongated) center.
pub const COLLAPSED_CENTER_SCAN: usize = 5;

/// Drop in transformed ellipticity between neighbours that marks a collapse.
pub const COLLAPSED_CENTER_JUMP: f64 = 0.5;

/// Innermost ellipticities clamped to their shared minimum before smoothing.
pub const INNER_CLAMP_COUNT: usize = 3;

/// Default polynomial degree of the profile smoother.
pub const DEFAULT_SMOOTHING_DEGREE: usize = 5;

/// Huber threshold (in robust standard deviations) for ellipticity smoothing.
pub const ELLIPTICITY_HUBER_EPSILON: f64 = 2.0;

/// Huber threshold (in robust standard deviations) for position-angle smoothing.
pub const POSITION_ANGLE_HUBER_EPSILON: f64 = 1.35;

/// Iteration cap for the reweighted least-squares smoother.
pub const SMOOTHING_MAX_ITERATIONS: usize = 50;

/// Window length of the residual RMS used for uncertainties.
pub const ERROR_WINDOW: usize = 4;

/// Consistency factor turning a median absolute deviation into a sigma.
pub const MAD_TO_SIGMA: f64 = 1.4826;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-12;

/// Default photometric zeropoint for axial surface-brightness profiles.
pub const DEFAULT_ZEROPOINT: f64 = 22.5;

/// Default geometric step between axial sample positions.
pub const DEFAULT_AXIAL_GEOMETRIC_SCALE: f64 = 0.1;

/// Default linear step between axial sample positions, in PSF FWHM.
pub const DEFAULT_AXIAL_LINEAR_PSF_FACTOR: f64 = 0.5;
