pub mod config;
pub mod loss;
pub mod radii;
pub mod search;
mod types;

pub use config::{FitConfig, LossVariant, PerturbationConfig};
pub use loss::{FourierLoss, INVALID_LOSS};
pub use radii::sample_radii;
pub use search::{Candidate, IsophoteSearch, PerturbMode, SearchOutcome};
pub use types::{FitStage, FittedProfile, IsophoteGuess, ProgressReporter};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::consts::{COLLAPSED_CENTER_JUMP, COLLAPSED_CENTER_SCAN, INNER_CLAMP_COUNT};
use crate::error::Result;
use crate::frame::Frame;
use crate::smooth::{smooth_ellipticity, smooth_position_angle};
use crate::stats::inv_to_eps;
use crate::uncertainty::{ellipticity_errors, position_angle_errors};

use types::{fit_limit_annotation, NoOpReporter};

/// Fit isophotes using an RNG seeded from `config.seed` (or OS entropy).
pub fn fit_isophotes(frame: &Frame, guess: &IsophoteGuess, config: &FitConfig) -> Result<FittedProfile> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    fit_isophotes_with_rng(frame, guess, config, &mut rng)
}

/// Fit isophotes drawing all randomness from `rng`.
pub fn fit_isophotes_with_rng<R: Rng + ?Sized>(
    frame: &Frame,
    guess: &IsophoteGuess,
    config: &FitConfig,
    rng: &mut R,
) -> Result<FittedProfile> {
    fit_isophotes_reported(frame, guess, config, rng, &NoOpReporter)
}

/// Fit isophotes with progress reporting.
///
/// Pipeline: sample radii -> stochastic local search -> collapsed-centre
/// repair -> robust smoothing -> windowed RMS errors.
pub fn fit_isophotes_reported<R: Rng + ?Sized>(
    frame: &Frame,
    guess: &IsophoteGuess,
    config: &FitConfig,
    rng: &mut R,
    reporter: &dyn ProgressReporter,
) -> Result<FittedProfile> {
    reporter.begin_stage(FitStage::SampleRadii, None);
    let radii = sample_radii(frame, guess, config)?;
    reporter.finish_stage();

    reporter.begin_stage(FitStage::Optimizing, Some(config.max_iterations));
    let search = IsophoteSearch::new(frame, guess, &radii, config)?;
    let outcome = search.run(rng, reporter);
    reporter.finish_stage();
    info!(
        iterations = outcome.iterations,
        converged = outcome.converged,
        radii = radii.len(),
        "Completed isophote fit"
    );

    let SearchOutcome {
        mut ellipticity,
        mut position_angle,
        iterations,
        converged,
    } = outcome;
    repair_collapsed_center(&mut ellipticity, &mut position_angle);
    clamp_inner_ellipticity(&mut ellipticity);

    reporter.begin_stage(FitStage::Smoothing, None);
    let smooth_e = smooth_ellipticity(&radii, &ellipticity, config.smoothing_degree);
    let smooth_pa = smooth_position_angle(&radii, &position_angle, config.smoothing_degree);
    reporter.finish_stage();

    reporter.begin_stage(FitStage::Uncertainty, None);
    let ellipticity_error = ellipticity_errors(&ellipticity, &smooth_e);
    let position_angle_error = position_angle_errors(&position_angle, &smooth_pa);
    reporter.finish_stage();

    Ok(FittedProfile {
        fit_limit_annotation: fit_limit_annotation(&radii),
        radii,
        ellipticity,
        position_angle,
        ellipticity_error,
        position_angle_error,
        smooth_ellipticity: smooth_e,
        smooth_position_angle: smooth_pa,
        iterations,
        converged,
    })
}

/// Flatten spurious high-ellipticity isophotes at the very centre.
///
/// Scans the innermost radii; where the transformed ellipticity drops by more
/// than 0.5 to the next radius, every index up to that point takes the
/// parameters just past the jump.
pub fn repair_collapsed_center(ellipticity: &mut [f64], position_angle: &mut [f64]) {
    let n = ellipticity.len().min(position_angle.len());
    for i in 0..COLLAPSED_CENTER_SCAN.min(n.saturating_sub(1)) {
        if inv_to_eps(ellipticity[i]) - inv_to_eps(ellipticity[i + 1]) > COLLAPSED_CENTER_JUMP {
            let (e, pa) = (ellipticity[i + 1], position_angle[i + 1]);
            ellipticity[..=i].fill(e);
            position_angle[..=i].fill(pa);
        }
    }
}

/// Clamp the innermost ellipticities to their shared minimum.
pub fn clamp_inner_ellipticity(ellipticity: &mut [f64]) {
    let k = INNER_CLAMP_COUNT.min(ellipticity.len());
    let floor = ellipticity[..k].iter().copied().fold(f64::INFINITY, f64::min);
    ellipticity[..k].fill(floor);
}
