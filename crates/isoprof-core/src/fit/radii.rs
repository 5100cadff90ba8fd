use tracing::debug;

use crate::consts::{MAX_RELAXATION_ATTEMPTS, MIN_SAMPLE_RADII, SEED_RADIUS_PSF_FACTOR};
use crate::error::{IsoprofError, Result};
use crate::frame::{EllipseGeometry, Frame};
use crate::sample::{sample_ellipse, SampleOptions};

use super::config::FitConfig;
use super::types::IsophoteGuess;

/// Choose the semi-major axes at which the isophotes are fitted.
///
/// Radii grow geometrically from `1.5 x psf_fwhm` by `1 + scale / (1 + shrink)`
/// until the ring at the last radius falls below `fit_limit x noise` or the
/// radius passes half the image size. When fewer than 15 radii result, the
/// growth rate is relaxed and generation restarts, up to 5 attempts.
pub fn sample_radii(frame: &Frame, guess: &IsophoteGuess, config: &FitConfig) -> Result<Vec<f64>> {
    guess.validate()?;
    config.validate()?;

    let options = SampleOptions {
        interpolation_radius: config.interpolation_radius,
        interpolate_mask: false,
    };
    let threshold = config.fit_limit() * guess.background_noise;
    let outer = frame.width().max(frame.height()) as f64 / 2.0;
    let seed = SEED_RADIUS_PSF_FACTOR * guess.psf_fwhm;

    let mut radii = Vec::new();
    for shrink in 0..MAX_RELAXATION_ATTEMPTS {
        let growth = 1.0 + config.scale / (1.0 + shrink as f64);
        radii = vec![seed];

        while let Some(&last) = radii.last() {
            if last >= outer {
                break;
            }
            let geometry =
                EllipseGeometry::new(guess.center, last, guess.ellipticity, guess.position_angle);
            let central = sample_ellipse(frame, &geometry, &options)
                .and_then(|ring| config.loss.central_flux(&ring.values));
            let next = last * growth;
            match central {
                Some(flux) if flux >= threshold && next > last => radii.push(next),
                _ => break,
            }
        }

        if radii.len() >= MIN_SAMPLE_RADII {
            debug!(attempt = shrink, count = radii.len(), radii = ?radii, "Sample radii");
            return Ok(radii);
        }
        debug!(
            attempt = shrink,
            count = radii.len(),
            "Too few sample radii, relaxing growth rate"
        );
    }

    Err(IsoprofError::InitializationFailed {
        attempts: MAX_RELAXATION_ATTEMPTS,
        radii: radii.len(),
    })
}
