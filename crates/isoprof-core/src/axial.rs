//! Surface-brightness profiles along straight strips.
//!
//! For edge-on or strongly disturbed galaxies, isophotes are a poor summary.
//! Instead, strips perpendicular to the major axis are laid out at a range of
//! positions along it, on both sides of the centre, and each strip is binned
//! into a surface-brightness profile. The four branches cover the
//! combinations of major-axis side and strip direction.

use std::f64::consts::{FRAC_PI_2, LN_10, TAU};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_AXIAL_GEOMETRIC_SCALE, DEFAULT_AXIAL_LINEAR_PSF_FACTOR, DEFAULT_ZEROPOINT};
use crate::frame::{Center, Frame};
use crate::sample::sample_line;
use crate::stats::{average, scatter, AverageMethod};

/// How positions along the major axis are spaced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum AxialSampling {
    /// Each step is `scale` times the current position (at least one pixel).
    Geometric { scale: f64 },
    /// Fixed step in pixels; `None` uses half the PSF FWHM.
    Linear { step: Option<f64> },
}

impl Default for AxialSampling {
    fn default() -> Self {
        Self::Geometric {
            scale: DEFAULT_AXIAL_GEOMETRIC_SCALE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxialConfig {
    /// Arcseconds per pixel.
    #[serde(default = "default_pixscale")]
    pub pixscale: f64,
    #[serde(default = "default_zeropoint")]
    pub zeropoint: f64,
    #[serde(default)]
    pub sampling: AxialSampling,
    /// Added to the major-axis position angle, radians.
    #[serde(default)]
    pub pa_offset: f64,
    #[serde(default)]
    pub average: AverageMethod,
    /// Outermost major-axis position in pixels. Defaults to half the smaller
    /// image dimension.
    #[serde(default)]
    pub limit: Option<f64>,
}

fn default_pixscale() -> f64 {
    1.0
}

fn default_zeropoint() -> f64 {
    DEFAULT_ZEROPOINT
}

impl Default for AxialConfig {
    fn default() -> Self {
        Self {
            pixscale: default_pixscale(),
            zeropoint: default_zeropoint(),
            sampling: AxialSampling::default(),
            pa_offset: 0.0,
            average: AverageMethod::default(),
            limit: None,
        }
    }
}

/// Surface brightness of one bin, mag/arcsec².
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SurfaceBrightness {
    pub sb: f64,
    pub sb_err: f64,
}

/// One quadrant of the axial measurement.
#[derive(Clone, Debug, Serialize)]
pub struct AxialBranch {
    /// `+1` or `-1`: which side of the centre along the major axis.
    pub radial_sign: i8,
    /// `+1` or `-1`: strips run along `pa + 90°` or `pa - 90°`.
    pub angle_sign: i8,
    /// `lines[k][j]`: strip at major-axis position `radii[k]`, bin at
    /// distance `radii[j]` along the strip.
    pub lines: Vec<Vec<Option<SurfaceBrightness>>>,
}

impl AxialBranch {
    /// e.g. `"+R : pa-90"`.
    pub fn label(&self) -> String {
        format!(
            "{}R : pa{}90",
            if self.radial_sign > 0 { '+' } else { '-' },
            if self.angle_sign > 0 { '+' } else { '-' }
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AxialProfile {
    /// Positions along the major axis and along each strip, pixels.
    pub radii: Vec<f64>,
    pub branches: Vec<AxialBranch>,
}

impl AxialProfile {
    pub fn branch(&self, radial_sign: i8, angle_sign: i8) -> Option<&AxialBranch> {
        self.branches
            .iter()
            .find(|b| b.radial_sign == radial_sign && b.angle_sign == angle_sign)
    }
}

/// Convert a per-pixel flux to surface brightness.
pub fn flux_to_sb(flux: f64, pixscale: f64, zeropoint: f64) -> f64 {
    -2.5 * flux.log10() + zeropoint + 5.0 * pixscale.log10()
}

/// Major-axis positions, starting at 0 and growing until `limit`.
pub fn axial_radii(limit: f64, sampling: AxialSampling, psf_fwhm: f64) -> Vec<f64> {
    let mut radii = vec![0.0];
    let mut last = 0.0;
    while last < limit {
        let step = match sampling {
            AxialSampling::Geometric { scale } => last * scale,
            AxialSampling::Linear { step } => {
                step.unwrap_or(DEFAULT_AXIAL_LINEAR_PSF_FACTOR * psf_fwhm)
            }
        };
        // NaN steps fall through to one pixel.
        last += step.max(1.0);
        radii.push(last);
    }
    radii
}

/// Width of the bin (or strip) at index `i`.
fn bin_width(radii: &[f64], i: usize) -> f64 {
    if i == 0 {
        1.0
    } else {
        radii[i] - radii[i - 1]
    }
}

/// Measure the four axial-profile branches around `center`.
///
/// `position_angle` is the major-axis direction in radians; `config.pa_offset`
/// is added to it.
pub fn axial_profiles(
    frame: &Frame,
    center: Center,
    position_angle: f64,
    psf_fwhm: f64,
    config: &AxialConfig,
) -> AxialProfile {
    let pa = position_angle + config.pa_offset;
    let limit = config
        .limit
        .filter(|l| l.is_finite())
        .unwrap_or_else(|| frame.width().min(frame.height()) as f64 / 2.0);
    let radii = axial_radii(limit, config.sampling, psf_fwhm);
    let length = radii.last().copied().unwrap_or(0.0);
    debug!(positions = radii.len(), length, pa, "Axial profile sampling");

    let (sin_pa, cos_pa) = pa.sin_cos();
    let mut branches = Vec::with_capacity(4);
    for radial_sign in [1i8, -1] {
        for angle_sign in [1i8, -1] {
            let strip_angle = (pa + f64::from(angle_sign) * FRAC_PI_2).rem_euclid(TAU);
            let lines = radii
                .par_iter()
                .enumerate()
                .map(|(k, &pos)| {
                    let offset = f64::from(radial_sign) * pos;
                    let start = Center::new(center.x + offset * cos_pa, center.y + offset * sin_pa);
                    measure_strip(frame, start, strip_angle, bin_width(&radii, k), &radii, config)
                })
                .collect();
            branches.push(AxialBranch {
                radial_sign,
                angle_sign,
                lines,
            });
        }
    }

    AxialProfile { radii, branches }
}

fn measure_strip(
    frame: &Frame,
    start: Center,
    angle: f64,
    width: f64,
    radii: &[f64],
    config: &AxialConfig,
) -> Vec<Option<SurfaceBrightness>> {
    let length = radii.last().copied().unwrap_or(0.0);
    let Some(line) = sample_line(frame, start, length, width, angle) else {
        return vec![None; radii.len()];
    };

    (0..radii.len())
        .map(|j| {
            let half = bin_width(radii, j) / 2.0;
            let bin: Vec<f64> = line
                .positions
                .iter()
                .zip(&line.values)
                .filter(|(p, _)| **p > radii[j] - half && **p < radii[j] + half)
                .map(|(_, v)| *v)
                .collect();
            let flux = average(&bin, config.average)?;
            if flux.is_nan() || flux <= 0.0 {
                return None;
            }
            let spread = scatter(&bin, config.average).unwrap_or(0.0);
            Some(SurfaceBrightness {
                sb: flux_to_sb(flux, config.pixscale, config.zeropoint),
                sb_err: 2.5 * spread / ((bin.len() as f64).sqrt() * flux * LN_10),
            })
        })
        .collect()
}
