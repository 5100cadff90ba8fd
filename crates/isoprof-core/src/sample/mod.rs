pub mod ellipse;
pub mod interp;
pub mod line;

pub use ellipse::{ring_sample_count, sample_ellipse, sample_ellipse_between};
pub use line::{sample_line, LineSamples};

use crate::consts::DEFAULT_INTERPOLATION_RADIUS;

/// Flux samples taken around one isophote.
#[derive(Clone, Debug, Default)]
pub struct IsophoteRing {
    /// Parametric angle of each sample, measured from the major axis.
    pub angles: Vec<f64>,
    pub values: Vec<f64>,
}

impl IsophoteRing {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Controls how an isophote is read from the image.
#[derive(Clone, Copy, Debug)]
pub struct SampleOptions {
    /// Rings smaller than this semi-major axis are bilinearly interpolated.
    pub interpolation_radius: f64,
    /// Fill masked samples from their unmasked neighbours instead of dropping them.
    pub interpolate_mask: bool,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            interpolation_radius: DEFAULT_INTERPOLATION_RADIUS,
            interpolate_mask: false,
        }
    }
}
