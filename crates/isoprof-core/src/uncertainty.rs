use std::ops::Range;

use crate::consts::ERROR_WINDOW;
use crate::stats::angle_diff;

/// Residual window for index `i` of an `n`-long profile.
///
/// Indices 0 and 1 share the first window, the last index uses the final
/// window, and interior indices use `[i - 2, i + 2)`.
pub fn error_window(i: usize, n: usize) -> Range<usize> {
    let half = ERROR_WINDOW / 2;
    let range = if i < half {
        0..ERROR_WINDOW
    } else if i + 1 == n {
        n.saturating_sub(ERROR_WINDOW)..n
    } else {
        i - half..i + half
    };
    range.start.min(n)..range.end.min(n)
}

fn windowed_rms(residuals: &[f64]) -> Vec<f64> {
    let n = residuals.len();
    (0..n)
        .map(|i| {
            let window = &residuals[error_window(i, n)];
            if window.is_empty() {
                return 0.0;
            }
            (window.iter().map(|r| r * r).sum::<f64>() / window.len() as f64).sqrt()
        })
        .collect()
}

/// Per-radius RMS deviation of the raw ellipticity from its smooth trend.
pub fn ellipticity_errors(raw: &[f64], smooth: &[f64]) -> Vec<f64> {
    let residuals: Vec<f64> = raw.iter().zip(smooth).map(|(r, s)| r - s).collect();
    windowed_rms(&residuals)
}

/// Per-radius RMS deviation of the raw position angle from its smooth trend,
/// with residuals measured on the period-π circle.
pub fn position_angle_errors(raw: &[f64], smooth: &[f64]) -> Vec<f64> {
    let residuals: Vec<f64> = raw
        .iter()
        .zip(smooth)
        .map(|(&r, &s)| angle_diff(2.0 * r, 2.0 * s) / 2.0)
        .collect();
    windowed_rms(&residuals)
}
