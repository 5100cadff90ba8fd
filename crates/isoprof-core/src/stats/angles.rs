use std::f64::consts::PI;

use super::robust::median;

/// Map an unbounded search coordinate to an ellipticity in `[0, 1)`.
pub fn to_eps(x: f64) -> f64 {
    0.5 + (x - 0.5).atan() / PI
}

/// Inverse of [`to_eps`]: map an ellipticity to the unbounded search space.
pub fn inv_to_eps(eps: f64) -> f64 {
    ((eps - 0.5) * PI).tan() + 0.5
}

/// Wrap a search coordinate into a position angle in `[0, π)`.
pub fn to_pa(x: f64) -> f64 {
    x.rem_euclid(PI)
}

/// Position angles are searched directly; the inverse is the same wrap.
pub fn inv_to_pa(pa: f64) -> f64 {
    pa.rem_euclid(PI)
}

/// Signed difference `a - b` wrapped onto `(-π, π]`.
///
/// For quantities with period π (position angles) pass doubled angles.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = a - b;
    d.sin().atan2(d.cos())
}

/// Circular mean of position angles (period π), in `[0, π)`.
pub fn angle_mean(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }
    let (s, c) = angles
        .iter()
        .fold((0.0, 0.0), |(s, c), &a| (s + (2.0 * a).sin(), c + (2.0 * a).cos()));
    Some((s.atan2(c) / 2.0).rem_euclid(PI))
}

/// Median of position angles (period π), taken relative to their circular mean.
pub fn angle_median(angles: &[f64]) -> Option<f64> {
    let reference = angle_mean(angles)?;
    let offsets: Vec<f64> = angles
        .iter()
        .map(|&a| angle_diff(2.0 * a, 2.0 * reference) / 2.0)
        .collect();
    Some((reference + median(&offsets)?).rem_euclid(PI))
}
