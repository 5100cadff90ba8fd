use std::f64::consts::TAU;

use crate::consts::{MIN_RING_SAMPLES, RING_SAMPLE_DENSITY};
use crate::frame::{EllipseGeometry, Frame};

use super::interp::{bilinear_sample, nearest_pixel};
use super::{IsophoteRing, SampleOptions};

/// Number of parametric angles used for a ring of semi-major axis `sma`.
pub fn ring_sample_count(sma: f64) -> usize {
    let n = (RING_SAMPLE_DENSITY * TAU * sma.max(0.0)) as usize;
    n.max(MIN_RING_SAMPLES)
}

/// Sample flux along the full ellipse.
///
/// Returns `None` when no sample survives bounds and mask checks.
pub fn sample_ellipse(
    frame: &Frame,
    geometry: &EllipseGeometry,
    options: &SampleOptions,
) -> Option<IsophoteRing> {
    let n = ring_sample_count(geometry.sma);
    let angles: Vec<f64> = (0..n).map(|k| TAU * k as f64 / n as f64).collect();
    sample_at(frame, geometry, &angles, &angles, true, options)
}

/// Sample flux along the arc of the ellipse from parametric angle `start`
/// counter-clockwise to `end`. The arc may wrap through zero; a span of a full
/// turn or more covers the whole ring.
pub fn sample_ellipse_between(
    frame: &Frame,
    geometry: &EllipseGeometry,
    start: f64,
    end: f64,
    options: &SampleOptions,
) -> Option<IsophoteRing> {
    let n = ring_sample_count(geometry.sma);
    let span = if end - start >= TAU {
        TAU
    } else {
        (end - start).rem_euclid(TAU)
    };

    let mut arc: Vec<(f64, f64)> = (0..n)
        .map(|k| TAU * k as f64 / n as f64)
        .map(|theta| ((theta - start).rem_euclid(TAU), theta))
        .filter(|&(offset, _)| offset <= span)
        .collect();
    arc.sort_by(|a, b| a.0.total_cmp(&b.0));

    let offsets: Vec<f64> = arc.iter().map(|&(o, _)| o).collect();
    let angles: Vec<f64> = arc.iter().map(|&(_, t)| t).collect();
    sample_at(frame, geometry, &angles, &offsets, false, options)
}

/// Shared sampling loop. `positions` is the coordinate used to interpolate
/// over masked samples; it is periodic in `TAU` when `circular` is set.
fn sample_at(
    frame: &Frame,
    geometry: &EllipseGeometry,
    angles: &[f64],
    positions: &[f64],
    circular: bool,
    options: &SampleOptions,
) -> Option<IsophoteRing> {
    let interpolate = geometry.sma < options.interpolation_radius;
    let fill_masked = options.interpolate_mask && frame.has_mask();

    let mut ring_angles = Vec::with_capacity(angles.len());
    let mut ring_positions = Vec::with_capacity(angles.len());
    let mut values = Vec::with_capacity(angles.len());
    let mut valid = Vec::with_capacity(angles.len());

    for (&theta, &pos) in angles.iter().zip(positions) {
        let (x, y) = geometry.point_at(theta);
        let Some((col, row)) = nearest_pixel(&frame.data, x, y) else {
            continue;
        };
        let value = if interpolate {
            match bilinear_sample(&frame.data, x, y) {
                Some(v) => v,
                None => continue,
            }
        } else {
            frame.data[[row, col]] as f64
        };

        let masked = frame.is_masked(col, row);
        if masked && !fill_masked {
            continue;
        }
        ring_angles.push(theta);
        ring_positions.push(pos);
        values.push(value);
        valid.push(!masked);
    }

    if !valid.iter().any(|&v| v) {
        return None;
    }
    if valid.iter().any(|&v| !v) {
        fill_invalid(&ring_positions, &mut values, &valid, circular);
    }

    Some(IsophoteRing {
        angles: ring_angles,
        values,
    })
}

/// Replace invalid samples by linear interpolation between the nearest valid
/// neighbours along `positions` (sorted ascending).
fn fill_invalid(positions: &[f64], values: &mut [f64], valid: &[bool], circular: bool) {
    let anchors: Vec<usize> = (0..valid.len()).filter(|&i| valid[i]).collect();
    let first = anchors[0];
    let last = anchors[anchors.len() - 1];

    for k in 0..values.len() {
        if valid[k] {
            continue;
        }
        let p = anchors.partition_point(|&a| a < k);
        let prev = if p > 0 { Some(anchors[p - 1]) } else { None };
        let next = anchors.get(p).copied();

        values[k] = match (prev, next, circular) {
            (Some(a), Some(b), _) => lerp(
                (positions[a], values[a]),
                (positions[b], values[b]),
                positions[k],
            ),
            (prev, next, true) => {
                let a = prev.unwrap_or(last);
                let b = next.unwrap_or(first);
                let span = (positions[b] - positions[a]).rem_euclid(TAU);
                if span <= 0.0 {
                    values[a]
                } else {
                    let t = (positions[k] - positions[a]).rem_euclid(TAU) / span;
                    values[a] + (values[b] - values[a]) * t
                }
            }
            (prev, next, false) => values[prev.or(next).unwrap_or(first)],
        };
    }
}

fn lerp((x0, y0): (f64, f64), (x1, y1): (f64, f64), x: f64) -> f64 {
    if (x1 - x0).abs() <= f64::EPSILON {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
