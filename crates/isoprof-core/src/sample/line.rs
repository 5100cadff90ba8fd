use crate::frame::{Center, Frame};

/// Pixels collected along a straight strip.
#[derive(Clone, Debug, Default)]
pub struct LineSamples {
    /// Distance of each pixel from the strip start, projected onto the strip axis.
    pub positions: Vec<f64>,
    pub values: Vec<f64>,
}

/// Collect every unmasked pixel inside the `length` x `width` strip that starts
/// at `start` and runs along `angle` (radians from +x).
///
/// Results are ordered by projected distance. Returns `None` when the strip
/// holds no usable pixel.
pub fn sample_line(
    frame: &Frame,
    start: Center,
    length: f64,
    width: f64,
    angle: f64,
) -> Option<LineSamples> {
    if !(length > 0.0 && width > 0.0) || !start.is_finite() {
        return None;
    }
    let (h, w) = frame.data.dim();
    let (sin_a, cos_a) = angle.sin_cos();
    let half = width / 2.0;

    // Corners of the strip, for the pixel bounding box.
    let corners = [
        (start.x - half * sin_a, start.y + half * cos_a),
        (start.x + half * sin_a, start.y - half * cos_a),
        (
            start.x + length * cos_a - half * sin_a,
            start.y + length * sin_a + half * cos_a,
        ),
        (
            start.x + length * cos_a + half * sin_a,
            start.y + length * sin_a - half * cos_a,
        ),
    ];
    let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

    if max_x < 0.0 || max_y < 0.0 || min_x > (w - 1) as f64 || min_y > (h - 1) as f64 {
        return None;
    }
    let col_lo = min_x.floor().max(0.0) as usize;
    let col_hi = (max_x.ceil() as usize).min(w - 1);
    let row_lo = min_y.floor().max(0.0) as usize;
    let row_hi = (max_y.ceil() as usize).min(h - 1);

    let mut picked: Vec<(f64, f64)> = Vec::new();
    for row in row_lo..=row_hi {
        for col in col_lo..=col_hi {
            let dx = col as f64 - start.x;
            let dy = row as f64 - start.y;
            let along = dx * cos_a + dy * sin_a;
            let across = -dx * sin_a + dy * cos_a;
            if along < 0.0 || along > length || across.abs() > half {
                continue;
            }
            if frame.is_masked(col, row) {
                continue;
            }
            picked.push((along, frame.data[[row, col]] as f64));
        }
    }

    if picked.is_empty() {
        return None;
    }
    picked.sort_by(|a, b| a.0.total_cmp(&b.0));

    Some(LineSamples {
        positions: picked.iter().map(|p| p.0).collect(),
        values: picked.iter().map(|p| p.1).collect(),
    })
}
