use ndarray::Array2;

/// Bilinear interpolation at `(x, y)`, where pixel centres sit on integer
/// coordinates. Returns `None` outside `[0, w-1] x [0, h-1]`.
pub fn bilinear_sample(data: &Array2<f32>, x: f64, y: f64) -> Option<f64> {
    let (h, w) = data.dim();
    if !(x >= 0.0 && y >= 0.0 && x <= (w - 1) as f64 && y <= (h - 1) as f64) {
        return None;
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let v00 = data[[y0, x0]] as f64;
    let v10 = data[[y0, x1]] as f64;
    let v01 = data[[y1, x0]] as f64;
    let v11 = data[[y1, x1]] as f64;

    Some(
        v00 * (1.0 - fx) * (1.0 - fy)
            + v10 * fx * (1.0 - fy)
            + v01 * (1.0 - fx) * fy
            + v11 * fx * fy,
    )
}

/// Integer pixel `(col, row)` nearest to `(x, y)`, if inside the image.
pub fn nearest_pixel(data: &Array2<f32>, x: f64, y: f64) -> Option<(usize, usize)> {
    let (h, w) = data.dim();
    let col = x.round();
    let row = y.round();
    if col < 0.0 || row < 0.0 || col >= w as f64 || row >= h as f64 {
        return None;
    }
    Some((col as usize, row as usize))
}
