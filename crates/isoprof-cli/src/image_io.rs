use std::path::Path;

use anyhow::{Context, Result};
use isoprof_core::stats::{median, scatter, AverageMethod};
use isoprof_core::Frame;
use ndarray::Array2;

/// Load an image file as grayscale flux in `[0, 1]`.
pub fn load_image(path: &Path) -> Result<Array2<f32>> {
    let img = image::open(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = pixel.0[0] as f32 / 65535.0;
        }
    }

    Ok(data)
}

/// Load a mask image. Any non-zero pixel is excluded from the fit.
pub fn load_mask(path: &Path) -> Result<Array2<bool>> {
    let data = load_image(path).with_context(|| format!("Failed to load mask {}", path.display()))?;
    Ok(data.mapv(|v| v > 0.0))
}

/// Load the image (and optional mask) into a `Frame`.
pub fn load_frame(image: &Path, mask: Option<&Path>) -> Result<Frame> {
    let data = load_image(image)?;
    let frame = match mask {
        Some(mask_path) => Frame::with_mask(data, load_mask(mask_path)?)?,
        None => Frame::new(data)?,
    };
    Ok(frame)
}

/// Unmasked pixel values, for background statistics.
fn unmasked_values(frame: &Frame) -> Vec<f32> {
    frame
        .data
        .indexed_iter()
        .filter(|((row, col), _)| !frame.is_masked(*col, *row))
        .map(|(_, &v)| v)
        .collect()
}

/// Rough sky level: the median of all unmasked pixels.
pub fn estimate_background(frame: &Frame) -> f32 {
    median(&unmasked_values(frame)).unwrap_or(0.0)
}

/// Rough noise level: half the 16th–84th percentile range of unmasked pixels.
pub fn estimate_noise(frame: &Frame) -> f64 {
    scatter(&unmasked_values(frame), AverageMethod::Median).map_or(0.0, f64::from)
}
