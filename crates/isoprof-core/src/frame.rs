use ndarray::Array2;

use crate::error::{IsoprofError, Result};

/// A background-subtracted image with an optional bad-pixel mask.
///
/// Pixel data is row-major with shape `(height, width)`; pixel `(x, y)` lives
/// at `data[[y, x]]`.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Flux values, background already removed.
    pub data: Array2<f32>,
    /// `true` marks an excluded pixel. Never holds an all-`false` mask.
    mask: Option<Array2<bool>>,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Result<Self> {
        let (h, w) = data.dim();
        if h == 0 || w == 0 {
            return Err(IsoprofError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        Ok(Self { data, mask: None })
    }

    /// Attach a bad-pixel mask. A mask with no excluded pixel is discarded.
    pub fn with_mask(data: Array2<f32>, mask: Array2<bool>) -> Result<Self> {
        let mut frame = Self::new(data)?;
        let (h, w) = frame.data.dim();
        let (mh, mw) = mask.dim();
        if (mh, mw) != (h, w) {
            return Err(IsoprofError::MaskShapeMismatch {
                width: w,
                height: h,
                mask_width: mw,
                mask_height: mh,
            });
        }
        if mask.iter().any(|&m| m) {
            frame.mask = Some(mask);
        }
        Ok(frame)
    }

    /// Subtract a constant background level in place.
    pub fn subtract_background(&mut self, level: f32) {
        self.data.mapv_inplace(|v| v - level);
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn mask(&self) -> Option<&Array2<bool>> {
        self.mask.as_ref()
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    /// Whether integer pixel `(col, row)` is excluded. Out-of-range pixels are not.
    pub fn is_masked(&self, col: usize, row: usize) -> bool {
        match &self.mask {
            Some(mask) => mask.get([row, col]).copied().unwrap_or(false),
            None => false,
        }
    }
}

/// A point in image pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Center {
    pub x: f64,
    pub y: f64,
}

impl Center {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Shape of a single isophote.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseGeometry {
    pub center: Center,
    /// Semi-major axis in pixels.
    pub sma: f64,
    /// Ellipticity, `1 - b/a`, in `[0, 1)`.
    pub ellipticity: f64,
    /// Major-axis orientation in radians, counter-clockwise from +x.
    pub position_angle: f64,
}

impl EllipseGeometry {
    pub fn new(center: Center, sma: f64, ellipticity: f64, position_angle: f64) -> Self {
        Self {
            center,
            sma,
            ellipticity,
            position_angle,
        }
    }

    /// Image coordinates of the point at parametric angle `theta`.
    pub fn point_at(&self, theta: f64) -> (f64, f64) {
        let u = self.sma * theta.cos();
        let v = self.sma * (1.0 - self.ellipticity) * theta.sin();
        let (sin_pa, cos_pa) = self.position_angle.sin_cos();
        (
            self.center.x + u * cos_pa - v * sin_pa,
            self.center.y + u * sin_pa + v * cos_pa,
        )
    }

    /// Elliptical radius of image point `(x, y)` under this geometry's shape.
    ///
    /// Equals `sma` for every point returned by [`point_at`](Self::point_at).
    pub fn elliptical_radius(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        let (sin_pa, cos_pa) = self.position_angle.sin_cos();
        let u = dx * cos_pa + dy * sin_pa;
        let v = (-dx * sin_pa + dy * cos_pa) / (1.0 - self.ellipticity);
        (u * u + v * v).sqrt()
    }
}
