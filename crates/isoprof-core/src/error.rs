use thiserror::Error;

#[derive(Error, Debug)]
pub enum IsoprofError {
    #[error(
        "Unable to initialize ellipse fit: only {radii} sample radii after {attempts} relaxation attempts (possible missed center)"
    )]
    InitializationFailed { attempts: usize, radii: usize },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Mask shape {mask_width}x{mask_height} does not match image {width}x{height}")]
    MaskShapeMismatch {
        width: usize,
        height: usize,
        mask_width: usize,
        mask_height: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, IsoprofError>;
