use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use isoprof_core::axial::{axial_profiles, AxialConfig};
use isoprof_core::Center;

use crate::image_io::{estimate_background, load_frame};
use crate::summary::print_axial_summary;

#[derive(Args)]
pub struct AxialArgs {
    /// Input image file
    pub file: PathBuf,

    /// Galaxy centre, x pixel coordinate
    #[arg(long)]
    pub center_x: f64,

    /// Galaxy centre, y pixel coordinate
    #[arg(long)]
    pub center_y: f64,

    /// Major-axis position angle in radians
    #[arg(long)]
    pub pa: f64,

    /// PSF full width at half maximum in pixels
    #[arg(long)]
    pub psf_fwhm: f64,

    /// Arcseconds per pixel
    #[arg(long)]
    pub pixscale: Option<f64>,

    /// Photometric zeropoint
    #[arg(long)]
    pub zeropoint: Option<f64>,

    /// Sky level to subtract (median of the image if omitted)
    #[arg(long)]
    pub background: Option<f32>,

    /// Mask image; non-zero pixels are excluded
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Axial config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &AxialArgs) -> Result<()> {
    let mut config: AxialConfig = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid axial config")?
    } else {
        AxialConfig::default()
    };
    if let Some(pixscale) = args.pixscale {
        config.pixscale = pixscale;
    }
    if let Some(zeropoint) = args.zeropoint {
        config.zeropoint = zeropoint;
    }

    let mut frame = load_frame(&args.file, args.mask.as_deref())?;
    let background = args.background.unwrap_or_else(|| estimate_background(&frame));
    frame.subtract_background(background);

    let profile = axial_profiles(
        &frame,
        Center::new(args.center_x, args.center_y),
        args.pa,
        args.psf_fwhm,
        &config,
    );

    print_axial_summary(&profile, &config);
    Ok(())
}
