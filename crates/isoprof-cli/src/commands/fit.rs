use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use isoprof_core::fit::{fit_isophotes_reported, FitConfig, IsophoteGuess, LossVariant};
use isoprof_core::Center;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::image_io::{estimate_background, estimate_noise, load_frame};
use crate::progress::BarReporter;
use crate::summary::print_fit_summary;

#[derive(Clone, Copy, ValueEnum)]
pub enum LossArg {
    Robust,
    Mean,
}

impl From<LossArg> for LossVariant {
    fn from(arg: LossArg) -> Self {
        match arg {
            LossArg::Robust => LossVariant::Robust,
            LossArg::Mean => LossVariant::Mean,
        }
    }
}

#[derive(Args)]
pub struct FitArgs {
    /// Input image file (TIFF or PNG)
    pub file: PathBuf,

    /// Galaxy centre, x pixel coordinate
    #[arg(long)]
    pub center_x: f64,

    /// Galaxy centre, y pixel coordinate
    #[arg(long)]
    pub center_y: f64,

    /// Initial ellipticity in [0, 1)
    #[arg(long, default_value = "0.2")]
    pub ellipticity: f64,

    /// Initial position angle in radians
    #[arg(long, default_value = "0.0")]
    pub pa: f64,

    /// PSF full width at half maximum in pixels
    #[arg(long)]
    pub psf_fwhm: f64,

    /// Background noise level (estimated from the image if omitted)
    #[arg(long)]
    pub noise: Option<f64>,

    /// Sky level to subtract (median of the image if omitted)
    #[arg(long)]
    pub background: Option<f32>,

    /// Mask image; non-zero pixels are excluded
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Fit config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for the search RNG
    #[arg(long)]
    pub seed: Option<u64>,

    /// Loss variant
    #[arg(long, value_enum)]
    pub loss: Option<LossArg>,
}

pub fn run(args: &FitArgs) -> Result<()> {
    let mut config: FitConfig = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid fit config")?
    } else {
        FitConfig::default()
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(loss) = args.loss {
        config.loss = loss.into();
    }

    let mut frame = load_frame(&args.file, args.mask.as_deref())?;
    let background = args.background.unwrap_or_else(|| estimate_background(&frame));
    frame.subtract_background(background);
    let noise = args.noise.unwrap_or_else(|| estimate_noise(&frame));
    info!(background, noise, "Background statistics");

    println!(
        "Loaded {}x{} image{}",
        frame.width(),
        frame.height(),
        if frame.has_mask() { " (masked)" } else { "" }
    );

    let guess = IsophoteGuess {
        center: Center::new(args.center_x, args.center_y),
        ellipticity: args.ellipticity,
        position_angle: args.pa,
        background_noise: noise,
        psf_fwhm: args.psf_fwhm,
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let reporter = BarReporter::new();
    let profile = fit_isophotes_reported(&frame, &guess, &config, &mut rng, &reporter)
        .context("Isophote fit failed")?;
    reporter.finish();

    print_fit_summary(&profile, &config);
    Ok(())
}
