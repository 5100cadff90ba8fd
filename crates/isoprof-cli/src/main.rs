mod commands;
mod image_io;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "isoprof", about = "Isophote fitting for galaxy images")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit elliptical isophotes and print the profile
    Fit(commands::fit::FitArgs),
    /// Measure surface brightness along strips across the major axis
    Axial(commands::axial::AxialArgs),
    /// Print or save the default fit config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Fit(args) => commands::fit::run(args),
        Commands::Axial(args) => commands::axial::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
