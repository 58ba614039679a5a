//! Main entry point for the papillon binary

use anyhow::{Context, Result};
use clap::Parser;
use papillon::{ButterflyConfig, PalettePreset, Simulation, WingPalette};
use std::path::PathBuf;

/// Particles that gather into a butterfly.
#[derive(Debug, Parser)]
#[command(name = "papillon", version, about)]
struct Cli {
    /// Number of particles
    #[arg(short = 'n', long)]
    particles: Option<u32>,

    /// Window width in logical pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long)]
    height: Option<u32>,

    /// TOML config file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Random seed for a repeatable butterfly
    #[arg(long)]
    seed: Option<u64>,

    /// Color preset: monarch, morpho, cabbage-white, neon
    #[arg(long, value_parser = parse_palette)]
    palette: Option<PalettePreset>,

    /// Wait for Space instead of forming on startup
    #[arg(long)]
    no_auto_form: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_palette(s: &str) -> Result<PalettePreset, String> {
    s.parse().map_err(|e: papillon::ConfigError| e.to_string())
}

impl Cli {
    fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn into_config(self) -> Result<ButterflyConfig> {
        let mut config = match &self.config {
            Some(path) => ButterflyConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ButterflyConfig::default(),
        };

        if let Some(count) = self.particles {
            config.particle_count = count;
        }
        if let Some(width) = self.width {
            config.window_width = width;
        }
        if let Some(height) = self.height {
            config.window_height = height;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(preset) = self.palette {
            config.palette = WingPalette::preset(preset);
        }
        if self.no_auto_form {
            config.auto_form = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over the flags
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let config = cli.into_config()?;
    log::info!(
        "Starting with {} particles at {}x{}",
        config.particle_count,
        config.window_width,
        config.window_height
    );

    Simulation::new()
        .with_config(config)
        .run()
        .context("simulation failed")
}
