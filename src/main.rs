//! Command line front end: configuration in, SVG sun-band chart out.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{ArgAction, Parser, ValueHint};
use sunbands::{ChartConfig, SpaOracle, generate_chart, write_svg};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render daily sunrise, sunset and twilight as a sun-band chart",
    long_about = None
)]
struct Cli {
    /// TOML configuration file; built-in defaults apply when omitted.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Observer latitude in degrees, positive north.
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Observer longitude in degrees, positive east.
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// IANA timezone name, e.g. Australia/Sydney.
    #[arg(long)]
    timezone: Option<String>,

    /// First local date-time of the range (YYYY-MM-DDTHH:MM:SS).
    #[arg(long)]
    start: Option<NaiveDateTime>,

    /// Local date-time the range stops before (YYYY-MM-DDTHH:MM:SS).
    #[arg(long)]
    end: Option<NaiveDateTime>,

    /// Fixed ΔT in seconds instead of the per-day estimate.
    #[arg(long, allow_hyphen_values = true)]
    delta_t: Option<f64>,

    /// Output SVG path.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Compute days one after another instead of concurrently.
    #[arg(long, action = ArgAction::SetTrue)]
    sequential: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long, action = ArgAction::SetTrue)]
    print_config: bool,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut ChartConfig) {
        if let Some(latitude) = self.latitude {
            config.location.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            config.location.longitude = longitude;
        }
        if let Some(timezone) = &self.timezone {
            config.location.timezone.clone_from(timezone);
        }
        if let Some(start) = self.start {
            config.range.start = start;
        }
        if let Some(end) = self.end {
            config.range.end = end;
        }
        if let Some(delta_t) = self.delta_t {
            config.delta_t = Some(delta_t);
        }
        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        if self.sequential {
            config.parallel = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut config = match &cli.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ChartConfig::default(),
    };
    cli.apply(&mut config);

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let settings = config.resolve().context("invalid configuration")?;
    info!(
        latitude = settings.observer().latitude(),
        longitude = settings.observer().longitude(),
        timezone = %settings.timezone(),
        "generating chart"
    );

    let oracle = SpaOracle::new(settings.delta_t());
    let chart = generate_chart(&settings, &oracle).context("chart generation failed")?;
    write_svg(&chart, settings.output())
        .with_context(|| format!("failed to write {}", settings.output().display()))?;
    Ok(())
}
