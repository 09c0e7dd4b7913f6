//! votelab CLI — run the indicator vote over a price file.
//!
//! Commands:
//! - `run`: compute the selected indicators under a horizon profile and
//!   report the majority-vote signal and its transitions
//! - `profiles`: list the built-in and file-supplied horizon profiles
//! - `alert`: check whether the latest price crosses a threshold

mod input;
mod logging;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use votelab_core::alert::{AlertDirection, PriceAlert};
use votelab_core::{IndicatorSelection, ProfileSet};

use logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "votelab",
    version,
    about = "votelab CLI — majority vote over SMA, EMA, RSI, MACD and Bollinger Bands"
)]
struct Cli {
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the indicator vote over a price file.
    Run {
        /// Price file: .csv (timestamp,price) or .json ({"prices": [[ms, price], ...]}).
        #[arg(long)]
        prices: PathBuf,

        /// Horizon profile label.
        #[arg(long, default_value = "short")]
        horizon: String,

        /// Indicators by label or menu number, e.g. "SMA,RSI" or "1,3".
        #[arg(long, default_value = "SMA,EMA,RSI,MACD,BB")]
        indicators: IndicatorSelection,

        /// TOML file with extra profiles; labels override the built-ins.
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Report format on stdout.
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Also write one CSV row per step (votes and indicator values).
        #[arg(long)]
        signals_csv: Option<PathBuf>,
    },
    /// List horizon profiles.
    Profiles {
        /// TOML file with extra profiles.
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Print as TOML instead of a table.
        #[arg(long, default_value_t = false)]
        toml: bool,
    },
    /// Check a price threshold against the latest price.
    Alert {
        /// Price file (.csv or .json).
        #[arg(long)]
        prices: PathBuf,

        /// Threshold price.
        #[arg(long)]
        threshold: f64,

        /// Trigger when the price is strictly above or below the threshold.
        #[arg(long)]
        direction: AlertDirection,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format);

    match cli.command {
        Commands::Run {
            prices,
            horizon,
            indicators,
            profiles,
            format,
            signals_csv,
        } => run_vote(
            &prices,
            &horizon,
            &indicators,
            profiles.as_deref(),
            format,
            signals_csv.as_deref(),
        ),
        Commands::Profiles { profiles, toml } => run_profiles(profiles.as_deref(), toml),
        Commands::Alert {
            prices,
            threshold,
            direction,
        } => run_alert(&prices, threshold, direction),
    }
}

/// Built-in profiles, extended by `path` when given.
fn load_profiles(path: Option<&Path>) -> Result<ProfileSet> {
    let mut set = ProfileSet::builtin();
    if let Some(path) = path {
        let extra = ProfileSet::from_file(path)
            .with_context(|| format!("failed to load profiles from {}", path.display()))?;
        tracing::info!(path = %path.display(), count = extra.len(), "loaded profiles");
        set.extend(extra);
    }
    Ok(set)
}

fn run_vote(
    prices: &Path,
    horizon: &str,
    indicators: &IndicatorSelection,
    profiles: Option<&Path>,
    format: ReportFormat,
    signals_csv: Option<&Path>,
) -> Result<()> {
    let series = input::load_prices(prices)?;
    let profiles = load_profiles(profiles)?;

    let output = votelab_core::run_profile(&series, indicators, &profiles, horizon)
        .with_context(|| format!("vote failed for horizon '{horizon}'"))?;

    match format {
        ReportFormat::Text => println!("{}", report::render_summary(&series, &output, horizon)),
        ReportFormat::Json => println!("{}", report::export_json(&output)?),
    }

    if let Some(path) = signals_csv {
        report::write_signals_csv(path, &series, &output)?;
        tracing::info!(path = %path.display(), rows = output.records.len(), "wrote signals CSV");
    }

    Ok(())
}

fn run_profiles(path: Option<&Path>, as_toml: bool) -> Result<()> {
    let profiles = load_profiles(path)?;
    if as_toml {
        print!("{}", profiles.to_toml()?);
    } else {
        println!("{}", report::render_profiles(&profiles));
    }
    Ok(())
}

fn run_alert(prices: &Path, threshold: f64, direction: AlertDirection) -> Result<()> {
    let series = input::load_prices(prices)?;
    let alert = PriceAlert::new(threshold, direction);

    let latest = series.latest().context("cannot check an alert on an empty price file")?;
    if alert.is_triggered(latest.price) {
        println!(
            "ALERT: latest price {:.4} at {} is {direction} {threshold}",
            latest.price,
            latest.timestamp.format("%Y-%m-%d %H:%M")
        );
    } else {
        println!(
            "No alert: latest price {:.4} is not {direction} {threshold}",
            latest.price
        );
    }

    match alert.first_trigger(&series) {
        Some((index, point)) => println!(
            "First crossing in history: index {index} at {} ({:.4})",
            point.timestamp.format("%Y-%m-%d %H:%M"),
            point.price
        ),
        None => println!("Threshold never crossed in this history"),
    }
    Ok(())
}
