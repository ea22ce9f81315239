use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use castfix::{parse_config, Config, CorrectionPipeline, OutputFormat, Strength};
use clap::Parser as Clap_parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clap_parser, Debug, Clone)]
#[command(author, version, about = "Remove color casts with Gray World white balance", long_about = None)]
struct Args {
    /// JPEG, PNG or BMP image to correct
    #[arg(value_name = "input_path")]
    input_path: PathBuf,

    /// Where to write the corrected image (".png" is added when there is no extension)
    #[arg(short, long, default_value = "result.png", value_name = "output_path")]
    output_path: PathBuf,

    /// TOML config file
    #[arg(short, long, value_name = "config_path")]
    config_path: Option<PathBuf>,

    /// Correction strength from 0.0 (original) to 1.0 (full correction)
    #[arg(short, long, conflicts_with = "percent")]
    strength: Option<f64>,

    /// Correction strength in whole percent (0-100)
    #[arg(short, long)]
    percent: Option<u8>,

    /// Output format used when the output path has no extension
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Log channel means and gains
    #[arg(long)]
    stats: bool,
}

/// `-s` and `-p` are mutually exclusive on the command line; `-s` wins if
/// both ever reach here.
fn resolve_strength(strength: Option<f64>, percent: Option<u8>) -> Option<Strength> {
    match (strength, percent) {
        (Some(value), _) => Some(Strength::new(value)),
        (None, Some(percent)) => Some(Strength::from_percent(percent)),
        (None, None) => None,
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config_path {
        Some(path) => parse_config(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(format) = args.format {
        config.output.format = format;
    }
    Ok(config)
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;

    let decode = Instant::now();
    let mut pipeline = CorrectionPipeline::open(&args.input_path, &config)
        .with_context(|| format!("Failed to load image {}", args.input_path.display()))?;
    tracing::debug!("decode + correction time: {:.2?}", decode.elapsed());

    if let Some(strength) = resolve_strength(args.strength, args.percent) {
        pipeline.set_strength(strength);
    }

    if args.stats {
        match pipeline.scales() {
            Some(s) => tracing::info!(
                means = ?s.means,
                gray = s.gray,
                scales = ?s.scales,
                "Channel statistics"
            ),
            None => tracing::info!("Image has a zero mean channel, no correction applied"),
        }
    }

    let now = Instant::now();
    let written = pipeline
        .save(&args.output_path, &config.output)
        .with_context(|| format!("Failed to save image {}", args.output_path.display()))?;
    tracing::debug!("encode time: {:.2?}", now.elapsed());
    tracing::info!(
        strength = pipeline.strength().value(),
        "Corrected image written to {}",
        written.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "castfix=info,castfix_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
