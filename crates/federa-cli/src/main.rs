use anyhow::{Context, Result};
use clap::Parser;
use federa_cli::{logging, render, run, CheckConfig, OutputFormat};
use std::path::PathBuf;

/// Validate federated process documents
#[derive(Parser)]
#[command(name = "federa-check", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (overrides FEDERA_CONFIG)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Stop at the first invalid document
    #[arg(long)]
    fail_fast: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Process documents to check
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CheckConfig::load_from(Some(path.as_path())),
        None => CheckConfig::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(format) = cli.format {
        config.output_format = format;
    }
    config.fail_fast |= cli.fail_fast;
    config.log_json |= cli.log_json;

    logging::init_logging(&config).context("Failed to initialize logging")?;

    let reports = run(&config, &cli.files).context("Failed to check documents")?;
    let output = render(&reports, config.output_format).context("Failed to render report")?;
    print!("{}", output);

    if reports.iter().any(|report| !report.valid) {
        std::process::exit(1);
    }
    Ok(())
}
