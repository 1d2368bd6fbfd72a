//! buildlens CLI - turns captured compiler output into diagnostics.
//!
//! ```text
//! swift build 2>/dev/null | buildlens --format json
//! buildlens build.log --fail-on-error
//! ```
//!
//! Output is read to EOF through a [`BuildSession`], extracted once, and
//! published into a [`DiagnosticsStore`] for the summary. Diagnostics go to
//! stdout; the summary and logs go to stderr.

mod render;

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use buildlens_build::{BuildSession, DiagnosticsStore, publish};
use buildlens_config::{BuildlensConfig, OutputFormat};

/// Log filter when neither `RUST_LOG` nor the config names one.
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(name = "buildlens")]
#[command(about = "Extract editor diagnostics from compiler output")]
struct Cli {
    /// Captured compiler output. Reads stdin when omitted.
    file: Option<PathBuf>,
    /// Output format: `text` or `json`
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Base directory for relative locations (default: current directory)
    #[arg(long)]
    root: Option<PathBuf>,
    /// Config file (default: ~/.buildlens/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Exit with status 1 when any error diagnostic is found
    #[arg(long)]
    fail_on_error: bool,
    /// Do not print the summary line to stderr
    #[arg(long)]
    no_summary: bool,
}

/// Settings after merging flags over the config file.
struct Settings {
    format: OutputFormat,
    summary: bool,
    fail_on_error: bool,
    root: PathBuf,
}

impl Settings {
    fn resolve(cli: &Cli, config: &BuildlensConfig) -> Result<Self> {
        let output = config.output();
        let root = match cli.root.clone().or_else(|| config.workspace_root()) {
            Some(root) => root,
            None => env::current_dir().context("resolving current directory")?,
        };
        Ok(Self {
            format: cli.format.unwrap_or(output.format),
            summary: output.summary && !cli.no_summary,
            fail_on_error: output.fail_on_error || cli.fail_on_error,
            root,
        })
    }
}

fn init_tracing(config_filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_filter.unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Stdout carries the diagnostics; logs must not interleave with them.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn load_config(cli: &Cli) -> (BuildlensConfig, Option<String>) {
    let loaded = match &cli.config {
        Some(path) => BuildlensConfig::load_from(path),
        None => BuildlensConfig::load(),
    };
    match loaded {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(err) => (BuildlensConfig::default(), Some(err.to_string())),
    }
}

async fn read_output(file: Option<&PathBuf>) -> Result<BuildSession> {
    match file {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            BuildSession::drain(file, tokio::io::empty()).await
        }
        None => BuildSession::drain(tokio::io::stdin(), tokio::io::empty()).await,
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let (config, config_warning) = load_config(&cli);
    init_tracing(config.log_filter());
    if let Some(warning) = config_warning {
        tracing::warn!("Ignoring config: {warning}");
    }

    let settings = Settings::resolve(&cli, &config)?;
    tracing::debug!(
        format = settings.format.as_str(),
        root = %settings.root.display(),
        "Settings resolved"
    );

    let report = read_output(cli.file.as_ref()).await?.finish();
    let extraction = report.extraction();

    let mut store = DiagnosticsStore::new();
    publish(&mut store, extraction.diagnostics(), &settings.root);
    let snapshot = store.snapshot();

    {
        let mut out = io::stdout().lock();
        render::write_diagnostics(&mut out, extraction.diagnostics(), settings.format)?;
        out.flush().context("flushing stdout")?;
    }

    if settings.summary {
        render::write_summary(&snapshot, extraction.skipped().len())?;
    }

    if settings.fail_on_error && snapshot.error_count() > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("buildlens: {err:#}");
            ExitCode::from(2)
        }
    }
}
