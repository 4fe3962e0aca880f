mod config;
mod logging;
mod plan;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sitegen_engine::{AtomicFileWriter, GenerationError, GenerationSummary, PersistError};
use sitegen_logging::{level_from_verbosity, sitegen_error, sitegen_info, sitegen_warn};
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigError, SiteConfig};

/// Generates a static copy of a running site and verifies its internal links.
#[derive(Debug, Parser)]
#[command(name = "sitegen", version)]
struct Cli {
    /// RON site configuration; `site.ron` is used when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL of the running application to render pages from
    #[arg(long)]
    app_url: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the static output, then exit
    Build {
        /// Path prefix the site is hosted under, e.g. /docs
        base_url: Option<String>,
        /// Output directory; cleared before generation
        output_folder: Option<PathBuf>,
        /// Write a JSON summary of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to write report: {0}")]
    Report(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(level_from_verbosity(cli.verbose), cli.log_file.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            sitegen_error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = SiteConfig::discover(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Build {
            base_url,
            output_folder,
            report,
        }) => {
            config.apply_overrides(base_url, output_folder, cli.app_url);
            build(&config, report.as_deref()).await
        }
        None => {
            config.apply_overrides(None, None, cli.app_url);
            let generator = config.build_generator();
            let pages = generator.collect_pages().await?;
            let assets = generator.collect_assets().await?;
            print!("{}", plan::render(&config, &pages, &assets));
            Ok(())
        }
    }
}

async fn build(config: &SiteConfig, report: Option<&Path>) -> Result<(), AppError> {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            sitegen_warn!("Interrupted, stopping generation");
            on_signal.cancel();
        }
    });

    let generator = config.build_generator().with_cancellation(cancel);
    let result = generator.generate(&config.app_url).await;

    let summary = match &result {
        Ok(summary) => Some(summary),
        Err(GenerationError::BrokenLinks { summary, .. }) => Some(summary.as_ref()),
        Err(_) => None,
    };
    if let (Some(path), Some(summary)) = (report, summary) {
        write_report(path, summary).map_err(|err| AppError::Report(err.to_string()))?;
        sitegen_info!("Wrote run summary to {:?}", path);
    }

    let summary = result?;
    sitegen_info!(
        "Static output ready in {:?}: {} page(s), {} asset(s), {} created file(s)",
        config.output_dir,
        summary.pages_written,
        summary.assets_copied,
        summary.files_created
    );
    Ok(())
}

fn write_report(path: &Path, summary: &GenerationSummary) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|err| PersistError::Io(std::io::Error::other(err)))?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| PersistError::InvalidPath(path.display().to_string()))?;
    AtomicFileWriter::new(dir).write(&file_name, json.as_bytes())?;
    Ok(())
}
