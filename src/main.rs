use automerge_enabler::commands::app::{self, AppError};
use automerge_enabler::commands::enable::RunOutcome;
use automerge_enabler::config::{ConfigError, Settings};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};
use std::io::Write;
use thiserror::Error;

/// Top-level error type for the automerge-enabler CLI binary
#[derive(Debug, Error)]
enum CliError {
    /// Required settings are missing.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Command orchestration failed.
    #[error(transparent)]
    App(#[from] AppError),
}

#[derive(Parser)]
#[command(name = "automerge-enabler")]
#[command(
    about = "Open a pull request that enables Dependabot auto-merge on a GitHub repository",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// URL of the repository (e.g., https://github.com/owner/repo)
    #[arg(value_name = "REPO_URL")]
    repo_url: String,
}

fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    init_logging();

    match dotenv {
        Ok(path) => debug!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => warn!("ignoring .env file: {err}"),
    }

    let settings = Settings::from_env()?;

    match app::enable(&cli.repo_url, &settings)? {
        RunOutcome::AlreadyEnabled => info!("Nothing to do."),
        RunOutcome::Opened(handle) => info!("Opened pull request #{}", handle.number),
        RunOutcome::PullRequestRejected { status, .. } => {
            warn!("Branch pushed, but the pull request was refused (status {status})");
        }
    }
    Ok(())
}

/// Initialize logging at `info`, overridable through `RUST_LOG`
fn init_logging() {
    let mut builder = env_logger::builder();
    builder
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            let level = record.level();
            let style = &buf.default_level_style(level);
            writeln!(buf, "[{style}{level}{style:#}] {}", record.args())
        })
        .format_timestamp(None);

    builder.init();
}
