//! # activity-cli
//!
//! Diagnostics CLI for the campus activity client.
//!
//! ## Commands
//!
//! - `logs show|add|clear|export|dev-mode`: Inspect or edit the audit log
//! - `filter`: Run the local filter over a catalog dump
//! - `status`: Show resolved configuration and log state
//!
//! ## Example
//!
//! ```bash
//! # Print the last 20 audit lines
//! activity-cli logs show --tail 20
//!
//! # Export the log to the downloads directory
//! activity-cli logs export
//!
//! # Physical-education activities mentioning "run" from a saved catalog
//! activity-cli filter --catalog catalog.json --module t --keyword run
//! ```

use anyhow::{Context, Result};
use campus_activity_client::ClientConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{filter, logs, status};

/// Diagnostics CLI for the campus activity client.
#[derive(Parser, Debug)]
#[command(name = "activity-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory holding the log document
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (default: <data-dir>/client.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect or edit the audit log
    Logs {
        #[command(subcommand)]
        action: LogsAction,
    },

    /// Filter a catalog dump locally
    Filter {
        /// JSON file holding a list of activities
        #[arg(long)]
        catalog: PathBuf,

        #[command(flatten)]
        criteria: filter::FilterArgs,
    },

    /// Show resolved configuration and log state
    Status,
}

#[derive(Subcommand, Debug)]
enum LogsAction {
    /// Print the audit lines
    Show {
        /// Only print the last N lines
        #[arg(long)]
        tail: Option<usize>,
    },

    /// Append a line
    Add {
        /// Message to record
        message: String,
    },

    /// Drop every line
    Clear,

    /// Write the log to a text file
    Export {
        /// Destination directory (default: configured export dir, else downloads)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Turn developer mode on
    DevMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let config = load_config(cli.config.as_deref(), &data_dir).await?;

    match cli.command {
        Commands::Logs { action } => match action {
            LogsAction::Show { tail } => logs::show(&config, tail).await?,
            LogsAction::Add { message } => logs::add(&config, &message).await?,
            LogsAction::Clear => logs::clear(&config).await?,
            LogsAction::Export { dir } => {
                let dir = dir.unwrap_or_else(|| default_export_dir(&config));
                let path = logs::export(&config, &dir).await?;
                println!("Exported to {}", path.display());
            }
            LogsAction::DevMode => logs::dev_mode(&config).await?,
        },
        Commands::Filter { catalog, criteria } => {
            filter::run(&catalog, &criteria).await?;
        }
        Commands::Status => {
            status::run(&config, &data_dir).await?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load configuration, resolving the log document against `data_dir`.
async fn load_config(explicit: Option<&Path>, data_dir: &Path) -> Result<ClientConfig> {
    let config = match explicit {
        Some(path) => ClientConfig::from_file(path)
            .await
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let candidate = data_dir.join("client.toml");
            if candidate.exists() {
                ClientConfig::from_file(&candidate)
                    .await
                    .with_context(|| format!("Failed to load config {}", candidate.display()))?
            } else {
                tracing::debug!("no config file, using defaults");
                ClientConfig::default()
            }
        }
    };
    Ok(config.with_data_dir(data_dir))
}

/// Get the default data directory for activity-cli.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("edu", "campus", "activity-cli")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Configured export directory, or the user's downloads when left at the default.
fn default_export_dir(config: &ClientConfig) -> PathBuf {
    if config.logs.export_dir != Path::new(".") {
        return config.logs.export_dir.clone();
    }
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_filter_with_repeated_modules() {
        let cli = Cli::try_parse_from([
            "activity-cli",
            "filter",
            "--catalog",
            "catalog.json",
            "--module",
            "t",
            "--module",
            "m",
            "--keyword",
            "run",
        ])
        .unwrap();

        match cli.command {
            Commands::Filter { catalog, criteria } => {
                assert_eq!(catalog, PathBuf::from("catalog.json"));
                assert_eq!(criteria.module, vec!["t".to_string(), "m".to_string()]);
                assert_eq!(criteria.keyword.as_deref(), Some("run"));
            }
            other => panic!("Expected Filter, got {:?}", other),
        }
    }

    #[test]
    fn parses_logs_export_dir() {
        let cli = Cli::try_parse_from(["activity-cli", "logs", "export", "--dir", "/tmp/out"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Logs {
                action: LogsAction::Export { dir: Some(_) }
            }
        ));
    }

    #[tokio::test]
    async fn config_defaults_resolve_against_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, dir.path()).await.unwrap();
        assert_eq!(config.logs.document, dir.path().join("logs.json"));
    }

    #[tokio::test]
    async fn config_file_in_data_dir_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            dir.path().join("client.toml"),
            "[logs]\nexport_prefix = \"diag\"\n",
        )
        .await
        .unwrap();

        let config = load_config(None, dir.path()).await.unwrap();
        assert_eq!(config.logs.export_prefix, "diag");
    }

    #[tokio::test]
    async fn missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")), dir.path()).await;
        assert!(result.is_err());
    }

    #[test]
    fn configured_export_dir_wins() {
        let mut config = ClientConfig::default();
        config.logs.export_dir = PathBuf::from("/srv/exports");
        assert_eq!(default_export_dir(&config), PathBuf::from("/srv/exports"));
    }
}
