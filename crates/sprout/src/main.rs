// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sprout - a chat-driven support-ticket assistant.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod console;
mod serve;
mod shell;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sprout_catalog::Catalog;
use sprout_config::model::SproutConfig;
use sprout_core::{SproutError, StorageAdapter};
use sprout_storage::SqliteStorage;

/// Sprout - a chat-driven support-ticket assistant.
#[derive(Parser, Debug)]
#[command(name = "sprout", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll the message log and answer new incoming messages.
    Serve,
    /// Chat with the assistant from the terminal.
    ///
    /// Each line is stored and answered in this process. A `sprout serve`
    /// polling the same database keeps its own record of handled messages
    /// and would answer them a second time; stop it first, or use `receive`
    /// to hand messages to the running server.
    Shell {
        /// Phone number to chat as.
        #[arg(long, default_value = "local")]
        from: String,
    },
    /// Append a message to the incoming log without answering it.
    Receive {
        /// Phone number of the sender.
        #[arg(long)]
        from: String,
        /// Message text.
        text: String,
    },
    /// List stored tickets.
    Tickets {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show both message logs in chronological order.
    History {
        /// Only show messages newer than this RFC 3339 timestamp.
        #[arg(long, value_parser = parse_since)]
        since: Option<DateTime<Utc>>,
    },
    /// Delete all messages and tickets.
    Clear,
    /// Print the departments and their issues.
    Catalog,
}

fn parse_since(s: &str) -> Result<DateTime<Utc>, String> {
    sprout_core::types::parse_timestamp(s).map_err(|e| format!("invalid timestamp: {e}"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => sprout_config::load_and_validate_path(path),
        None => sprout_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            sprout_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // One-shot commands only log warnings.
    match cli.command {
        Some(Commands::Serve) => init_tracing(&config.agent.log_level),
        _ => init_tracing("warn"),
    }

    if let Err(e) = run(cli.command, config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>, config: SproutConfig) -> Result<(), SproutError> {
    match command {
        Some(Commands::Serve) => {
            let catalog = load_catalog(&config)?;
            serve::run_serve(config, catalog).await
        }
        Some(Commands::Shell { from }) => {
            let catalog = load_catalog(&config)?;
            shell::run_shell(config, catalog, from).await
        }
        Some(Commands::Receive { from, text }) => admin::run_receive(&config, &from, &text).await,
        Some(Commands::Tickets { json }) => admin::run_tickets(&config, json).await,
        Some(Commands::History { since }) => admin::run_history(&config, since).await,
        Some(Commands::Clear) => admin::run_clear(&config).await,
        Some(Commands::Catalog) => {
            let catalog = load_catalog(&config)?;
            admin::run_catalog(&catalog);
            Ok(())
        }
        None => {
            println!("sprout: use --help for available commands");
            Ok(())
        }
    }
}

/// Loads the configured catalog override, or the built-in one.
fn load_catalog(config: &SproutConfig) -> Result<Catalog, SproutError> {
    Catalog::load(config.catalog.path.as_deref().map(Path::new))
}

/// Opens and migrates the configured database.
async fn open_storage(config: &SproutConfig) -> Result<Arc<SqliteStorage>, SproutError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(Arc::new(storage))
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sprout={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_shell_with_sender() {
        let cli = Cli::try_parse_from(["sprout", "shell", "--from", "+15550001"]).unwrap();
        match cli.command {
            Some(Commands::Shell { from }) => assert_eq!(from, "+15550001"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn shell_help_warns_about_running_server() {
        let cmd = Cli::command();
        let shell = cmd.find_subcommand("shell").unwrap();
        let long_about = shell.get_long_about().unwrap().to_string();
        assert!(long_about.contains("sprout serve"));
        assert!(long_about.contains("receive"));
    }

    #[test]
    fn history_since_must_be_rfc3339() {
        let ok = Cli::try_parse_from(["sprout", "history", "--since", "2026-01-01T00:00:00Z"]);
        assert!(ok.is_ok());
        let bad = Cli::try_parse_from(["sprout", "history", "--since", "yesterday"]);
        assert!(bad.is_err());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["sprout", "tickets", "--json", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn default_catalog_loads_without_override() {
        let config = SproutConfig::default();
        let catalog = load_catalog(&config).unwrap();
        assert_eq!(catalog.departments().count(), 7);
    }
}
