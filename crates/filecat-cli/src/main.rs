//! FileCat CLI - Command-line client for the FileCat catalog
//!
//! Provides commands for:
//! - Syncing a local directory into a catalog
//! - Listing catalogs and files
//! - Showing differences, duplicates and singletons across hosts
//! - Deleting file records
//! - Inspecting configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    catalog::{CatalogsCommand, DeleteCommand, FilesCommand, View, ViewCommand},
    completions::CompletionsCommand,
    config::ConfigCommand,
    sync::SyncCommand,
    CliContext,
};
use filecat_core::config::{Config, ConfigBuilder};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "filecat", version, about = "Cross-host file catalog client")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog service URL (overrides client.endpoint)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Catalogue a local directory
    Sync(SyncCommand),
    /// List catalogs
    Catalogs(CatalogsCommand),
    /// List files in a catalog
    Files(FilesCommand),
    /// Files whose content differs between hosts
    Differences(ViewCommand),
    /// Files with identical content on several hosts
    Duplicates(ViewCommand),
    /// Files seen on a single host only
    Singletons(ViewCommand),
    /// Delete a file record and all its observations
    Delete(DeleteCommand),
    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    // `config validate` reports load failures itself.
    let strict = cli.config.is_some() && !matches!(cli.command, Commands::Config(_));
    let loaded = if strict {
        Config::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else {
        Config::load_or_default(&config_path)
    };
    let config = match cli.endpoint {
        Some(endpoint) => ConfigBuilder::from(loaded).client_endpoint(endpoint).build(),
        None => loaded,
    };

    let ctx = CliContext {
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        },
        config_path,
        config,
    };

    match cli.command {
        Commands::Sync(cmd) => cmd.execute(&ctx).await,
        Commands::Catalogs(cmd) => cmd.execute(&ctx).await,
        Commands::Files(cmd) => cmd.execute(&ctx).await,
        Commands::Differences(cmd) => cmd.execute(View::Differences, &ctx).await,
        Commands::Duplicates(cmd) => cmd.execute(View::Duplicates, &ctx).await,
        Commands::Singletons(cmd) => cmd.execute(View::Singletons, &ctx).await,
        Commands::Delete(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx),
        Commands::Completions(cmd) => cmd.execute(),
    }
}
