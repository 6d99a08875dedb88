//! Config command - Inspect the FileCat configuration
//!
//! `filecat config show` prints the effective configuration (file values
//! over defaults); `filecat config validate` loads the file strictly and
//! reports every problem found.

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use filecat_core::config::Config;

use super::CliContext;
use crate::output::count;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
}

impl ConfigCommand {
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(ctx),
            ConfigCommand::Validate => execute_validate(ctx),
        }
    }
}

fn execute_show(ctx: &CliContext) -> Result<()> {
    let out = ctx.output();
    info!(config_path = %ctx.config_path.display(), "Showing configuration");

    if out.is_json() {
        out.json(&ctx.config)
            .context("Failed to serialize configuration to JSON")?;
    } else {
        out.success(format!("Configuration ({})", ctx.config_path.display()));
        out.detail("");

        let yaml =
            serde_yaml::to_string(&ctx.config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            out.detail(line);
        }
    }

    Ok(())
}

fn execute_validate(ctx: &CliContext) -> Result<()> {
    let out = ctx.output();
    let config_path = &ctx.config_path;

    if !config_path.exists() {
        if out.is_json() {
            out.json(&serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "errors": [],
                "defaults": true,
            }))?;
        } else {
            out.detail(format!(
                "Configuration file not found at {}",
                config_path.display()
            ));
            out.detail("Defaults are in effect.");
        }
        return Ok(());
    }

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            if out.is_json() {
                out.json(&serde_json::json!({
                    "valid": false,
                    "config_path": config_path.display().to_string(),
                    "errors": [format!("Failed to parse configuration: {e}")],
                }))?;
            } else {
                out.error(format!("Failed to parse configuration: {e}"));
                out.detail(format!("File: {}", config_path.display()));
            }
            return Ok(());
        }
    };

    info!(config_path = %config_path.display(), "Validating configuration");
    let errors = config.validate();

    if out.is_json() {
        let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        out.json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": config_path.display().to_string(),
            "errors": error_strings,
        }))?;
    } else if errors.is_empty() {
        out.success("Configuration is valid");
        out.detail(format!("File: {}", config_path.display()));
    } else {
        out.error(format!("Configuration has {}:", count(errors.len(), "error")));
        out.detail(format!("File: {}", config_path.display()));
        for error in &errors {
            out.detail(format!("  {} - {}", error.field, error.message));
        }
    }

    Ok(())
}
