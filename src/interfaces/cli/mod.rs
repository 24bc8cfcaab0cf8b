//! CLI interface module
//!
//! Administrative subcommands that operate directly on the database.

pub mod commands;

use crate::cli::Commands;
use crate::runtime::lifetime::startup::prepare_cli_startup;
use commands::{block_link, block_user, config_generate, grant_admin, list_user_links};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::CutterError> for CliError {
    fn from(err: crate::errors::CutterError) -> Self {
        CliError::CommandError(err.format_simple())
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate doesn't need DB connection
    if let Commands::GenerateConfig { output_path, force } = cmd {
        return config_generate(output_path, force).await;
    }

    let ctx = prepare_cli_startup()
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))?;

    match cmd {
        Commands::BlockLink { name } => block_link(&ctx.link_service, &name).await,
        Commands::BlockUser { id } => block_user(&ctx.user_service, id).await,
        Commands::GrantAdmin { id } => grant_admin(&ctx.user_service, id).await,
        Commands::Links { user_id } => list_user_links(&ctx.link_service, user_id).await,
        Commands::Serve => unreachable!("server mode handled in main"),
        Commands::GenerateConfig { .. } => unreachable!("handled above"),
    }
}
