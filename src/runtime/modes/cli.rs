//! CLI mode
//!
//! Delegates to the administrative subcommands.

use crate::cli::Commands;
use crate::interfaces::cli::CliError;

pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    crate::interfaces::cli::run_cli_command(cmd).await
}
