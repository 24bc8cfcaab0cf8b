//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Cutter - a small URL shortener with GitHub login
#[derive(Parser)]
#[command(name = "cutter")]
#[command(version)]
#[command(about = "A small URL shortener with GitHub login", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Block a link permanently; it answers 410 Gone from then on
    BlockLink {
        /// Link name
        name: String,
    },

    /// Block a user account
    BlockUser {
        /// User id (the GitHub account id)
        id: u32,
    },

    /// Grant the admin role to a user
    GrantAdmin {
        /// User id (the GitHub account id)
        id: u32,
    },

    /// List the links owned by a user, newest first
    Links {
        /// Owner user id
        user_id: u32,
    },

    /// Generate example configuration file
    GenerateConfig {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["cutter"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["cutter", "block-link", "abc123"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::BlockLink {
                name: "abc123".to_string()
            })
        );

        let cli = Cli::try_parse_from(["cutter", "grant-admin", "42"]).unwrap();
        assert_eq!(cli.command, Some(Commands::GrantAdmin { id: 42 }));

        let cli = Cli::try_parse_from(["cutter", "generate-config", "--force"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::GenerateConfig {
                output_path: None,
                force: true
            })
        );
    }

    #[test]
    fn test_rejects_non_numeric_user_id() {
        assert!(Cli::try_parse_from(["cutter", "block-user", "octocat"]).is_err());
    }
}
