//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Bind address override, e.g. `0.0.0.0:5000`
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Data root override (directory holding `boxes/` and `photos/`)
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        serve: ServeCommand,
    }

    #[test]
    fn test_serve_command_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert!(cli.serve.bind.is_none());
        assert!(cli.serve.root.is_none());
    }

    #[test]
    fn test_serve_command_overrides() {
        let cli = TestCli::parse_from(["test", "--bind", "0.0.0.0:8080", "--root", "/data"]);
        assert_eq!(cli.serve.bind.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(cli.serve.root, Some(PathBuf::from("/data")));
    }
}
