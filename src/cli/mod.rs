//! CLI argument parsing and command routing

use clap::{Parser, Subcommand};

/// rillchat: streaming chat in the terminal
#[derive(Debug, Parser)]
#[command(name = "rillchat")]
#[command(about = "Streaming chat client for a hosted model endpoint", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the interactive chat TUI (default)
    Chat,

    /// Ask a single question and print the reply
    Ask {
        /// The question to send
        text: String,

        /// Also print the reasoning trace to stderr as it streams
        #[arg(long)]
        show_reasoning: bool,
    },

    /// Manage configuration
    Config {
        /// Get a config value
        #[arg(long)]
        get: Option<String>,

        /// Set a config value
        #[arg(long, requires = "value")]
        set: Option<String>,

        /// Value to set (used with --set)
        #[arg(long)]
        value: Option<String>,

        /// List all config values
        #[arg(long)]
        list: bool,
    },

    /// Show version information
    Version,
}

impl Cli {
    /// Parse CLI arguments from environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["rillchat", "ask", "hello there"]);
        match cli.command {
            Some(Commands::Ask {
                text,
                show_reasoning,
            }) => {
                assert_eq!(text, "hello there");
                assert!(!show_reasoning);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::parse_from([
            "rillchat", "config", "--set", "base_url", "--value", "http://x",
        ]);
        match cli.command {
            Some(Commands::Config { set, value, .. }) => {
                assert_eq!(set.as_deref(), Some("base_url"));
                assert_eq!(value.as_deref(), Some("http://x"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
