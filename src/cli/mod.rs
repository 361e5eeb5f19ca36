//! Command-line interface for Nimbus.

use clap::{Parser, Subcommand};

/// Nimbus - weather, saved cities and chat behind one small API
#[derive(Parser)]
#[command(name = "nimbus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "s")]
    Serve,

    /// Create a default config.toml in the current directory
    Init,

    /// Load and validate configuration, then exit
    CheckConfig,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::parse_from(["nimbus"]);
        assert_eq!(cli.command(), &Commands::Serve);
    }

    #[test]
    fn parses_subcommands() {
        assert_eq!(Cli::parse_from(["nimbus", "init"]).command(), &Commands::Init);
        assert_eq!(
            Cli::parse_from(["nimbus", "check-config"]).command(),
            &Commands::CheckConfig
        );
        assert_eq!(Cli::parse_from(["nimbus", "s"]).command(), &Commands::Serve);
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["nimbus", "frobnicate"]).is_err());
    }
}
