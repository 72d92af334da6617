//! Command-line interface for samba-share
//!
//! Uses clap with derive for type-safe CLI parsing. Running without a
//! subcommand starts the interactive configurator.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// samba-share - Samba/Docker share configurator for libvirt guests
#[derive(Parser)]
#[command(name = "samba-share")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Defaults file path (optional, missing file means built-in defaults)
    #[arg(short, long, default_value = "samba-share.toml")]
    pub config: PathBuf,

    /// Base directory for scripts/, configs/ and template.yml
    /// (default: the directory holding the executable)
    #[arg(short = 'C', long)]
    pub base_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Generate shell completion scripts
    pub fn generate_completion(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "samba-share", &mut std::io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_runs_interactive() {
        let cli = Cli::try_parse_from(["samba-share"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("samba-share.toml"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_flags() {
        let cli =
            Cli::try_parse_from(["samba-share", "-v", "-C", "/srv/share", "-c", "x.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.base_dir, Some(PathBuf::from("/srv/share")));
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn test_completion_subcommand() {
        let cli = Cli::try_parse_from(["samba-share", "completion", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completion { shell: Shell::Bash })
        ));
    }
}
