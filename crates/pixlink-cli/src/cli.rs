//! Command-line interface definitions and parsing

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the advertised/matched device name
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the central role: discover, connect, exchange
    Central,
    /// Run the peripheral role: advertise, accept, exchange
    Peripheral,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_role_and_overrides() {
        let cli = Cli::parse_from(["pixlink", "--verbose", "--name", "bench-panel", "central"]);
        assert!(cli.verbose);
        assert_eq!(cli.name.as_deref(), Some("bench-panel"));
        assert!(matches!(cli.command, Commands::Central));
    }
}
