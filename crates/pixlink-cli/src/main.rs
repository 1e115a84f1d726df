//! pixlink CLI entry point

use clap::Parser;
use tracing::info;

use pixlink_cli::{
    app,
    cli::{Cli, Commands},
    config::AppConfig,
    error::Result,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut config = load_configuration(&cli)?;
    if let Some(name) = &cli.name {
        config.link.device_name = name.clone();
    }

    match cli.command {
        Commands::Central => app::run_central(config).await,
        Commands::Peripheral => app::run_peripheral(config).await,
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from file or use defaults
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    if let Some(path) = &cli.config {
        info!("loading configuration from {path}");
        AppConfig::load_from_file(path)
    } else {
        Ok(AppConfig::default())
    }
}
