//! framedoc
//!
//! Turns an online video into a PDF of frames sampled at a fixed interval.
//!
//! # Usage
//!
//! ```bash
//! framedoc                                   # prompts for link and interval
//! framedoc convert --url "https://..." --interval 10
//! framedoc serve --bind 0.0.0.0:5000
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use framedoc::adapters::AppConfig;
use framedoc::cli::{commands, Cli, Commands};
use framedoc::utils::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, origin) =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);

    init_logging(&config.log_level, config.json_logs);
    info!("Starting framedoc {}", env!("CARGO_PKG_VERSION"));
    origin.log();

    match cli.command {
        None | Some(Commands::Interactive) => commands::interactive(config).await,
        Some(Commands::Convert(args)) => commands::convert(config, args).await,
        Some(Commands::Serve(args)) => commands::serve(config, args).await,
    }
}
