//! exifprobe CLI - Read EXIF metadata from the command line.

use clap::Parser;
use exifprobe_cli::commands;
use exifprobe_cli::{Cli, Command, Config, Formatter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> exifprobe_cli::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = match cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Query(args) => commands::execute_query(args, &config, &formatter).await?,
        Command::Browse(args) => commands::execute_browse(args, &formatter).await?,
        Command::ValidateTool(args) => {
            commands::execute_validate_tool(args, &formatter).await?
        }
        Command::Config(args) => {
            commands::execute_config(args, &mut config, &config_path, &formatter).await?
        }
    }

    Ok(())
}
