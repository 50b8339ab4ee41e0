//! Config command implementation.

use crate::cli::{CliFormat, ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command, saving changes to `path`.
pub async fn execute_config(
    args: ConfigArgs,
    config: &mut Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, path),
        ConfigAction::SetExiftool { executable } => {
            set_exiftool(config, path, executable, formatter)
        }
        ConfigAction::SetFormat { format } => set_format(config, path, format, formatter),
    }
}

/// Show current settings.
fn show_config(config: &Config, path: &Path) -> Result<()> {
    println!("Config file: {}", path.display());
    println!("  Format: {}", config.settings.format.as_str());
    println!("  Color: {}", config.settings.color);
    println!("  exiftool: {}", config.extractor.default_executable);
    println!("  Tool timeout: {}s", config.extractor.tool_timeout_secs);
    println!("  Blob limit: {} bytes", config.extractor.blob_limit);
    Ok(())
}

/// Set the default exiftool executable.
fn set_exiftool(
    config: &mut Config,
    path: &Path,
    executable: String,
    formatter: &Formatter,
) -> Result<()> {
    let executable = executable.trim();
    if executable.is_empty() {
        return Err(CliError::InvalidInput(
            "exiftool path must not be empty".to_string(),
        ));
    }

    config.extractor.default_executable = executable.to_string();
    config.save_to(path)?;

    println!(
        "{}",
        formatter.success(&format!("Default exiftool set to '{}'", executable))
    );
    Ok(())
}

/// Set the default output format.
fn set_format(
    config: &mut Config,
    path: &Path,
    format: CliFormat,
    formatter: &Formatter,
) -> Result<()> {
    config.settings.format = format.into();
    config.save_to(path)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Default format set to '{}'",
            config.settings.format.as_str()
        ))
    );
    Ok(())
}
