//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// exifprobe CLI - Read EXIF metadata from images and RAW files.
#[derive(Debug, Parser)]
#[command(name = "exifprobe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract metadata from a file or every file in a directory
    Query(QueryArgs),

    /// List a directory
    Browse(BrowseArgs),

    /// Check that a path is a usable exiftool executable
    ValidateTool(ValidateToolArgs),

    /// Show or change saved settings
    Config(ConfigArgs),
}

/// Arguments for the query command.
#[derive(Debug, Parser)]
pub struct QueryArgs {
    /// Image file or directory
    pub path: String,

    /// exiftool executable to use for this run
    #[arg(short, long)]
    pub exiftool: Option<String>,

    /// Properties to show (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub props: Vec<String>,

    /// Also write a timestamped CSV file to the current directory
    #[arg(long)]
    pub export: bool,
}

/// Arguments for the browse command.
#[derive(Debug, Parser)]
pub struct BrowseArgs {
    /// Directory to list (defaults to /)
    pub dir: Option<String>,
}

/// Arguments for the validate-tool command.
#[derive(Debug, Parser)]
pub struct ValidateToolArgs {
    /// Path to the exiftool executable
    pub executable: String,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show current settings
    Show,

    /// Set the default exiftool executable
    SetExiftool {
        /// Path to the executable
        executable: String,
    },

    /// Set the default output format
    SetFormat {
        /// Output format
        #[arg(value_enum)]
        format: CliFormat,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Csv => crate::config::OutputFormat::Csv,
        }
    }
}
