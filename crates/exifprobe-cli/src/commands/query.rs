//! Query command implementation.

use super::absolute;
use crate::cli::QueryArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use chrono::Local;
use exifprobe_domain::{FileResult, ToolConfig};
use exifprobe_extractor::{export_filename, DefaultExtractor};
use exifprobe_gatekeeper::PathGatekeeper;
use std::path::PathBuf;
use tracing::info;

/// Results of one query run
#[derive(Debug)]
pub struct QueryReport {
    /// One result per processed file
    pub results: Vec<FileResult>,
    /// Base name for exported files
    pub export_name: String,
}

impl QueryReport {
    /// Number of files that produced records
    pub fn processed(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}

/// Execute the query command.
pub async fn execute_query(args: QueryArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let report = run_query(&args, config).await?;

    println!("{}", formatter.format_results(&report.results, &args.props)?);

    if args.export {
        let file = export_file_name(&report.export_name);
        std::fs::write(&file, formatter.results_csv(&report.results, &args.props)?)?;
        eprintln!(
            "{}",
            formatter.success(&format!("Exported {}", file.display()))
        );
    }

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Successfully processed {} out of {} files",
            report.processed(),
            report.results.len()
        ))
    );

    Ok(())
}

/// Validate the arguments and run the extraction pipeline.
pub async fn run_query(args: &QueryArgs, config: &Config) -> Result<QueryReport> {
    let gatekeeper = PathGatekeeper::default();

    let tool_config = match args.exiftool.as_deref().map(str::trim) {
        Some(exe) if !exe.is_empty() => {
            let exe = gatekeeper.validate_executable(&absolute(exe)?).await?;
            ToolConfig::with_executable(exe.to_string_lossy())
        }
        _ => ToolConfig::default(),
    };

    let target = gatekeeper.resolve(&absolute(&args.path)?).await?;
    info!("Querying {} ({:?})", target.path.display(), target.kind);

    let extractor = DefaultExtractor::from_config(config.extractor.clone());
    let results = extractor.query(&target, &tool_config).await;

    Ok(QueryReport {
        export_name: export_filename(&target.path, target.kind),
        results,
    })
}

fn export_file_name(base: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}-{}.csv",
        base,
        Local::now().format("%Y%m%d%H%M%S")
    ))
}
