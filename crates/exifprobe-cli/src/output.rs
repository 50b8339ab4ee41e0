//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use chrono::{DateTime, Local};
use colored::*;
use exifprobe_domain::{FileResult, LabelDictionary};
use exifprobe_extractor::DirectoryItem;
use std::sync::Arc;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// First CSV column header
pub const CSV_FILE_COLUMN: &str = "文件名";

/// Placeholder for a property a file does not have
pub const MISSING_VALUE: &str = "-";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
    labels: Arc<LabelDictionary>,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
            labels: LabelDictionary::standard(),
        }
    }

    /// Format query results.
    ///
    /// `props` selects and orders the columns; when empty, tables show every
    /// record and CSV uses the common property set.
    pub fn format_results(&self, results: &[FileResult], props: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
            OutputFormat::Table => Ok(self.format_results_table(results, props)),
            OutputFormat::Csv => self.results_csv(results, props),
        }
    }

    /// Render results as CSV regardless of the configured format.
    pub fn results_csv(&self, results: &[FileResult], props: &[String]) -> Result<String> {
        let props: Vec<&str> = if props.is_empty() {
            exifprobe_domain::COMMON_PROPERTIES.to_vec()
        } else {
            props.iter().map(String::as_str).collect()
        };

        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec![CSV_FILE_COLUMN];
        header.extend(props.iter().map(|p| self.label(p)));
        writer.write_record(&header)?;

        for result in results {
            let mut row = vec![result.file_name.clone()];
            row.extend(props.iter().map(|p| {
                result
                    .get(p)
                    .map(|r| r.value.to_string())
                    .unwrap_or_else(|| MISSING_VALUE.to_string())
            }));
            writer.write_record(&row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| CliError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| CliError::InvalidInput(e.to_string()))
    }

    fn format_results_table(&self, results: &[FileResult], props: &[String]) -> String {
        if results.is_empty() {
            return self.colorize("No files found.", "yellow");
        }

        let mut sections = Vec::with_capacity(results.len());
        for result in results {
            let title = self.colorize(&result.file_name, "cyan");

            if !result.success {
                let reason = result.error.as_deref().unwrap_or("unknown error");
                sections.push(format!("{}\n{}", title, self.error(reason)));
                continue;
            }

            let mut builder = Builder::default();
            builder.push_record(["Property", "Description", "Value"]);

            if props.is_empty() {
                for record in &result.exif_data {
                    builder.push_record([
                        record.name.clone(),
                        record.description.clone(),
                        record.value.to_string(),
                    ]);
                }
            } else {
                for prop in props {
                    let value = result
                        .get(prop)
                        .map(|r| r.value.to_string())
                        .unwrap_or_else(|| MISSING_VALUE.to_string());
                    builder.push_record([prop.clone(), self.labels.describe(prop).to_string(), value]);
                }
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));

            sections.push(format!("{}\n{}", title, table));
        }

        sections.join("\n\n")
    }

    /// Format a directory listing.
    pub fn format_listing(&self, items: &[DirectoryItem]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for item in items {
                    writer.serialize(item)?;
                }
                let bytes = writer
                    .into_inner()
                    .map_err(|e| CliError::Io(e.into_error()))?;
                String::from_utf8(bytes).map_err(|e| CliError::InvalidInput(e.to_string()))
            }
            OutputFormat::Table => Ok(self.format_listing_table(items)),
        }
    }

    fn format_listing_table(&self, items: &[DirectoryItem]) -> String {
        if items.is_empty() {
            return self.colorize("Directory is empty.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Type", "Name", "Size", "Modified"]);

        for item in items {
            let (kind, name) = if item.is_directory {
                ("DIR", self.colorize(&item.name, "blue"))
            } else {
                ("FILE", item.name.clone())
            };
            let size = if item.is_directory {
                String::new()
            } else {
                human_size(item.size)
            };
            let modified = DateTime::from_timestamp_millis(item.mtime)
                .filter(|_| item.mtime > 0)
                .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();

            builder.push_record([kind.to_string(), name, size, modified]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn label<'a>(&'a self, prop: &'a str) -> &'a str {
        match self.labels.describe(prop) {
            "" => prop,
            label => label,
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Size with a binary unit, e.g. `2.50 MB`
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}
