//! Outcome module - how an extraction ended and what the caller sees

use crate::record::MetadataRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the synthetic status record appended to every outcome
pub const STATUS_RECORD_NAME: &str = "ExtractionStatus";

/// Extraction strategy responsible for a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// In-process embedded metadata parser
    FastParser,

    /// External metadata executable
    ExternalTool,
}

impl Strategy {
    /// Get the strategy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::FastParser => "exif-parser",
            Strategy::ExternalTool => "exiftool",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the status record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionStatus {
    /// The chosen adapter returned at least one record
    Success,

    /// The adapter ran but found nothing; basic file info was substituted
    Failed,

    /// Every attempted adapter failed; basic file info was substituted
    Error,
}

impl ExtractionStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Success => "Success",
            ExtractionStatus::Failed => "Failed",
            ExtractionStatus::Error => "Error",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Success" => Some(ExtractionStatus::Success),
            "Failed" => Some(ExtractionStatus::Failed),
            "Error" => Some(ExtractionStatus::Error),
            _ => None,
        }
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the fallback record set was used
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The adapter ran but produced zero records
    Empty,

    /// Every attempted adapter failed; carries the last error message
    Failed(String),
}

/// Result of extracting one file
///
/// The orchestrator pattern-matches on this to pick the status label; callers
/// normally flatten it with [`ExtractionOutcome::into_records`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// The fast parser produced records
    FastParsed(Vec<MetadataRecord>),

    /// The external tool produced records
    ToolParsed(Vec<MetadataRecord>),

    /// No real metadata; `basic` holds whatever the filesystem could provide
    Fallback {
        /// Basic file info records (may be empty if stat failed too)
        basic: Vec<MetadataRecord>,
        /// Strategy that was last attempted
        strategy: Strategy,
        /// Why the fallback was used
        reason: FallbackReason,
    },
}

impl ExtractionOutcome {
    /// Status this outcome reports
    pub fn status(&self) -> ExtractionStatus {
        match self {
            ExtractionOutcome::FastParsed(_) | ExtractionOutcome::ToolParsed(_) => {
                ExtractionStatus::Success
            }
            ExtractionOutcome::Fallback {
                reason: FallbackReason::Empty,
                ..
            } => ExtractionStatus::Failed,
            ExtractionOutcome::Fallback {
                reason: FallbackReason::Failed(_),
                ..
            } => ExtractionStatus::Error,
        }
    }

    /// Strategy responsible for this outcome
    pub fn strategy(&self) -> Strategy {
        match self {
            ExtractionOutcome::FastParsed(_) => Strategy::FastParser,
            ExtractionOutcome::ToolParsed(_) => Strategy::ExternalTool,
            ExtractionOutcome::Fallback { strategy, .. } => *strategy,
        }
    }

    /// Build the trailing status record
    pub fn status_record(&self) -> MetadataRecord {
        let strategy = self.strategy();
        let description = match self {
            ExtractionOutcome::FastParsed(_) | ExtractionOutcome::ToolParsed(_) => {
                format!("{}成功提取到EXIF数据", strategy)
            }
            ExtractionOutcome::Fallback {
                reason: FallbackReason::Empty,
                ..
            } => format!("{}未能提取到EXIF数据，仅返回基本文件信息", strategy),
            ExtractionOutcome::Fallback {
                reason: FallbackReason::Failed(message),
                ..
            } => format!("{}提取失败: {}", strategy, message),
        };
        MetadataRecord::new(STATUS_RECORD_NAME, self.status().as_str(), description)
    }

    /// Flatten into the canonical record list, terminated by one status record
    ///
    /// Never empty: with no data at all the list is the status record alone.
    pub fn into_records(self) -> Vec<MetadataRecord> {
        let status = self.status_record();
        let mut records = match self {
            ExtractionOutcome::FastParsed(records) | ExtractionOutcome::ToolParsed(records) => {
                records
            }
            ExtractionOutcome::Fallback { basic, .. } => basic,
        };
        records.retain(|r| r.name != STATUS_RECORD_NAME);
        records.push(status);
        records
    }
}

/// Batch unit returned for every file of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    /// Base name of the file
    pub file_name: String,

    /// Extracted records, empty when `success` is false
    pub exif_data: Vec<MetadataRecord>,

    /// False only when the file could not be classified or opened
    pub success: bool,

    /// Reason for failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    /// A processed file
    pub fn processed(file_name: impl Into<String>, exif_data: Vec<MetadataRecord>) -> Self {
        Self {
            file_name: file_name.into(),
            exif_data,
            success: true,
            error: None,
        }
    }

    /// A file that could not be processed
    pub fn failed(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            exif_data: Vec::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Status reported by the trailing status record, if any
    pub fn status(&self) -> Option<ExtractionStatus> {
        self.exif_data
            .iter()
            .rev()
            .find(|r| r.name == STATUS_RECORD_NAME)
            .and_then(|r| r.value.as_text())
            .and_then(ExtractionStatus::parse)
    }

    /// Look up a record by name
    pub fn get(&self, name: &str) -> Option<&MetadataRecord> {
        self.exif_data.iter().find(|r| r.name == name)
    }
}
