//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! the things it drives. Implementations live in `exifprobe-extractor`.

use crate::MetadataRecord;
use std::future::Future;
use std::path::Path;

/// In-process decoder for embedded metadata
///
/// Implemented by the infrastructure layer (exifprobe-extractor)
pub trait MetadataParser {
    /// Error type for parse failures
    type Error;

    /// Decode the metadata embedded in a file's bytes
    fn parse(&self, bytes: &[u8]) -> Result<Vec<MetadataRecord>, Self::Error>;
}

/// Out-of-process metadata extraction executable
///
/// Implemented by the infrastructure layer (exifprobe-extractor)
pub trait MetadataTool {
    /// Error type for invocation failures
    type Error;

    /// Run the tool against `path`, optionally overriding the executable
    fn run(
        &self,
        path: &Path,
        executable: Option<&str>,
    ) -> impl Future<Output = Result<Vec<MetadataRecord>, Self::Error>> + Send;
}

/// Per-request settings for the external tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolConfig {
    /// Executable to run instead of the configured default
    pub executable: Option<String>,
}

impl ToolConfig {
    /// Config with an executable override
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: Some(executable.into()),
        }
    }

    /// Trimmed override, or `None` if absent or blank
    pub fn executable(&self) -> Option<&str> {
        self.executable
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
