//! Error types for the Extractor

use thiserror::Error;

/// Errors from the in-process fast parser
///
/// Never surfaced to callers: the orchestrator recovers by falling back to the
/// external tool.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The buffer is a recognized container without embedded metadata
    #[error("no EXIF data found")]
    NoMetadata,

    /// The buffer is not a recognized container or the metadata is corrupt
    #[error("exif-parser error: {0}")]
    Invalid(String),
}

impl From<exif::Error> for ParseError {
    fn from(e: exif::Error) -> Self {
        match e {
            exif::Error::NotFound(_) => ParseError::NoMetadata,
            other => ParseError::Invalid(other.to_string()),
        }
    }
}

/// Errors from running the external metadata tool
#[derive(Error, Debug)]
pub enum ToolInvocationError {
    /// The executable could not be launched
    #[error("ExifTool error: failed to launch '{program}': {source}")]
    Spawn {
        /// Executable that was attempted
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully
    #[error("ExifTool error: exited with {status}: {stderr}")]
    NonZeroExit {
        /// Exit status description
        status: String,
        /// Captured diagnostics
        stderr: String,
    },

    /// The process did not finish in time and was killed
    #[error("ExifTool error: timed out after {0}s")]
    Timeout(u64),

    /// Waiting on the process failed
    #[error("ExifTool error: {0}")]
    Io(#[from] std::io::Error),

    /// Stdout was not the expected JSON shape
    #[error("Failed to parse ExifTool JSON: {0}")]
    InvalidOutput(String),
}

impl From<serde_json::Error> for ToolInvocationError {
    fn from(e: serde_json::Error) -> Self {
        ToolInvocationError::InvalidOutput(e.to_string())
    }
}
