//! Gatekeeper error types

use thiserror::Error;

/// Errors returned when a path cannot be operated on
///
/// The display strings are the caller-facing messages.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// No path was supplied
    #[error("Path is required")]
    MissingPath,

    /// The path failed the safety rules
    #[error("Invalid path")]
    Unsafe(crate::RejectionReason),

    /// Nothing exists at the path
    #[error("Path not found")]
    NotFound(String),

    /// The path exists but is neither a regular file nor a directory
    #[error("Path is not a file or directory")]
    NotFileOrDirectory(String),

    /// A directory was required
    #[error("Path is not a directory")]
    NotADirectory(String),

    /// A regular file was required
    #[error("Path is not a file")]
    NotAFile(String),

    /// The file exists but can be neither executed nor read
    #[error("File is not accessible")]
    NotAccessible(String),
}
