//! Path validation logic

use crate::{ValidationConfig, ValidationError};
use std::fmt;
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Reasons a path is rejected as unsafe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Empty path
    Empty,

    /// Embedded NUL byte
    NulByte,

    /// ASCII control character
    ControlCharacter,

    /// Parent-directory traversal (`..`)
    ParentTraversal,

    /// Relative path where an absolute one is required
    NotAbsolute,

    /// A blocked shell metacharacter sequence
    BlockedPattern(String),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Empty => f.write_str("path is empty"),
            RejectionReason::NulByte => f.write_str("path contains a NUL byte"),
            RejectionReason::ControlCharacter => f.write_str("path contains a control character"),
            RejectionReason::ParentTraversal => f.write_str("path contains '..'"),
            RejectionReason::NotAbsolute => f.write_str("path is not absolute"),
            RejectionReason::BlockedPattern(p) => write!(f, "path contains '{}'", p),
        }
    }
}

/// What a validated path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A regular file
    File,

    /// A directory
    Directory,
}

/// A path that passed validation and exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// The validated path
    pub path: PathBuf,

    /// File or directory
    pub kind: TargetKind,
}

/// The Gatekeeper decides which filesystem paths may be operated on
///
/// Everything downstream (orchestrator, walker, external tool) trusts that
/// its input passed through here and does not re-validate.
#[derive(Debug, Clone)]
pub struct PathGatekeeper {
    config: ValidationConfig,
}

impl PathGatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Whether the path passes every safety rule
    ///
    /// # Examples
    ///
    /// ```
    /// use exifprobe_gatekeeper::PathGatekeeper;
    ///
    /// let gatekeeper = PathGatekeeper::default_config();
    /// assert!(gatekeeper.is_safe("/photos/2024/IMG_0001.jpg"));
    /// assert!(!gatekeeper.is_safe("/photos/../etc/passwd"));
    /// assert!(!gatekeeper.is_safe("photos/IMG_0001.jpg"));
    /// assert!(!gatekeeper.is_safe("/photos/$(reboot).jpg"));
    /// ```
    pub fn is_safe(&self, path: &str) -> bool {
        self.check(path).is_ok()
    }

    /// Check the safety rules, reporting the first one violated
    pub fn check(&self, path: &str) -> Result<(), RejectionReason> {
        if path.is_empty() {
            return Err(RejectionReason::Empty);
        }

        if path.contains('\0') {
            return Err(RejectionReason::NulByte);
        }

        if self.config.reject_control_chars && path.chars().any(|c| c.is_ascii_control()) {
            return Err(RejectionReason::ControlCharacter);
        }

        if self.config.reject_parent_segments
            && Path::new(path)
                .components()
                .any(|c| c == Component::ParentDir)
        {
            return Err(RejectionReason::ParentTraversal);
        }

        if self.config.reject_dot_dot_substring && path.contains("..") {
            return Err(RejectionReason::ParentTraversal);
        }

        if self.config.require_absolute && !Path::new(path).is_absolute() {
            return Err(RejectionReason::NotAbsolute);
        }

        if let Some(pattern) = self
            .config
            .blocked_patterns
            .iter()
            .find(|p| path.contains(p.as_str()))
        {
            return Err(RejectionReason::BlockedPattern(pattern.clone()));
        }

        Ok(())
    }

    /// Check an executable override, which may be a bare command name
    ///
    /// Only NUL bytes and the blocked patterns (plus control characters in
    /// strict mode) are rejected. The command is spawned from an argument
    /// vector, so relative names and `..` are left to the OS.
    pub fn check_command(&self, command: &str) -> Result<(), RejectionReason> {
        let rules = ValidationConfig {
            require_absolute: false,
            reject_parent_segments: false,
            reject_dot_dot_substring: false,
            ..self.config.clone()
        };
        Self::new(rules).check(command)
    }

    /// Validate a path and determine whether it is a file or a directory
    pub async fn resolve(&self, path: &str) -> Result<Target, ValidationError> {
        let path = self.require_safe(path)?;
        let metadata = stat(&path).await?;

        let kind = if metadata.is_file() {
            TargetKind::File
        } else if metadata.is_dir() {
            TargetKind::Directory
        } else {
            return Err(ValidationError::NotFileOrDirectory(display(&path)));
        };

        Ok(Target { path, kind })
    }

    /// Validate a path that must be an existing directory
    pub async fn resolve_directory(&self, path: &str) -> Result<PathBuf, ValidationError> {
        let path = self.require_safe(path)?;
        let metadata = stat(&path).await?;

        if !metadata.is_dir() {
            return Err(ValidationError::NotADirectory(display(&path)));
        }

        Ok(path)
    }

    /// Validate a path that must be a usable metadata executable
    ///
    /// The file must exist, be a regular file, and be executable; where the
    /// executable bit is unavailable or unset it must at least be readable.
    pub async fn validate_executable(&self, path: &str) -> Result<PathBuf, ValidationError> {
        let path = self.require_safe(path)?;
        let metadata = stat(&path).await?;

        if !metadata.is_file() {
            return Err(ValidationError::NotAFile(display(&path)));
        }

        if !is_executable(&metadata) {
            debug!("{} is not executable, checking readability", path.display());
            tokio::fs::File::open(&path)
                .await
                .map_err(|_| ValidationError::NotAccessible(display(&path)))?;
        }

        Ok(path)
    }

    fn require_safe(&self, path: &str) -> Result<PathBuf, ValidationError> {
        match self.check(path) {
            Ok(()) => Ok(PathBuf::from(path)),
            Err(RejectionReason::Empty) => Err(ValidationError::MissingPath),
            Err(reason) => {
                debug!("Rejected path {:?}: {}", path, reason);
                Err(ValidationError::Unsafe(reason))
            }
        }
    }
}

impl Default for PathGatekeeper {
    fn default() -> Self {
        Self::default_config()
    }
}

async fn stat(path: &Path) -> Result<Metadata, ValidationError> {
    tokio::fs::metadata(path)
        .await
        .map_err(|_| ValidationError::NotFound(display(path)))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(unix)]
fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &Metadata) -> bool {
    false
}
