//! Gatekeeper configuration

/// Substrings that must never appear in a path handed to the pipeline
pub const DEFAULT_BLOCKED_PATTERNS: &[&str] = &[";", "&", "|", "<", ">", "`", "$(", "${"];

/// Configuration for path validation rules
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Reject relative paths
    pub require_absolute: bool,

    /// Reject any `..` path component
    pub reject_parent_segments: bool,

    /// Reject `..` anywhere in the path, even inside a file name
    pub reject_dot_dot_substring: bool,

    /// Reject ASCII control characters (newlines, tabs, ...)
    pub reject_control_chars: bool,

    /// Substrings that make a path unsafe
    pub blocked_patterns: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_absolute: true,
            reject_parent_segments: true,
            reject_dot_dot_substring: false,
            reject_control_chars: false,
            blocked_patterns: DEFAULT_BLOCKED_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl ValidationConfig {
    /// Create a strict configuration (all checks enabled)
    pub fn strict() -> Self {
        Self {
            reject_dot_dot_substring: true,
            reject_control_chars: true,
            ..Self::default()
        }
    }
}
