//! External `exiftool` adapter

use crate::error::ToolInvocationError;
use exifprobe_domain::traits::MetadataTool;
use exifprobe_domain::{dedup_last_wins, LabelDictionary, MetadataRecord, MetadataValue};
use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Keys folded into `ImageWidth`/`ImageHeight` and never emitted themselves
const DIMENSION_KEYS: [(&str, &str); 2] = [
    ("ImageWidth", "PixelXDimension"),
    ("ImageHeight", "PixelYDimension"),
];

/// Runs `<exe> -json -n <path>` and normalizes the first JSON object
///
/// The process is started from an argument vector, never through a shell.
#[derive(Debug, Clone)]
pub struct ExifTool {
    labels: Arc<LabelDictionary>,
    default_executable: String,
    timeout: Duration,
}

impl ExifTool {
    /// Create an adapter with the given default executable and timeout
    pub fn new(
        labels: Arc<LabelDictionary>,
        default_executable: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            labels,
            default_executable: default_executable.into(),
            timeout,
        }
    }

    /// Executable used when a request carries no override
    pub fn default_executable(&self) -> &str {
        &self.default_executable
    }

    fn program<'a>(&'a self, executable: Option<&'a str>) -> &'a str {
        executable
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.default_executable.as_str())
    }
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new(LabelDictionary::standard(), "exiftool", Duration::from_secs(120))
    }
}

impl MetadataTool for ExifTool {
    type Error = ToolInvocationError;

    async fn run(
        &self,
        path: &Path,
        executable: Option<&str>,
    ) -> Result<Vec<MetadataRecord>, ToolInvocationError> {
        let program = self.program(executable).to_string();
        debug!("Running {} -json -n {}", program, path.display());

        let child = Command::new(&program)
            .arg("-json")
            .arg("-n")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolInvocationError::Spawn {
                program: program.clone(),
                source,
            })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ToolInvocationError::Timeout(self.timeout.as_secs()))??;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(ToolInvocationError::NonZeroExit {
                status: output.status.to_string(),
                stderr,
            });
        }
        if !stderr.is_empty() {
            debug!("{} diagnostics for {}: {}", program, path.display(), stderr);
        }

        parse_output(&output.stdout, &self.labels)
    }
}

/// Normalize `exiftool -json` output into records
///
/// Only the first array element is used. An empty array yields no records.
pub fn parse_output(
    stdout: &[u8],
    labels: &LabelDictionary,
) -> Result<Vec<MetadataRecord>, ToolInvocationError> {
    let parsed: Value = serde_json::from_slice(stdout)?;
    let array = parsed.as_array().ok_or_else(|| {
        ToolInvocationError::InvalidOutput("expected a JSON array".to_string())
    })?;
    let Some(first) = array.first() else {
        return Ok(Vec::new());
    };
    let object = first.as_object().ok_or_else(|| {
        ToolInvocationError::InvalidOutput("expected a JSON object".to_string())
    })?;

    let mut records = Vec::with_capacity(object.len());

    for (canonical, alternate) in DIMENSION_KEYS {
        let value = object
            .get(canonical)
            .filter(|v| !v.is_null())
            .or_else(|| object.get(alternate).filter(|v| !v.is_null()));
        if let Some(value) = value {
            records.push(labels.record(canonical, json_value(value)));
        }
    }

    for (key, value) in object {
        if value.is_null() || DIMENSION_KEYS.iter().any(|(a, b)| key == a || key == b) {
            continue;
        }
        records.push(labels.record(key.as_str(), json_value(value)));
    }

    Ok(dedup_last_wins(records))
}

fn json_value(value: &Value) -> MetadataValue {
    match value {
        Value::String(s) => MetadataValue::Text(s.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => MetadataValue::Integer(i),
            (None, Some(f)) => MetadataValue::Float(f),
            (None, None) => MetadataValue::Text(n.to_string()),
        },
        other => MetadataValue::Text(other.to_string()),
    }
}
