//! Filesystem-only fallback records

use chrono::{DateTime, SecondsFormat, Utc};
use exifprobe_domain::{LabelDictionary, MetadataRecord};
use std::path::Path;

/// Base name of a path, lossily converted
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `FileName`, `FileSize`, `LastModified` and `FilePath` for a file
///
/// Used when no metadata could be extracted.
pub async fn basic_file_info(
    path: &Path,
    labels: &LabelDictionary,
) -> std::io::Result<Vec<MetadataRecord>> {
    let metadata = tokio::fs::metadata(path).await?;
    let modified: DateTime<Utc> = metadata.modified()?.into();

    Ok(vec![
        labels.record("FileName", file_name(path)),
        labels.record("FileSize", format!("{:.2} KB", metadata.len() as f64 / 1024.0)),
        labels.record(
            "LastModified",
            modified.to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        labels.record("FilePath", path.display().to_string()),
    ])
}
