//! Directory listing for path pickers and export naming

use chrono::{DateTime, Utc};
use exifprobe_gatekeeper::TargetKind;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io;
use std::path::Path;
use tracing::debug;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryItem {
    /// Entry name (`..` for the parent link)
    pub name: String,
    /// Absolute path of the entry
    pub path: String,
    /// Whether the entry is a directory
    pub is_directory: bool,
    /// Size in bytes
    pub size: u64,
    /// Modification time in milliseconds since the epoch
    pub mtime: i64,
}

impl DirectoryItem {
    fn parent_of(dir: &Path) -> Option<Self> {
        let parent = dir.parent()?;
        Some(DirectoryItem {
            name: "..".to_string(),
            path: parent.display().to_string(),
            is_directory: true,
            size: 0,
            mtime: 0,
        })
    }
}

/// List the immediate children of `dir`
///
/// Entries that cannot be stat'd are skipped. Directories sort before files,
/// then by name; a `..` entry leads the list unless `dir` is the root.
pub async fn list_directory(dir: &Path) -> io::Result<Vec<DirectoryItem>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut items = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let mtime = metadata
            .modified()
            .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
            .unwrap_or(0);

        items.push(DirectoryItem {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: path.display().to_string(),
            is_directory: metadata.is_dir(),
            size: metadata.len(),
            mtime,
        });
    }

    items.sort_by(compare);

    if let Some(parent) = DirectoryItem::parent_of(dir) {
        items.insert(0, parent);
    }

    Ok(items)
}

/// Base name for exported results: the directory name or the file stem
pub fn export_filename(path: &Path, kind: TargetKind) -> String {
    let name = match kind {
        TargetKind::Directory => path.file_name(),
        TargetKind::File => path.file_stem(),
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "exif-data".to_string())
}

fn compare(a: &DirectoryItem, b: &DirectoryItem) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(items: &[DirectoryItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_directories_first_then_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("A.png"), b"xyz").unwrap();
        std::fs::create_dir(dir.path().join("zeta")).unwrap();
        std::fs::create_dir(dir.path().join("Alpha")).unwrap();

        let items = list_directory(dir.path()).await.unwrap();

        assert_eq!(names(&items), vec!["..", "Alpha", "zeta", "A.png", "b.jpg"]);

        let parent = &items[0];
        assert!(parent.is_directory);
        assert_eq!(parent.size, 0);
        assert_eq!(parent.mtime, 0);
        assert_eq!(
            parent.path,
            dir.path().parent().unwrap().display().to_string()
        );

        let png = &items[3];
        assert!(!png.is_directory);
        assert_eq!(png.size, 3);
        assert!(png.mtime > 0);
        assert_eq!(png.path, dir.path().join("A.png").display().to_string());
    }

    #[tokio::test]
    async fn test_root_has_no_parent_entry() {
        let items = list_directory(Path::new("/")).await.unwrap();
        assert!(items.iter().all(|i| i.name != ".."));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("keep.jpg"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("broken")).unwrap();

        let items = list_directory(dir.path()).await.unwrap();

        assert_eq!(names(&items), vec!["..", "keep.jpg"]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(list_directory(&dir.path().join("nope")).await.is_err());
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename(Path::new("/photos/trip/IMG_1.jpg"), TargetKind::File),
            "IMG_1"
        );
        assert_eq!(
            export_filename(Path::new("/photos/trip"), TargetKind::Directory),
            "trip"
        );
        assert_eq!(export_filename(Path::new("/"), TargetKind::Directory), "exif-data");
    }

    #[test]
    fn test_wire_format() {
        let item = DirectoryItem {
            name: "a.jpg".to_string(),
            path: "/p/a.jpg".to_string(),
            is_directory: false,
            size: 10,
            mtime: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["isDirectory"], false);
        assert_eq!(json["mtime"], 1_700_000_000_000_i64);
    }
}
