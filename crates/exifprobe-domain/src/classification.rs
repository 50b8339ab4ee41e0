//! Classification module - which extraction route a file takes

use std::path::Path;

/// Camera RAW extensions, lowercase and without the dot
pub const RAW_EXTENSIONS: &[&str] = &[
    "cr2", "cr3", "nef", "raw", "arw", "sr2", "srf", "rw2", "pef", "orf", "raf", "dng", "dcr",
    "k25", "kdc", "mrw", "x3f",
];

/// Common image extensions with embedded metadata containers
pub const STANDARD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "heic"];

/// File classification, computed from the lowercased extension only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Proprietary sensor data; only the external tool can read it
    RawFormat,

    /// Standard image; the in-process parser is tried first
    StandardImage,

    /// Not an image this system handles
    Unsupported,
}

impl Classification {
    /// Classify a path by its extension
    ///
    /// # Examples
    ///
    /// ```
    /// use exifprobe_domain::Classification;
    /// use std::path::Path;
    ///
    /// assert_eq!(Classification::of(Path::new("/a/IMG_0001.CR2")), Classification::RawFormat);
    /// assert_eq!(Classification::of(Path::new("/a/photo.jpg")), Classification::StandardImage);
    /// assert_eq!(Classification::of(Path::new("/a/notes.txt")), Classification::Unsupported);
    /// ```
    pub fn of(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Classification::Unsupported)
    }

    /// Classify a bare extension (without the dot, any case)
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        if RAW_EXTENSIONS.contains(&ext.as_str()) {
            Classification::RawFormat
        } else if STANDARD_EXTENSIONS.contains(&ext.as_str()) {
            Classification::StandardImage
        } else {
            Classification::Unsupported
        }
    }

    /// Whether the file should be processed at all
    pub fn is_supported(&self) -> bool {
        !matches!(self, Classification::Unsupported)
    }

    /// Get the classification name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::RawFormat => "raw-format",
            Classification::StandardImage => "standard-image",
            Classification::Unsupported => "unsupported",
        }
    }
}
