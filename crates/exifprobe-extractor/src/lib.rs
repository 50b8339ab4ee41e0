//! exifprobe Extractor
//!
//! Turns image files into canonical metadata records.
//!
//! # Overview
//!
//! Two extraction strategies feed one record format. Standard images
//! (JPEG, PNG, TIFF, HEIC) are decoded in-process with kamadak-exif; RAW
//! camera files, and anything the fast parser cannot read, go to the external
//! `exiftool` executable. Both outputs are normalized into
//! [`MetadataRecord`](exifprobe_domain::MetadataRecord) lists labelled from
//! the shared dictionary, and every list ends with one `ExtractionStatus`
//! record.
//!
//! # Architecture
//!
//! ```text
//! Path → Classification → ExifParser ──(fails)──→ ExifTool
//!                               ↓                     ↓
//!                        records / BasicFileInfo + ExtractionStatus
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use exifprobe_extractor::{DefaultExtractor, ExtractorConfig};
//! use exifprobe_domain::ToolConfig;
//! use std::path::Path;
//!
//! # async fn example() {
//! let extractor = DefaultExtractor::from_config(ExtractorConfig::default());
//!
//! let records = extractor
//!     .extract(Path::new("/photos/IMG_0001.jpg"), &ToolConfig::default())
//!     .await;
//!
//! for record in &records {
//!     println!("{} ({}) = {}", record.name, record.description, record.value);
//! }
//! # }
//! ```

#![warn(missing_docs)]

mod basic;
mod config;
mod error;
mod extractor;
mod fast;
mod listing;
mod tool;

#[cfg(test)]
mod fixtures;

pub use basic::basic_file_info;
pub use config::ExtractorConfig;
pub use error::{ParseError, ToolInvocationError};
pub use extractor::{DefaultExtractor, Extractor, NOT_A_REGULAR_FILE, UNSUPPORTED_FORMAT};
pub use fast::ExifParser;
pub use listing::{export_filename, list_directory, DirectoryItem};
pub use tool::{parse_output, ExifTool};
