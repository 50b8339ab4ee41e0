//! exifprobe Domain Layer
//!
//! This crate contains the value types shared by every part of exifprobe:
//! the canonical metadata record, the tagged extraction outcome, the per-file
//! batch result, file classification and the label dictionary. It depends on
//! `serde` only, since these types are also the wire format.
//!
//! ## Key Concepts
//!
//! - **MetadataRecord**: one `(name, value, description)` field of a file
//! - **ExtractionOutcome**: which strategy produced the records, or why none did
//! - **FileResult**: the batch unit returned for each file of a query
//! - **Classification**: RAW, standard image, or unsupported, by extension
//! - **LabelDictionary**: the one shared table of field descriptions
//!
//! ## Architecture
//!
//! - Pure data and lookups only, no I/O
//! - Adapter traits ([`traits::MetadataParser`], [`traits::MetadataTool`])
//!   are defined here and implemented in `exifprobe-extractor`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classification;
pub mod labels;
pub mod outcome;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use classification::{Classification, RAW_EXTENSIONS, STANDARD_EXTENSIONS};
pub use labels::{LabelDictionary, COMMON_PROPERTIES};
pub use outcome::{
    ExtractionOutcome, ExtractionStatus, FallbackReason, FileResult, Strategy,
    STATUS_RECORD_NAME,
};
pub use record::{dedup_last_wins, MetadataRecord, MetadataValue};
pub use traits::ToolConfig;
