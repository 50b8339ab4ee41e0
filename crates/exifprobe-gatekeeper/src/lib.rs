//! exifprobe Gatekeeper
//!
//! Decides which filesystem paths the extraction pipeline may touch.
//!
//! The Gatekeeper provides:
//! - Path safety checks (absolute, no traversal, no shell metacharacters)
//! - Target resolution (exists, file or directory)
//! - Executable validation for the external metadata tool
//!
//! # Examples
//!
//! ```no_run
//! use exifprobe_gatekeeper::{PathGatekeeper, TargetKind};
//!
//! # async fn example() -> Result<(), exifprobe_gatekeeper::ValidationError> {
//! let gatekeeper = PathGatekeeper::default_config();
//!
//! let target = gatekeeper.resolve("/photos/2024").await?;
//! if target.kind == TargetKind::Directory {
//!     // walk it
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod validator;
mod error;
mod config;

pub use validator::{PathGatekeeper, RejectionReason, Target, TargetKind};
pub use error::ValidationError;
pub use config::{ValidationConfig, DEFAULT_BLOCKED_PATTERNS};
