//! Command implementations.

pub mod browse;
pub mod query;
pub mod settings;
pub mod validate;

pub use self::browse::execute_browse;
pub use self::query::execute_query;
pub use self::settings::execute_config;
pub use self::validate::execute_validate_tool;

use crate::error::{CliError, Result};

/// Resolve a command-line path against the working directory.
///
/// Blank input is passed through so validation reports it as missing.
pub(crate) fn absolute(path: &str) -> Result<String> {
    if path.trim().is_empty() {
        return Ok(String::new());
    }

    std::path::absolute(path)?
        .into_os_string()
        .into_string()
        .map_err(|p| CliError::InvalidInput(format!("{} is not valid UTF-8", p.to_string_lossy())))
}
