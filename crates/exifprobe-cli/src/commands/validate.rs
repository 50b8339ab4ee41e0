//! Validate-tool command implementation.

use super::absolute;
use crate::cli::ValidateToolArgs;
use crate::error::Result;
use crate::output::Formatter;
use exifprobe_gatekeeper::PathGatekeeper;

/// Execute the validate-tool command.
pub async fn execute_validate_tool(args: ValidateToolArgs, formatter: &Formatter) -> Result<()> {
    let path = PathGatekeeper::default()
        .validate_executable(&absolute(&args.executable)?)
        .await?;

    println!(
        "{}",
        formatter.success(&format!("{} is a usable exiftool executable", path.display()))
    );
    Ok(())
}
