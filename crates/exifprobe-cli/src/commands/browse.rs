//! Browse command implementation.

use super::absolute;
use crate::cli::BrowseArgs;
use crate::error::Result;
use crate::output::Formatter;
use exifprobe_gatekeeper::PathGatekeeper;
use exifprobe_extractor::list_directory;

/// Execute the browse command.
pub async fn execute_browse(args: BrowseArgs, formatter: &Formatter) -> Result<()> {
    let requested = args.dir.unwrap_or_else(|| "/".to_string());
    let dir = PathGatekeeper::default()
        .resolve_directory(&absolute(&requested)?)
        .await?;

    let items = list_directory(&dir).await?;

    eprintln!("{}", formatter.info(&dir.display().to_string()));
    println!("{}", formatter.format_listing(&items)?);

    Ok(())
}
