//! exifprobe Router binary
//!
//! Starts the HTTP server for metadata queries and directory browsing.

use exifprobe_router::{config::RouterConfig, start_server, RouterError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), RouterError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        RouterConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        RouterConfig::default_config()
    };

    // Environment wins over the file
    let config = config.with_env_overrides()?;

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("exifprobe Router - EXIF metadata HTTP service");
    println!();
    println!("USAGE:");
    println!("    exifprobe-router [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    exifprobe-router --config config/router.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default '127.0.0.1')");
    println!("    - bind_port: Port number (default 3000)");
    println!("    - allowed_origins: CORS origins (default [\"*\"])");
    println!("    - static_dir: Directory with the web UI to serve");
    println!("    - [extractor]: default_executable, tool_timeout_secs, blob_limit");
    println!();
    println!("ENVIRONMENT:");
    println!("    PORT, ALLOWED_ORIGINS (comma separated), STATIC_DIR override the file");
    println!("    RUST_LOG sets the log filter (default 'info')");
    println!();
}
