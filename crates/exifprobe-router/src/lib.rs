//! exifprobe Router
//!
//! HTTP boundary for the extraction pipeline: metadata queries over files and
//! directories, a directory browser for path pickers, and validation of
//! user-supplied exiftool executables.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::RouterConfig;
use exifprobe_extractor::DefaultExtractor;
use exifprobe_gatekeeper::PathGatekeeper;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Router error
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the shared state from configuration
pub fn build_state(config: &RouterConfig) -> AppState {
    AppState {
        extractor: Arc::new(DefaultExtractor::from_config(config.extractor.clone())),
        gatekeeper: Arc::new(PathGatekeeper::default()),
    }
}

/// Start the Router HTTP server
///
/// Initializes logging, builds the extraction pipeline, and serves until the
/// process is stopped.
pub async fn start_server(config: RouterConfig) -> Result<(), RouterError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate()?;

    info!("Starting exifprobe Router");
    info!("Bind address: {}", config.bind_addr());
    info!("Allowed origins: {}", config.allowed_origins.join(", "));
    info!("Default exiftool: {}", config.extractor.default_executable);
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
    }

    let app = create_router(build_state(&config), &config);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Router listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| RouterError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_uses_extractor_config() {
        let mut config = RouterConfig::default_config();
        config.extractor.default_executable = "/opt/exiftool/exiftool".to_string();

        let state = build_state(&config);
        assert_eq!(
            state.extractor.config().default_executable,
            "/opt/exiftool/exiftool"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err = RouterConfig::from_toml("bind_port = \"x\"").unwrap_err();
        let err: RouterError = err.into();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
