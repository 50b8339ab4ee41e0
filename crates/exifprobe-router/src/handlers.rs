//! HTTP request handlers for the Router service.
//!
//! Implements the metadata query, directory browser, executable validation and
//! health endpoints using axum.

use crate::config::RouterConfig;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    handler::HandlerWithoutStateExt,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use exifprobe_domain::{FileResult, ToolConfig};
use exifprobe_extractor::{export_filename, list_directory, DefaultExtractor, DirectoryItem};
use exifprobe_gatekeeper::{PathGatekeeper, ValidationError};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Header carrying a per-request exiftool executable
pub const EXIFTOOL_PATH_HEADER: &str = "x-exiftool-path";

/// Misspelled variant accepted for older clients
pub const EXIFTOOL_PATH_HEADER_ALIAS: &str = "x-exittool-path";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Extraction pipeline
    pub extractor: Arc<DefaultExtractor>,
    /// Path validation
    pub gatekeeper: Arc<PathGatekeeper>,
}

/// Request body carrying a single path
#[derive(Debug, Default, Deserialize)]
pub struct PathRequest {
    /// Target path
    #[serde(default)]
    pub path: Option<String>,
}

/// Query string of the browse endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseParams {
    /// Directory to list; defaults to `/`
    #[serde(default)]
    pub directory_path: Option<String>,
}

/// Response of the metadata query endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Always true for a processed request
    pub success: bool,
    /// One result per processed file
    pub data: Vec<FileResult>,
    /// Suggested base name for exports
    pub export_filename: String,
    /// Summary line
    pub message: String,
}

/// Response of the browse endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    /// Always true for a listed directory
    pub success: bool,
    /// Directory entries
    pub data: Vec<DirectoryItem>,
    /// The listed directory
    pub current_path: String,
}

/// Plain success/message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Outcome flag
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed or unsafe input
    BadRequest(String),
    /// Missing path or unknown route
    NotFound(String),
    /// Target exists but cannot be used
    Forbidden(String),
    /// Internal server error; the detail is logged, never returned
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::InternalError(detail) => {
                error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(MessageResponse {
            success: false,
            message,
        });
        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        let message = e.to_string();
        match e {
            ValidationError::NotFound(_) => AppError::NotFound(message),
            ValidationError::NotAccessible(_) => AppError::Forbidden(message),
            ValidationError::MissingPath
            | ValidationError::Unsafe(_)
            | ValidationError::NotFileOrDirectory(_)
            | ValidationError::NotADirectory(_)
            | ValidationError::NotAFile(_) => AppError::BadRequest(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest("Invalid request body".to_string())
    }
}

/// POST /api/exif/query-path - Extract metadata from a file or directory
async fn query_path(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<PathRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let Json(request) = body?;
    let path = request.path.unwrap_or_default();

    let tool_config = tool_config(&headers, &state.gatekeeper)?;
    let target = state.gatekeeper.resolve(&path).await?;

    info!("Query {:?} ({:?})", path, target.kind);
    let data = state.extractor.query(&target, &tool_config).await;
    let processed = data.iter().filter(|r| r.success).count();

    Ok(Json(QueryResponse {
        success: true,
        export_filename: export_filename(&target.path, target.kind),
        message: format!(
            "Successfully processed {} out of {} files",
            processed,
            data.len()
        ),
        data,
    }))
}

/// GET /api/file-system/browse - List one directory
async fn browse(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<BrowseResponse>, AppError> {
    let requested = params
        .directory_path
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "/".to_string());

    let dir = state
        .gatekeeper
        .resolve_directory(&requested)
        .await
        .map_err(|e| match e {
            ValidationError::NotFound(_) => AppError::NotFound("Directory not found".to_string()),
            other => AppError::from(other),
        })?;

    let data = list_directory(&dir).await.map_err(|e| {
        AppError::InternalError(format!("Failed to list {}: {}", dir.display(), e))
    })?;

    Ok(Json(BrowseResponse {
        success: true,
        data,
        current_path: dir.display().to_string(),
    }))
}

/// POST /api/system/validate-path - Check a candidate exiftool executable
async fn validate_path(
    State(state): State<AppState>,
    body: Result<Json<PathRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = body?;
    let path = request.path.unwrap_or_default();

    state
        .gatekeeper
        .validate_executable(&path)
        .await
        .map_err(executable_error)?;

    Ok(Json(MessageResponse {
        success: true,
        message: "路径验证通过".to_string(),
    }))
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

fn handle_panic(_: Box<dyn Any + Send + 'static>) -> Response {
    AppError::InternalError("handler panicked".to_string()).into_response()
}

fn executable_error(e: ValidationError) -> AppError {
    match e {
        ValidationError::MissingPath => {
            AppError::BadRequest("路径格式不正确：缺少路径".to_string())
        }
        ValidationError::Unsafe(_) => AppError::BadRequest("路径格式不正确".to_string()),
        ValidationError::NotFound(_) => AppError::NotFound("文件不存在".to_string()),
        ValidationError::NotAccessible(_) => AppError::Forbidden("文件不可访问".to_string()),
        ValidationError::NotAFile(_)
        | ValidationError::NotADirectory(_)
        | ValidationError::NotFileOrDirectory(_) => {
            AppError::BadRequest("路径指向的不是文件".to_string())
        }
    }
}

/// Per-request tool settings from the override headers
///
/// The first header with a non-blank value wins. Bare command names are
/// accepted and resolved through `PATH` when the tool is spawned.
fn tool_config(headers: &HeaderMap, gatekeeper: &PathGatekeeper) -> Result<ToolConfig, AppError> {
    let executable = [EXIFTOOL_PATH_HEADER, EXIFTOOL_PATH_HEADER_ALIAS]
        .iter()
        .find_map(|name| {
            headers
                .get(*name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        });

    match executable {
        None => Ok(ToolConfig::default()),
        Some(exe) => match gatekeeper.check_command(exe) {
            Ok(()) => Ok(ToolConfig::with_executable(exe)),
            Err(reason) => {
                warn!("Rejected exiftool override {:?}: {}", exe, reason);
                Err(AppError::BadRequest("Invalid ExifTool path".to_string()))
            }
        },
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            HeaderName::from_static(EXIFTOOL_PATH_HEADER),
            HeaderName::from_static(EXIFTOOL_PATH_HEADER_ALIAS),
            HeaderName::from_static("x-os-type"),
        ]))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState, config: &RouterConfig) -> AxumRouter {
    let router = AxumRouter::new()
        .route("/api/exif/query-path", post(query_path))
        .route("/api/file-system/browse", get(browse))
        .route("/api/system/validate-path", post(validate_path))
        .route("/health", get(health_check));

    let router = match &config.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(route_not_found.into_service()),
        ),
        None => router.fallback(route_not_found),
    };

    router
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
