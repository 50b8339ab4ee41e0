//! Integration tests for the Router service

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use exifprobe_extractor::ExtractorConfig;
use exifprobe_router::{
    build_state,
    config::RouterConfig,
    handlers::{create_router, BrowseResponse, HealthCheckResponse, MessageResponse, QueryResponse},
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt; // for oneshot

// Writing an executable while another test forks can fail with ETXTBSY
static SPAWN: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

fn test_config(executable: &str) -> RouterConfig {
    RouterConfig {
        extractor: ExtractorConfig {
            default_executable: executable.to_string(),
            tool_timeout_secs: 10,
            ..ExtractorConfig::default()
        },
        ..RouterConfig::default_config()
    }
}

fn create_app(config: &RouterConfig) -> Router {
    create_router(build_state(config), config)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Minimal JPEG whose EXIF block holds a single `Make` entry
fn jpeg_with_make(make: &str) -> Vec<u8> {
    let mut value = make.as_bytes().to_vec();
    value.push(0);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(&42u16.to_be_bytes());
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x010fu16.to_be_bytes());
    tiff.extend_from_slice(&2u16.to_be_bytes());
    tiff.extend_from_slice(&(value.len() as u32).to_be_bytes());
    tiff.extend_from_slice(&26u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff.extend_from_slice(&value);

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}

fn status_of(result: &exifprobe_domain::FileResult) -> Option<&str> {
    result
        .get("ExtractionStatus")
        .and_then(|r| r.value.as_text())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_app(&test_config("exiftool"));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthCheckResponse = read_json(response).await;
    assert_eq!(health.status, "healthy");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_query_single_jpeg() {
    let dir = TempDir::new().unwrap();
    let photo = dir.path().join("IMG_0042.jpg");
    std::fs::write(&photo, jpeg_with_make("Canon")).unwrap();

    let app = create_app(&test_config("/nonexistent/exiftool"));
    let response = app
        .oneshot(post_json(
            "/api/exif/query-path",
            serde_json::json!({ "path": photo }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: QueryResponse = read_json(response).await;

    assert!(body.success);
    assert_eq!(body.export_filename, "IMG_0042");
    assert_eq!(body.message, "Successfully processed 1 out of 1 files");
    assert_eq!(body.data.len(), 1);

    let result = &body.data[0];
    assert_eq!(result.file_name, "IMG_0042.jpg");
    assert_eq!(
        result.get("Make").and_then(|r| r.value.as_text()),
        Some("Canon")
    );
    assert_eq!(status_of(result), Some("Success"));
}

#[tokio::test]
async fn test_query_directory_counts_processed_files() {
    let dir = TempDir::new().unwrap();
    let album = dir.path().join("album");
    std::fs::create_dir(&album).unwrap();
    std::fs::write(album.join("a.jpg"), jpeg_with_make("Nikon")).unwrap();
    std::fs::write(album.join("notes.txt"), b"not an image").unwrap();
    std::fs::create_dir(album.join("nested")).unwrap();

    let app = create_app(&test_config("/nonexistent/exiftool"));
    let response = app
        .oneshot(post_json(
            "/api/exif/query-path",
            serde_json::json!({ "path": album }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: QueryResponse = read_json(response).await;

    assert_eq!(body.export_filename, "album");
    assert_eq!(body.data.len(), 3);
    assert_eq!(body.message, "Successfully processed 1 out of 3 files");

    let notes = body.data.iter().find(|r| r.file_name == "notes.txt").unwrap();
    assert!(!notes.success);
    assert_eq!(notes.error.as_deref(), Some("Not a supported image format"));
}

#[cfg(unix)]
fn script(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("fake-exiftool");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[tokio::test]
async fn test_query_raw_uses_header_override() {
    let _guard = SPAWN.lock().await;
    let tools = TempDir::new().unwrap();
    let exe = script(
        tools.path(),
        r#"echo '[{"Make":"Sony","Model":"ILCE-7M4","ExposureTime":0.004}]'"#,
    );
    let photos = TempDir::new().unwrap();
    let raw = photos.path().join("DSC00001.ARW");
    std::fs::write(&raw, b"raw bytes").unwrap();

    let mut request = post_json("/api/exif/query-path", serde_json::json!({ "path": raw }));
    request
        .headers_mut()
        .insert("x-exiftool-path", exe.to_str().unwrap().parse().unwrap());

    let app = create_app(&test_config("/nonexistent/exiftool"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: QueryResponse = read_json(response).await;
    let result = &body.data[0];

    assert_eq!(result.get("Model").and_then(|r| r.value.as_text()), Some("ILCE-7M4"));
    assert_eq!(
        result.get("ExposureTime").and_then(|r| r.value.as_f64()),
        Some(0.004)
    );
    assert_eq!(status_of(result), Some("Success"));
}

#[tokio::test]
async fn test_query_raw_without_tool_keeps_basic_info() {
    let _guard = SPAWN.lock().await;
    let photos = TempDir::new().unwrap();
    let raw = photos.path().join("IMG_0001.CR2");
    std::fs::write(&raw, b"raw bytes").unwrap();

    let app = create_app(&test_config("/nonexistent/exiftool"));
    let response = app
        .oneshot(post_json("/api/exif/query-path", serde_json::json!({ "path": raw })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: QueryResponse = read_json(response).await;
    let result = &body.data[0];

    assert!(result.success);
    assert!(result.get("FileSize").is_some());
    assert_eq!(status_of(result), Some("Error"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_query_bare_name_override_is_spawned_from_path() {
    let _guard = SPAWN.lock().await;
    let photos = TempDir::new().unwrap();
    let raw = photos.path().join("DSC00002.NEF");
    std::fs::write(&raw, b"raw bytes").unwrap();

    // `echo` is found on PATH and prints its arguments, which is not JSON
    let mut request = post_json("/api/exif/query-path", serde_json::json!({ "path": raw }));
    request
        .headers_mut()
        .insert("x-exiftool-path", "echo".parse().unwrap());

    let app = create_app(&test_config("/nonexistent/exiftool"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: QueryResponse = read_json(response).await;
    let result = &body.data[0];

    assert_eq!(status_of(result), Some("Error"));
    let description = &result.get("ExtractionStatus").unwrap().description;
    assert!(
        description.contains("Failed to parse ExifTool JSON"),
        "{}",
        description
    );
}

#[tokio::test]
async fn test_query_blocked_override_is_rejected() {
    let photos = TempDir::new().unwrap();
    let raw = photos.path().join("DSC00003.ARW");
    std::fs::write(&raw, b"raw bytes").unwrap();

    let mut request = post_json("/api/exif/query-path", serde_json::json!({ "path": raw }));
    request
        .headers_mut()
        .insert("x-exiftool-path", "exiftool | sh".parse().unwrap());

    let response = create_app(&test_config("/nonexistent/exiftool"))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = read_json(response).await;
    assert_eq!(body.message, "Invalid ExifTool path");
}

#[tokio::test]
async fn test_browse_lists_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();
    std::fs::create_dir(dir.path().join("raw")).unwrap();

    let uri = format!(
        "/api/file-system/browse?directoryPath={}",
        dir.path().display()
    );
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let app = create_app(&test_config("exiftool"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: BrowseResponse = read_json(response).await;

    assert_eq!(body.current_path, dir.path().display().to_string());
    let names: Vec<&str> = body.data.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["..", "raw", "b.jpg"]);
    assert!(body.data[1].is_directory);
}

#[tokio::test]
async fn test_browse_errors() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.jpg");
    std::fs::write(&file, b"x").unwrap();

    let cases = [
        (dir.path().join("missing"), StatusCode::NOT_FOUND, "Directory not found"),
        (file, StatusCode::BAD_REQUEST, "Path is not a directory"),
    ];

    for (path, status, message) in cases {
        let uri = format!("/api/file-system/browse?directoryPath={}", path.display());
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = create_app(&test_config("exiftool")).oneshot(request).await.unwrap();

        assert_eq!(response.status(), status);
        let body: MessageResponse = read_json(response).await;
        assert!(!body.success);
        assert_eq!(body.message, message);
    }
}

#[tokio::test]
async fn test_validate_path_statuses() {
    let dir = TempDir::new().unwrap();

    let cases = [
        (serde_json::json!({ "path": "relative/exiftool" }), StatusCode::BAD_REQUEST, "路径格式不正确"),
        (
            serde_json::json!({ "path": dir.path().join("missing") }),
            StatusCode::NOT_FOUND,
            "文件不存在",
        ),
        (
            serde_json::json!({ "path": dir.path() }),
            StatusCode::BAD_REQUEST,
            "路径指向的不是文件",
        ),
    ];

    for (body, status, message) in cases {
        let response = create_app(&test_config("exiftool"))
            .oneshot(post_json("/api/system/validate-path", body))
            .await
            .unwrap();

        assert_eq!(response.status(), status);
        let body: MessageResponse = read_json(response).await;
        assert_eq!(body.message, message);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_validate_path_accepts_executable() {
    let dir = TempDir::new().unwrap();
    let exe = script(dir.path(), "exit 0");

    let response = create_app(&test_config("exiftool"))
        .oneshot(post_json(
            "/api/system/validate-path",
            serde_json::json!({ "path": exe }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = read_json(response).await;
    assert!(body.success);
    assert_eq!(body.message, "路径验证通过");
}

#[tokio::test]
async fn test_static_dir_serves_ui() {
    let site = TempDir::new().unwrap();
    std::fs::write(site.path().join("index.html"), "<h1>exifprobe</h1>").unwrap();

    let mut config = test_config("exiftool");
    config.static_dir = Some(site.path().to_path_buf());

    let request = Request::builder()
        .uri("/index.html")
        .body(Body::empty())
        .unwrap();
    let response = create_app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/missing.css")
        .body(Body::empty())
        .unwrap();
    let response = create_app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: MessageResponse = read_json(response).await;
    assert_eq!(body.message, "Route not found");
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/exif/query-path")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "x-exiftool-path")
        .body(Body::empty())
        .unwrap();

    let response = create_app(&test_config("exiftool"))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
