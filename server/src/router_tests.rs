//! Tests for static serving, SPA fallback and response layers

use std::fs;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::router::router;

const INDEX_HTML: &str = "<!doctype html><html><head><title>Top SQL</title></head><body><div id=\"main\"></div></body></html>";

fn assets() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/app.js"), "console.log('topsql');").unwrap();
    dir
}

async fn get(dir: &TempDir, uri: &str, headers: &[(header::HeaderName, &str)]) -> axum::response::Response {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(name.clone(), *value);
    }
    router(dir.path())
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_root_serves_index() {
    let dir = assets();
    let response = get(&dir, "/", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, INDEX_HTML);
}

#[tokio::test]
async fn test_asset_served_from_directory() {
    let dir = assets();
    let response = get(&dir, "/assets/app.js", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "console.log('topsql');");
}

#[tokio::test]
async fn test_unknown_path_falls_back_to_index() {
    let dir = assets();
    let response = get(&dir, "/instances/db-1", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, INDEX_HTML);
}

#[tokio::test]
async fn test_missing_index_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(&dir, "/", &[]).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let dir = assets();
    let response = get(&dir, "/", &[(header::ORIGIN, "http://example.com")]).await;

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_gzip_when_accepted() {
    let dir = assets();
    let large = "SELECT * FROM t WHERE id = ?;\n".repeat(200);
    fs::write(dir.path().join("assets/big.txt"), &large).unwrap();

    let response = get(&dir, "/assets/big.txt", &[(header::ACCEPT_ENCODING, "gzip")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_ENCODING).unwrap(), "gzip");

    let plain = get(&dir, "/assets/big.txt", &[]).await;
    assert!(plain.headers().get(header::CONTENT_ENCODING).is_none());
    assert_eq!(body_text(plain).await, large);
}
