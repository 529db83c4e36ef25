//! Image Download Tests
//!
//! Runs the downloader against a local HTTP server whose responses depend on
//! the requested rendition, covering the variant ladder end to end.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Path as UrlPath;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use packscope::services::{ImageDownloader, ImageFetch, ImageSettings};

/// Smallest JPEG header `infer` recognizes, padded with zeros.
const JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

fn jpeg(body: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/jpeg")], body).into_response()
}

async fn image(UrlPath(name): UrlPath<String>) -> Response {
    if name.contains("_SY88") {
        return StatusCode::FORBIDDEN.into_response();
    }
    if name.contains("_AC_SL1500") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if name.contains("_AC_SL1000") {
        tokio::time::sleep(Duration::from_secs(5)).await;
        return jpeg(JPEG.to_vec());
    }
    if name.contains("_AC_UL1500") {
        return jpeg(JPEG.to_vec());
    }
    if name.starts_with("empty") {
        return jpeg(Vec::new());
    }
    if name.starts_with("page") {
        return ([(header::CONTENT_TYPE, "text/html")], "<html></html>").into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

async fn serve() -> SocketAddr {
    let app = Router::new().route("/images/I/:name", get(image));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn downloader() -> ImageDownloader {
    let settings = ImageSettings {
        timeout_secs: 1,
        host_marker: None,
        referer: "http://127.0.0.1/".to_string(),
        ..ImageSettings::default()
    };
    ImageDownloader::new(&settings).unwrap()
}

#[tokio::test]
async fn test_ladder_survives_forbidden_missing_and_slow_variants() {
    let addr = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let url = format!("http://{}/images/I/71abc._SY88.jpg", addr);

    let saved = downloader()
        .fetch(&url, dir.path(), "Dana_R_review0_0.jpg")
        .await
        .expect("fourth variant should succeed");

    assert_eq!(saved, dir.path().join("Dana_R_review0_0.jpg"));
    assert_eq!(std::fs::read(&saved).unwrap(), JPEG);
}

#[tokio::test]
async fn test_zero_byte_image_is_discarded() {
    let addr = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let url = format!("http://{}/images/I/empty.jpg", addr);

    assert!(downloader()
        .fetch(&url, dir.path(), "empty.jpg")
        .await
        .is_none());
    assert!(!dir.path().join("empty.jpg").exists());
}

#[tokio::test]
async fn test_non_image_response_is_rejected() {
    let addr = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let url = format!("http://{}/images/I/page.jpg", addr);

    assert!(downloader()
        .fetch(&url, dir.path(), "page.jpg")
        .await
        .is_none());
    assert!(!dir.path().join("page.jpg").exists());
}

#[tokio::test]
async fn test_creates_missing_destination_folder() {
    let addr = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("Gentle_Detergent_2024-03-09");
    let url = format!("http://{}/images/I/x._AC_UL1500.jpg", addr);

    let saved = downloader().fetch(&url, &nested, "product.jpg").await;
    assert_eq!(saved, Some(nested.join("product.jpg")));
}
