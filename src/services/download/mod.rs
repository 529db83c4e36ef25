//! Review image download service.
//!
//! Each image is tried through a ladder of URL variants (original first) until
//! one answers 200 with an image content type. Failures never propagate: an
//! image that cannot be fetched simply yields `None`.

mod types;
mod variants;

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::scrapers::resolve_user_agent;
use crate::utils::{is_image_content_type, sniff_image};

pub use types::{default_variant_rules, ImageSettings, VariantRule};
pub use variants::variant_ladder;

/// Fetches one image to `dest_dir/filename`.
#[async_trait]
pub trait ImageFetch: Send + Sync {
    /// Path of the saved file, or `None` when every attempt failed.
    async fn fetch(&self, url: &str, dest_dir: &Path, filename: &str) -> Option<PathBuf>;
}

/// HTTP image downloader with browser-like request headers.
pub struct ImageDownloader {
    client: Client,
    referer: String,
    host_marker: Option<String>,
    rules: Vec<VariantRule>,
}

/// Why a single variant attempt did not produce a file.
#[derive(Debug)]
enum Attempt {
    Status(StatusCode),
    NotAnImage(String),
    Request(reqwest::Error),
    Io(std::io::Error),
    Unverified,
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(s) if *s == StatusCode::FORBIDDEN => write!(f, "access forbidden (403)"),
            Self::Status(s) if *s == StatusCode::NOT_FOUND => write!(f, "not found (404)"),
            Self::Status(s) => write!(f, "HTTP {}", s.as_u16()),
            Self::NotAnImage(ct) => write!(f, "not an image: {}", ct),
            Self::Request(e) if e.is_timeout() => write!(f, "timed out"),
            Self::Request(e) if e.is_connect() => write!(f, "connection error"),
            Self::Request(e) => write!(f, "{}", e),
            Self::Io(e) => write!(f, "write failed: {}", e),
            Self::Unverified => write!(f, "empty or not an image on disk"),
        }
    }
}

impl ImageDownloader {
    pub fn new(settings: &ImageSettings) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("image/webp,image/apng,image/*,*/*;q=0.8"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );
        headers.insert("sec-fetch-dest", HeaderValue::from_static("image"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("no-cors"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("cross-site"));

        let client = Client::builder()
            .user_agent(resolve_user_agent(settings.user_agent.as_deref()))
            .default_headers(headers)
            .timeout(settings.timeout())
            .connect_timeout(settings.timeout().min(Duration::from_secs(10)))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            referer: settings.referer.clone(),
            host_marker: settings.host_marker.clone(),
            rules: settings.variant_rules.clone(),
        })
    }

    async fn attempt(&self, url: &str, path: &Path) -> Result<(), Attempt> {
        let mut response = self
            .client
            .get(url)
            .header(header::REFERER, self.referer.as_str())
            .send()
            .await
            .map_err(Attempt::Request)?;

        if response.status() != StatusCode::OK {
            return Err(Attempt::Status(response.status()));
        }
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_image_content_type(&content_type) {
            return Err(Attempt::NotAnImage(content_type));
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(Attempt::Io)?;
        }
        let mut file = tokio::fs::File::create(path).await.map_err(Attempt::Io)?;
        let written = async {
            while let Some(chunk) = response.chunk().await.map_err(Attempt::Request)? {
                file.write_all(&chunk).await.map_err(Attempt::Io)?;
            }
            file.flush().await.map_err(Attempt::Io)
        }
        .await;
        drop(file);

        let verified = match written {
            Ok(()) => sniff_image(path).await.is_some(),
            Err(e) => {
                remove_quietly(path).await;
                return Err(e);
            }
        };
        if !verified {
            remove_quietly(path).await;
            return Err(Attempt::Unverified);
        }
        Ok(())
    }
}

#[async_trait]
impl ImageFetch for ImageDownloader {
    async fn fetch(&self, url: &str, dest_dir: &Path, filename: &str) -> Option<PathBuf> {
        let path = dest_dir.join(filename);
        for candidate in variant_ladder(url, &self.rules, self.host_marker.as_deref()) {
            debug!("Trying image URL: {}", candidate);
            match self.attempt(&candidate, &path).await {
                Ok(()) => {
                    debug!("Saved {}", path.display());
                    return Some(path);
                }
                Err(e) => debug!("Image attempt {} failed: {}", candidate, e),
            }
        }
        warn!("All download attempts failed for {}", filename);
        None
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            debug!("Could not remove {}: {}", path.display(), e);
        }
    }
}
