//! Fetching generated images to disk.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::ThumbnailError;

/// Saves the image at a URL to a local path.
#[async_trait]
pub trait ImageDownloader: Send + Sync {
    /// Writes the image to `dest`, replacing any existing file, and returns
    /// the number of bytes written.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, ThumbnailError>;
}

/// Streams images over HTTP.
#[derive(Clone, Debug)]
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    /// Builds a downloader whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ThumbnailError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                ThumbnailError::Configuration(format!("Failed to build HTTP client: {err}"))
            })?;
        Ok(Self { client })
    }
}

async fn write_body(
    resp: &mut reqwest::Response,
    file: &mut tokio::fs::File,
    dest: &Path,
) -> Result<u64, ThumbnailError> {
    let mut written = 0u64;
    while let Some(chunk) = resp
        .chunk()
        .await
        .map_err(|err| ThumbnailError::Download(err.to_string()))?
    {
        file.write_all(&chunk).await.map_err(|err| {
            ThumbnailError::Download(format!("Failed to write {}: {err}", dest.display()))
        })?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|err| {
        ThumbnailError::Download(format!("Failed to flush {}: {err}", dest.display()))
    })?;
    Ok(written)
}

#[async_trait]
impl ImageDownloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, ThumbnailError> {
        let mut resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| {
                warn!("Error downloading image: {err}");
                ThumbnailError::Download(err.to_string())
            })?;

        let mut file = tokio::fs::File::create(dest).await.map_err(|err| {
            ThumbnailError::Download(format!("Failed to create {}: {err}", dest.display()))
        })?;

        match write_body(&mut resp, &mut file, dest).await {
            Ok(written) => {
                debug!("Wrote {written} bytes to {}", dest.display());
                info!("Image downloaded and saved to: {}", dest.display());
                Ok(written)
            }
            Err(err) => {
                warn!("Error downloading image: {err}");
                drop(file);
                // drop the partial file
                if let Err(remove_err) = tokio::fs::remove_file(dest).await {
                    warn!(
                        "Failed to remove partial download {}: {remove_err}",
                        dest.display()
                    );
                }
                Err(err)
            }
        }
    }
}
