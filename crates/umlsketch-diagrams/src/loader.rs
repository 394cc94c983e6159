//! Image loading from rendering servers
//!
//! One load attempt is a GET of the image URL. Transport errors, non-2xx
//! statuses and bodies that are not PNG images all count as "the image
//! failed to load"; callers do not distinguish between them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{LoadError, Result};

/// Default per-request timeout of the HTTP loader
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Image bytes retrieved from a rendering server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Raw PNG bytes
    pub data: Vec<u8>,
}

impl LoadedImage {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Check if the data appears to be a valid PNG
    pub fn is_valid_png(&self) -> bool {
        is_png(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Check the PNG file signature
pub fn is_png(data: &[u8]) -> bool {
    data.len() >= PNG_SIGNATURE.len() && &data[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}

/// Network seam of the pipeline: fetch one image URL
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Load the image at `url`
    async fn load(&self, url: &str) -> std::result::Result<LoadedImage, LoadError>;
}

/// Loader backed by an async `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    client: Client,
    timeout: Duration,
}

impl HttpImageLoader {
    /// Create a loader with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a loader with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("umlsketch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Classify a client error; timeouts carry the configured limit
    fn load_error(&self, err: reqwest::Error) -> LoadError {
        if err.is_timeout() {
            LoadError::Timeout(self.timeout.as_millis())
        } else if let Some(status) = err.status() {
            LoadError::Status(status.as_u16())
        } else {
            LoadError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> std::result::Result<LoadedImage, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.load_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| self.load_error(e))?
            .to_vec();
        if !is_png(&data) {
            return Err(LoadError::NotAnImage(data.len()));
        }

        Ok(LoadedImage::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature() {
        let png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert!(is_png(&png));
        assert!(LoadedImage::new(png).is_valid_png());

        assert!(!is_png(b"<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>"));
        assert!(!is_png(b"\x89PNG"));
    }

    #[test]
    fn test_loader_timeout() {
        let loader = HttpImageLoader::with_timeout(Duration::from_secs(3)).unwrap();
        assert_eq!(loader.timeout(), Duration::from_secs(3));
    }
}
