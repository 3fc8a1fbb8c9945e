//! Sample gallery catalog and fetching
//!
//! A small fixed list of remote demo images is offered for one-click use.
//! Fetching goes through the [`SampleFetcher`] seam so tests substitute an
//! in-memory fetcher; the production implementation is
//! [`HttpSampleFetcher`] over `reqwest`. Every fetch failure, network or
//! HTTP, maps to the single sample-fetch error kind.

use async_trait::async_trait;
use instant::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ControllerError, Result},
    source::ImageSource,
};

/// A remote demo image with its display file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleImage {
    /// Remote URL of the asset
    pub url: String,
    /// File name shown in the gallery and used for the synthesized source
    pub file_name: String,
}

impl SampleImage {
    /// Create a sample entry
    pub fn new<U: Into<String>, N: Into<String>>(url: U, file_name: N) -> Self {
        Self {
            url: url.into(),
            file_name: file_name.into(),
        }
    }
}

/// Fixed list of sample images offered in the idle view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCatalog {
    samples: Vec<SampleImage>,
}

impl SampleCatalog {
    /// Create a catalog from explicit entries
    #[must_use]
    pub fn new(samples: Vec<SampleImage>) -> Self {
        Self { samples }
    }

    /// Parse a catalog from its JSON representation
    ///
    /// # Errors
    /// Returns [`ControllerError::InvalidConfig`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ControllerError::invalid_config(format!("invalid sample catalog: {e}")))
    }

    /// The catalog entries in display order
    #[must_use]
    pub fn samples(&self) -> &[SampleImage] {
        &self.samples
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for SampleCatalog {
    fn default() -> Self {
        Self::new(vec![
            SampleImage::new(
                "https://images.unsplash.com/photo-1529626455594-4ff0802cfb7e?w=800",
                "portrait.jpg",
            ),
            SampleImage::new(
                "https://images.unsplash.com/photo-1518020382113-a7e8fc38eac9?w=800",
                "puppy.jpg",
            ),
            SampleImage::new(
                "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=800",
                "sneaker.jpg",
            ),
        ])
    }
}

/// Retrieval of sample assets
#[async_trait]
pub trait SampleFetcher: Send + Sync {
    /// Fetch a sample and re-wrap it as an [`ImageSource`]
    ///
    /// # Errors
    /// [`ControllerError::SampleFetchFailed`] for any network or HTTP failure.
    async fn fetch(&self, sample: &SampleImage) -> Result<ImageSource>;
}

/// Sample fetcher over the standard HTTP stack
pub struct HttpSampleFetcher {
    client: Client,
}

impl HttpSampleFetcher {
    /// Create a fetcher with the given request timeout
    ///
    /// # Errors
    /// Returns [`ControllerError::SampleFetchFailed`] if the HTTP client
    /// cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ControllerError::sample_fetch(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SampleFetcher for HttpSampleFetcher {
    async fn fetch(&self, sample: &SampleImage) -> Result<ImageSource> {
        let response = self
            .client
            .get(&sample.url)
            .send()
            .await
            .map_err(|e| ControllerError::sample_fetch(format!("GET {}: {e}", sample.url)))?;

        if !response.status().is_success() {
            return Err(ControllerError::sample_fetch(format!(
                "GET {} returned {}",
                sample.url,
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ControllerError::sample_fetch(format!("reading {}: {e}", sample.url)))?;

        tracing::debug!(
            url = %sample.url,
            size = bytes.len(),
            content_type = content_type.as_deref().unwrap_or("none"),
            "fetched sample image"
        );

        Ok(ImageSource::from_fetched(
            bytes.to_vec(),
            content_type.as_deref(),
            &sample.file_name,
        ))
    }
}
