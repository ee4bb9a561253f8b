//! Photo search client for decorating valuations with stock images.
//!
//! This crate talks to the Unsplash search API. It handles:
//! - Building the search request (query, credential, page size)
//! - Parsing the JSON result list
//! - Dropping interior shots and capping the number of URLs
//! - Swallowing every failure, since images are best-effort
//!
//! The rest of the system only sees the [`ImageSearch`] trait.

use std::future::Future;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Default Unsplash photo search endpoint
pub const UNSPLASH_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";

/// Most images attached to one valuation
pub const MAX_IMAGES: usize = 5;

/// Errors that can occur when talking to the search API
#[derive(Error, Debug)]
pub enum ImageSearchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Image search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Image search returned status {0}")]
    Status(u16),

    #[error("Invalid response from image search: {0}")]
    InvalidResponse(String),
}

/// Anything that can turn a text query into a short list of image URLs.
///
/// Implementations never fail: an unreachable or misbehaving backend
/// yields an empty list.
pub trait ImageSearch: Send + Sync {
    fn search(&self, query: &str) -> impl Future<Output = Vec<String>> + Send;
}

/// Search backend used when no credential is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageSearch;

impl ImageSearch for NoImageSearch {
    async fn search(&self, _query: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Connection settings for [`UnsplashClient`]
#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    pub endpoint: String,
    pub access_key: String,
    pub per_page: u32,
    pub timeout: Duration,
    pub max_images: usize,
}

impl UnsplashConfig {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            endpoint: UNSPLASH_SEARCH_URL.to_string(),
            access_key: access_key.into(),
            per_page: 10,
            timeout: Duration::from_secs(5),
            max_images: MAX_IMAGES,
        }
    }
}

/// Search API response. Only the fields we read are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<PhotoResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoResult {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub urls: Option<PhotoUrls>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoUrls {
    #[serde(default)]
    pub regular: Option<String>,
}

impl PhotoResult {
    /// True if either caption mentions the interior
    pub fn is_interior(&self) -> bool {
        [&self.description, &self.alt_description]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains("interior"))
    }
}

/// Pick up to `limit` exterior photo URLs, in result order.
///
/// Results without a `urls.regular` link are skipped.
pub fn select_exterior_urls(response: &SearchResponse, limit: usize) -> Vec<String> {
    response
        .results
        .iter()
        .filter(|result| !result.is_interior())
        .filter_map(|result| result.urls.as_ref()?.regular.clone())
        .take(limit)
        .collect()
}

/// Client for the Unsplash photo search API.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    http: HttpClient,
    config: UnsplashConfig,
}

impl UnsplashClient {
    pub fn new(config: UnsplashConfig) -> Result<Self, ImageSearchError> {
        let http = HttpClient::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ImageSearchError::ClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &UnsplashConfig {
        &self.config
    }

    /// Run one search, reporting what went wrong.
    pub async fn try_search(&self, query: &str) -> Result<Vec<String>, ImageSearchError> {
        let per_page = self.config.per_page.to_string();
        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("query", query),
                ("client_id", self.config.access_key.as_str()),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageSearchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&body)
            .map_err(|e| ImageSearchError::InvalidResponse(e.to_string()))?;

        let urls = select_exterior_urls(&parsed, self.config.max_images);
        debug!(
            query,
            results = parsed.results.len(),
            selected = urls.len(),
            "image search complete"
        );
        Ok(urls)
    }
}

impl ImageSearch for UnsplashClient {
    async fn search(&self, query: &str) -> Vec<String> {
        match self.try_search(query).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(query, error = %e, "image search failed, continuing without images");
                Vec::new()
            }
        }
    }
}
