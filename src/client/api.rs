use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{ensure_success, ApiError, SearchBackend};
use crate::models::{HealthResponse, SearchRequest, SearchResponse, SourceInfo, SourcesResponse};

/// HTTP client for the search API
#[derive(Clone)]
pub struct SpockApiClient {
    client: Client,
    search_url: Url,
    sources_url: Url,
    health_url: Url,
}

impl SpockApiClient {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            search_url: base_url.join("/api/search")?,
            sources_url: base_url.join("/api/sources")?,
            health_url: base_url.join("/api/health")?,
        })
    }
}

#[async_trait]
impl SearchBackend for SpockApiClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
        info!(
            "Searching {:?} in {} source(s) ({})",
            request.query,
            request.sources.len(),
            request.search_type
        );

        let response = self
            .client
            .post(self.search_url.clone())
            .json(request)
            .send()
            .await?;
        let response: SearchResponse = ensure_success(response)?.json().await?;

        debug!("Search returned {} result(s)", response.results.len());
        Ok(response)
    }

    async fn list_sources(&self) -> Result<Vec<SourceInfo>, ApiError> {
        let response = self.client.get(self.sources_url.clone()).send().await?;
        let response: SourcesResponse = ensure_success(response)?.json().await?;
        Ok(response.sources)
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self.client.get(self.health_url.clone()).send().await?;
        Ok(ensure_success(response)?.json().await?)
    }
}
