pub mod api;
pub mod llm;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::models::{HealthResponse, SearchRequest, SearchResponse, SourceInfo};
pub use api::SpockApiClient;
pub use llm::LlmClient;

/// Failure talking to a remote service
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a non-success status
    #[error("request failed with status {status}")]
    RequestFailed { status: StatusCode },

    /// Connection, timeout or body decoding failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Search service used by the client
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a search
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError>;

    /// List the content sources the service can search
    async fn list_sources(&self) -> Result<Vec<SourceInfo>, ApiError>;

    /// Service health
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

/// Turn a non-success status into `ApiError::RequestFailed`
pub(crate) fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!("{} answered with status {}", response.url(), status);
        Err(ApiError::RequestFailed { status })
    }
}
