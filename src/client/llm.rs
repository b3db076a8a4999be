use anyhow::Result;
use reqwest::Client;
use url::Url;

use super::{ensure_success, ApiError};
use crate::models::llm::ModelResponse;

/// Client for the OpenAI-compatible LLM endpoint
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    models_url: Url,
}

impl LlmClient {
    pub fn new(base_url: &Url) -> Result<Self> {
        // Treat the base as a directory so relative joins stay below it
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            models_url: base.join("models")?,
        })
    }

    /// Models served by the endpoint
    pub async fn models(&self) -> Result<ModelResponse, ApiError> {
        let response = self.client.get(self.models_url.clone()).send().await?;
        Ok(ensure_success(response)?.json().await?)
    }
}
