use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

use crate::models::VersionInfo;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the search API
    pub api_url: Option<Url>,
    /// Base URL of the OpenAI-compatible LLM endpoint
    pub llm_url: Option<Url>,
    pub session_db: String,
    /// Generative searches can take minutes
    pub api_timeout: Duration,
    /// Page that share links point to
    pub page_url: Url,
    pub revision: Option<String>,
    /// Page describing the build revision, e.g. its commit
    pub revision_url: Option<Url>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("SPOCK_API_URL")
            .map(|s| Url::parse(&s).context("SPOCK_API_URL is not a valid URL"))
            .transpose()?;

        let llm_url = lookup("SPOCK_LLM_URL")
            .map(|s| Url::parse(&s).context("SPOCK_LLM_URL is not a valid URL"))
            .transpose()?;

        let session_db =
            lookup("SPOCK_SESSION_DB").unwrap_or_else(|| "sqlite:spock-session.db".to_string());

        let api_timeout_secs: u64 = lookup("SPOCK_API_TIMEOUT_SECS")
            .unwrap_or_else(|| "200".to_string())
            .parse()
            .context("SPOCK_API_TIMEOUT_SECS must be a number of seconds")?;

        let page_url = Url::parse(
            &lookup("SPOCK_PAGE_URL").unwrap_or_else(|| "http://localhost:8080/search".to_string()),
        )
        .context("SPOCK_PAGE_URL is not a valid URL")?;

        let revision = lookup("SPOCK_REVISION").filter(|s| !s.trim().is_empty());

        let revision_url = lookup("SPOCK_REVISION_URL")
            .map(|s| Url::parse(&s).context("SPOCK_REVISION_URL is not a valid URL"))
            .transpose()?;

        Ok(Config {
            api_url,
            llm_url,
            session_db,
            api_timeout: Duration::from_secs(api_timeout_secs),
            page_url,
            revision,
            revision_url,
        })
    }

    pub fn version_info(&self) -> VersionInfo {
        VersionInfo {
            revision: self.revision.clone(),
            uri: self.revision_url.clone(),
        }
    }

    /// Search API base URL, required by every command that talks to the API
    pub fn require_api_url(&self) -> Result<&Url> {
        self.api_url
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("SPOCK_API_URL must be set (or pass --api-url)"))
    }

    pub fn require_llm_url(&self) -> Result<&Url> {
        self.llm_url
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("SPOCK_LLM_URL must be set"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert!(config.api_url.is_none());
        assert!(config.llm_url.is_none());
        assert_eq!(config.session_db, "sqlite:spock-session.db");
        assert_eq!(config.api_timeout, Duration::from_secs(200));
        assert_eq!(config.page_url.as_str(), "http://localhost:8080/search");
        assert!(config.revision.is_none());
        assert_eq!(config.version_info(), VersionInfo::default());
        assert!(config.require_api_url().is_err());
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("SPOCK_API_URL", "https://spock.local"),
            ("SPOCK_LLM_URL", "https://llm.local/v1"),
            ("SPOCK_SESSION_DB", "sqlite::memory:"),
            ("SPOCK_API_TIMEOUT_SECS", "30"),
            ("SPOCK_REVISION", "abc123"),
            ("SPOCK_REVISION_URL", "https://git.local/spock/commit/abc123"),
        ])
        .unwrap();

        assert_eq!(config.require_api_url().unwrap().host_str(), Some("spock.local"));
        assert_eq!(config.require_llm_url().unwrap().path(), "/v1");
        assert_eq!(config.session_db, "sqlite::memory:");
        assert_eq!(config.api_timeout, Duration::from_secs(30));
        assert_eq!(config.revision.as_deref(), Some("abc123"));
        assert_eq!(
            config.version_info().to_string(),
            "abc123 (https://git.local/spock/commit/abc123)"
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("SPOCK_API_URL", "not a url")]).is_err());
        assert!(config_from(&[("SPOCK_API_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("SPOCK_REVISION_URL", "commit abc")]).is_err());
    }
}
