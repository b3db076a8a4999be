pub mod jira;
pub mod llm;
pub mod search;

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub use search::{
    HealthResponse, ResultDetails, SearchRequest, SearchResponse, SearchResult, SearchType,
    SourceInfo, SourcesResponse,
};

/// Build revision and the page describing it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    #[serde(alias = "Revision")]
    pub revision: Option<String>,
    #[serde(alias = "Uri")]
    pub uri: Option<Url>,
}

/// e.g. `abc123 (https://git.local/spock/commit/abc123)`
impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.revision.as_deref().unwrap_or("unknown revision"))?;
        if let Some(uri) = &self.uri {
            write!(f, " ({})", uri)?;
        }
        Ok(())
    }
}
