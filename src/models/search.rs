use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

use super::jira::JiraIssue;

/// Result count requested when nothing else is specified
pub const DEFAULT_TOP_K: i32 = 10;

/// Retrieval strategy used by the search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchType {
    Keyword,
    Embedding,
    Hybrid,
}

impl SearchType {
    pub const ALL: [SearchType; 3] =
        [SearchType::Keyword, SearchType::Embedding, SearchType::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Keyword => "Keyword",
            SearchType::Embedding => "Embedding",
            SearchType::Hybrid => "Hybrid",
        }
    }

    /// Case-insensitive lookup by name. Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical search request of a session.
///
/// Serialized camelCase both for the search API and for the session store;
/// PascalCase field names are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(alias = "Query")]
    pub query: String,

    /// Source identifiers, e.g. `jira` or `wiki`
    #[serde(alias = "Sources")]
    pub sources: BTreeSet<String>,

    #[serde(alias = "SearchType")]
    pub search_type: SearchType,

    #[serde(alias = "TopK", default = "default_top_k")]
    pub top_k: Option<i32>,

    #[serde(alias = "EnableGenerative", default)]
    pub enable_generative: bool,

    #[serde(alias = "PromptExtension", default)]
    pub prompt_extension: Option<String>,
}

fn default_top_k() -> Option<i32> {
    Some(DEFAULT_TOP_K)
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            sources: BTreeSet::new(),
            search_type: SearchType::Hybrid,
            top_k: default_top_k(),
            enable_generative: false,
            prompt_extension: None,
        }
    }
}

/// Kind of content source a result or source descriptor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Jira,
    Confluence,
    File,
    Unknown,
}

impl SourceKind {
    /// Discriminator used on the wire
    pub fn tag(&self) -> &'static str {
        match self {
            SourceKind::Jira => "Jira",
            SourceKind::Confluence => "Confluence",
            SourceKind::File => "Network Drive",
            SourceKind::Unknown => "Unknown",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Jira" => SourceKind::Jira,
            "Confluence" => SourceKind::Confluence,
            "Network Drive" => SourceKind::File,
            _ => SourceKind::Unknown,
        }
    }

    /// Human-facing label, used by the source filter
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Jira => "Jira",
            SourceKind::Confluence => "Confluence",
            SourceKind::File => "Datei",
            SourceKind::Unknown => "Unbekannt",
        }
    }

    /// Font Awesome class for the source icon
    pub fn icon_class(&self) -> &'static str {
        match self {
            SourceKind::Jira => "fab fa-jira",
            SourceKind::Confluence => "fab fa-confluence",
            SourceKind::File => "fas fa-file-alt",
            SourceKind::Unknown => "far fa-book",
        }
    }
}

impl Serialize for SourceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for SourceKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(SourceKind::from_tag(&tag))
    }
}

/// Variant specific payload of a result
#[derive(Debug, Clone, PartialEq)]
pub enum ResultDetails {
    /// Issue detail is absent when the API omitted it or sent something unreadable
    Jira(Option<Box<JiraIssue>>),
    Confluence,
    File { size_bytes: i64 },
    Unknown,
}

impl ResultDetails {
    pub fn kind(&self) -> SourceKind {
        match self {
            ResultDetails::Jira(_) => SourceKind::Jira,
            ResultDetails::Confluence => SourceKind::Confluence,
            ResultDetails::File { .. } => SourceKind::File,
            ResultDetails::Unknown => SourceKind::Unknown,
        }
    }
}

/// A single hit returned by the search API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawSearchResult")]
pub struct SearchResult {
    pub id: String,
    pub browse_url: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub created: Option<NaiveDate>,
    pub creator: Option<String>,
    pub score: f32,
    pub details: ResultDetails,
}

impl SearchResult {
    pub fn kind(&self) -> SourceKind {
        self.details.kind()
    }

    pub fn source_type_label(&self) -> &'static str {
        self.kind().label()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSearchResult {
    #[serde(default)]
    source_type: Option<SourceKind>,
    id: String,
    browse_url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    created: Option<NaiveDate>,
    #[serde(default)]
    creator: Option<String>,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    content: Option<serde_json::Value>,
    #[serde(default)]
    size_bytes: Option<i64>,
}

impl From<RawSearchResult> for SearchResult {
    fn from(raw: RawSearchResult) -> Self {
        let details = match raw.source_type.unwrap_or(SourceKind::Unknown) {
            SourceKind::Jira => ResultDetails::Jira(
                raw.content
                    .and_then(|content| serde_json::from_value::<JiraIssue>(content).ok())
                    .map(Box::new),
            ),
            SourceKind::Confluence => ResultDetails::Confluence,
            SourceKind::File => ResultDetails::File {
                size_bytes: raw.size_bytes.unwrap_or(0),
            },
            SourceKind::Unknown => ResultDetails::Unknown,
        };

        Self {
            id: raw.id,
            browse_url: raw.browse_url,
            title: raw.title,
            summary: raw.summary,
            created: raw.created,
            creator: raw.creator,
            score: raw.score,
            details,
        }
    }
}

/// Response body of `POST /api/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,

    /// Generated answer, only present when generative search was enabled
    #[serde(default)]
    pub answer: Option<String>,
}

/// A content source known to the search API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: SourceKind,

    #[serde(default)]
    pub available: bool,

    /// Whether the source supports embedding search
    #[serde(default)]
    pub embeddings: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesResponse {
    #[serde(default)]
    pub sources: Vec<SourceInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
