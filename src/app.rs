use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use crate::client::SearchBackend;
use crate::color::{ColorScale, Rgb};
use crate::filter::{date_span, FilterItem, FilterSpec};
use crate::models::{ResultDetails, SearchRequest, SearchResult};
use crate::state::{link, PartialSearchRequest, SearchStateStore};

/// One visible result, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub url: String,
    pub source: &'static str,
    pub icon_class: &'static str,
    pub creator: Option<String>,
    pub created: Option<NaiveDate>,
    pub score: f32,
    /// Variant specific one-liner, e.g. issue status or file size
    pub detail: Option<String>,
    /// CSS color for the score
    pub color: String,
    #[serde(skip)]
    pub rgb: Rgb,
}

impl ResultRow {
    fn new(result: &SearchResult, rgb: Rgb) -> Self {
        let kind = result.kind();
        Self {
            id: result.id.clone(),
            title: result.title.clone(),
            summary: result.summary.clone(),
            url: result.browse_url.clone(),
            source: kind.label(),
            icon_class: kind.icon_class(),
            creator: result.creator.clone(),
            created: result.created,
            score: result.score,
            detail: detail_line(&result.details),
            color: rgb.to_string(),
            rgb,
        }
    }
}

fn detail_line(details: &ResultDetails) -> Option<String> {
    match details {
        ResultDetails::Jira(Some(issue)) => {
            let mut line = format!(
                "{} {} [{}]",
                issue.project.key, issue.issue_type.name, issue.status.name
            );
            let components = issue.component_names();
            if !components.is_empty() {
                line.push_str(&format!(" {}", components.join(", ")));
            }
            Some(line)
        }
        ResultDetails::File { size_bytes } => Some(format!("{} bytes", size_bytes)),
        _ => None,
    }
}

/// Values the filter panel can offer for the fetched results
#[derive(Debug, Clone, Default, Serialize)]
pub struct Facets {
    pub names: Vec<FilterItem<String>>,
    pub sources: Vec<FilterItem<String>>,
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

impl Facets {
    fn from_results(results: &[SearchResult]) -> Self {
        let span = date_span(results);
        Self {
            names: FilterItem::names(results),
            sources: FilterItem::source_labels(results),
            earliest: span.map(|(lo, _)| lo),
            latest: span.map(|(_, hi)| hi),
        }
    }
}

/// What a search page load produced
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub request: SearchRequest,
    /// State came at least partly from the link
    pub overridden: bool,
    /// Whether the search service was queried
    pub searched: bool,
    pub answer: Option<String>,
    /// Results before filtering
    pub total: usize,
    /// Whether any filter criterion was set
    pub filtered: bool,
    pub rows: Vec<ResultRow>,
    pub facets: Facets,
    pub share_link: Url,
}

/// Page controller: reconciles state, runs the search and prepares the rows
#[derive(Clone)]
pub struct App {
    state: SearchStateStore,
    backend: Arc<dyn SearchBackend>,
    page_url: Url,
}

impl App {
    pub fn new(state: SearchStateStore, backend: Arc<dyn SearchBackend>, page_url: Url) -> Self {
        Self {
            state,
            backend,
            page_url,
        }
    }

    /// Load the page for the link parameters `params`.
    ///
    /// The search runs when the link supplied state or `force` is set, and the
    /// query is not blank.
    pub async fn open(
        &self,
        params: &PartialSearchRequest,
        filter: &FilterSpec,
        force: bool,
    ) -> Result<SearchOutcome> {
        let reconciled = self.state.load(params).await;
        let request = reconciled.request;

        if let Err(e) = self.state.save(&request).await {
            warn!("Failed to persist search state: {}", e);
        }

        let should_search = (reconciled.overridden || force) && !request.query.trim().is_empty();
        let (answer, results) = if should_search {
            let response = self.backend.search(&request).await?;
            (response.answer, response.results)
        } else {
            info!("Not searching (overridden={}, forced={})", reconciled.overridden, force);
            (None, Vec::new())
        };

        let scores = results.iter().map(|r| r.score);
        let scale = ColorScale::from_scores(scores, Rgb::LOW_SCORE, Rgb::HIGH_SCORE);
        let rows = filter
            .apply(&results)
            .into_iter()
            .map(|r| {
                let rgb = scale.map(|s| s.color_for(r.score)).unwrap_or(Rgb::HIGH_SCORE);
                ResultRow::new(r, rgb)
            })
            .collect();

        Ok(SearchOutcome {
            share_link: link::apply_to_url(&self.page_url, &request),
            overridden: reconciled.overridden,
            searched: should_search,
            answer,
            total: results.len(),
            filtered: !filter.is_empty(),
            facets: Facets::from_results(&results),
            rows,
            request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::models::{HealthResponse, ResultDetails, SearchResponse, SourceInfo};
    use crate::state::memory::MemorySessionStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend returning canned results and recording requests
    struct FakeBackend {
        results: Vec<SearchResult>,
        requests: Mutex<Vec<SearchRequest>>,
    }

    #[async_trait]
    impl SearchBackend for FakeBackend {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(SearchResponse {
                results: self.results.clone(),
                answer: None,
            })
        }

        async fn list_sources(&self) -> Result<Vec<SourceInfo>, ApiError> {
            Ok(Vec::new())
        }

        async fn health(&self) -> Result<HealthResponse, ApiError> {
            Ok(HealthResponse {
                status: "ok".to_string(),
            })
        }
    }

    fn hit(id: &str, details: ResultDetails, creator: &str, score: f32) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            browse_url: format!("https://example.com/{}", id),
            title: Some(format!("Title {}", id)),
            summary: None,
            created: NaiveDate::from_ymd_opt(2024, 2, 1),
            creator: Some(creator.to_string()),
            score,
            details,
        }
    }

    fn app_with(results: Vec<SearchResult>) -> (App, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend {
            results,
            requests: Mutex::new(Vec::new()),
        });
        let state = SearchStateStore::new(Arc::new(MemorySessionStore::new()));
        let page = Url::parse("https://spock.local/search").unwrap();
        (App::new(state, backend.clone(), page), backend)
    }

    #[tokio::test]
    async fn test_link_triggers_search_and_rows_are_filtered_and_colored() {
        let (app, backend) = app_with(vec![
            hit("a", ResultDetails::Jira(None), "anna", 0.0),
            hit("b", ResultDetails::Confluence, "bert", 5.0),
            hit("c", ResultDetails::Jira(None), "carl", 10.0),
        ]);

        let params = PartialSearchRequest::from_query("q=drucker&s=jira");
        let filter = FilterSpec::new().with_source_labels(["Jira"]);
        let outcome = app.open(&params, &filter, false).await.unwrap();

        assert!(outcome.overridden);
        assert!(outcome.searched);
        assert!(outcome.filtered);
        assert_eq!(outcome.total, 3);
        let ids: Vec<_> = outcome.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        // Colors span the full fetched list, not only the visible rows
        assert_eq!(outcome.rows[0].rgb, Rgb::LOW_SCORE);
        assert_eq!(outcome.rows[1].rgb, Rgb::HIGH_SCORE);
        assert_eq!(outcome.rows[1].color, "rgb(99, 190, 123)");
        assert_eq!(outcome.rows[0].icon_class, "fab fa-jira");

        assert_eq!(outcome.facets.sources.len(), 2);
        assert_eq!(
            outcome.share_link.as_str(),
            "https://spock.local/search?q=drucker&s=jira&t=Hybrid"
        );

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "drucker");
    }

    #[tokio::test]
    async fn test_no_search_without_link_or_force() {
        let (app, backend) = app_with(vec![hit("a", ResultDetails::Confluence, "anna", 1.0)]);

        let mut stored = SearchRequest::default();
        stored.query = "vpn".to_string();
        app.state.save(&stored).await.unwrap();

        let outcome = app
            .open(&PartialSearchRequest::default(), &FilterSpec::new(), false)
            .await
            .unwrap();
        assert!(!outcome.searched);
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.request.query, "vpn");

        let outcome = app
            .open(&PartialSearchRequest::default(), &FilterSpec::new(), true)
            .await
            .unwrap();
        assert!(outcome.searched);
        assert!(!outcome.filtered);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_query_is_never_searched() {
        let (app, backend) = app_with(Vec::new());

        let params = PartialSearchRequest::from_query("t=Keyword");
        let outcome = app.open(&params, &FilterSpec::new(), true).await.unwrap();

        assert!(outcome.overridden);
        assert!(!outcome.searched);
        assert!(backend.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reconciled_state_is_persisted() {
        let (app, _backend) = app_with(Vec::new());

        let params = PartialSearchRequest::from_query("q=lager&k=3");
        app.open(&params, &FilterSpec::new(), false).await.unwrap();

        let stored = app.state.current().await;
        assert_eq!(stored.query, "lager");
        assert_eq!(stored.top_k, Some(3));
    }

    #[test]
    fn test_detail_line() {
        let issue: crate::models::jira::JiraIssue = serde_json::from_value(serde_json::json!({
            "project": { "key": "LAG", "avatarUrls": { "16x16": "https://jira/lag.png" } },
            "issueType": { "name": "Bug" },
            "status": { "name": "Open" },
            "components": [{ "name": "Scanner" }]
        }))
        .unwrap();

        assert_eq!(
            detail_line(&ResultDetails::Jira(Some(Box::new(issue)))).as_deref(),
            Some("LAG Bug [Open] Scanner")
        );
        assert_eq!(
            detail_line(&ResultDetails::File { size_bytes: 2048 }).as_deref(),
            Some("2048 bytes")
        );
        assert_eq!(detail_line(&ResultDetails::Jira(None)), None);
        assert_eq!(detail_line(&ResultDetails::Confluence), None);
    }
}
