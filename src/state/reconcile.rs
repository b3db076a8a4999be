use tracing::debug;

use super::link::PartialSearchRequest;
use crate::models::SearchRequest;

/// Outcome of merging defaults, persisted state and link parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub request: SearchRequest,
    /// At least one field came from the link
    pub overridden: bool,
}

/// Merge the three state sources into one request.
///
/// Persisted state replaces the defaults wholesale; every field the link
/// supplies then wins individually. A link value equal to the current one
/// still counts as an override.
pub fn reconcile(
    defaults: &SearchRequest,
    persisted: Option<&SearchRequest>,
    link: &PartialSearchRequest,
) -> Reconciled {
    let base = persisted.unwrap_or(defaults).clone();
    let mut overridden = false;

    let request = SearchRequest {
        query: pick("query", link.query.clone(), base.query, &mut overridden),
        sources: pick("sources", link.sources.clone(), base.sources, &mut overridden),
        search_type: pick("search_type", link.search_type, base.search_type, &mut overridden),
        top_k: pick("top_k", link.top_k.map(Some), base.top_k, &mut overridden),
        enable_generative: pick(
            "enable_generative",
            link.enable_generative,
            base.enable_generative,
            &mut overridden,
        ),
        prompt_extension: pick(
            "prompt_extension",
            link.prompt_extension.clone().map(Some),
            base.prompt_extension,
            &mut overridden,
        ),
    };

    Reconciled {
        request,
        overridden,
    }
}

fn pick<T>(field: &str, from_link: Option<T>, current: T, overridden: &mut bool) -> T {
    match from_link {
        Some(value) => {
            debug!("Link overrides {}", field);
            *overridden = true;
            value
        }
        None => current,
    }
}
