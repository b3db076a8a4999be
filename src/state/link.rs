use std::borrow::Cow;
use std::collections::BTreeSet;
use url::{form_urlencoded, Url};

use crate::models::search::DEFAULT_TOP_K;
use crate::models::{SearchRequest, SearchType};

pub const PARAM_QUERY: &str = "q";
pub const PARAM_SOURCES: &str = "s";
pub const PARAM_SEARCH_TYPE: &str = "t";
pub const PARAM_TOP_K: &str = "k";
pub const PARAM_ENABLE_GENERATIVE: &str = "g";
pub const PARAM_PROMPT_EXTENSION: &str = "p";

/// Search request fields supplied by a link.
///
/// A field is `Some` only when the link carried a valid, non-empty value for
/// it; anything else reads as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialSearchRequest {
    pub query: Option<String>,
    pub sources: Option<BTreeSet<String>>,
    pub search_type: Option<SearchType>,
    pub top_k: Option<i32>,
    pub enable_generative: Option<bool>,
    pub prompt_extension: Option<String>,
}

impl PartialSearchRequest {
    /// Read the parameters of a page URL
    pub fn from_url(url: &Url) -> Self {
        Self::from_pairs(url.query_pairs())
    }

    /// Read a bare query string, with or without the leading `?`
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Read an absolute page URL, or failing that a bare query string
    pub fn from_link(link: &str) -> Self {
        match Url::parse(link) {
            Ok(url) => Self::from_url(&url),
            Err(_) => Self::from_query(link),
        }
    }

    fn from_pairs<'a>(pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>) -> Self {
        let mut params = Self::default();

        // Keys are case-insensitive; the first occurrence of a key wins
        let mut seen = BTreeSet::new();
        for (key, value) in pairs {
            let key = key.to_ascii_lowercase();
            if !seen.insert(key.clone()) {
                continue;
            }

            match key.as_str() {
                PARAM_QUERY => params.query = non_blank(&value),
                PARAM_SOURCES => params.sources = parse_sources(&value),
                PARAM_SEARCH_TYPE => params.search_type = SearchType::parse(&value),
                PARAM_TOP_K => params.top_k = value.trim().parse().ok(),
                PARAM_ENABLE_GENERATIVE => params.enable_generative = parse_bool(&value),
                PARAM_PROMPT_EXTENSION => params.prompt_extension = non_blank(&value),
                _ => {}
            }
        }

        params
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Comma separated source list.
///
/// A blank value is absent. Empty segments are dropped, other segments are
/// kept as written, surrounding whitespace included.
fn parse_sources(value: &str) -> Option<BTreeSet<String>> {
    if value.trim().is_empty() {
        return None;
    }

    let sources: BTreeSet<String> = value
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if sources.is_empty() {
        None
    } else {
        Some(sources)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parameters of the minimal link for `request`, in emission order.
///
/// `q`, `s` and `t` are always present. `k`, `g` and `p` only appear when they
/// differ from the defaults, so a link rebuilt from these pairs relies on the
/// same defaults used during reconciliation.
pub fn query_pairs(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let sources: Vec<&str> = request.sources.iter().map(String::as_str).collect();

    let mut pairs = vec![
        (PARAM_QUERY, request.query.clone()),
        (PARAM_SOURCES, sources.join(",")),
        (PARAM_SEARCH_TYPE, request.search_type.to_string()),
    ];

    if let Some(top_k) = request.top_k.filter(|k| *k != DEFAULT_TOP_K) {
        pairs.push((PARAM_TOP_K, top_k.to_string()));
    }

    if request.enable_generative {
        pairs.push((PARAM_ENABLE_GENERATIVE, "true".to_string()));
    }

    if let Some(extension) = request
        .prompt_extension
        .as_deref()
        .filter(|p| !p.trim().is_empty())
    {
        pairs.push((PARAM_PROMPT_EXTENSION, extension.to_string()));
    }

    pairs
}

/// Form-encoded minimal query string for `request`
pub fn to_query_string(request: &SearchRequest) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query_pairs(request))
        .finish()
}

/// Replace the query string of `page` with the minimal one for `request`
pub fn apply_to_url(page: &Url, request: &SearchRequest) -> Url {
    let mut url = page.clone();
    url.set_query(Some(&to_query_string(request)));
    url
}
