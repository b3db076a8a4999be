use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::models::SearchResult;

/// Filter criteria chosen in the filter panel.
///
/// Empty sets and absent dates do not restrict anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Inclusive lower bound on the creation date
    pub date_start: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date
    pub date_end: Option<NaiveDate>,
    pub selected_names: HashSet<String>,
    /// Source labels as shown to the user, e.g. `Jira` or `Datei`
    pub selected_source_labels: HashSet<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_source_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_source_labels
            .extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_start = start;
        self.date_end = end;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.date_start.is_none()
            && self.date_end.is_none()
            && self.selected_names.is_empty()
            && self.selected_source_labels.is_empty()
    }

    /// Whether a result passes every criterion
    pub fn matches(&self, result: &SearchResult) -> bool {
        self.source_matches(result) && self.creator_matches(result) && self.date_matches(result)
    }

    /// Results that pass, in their original order
    pub fn apply<'a>(&self, results: &'a [SearchResult]) -> Vec<&'a SearchResult> {
        results.iter().filter(|r| self.matches(r)).collect()
    }

    fn source_matches(&self, result: &SearchResult) -> bool {
        self.selected_source_labels.is_empty()
            || self
                .selected_source_labels
                .contains(result.source_type_label())
    }

    fn creator_matches(&self, result: &SearchResult) -> bool {
        if self.selected_names.is_empty() {
            return true;
        }

        match result.creator.as_deref() {
            Some(creator) if !creator.trim().is_empty() => self.selected_names.contains(creator),
            _ => false,
        }
    }

    fn date_matches(&self, result: &SearchResult) -> bool {
        match result.created {
            None => self.date_start.is_none() && self.date_end.is_none(),
            Some(created) => {
                created >= self.date_start.unwrap_or(NaiveDate::MIN)
                    && created <= self.date_end.unwrap_or(NaiveDate::MAX)
            }
        }
    }
}

/// A selectable filter value with the number of results carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterItem<T> {
    pub value: T,
    pub count: usize,
}

impl FilterItem<String> {
    /// Contributor names present in `results`, most frequent first
    pub fn names(results: &[SearchResult]) -> Vec<Self> {
        Self::count_values(
            results
                .iter()
                .filter_map(|r| r.creator.as_deref())
                .filter(|c| !c.trim().is_empty()),
        )
    }

    /// Source labels present in `results`, most frequent first
    pub fn source_labels(results: &[SearchResult]) -> Vec<Self> {
        Self::count_values(results.iter().map(|r| r.source_type_label()))
    }

    fn count_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Self> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }

        let mut items: Vec<Self> = counts
            .into_iter()
            .map(|(value, count)| FilterItem {
                value: value.to_string(),
                count,
            })
            .collect();
        // Stable sort keeps alphabetical order among equal counts
        items.sort_by(|a, b| b.count.cmp(&a.count));
        items
    }
}

/// Earliest and latest creation date among `results`
pub fn date_span(results: &[SearchResult]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = results.iter().filter_map(|r| r.created);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}
