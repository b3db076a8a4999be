/// Example queries offered while the search box is empty
pub const PLACEHOLDERS: &[&str] = &[
    "Lizenz online abrufen",
    "Business Intelligence",
    "Corporate Design",
    "Welter Umschlagscannung",
    "REWE Teamchallenge",
    "Battefeld Fehler",
    "AKL Apache",
    "Dynafleet",
];

/// Source identifiers recommended to new users
pub const SUGGESTED_SOURCES: &[&str] = &["jira", "wiki"];

/// Placeholder for the given rotation index
pub fn placeholder(index: usize) -> &'static str {
    PLACEHOLDERS[index % PLACEHOLDERS.len()]
}

pub fn is_suggested(source: &str) -> bool {
    SUGGESTED_SOURCES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(source))
}
