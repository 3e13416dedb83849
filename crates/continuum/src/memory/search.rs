//! Ad-hoc memory lookup for tool calls
//!
//! Unlike the export filter this works on raw lines: anything that starts with
//! `[` and contains `]` is a candidate, and category matching is a substring
//! test on `"] CATEGORY"` against the upper-cased line. Free text that happens
//! to contain that pattern will match too.

use serde::Deserialize;

use crate::memory::types::Category;

fn default_limit() -> usize {
    20
}

/// Criteria for a memory lookup
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryQuery {
    /// Only lines tagged with this category
    #[serde(default)]
    pub category: Option<Category>,
    /// Case-insensitive substring to look for
    #[serde(default)]
    pub search: Option<String>,
    /// Maximum number of lines returned
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for MemoryQuery {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            limit: default_limit(),
        }
    }
}

impl MemoryQuery {
    fn matches(&self, line: &str) -> bool {
        if let Some(category) = self.category {
            if !line.to_uppercase().contains(&format!("] {category}")) {
                return false;
            }
        }
        match self.search.as_deref() {
            Some(term) if !term.is_empty() => line.to_lowercase().contains(&term.to_lowercase()),
            _ => true,
        }
    }

    /// Run the query over several memory documents.
    ///
    /// Matching lines are sorted in reverse lexical order, which puts the most
    /// recent `[YYYY-MM-DD]` prefixes first, then cut to `limit`.
    pub fn run<'a>(&self, documents: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut lines: Vec<String> = documents
            .into_iter()
            .flat_map(str::lines)
            .map(str::trim)
            .filter(|line| line.starts_with('[') && line.contains(']'))
            .filter(|line| self.matches(line))
            .map(str::to_string)
            .collect();

        lines.sort_unstable_by(|a, b| b.cmp(a));
        lines.truncate(self.limit);
        lines
    }
}
