//! Assembly of the export document
//!
//! The export is a single Markdown document with a fixed section order:
//!
//! ```markdown
//! # Continuum Export
//!
//! Generated: 2024-07-01 09:30
//!
//! ## Identity
//! ## Voice
//! ## Current Context
//! ## Relevant Memory
//! ```
//!
//! Project-level context and memory are nested under `Current Context` and
//! `Relevant Memory` as `### Project ...` sub-sections.

use chrono::{DateTime, Local};

use crate::config::Thresholds;
use crate::export::condense::condense;
use crate::export::memory_filter::filter_recent_at;

/// Placeholder for a source document that doesn't exist
pub const NOT_CONFIGURED: &str = "_Not configured._";

/// Placeholder for a memory log with nothing selected
pub const NO_MEMORY_ENTRIES: &str = "_No memory entries._";

pub const EXPORT_TITLE: &str = "# Continuum Export";

/// Raw text of every document that feeds an export.
///
/// `None` means the file doesn't exist, which is rendered as a visible
/// placeholder rather than silently left out.
#[derive(Debug, Clone, Default)]
pub struct ExportSources {
    pub identity: Option<String>,
    /// Already resolved: the project copy if one exists, else the global one
    pub voice: Option<String>,
    pub context: Option<String>,
    pub project_context: Option<String>,
    pub memory: Option<String>,
    pub project_memory: Option<String>,
}

/// Build the export document.
///
/// Identity is condensed to `identity_max_words`. Voice and context are passed
/// through untouched. Global and project memory are filtered independently
/// with the same recency settings. The result depends only on the inputs and
/// `now`.
pub fn build_export(sources: &ExportSources, thresholds: &Thresholds, now: DateTime<Local>) -> String {
    let today = now.date_naive();

    let identity = sources
        .identity
        .as_deref()
        .map(|text| condense(text, thresholds.identity_max_words));

    let filter = |text: &str| {
        let selected = filter_recent_at(
            text,
            thresholds.memory_recent_days,
            thresholds.memory_max_entries,
            today,
        );
        if selected.is_empty() {
            NO_MEMORY_ENTRIES.to_string()
        } else {
            selected
        }
    };

    let mut out = String::new();
    out.push_str(EXPORT_TITLE);
    out.push_str("\n\n");
    out.push_str(&format!("Generated: {}\n", now.format("%Y-%m-%d %H:%M")));

    push_section(&mut out, "## Identity", identity.as_deref());
    push_section(&mut out, "## Voice", sources.voice.as_deref());

    match sources.project_context.as_deref() {
        Some(project) => {
            out.push_str("\n## Current Context\n");
            push_section(&mut out, "### Global Context", sources.context.as_deref());
            push_section(&mut out, "### Project Context", Some(project));
        }
        None => push_section(&mut out, "## Current Context", sources.context.as_deref()),
    }

    let memory = sources.memory.as_deref().map(filter);
    match sources.project_memory.as_deref() {
        Some(project) => {
            out.push_str("\n## Relevant Memory\n");
            push_section(&mut out, "### Global Memory", memory.as_deref());
            push_section(&mut out, "### Project Memory", Some(&filter(project)));
        }
        None => push_section(&mut out, "## Relevant Memory", memory.as_deref()),
    }

    out
}

/// Body text is written verbatim; a line break is added only when it lacks one.
fn push_section(out: &mut String, heading: &str, body: Option<&str>) {
    out.push('\n');
    out.push_str(heading);
    out.push_str("\n\n");
    let body = body.unwrap_or(NOT_CONFIGURED);
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
}
