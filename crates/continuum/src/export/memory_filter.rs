//! Recency-biased selection of memory log entries
//!
//! Recent entries are preferred, but `max_entries` is also a floor: when there
//! aren't enough recent entries, older ones are pulled in newest-first until
//! the count is met. A log of nothing but stale entries still yields results.

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::memory::MemoryEntry;

/// Select entries from a memory log relative to today's local date.
pub fn filter_recent(document: &str, recent_days: u32, max_entries: usize) -> String {
    filter_recent_at(document, recent_days, max_entries, Local::now().date_naive())
}

/// Select entries from a memory log relative to `today`.
///
/// Returns the chosen source lines joined by `\n`: recent entries newest
/// first, then older entries newest first, at most `max_entries` in total.
/// Headings, prose and malformed entries never appear in the output.
pub fn filter_recent_at(
    document: &str,
    recent_days: u32,
    max_entries: usize,
    today: NaiveDate,
) -> String {
    select_entries(MemoryEntry::parse_all(document), recent_days, max_entries, today)
        .iter()
        .map(|entry| entry.line.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Entry-level form of [`filter_recent_at`].
pub fn select_entries(
    entries: Vec<MemoryEntry>,
    recent_days: u32,
    max_entries: usize,
    today: NaiveDate,
) -> Vec<MemoryEntry> {
    let total = entries.len();
    let (mut recent, mut older): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|entry| (today - entry.date.date).num_days() <= i64::from(recent_days));

    // sort_by is stable, so same-day entries keep file order
    recent.sort_by(|a, b| b.date.date.cmp(&a.date.date));
    older.sort_by(|a, b| b.date.date.cmp(&a.date.date));

    debug!(
        total,
        recent = recent.len(),
        older = older.len(),
        max_entries,
        "Selecting memory entries"
    );

    recent.truncate(max_entries);
    let backfill = max_entries - recent.len();
    recent.extend(older.into_iter().take(backfill));
    recent
}
