//! Export condensation pipeline
//!
//! Turns the profile documents into one bounded-size Markdown document for an
//! LLM context window. Everything here is pure: no I/O, and the current time is
//! always passed in.

pub mod builder;
pub mod condense;
pub mod memory_filter;

pub use builder::{ExportSources, NO_MEMORY_ENTRIES, NOT_CONFIGURED, build_export};
pub use condense::{condense, is_heading, word_count};
pub use memory_filter::{filter_recent, filter_recent_at, select_entries};
