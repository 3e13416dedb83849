//! Memory log types and lookups
//!
//! Defines the dated entry format shared by the export filter, the append
//! path in storage, and the tool-call memory query.

pub mod search;
pub mod types;

pub use search::MemoryQuery;
pub use types::{Category, DatePrecision, EntryDate, MemoryEntry, UnknownCategory};
