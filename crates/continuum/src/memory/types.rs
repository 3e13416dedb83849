//! Memory log entry types
//!
//! A memory log is a Markdown file where each entry occupies one line:
//!
//! ```text
//! [2024-06-01] DECISION - Went with Postgres over SQLite
//! [2024-05] FACT - Joined the platform team
//! ```
//!
//! Lines that don't follow this shape are ordinary document content and are
//! ignored by everything in this module.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ENTRY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]*)\]\s+(\S+)\s+-\s(.*)$").unwrap());

/// Category of a memory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Something that is true about the user or their world
    #[serde(alias = "FACT")]
    Fact,
    /// A choice that was made
    #[serde(alias = "DECISION")]
    Decision,
    /// Something learned the hard way
    #[serde(alias = "LESSON")]
    Lesson,
    /// A standing like or dislike
    #[serde(alias = "PREFERENCE")]
    Preference,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Fact,
        Category::Decision,
        Category::Lesson,
        Category::Preference,
    ];

    /// Upper-case label used in the persisted line format
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fact => "FACT",
            Category::Decision => "DECISION",
            Category::Lesson => "LESSON",
            Category::Preference => "PREFERENCE",
        }
    }

    /// Infer a category from free text using keyword matching.
    ///
    /// Decision keywords win over lesson keywords, which win over preference
    /// keywords. Anything else is a fact.
    pub fn detect(text: &str) -> Self {
        const DECISION: &[&str] = &[
            "decided",
            "chose",
            "picked",
            "selected",
            "going with",
            "went with",
        ];
        const LESSON: &[&str] = &["learned", "realized", "discovered", "found out", "turns out"];
        const PREFERENCE: &[&str] = &["prefer", "like", "want", "always", "never", "don't like"];

        let lower = text.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if matches(DECISION) {
            Category::Decision
        } else if matches(LESSON) {
            Category::Lesson
        } else if matches(PREFERENCE) {
            Category::Preference
        } else {
            Category::Fact
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category label is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown memory category: {0}. Use fact, decision, lesson, or preference.")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// How much of the date was written down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
    /// `YYYY-MM-DD`
    Day,
    /// `YYYY-MM`, read as the first of the month
    Month,
}

/// Date of a memory entry, possibly only to month precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDate {
    pub date: NaiveDate,
    pub precision: DatePrecision,
}

impl EntryDate {
    /// Parse `YYYY-MM-DD` or `YYYY-MM`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(Self {
                date,
                precision: DatePrecision::Day,
            });
        }
        // chrono can't parse a date without a day, so pin it to the 1st
        NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .ok()
            .map(|date| Self {
                date,
                precision: DatePrecision::Month,
            })
    }
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            DatePrecision::Day => write!(f, "{}", self.date.format("%Y-%m-%d")),
            DatePrecision::Month => write!(f, "{}", self.date.format("%Y-%m")),
        }
    }
}

/// A single dated line from a memory log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub date: EntryDate,
    pub category: Category,
    pub text: String,
    /// The trimmed source line, reproduced verbatim wherever the entry is emitted
    pub line: String,
}

impl MemoryEntry {
    /// Create a new day-precision entry.
    ///
    /// An entry is exactly one log line, so line breaks in `text` are folded
    /// into single spaces.
    pub fn new(date: NaiveDate, category: Category, text: impl Into<String>) -> Self {
        let date = EntryDate {
            date,
            precision: DatePrecision::Day,
        };
        let text = single_line(&text.into());
        let line = format!("[{date}] {category} - {text}");
        Self {
            date,
            category,
            text,
            line,
        }
    }

    /// Parse one line of a memory log.
    ///
    /// Returns `None` for headings, blank lines, comments, entries with an
    /// unparseable date, unknown categories, or a missing ` - ` delimiter.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let caps = ENTRY_REGEX.captures(line)?;

        let date = EntryDate::parse(&caps[1])?;
        let category = caps[2].parse().ok()?;

        Some(Self {
            date,
            category,
            text: caps[3].trim().to_string(),
            line: line.to_string(),
        })
    }

    /// Parse every entry in a document, in file order
    pub fn parse_all(document: &str) -> Vec<Self> {
        document.lines().filter_map(Self::parse).collect()
    }
}

fn single_line(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for MemoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
