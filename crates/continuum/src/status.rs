//! Profile status and validation
//!
//! Everything here is reporting only; nothing in the export pipeline depends
//! on file ages.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeDelta};

use crate::config::Config;
use crate::error::Result;
use crate::storage::{DocumentKind, EXPORT_FILE_NAME, Profile, Scope};

const FOCUS_HEADING: &str = "## current focus";
const FOCUS_MAX_CHARS: usize = 60;

/// Human-readable age, e.g. "5 minutes ago" or "3 weeks ago"
pub fn describe_age(age: TimeDelta) -> String {
    let age = age.max(TimeDelta::zero());
    let days = age.num_days();

    fn plural(n: i64, unit: &str) -> String {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    }

    match days {
        0 if age.num_seconds() < 3600 => plural(age.num_minutes(), "minute"),
        0 => plural(age.num_hours(), "hour"),
        1 => "1 day ago".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=13 => "1 week ago".to_string(),
        14..=29 => format!("{} weeks ago", days / 7),
        30..=59 => "1 month ago".to_string(),
        _ => format!("{} months ago", days / 30),
    }
}

/// A file is stale once its age in whole days exceeds `stale_days`
pub fn is_stale(modified: DateTime<Local>, now: DateTime<Local>, stale_days: u32) -> bool {
    (now - modified).num_days() > i64::from(stale_days)
}

/// Count lines that look like dated memory entries.
///
/// Looser than the export parser: any `[...]` prefix whose bracket content
/// has a `-` and is at least seven characters long counts.
pub fn count_memory_entries(text: &str) -> usize {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with('['))
        .filter_map(|line| line.find(']').map(|end| &line[1..end]))
        .filter(|inside| inside.contains('-') && inside.chars().count() >= 7)
        .count()
}

/// First non-empty line under `## Current Focus`, cut to 60 characters.
///
/// HTML comments are template guidance, not focus, and are skipped.
pub fn extract_current_focus(text: &str) -> Option<String> {
    let focus = text
        .lines()
        .skip_while(|line| line.trim().to_lowercase() != FOCUS_HEADING)
        .skip(1)
        .take_while(|line| !line.starts_with("## "))
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("<!--"))?;

    if focus.chars().count() > FOCUS_MAX_CHARS {
        let cut: String = focus.chars().take(FOCUS_MAX_CHARS - 3).collect();
        Some(format!("{cut}..."))
    } else {
        Some(focus.to_string())
    }
}

/// Modification time of a file, `None` if it doesn't exist
pub fn modified_at(path: &Path) -> Result<Option<DateTime<Local>>> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.modified()?.into())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    Missing,
    Fresh { age: TimeDelta },
    Stale { age: TimeDelta },
}

#[derive(Debug, Clone)]
pub struct FileStatus {
    pub kind: DocumentKind,
    pub path: PathBuf,
    pub state: FileState,
}

impl FileStatus {
    fn probe(
        profile: &Profile,
        kind: DocumentKind,
        scope: Scope,
        config: &Config,
        now: DateTime<Local>,
    ) -> Result<Option<Self>> {
        let Some(path) = profile.path(kind, scope) else {
            return Ok(None);
        };
        let state = match modified_at(&path)? {
            None => FileState::Missing,
            Some(modified) if is_stale(modified, now, config.stale_days) => FileState::Stale {
                age: now - modified,
            },
            Some(modified) => FileState::Fresh {
                age: now - modified,
            },
        };
        Ok(Some(Self { kind, path, state }))
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind.file_name();
        match &self.state {
            FileState::Missing => write!(f, "{name}: missing"),
            FileState::Fresh { age } => write!(f, "{name}: ok, {}", describe_age(*age)),
            FileState::Stale { age } => {
                write!(f, "{name}: stale, {} (stale?)", describe_age(*age))
            }
        }
    }
}

/// Status of the project half of a profile
#[derive(Debug, Clone)]
pub struct ProjectStatus {
    pub dir: PathBuf,
    pub files: Vec<FileStatus>,
    pub memory_count: usize,
    pub focus: Option<String>,
}

/// Snapshot of a profile's health
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub global_dir: PathBuf,
    pub files: Vec<FileStatus>,
    pub memory_count: usize,
    pub focus: Option<String>,
    pub last_export: Option<DateTime<Local>>,
    pub project: Option<ProjectStatus>,
}

impl StatusReport {
    pub fn collect(profile: &Profile, config: &Config, now: DateTime<Local>) -> Result<Self> {
        let mut files = Vec::new();
        for kind in DocumentKind::ALL {
            if let Some(status) = FileStatus::probe(profile, kind, Scope::Global, config, now)? {
                files.push(status);
            }
        }

        let memory = profile.read(DocumentKind::Memory, Scope::Global)?;
        let context = profile.read(DocumentKind::Context, Scope::Global)?;
        let last_export = modified_at(&profile.exports_dir().join(EXPORT_FILE_NAME))?;

        let project = match profile.project_dir() {
            Some(dir) => {
                let mut files = Vec::new();
                for kind in [DocumentKind::Context, DocumentKind::Memory] {
                    if let Some(status) =
                        FileStatus::probe(profile, kind, Scope::Project, config, now)?
                    {
                        files.push(status);
                    }
                }
                let memory = profile.read(DocumentKind::Memory, Scope::Project)?;
                let context = profile.read(DocumentKind::Context, Scope::Project)?;
                Some(ProjectStatus {
                    dir: dir.to_path_buf(),
                    files,
                    memory_count: memory.as_deref().map_or(0, count_memory_entries),
                    focus: context.as_deref().and_then(extract_current_focus),
                })
            }
            None => None,
        };

        Ok(Self {
            global_dir: profile.global_dir().to_path_buf(),
            files,
            memory_count: memory.as_deref().map_or(0, count_memory_entries),
            focus: context.as_deref().and_then(extract_current_focus),
            last_export,
            project,
        })
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Continuum: {}", self.global_dir.display())?;
        writeln!(f)?;
        for file in &self.files {
            writeln!(f, "  {file}")?;
        }
        writeln!(f)?;
        writeln!(f, "Memories: {} entries", self.memory_count)?;
        if let Some(focus) = &self.focus {
            writeln!(f, "Focus: {focus}")?;
        }
        match self.last_export {
            Some(at) => write!(f, "Last export: {}", at.format("%Y-%m-%d"))?,
            None => write!(f, "Last export: never")?,
        }

        if let Some(project) = &self.project {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "Project: {}", project.dir.display())?;
            for file in &project.files {
                writeln!(f, "  {file}")?;
            }
            write!(f, "Project memories: {} entries", project.memory_count)?;
            if let Some(focus) = &project.focus {
                write!(f, "\nProject focus: {focus}")?;
            }
        }
        Ok(())
    }
}

/// Findings from [`validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Missing files
    pub issues: Vec<String>,
    /// Missing sections and stale files
    pub warnings: Vec<String>,
    /// Entries in the global memory log, if it exists
    pub memory_entries: Option<usize>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty()
    }
}

fn required_sections(kind: DocumentKind) -> &'static [&'static str] {
    match kind {
        DocumentKind::Identity => &["## Core", "## Background"],
        DocumentKind::Voice => &["## Do", "## Don't"],
        DocumentKind::Context => &["## Current Focus"],
        DocumentKind::Memory => &[],
    }
}

/// Check the global profile files for presence, expected sections and age.
pub fn validate(profile: &Profile, config: &Config, now: DateTime<Local>) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();

    for kind in DocumentKind::ALL {
        let name = kind.file_name();
        let Some(content) = profile.read(kind, Scope::Global)? else {
            report.issues.push(format!("{name} missing"));
            continue;
        };

        let lower = content.to_lowercase();
        for section in required_sections(kind) {
            if !lower.contains(&section.to_lowercase()) {
                report.warnings.push(format!("{name}: missing {section}"));
            }
        }

        if let Some(path) = profile.path(kind, Scope::Global) {
            if let Some(modified) = modified_at(&path)? {
                if is_stale(modified, now, config.stale_days) {
                    report.warnings.push(format!("{name}: possibly stale"));
                }
            }
        }

        if kind == DocumentKind::Memory {
            report.memory_entries = Some(count_memory_entries(&content));
        }
    }

    Ok(report)
}
