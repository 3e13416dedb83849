//! On-disk profile layout
//!
//! A profile is a global directory (`~/.continuum` by default) plus an optional
//! project directory (`<project root>/.continuum`). Each holds the same four
//! Markdown documents; the global one also holds `exports/` and `samples/`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use fs2::FileExt;
use tracing::{debug, info};

use crate::config::{self, Config, PROJECT_DIR_NAME};
use crate::error::{ContinuumError, Result};
use crate::export::{ExportSources, build_export};
use crate::memory::{Category, MemoryEntry};

/// File name of the default export target inside `exports/`
pub const EXPORT_FILE_NAME: &str = "claude-code.md";

/// One of the four profile documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Identity,
    Voice,
    Context,
    Memory,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Identity,
        DocumentKind::Voice,
        DocumentKind::Context,
        DocumentKind::Memory,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentKind::Identity => "identity.md",
            DocumentKind::Voice => "voice.md",
            DocumentKind::Context => "context.md",
            DocumentKind::Memory => "memory.md",
        }
    }

    /// Whether a project copy replaces the global one instead of adding to it
    pub fn project_overrides(&self) -> bool {
        matches!(self, DocumentKind::Identity | DocumentKind::Voice)
    }
}

/// Which directory of the profile a document lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Project,
}

/// Global and project profile directories
#[derive(Debug, Clone)]
pub struct Profile {
    global_dir: PathBuf,
    project_dir: Option<PathBuf>,
}

impl Profile {
    pub fn new(global_dir: impl Into<PathBuf>, project_dir: Option<PathBuf>) -> Self {
        Self {
            global_dir: global_dir.into(),
            project_dir,
        }
    }

    /// Build a profile for `global_dir` (or the default), attaching the
    /// project directory of the nearest project root above `start` when that
    /// root has a `.continuum/` directory.
    pub fn discover(global_dir: Option<PathBuf>, start: &Path) -> Self {
        let global_dir = global_dir.unwrap_or_else(config::default_base_path);
        let project_dir = config::find_project_root(start)
            .map(|root| root.join(PROJECT_DIR_NAME))
            .filter(|dir| dir.is_dir());

        if let Some(dir) = &project_dir {
            debug!("Detected project profile at {}", dir.display());
        }

        Self::new(global_dir, project_dir)
    }

    pub fn global_dir(&self) -> &Path {
        &self.global_dir
    }

    pub fn project_dir(&self) -> Option<&Path> {
        self.project_dir.as_deref()
    }

    pub fn has_project(&self) -> bool {
        self.project_dir.is_some()
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.global_dir.join("exports")
    }

    pub fn samples_dir(&self) -> PathBuf {
        self.global_dir.join("samples")
    }

    /// Load the configuration that applies to this profile
    pub fn load_config(&self) -> Config {
        Config::load(&self.global_dir, self.project_dir.as_deref())
    }

    /// Path of a document, whether or not it exists.
    ///
    /// `None` only for [`Scope::Project`] when there is no project.
    pub fn path(&self, kind: DocumentKind, scope: Scope) -> Option<PathBuf> {
        match scope {
            Scope::Global => Some(self.global_dir.join(kind.file_name())),
            Scope::Project => self.project_dir.as_ref().map(|d| d.join(kind.file_name())),
        }
    }

    /// Path of a document only if it exists on disk
    pub fn existing_path(&self, kind: DocumentKind, scope: Scope) -> Option<PathBuf> {
        self.path(kind, scope).filter(|p| p.is_file())
    }

    /// The copy of `kind` that should be used: the project copy for identity
    /// and voice when present, otherwise the global one if it exists.
    pub fn effective_path(&self, kind: DocumentKind) -> Option<PathBuf> {
        if kind.project_overrides() {
            if let Some(path) = self.existing_path(kind, Scope::Project) {
                return Some(path);
            }
        }
        self.existing_path(kind, Scope::Global)
    }

    /// Read a document; `Ok(None)` when it doesn't exist.
    pub fn read(&self, kind: DocumentKind, scope: Scope) -> Result<Option<String>> {
        match self.path(kind, scope) {
            Some(path) => read_optional(&path),
            None => Ok(None),
        }
    }

    /// Read the effective copy of a document
    pub fn read_effective(&self, kind: DocumentKind) -> Result<Option<String>> {
        match self.effective_path(kind) {
            Some(path) => read_optional(&path),
            None => Ok(None),
        }
    }

    /// Gather everything the export builder needs.
    ///
    /// Identity always comes from the global profile; voice honours the
    /// project override.
    pub fn export_sources(&self) -> Result<ExportSources> {
        Ok(ExportSources {
            identity: self.read(DocumentKind::Identity, Scope::Global)?,
            voice: self.read_effective(DocumentKind::Voice)?,
            context: self.read(DocumentKind::Context, Scope::Global)?,
            project_context: self.read(DocumentKind::Context, Scope::Project)?,
            memory: self.read(DocumentKind::Memory, Scope::Global)?,
            project_memory: self.read(DocumentKind::Memory, Scope::Project)?,
        })
    }

    /// Render the export document for this profile
    pub fn generate_export(&self, config: &Config, now: DateTime<Local>) -> Result<String> {
        let sources = self.export_sources()?;
        Ok(build_export(&sources, &config.thresholds(), now))
    }

    /// Write the export to `output`, or to `exports/claude-code.md`.
    pub fn write_export(
        &self,
        config: &Config,
        output: Option<&Path>,
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let content = self.generate_export(config, now)?;

        let path = match output {
            Some(path) => path.to_path_buf(),
            None => self.exports_dir().join(EXPORT_FILE_NAME),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, content)?;
        info!("Exported context to {}", path.display());
        Ok(path)
    }

    /// Append one entry to a memory log.
    ///
    /// The log must already exist. An exclusive lock is held for the write so
    /// concurrent appends from other threads or processes never interleave.
    pub fn append_memory(&self, scope: Scope, entry: &MemoryEntry) -> Result<PathBuf> {
        let path = match self.path(DocumentKind::Memory, scope) {
            Some(path) => path,
            None => {
                return Err(ContinuumError::NotInitialized(
                    self.global_dir.join(PROJECT_DIR_NAME),
                ));
            }
        };
        if !path.is_file() {
            return Err(ContinuumError::NotInitialized(path));
        }

        let mut file = OpenOptions::new().append(true).open(&path)?;
        file.lock_exclusive()
            .map_err(|e| ContinuumError::Storage(format!("Failed to lock {}: {e}", path.display())))?;

        let written = file.write_all(format!("\n{entry}").as_bytes());
        let unlocked = file.unlock();
        written?;
        unlocked?;

        info!("Appended memory to {}: {}", path.display(), entry);
        Ok(path)
    }

    /// Record a new memory dated `today`, detecting the category from the text
    /// when none is given.
    pub fn remember(
        &self,
        scope: Scope,
        text: &str,
        category: Option<Category>,
        today: NaiveDate,
    ) -> Result<MemoryEntry> {
        let category = category.unwrap_or_else(|| Category::detect(text));
        let entry = MemoryEntry::new(today, category, text.trim());
        self.append_memory(scope, &entry)?;
        Ok(entry)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
