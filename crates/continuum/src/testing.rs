//! Test utilities for continuum - profile fixtures and a canned analyzer
//!
//! Helpers here panic on I/O failure; they are meant for tests only.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::PROJECT_DIR_NAME;
use crate::storage::{DocumentKind, Profile, Scope};
use crate::voice::{VoiceAnalyzer, VoiceError};

/// Builds a global (and optionally project) profile under a scratch directory.
///
/// ```no_run
/// # use continuum::testing::ProfileFixture;
/// # use continuum::storage::{DocumentKind, Scope};
/// # let root = std::path::Path::new("/tmp/scratch");
/// let fixture = ProfileFixture::new(root)
///     .with_project()
///     .with_document(DocumentKind::Identity, Scope::Global, "# Identity\n\n## Core\nMe");
/// let profile = fixture.profile();
/// ```
#[derive(Debug, Clone)]
pub struct ProfileFixture {
    root: PathBuf,
    global_dir: PathBuf,
    project_root: Option<PathBuf>,
}

impl ProfileFixture {
    /// Create `<root>/global` as the global profile directory
    pub fn new(root: &Path) -> Self {
        let global_dir = root.join("global");
        std::fs::create_dir_all(&global_dir).expect("Failed to create global profile dir");
        Self {
            root: root.to_path_buf(),
            global_dir,
            project_root: None,
        }
    }

    /// Create `<root>/project/.continuum` as the project profile directory
    pub fn with_project(mut self) -> Self {
        let project_root = self.root.join("project");
        std::fs::create_dir_all(project_root.join(PROJECT_DIR_NAME))
            .expect("Failed to create project profile dir");
        self.project_root = Some(project_root);
        self
    }

    pub fn with_document(self, kind: DocumentKind, scope: Scope, content: &str) -> Self {
        self.write(kind, scope, content);
        self
    }

    /// Write (or overwrite) a profile document
    pub fn write(&self, kind: DocumentKind, scope: Scope, content: &str) -> PathBuf {
        let path = self
            .profile()
            .path(kind, scope)
            .expect("Project document written without with_project()");
        std::fs::write(&path, content).expect("Failed to write profile document");
        path
    }

    pub fn read(&self, kind: DocumentKind, scope: Scope) -> String {
        let path = self.profile().path(kind, scope).expect("No such document");
        std::fs::read_to_string(path).expect("Failed to read profile document")
    }

    pub fn global_dir(&self) -> &Path {
        &self.global_dir
    }

    /// Root of the fake project, if one was created
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn profile(&self) -> Profile {
        Profile::new(
            self.global_dir.clone(),
            self.project_root.as_ref().map(|r| r.join(PROJECT_DIR_NAME)),
        )
    }
}

/// Build a memory log document from `(date, category, text)` triples
pub fn memory_log(entries: &[(&str, &str, &str)]) -> String {
    let mut doc = String::from("# Memory\n\n");
    for (date, category, text) in entries {
        doc.push_str(&format!("[{date}] {category} - {text}\n"));
    }
    doc
}

/// Voice analyzer that always returns the same reply
#[derive(Debug, Clone)]
pub struct StaticAnalyzer {
    reply: String,
}

impl StaticAnalyzer {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl VoiceAnalyzer for StaticAnalyzer {
    async fn complete(&self, _prompt: &str) -> Result<String, VoiceError> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
