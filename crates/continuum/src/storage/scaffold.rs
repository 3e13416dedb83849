//! Profile directory scaffolding

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::{CONFIG_FILE_NAME, PROJECT_DIR_NAME};
use crate::error::Result;

/// Placeholder in templates that is replaced with the current date
pub const DATE_PLACEHOLDER: &str = "[Today's date]";

const GLOBAL_TEMPLATES: &[(&str, &str)] = &[
    ("identity.md", include_str!("../../templates/identity.md")),
    ("voice.md", include_str!("../../templates/voice.md")),
    ("context.md", include_str!("../../templates/context.md")),
    ("memory.md", include_str!("../../templates/memory.md")),
    (CONFIG_FILE_NAME, include_str!("../../templates/config.toml")),
];

const PROJECT_MEMORY_TEMPLATE: &str = "# Project Memory

<!-- Project-specific decisions, learnings, and context -->
<!-- Format: [YYYY-MM-DD] CATEGORY - text -->
";

const GITIGNORE_BLOCK: &str = "\n# Continuum local context\n.continuum/\n";

/// Something `init_global` or `init_project` did to the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitAction {
    Created(PathBuf),
    /// File already existed and `force` was not set
    Skipped(PathBuf),
    /// `.continuum/` was appended to this `.gitignore`
    IgnoredInGit(PathBuf),
}

impl std::fmt::Display for InitAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitAction::Created(p) => write!(f, "Created {}", p.display()),
            InitAction::Skipped(p) => write!(f, "Skipped {} (exists)", p.display()),
            InitAction::IgnoredInGit(p) => {
                write!(f, "Added {PROJECT_DIR_NAME}/ to {}", p.display())
            }
        }
    }
}

/// Create the global profile directory with its templates.
pub fn init_global(dir: &Path, force: bool, today: NaiveDate) -> Result<Vec<InitAction>> {
    let mut actions = Vec::new();

    create_dir(dir, &mut actions)?;
    create_dir(&dir.join("exports"), &mut actions)?;

    for (name, template) in GLOBAL_TEMPLATES {
        write_template(&dir.join(name), template, force, today, &mut actions)?;
    }

    info!("Initialized global profile at {}", dir.display());
    Ok(actions)
}

/// Create `<root>/.continuum/` with project context and memory templates.
pub fn init_project(root: &Path, force: bool, today: NaiveDate) -> Result<Vec<InitAction>> {
    let mut actions = Vec::new();
    let dir = root.join(PROJECT_DIR_NAME);

    create_dir(&dir, &mut actions)?;

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let context = project_context_template(&name, root);

    write_template(&dir.join("context.md"), &context, force, today, &mut actions)?;
    write_template(
        &dir.join("memory.md"),
        PROJECT_MEMORY_TEMPLATE,
        force,
        today,
        &mut actions,
    )?;

    let gitignore = root.join(".gitignore");
    if gitignore.is_file() {
        let content = std::fs::read_to_string(&gitignore)?;
        if !already_ignored(&content) {
            OpenOptions::new()
                .append(true)
                .open(&gitignore)?
                .write_all(GITIGNORE_BLOCK.as_bytes())?;
            actions.push(InitAction::IgnoredInGit(gitignore));
        }
    }

    info!("Initialized project profile at {}", dir.display());
    Ok(actions)
}

fn project_context_template(name: &str, root: &Path) -> String {
    format!(
        "# Project Context

## Project

**Name:** {name}
**Path:** {}

## Tech Stack

<!-- Languages, frameworks, key dependencies -->

## Team

<!-- Key collaborators on this project -->

## Current Focus

<!-- What you're currently working on in this project -->
",
        root.display()
    )
}

fn already_ignored(gitignore: &str) -> bool {
    gitignore
        .lines()
        .map(str::trim)
        .any(|line| line == ".continuum" || line == ".continuum/" || line == "/.continuum/")
}

fn create_dir(dir: &Path, actions: &mut Vec<InitAction>) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        actions.push(InitAction::Created(dir.to_path_buf()));
    }
    Ok(())
}

fn write_template(
    dest: &Path,
    template: &str,
    force: bool,
    today: NaiveDate,
    actions: &mut Vec<InitAction>,
) -> Result<()> {
    if dest.exists() && !force {
        debug!("Skipping existing {}", dest.display());
        actions.push(InitAction::Skipped(dest.to_path_buf()));
        return Ok(());
    }

    let content = template.replace(DATE_PLACEHOLDER, &today.format("%Y-%m-%d").to_string());
    std::fs::write(dest, content)?;
    actions.push(InitAction::Created(dest.to_path_buf()));
    Ok(())
}
