//! Integration tests for profile storage
//!
//! Scaffolding, discovery and memory appends against real directories.

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use continuum::config::{Config, PROJECT_DIR_NAME};
use continuum::memory::{Category, MemoryEntry};
use continuum::status::{StatusReport, validate};
use continuum::storage::{
    DocumentKind, InitAction, Profile, Scope, init_global, init_project,
};
use continuum::testing::ProfileFixture;
use tempfile::tempdir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
}

#[test]
fn test_fresh_global_profile_validates_cleanly() {
    let dir = tempdir().unwrap();
    let base = dir.path().join(".continuum");
    init_global(&base, false, today()).unwrap();

    let profile = Profile::new(&base, None);
    let report = validate(&profile, &Config::default(), chrono::Local::now()).unwrap();

    assert!(report.issues.is_empty(), "{:?}", report.issues);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.memory_entries, Some(1));
}

#[test]
fn test_init_project_then_discover() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("service");
    std::fs::create_dir_all(root.join("src").join("handlers")).unwrap();
    std::fs::write(root.join(".gitignore"), "target/\n").unwrap();

    let actions = init_project(&root, false, today()).unwrap();
    assert!(actions.contains(&InitAction::IgnoredInGit(root.join(".gitignore"))));

    let profile = Profile::discover(
        Some(dir.path().join("global")),
        &root.join("src").join("handlers"),
    );
    assert!(profile.has_project());
    assert!(profile.project_dir().unwrap().ends_with(PROJECT_DIR_NAME));

    let context = profile
        .read(DocumentKind::Context, Scope::Project)
        .unwrap()
        .unwrap();
    assert!(context.contains("**Name:** service"));
}

#[test]
fn test_remember_round_trips_through_parser() {
    let dir = tempdir().unwrap();
    let base = dir.path().join(".continuum");
    init_global(&base, false, today()).unwrap();
    let profile = Profile::new(&base, None);

    let entry = profile
        .remember(Scope::Global, "Learned that fsync matters", None, today())
        .unwrap();
    assert_eq!(entry.category, Category::Lesson);

    let memory = profile
        .read(DocumentKind::Memory, Scope::Global)
        .unwrap()
        .unwrap();
    let entries = MemoryEntry::parse_all(&memory);
    assert_eq!(entries.last(), Some(&entry));
}

#[test]
fn test_remember_into_project_memory() {
    let dir = tempdir().unwrap();
    let fixture = ProfileFixture::new(dir.path())
        .with_project()
        .with_document(DocumentKind::Memory, Scope::Project, "# Project Memory\n");

    fixture
        .profile()
        .remember(Scope::Project, "Chose axum", Some(Category::Decision), today())
        .unwrap();

    assert_eq!(
        fixture.read(DocumentKind::Memory, Scope::Project),
        "# Project Memory\n\n[2024-07-01] DECISION - Chose axum"
    );
}

#[test]
fn test_concurrent_appends_do_not_interleave() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 25;

    let dir = tempdir().unwrap();
    let fixture = ProfileFixture::new(dir.path()).with_document(
        DocumentKind::Memory,
        Scope::Global,
        "# Memory\n",
    );
    let profile = Arc::new(fixture.profile());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let profile = Arc::clone(&profile);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let entry = MemoryEntry::new(
                        today(),
                        Category::Fact,
                        format!("thread {t} entry {i} {}", "x".repeat(200)),
                    );
                    profile.append_memory(Scope::Global, &entry).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let memory = fixture.read(DocumentKind::Memory, Scope::Global);
    let entries = MemoryEntry::parse_all(&memory);
    assert_eq!(entries.len(), THREADS * PER_THREAD);
    for entry in &entries {
        assert!(entry.text.ends_with(&"x".repeat(200)), "torn line: {}", entry.line);
    }
    for t in 0..THREADS {
        let mine = entries
            .iter()
            .filter(|e| e.text.starts_with(&format!("thread {t} ")))
            .count();
        assert_eq!(mine, PER_THREAD);
    }
}

#[test]
fn test_status_after_init_and_export() {
    let dir = tempdir().unwrap();
    let base = dir.path().join(".continuum");
    init_global(&base, false, today()).unwrap();
    let profile = Profile::new(&base, None);
    let config = profile.load_config();

    profile
        .write_export(&config, None, chrono::Local::now())
        .unwrap();
    let report = StatusReport::collect(&profile, &config, chrono::Local::now()).unwrap();

    assert!(report.last_export.is_some());
    assert_eq!(report.memory_count, 1);
    assert!(report.project.is_none());
    assert!(report.to_string().contains("identity.md: ok"));
}
