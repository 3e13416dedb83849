//! Project root discovery
//!
//! A project root is the nearest ancestor directory containing one of a set of
//! marker entries. The search is a pure function over an existence check so
//! it can be exercised without touching the filesystem.

use std::path::{Path, PathBuf};

/// Name of the project-level profile directory inside a project root
pub const PROJECT_DIR_NAME: &str = ".continuum";

/// Entries that mark a directory as a project root
pub const PROJECT_MARKERS: &[&str] = &[
    PROJECT_DIR_NAME,
    ".git",
    "pyproject.toml",
    "package.json",
    "Cargo.toml",
];

/// Return the first directory from `start` upward that contains any of
/// `markers`, according to `exists`.
///
/// The filesystem root itself is never returned.
pub fn locate_root<F>(start: &Path, markers: &[&str], exists: F) -> Option<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    start
        .ancestors()
        .take_while(|dir| dir.parent().is_some())
        .find(|dir| markers.iter().any(|marker| exists(&dir.join(marker))))
        .map(Path::to_path_buf)
}

/// Search the real filesystem upward from `start` using [`PROJECT_MARKERS`].
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    locate_root(&start, PROJECT_MARKERS, Path::exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fake_fs(paths: &[&str]) -> impl Fn(&Path) -> bool {
        let set: HashSet<PathBuf> = paths.iter().map(PathBuf::from).collect();
        move |p: &Path| set.contains(p)
    }

    #[test]
    fn test_locate_root_finds_nearest_ancestor() {
        let exists = fake_fs(&["/home/u/code/app/.git", "/home/u/.git"]);
        let root = locate_root(Path::new("/home/u/code/app/src/bin"), &[".git"], exists);
        assert_eq!(root, Some(PathBuf::from("/home/u/code/app")));
    }

    #[test]
    fn test_locate_root_checks_start_directory() {
        let exists = fake_fs(&["/work/Cargo.toml"]);
        let root = locate_root(Path::new("/work"), PROJECT_MARKERS, exists);
        assert_eq!(root, Some(PathBuf::from("/work")));
    }

    #[test]
    fn test_locate_root_any_marker_matches() {
        let exists = fake_fs(&["/a/b/package.json"]);
        let root = locate_root(Path::new("/a/b/c"), PROJECT_MARKERS, exists);
        assert_eq!(root, Some(PathBuf::from("/a/b")));
    }

    #[test]
    fn test_locate_root_none_without_markers() {
        let exists = fake_fs(&[]);
        assert_eq!(locate_root(Path::new("/a/b/c"), PROJECT_MARKERS, exists), None);
    }

    #[test]
    fn test_locate_root_ignores_filesystem_root() {
        let exists = fake_fs(&["/.git"]);
        assert_eq!(locate_root(Path::new("/a/b"), &[".git"], exists), None);
    }

    #[test]
    fn test_find_project_root_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("project");
        let nested = root.join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir(root.join(PROJECT_DIR_NAME)).unwrap();

        let found = find_project_root(&nested).unwrap();
        assert_eq!(found, root.canonicalize().unwrap());
    }
}
