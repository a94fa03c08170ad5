use crate::models::FileInfo;
use anyhow::{bail, Result};
use chrono::{Duration, Local};
use glob::Pattern;
use std::path::Path;
use walkdir::WalkDir;

/// Patterns always skipped during discovery: OS droppings, partial
/// downloads and editor leftovers.
pub const DEFAULT_SKIP_PATTERNS: [&str; 10] = [
    ".DS_Store",
    "*.tmp",
    "*.temp",
    "*.crdownload",
    "*.part",
    "*.download",
    "Thumbs.db",
    "desktop.ini",
    "*.swp",
    "*~",
];

fn matches_any(name: &str, patterns: &[Pattern]) -> bool {
    let name_lower = name.to_lowercase();
    patterns.iter().any(|p| p.matches(&name_lower))
}

/// Discover files to process in the source directory.
///
/// Shallow, sorted scan: directories are never descended into, hidden
/// files and skip-pattern matches are dropped, files modified within
/// `skip_recent_hours` are left alone (0 disables the check) and
/// `limit` caps the result. Unreadable entries are skipped silently.
pub fn discover_files(
    source: &Path,
    skip_patterns: &[String],
    skip_hidden: bool,
    skip_recent_hours: i64,
    limit: Option<usize>,
) -> Result<Vec<FileInfo>> {
    if !source.is_dir() {
        bail!("Source must be a directory: {}", source.display());
    }

    let mut patterns: Vec<Pattern> = Vec::new();
    for raw in DEFAULT_SKIP_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .chain(skip_patterns.iter().cloned())
    {
        if let Ok(pattern) = Pattern::new(&raw.to_lowercase()) {
            patterns.push(pattern);
        }
    }

    let cutoff = (skip_recent_hours > 0).then(|| Local::now() - Duration::hours(skip_recent_hours));

    let mut files = Vec::new();
    for entry in WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if skip_hidden && name.starts_with('.') {
            continue;
        }
        if matches_any(&name, &patterns) {
            continue;
        }

        let info = match FileInfo::from_path(entry.path()) {
            Ok(info) => info,
            Err(_) => continue,
        };

        if let Some(cutoff) = cutoff {
            if info.modified > cutoff {
                continue;
            }
        }

        files.push(info);
        if limit.is_some_and(|limit| files.len() >= limit) {
            break;
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "x").unwrap();
    }

    #[test]
    fn test_discovers_sorted_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.txt");
        touch(dir.path(), "a.txt");
        touch(dir.path(), "c.txt");

        let files = discover_files(dir.path(), &[], true, 0, None).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "file.txt");
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let files = discover_files(dir.path(), &[], true, 0, None).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_skips_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), ".hidden");
        touch(dir.path(), "visible.txt");

        let files = discover_files(dir.path(), &[], true, 0, None).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "visible.txt");

        let files = discover_files(dir.path(), &[], false, 0, None).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_skips_default_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "download.crdownload");
        touch(dir.path(), "Thumbs.db");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "backup~");

        let files = discover_files(dir.path(), &[], true, 0, None).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "notes.txt");
    }

    #[test]
    fn test_skips_custom_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "draft.bak");
        touch(dir.path(), "final.txt");

        let files =
            discover_files(dir.path(), &["*.bak".to_string()], true, 0, None).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "final.txt");
    }

    #[test]
    fn test_skips_recent_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "fresh.txt");

        // Everything here was just written, so a 1-hour cutoff skips it
        let files = discover_files(dir.path(), &[], true, 1, None).unwrap();
        assert!(files.is_empty());

        let files = discover_files(dir.path(), &[], true, 0, None).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_honors_limit() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            touch(dir.path(), &format!("file{}.txt", i));
        }

        let files = discover_files(dir.path(), &[], true, 0, Some(3)).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_non_directory_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "file.txt");

        assert!(discover_files(&dir.path().join("file.txt"), &[], true, 0, None).is_err());
        assert!(discover_files(&dir.path().join("missing"), &[], true, 0, None).is_err());
    }
}
